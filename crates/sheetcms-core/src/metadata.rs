//! Head metadata from the reserved `MetaData` content sheet
//!
//! The sheet is an ordinary `object` sheet whose keys name head tags
//! (`title`, `description`, `ogTitle`, `twitterCard`, ...). This module only
//! maps those entries onto tag targets; writing them into a document belongs
//! to a [`MetadataSink`].

use serde::Serialize;
use std::fmt;

use crate::content::{ContentMap, Entries};

/// Where a metadata value goes in the document head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum MetaTarget {
    /// The `<title>` element text
    Title,
    /// `<meta name="..." content="...">`
    Name(&'static str),
    /// `<meta property="..." content="...">`
    Property(&'static str),
}

impl fmt::Display for MetaTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetaTarget::Title => f.write_str("head title"),
            MetaTarget::Name(name) => write!(f, "meta[name=\"{}\"]", name),
            MetaTarget::Property(property) => write!(f, "meta[property=\"{}\"]", property),
        }
    }
}

/// Metadata sheet key and the tag it fills
const TAGS: [(&str, MetaTarget); 13] = [
    ("title", MetaTarget::Title),
    ("description", MetaTarget::Name("description")),
    ("twitterCard", MetaTarget::Name("twitter:card")),
    ("twitterSite", MetaTarget::Name("twitter:site")),
    ("twitterCreator", MetaTarget::Name("twitter:creator")),
    ("twitterDescription", MetaTarget::Name("twitter:description")),
    ("twitterImage", MetaTarget::Name("twitter:image")),
    ("ogTitle", MetaTarget::Property("og:title")),
    ("ogDescription", MetaTarget::Property("og:description")),
    ("ogUrl", MetaTarget::Property("og:url")),
    ("ogType", MetaTarget::Property("og:type")),
    ("ogImage", MetaTarget::Property("og:image")),
    ("ogImageAlt", MetaTarget::Property("og:image:alt")),
];

/// One head tag and the value the sheet gives it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaTag {
    /// Sheet key the value was read from
    pub key: &'static str,
    /// Tag to update
    pub target: MetaTarget,
    /// Value, `None` when the sheet has no non-blank entry
    pub value: Option<String>,
}

/// Receiver of head tag updates
pub trait MetadataSink {
    /// Set `target` to `value`
    fn update(&mut self, target: &MetaTarget, value: &str);
}

/// Head metadata read from the metadata sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadMetadata {
    tags: Vec<MetaTag>,
}

impl HeadMetadata {
    /// Read every known tag from object entries
    pub fn from_entries(entries: &Entries) -> Self {
        let tags = TAGS
            .iter()
            .map(|&(key, target)| MetaTag {
                key,
                target,
                value: entries
                    .get(key)
                    .filter(|v| !v.trim().is_empty())
                    .map(str::to_string),
            })
            .collect();
        Self { tags }
    }

    /// Read the metadata sheet from transformed content
    ///
    /// `None` when the sheet is absent or was not transformed as an `object`.
    pub fn from_content(content: &ContentMap, sheet: &str) -> Option<Self> {
        let entries = content.get(sheet)?.as_map();
        if entries.is_none() {
            tracing::warn!(sheet = %sheet, "metadata sheet must use the object shape");
        }
        entries.map(Self::from_entries)
    }

    /// All known tags in document order
    pub fn tags(&self) -> &[MetaTag] {
        &self.tags
    }

    /// Value for a sheet key such as `ogTitle`
    pub fn value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .and_then(|t| t.value.as_deref())
    }

    /// Push every tag that has a value into `sink`
    ///
    /// Returns the number of tags updated; each tag without a value is logged.
    pub fn publish(&self, sink: &mut dyn MetadataSink) -> usize {
        let mut updated = 0;
        for tag in &self.tags {
            match &tag.value {
                Some(value) => {
                    sink.update(&tag.target, value);
                    updated += 1;
                }
                None => tracing::warn!(
                    target_tag = %tag.target,
                    key = tag.key,
                    "tag won't be updated because no value is defined in the metadata sheet"
                ),
            }
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SheetContent;

    #[derive(Default)]
    struct RecordingSink {
        updates: Vec<(String, String)>,
    }

    impl MetadataSink for RecordingSink {
        fn update(&mut self, target: &MetaTarget, value: &str) {
            self.updates.push((target.to_string(), value.to_string()));
        }
    }

    fn metadata_entries() -> Entries {
        let mut entries = Entries::new();
        entries.insert("title", "My site");
        entries.insert("ogTitle", "My site on OG");
        entries.insert("twitterCard", " ");
        entries.insert("favicon", "/icon.png");
        entries
    }

    #[test]
    fn test_reads_known_keys() {
        let metadata = HeadMetadata::from_entries(&metadata_entries());
        assert_eq!(metadata.tags().len(), 13);
        assert_eq!(metadata.value("title"), Some("My site"));
        assert_eq!(metadata.value("ogTitle"), Some("My site on OG"));
        assert_eq!(metadata.value("twitterCard"), None);
        assert_eq!(metadata.value("favicon"), None);
    }

    #[test]
    fn test_publish_skips_missing_values() {
        let metadata = HeadMetadata::from_entries(&metadata_entries());
        let mut sink = RecordingSink::default();
        let updated = metadata.publish(&mut sink);

        assert_eq!(updated, 2);
        assert_eq!(
            sink.updates,
            [
                ("head title".to_string(), "My site".to_string()),
                (
                    "meta[property=\"og:title\"]".to_string(),
                    "My site on OG".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_from_content_requires_object_shape() {
        let mut content = ContentMap::new();
        assert!(HeadMetadata::from_content(&content, "MetaData").is_none());

        content.insert("MetaData", SheetContent::List(vec![]));
        assert!(HeadMetadata::from_content(&content, "MetaData").is_none());

        content.insert("MetaData", SheetContent::Map(metadata_entries()));
        let metadata = HeadMetadata::from_content(&content, "MetaData").unwrap();
        assert_eq!(metadata.value("title"), Some("My site"));
    }

    #[test]
    fn test_target_serialization() {
        let json = serde_json::to_value(MetaTarget::Property("og:url")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "property", "name": "og:url"}));
    }
}
