//! Effective locale selection
//!
//! Precedence: explicit per-request override, then the locale reported by the
//! caller's browser, then the `DefaultLanguage` setting, then none. Blank
//! values at any level are treated as absent.

use crate::config::Settings;

/// Source of the caller's preferred locale
pub trait LocaleProvider {
    /// Preferred locale tag, if the caller reports one
    fn preferred_locale(&self) -> Option<String>;
}

/// Provider that never reports a locale
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocale;

impl LocaleProvider for NoLocale {
    fn preferred_locale(&self) -> Option<String> {
        None
    }
}

/// Languages reported by a browser, most preferred first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserLanguages {
    languages: Vec<String>,
}

impl BrowserLanguages {
    /// Wrap an ordered list such as `navigator.languages`
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse an `Accept-Language` header
    ///
    /// Entries are ordered by `q` weight, ties keep header order, and `q=0`
    /// entries and the `*` wildcard are dropped.
    pub fn from_accept_language(header: &str) -> Self {
        let mut weighted: Vec<(f32, &str)> = header
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }
                let weight = parts
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                (weight > 0.0).then_some((weight, tag))
            })
            .collect();
        // stable sort keeps header order for equal weights
        weighted.sort_by(|a, b| b.0.total_cmp(&a.0));
        Self::new(weighted.into_iter().map(|(_, tag)| tag))
    }

    /// Reported languages in preference order
    pub fn languages(&self) -> &[String] {
        &self.languages
    }
}

impl LocaleProvider for BrowserLanguages {
    fn preferred_locale(&self) -> Option<String> {
        let preferred = self
            .languages
            .iter()
            .find_map(|language| non_blank(Some(language.as_str())));
        if preferred.is_none() {
            tracing::debug!("browser reported no usable language");
        }
        preferred
    }
}

/// Locale override carried in a URL query string, e.g. `?lang=fr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryStringLocale {
    query: String,
    key: String,
}

impl QueryStringLocale {
    /// Key read when none is given
    pub const DEFAULT_KEY: &'static str = "lang";

    /// Read the default key from a full URL or bare query string
    pub fn new(url_or_query: impl Into<String>) -> Self {
        Self::with_key(url_or_query, Self::DEFAULT_KEY)
    }

    /// Read `key` from a full URL or bare query string
    pub fn with_key(url_or_query: impl Into<String>, key: impl Into<String>) -> Self {
        let raw = url_or_query.into();
        let query = match raw.split_once('?') {
            Some((_, query)) => query,
            None if raw.contains('=') => raw.as_str(),
            None => "",
        };
        let query = query.split('#').next().unwrap_or_default().to_string();
        Self {
            query,
            key: key.into(),
        }
    }

    /// Value of a query parameter, first occurrence wins
    pub fn value(&self, key: &str) -> Option<&str> {
        self.query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

impl LocaleProvider for QueryStringLocale {
    fn preferred_locale(&self) -> Option<String> {
        let value = non_blank(self.value(&self.key));
        if value.is_none() {
            tracing::debug!(key = %self.key, "key is not found in the query string");
        }
        value
    }
}

/// Everything known about the caller's locale for one run
pub struct LocaleContext<'a> {
    /// Explicit locale requested for this load
    pub request_override: Option<String>,
    /// Browser-reported locale source
    pub provider: &'a dyn LocaleProvider,
}

impl Default for LocaleContext<'_> {
    fn default() -> Self {
        Self {
            request_override: None,
            provider: &NoLocale,
        }
    }
}

impl<'a> LocaleContext<'a> {
    /// Context with only a browser-reported source
    pub fn from_provider(provider: &'a dyn LocaleProvider) -> Self {
        Self {
            request_override: None,
            provider,
        }
    }

    /// Set an explicit per-request locale
    pub fn with_override(mut self, locale: impl Into<String>) -> Self {
        self.request_override = Some(locale.into());
        self
    }
}

impl std::fmt::Debug for LocaleContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocaleContext")
            .field("request_override", &self.request_override)
            .finish_non_exhaustive()
    }
}

/// Pick the single locale the value columns are resolved against
pub fn effective_locale(context: &LocaleContext<'_>, settings: &Settings) -> Option<String> {
    if let Some(locale) = non_blank(context.request_override.as_deref()) {
        return Some(locale);
    }
    if let Some(locale) = context.provider.preferred_locale() {
        return Some(locale);
    }
    let configured = non_blank(settings.default_language());
    if configured.is_none() {
        tracing::info!("no language found in the configuration or the browser");
    }
    configured
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
