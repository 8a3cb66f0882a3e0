//! Language preference and startup locale resolution

use crate::error::Result;
use crate::preference::{Preference, PreferenceStore};
use app_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Supported UI locales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh")]
    Zh,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Preference for Locale {
    const STORAGE_KEY: &'static str = "lang";
    const ALL: &'static [Self] = &[Locale::En, Locale::Zh, Locale::ZhTw];
    const DEFAULT: Self = Locale::En;

    fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
            Locale::ZhTw => "zh-TW",
        }
    }
}

impl Locale {
    /// Map a platform locale hint onto a supported Chinese variant.
    ///
    /// Only `zh`-prefixed hints match. `zh-TW` and `zh-HK` select traditional
    /// Chinese; every other `zh` hint selects simplified Chinese.
    pub fn from_platform_hint(hint: &str) -> Option<Self> {
        if !hint.starts_with("zh") {
            return None;
        }
        match hint {
            "zh-TW" | "zh-HK" => Some(Locale::ZhTw),
            _ => Some(Locale::Zh),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unsupported locale: {}", s))
    }
}

/// Source of the platform's preferred locale
pub trait PlatformLocale: Send + Sync {
    fn locale_hint(&self) -> Option<String>;
}

/// Asks the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocale;

impl PlatformLocale for SystemLocale {
    fn locale_hint(&self) -> Option<String> {
        sys_locale::get_locale()
    }
}

/// A fixed hint, for tests and explicit overrides
#[derive(Debug, Default, Clone)]
pub struct FixedLocale(pub Option<String>);

impl FixedLocale {
    pub fn new(hint: impl Into<String>) -> Self {
        Self(Some(hint.into()))
    }
}

impl PlatformLocale for FixedLocale {
    fn locale_hint(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Decides the effective locale at startup and owns the `lang` preference
pub struct LanguageResolver {
    store: PreferenceStore<Locale>,
    platform: Box<dyn PlatformLocale>,
}

impl LanguageResolver {
    pub fn new(storage: Arc<dyn KeyValueStore>, platform: Box<dyn PlatformLocale>) -> Self {
        Self {
            store: PreferenceStore::new(storage),
            platform,
        }
    }

    /// Stored preference, then platform hint, then `en`.
    ///
    /// The result is persisted so the next startup resolves identically.
    pub fn resolve(&self) -> Result<Locale> {
        let locale = if let Some(stored) = self.store.stored() {
            tracing::debug!(locale = %stored, "Using stored language");
            stored
        } else if let Some(hinted) = self
            .platform
            .locale_hint()
            .as_deref()
            .and_then(Locale::from_platform_hint)
        {
            tracing::debug!(locale = %hinted, "Using platform language");
            hinted
        } else {
            Locale::DEFAULT
        };

        self.store.set(locale)?;
        tracing::info!(locale = %locale, "Language resolved");
        Ok(locale)
    }

    pub fn current(&self) -> Locale {
        self.store.get()
    }

    pub fn set_language(&self, locale: Locale) -> Result<()> {
        self.store.set(locale)
    }

    /// Untyped setter; unsupported tags are ignored
    pub fn set_language_raw(&self, raw: &str) -> Result<bool> {
        self.store.set_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_storage::MemoryStore;

    fn resolver(stored: Option<&str>, hint: Option<&str>) -> (Arc<MemoryStore>, LanguageResolver) {
        let storage = Arc::new(MemoryStore::new());
        if let Some(stored) = stored {
            storage.set_item("lang", stored).unwrap();
        }
        let platform = FixedLocale(hint.map(str::to_string));
        let resolver = LanguageResolver::new(storage.clone(), Box::new(platform));
        (storage, resolver)
    }

    #[test]
    fn zh_hints_map_to_variants() {
        assert_eq!(Locale::from_platform_hint("zh-TW"), Some(Locale::ZhTw));
        assert_eq!(Locale::from_platform_hint("zh-HK"), Some(Locale::ZhTw));
        assert_eq!(Locale::from_platform_hint("zh-CN"), Some(Locale::Zh));
        assert_eq!(Locale::from_platform_hint("zh-SG"), Some(Locale::Zh));
        assert_eq!(Locale::from_platform_hint("zh"), Some(Locale::Zh));
        assert_eq!(Locale::from_platform_hint("zh-Hant-TW"), Some(Locale::Zh));
        assert_eq!(Locale::from_platform_hint("zh-tw"), Some(Locale::Zh));
    }

    #[test]
    fn non_zh_hints_do_not_match() {
        assert_eq!(Locale::from_platform_hint("en-US"), None);
        assert_eq!(Locale::from_platform_hint("fr"), None);
        assert_eq!(Locale::from_platform_hint(""), None);
    }

    #[test]
    fn stored_preference_wins() {
        let (_storage, resolver) = resolver(Some("zh-TW"), Some("zh-CN"));
        assert_eq!(resolver.resolve().unwrap(), Locale::ZhTw);
    }

    #[test]
    fn invalid_stored_value_falls_through_to_hint() {
        for bad in ["fr", "ZH", "zh-HK", "", "english"] {
            let (storage, resolver) = resolver(Some(bad), Some("zh-HK"));
            assert_eq!(resolver.resolve().unwrap(), Locale::ZhTw);
            assert_eq!(storage.get_item("lang").unwrap().as_deref(), Some("zh-TW"));
        }
    }

    #[test]
    fn invalid_stored_value_without_hint_defaults_to_en() {
        let (storage, resolver) = resolver(Some("de"), None);
        assert_eq!(resolver.resolve().unwrap(), Locale::En);
        assert_eq!(storage.get_item("lang").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn non_chinese_hint_defaults_to_en() {
        let (_storage, resolver) = resolver(None, Some("ja-JP"));
        assert_eq!(resolver.resolve().unwrap(), Locale::En);
    }

    #[test]
    fn resolution_is_idempotent_across_loads() {
        let storage = Arc::new(MemoryStore::new());

        let first = LanguageResolver::new(storage.clone(), Box::new(FixedLocale::new("zh-CN")));
        assert_eq!(first.resolve().unwrap(), Locale::Zh);

        // Platform changed, but the persisted choice sticks
        let second = LanguageResolver::new(storage.clone(), Box::new(FixedLocale::new("en-GB")));
        assert_eq!(second.resolve().unwrap(), Locale::Zh);
    }

    #[test]
    fn set_language_raw_rejects_unknown_tags() {
        let (storage, resolver) = resolver(None, None);
        resolver.resolve().unwrap();

        assert!(!resolver.set_language_raw("ko").unwrap());
        assert_eq!(resolver.current(), Locale::En);

        assert!(resolver.set_language_raw("zh").unwrap());
        assert_eq!(resolver.current(), Locale::Zh);
        assert_eq!(storage.get_item("lang").unwrap().as_deref(), Some("zh"));
    }

    #[test]
    fn locale_round_trips_through_from_str() {
        for locale in Locale::ALL {
            assert_eq!(locale.to_string().parse::<Locale>().unwrap(), *locale);
        }
        assert!("pt-BR".parse::<Locale>().is_err());
    }
}
