//! Internationalization support using Fluent

use crate::error::{AppError, Result};
use crate::locale::Locale;
use crate::preference::Preference;
use fluent::{FluentBundle, FluentResource};
use parking_lot::RwLock;
use rust_embed::RustEmbed;
use std::collections::HashMap;
use std::sync::Arc;
use unic_langid::LanguageIdentifier;

pub use fluent::FluentArgs;

/// Catalogs shipped with the binary, one directory per locale
#[derive(RustEmbed)]
#[folder = "locales/"]
struct Catalogs;

/// Localization manager
pub struct I18n {
    bundles: RwLock<HashMap<String, Arc<FluentBundle<FluentResource>>>>,
    current_locale: RwLock<String>,
    fallback_locale: String,
}

impl I18n {
    /// Create an empty manager; no catalogs are loaded
    pub fn new(default_locale: &str) -> Self {
        Self {
            bundles: RwLock::new(HashMap::new()),
            current_locale: RwLock::new(default_locale.to_string()),
            fallback_locale: Locale::DEFAULT.as_str().to_string(),
        }
    }

    /// Create a manager with the embedded catalogs loaded
    pub fn with_embedded_catalogs() -> Result<Self> {
        let i18n = Self::new(Locale::DEFAULT.as_str());
        i18n.load_embedded()?;
        Ok(i18n)
    }

    /// Load every catalog embedded at build time
    pub fn load_embedded(&self) -> Result<()> {
        let mut sources: HashMap<String, Vec<String>> = HashMap::new();

        for file in Catalogs::iter() {
            let name = file.as_ref();
            let Some((locale, file_name)) = name.split_once('/') else {
                continue;
            };
            if !file_name.ends_with(".ftl") {
                continue;
            }
            if let Some(content) = Catalogs::get(name) {
                let text = String::from_utf8_lossy(content.data.as_ref()).into_owned();
                sources.entry(locale.to_string()).or_default().push(text);
            }
        }

        for (locale, texts) in sources {
            self.add_locale(&locale, texts)?;
        }

        Ok(())
    }

    /// Load translations from a directory, overriding embedded catalogs
    pub fn load_from_dir(&self, dir: &std::path::Path) -> Result<()> {
        let io_err = |e: std::io::Error| AppError::Catalog(e.to_string());

        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();

            if path.is_dir() {
                let Some(locale) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };

                let mut texts = Vec::new();
                for file in std::fs::read_dir(&path).map_err(io_err)? {
                    let file = file.map_err(io_err)?.path();
                    if file.extension().map_or(false, |ext| ext == "ftl") {
                        texts.push(std::fs::read_to_string(&file).map_err(io_err)?);
                    }
                }

                self.add_locale(locale, texts)?;
            }
        }

        Ok(())
    }

    /// Build and register the bundle for one locale
    fn add_locale(&self, locale: &str, sources: Vec<String>) -> Result<()> {
        let lang_id: LanguageIdentifier = locale
            .parse()
            .map_err(|e| AppError::Catalog(format!("Invalid locale {}: {}", locale, e)))?;

        let mut bundle = FluentBundle::new(vec![lang_id]);
        bundle.set_use_isolating(false);

        for source in sources {
            let resource = FluentResource::try_new(source).map_err(|(_, errors)| {
                AppError::Catalog(format!("Fluent parse errors in {}: {:?}", locale, errors))
            })?;

            bundle.add_resource(resource).map_err(|errors| {
                AppError::Catalog(format!("Fluent bundle errors in {}: {:?}", locale, errors))
            })?;
        }

        self.bundles.write().insert(locale.to_string(), Arc::new(bundle));
        tracing::debug!("Loaded locale: {}", locale);

        Ok(())
    }

    /// Set the current locale; unknown locales are rejected
    pub fn set_locale(&self, locale: &str) -> bool {
        if self.bundles.read().contains_key(locale) {
            *self.current_locale.write() = locale.to_string();
            true
        } else {
            false
        }
    }

    /// Get the current locale
    pub fn current_locale(&self) -> String {
        self.current_locale.read().clone()
    }

    /// Get a localized string
    pub fn get(&self, key: &str) -> String {
        self.get_with_args(key, None)
    }

    /// Get a localized string with arguments.
    ///
    /// Falls back to the default locale's text, then to the key itself.
    pub fn get_with_args(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let bundles = self.bundles.read();
        let current = self.current_locale.read().clone();

        if let Some(text) = bundles.get(&current).and_then(|b| format_message(b, key, args)) {
            return text;
        }

        if current != self.fallback_locale {
            if let Some(text) = bundles
                .get(&self.fallback_locale)
                .and_then(|b| format_message(b, key, args))
            {
                return text;
            }
        }

        key.to_string()
    }

    /// Get available locales
    pub fn available_locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.bundles.read().keys().cloned().collect();
        locales.sort();
        locales
    }
}

fn format_message(
    bundle: &FluentBundle<FluentResource>,
    key: &str,
    args: Option<&FluentArgs>,
) -> Option<String> {
    let pattern = bundle.get_message(key)?.value()?;
    let mut errors = Vec::new();
    let result = bundle.format_pattern(pattern, args, &mut errors);
    errors.is_empty().then(|| result.into_owned())
}

impl Default for I18n {
    fn default() -> Self {
        Self::new(Locale::DEFAULT.as_str())
    }
}

/// Convenience macro for getting localized strings
#[macro_export]
macro_rules! t {
    ($i18n:expr, $key:expr) => {
        $i18n.get($key)
    };
    ($i18n:expr, $key:expr, $($arg_name:ident = $arg_value:expr),+ $(,)?) => {{
        let mut args = $crate::i18n::FluentArgs::new();
        $(
            args.set(stringify!($arg_name), $arg_value);
        )+
        $i18n.get_with_args($key, Some(&args))
    }};
}
