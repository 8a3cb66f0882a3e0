//! Application state management

use crate::chat::ChatLog;
use crate::gallery::{GalleryCache, GalleryItem};
use crate::i18n::I18n;
use crate::loading::LoadingSimulator;
use crate::locale::{LanguageResolver, Locale, PlatformLocale};
use crate::preference::Preference;
use crate::search::{ImageSearch, SearchRequest};
use crate::theme::{DocumentRoot, Theme, ThemeController};
use crate::{AppConfig, AppError, Result};
use app_storage::KeyValueStore;
use parking_lot::RwLock;
use std::sync::Arc;

/// Main application state
pub struct AppState {
    /// Application configuration
    pub config: RwLock<AppConfig>,

    /// Message catalogs
    pub i18n: I18n,

    /// `lang` preference and startup resolution
    pub language: LanguageResolver,

    /// `theme` preference and document marker
    pub theme: ThemeController,

    /// Session-scoped gallery snapshot
    pub gallery: GalleryCache,

    /// Per-project loading flags
    pub loading: LoadingSimulator,

    /// Chat demo log
    pub chat: ChatLog,

    /// Global busy indicator
    busy: RwLock<bool>,
}

impl AppState {
    /// Create a new application state over the given storage backends
    pub fn new(
        config: AppConfig,
        local: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        platform: Box<dyn PlatformLocale>,
        root: Arc<dyn DocumentRoot>,
    ) -> Result<Self> {
        let i18n = I18n::with_embedded_catalogs()?;
        let gallery = GalleryCache::new(session, config.gallery.session_key.clone());
        let loading = LoadingSimulator::new(config.loading.projects.clone(), config.loading_policy());

        Ok(Self {
            i18n,
            language: LanguageResolver::new(local.clone(), platform),
            theme: ThemeController::new(local, root),
            gallery,
            loading,
            chat: ChatLog::new(),
            busy: RwLock::new(false),
            config: RwLock::new(config),
        })
    }

    /// Application start: apply the stored theme and resolve the language
    pub fn bootstrap(&self) -> Result<(Locale, Theme)> {
        let theme = self.theme.init()?;
        let locale = self.language.resolve()?;
        self.activate_catalog(locale);

        tracing::info!(locale = %locale, theme = %theme, "Application bootstrapped");
        Ok((locale, theme))
    }

    /// Persist a new language and switch catalogs
    pub fn set_language(&self, locale: Locale) -> Result<()> {
        self.language.set_language(locale)?;
        self.activate_catalog(locale);
        Ok(())
    }

    /// Untyped language setter; unsupported tags are ignored
    pub fn set_language_raw(&self, raw: &str) -> Result<bool> {
        match Locale::parse(raw) {
            Some(locale) => self.set_language(locale).map(|_| true),
            None => {
                tracing::debug!(raw, "Ignoring unsupported language");
                Ok(false)
            }
        }
    }

    fn activate_catalog(&self, locale: Locale) {
        if !self.i18n.set_locale(locale.as_str()) {
            tracing::warn!(locale = %locale, "No catalog for locale, using fallback");
        }
        self.chat.set_default_username(self.tr("chat-default-username"));
    }

    /// Portfolio view group mount: rehydrate the gallery, then start loading flags
    pub fn mount_portfolio(&self) -> Result<()> {
        self.gallery.load();
        self.loading.init(&self.gallery)
    }

    /// Run one search and cache its results.
    ///
    /// Failures are logged and returned as [`AppError::Fetch`]; the cache is
    /// left untouched.
    pub async fn fetch_gallery(&self, search: &dyn ImageSearch, request: &SearchRequest) -> Result<usize> {
        self.set_loading(true);
        let outcome = search.search(request).await;
        self.set_loading(false);

        let results = match outcome {
            Ok(results) => results,
            Err(e) => {
                tracing::error!(query = %request.query, "Image search failed: {}", e);
                return Err(match e {
                    AppError::Fetch(msg) => AppError::Fetch(msg),
                    other => AppError::Fetch(other.to_string()),
                });
            }
        };

        let items = results
            .results
            .iter()
            .map(GalleryItem::from_record)
            .collect::<Result<Vec<_>>>()?;
        let count = items.len();

        self.gallery.replace(items)?;
        self.loading.on_gallery_populated();

        tracing::info!(query = %request.query, count, total = results.total, "Gallery updated");
        Ok(count)
    }

    /// Translate `key` in the active locale
    pub fn tr(&self, key: &str) -> String {
        self.i18n.get(key)
    }

    pub fn set_loading(&self, loading: bool) {
        *self.busy.write() = loading;
    }

    pub fn is_loading(&self) -> bool {
        *self.busy.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::FixedLocale;
    use crate::search::{Attribution, AttributionLinks, ImageRecord, ImageUrls, SearchResults};
    use crate::theme::ClassList;
    use crate::LoadingMode;
    use app_storage::MemoryStore;
    use async_trait::async_trait;

    struct StaticSearch(Option<SearchResults>);

    #[async_trait]
    impl ImageSearch for StaticSearch {
        async fn search(&self, _request: &SearchRequest) -> Result<SearchResults> {
            self.0
                .clone()
                .ok_or_else(|| AppError::Fetch("HTTP 401".to_string()))
        }
    }

    fn record(id: &str) -> ImageRecord {
        ImageRecord {
            id: id.to_string(),
            urls: ImageUrls {
                raw: format!("https://img/{id}/raw"),
                full: format!("https://img/{id}/full"),
                regular: format!("https://img/{id}/regular"),
                small: format!("https://img/{id}/small"),
                thumb: format!("https://img/{id}/thumb"),
            },
            width: 300,
            height: 200,
            aspect_ratio: None,
            alt_description: Some("hills".to_string()),
            user: Attribution {
                name: "Ann".to_string(),
                links: AttributionLinks {
                    html: "https://example/@ann".to_string(),
                },
            },
        }
    }

    fn state(hint: Option<&str>) -> (Arc<ClassList>, AppState) {
        let mut config = AppConfig::default();
        config.loading.mode = LoadingMode::DataDriven;
        let root = Arc::new(ClassList::new());
        let state = AppState::new(
            config,
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryStore::new()),
            Box::new(FixedLocale(hint.map(str::to_string))),
            root.clone(),
        )
        .unwrap();
        (root, state)
    }

    #[test]
    fn bootstrap_applies_theme_and_catalog() {
        let (root, state) = state(Some("zh-HK"));
        let (locale, theme) = state.bootstrap().unwrap();

        assert_eq!(locale, Locale::ZhTw);
        assert_eq!(theme, Theme::Light);
        assert_eq!(root.classes(), vec!["theme-light".to_string()]);
        assert_eq!(state.i18n.current_locale(), "zh-TW");
        assert_eq!(state.tr("theme-dark"), "深色");
    }

    #[test]
    fn set_language_switches_catalog() {
        let (_, state) = state(None);
        state.bootstrap().unwrap();
        assert_eq!(state.tr("theme-dark"), "Dark");

        state.set_language(Locale::Zh).unwrap();
        assert_eq!(state.language.current(), Locale::Zh);
        assert_eq!(state.i18n.current_locale(), "zh");

        assert!(!state.set_language_raw("fr").unwrap());
        assert_eq!(state.language.current(), Locale::Zh);
    }

    #[test]
    fn chat_username_follows_catalog_until_chosen() {
        let (_, state) = state(Some("zh-CN"));
        state.bootstrap().unwrap();
        assert_eq!(state.chat.username(), "访客");

        state.set_language(Locale::ZhTw).unwrap();
        assert_eq!(state.chat.username(), "訪客");

        state.chat.set_username("ada");
        state.set_language(Locale::En).unwrap();
        assert_eq!(state.chat.username(), "ada");
    }

    #[tokio::test]
    async fn fetch_populates_gallery_and_clears_trigger() {
        let (_, state) = state(None);
        state.mount_portfolio().unwrap();
        assert!(state.loading.is_loading("gallery"));

        let search = StaticSearch(Some(SearchResults {
            total: 2,
            total_pages: 1,
            results: vec![record("a"), record("b")],
        }));
        let count = state
            .fetch_gallery(&search, &SearchRequest::new("hills", "key"))
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(state.gallery.len(), 2);
        assert!(!state.loading.is_loading("gallery"));
        assert!(!state.is_loading());

        let first: ImageRecord = state.gallery.items()[0].to_record().unwrap();
        assert_eq!(first.id, "a");
    }

    #[tokio::test]
    async fn fetch_failure_leaves_cache_untouched() {
        let (_, state) = state(None);
        state.mount_portfolio().unwrap();

        let err = state
            .fetch_gallery(&StaticSearch(None), &SearchRequest::new("hills", "key"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Fetch(_)));
        assert!(state.gallery.is_empty());
        assert!(state.loading.is_loading("gallery"));
        assert!(!state.is_loading());
    }
}
