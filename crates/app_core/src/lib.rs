//! Folio Core Domain Logic
//!
//! This crate contains:
//! - Application state management
//! - Persisted preferences (language, theme)
//! - Gallery session cache and image search interface
//! - Loading flags
//! - Configuration
//! - Error types

pub mod chat;
pub mod config;
pub mod error;
pub mod gallery;
pub mod html;
pub mod i18n;
pub mod loading;
pub mod locale;
pub mod preference;
pub mod search;
pub mod state;
pub mod theme;

pub use chat::{ChatLog, ChatMessage};
pub use config::{AppConfig, GalleryConfig, LoadingConfig, LoadingMode, LoggingConfig, StorageConfig};
pub use error::{AppError, Result};
pub use gallery::{GalleryCache, GalleryItem, GALLERY_STORAGE_KEY};
pub use html::{escape_html, safe_html};
pub use i18n::I18n;
pub use loading::{LoadingPolicy, LoadingSimulator, StaggeredDelay};
pub use locale::{FixedLocale, LanguageResolver, Locale, PlatformLocale, SystemLocale};
pub use preference::{Preference, PreferenceStore};
pub use search::{ImageRecord, ImageSearch, SearchRequest, SearchResults};
pub use state::AppState;
pub use theme::{apply_theme_marker, ClassList, DocumentRoot, Theme, ThemeController};
