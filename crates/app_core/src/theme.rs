//! Theme preference and document marker synchronization

use crate::error::Result;
use crate::preference::{Preference, PreferenceStore};
use app_storage::KeyValueStore;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Visual theme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[serde(rename = "theme-light")]
    Light,
    #[serde(rename = "theme-dark")]
    Dark,
    #[serde(rename = "theme-warm")]
    Warm,
}

impl Preference for Theme {
    const STORAGE_KEY: &'static str = "theme";
    const ALL: &'static [Self] = &[Theme::Light, Theme::Dark, Theme::Warm];
    const DEFAULT: Self = Theme::Light;

    fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "theme-light",
            Theme::Dark => "theme-dark",
            Theme::Warm => "theme-warm",
        }
    }
}

impl Theme {
    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    /// Dark unless already dark, in which case light. Warm counts as not dark.
    pub fn toggled_dark(self) -> Self {
        if self.is_dark() {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    /// Catalog key of the theme's display name
    pub fn label_key(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The element whose class list carries the theme marker
pub trait DocumentRoot: Send + Sync {
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
}

/// In-memory class list
#[derive(Debug, Default)]
pub struct ClassList {
    classes: RwLock<BTreeSet<String>>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the active classes, sorted
    pub fn classes(&self) -> Vec<String> {
        self.classes.read().iter().cloned().collect()
    }
}

impl DocumentRoot for ClassList {
    fn add_class(&self, class: &str) {
        self.classes.write().insert(class.to_string());
    }

    fn remove_class(&self, class: &str) {
        self.classes.write().remove(class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.read().contains(class)
    }
}

/// Leave exactly one theme marker on `root`: the one for `theme`.
///
/// Non-theme classes are untouched.
pub fn apply_theme_marker(root: &dyn DocumentRoot, theme: Theme) {
    for other in Theme::ALL.iter().filter(|t| **t != theme) {
        root.remove_class(other.as_str());
    }
    root.add_class(theme.as_str());
}

/// Owns the `theme` preference and keeps the document marker in step with it
pub struct ThemeController {
    store: PreferenceStore<Theme>,
    root: Arc<dyn DocumentRoot>,
}

impl ThemeController {
    pub fn new(storage: Arc<dyn KeyValueStore>, root: Arc<dyn DocumentRoot>) -> Self {
        Self {
            store: PreferenceStore::new(storage),
            root,
        }
    }

    /// Apply the stored theme, or the default when absent or invalid
    pub fn init(&self) -> Result<Theme> {
        let theme = self.store.stored().unwrap_or(Theme::DEFAULT);
        self.set_theme(theme)?;
        tracing::info!(theme = %theme, "Theme initialized");
        Ok(theme)
    }

    pub fn current(&self) -> Theme {
        self.store.get()
    }

    pub fn is_dark(&self) -> bool {
        self.current().is_dark()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        apply_theme_marker(self.root.as_ref(), theme);
        self.store.set(theme)
    }

    /// Untyped setter; unknown theme names are ignored
    pub fn set_theme_raw(&self, raw: &str) -> Result<bool> {
        match Theme::parse(raw) {
            Some(theme) => self.set_theme(theme).map(|_| true),
            None => {
                tracing::debug!(raw, "Ignoring unknown theme");
                Ok(false)
            }
        }
    }

    pub fn toggle_dark(&self) -> Result<Theme> {
        let next = self.current().toggled_dark();
        self.set_theme(next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_storage::MemoryStore;

    fn theme_markers(root: &ClassList) -> Vec<String> {
        root.classes()
            .into_iter()
            .filter(|c| Theme::parse(c).is_some())
            .collect()
    }

    fn controller(stored: Option<&str>) -> (Arc<MemoryStore>, Arc<ClassList>, ThemeController) {
        let storage = Arc::new(MemoryStore::new());
        if let Some(stored) = stored {
            storage.set_item("theme", stored).unwrap();
        }
        let root = Arc::new(ClassList::new());
        let controller = ThemeController::new(storage.clone(), root.clone());
        (storage, root, controller)
    }

    #[test]
    fn toggled_dark_is_pure() {
        assert_eq!(Theme::Light.toggled_dark(), Theme::Dark);
        assert_eq!(Theme::Warm.toggled_dark(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled_dark(), Theme::Light);
    }

    #[test]
    fn apply_marker_keeps_unrelated_classes() {
        let root = ClassList::new();
        root.add_class("no-scroll");
        root.add_class("theme-light");
        root.add_class("theme-warm");

        apply_theme_marker(&root, Theme::Dark);

        assert_eq!(root.classes(), vec!["no-scroll", "theme-dark"]);
    }

    #[test]
    fn init_applies_stored_theme() {
        let (_storage, root, controller) = controller(Some("theme-warm"));
        assert_eq!(controller.init().unwrap(), Theme::Warm);
        assert_eq!(theme_markers(&root), vec!["theme-warm"]);
    }

    #[test]
    fn init_discards_invalid_theme() {
        let (storage, root, controller) = controller(Some("theme-neon"));
        assert_eq!(controller.init().unwrap(), Theme::Light);
        assert_eq!(theme_markers(&root), vec!["theme-light"]);
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("theme-light"));
    }

    #[test]
    fn set_theme_is_idempotent() {
        let (storage, root, controller) = controller(None);
        controller.init().unwrap();

        controller.set_theme(Theme::Dark).unwrap();
        controller.set_theme(Theme::Dark).unwrap();

        assert_eq!(theme_markers(&root), vec!["theme-dark"]);
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("theme-dark"));
        assert!(controller.is_dark());
    }

    #[test]
    fn toggle_from_warm_oscillates_between_dark_and_light() {
        let (_storage, root, controller) = controller(Some("theme-warm"));
        controller.init().unwrap();

        assert_eq!(controller.toggle_dark().unwrap(), Theme::Dark);
        assert_eq!(controller.toggle_dark().unwrap(), Theme::Light);
        assert_eq!(controller.toggle_dark().unwrap(), Theme::Dark);
        assert_eq!(theme_markers(&root), vec!["theme-dark"]);
    }

    #[test]
    fn set_theme_raw_ignores_unknown_names() {
        let (storage, root, controller) = controller(Some("theme-dark"));
        controller.init().unwrap();

        assert!(!controller.set_theme_raw("dark").unwrap());
        assert_eq!(controller.current(), Theme::Dark);
        assert_eq!(theme_markers(&root), vec!["theme-dark"]);
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("theme-dark"));

        assert!(controller.set_theme_raw("theme-warm").unwrap());
        assert_eq!(theme_markers(&root), vec!["theme-warm"]);
    }
}
