//! End-to-end startup over real storage backends

use app_core::{
    AppConfig, AppState, ClassList, FixedLocale, GalleryItem, Locale, LoadingMode, Theme,
};
use app_storage::{KeyValueStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    local: Arc<dyn KeyValueStore>,
    session: Arc<MemoryStore>,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let local = Arc::new(app_storage::open_local(dir.path()).unwrap());
        Self {
            _dir: dir,
            local,
            session: Arc::new(MemoryStore::new()),
        }
    }

    fn start(&self, config: AppConfig, hint: Option<&str>) -> (Arc<ClassList>, AppState) {
        let root = Arc::new(ClassList::new());
        let state = AppState::new(
            config,
            self.local.clone(),
            self.session.clone(),
            Box::new(FixedLocale(hint.map(str::to_string))),
            root.clone(),
        )
        .unwrap();
        (root, state)
    }
}

fn data_driven() -> AppConfig {
    let mut config = AppConfig::default();
    config.loading.mode = LoadingMode::DataDriven;
    config
}

#[test]
fn preferences_survive_restart() {
    let harness = Harness::new();

    let (_, first) = harness.start(data_driven(), Some("zh-CN"));
    assert_eq!(first.bootstrap().unwrap(), (Locale::Zh, Theme::Light));
    first.set_language(Locale::ZhTw).unwrap();
    assert_eq!(first.theme.toggle_dark().unwrap(), Theme::Dark);
    drop(first);

    // A different platform hint must not override the stored choice
    let (root, second) = harness.start(data_driven(), Some("en-US"));
    assert_eq!(second.bootstrap().unwrap(), (Locale::ZhTw, Theme::Dark));
    assert_eq!(root.classes(), vec!["theme-dark".to_string()]);
    assert_eq!(harness.local.get_item("lang").unwrap().as_deref(), Some("zh-TW"));
}

#[test]
fn invalid_stored_values_fall_back() {
    let harness = Harness::new();
    harness.local.set_item("lang", "klingon").unwrap();
    harness.local.set_item("theme", "neon").unwrap();

    let (root, state) = harness.start(data_driven(), None);
    assert_eq!(state.bootstrap().unwrap(), (Locale::En, Theme::Light));
    assert_eq!(root.classes(), vec!["theme-light".to_string()]);
    assert_eq!(harness.local.get_item("lang").unwrap().as_deref(), Some("en"));
}

#[test]
fn remount_with_cached_gallery_is_ready_immediately() {
    let harness = Harness::new();

    let (_, first) = harness.start(data_driven(), None);
    first.mount_portfolio().unwrap();
    assert!(first.loading.is_loading("gallery"));
    first
        .gallery
        .replace(vec![GalleryItem::new(serde_json::json!({ "id": "x" }))])
        .unwrap();
    drop(first);

    let (_, second) = harness.start(data_driven(), None);
    second.mount_portfolio().unwrap();
    assert_eq!(second.gallery.len(), 1);
    assert!(second.loading.all_settled());
}

#[tokio::test(start_paused = true)]
async fn timer_mount_settles_every_project() {
    let harness = Harness::new();
    let mut config = AppConfig::default();
    config.loading.mode = LoadingMode::Timer;
    config.loading.base_interval_ms = 1000;

    let (_, state) = harness.start(config, None);
    state.mount_portfolio().unwrap();
    assert!(state.loading.snapshot().iter().all(|(_, loading)| *loading));

    tokio::time::sleep(Duration::from_millis(1001)).await;
    assert_eq!(state.loading.flag("todo"), Some(false));
    assert_eq!(state.loading.flag("chat"), Some(true));

    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert!(state.loading.all_settled());
}
