//! Startup wiring and terminal output

use crate::Cli;
use anyhow::{Context, Result};
use app_core::{
    t, AppConfig, AppState, ClassList, LoadingPolicy, Preference, SystemLocale, Theme,
};
use app_storage::MemoryStore;
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    let data_dir = config.data_dir();
    let local = app_storage::open_local(&data_dir)
        .with_context(|| format!("Failed to open preference store in {:?}", data_dir))?;
    let root = Arc::new(ClassList::new());

    let state = AppState::new(
        config,
        Arc::new(local),
        Arc::new(MemoryStore::new()),
        Box::new(SystemLocale),
        root.clone(),
    )?;
    state.bootstrap()?;

    if let Some(lang) = &cli.lang {
        if !state.set_language_raw(lang)? {
            tracing::warn!(lang = %lang, "Unsupported language ignored");
        }
    }
    if let Some(theme) = &cli.theme {
        if !state.theme.set_theme_raw(theme)? {
            tracing::warn!(theme = %theme, "Unsupported theme ignored");
        }
    }
    if cli.toggle_dark {
        state.theme.toggle_dark()?;
    }

    print_preferences(&state, &root);

    if cli.simulate_loading {
        simulate_loading(&state).await?;
    }

    tracing::info!("Folio finished");
    Ok(())
}

fn print_preferences(state: &AppState, root: &ClassList) {
    let theme: Theme = state.theme.current();

    println!("{}", state.tr("app-title"));
    println!(
        "  {}: {} ({})",
        state.tr("language-label"),
        state.tr("language-name"),
        state.language.current().as_str()
    );
    println!("  {}: {}", state.tr("theme-label"), state.tr(theme.label_key()));
    println!("  {}: {}", state.tr("markers-label"), root.classes().join(" "));

    let cached = state.gallery.len();
    if cached == 0 {
        println!("  {}", state.tr("gallery-empty"));
    } else {
        println!("  {}", t!(state.i18n, "gallery-count", count = cached));
    }
}

async fn simulate_loading(state: &AppState) -> Result<()> {
    state.mount_portfolio()?;
    let mut last = state.loading.snapshot();
    print_loading(state, &last);

    // Data-driven flags only settle once a search populates the gallery
    if matches!(state.loading.policy(), LoadingPolicy::DataDriven { .. }) {
        return Ok(());
    }

    while !state.loading.all_settled() {
        tokio::time::sleep(POLL_INTERVAL).await;
        let snapshot = state.loading.snapshot();
        if snapshot != last {
            print_loading(state, &snapshot);
            last = snapshot;
        }
    }

    Ok(())
}

fn print_loading(state: &AppState, snapshot: &[(String, bool)]) {
    let pending = state.tr("loading-pending");
    let done = state.tr("loading-done");

    println!("{}:", state.tr("loading-label"));
    for (key, loading) in snapshot {
        println!("  {:<10} {}", key, if *loading { &pending } else { &done });
    }
}
