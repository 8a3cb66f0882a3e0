//! Per-project loading flags
//!
//! Each known project key carries a flag that only ever goes from loading to
//! ready. Completion comes from staggered timers or from gallery data,
//! depending on the [`LoadingPolicy`] chosen at construction.

use crate::error::{AppError, Result};
use crate::gallery::GalleryCache;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Key `n` in the project list becomes ready after `(n + 1) * base_interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaggeredDelay {
    base_interval: Duration,
}

impl StaggeredDelay {
    pub fn new(base_interval: Duration) -> Self {
        Self { base_interval }
    }

    pub fn delay_for(&self, index: usize) -> Duration {
        let steps = u32::try_from(index + 1).unwrap_or(u32::MAX);
        self.base_interval.saturating_mul(steps)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingPolicy {
    /// Fire-and-forget timers, one per project
    Timer(StaggeredDelay),
    /// Only `trigger_key` loads, until the gallery cache holds data
    DataDriven { trigger_key: String },
}

type Flags = Arc<RwLock<HashMap<String, bool>>>;

pub struct LoadingSimulator {
    projects: Vec<String>,
    policy: LoadingPolicy,
    flags: Flags,
}

impl LoadingSimulator {
    pub fn new(projects: Vec<String>, policy: LoadingPolicy) -> Self {
        if let LoadingPolicy::DataDriven { trigger_key } = &policy {
            if !projects.contains(trigger_key) {
                tracing::warn!(trigger_key = %trigger_key, "Loading trigger key is not a known project");
            }
        }

        Self {
            projects,
            policy,
            flags: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn policy(&self) -> &LoadingPolicy {
        &self.policy
    }

    /// Initialize flags for one view-group mount.
    ///
    /// Flags that already settled stay settled. Timer mode must run inside a
    /// tokio runtime.
    pub fn init(&self, gallery: &GalleryCache) -> Result<()> {
        match &self.policy {
            LoadingPolicy::Timer(delay) => self.init_timers(*delay),
            LoadingPolicy::DataDriven { trigger_key } => {
                self.init_data_driven(trigger_key, !gallery.is_empty());
                Ok(())
            }
        }
    }

    fn init_timers(&self, delay: StaggeredDelay) -> Result<()> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| AppError::Init(format!("timer loading needs a tokio runtime: {}", e)))?;

        {
            let mut flags = self.flags.write();
            for key in &self.projects {
                flags.entry(key.clone()).or_insert(true);
            }
        }

        for (index, key) in self.projects.iter().enumerate() {
            let flags = Arc::downgrade(&self.flags);
            let key = key.clone();
            let wait = delay.delay_for(index);

            handle.spawn(async move {
                tokio::time::sleep(wait).await;
                finish(&flags, &key);
            });
        }

        tracing::debug!(count = self.projects.len(), "Loading timers scheduled");
        Ok(())
    }

    fn init_data_driven(&self, trigger_key: &str, has_data: bool) {
        let mut flags = self.flags.write();
        for key in &self.projects {
            let loading = key == trigger_key && !has_data;
            let flag = flags.entry(key.clone()).or_insert(loading);
            *flag = *flag && loading;
        }
    }

    /// The gallery cache was populated; in data-driven mode the trigger key is ready
    pub fn on_gallery_populated(&self) {
        match &self.policy {
            LoadingPolicy::DataDriven { trigger_key } => {
                if let Some(flag) = self.flags.write().get_mut(trigger_key) {
                    *flag = false;
                }
                tracing::debug!(key = %trigger_key, "Gallery populated");
            }
            LoadingPolicy::Timer(_) => {}
        }
    }

    /// Flag for `key`; `None` before the first initialization
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.flags.read().get(key).copied()
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.flag(key).unwrap_or(false)
    }

    /// Flags in project order
    pub fn snapshot(&self) -> Vec<(String, bool)> {
        let flags = self.flags.read();
        self.projects
            .iter()
            .map(|key| (key.clone(), flags.get(key).copied().unwrap_or(false)))
            .collect()
    }

    /// Every known project has an entry and none is loading
    pub fn all_settled(&self) -> bool {
        let flags = self.flags.read();
        self.projects.iter().all(|key| flags.get(key) == Some(&false))
    }
}

/// Timer completion; a no-op once the simulator is gone
fn finish(flags: &Weak<RwLock<HashMap<String, bool>>>, key: &str) {
    match flags.upgrade() {
        Some(flags) => {
            if let Some(flag) = flags.write().get_mut(key) {
                *flag = false;
            }
            tracing::trace!(key, "Loading finished");
        }
        None => tracing::trace!(key, "Loading timer fired after unmount"),
    }
}
