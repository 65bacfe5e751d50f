use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::RenderingConfig;

/// Thread-safe handle to the live rendering configuration.
///
/// An editing thread mutates the config through the handle while render
/// workers take value snapshots; no worker ever observes a half-applied
/// update.
#[derive(Debug)]
pub struct SharedConfig {
    inner: Arc<RwLock<RenderingConfig>>,
}

impl Clone for SharedConfig {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(RenderingConfig::default())
    }
}

impl SharedConfig {
    /// Wraps an initial configuration, refreshing its camera basis first.
    pub fn new(mut config: RenderingConfig) -> Self {
        config.update_camera();
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Returns a copy of the current configuration.
    pub fn snapshot(&self) -> RenderingConfig {
        *self.inner.read()
    }

    /// Replaces the stored configuration wholesale, refreshing the camera
    /// basis so workers never snapshot a stale one.
    pub fn replace(&self, mut config: RenderingConfig) {
        config.update_camera();
        *self.inner.write() = config;
    }

    /// Applies a mutation under the write lock and recomputes the camera
    /// basis afterwards.
    pub fn update<F, R>(&self, updater: F) -> R
    where
        F: FnOnce(&mut RenderingConfig) -> R,
    {
        let mut guard = self.inner.write();
        let result = updater(&mut guard);
        guard.update_camera();
        result
    }

    /// Changes the output resolution. Zero dimensions are clamped to one
    /// pixel so the config stays valid during window minimization.
    pub fn resize(&self, width: u32, height: u32) {
        self.update(|config| {
            config.width = width.max(1);
            config.height = height.max(1);
        });
    }
}
