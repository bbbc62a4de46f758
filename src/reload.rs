// Configuration hot reload module
// Handles SIGHUP signal to swap in a new source registry without downtime

use crate::config::Config;
use crate::error::ConfigError;
use crate::router::Registry;
use arc_swap::ArcSwap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Registry snapshot shared by every request.
///
/// Readers get an `Arc` to the current snapshot and never block; a reload
/// replaces the whole snapshot at once, so in-flight requests keep routing
/// against the registry they started with.
#[derive(Debug)]
pub struct SharedRegistry {
    current: ArcSwap<Registry>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            current: ArcSwap::from_pointee(registry),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Registry> {
        self.current.load_full()
    }

    /// Atomically replace the snapshot.
    pub fn store(&self, registry: Registry) {
        self.current.store(Arc::new(registry));
    }
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new(Registry::empty())
    }
}

/// ReloadManager handles configuration reload via SIGHUP signal
pub struct ReloadManager {
    config_path: PathBuf,
    reload_requested: Arc<AtomicBool>,
    generation: u64,
}

impl ReloadManager {
    /// Create a new ReloadManager with the config file path
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            reload_requested: Arc::new(AtomicBool::new(false)),
            generation: 0,
        }
    }

    /// Register SIGHUP signal handler
    #[cfg(unix)]
    pub fn register_signal_handler(&self) -> Result<(), std::io::Error> {
        use signal_hook::consts::SIGHUP;
        use signal_hook::flag;

        flag::register(SIGHUP, Arc::clone(&self.reload_requested))?;
        Ok(())
    }

    /// Check if reload was requested via SIGHUP
    pub fn is_reload_requested(&self) -> bool {
        self.reload_requested.load(Ordering::Relaxed)
    }

    /// Mark a reload as requested without a signal
    pub fn request_reload(&self) {
        self.reload_requested.store(true, Ordering::Relaxed);
    }

    /// Clear the reload request flag
    pub fn clear_reload_request(&self) {
        self.reload_requested.store(false, Ordering::Relaxed);
    }

    /// Load, validate and convert the config file, then swap its registry in.
    ///
    /// Nothing is swapped unless every source converts, so a bad file leaves
    /// the previous snapshot serving.
    pub fn reload_into(&mut self, shared: &SharedRegistry) -> Result<Config, ConfigError> {
        let mut config = Config::from_file(&self.config_path)?;
        let registry = config.registry()?;

        self.generation += 1;
        config.generation = self.generation;
        shared.store(registry);
        self.clear_reload_request();

        tracing::info!(
            config_file = %self.config_path.display(),
            generation = config.generation,
            sources = config.sources.len(),
            "Source registry reloaded"
        );

        Ok(config)
    }

    /// Reload only if a request is pending; returns the new config if one was applied.
    pub fn reload_if_requested(
        &mut self,
        shared: &SharedRegistry,
    ) -> Result<Option<Config>, ConfigError> {
        if !self.is_reload_requested() {
            return Ok(None);
        }
        match self.reload_into(shared) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                self.clear_reload_request();
                tracing::warn!(
                    config_file = %self.config_path.display(),
                    error = %err,
                    "Config reload failed, keeping previous registry"
                );
                Err(err)
            }
        }
    }

    /// Get the config file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Number of successful reloads so far
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
