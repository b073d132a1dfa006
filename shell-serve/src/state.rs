//! Shared state for the static file server.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use shell::core::logger::{Logger, LoggerOptions};
use shell::io::config::ShellConfig;

pub const NAMESPACE: &str = "Serve";

/// Request logger options: debug on, retention from `[logger] max_entries`.
pub fn logger_options(config: &ShellConfig) -> LoggerOptions {
    LoggerOptions::new(NAMESPACE)
        .with_debug(true)
        .with_max_entries(config.logger.max_entries)
}

/// Shared state accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Directories searched in order for a requested file.
    pub roots: Arc<Vec<PathBuf>>,
    logger: Arc<Mutex<Logger>>,
}

impl AppState {
    pub fn new(roots: Vec<PathBuf>, logger: Logger) -> Self {
        Self {
            roots: Arc::new(roots),
            logger: Arc::new(Mutex::new(logger)),
        }
    }

    /// State for `config`: `serve.roots` resolved against `site.root`.
    pub fn from_config(config: &ShellConfig, logger: Logger) -> Self {
        let roots = config
            .serve
            .roots
            .iter()
            .map(|root| config.site.path(root))
            .collect();
        Self::new(roots, logger)
    }

    pub fn debug(&self, message: &str, meta: Value) {
        self.with_logger(|logger| logger.debug(message, meta));
    }

    pub fn info(&self, message: &str, meta: Value) {
        self.with_logger(|logger| logger.info(message, meta));
    }

    pub fn error(&self, message: &str, meta: Value) {
        self.with_logger(|logger| logger.error(message, meta));
    }

    /// Run `f` with the request logger locked.
    pub fn with_logger<T>(&self, f: impl FnOnce(&mut Logger) -> T) -> T {
        let mut logger = self.logger.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut logger)
    }
}
