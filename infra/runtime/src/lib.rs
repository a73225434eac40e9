//! # Runtime
//!
//! Tokio runtime profiles shared by the workspace binaries.
//!
//! * **Interactive**: the portal CLI. A handful of workers is plenty for one user issuing
//!   sequential requests, and idle threads are released quickly.
//! * **Service**: the sandbox API. One worker per core and longer keep-alive.
//!
//! ```rust,ignore
//! #[ctn_runtime::main(interactive)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use ctn_derive::main;

use anyhow::Context;
use std::num::NonZero;
use std::thread::available_parallelism;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

const FALLBACK_WORKERS: usize = 4;
const MAX_WORKERS: usize = 512;
const MIN_STACK_SIZE: usize = 1024 * 1024;
const MAX_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Worker count from `TOKIO_WORKER_THREADS`, falling back to available parallelism.
fn detected_workers() -> usize {
    std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|n| (1..=MAX_WORKERS).contains(n))
        .unwrap_or_else(|| available_parallelism().map_or(FALLBACK_WORKERS, NonZero::get))
}

/// Configuration for the Tokio runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            worker_threads: detected_workers(),
            stack_size: 2 * 1024 * 1024,
            thread_name: "ctn-worker".to_owned(),
            thread_keep_alive: Duration::from_secs(60),
        }
    }
}

impl RuntimeConfig {
    /// Profile for the portal CLI.
    #[must_use]
    pub fn interactive() -> Self {
        Self {
            worker_threads: detected_workers().clamp(1, 2),
            thread_name: "ctn-portal".to_owned(),
            thread_keep_alive: Duration::from_secs(10),
            ..Self::default()
        }
    }

    /// Profile for the sandbox API server.
    #[must_use]
    pub fn service() -> Self {
        Self {
            stack_size: 4 * 1024 * 1024,
            thread_name: "ctn-sandbox".to_owned(),
            thread_keep_alive: Duration::from_secs(300),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKERS);
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.thread_name = name;
        }
        self
    }
}

/// Builds a multi-threaded runtime with I/O and timers enabled.
///
/// # Errors
///
/// Returns an error if the OS refuses to spawn the worker threads.
pub fn build_runtime(config: &RuntimeConfig) -> Result<Runtime> {
    let workers = config.worker_threads.clamp(1, MAX_WORKERS);
    let stack = config.stack_size.clamp(MIN_STACK_SIZE, MAX_STACK_SIZE);
    debug!(workers, stack, name = %config.thread_name, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(workers)
        .thread_name(&config.thread_name)
        .thread_stack_size(stack)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .context("Failed to initialize the tokio runtime")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_profile_stays_small() {
        let config = RuntimeConfig::interactive();
        assert!(config.worker_threads <= 2);
        assert_eq!(config.thread_name, "ctn-portal");
    }

    #[test]
    fn builder_methods_clamp_values() {
        let config = RuntimeConfig::service().with_worker_threads(0).with_stack_size(16);
        assert_eq!(config.worker_threads, 1);
        assert_eq!(config.stack_size, MIN_STACK_SIZE);

        let config = config.with_worker_threads(10_000).with_stack_size(usize::MAX);
        assert_eq!(config.worker_threads, MAX_WORKERS);
        assert_eq!(config.stack_size, MAX_STACK_SIZE);
    }

    #[test]
    fn blank_thread_name_is_ignored() {
        let config = RuntimeConfig::default().with_thread_name("  ");
        assert_eq!(config.thread_name, "ctn-worker");
    }

    #[test]
    fn runtime_runs_futures() -> Result<()> {
        let runtime = build_runtime(&RuntimeConfig::interactive())?;
        let value = runtime.block_on(async { 21 * 2 });
        assert_eq!(value, 42);
        Ok(())
    }
}
