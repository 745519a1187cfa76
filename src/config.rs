use crate::error::{Error, Result};

/// Default bound on accepted-but-not-completed submissions.
pub const DEFAULT_MAX_PENDING: usize = 10_000;

/// Runtime configuration for a [`StrandExecutor`](crate::StrandExecutor).
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of worker threads. `None` uses the number of logical CPUs.
    pub worker_threads: Option<usize>,
    /// Maximum number of submissions accepted but not yet completed.
    ///
    /// This is the authoritative back-pressure bound: once the in-flight
    /// count reaches it, `submit` returns `false` until work drains.
    pub max_pending: usize,
    /// Prefix for worker thread names.
    pub thread_name_prefix: String,
    /// Stack size for worker threads.
    pub stack_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_threads: None,
            max_pending: DEFAULT_MAX_PENDING,
            thread_name_prefix: "strand-worker".to_string(),
            stack_size: Some(2 * 1024 * 1024),
        }
    }
}

impl Config {
    /// Start building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(n) = self.worker_threads {
            if n == 0 {
                return Err(Error::config("worker_threads must be > 0"));
            }
            if n > 1024 {
                return Err(Error::config("worker_threads too large (max 1024)"));
            }
        }

        if self.max_pending == 0 {
            return Err(Error::config("max_pending must be > 0"));
        }

        Ok(())
    }

    /// Effective worker count.
    pub fn worker_count(&self) -> usize {
        self.worker_threads.unwrap_or_else(num_cpus::get)
    }
}

/// Builder for [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Set the number of worker threads.
    pub fn worker_threads(mut self, n: usize) -> Self {
        self.config.worker_threads = Some(n);
        self
    }

    /// Set the in-flight submission bound.
    pub fn max_pending(mut self, n: usize) -> Self {
        self.config.max_pending = n;
        self
    }

    /// Set the worker thread name prefix.
    pub fn thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Set the worker thread stack size.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.config.stack_size = Some(size);
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
