//! Shared, read-only parameters for a single run.

use crate::output::{OutputSink, StdoutSink};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Execution context threaded through every `execute` call.
///
/// A context is built once per run and handed down the execution tree by
/// shared reference. Nothing in the library mutates it.
///
/// # Examples
///
/// ```
/// use dandori_core::ExecutionContext;
///
/// let ctx = ExecutionContext::new("/tmp")
///     .with_dry_run(true)
///     .with_env("APP_ENV", "staging");
///
/// assert!(ctx.is_dry_run());
/// assert_eq!(ctx.env("APP_ENV"), Some("staging"));
/// assert_eq!(ctx.env("MISSING"), None);
/// ```
#[derive(Clone)]
pub struct ExecutionContext {
    /// Working directory for child processes
    cwd: PathBuf,

    /// Whether side effects are replaced by description lines
    dry_run: bool,

    /// Environment overrides merged over the ambient process environment
    environment: HashMap<String, String>,

    /// Channel for user-facing lines such as dry-run descriptions
    output: Arc<dyn OutputSink>,
}

impl ExecutionContext {
    /// Creates a context rooted at `cwd` with no overrides, dry-run off and
    /// output going to stdout.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            dry_run: false,
            environment: HashMap::new(),
            output: Arc::new(StdoutSink),
        }
    }

    /// Creates a context rooted at the current process working directory.
    pub fn current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Add a single environment override
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    /// Replace all environment overrides
    pub fn with_environment(mut self, env: HashMap<String, String>) -> Self {
        self.environment = env;
        self
    }

    /// Set the output sink
    pub fn with_output(mut self, output: Arc<dyn OutputSink>) -> Self {
        self.output = output;
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Get a single environment override
    pub fn env(&self, key: &str) -> Option<&str> {
        self.environment.get(key).map(|s| s.as_str())
    }

    /// Get all environment overrides. Empty means "inherit only".
    pub fn environment(&self) -> &HashMap<String, String> {
        &self.environment
    }

    pub fn output(&self) -> &dyn OutputSink {
        self.output.as_ref()
    }
}

impl fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("cwd", &self.cwd)
            .field("dry_run", &self.dry_run)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
