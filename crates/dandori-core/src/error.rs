//! Error types for action and plan execution.

use thiserror::Error;

/// Boxed error produced by user-supplied handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An external command could not be run to successful completion.
///
/// Every variant carries the rendered command string.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CommandError {
    /// The command builder produced nothing to run.
    #[error("command is empty")]
    Empty,

    /// The process could not be spawned.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but did not exit successfully.
    ///
    /// `code` is `None` when the process was terminated by a signal.
    #[error("`{command}` exited with {}: {stderr}", exit_label(.code))]
    Exit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl CommandError {
    /// The command that failed, if one was built.
    pub fn command(&self) -> Option<&str> {
        match self {
            CommandError::Empty => None,
            CommandError::Spawn { command, .. } | CommandError::Exit { command, .. } => {
                Some(command)
            }
        }
    }
}

/// Errors that can occur while executing an action or plan.
///
/// A plan does not wrap the errors of its members: when a member fails, the
/// plan fails with exactly that member's error.
///
/// # Non-Exhaustive
///
/// Always include a wildcard arm when matching:
///
/// ```
/// use dandori_core::{ActionError, CommandError};
///
/// fn report(error: &ActionError) -> String {
///     match error {
///         ActionError::Handler(inner) => format!("handler failed: {}", inner),
///         ActionError::Command(CommandError::Exit { code, .. }) => {
///             format!("command exited with {:?}", code)
///         }
///         other => other.to_string(),
///     }
/// }
/// ```
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ActionError {
    /// A handler function failed. Displayed exactly as the handler's error.
    #[error(transparent)]
    Handler(BoxError),

    /// An external command failed to spawn or exited unsuccessfully.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The action's parameters could not be rendered into a description.
    #[error("failed to describe action parameters: {0}")]
    Describe(#[source] serde_json::Error),
}

impl ActionError {
    /// Converts a handler error, passing an `ActionError` through unchanged.
    pub fn from_handler(error: impl Into<BoxError>) -> Self {
        match error.into().downcast::<ActionError>() {
            Ok(action_error) => *action_error,
            Err(other) => ActionError::Handler(other),
        }
    }

    /// Returns the handler's error when this is a handler failure.
    pub fn handler_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            ActionError::Handler(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

/// Result type for action operations.
pub type Result<T, E = ActionError> = std::result::Result<T, E>;
