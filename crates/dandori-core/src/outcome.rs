//! Results produced by executables.

use serde::{Deserialize, Serialize};

/// Captured output of a successfully completed command.
///
/// Text is kept exactly as the process wrote it; nothing is trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn new(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// The result of executing any [`Executable`](crate::Executable).
///
/// # Examples
///
/// ```
/// use dandori_core::{CommandOutput, Outcome};
///
/// let outcome = Outcome::Sequence(vec![
///     Outcome::from("created"),
///     Outcome::from(CommandOutput::new("hello\n", "")),
///     Outcome::Empty,
/// ]);
///
/// let items = outcome.as_sequence().expect("a plan result");
/// assert_eq!(items[1].as_command().map(|out| out.stdout.as_str()), Some("hello\n"));
/// assert!(items[2].is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// No result: dry-run executions and unit-returning handlers.
    #[default]
    Empty,
    /// An arbitrary value returned by a handler.
    Value(serde_json::Value),
    /// Output captured from an external command.
    Command(CommandOutput),
    /// Ordered results of a plan's members.
    Sequence(Vec<Outcome>),
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Empty)
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&CommandOutput> {
        match self {
            Outcome::Command(output) => Some(output),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Outcome]> {
        match self {
            Outcome::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_command(self) -> Option<CommandOutput> {
        match self {
            Outcome::Command(output) => Some(output),
            _ => None,
        }
    }

    pub fn into_sequence(self) -> Option<Vec<Outcome>> {
        match self {
            Outcome::Sequence(items) => Some(items),
            _ => None,
        }
    }
}

impl From<()> for Outcome {
    fn from(_: ()) -> Self {
        Outcome::Empty
    }
}

impl From<serde_json::Value> for Outcome {
    fn from(value: serde_json::Value) -> Self {
        Outcome::Value(value)
    }
}

impl From<String> for Outcome {
    fn from(value: String) -> Self {
        Outcome::Value(serde_json::Value::String(value))
    }
}

impl From<&str> for Outcome {
    fn from(value: &str) -> Self {
        Outcome::from(value.to_string())
    }
}

impl From<CommandOutput> for Outcome {
    fn from(output: CommandOutput) -> Self {
        Outcome::Command(output)
    }
}

impl From<Vec<Outcome>> for Outcome {
    fn from(items: Vec<Outcome>) -> Self {
        Outcome::Sequence(items)
    }
}
