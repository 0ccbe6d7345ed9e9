//! Actions that run external commands.

use async_trait::async_trait;
use dandori_core::{
    Action, ActionId, CommandError, CommandOutput, ExecutionContext, Outcome, ParamsMeta, Result,
};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, warn};

/// A command to run.
///
/// `Argv` runs a program with literal arguments and no shell parsing, so
/// parameter values cannot inject shell syntax. `Shell` hands a script to
/// the platform shell (`sh -c`, or `cmd /C` on Windows) and is the opt-in
/// for pipes, globbing and redirection.
///
/// # Examples
///
/// ```
/// use dandori::CommandLine;
///
/// let argv = CommandLine::argv(["git", "commit", "-m", "first commit"]);
/// assert_eq!(argv.to_string(), "git commit -m 'first commit'");
///
/// let shell = CommandLine::shell("ls *.rs | wc -l");
/// assert_eq!(shell.to_string(), "ls *.rs | wc -l");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandLine {
    Argv(Vec<String>),
    Shell(String),
}

impl CommandLine {
    pub fn argv<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandLine::Argv(args.into_iter().map(Into::into).collect())
    }

    pub fn shell(script: impl Into<String>) -> Self {
        CommandLine::Shell(script.into())
    }

    /// `true` when there is nothing to run.
    pub fn is_empty(&self) -> bool {
        match self {
            CommandLine::Argv(args) => args.is_empty(),
            CommandLine::Shell(script) => script.trim().is_empty(),
        }
    }

    fn to_command(&self) -> Option<Command> {
        if self.is_empty() {
            return None;
        }
        match self {
            CommandLine::Argv(args) => {
                let (program, rest) = args.split_first()?;
                let mut command = Command::new(program);
                command.args(rest);
                Some(command)
            }
            CommandLine::Shell(script) => Some(shell_command(script)),
        }
    }
}

#[cfg(not(windows))]
fn shell_command(script: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(script);
    command
}

#[cfg(windows)]
fn shell_command(script: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(script);
    command
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLine::Argv(args) => {
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str(&quote(arg))?;
                }
                Ok(())
            }
            CommandLine::Shell(script) => f.write_str(script),
        }
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(args: Vec<String>) -> Self {
        CommandLine::Argv(args)
    }
}

/// POSIX single-quoting, only where the argument needs it.
fn quote(arg: &str) -> Cow<'_, str> {
    let is_plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c));
    if is_plain {
        Cow::Borrowed(arg)
    } else {
        Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''")))
    }
}

/// Parameters for [`CommandLineAction::from_command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandParams {
    pub command: CommandLine,
}

type Builder<P> = dyn Fn(&P) -> CommandLine + Send + Sync;

/// An action that builds a command from its parameters and runs it.
///
/// The child runs in the context's working directory with the ambient
/// environment plus the context's overrides, which win on collision.
/// Stdout and stderr are captured as text and returned untrimmed.
///
/// The description of a command action is the command itself, rendered
/// verbatim rather than as JSON.
pub struct CommandLineAction<P> {
    id: ActionId,
    params: P,
    params_meta: Option<ParamsMeta>,
    builder: Arc<Builder<P>>,
}

impl<P> CommandLineAction<P> {
    /// Creates an action whose command is produced by `builder`.
    pub fn new<F>(id: impl Into<ActionId>, params: P, builder: F) -> Self
    where
        F: Fn(&P) -> CommandLine + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            params,
            params_meta: None,
            builder: Arc::new(builder),
        }
    }

    /// Attach descriptive parameter metadata
    pub fn with_params_meta(mut self, meta: ParamsMeta) -> Self {
        self.params_meta = Some(meta);
        self
    }

    /// Returns a new action sharing this builder, bound to other parameters.
    pub fn bind(&self, id: impl Into<ActionId>, params: P) -> Self {
        Self {
            id: id.into(),
            params,
            params_meta: self.params_meta.clone(),
            builder: Arc::clone(&self.builder),
        }
    }

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    /// The command these parameters build.
    pub fn command_line(&self) -> CommandLine {
        (self.builder)(&self.params)
    }
}

impl CommandLineAction<CommandParams> {
    /// Creates an action that runs `command` as given.
    ///
    /// ```
    /// use dandori::{CommandLine, CommandLineAction};
    /// use dandori_core::Action;
    ///
    /// let action = CommandLineAction::from_command("init", CommandLine::argv(["git", "init"]));
    /// assert_eq!(action.describe().unwrap(), "git init");
    /// ```
    pub fn from_command(id: impl Into<ActionId>, command: impl Into<CommandLine>) -> Self {
        Self::new(
            id,
            CommandParams {
                command: command.into(),
            },
            |params: &CommandParams| params.command.clone(),
        )
    }
}

impl<P: fmt::Debug> fmt::Debug for CommandLineAction<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLineAction")
            .field("id", &self.id)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<P> Action for CommandLineAction<P>
where
    P: Serialize + fmt::Debug + Send + Sync,
{
    type Params = P;

    fn id(&self) -> &ActionId {
        &self.id
    }

    fn params(&self) -> &P {
        &self.params
    }

    fn params_meta(&self) -> Option<&ParamsMeta> {
        self.params_meta.as_ref()
    }

    fn describe(&self) -> Result<String> {
        Ok(self.command_line().to_string())
    }

    async fn run(&self, ctx: &ExecutionContext) -> Result<Outcome> {
        let output = run_command(&self.command_line(), ctx).await?;
        Ok(Outcome::Command(output))
    }
}

/// Runs `command_line` under `ctx` and captures its output.
///
/// Fails fast: a spawn error or unsuccessful exit yields a [`CommandError`]
/// and no partial output.
pub async fn run_command(
    command_line: &CommandLine,
    ctx: &ExecutionContext,
) -> std::result::Result<CommandOutput, CommandError> {
    let mut command = command_line.to_command().ok_or(CommandError::Empty)?;
    let rendered = command_line.to_string();

    command
        .current_dir(ctx.cwd())
        .envs(ctx.environment())
        .stdin(Stdio::null());

    debug!("Running `{}` in {}", rendered, ctx.cwd().display());

    let output = match command.output().await {
        Ok(output) => output,
        Err(source) => {
            warn!("Failed to spawn `{}`: {}", rendered, source);
            return Err(CommandError::Spawn {
                command: rendered,
                source,
            });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        warn!("Command `{}` failed: {}", rendered, output.status);
        return Err(CommandError::Exit {
            command: rendered,
            code: output.status.code(),
            stderr,
        });
    }

    debug!("Command `{}` completed", rendered);
    Ok(CommandOutput { stdout, stderr })
}
