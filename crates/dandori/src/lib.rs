//! # Dandori (段取り)
//!
//! Compose actions and shell commands into ordered, dry-runnable plans.
//!
//! "Dandori" means arranging the steps of a job before doing it. The
//! library describes a run as a [`Plan`] of actions sharing one
//! [`ExecutionContext`] (working directory, environment overrides, dry-run
//! flag) and then runs it, or in dry-run mode only prints what it would do.
//!
//! ## Features
//!
//! - **Bound actions**: every action carries its parameters and can describe itself
//! - **Dry-run**: `[dry-run][action:<id>] <description>` instead of the effect, guaranteed
//! - **Commands**: argv by default, explicit opt-in for shell scripts
//! - **Fail fast**: a plan stops at the first failure and returns it unchanged
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dandori::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ActionError> {
//!     let plan = Plan::new("new-project")
//!         .add(CommandLineAction::from_command("git-init", CommandLine::argv(["git", "init"])))
//!         .add(CommandLineAction::from_command(
//!             "first-commit",
//!             CommandLine::argv(["git", "commit", "--allow-empty", "-m", "initial commit"]),
//!         ));
//!
//!     let ctx = ExecutionContext::new("/tmp/new-project").with_dry_run(true);
//!     plan.execute(&ctx).await?;
//!     Ok(())
//! }
//! ```

mod command;
mod handler;
mod plan;
mod sink;

// Re-export core types
pub use dandori_core::*;

pub use command::{run_command, CommandLine, CommandLineAction, CommandParams};
pub use handler::HandlerAction;
pub use plan::Plan;
pub use sink::TracingSink;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Action, ActionError, ActionId, CommandLine, CommandLineAction, CommandOutput,
        CommandParams, Executable, ExecutionContext, HandlerAction, Outcome, OutputSink,
        ParamMeta, ParamsMeta, Plan,
    };
}
