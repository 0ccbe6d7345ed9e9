//! Core traits and types for dandori.
//!
//! This crate provides the abstractions without any runtime dependency.
//! Library authors should depend on this crate to implement custom actions.
//!
//! # Core Types
//!
//! - [`Executable`] - Anything a plan can run
//! - [`Action`] - A unit of effect with bound parameters and dry-run support
//! - [`ExecutionContext`] - Working directory, environment overrides, dry-run flag
//! - [`Outcome`] - Result of an execution
//! - [`ActionError`] - Error types for execution
//!
//! # Introspection
//!
//! - [`ParamsMeta`] - Descriptive parameter metadata for front-ends
//! - [`OutputSink`] - Where user-facing lines such as dry-run descriptions go

mod action;
mod context;
mod error;
mod meta;
mod outcome;
mod output;

pub use action::{describe_params, dry_run_line, Action, ActionId, Executable};
pub use context::ExecutionContext;
pub use error::{ActionError, BoxError, CommandError, Result};
pub use meta::{ParamMeta, ParamsMeta};
pub use outcome::{CommandOutput, Outcome};
pub use output::{CollectingSink, NullSink, OutputSink, StdoutSink};
