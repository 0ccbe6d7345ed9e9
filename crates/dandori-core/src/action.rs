//! The `Executable` capability and the `Action` template.

use crate::context::ExecutionContext;
use crate::error::{ActionError, Result};
use crate::meta::ParamsMeta;
use crate::outcome::Outcome;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::{self, Debug};

/// Caller-assigned identifier of an executable.
///
/// Identifiers label log lines and descriptions. Uniqueness is not enforced.
///
/// # Examples
///
/// ```
/// use dandori_core::ActionId;
///
/// let id = ActionId::new("install-deps");
/// assert_eq!(id.as_str(), "install-deps");
///
/// let id: ActionId = "git-init".into();
/// assert_eq!(id.to_string(), "git-init");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ActionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for ActionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for ActionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ActionId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ActionId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Anything that can be executed against an [`ExecutionContext`].
///
/// This is the object-safe unit a plan holds. Every [`Action`] is an
/// `Executable` through a blanket implementation; plans implement it
/// directly.
#[async_trait]
pub trait Executable: Send + Sync + Debug {
    fn id(&self) -> &ActionId;

    /// Runs to completion or failure. Side effects belong to the implementor.
    async fn execute(&self, ctx: &ExecutionContext) -> Result<Outcome>;
}

/// A unit of effect bound to its parameters at construction.
///
/// Implementors provide [`run`](Action::run); the blanket [`Executable`]
/// implementation adds dry-run interception around it. In dry-run mode the
/// action writes one line, `[dry-run][action:<id>] <description>`, to the
/// context's output sink and returns [`Outcome::Empty`] without calling
/// `run`.
///
/// # Examples
///
/// ```
/// use dandori_core::{Action, ActionId, ExecutionContext, Outcome, Result};
/// use async_trait::async_trait;
/// use serde::Serialize;
///
/// #[derive(Debug, Serialize)]
/// struct Greeting {
///     name: String,
/// }
///
/// #[derive(Debug)]
/// struct Greet {
///     id: ActionId,
///     params: Greeting,
/// }
///
/// #[async_trait]
/// impl Action for Greet {
///     type Params = Greeting;
///
///     fn id(&self) -> &ActionId {
///         &self.id
///     }
///
///     fn params(&self) -> &Greeting {
///         &self.params
///     }
///
///     async fn run(&self, _ctx: &ExecutionContext) -> Result<Outcome> {
///         Ok(Outcome::from(format!("hello, {}", self.params.name)))
///     }
/// }
///
/// let greet = Greet {
///     id: ActionId::new("greet"),
///     params: Greeting { name: "ada".into() },
/// };
/// assert_eq!(Action::describe(&greet).unwrap(), r#"greet({"name":"ada"})"#);
/// ```
#[async_trait]
pub trait Action: Send + Sync + Debug {
    /// Parameters bound at construction. Immutable for the action's lifetime.
    type Params: Serialize + Send + Sync;

    fn id(&self) -> &ActionId;

    fn params(&self) -> &Self::Params;

    /// Descriptive metadata for front-ends. Never read during execution.
    fn params_meta(&self) -> Option<&ParamsMeta> {
        None
    }

    /// Human-readable description, `<id>(<JSON params>)` by default.
    fn describe(&self) -> Result<String> {
        describe_params(Action::id(self), self.params())
    }

    /// Performs the action's effect.
    async fn run(&self, ctx: &ExecutionContext) -> Result<Outcome>;
}

/// Renders the default description `<id>(<JSON params>)`.
pub fn describe_params<P: Serialize + ?Sized>(id: &ActionId, params: &P) -> Result<String> {
    let json = serde_json::to_string(params).map_err(ActionError::Describe)?;
    Ok(format!("{}({})", id, json))
}

/// Formats the line written for an action skipped by dry-run.
pub fn dry_run_line(id: &ActionId, description: &str) -> String {
    format!("[dry-run][action:{}] {}", id, description)
}

#[async_trait]
impl<A> Executable for A
where
    A: Action,
{
    fn id(&self) -> &ActionId {
        Action::id(self)
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<Outcome> {
        if ctx.is_dry_run() {
            let description = self.describe()?;
            ctx.output()
                .line(&dry_run_line(Action::id(self), &description));
            return Ok(Outcome::Empty);
        }

        self.run(ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CollectingSink;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Serialize)]
    struct CopyParams {
        from: String,
        to: String,
    }

    #[derive(Debug)]
    struct CopyAction {
        id: ActionId,
        params: CopyParams,
        runs: Arc<AtomicU32>,
    }

    impl CopyAction {
        fn new(runs: Arc<AtomicU32>) -> Self {
            Self {
                id: ActionId::new("copy"),
                params: CopyParams {
                    from: "a.txt".to_string(),
                    to: "b.txt".to_string(),
                },
                runs,
            }
        }
    }

    #[async_trait]
    impl Action for CopyAction {
        type Params = CopyParams;

        fn id(&self) -> &ActionId {
            &self.id
        }

        fn params(&self) -> &CopyParams {
            &self.params
        }

        async fn run(&self, _ctx: &ExecutionContext) -> Result<Outcome> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            Ok(Outcome::from(json!({ "copied": true })))
        }
    }

    #[derive(Debug)]
    struct OpaqueParamsAction {
        id: ActionId,
        params: HashMap<Vec<u8>, u8>,
    }

    #[async_trait]
    impl Action for OpaqueParamsAction {
        type Params = HashMap<Vec<u8>, u8>;

        fn id(&self) -> &ActionId {
            &self.id
        }

        fn params(&self) -> &Self::Params {
            &self.params
        }

        async fn run(&self, _ctx: &ExecutionContext) -> Result<Outcome> {
            Ok(Outcome::Empty)
        }
    }

    #[test]
    fn test_action_id() {
        let id = ActionId::new("setup");
        assert_eq!(id.as_str(), "setup");
        assert_eq!(id, "setup");

        let id: ActionId = String::from("teardown").into();
        assert_eq!(id.to_string(), "teardown");
    }

    #[test]
    fn test_default_describe() {
        let action = CopyAction::new(Arc::new(AtomicU32::new(0)));
        assert_eq!(
            assert_ok!(Action::describe(&action)),
            r#"copy({"from":"a.txt","to":"b.txt"})"#
        );
        assert!(action.params_meta().is_none());
    }

    #[test]
    fn test_describe_params_unit_and_scalar() {
        let id = ActionId::new("noop");
        assert_eq!(assert_ok!(describe_params(&id, &())), "noop(null)");
        assert_eq!(assert_ok!(describe_params(&id, "x")), r#"noop("x")"#);
    }

    #[test]
    fn test_dry_run_line_format() {
        assert_eq!(
            dry_run_line(&ActionId::new("npm-init"), "npm init -y"),
            "[dry-run][action:npm-init] npm init -y"
        );
    }

    #[tokio::test]
    async fn test_execute_runs_action() {
        let runs = Arc::new(AtomicU32::new(0));
        let action = CopyAction::new(runs.clone());
        let ctx = ExecutionContext::new(".");

        let outcome = assert_ok!(action.execute(&ctx).await);

        assert_eq!(outcome, Outcome::Value(json!({ "copied": true })));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dry_run_never_runs() {
        let runs = Arc::new(AtomicU32::new(0));
        let action = CopyAction::new(runs.clone());
        let sink = Arc::new(CollectingSink::new());
        let ctx = ExecutionContext::new(".")
            .with_dry_run(true)
            .with_output(sink.clone());

        let outcome = assert_ok!(action.execute(&ctx).await);

        assert!(outcome.is_empty());
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(
            sink.lines(),
            vec![r#"[dry-run][action:copy] copy({"from":"a.txt","to":"b.txt"})"#]
        );
    }

    #[tokio::test]
    async fn test_dry_run_describe_failure_propagates() {
        let mut params = HashMap::new();
        params.insert(vec![1u8], 1u8);
        let action = OpaqueParamsAction {
            id: ActionId::new("opaque"),
            params,
        };
        let sink = Arc::new(CollectingSink::new());
        let ctx = ExecutionContext::new(".")
            .with_dry_run(true)
            .with_output(sink.clone());

        let error = assert_err!(action.execute(&ctx).await);

        assert!(matches!(error, ActionError::Describe(_)));
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_executable_trait_object() {
        let runs = Arc::new(AtomicU32::new(0));
        let executable: Box<dyn Executable> = Box::new(CopyAction::new(runs.clone()));

        assert_eq!(executable.id(), "copy");
        assert_ok!(executable.execute(&ExecutionContext::new(".")).await);
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }
}
