//! Ordered composition of executables.

use async_trait::async_trait;
use dandori_core::{ActionId, Executable, ExecutionContext, Outcome, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An ordered list of executables run one after another.
///
/// Members run strictly in insertion order; each finishes, nested plans
/// included, before the next starts. The result is an
/// [`Outcome::Sequence`] with one element per member. The first failing
/// member stops the plan, and its error is returned as is.
///
/// Members are reference-counted and may be shared between plans. Nothing
/// prevents a plan from (transitively) containing itself, which would
/// recurse without bound.
///
/// # Examples
///
/// ```
/// use dandori::prelude::*;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), ActionError> {
/// let plan = Plan::new("bootstrap")
///     .add(HandlerAction::from_fn("first", 1, |n: &i32, _: &ExecutionContext| {
///         Ok::<_, ActionError>(n.to_string())
///     }))
///     .add(Plan::new("nested").add(HandlerAction::from_fn("second", 2, |n: &i32, _: &ExecutionContext| {
///         Ok::<_, ActionError>(n.to_string())
///     })));
///
/// let outcome = plan.execute(&ExecutionContext::new(".")).await?;
/// assert_eq!(
///     outcome,
///     Outcome::Sequence(vec![
///         Outcome::from("1"),
///         Outcome::Sequence(vec![Outcome::from("2")]),
///     ])
/// );
/// # Ok(())
/// # }
/// ```
pub struct Plan {
    id: ActionId,
    members: Vec<Arc<dyn Executable>>,
}

impl fmt::Debug for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plan")
            .field("id", &self.id)
            .field("members", &self.member_ids().collect::<Vec<_>>())
            .finish()
    }
}

impl Plan {
    /// Creates an empty plan.
    pub fn new(id: impl Into<ActionId>) -> Self {
        Self {
            id: id.into(),
            members: Vec::new(),
        }
    }

    /// Appends a member.
    pub fn add<E: Executable + 'static>(mut self, member: E) -> Self {
        self.members.push(Arc::new(member));
        self
    }

    /// Appends a member that may also belong to other plans.
    pub fn add_shared(mut self, member: Arc<dyn Executable>) -> Self {
        self.members.push(member);
        self
    }

    /// Appends a member in place.
    pub fn push<E: Executable + 'static>(&mut self, member: E) -> &mut Self {
        self.members.push(Arc::new(member));
        self
    }

    /// Appends a shared member in place.
    pub fn push_shared(&mut self, member: Arc<dyn Executable>) -> &mut Self {
        self.members.push(member);
        self
    }

    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the plan has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the member ids in execution order.
    pub fn member_ids(&self) -> impl Iterator<Item = &ActionId> {
        self.members.iter().map(|member| member.id())
    }
}

#[async_trait]
impl Executable for Plan {
    fn id(&self) -> &ActionId {
        &self.id
    }

    async fn execute(&self, ctx: &ExecutionContext) -> Result<Outcome> {
        let total = self.members.len();
        let mut results = Vec::with_capacity(total);

        for (index, member) in self.members.iter().enumerate() {
            debug!(
                "Plan '{}' starting member '{}' ({}/{})",
                self.id,
                member.id(),
                index + 1,
                total
            );

            match member.execute(ctx).await {
                Ok(outcome) => {
                    info!("Plan '{}' member '{}' completed", self.id, member.id());
                    results.push(outcome);
                }
                Err(e) => {
                    warn!("Plan '{}' member '{}' failed: {}", self.id, member.id(), e);
                    return Err(e);
                }
            }
        }

        Ok(Outcome::Sequence(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandlerAction;
    use dandori_core::{ActionError, BoxError, CollectingSink};
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    type Log = Arc<Mutex<Vec<String>>>;

    fn recording(id: &'static str, log: &Log) -> HandlerAction<()> {
        let log = log.clone();
        HandlerAction::from_fn(id, (), move |_: &(), _: &ExecutionContext| {
            log.lock().expect("log lock").push(id.to_string());
            Ok::<_, BoxError>(id)
        })
    }

    fn failing(id: &'static str) -> HandlerAction<()> {
        HandlerAction::from_fn(id, (), move |_: &(), _: &ExecutionContext| {
            Err::<(), _>(format!("{} broke", id))
        })
    }

    #[tokio::test]
    async fn test_plan_runs_in_order() {
        let log: Log = Arc::default();
        let plan = Plan::new("plan")
            .add(recording("a", &log))
            .add(recording("b", &log))
            .add(recording("c", &log));

        let outcome = assert_ok!(plan.execute(&ExecutionContext::new(".")).await);

        assert_eq!(*log.lock().expect("log lock"), vec!["a", "b", "c"]);
        assert_eq!(
            outcome,
            Outcome::Sequence(vec![
                Outcome::from("a"),
                Outcome::from("b"),
                Outcome::from("c"),
            ])
        );
    }

    #[tokio::test]
    async fn test_plan_fails_fast() {
        let log: Log = Arc::default();
        let plan = Plan::new("plan")
            .add(recording("a", &log))
            .add(failing("b"))
            .add(recording("c", &log));

        let error = assert_err!(plan.execute(&ExecutionContext::new(".")).await);

        assert!(matches!(error, ActionError::Handler(_)));
        assert_eq!(error.to_string(), "b broke");
        assert_eq!(*log.lock().expect("log lock"), vec!["a"]);
    }

    #[tokio::test]
    async fn test_empty_plan() {
        let plan = Plan::new("empty");
        assert!(plan.is_empty());

        let outcome = assert_ok!(plan.execute(&ExecutionContext::new(".")).await);
        assert_eq!(outcome, Outcome::Sequence(Vec::new()));
    }

    #[tokio::test]
    async fn test_shared_members() {
        let log: Log = Arc::default();
        let shared: Arc<dyn Executable> = Arc::new(recording("shared", &log));

        let first = Plan::new("first").add_shared(shared.clone());
        let mut second = Plan::new("second");
        second
            .push(recording("own", &log))
            .push_shared(shared);

        let ctx = ExecutionContext::new(".");
        assert_ok!(first.execute(&ctx).await);
        assert_ok!(second.execute(&ctx).await);

        assert_eq!(second.len(), 2);
        assert_eq!(
            *log.lock().expect("log lock"),
            vec!["shared", "own", "shared"]
        );
    }

    #[tokio::test]
    async fn test_dry_run_reaches_every_leaf() {
        let log: Log = Arc::default();
        let plan = Plan::new("outer")
            .add(recording("a", &log))
            .add(Plan::new("inner").add(recording("b", &log)));
        let sink = Arc::new(CollectingSink::new());
        let ctx = ExecutionContext::new(".")
            .with_dry_run(true)
            .with_output(sink.clone());

        let outcome = assert_ok!(plan.execute(&ctx).await);

        assert!(log.lock().expect("log lock").is_empty());
        assert_eq!(
            sink.lines(),
            vec!["[dry-run][action:a] a(null)", "[dry-run][action:b] b(null)"]
        );
        assert_eq!(
            outcome,
            Outcome::Sequence(vec![
                Outcome::Empty,
                Outcome::Sequence(vec![Outcome::Empty]),
            ])
        );
    }

    #[test]
    fn test_member_ids_and_debug() {
        let log: Log = Arc::default();
        let plan = Plan::new("setup")
            .add(recording("x", &log))
            .add(Plan::new("y"));

        let ids: Vec<&str> = plan.member_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
        assert_eq!(plan.id(), "setup");

        let debug = format!("{:?}", plan);
        assert!(debug.contains("setup"));
        assert!(debug.contains("\"x\""));
    }
}
