use dandori_core::OutputSink;
use tracing::info;

/// Forwards output lines to `tracing` as `info` events on the
/// `dandori::output` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn line(&self, line: &str) {
        info!(target: "dandori::output", "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dandori_core::{Executable, ExecutionContext, Outcome};
    use std::sync::Arc;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_dry_run_through_tracing_sink() {
        let action = crate::CommandLineAction::from_command(
            "fmt",
            crate::CommandLine::argv(["cargo", "fmt"]),
        );
        let ctx = ExecutionContext::new(".")
            .with_dry_run(true)
            .with_output(Arc::new(TracingSink));

        assert_eq!(assert_ok!(action.execute(&ctx).await), Outcome::Empty);
    }
}
