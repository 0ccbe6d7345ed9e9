//! Scaffold a small project directory.
//!
//! ```text
//! cargo run --example setup_plan -- /tmp/demo-project --dry-run
//! ```

use dandori::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Clone, Serialize)]
struct ReadmeParams {
    title: String,
    description: String,
}

fn readme_action(params: ReadmeParams) -> HandlerAction<ReadmeParams> {
    HandlerAction::new("write-readme", params, |params: ReadmeParams, ctx: ExecutionContext| async move {
        let contents = format!("# {}\n\n{}\n", params.title, params.description);
        let path = ctx.cwd().join("README.md");
        tokio::fs::write(&path, contents).await?;
        Ok::<_, std::io::Error>(path.display().to_string())
    })
    .with_params_meta(
        ParamsMeta::new()
            .with("title", ParamMeta::new().description("Project title").required(true))
            .with(
                "description",
                ParamMeta::new()
                    .description("One-paragraph summary")
                    .default_value("A new project."),
            ),
    )
}

fn build_plan(name: &str) -> Plan {
    let git = Plan::new("git")
        .add(CommandLineAction::from_command("git-init", CommandLine::argv(["git", "init", "--quiet"])))
        .add(CommandLineAction::from_command("git-add", CommandLine::argv(["git", "add", "README.md"])));

    Plan::new("setup")
        .add(readme_action(ReadmeParams {
            title: name.to_string(),
            description: "Scaffolded with dandori.".to_string(),
        }))
        .add(git)
        .add(CommandLineAction::from_command(
            "list",
            CommandLine::shell("ls -a | head -n 20"),
        ))
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let dry_run = args.iter().any(|arg| arg == "--dry-run");
    let dir = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("dandori-demo"));

    if !dry_run {
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            eprintln!("Cannot create {}: {}", dir.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string());
    let plan = build_plan(&name);
    let ctx = ExecutionContext::new(&dir)
        .with_dry_run(dry_run)
        .with_env("GIT_TERMINAL_PROMPT", "0");

    match plan.execute(&ctx).await {
        Ok(outcome) => {
            if let Ok(json) = serde_json::to_string_pretty(&outcome) {
                println!("{}", json);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Setup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
