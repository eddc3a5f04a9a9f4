//! `cluster-demo` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`        start the control panel API.
//! - `status`       print the backend's current cluster.
//! - `run`          issue one named command.
//! - `steps`        list the tutorial's steps.
//! - `walk`         advance through the tutorial until it ends or blocks.
//! - `check-script` load and check a JSON step script.

mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use client::{ClientConfig, HttpDispatcher};
use commands::mock::MockDispatcher;
use commands::CommandDispatcher;
use engine::{Tutorial, TutorialSession};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cluster-demo",
    about = "Control panel and guided tutorial for a local demo cluster",
    version
)]
struct Cli {
    /// Base URL of the demo backend.
    #[arg(long, global = true, env = "DEMO_BACKEND_URL", default_value = "http://localhost:9999")]
    backend: String,

    /// Per-request timeout, in seconds.
    #[arg(long, global = true, default_value_t = 10)]
    timeout_secs: u64,

    /// JSON step script to use instead of the standard tutorial.
    #[arg(long, global = true, env = "DEMO_SCRIPT")]
    script: Option<PathBuf>,

    /// Use the standard tutorial with the load generator steps.
    #[arg(long, global = true, conflicts_with = "script")]
    with_load: bool,

    /// Log filter, e.g. `info` or `engine=debug`.
    #[arg(long, global = true, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the control panel API.
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
        /// Seconds between background refreshes; 0 disables polling.
        #[arg(long, default_value_t = 2)]
        poll_secs: u64,
    },
    /// Print the current cluster.
    Status,
    /// Issue one command, e.g. `run pauseNode 2` or `run addNode`.
    Run {
        name: String,
        node: Option<String>,
    },
    /// List the tutorial's steps.
    Steps,
    /// Advance through the tutorial until it ends or a step blocks.
    Walk {
        /// Run against an in-memory cluster instead of the backend.
        #[arg(long)]
        dry_run: bool,
    },
    /// Load a JSON step script and report whether it is usable.
    CheckScript {
        /// Path to the step script.
        path: PathBuf,
    },
}

impl Cli {
    fn tutorial(&self) -> anyhow::Result<Tutorial> {
        match &self.script {
            Some(path) => load_script(path),
            None if self.with_load => Ok(Tutorial::standard_with_load()),
            None => Ok(Tutorial::standard()),
        }
    }

    fn dispatcher(&self) -> anyhow::Result<Arc<dyn CommandDispatcher>> {
        let config = ClientConfig {
            base_url: self.backend.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        };
        Ok(Arc::new(HttpDispatcher::new(&config)?))
    }

    fn session(&self) -> anyhow::Result<TutorialSession> {
        Ok(TutorialSession::new(self.tutorial()?, self.dispatcher()?))
    }
}

fn load_script(path: &Path) -> anyhow::Result<Tutorial> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read script {}", path.display()))?;
    Tutorial::from_json(&content).with_context(|| format!("invalid script {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level)
        .with_context(|| format!("invalid log filter '{}'", cli.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Command::Serve { bind, poll_secs } => {
            let config = api::ServeConfig {
                bind: bind.clone(),
                poll_interval: Duration::from_secs(*poll_secs),
            };
            info!("Starting control panel on {} (backend {})", config.bind, cli.backend);
            api::serve(config, cli.session()?).await?;
        }
        Command::Status => {
            let mut session = cli.session()?;
            let snapshot = session.refresh().await?;
            print!("{}", render::cluster(snapshot));
        }
        Command::Run { name, node } => {
            let Some(command) = commands::Command::parse(name, node.as_deref()) else {
                bail!("unknown command '{name}' (node: {node:?})");
            };
            let mut session = cli.session()?;
            session.refresh().await?;
            let snapshot = session.execute(command).await?;
            print!("{}", render::cluster(snapshot));
        }
        Command::Steps => {
            print!("{}", render::outline(&cli.tutorial()?));
        }
        Command::Walk { dry_run } => {
            let mut session = if *dry_run {
                TutorialSession::new(cli.tutorial()?, Arc::new(MockDispatcher::new()))
            } else {
                cli.session()?
            };
            session.refresh().await?;
            walk(&mut session).await?;
        }
        Command::CheckScript { path } => {
            let tutorial = load_script(path)?;
            println!("{} is valid: {} step(s)", path.display(), tutorial.len());
            print!("{}", render::outline(&tutorial));
        }
    }

    Ok(())
}

async fn walk(session: &mut TutorialSession) -> anyhow::Result<()> {
    loop {
        let view = session.view();
        print!("{}", render::step(&view));

        if view.is_final {
            print!("{}", render::cluster(session.snapshot()));
            return Ok(());
        }
        if !view.can_advance {
            bail!("step {} is blocked", view.step);
        }

        let issued = session.advance().await?;
        for command in &issued {
            println!("  -> {command}");
        }
    }
}
