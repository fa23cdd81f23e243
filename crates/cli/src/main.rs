//! `auth-template` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`:       start the API server.
//! - `migrate`:     run pending database migrations.
//! - `create-user`: add an account, e.g. the first administrator.
//! - `stack`:       drive the dev and test docker compose stacks.

mod logger;

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use db::DbPool;
use settings::Settings;
use stack::{run_task, SystemRunner, Task};

#[derive(Debug, Parser)]
#[command(name = "auth-template", about = "Authentication and user management service", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8000")]
        bind: String,
    },
    /// Run pending database migrations.
    Migrate,
    /// Create a user directly in the database.
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CREATE_USER_PASSWORD", hide_env_values = true)]
        password: String,
        /// Grant administrator rights.
        #[arg(long)]
        admin: bool,
    },
    /// Run a task against the docker compose stacks.
    Stack {
        #[arg(value_enum)]
        task: StackTask,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StackTask {
    BuildDev,
    StartDev,
    StopDev,
    Test,
    Migrate,
    LintFix,
    LintCheck,
}

impl From<StackTask> for Task {
    fn from(task: StackTask) -> Self {
        match task {
            StackTask::BuildDev => Task::BuildDev,
            StackTask::StartDev => Task::StartDev,
            StackTask::StopDev => Task::StopDev,
            StackTask::Test => Task::Test,
            StackTask::Migrate => Task::Migrate,
            StackTask::LintFix => Task::LintFix,
            StackTask::LintCheck => Task::LintCheck,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Command::Serve { bind } => {
            let settings = Settings::from_env().context("loading settings")?;
            info!(mode = %settings.mode, version = %settings.app_version, "Starting API server on {bind}");
            let pool = connect(&settings).await?;
            api::serve(&bind, api::AppState::new(pool, settings))
                .await
                .context("API server failed")?;
        }
        Command::Migrate => {
            let settings = Settings::from_env().context("loading settings")?;
            let pool = connect(&settings).await?;
            info!("Running migrations against {}", settings.postgres_host);
            db::pool::run_migrations(&pool).await.context("migration failed")?;
            info!("Migrations applied successfully");
        }
        Command::CreateUser { email, password, admin } => {
            let settings = Settings::from_env().context("loading settings")?;
            let pool = connect(&settings).await?;
            let user = api::service::users::create(&pool, &email, &password, admin)
                .await
                .with_context(|| format!("creating user {email}"))?;
            info!(id = %user.id, is_admin = user.is_admin, "Created user {}", user.email);
        }
        Command::Stack { task } => {
            let project_dir = std::env::current_dir().context("resolving project directory")?;
            let runner = SystemRunner::new(project_dir.clone());
            let code = run_task(task.into(), &runner, &project_dir)?;
            std::process::exit(code);
        }
    }
    Ok(())
}

/// Open the pool and hold until the database answers.
async fn connect(settings: &Settings) -> anyhow::Result<DbPool> {
    let pool = db::pool::create_pool(&settings.database_url()?, settings.db_max_connections)?;
    db::pool::wait_for_database(
        &pool,
        settings.db_connect_retries,
        Duration::from_secs(settings.db_connect_interval_secs),
    )
    .await
    .context("database did not become ready")?;
    Ok(pool)
}
