//! Notification worker.
//!
//! Runs the expiration reminder scan on its cron schedule, or executes one
//! job given on the command line and prints its outcome.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use notifications::commands::{execute_command, parse_worker_command, WorkerCommand, USAGE};
use notifications::config::init_config;
use notifications::jobs::{JobConfig, JobScheduler, NotificationJobs};
use notifications::logging::init_logging;
use notifications::mail::{Mailer, SmtpMailer};
use notifications::store::{Database, SqlStore, TableNames};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let command = match parse_worker_command(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match init_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    match run(config, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    config: &'static notifications::config::NotificationsConfig,
    command: WorkerCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    db.ping().await?;
    info!(db_type = db.db_type(), "Connected to database");

    let store = SqlStore::new(db, TableNames::from(&config.database));
    let mailer = SmtpMailer::new(&config.smtp)?;
    info!(mailer = mailer.name(), host = %config.smtp.host, "Mail transport ready");
    let jobs = NotificationJobs::with_system_clock(Arc::new(store), Arc::new(mailer), config.mail.clone());

    if command != WorkerCommand::Schedule {
        let outcome = execute_command(&jobs, command).await?;
        println!("{outcome}");
        return Ok(());
    }

    let mut scheduler = JobScheduler::new(jobs, JobConfig::from(&config.jobs)).await?;
    scheduler.start().await?;

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received");

    scheduler.shutdown().await?;
    Ok(())
}
