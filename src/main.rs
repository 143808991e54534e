//! tgsend - main entry point
//!
//! `tgsend <file>` opens the interactive picker; subcommands print JSON
//! for scripts and LLM agents.

use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use crossterm::style::Stylize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use telegram_file_sender::cli::{Cli, Command};
use telegram_file_sender::commands::{
    self, auth, config, contacts, interactive, send, status, Session, StatusReport,
};
use telegram_file_sender::config::AppPaths;
use telegram_file_sender::output::{print_json, Failure};
use telegram_file_sender::{Error, Result};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env for local development
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout carries JSON or the picker
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("telegram_file_sender=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = AppPaths::resolve();
    debug!(dir = %paths.dir.display(), "application directory");

    match (cli.command, cli.file) {
        (Some(command), _) => Ok(run_scripted(command, &paths).await),
        (None, Some(file)) => Ok(run_interactive(&paths, &file).await),
        (None, None) => {
            Cli::command().print_help()?;
            println!();
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_scripted(command: Command, paths: &AppPaths) -> ExitCode {
    match execute_command(command, paths).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!(error = ?err, "command failed");
            // Failure output is best effort; the exit code still reports the error
            let _ = print_json(&Failure::from(&err));
            ExitCode::FAILURE
        }
    }
}

async fn execute_command(command: Command, paths: &AppPaths) -> Result<()> {
    match command {
        Command::Config { api_id, api_hash } => {
            paths.ensure_dir()?;
            let report = config::run(&paths.credential_store(), api_id, api_hash.as_deref())?;
            print_json(&report)
        }

        Command::Status => {
            let Some(credentials) = paths.credential_store().load()? else {
                return print_json(&StatusReport::not_configured());
            };
            let session = Session::open(paths, &credentials)?;
            print_json(&status::run(session.api()).await?)
        }

        Command::Auth(args) => {
            let credentials = commands::require_credentials(paths)?;
            let session = Session::open(paths, &credentials)?;
            print_json(&auth::run(session.api(), &args, &paths.pending_login).await?)
        }

        Command::Contacts { search, limit } => {
            let credentials = commands::require_credentials(paths)?;
            let session = Session::open(paths, &credentials)?;
            print_json(&contacts::run(session.api(), search.as_deref(), limit).await?)
        }

        Command::Send { file, to, to_id } => {
            let file = send::LocalFile::check(&file)?;
            let recipient = send::Recipient::from_args(to, to_id)?;
            let credentials = commands::require_credentials(paths)?;
            let session = Session::open(paths, &credentials)?;
            print_json(&send::run(session.api(), &file, &recipient).await?)
        }
    }
}

async fn run_interactive(paths: &AppPaths, file: &Path) -> ExitCode {
    let result = tokio::select! {
        result = interactive::run(paths, file) => result,
        _ = tokio::signal::ctrl_c() => Err(Error::Interrupted),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Interrupted) => {
            println!("\n\n{}", "Interrupted".yellow());
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{}", interactive::error_line(&err));
            ExitCode::FAILURE
        }
    }
}
