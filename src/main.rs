mod api;
mod cli;
mod config;
mod controller;
mod error;
mod ui;
mod view;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api::{BriefApiClient, JobApi};
use cli::{Cli, Command};
use config::BriefConfig;
use controller::{Controller, Key, PollSettings, Section, SubmitError};
use error::BriefError;
use ui::TerminalView;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match BriefConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    cli.apply_overrides(&mut config);
    tracing::debug!(?config, "configuration loaded");

    let client = match BriefApiClient::new(
        &config.base_url,
        config.connect_timeout(),
        config.request_timeout(),
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Generate { url } => generate(client, config.poll_settings(), &url).await,
        Command::Interactive => interactive(client, config.poll_settings()).await,
        Command::Status { job_id } => status(&client, &job_id).await,
        Command::Health => health(&client).await,
        Command::Diagnostics => diagnostics(&client).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !already_shown(&e) {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "briefgen=debug"
    } else {
        "briefgen=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Errors the view already rendered as an alert or in the error section.
fn already_shown(err: &BriefError) -> bool {
    matches!(
        err,
        BriefError::Unfinished(_)
            | BriefError::Submit(SubmitError::Invalid(_) | SubmitError::Create(_))
    )
}

fn terminal_view() -> TerminalView {
    if console::user_attended_stderr() {
        TerminalView::new()
    } else {
        TerminalView::hidden()
    }
}

async fn generate(client: BriefApiClient, settings: PollSettings, url: &str) -> Result<(), BriefError> {
    let controller = Controller::new(client, terminal_view(), settings);
    controller.submit(url).await?;
    match controller.wait_for_outcome().await {
        Section::Result => Ok(()),
        other => Err(BriefError::Unfinished(other)),
    }
}

/// Line-driven form: every line read is an Enter press in the URL field.
async fn interactive(client: BriefApiClient, settings: PollSettings) -> Result<(), BriefError> {
    let controller = Controller::new(client, terminal_view(), settings);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt("Brand URL: ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match controller.on_keypress(Key::Enter, &line).await {
            Some(Ok(job_id)) => {
                let section = controller.wait_for_outcome().await;
                tracing::debug!(
                    %job_id,
                    %section,
                    polling = controller.is_polling(),
                    submit_enabled = controller.is_submit_enabled(),
                    "attempt finished"
                );
                if !section.is_terminal() {
                    continue;
                }
            }
            Some(Err(SubmitError::Create(_))) => {}
            Some(Err(_)) | None => continue,
        }

        prompt("Press Enter to generate another brief (Ctrl-D to quit) ")?;
        if lines.next_line().await?.is_none() {
            break;
        }
        controller.reset();
    }

    controller.stop_polling();
    Ok(())
}

fn prompt(text: &str) -> Result<(), BriefError> {
    print!("{text}");
    std::io::stdout().flush()?;
    Ok(())
}

async fn status(client: &BriefApiClient, job_id: &str) -> Result<(), BriefError> {
    let snapshot = client.job_status(job_id).await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    if !snapshot.status.is_terminal() {
        tracing::info!(job_id, status = %snapshot.status, "job still running");
    }
    Ok(())
}

async fn health(client: &BriefApiClient) -> Result<(), BriefError> {
    let health = client.health().await?;
    println!("{} is {}", client.base_url(), health.status);
    Ok(())
}

async fn diagnostics(client: &BriefApiClient) -> Result<(), BriefError> {
    let report = client.diagnostics().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
