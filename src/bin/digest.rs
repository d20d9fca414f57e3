use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use tg_digest::ai::OllamaClient;
use tg_digest::cli::Cli;
use tg_digest::core::config::{AppConfig, load_dotenv};
use tg_digest::source::ExportSource;
use tg_digest::worker::handler::LIST_CONVERSATIONS_LIMIT;
use tg_digest::worker::{DigestOutcome, deliver, list_conversations, run_digest};

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    // Usage errors exit here, before any I/O.
    let cli = Cli::parse();
    tg_digest::setup_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app_config = AppConfig::from_env()?;
    let export_path = cli
        .export
        .clone()
        .unwrap_or_else(|| app_config.export_path.clone());
    let source = ExportSource::open(&export_path).await?;

    if cli.list_chats {
        let conversations = list_conversations(&source, LIST_CONVERSATIONS_LIMIT).await?;
        print!("{}", deliver::render_conversation_list(&conversations));
        return Ok(());
    }

    let Some(mode) = cli.run_mode() else {
        anyhow::bail!("Specify --unread or --last N");
    };
    let config = app_config.digest_config(&cli.overrides())?;

    let host = app_config.resolve_ollama_host(cli.ollama_host.as_deref());
    let client = OllamaClient::new(host, app_config.ollama_timeout)?;
    client
        .check_available(&config.model)
        .await
        .context("Make sure Ollama is running: ollama serve")?;

    match run_digest(&source, &client, &mode, &config, shutdown_signal()).await? {
        DigestOutcome::Report(report) => print!("{}", deliver::render_report(&report)),
        DigestOutcome::NoMessages => println!("{}", deliver::NO_MESSAGES_TEXT),
    }

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
