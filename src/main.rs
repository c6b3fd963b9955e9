use anyhow::{Context, Result};
use kestrel::cli::output::Output;
use kestrel::cli::{Cli, Commands};
use kestrel::{KestrelConfig, RagService};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match run(cli, &output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output.error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let config = KestrelConfig::load(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    init_tracing(&config, cli.verbose);
    tracing::info!(path = %cli.config.display(), "Configuration ready");

    let service = RagService::from_config(&config)
        .await
        .context("Failed to start RAG service")?;

    match cli.command {
        Commands::Ingest { dir } => {
            let dir = dir.unwrap_or_else(|| service.documents_dir().to_path_buf());
            output.info(&format!("Ingesting {}", dir.display()));
            let report = service
                .ingestor()
                .ingest_directory(&dir)
                .await
                .with_context(|| format!("Failed to ingest {}", dir.display()))?;
            output.ingest_report(&report);
        }
        Commands::Query { question, k } => {
            if let Some(report) = service.bootstrap().await.context("Bootstrap failed")? {
                output.ingest_report(&report);
            }

            let chunks = service.retriever().retrieve_scored(&question, k).await?;
            output.header("Retrieved chunks");
            output.chunks(&chunks);

            let context: Vec<String> = chunks.into_iter().map(|c| c.text).collect();
            output.header("Prompt");
            output.newline();
            println!("{}", kestrel::build_prompt(&context, &question));
        }
        Commands::Stats => {
            output.header("Vector store");
            output.stats(&service.stats().await);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only command output.
///
/// `RUST_LOG` wins over the configured level; `--verbose` raises the
/// configured level to debug.
fn init_tracing(config: &KestrelConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kestrel={level},kestrel_vector={level}")));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
