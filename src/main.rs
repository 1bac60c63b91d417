//! Wiring & DI. Entry point: parse flags, bootstrap adapters, inject into the service.
//! No business logic here; the only place errors become exit codes.

use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tg_deploy::adapters::cli::Cli;
use tg_deploy::adapters::fs::GlobResolver;
use tg_deploy::adapters::git::GitCliReader;
use tg_deploy::adapters::logging::TracingReporter;
use tg_deploy::adapters::telegram::BotApiGateway;
use tg_deploy::ports::{FileResolverPort, MediaGroupGateway, RepoMetadataPort, ReportPort};
use tg_deploy::shared::config::AppConfig;
use tg_deploy::usecases::{DeployRequest, DeployService};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (service, request) = match bootstrap(&cli) {
        Ok(wired) => wired,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // Failures are reported by the service itself.
    match service.deploy(&request).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Load config, merge flags, build adapters and the service.
fn bootstrap(cli: &Cli) -> anyhow::Result<(DeployService, DeployRequest)> {
    let cfg = AppConfig::load().context("failed to load configuration")?;
    let settings = cli.settings(&cfg)?;
    debug!(?settings, "settings resolved");

    let reporter: Arc<dyn ReportPort> = Arc::new(TracingReporter::new());

    let gateway: Arc<dyn MediaGroupGateway> = Arc::new(
        BotApiGateway::new(
            settings.bot_token.clone(),
            settings.timeout,
            Arc::clone(&reporter),
        )?
        .with_api_url(settings.api_url.clone())
        .with_max_retries(settings.max_retries),
    );
    let resolver: Arc<dyn FileResolverPort> = Arc::new(GlobResolver::new());
    let metadata: Arc<dyn RepoMetadataPort> = Arc::new(GitCliReader::new());

    let service = DeployService::new(resolver, gateway, metadata, reporter);
    Ok((service, cli.request(settings.chat_id)))
}
