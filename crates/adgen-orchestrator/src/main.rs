//! Batch render binary: one job per configured concept, artifacts written to disk.

use anyhow::{anyhow, Context};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use adgen_gateway::Gateway;
use adgen_orchestrator::cli::write_artifact;
use adgen_orchestrator::{CancellationToken, JobOrchestrator, OrchestratorConfig, RenderCliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install rustls crypto provider"))?;

    dotenvy::dotenv().ok();

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("adgen=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting adgen-render");

    let cli = RenderCliConfig::from_env().context("Invalid render configuration")?;
    let config = OrchestratorConfig::from_env();
    info!("Orchestrator config: {:?}", config);

    let gateway = Gateway::from_env()?;
    let orchestrator = JobOrchestrator::new(gateway, config);

    match orchestrator.verify_api_key(&cli.api_key).await {
        Ok(credits) => info!(credits, "API key accepted"),
        Err(e) if e.is_auth_error() => return Err(e.into()),
        Err(e) => warn!(error = %e, "Credit check failed, continuing"),
    }

    let specs = cli.build_specs().await?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        ctrl_c.cancel();
    });

    let concurrency = orchestrator.config().batch_concurrency;
    let results = orchestrator
        .render_batch(&cli.api_key, specs, concurrency, &cancel)
        .await;

    let mut failures = 0usize;
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(artifact) => {
                let path = write_artifact(&cli.output_dir, &artifact).await?;
                info!(job = i + 1, path = %path.display(), "Saved video");
            }
            Err(e) => {
                failures += 1;
                error!(job = i + 1, error = %e, "Render failed");
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("{failures} render job(s) failed"));
    }

    info!("All renders complete");
    Ok(())
}
