#![forbid(unsafe_code)]

//! `workflow-warden` — GitHub webhook service binary.
//!
//! Bootstraps configuration and credentials, then serves the webhook
//! listener until a shutdown signal arrives.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use workflow_warden::audit::{AuditLogger, JsonlAuditWriter};
use workflow_warden::config::GlobalConfig;
use workflow_warden::github::client::GithubClientFactory;
use workflow_warden::router::EventRouter;
use workflow_warden::server::{self, AppState};
use workflow_warden::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "workflow-warden", about = "GitHub workflow auto-approval service", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the configured HTTP port.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("workflow-warden bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;
    if let Some(port) = args.port {
        config.http_port = port;
    }

    // Load the GitHub token from keyring / env var.
    config.load_credentials().await?;

    let config = Arc::new(config);
    info!(
        trusted = config.trusted_logins.len(),
        prefix = %config.protected_path_prefix,
        "configuration loaded"
    );

    // ── Audit sink ──────────────────────────────────────
    let audit: Option<Arc<dyn AuditLogger>> = match config.audit {
        Some(ref audit_config) => {
            let writer = JsonlAuditWriter::new(audit_config.log_dir.clone())?;
            info!(dir = %audit_config.log_dir.display(), "audit log enabled");
            Some(Arc::new(writer))
        }
        None => {
            info!("audit log disabled");
            None
        }
    };

    // ── Collaborator and router ─────────────────────────
    let github = Arc::new(GithubClientFactory::new(&config.github)?);
    let router = EventRouter::new(&config, github, audit.clone());

    let state = Arc::new(AppState {
        config: Arc::clone(&config),
        router,
        audit,
    });

    // ── Serve until shutdown ────────────────────────────
    let ct = CancellationToken::new();
    let server_ct = ct.clone();
    let server_state = Arc::clone(&state);
    let server_handle = tokio::spawn(async move {
        if let Err(err) = server::serve(server_state, server_ct).await {
            error!(%err, "webhook listener failed");
        }
    });

    shutdown_signal().await;
    info!("shutdown signal received");
    ct.cancel();

    let _ = server_handle.await;
    info!("workflow-warden shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
