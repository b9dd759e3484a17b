//! Wiring & DI. Entry point: bootstrap adapters, inject into the service, run CLI or form.
//! No business logic here; screening is delegated to ScreeningService.

use clap::Parser;
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use talent_align::adapters::ai::{HostedLlmAdapter, LocalLlmAdapter, MockLlmAdapter};
use talent_align::adapters::pdf::PdfTextExtractor;
use talent_align::adapters::persistence::SqliteScanLog;
use talent_align::adapters::ui::tui::{TuiInputPort, present_screening};
use talent_align::adapters::ui::{render, uploads};
use talent_align::cli::{Cli, Commands};
use talent_align::ports::{InputPort, LlmPort, ScanLogPort};
use talent_align::shared::config::{AppConfig, BackendKind, ScanLogTarget};
use talent_align::usecases::ScreeningService;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let requested_backend = cli
        .backend
        .clone()
        .or_else(|| std::env::var("TALENT_ALIGN_BACKEND").ok());
    let mut cfg = AppConfig::or_defaults(AppConfig::load(), requested_backend.as_deref())
        .map_err(anyhow::Error::msg)?;
    if let Some(backend) = &cli.backend {
        cfg.backend = Some(backend.clone());
    }
    let backend = cfg.backend_kind().map_err(anyhow::Error::msg)?;

    // --- LLM backend ---
    let llm: Arc<dyn LlmPort> = match backend {
        BackendKind::Hosted => {
            let api_key = cfg.api_key();
            if api_key.is_none() {
                warn!("no API key set (TALENT_ALIGN_API_KEY / GEMINI_API_KEY); screening will fail");
            }
            info!(
                model = %cfg.model_or_default(),
                fallback = %cfg.fallback_model_or_default(),
                url = %cfg.api_url_or_default(),
                "hosted backend"
            );
            Arc::new(HostedLlmAdapter::new(
                cfg.api_url_or_default(),
                api_key,
                cfg.model_or_default(),
                cfg.fallback_model_or_default(),
            ))
        }
        BackendKind::Local => {
            info!(
                model = %cfg.local_model_or_default(),
                url = %cfg.local_url_or_default(),
                "local backend"
            );
            Arc::new(LocalLlmAdapter::new(
                cfg.local_url_or_default(),
                cfg.local_model_or_default(),
                cfg.local_max_tokens_or_default(),
            ))
        }
        BackendKind::Mock => {
            warn!("using mock AI backend; results are simulated");
            Arc::new(MockLlmAdapter::new())
        }
    };

    // --- Scan log (optional; connection failure only disables persistence) ---
    let scan_log = connect_scan_log(&cfg).await;

    let mut max_resume_chars = cfg.max_resume_chars_for(backend);
    if let Some(Commands::Screen {
        max_resume_chars: Some(n),
        ..
    }) = &cli.command
    {
        max_resume_chars = (*n > 0).then_some(*n);
    }

    let service = Arc::new(ScreeningService::new(
        llm,
        Arc::new(PdfTextExtractor),
        scan_log.clone(),
        max_resume_chars,
    ));

    match cli.command {
        Some(Commands::Screen {
            job,
            job_text,
            resumes,
            blind,
            export,
            ..
        }) => {
            let job_description = match (job, job_text) {
                (Some(path), _) => tokio::fs::read_to_string(&path).await.map_err(|e| {
                    anyhow::anyhow!("Cannot read job description {}: {}", path.display(), e)
                })?,
                (None, Some(text)) => text,
                (None, None) => String::new(),
            };
            let uploads = uploads::load_uploads(&resumes)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;

            let outcome = present_screening(
                &service,
                &job_description,
                &uploads,
                blind,
                export.as_deref(),
            )
            .await;
            if outcome.is_err() {
                std::process::exit(1);
            }
        }
        Some(Commands::History { limit }) => {
            let Some(scan_log) = scan_log else {
                anyhow::bail!(
                    "No scan log configured. Set TALENT_ALIGN_DB_PATH or TALENT_ALIGN_DB_URL."
                );
            };
            let records = scan_log
                .recent_scans(limit)
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            print!("{}", render::history_table(&records));
        }
        None => {
            talent_align::adapters::ui::init_ui();
            let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(service));
            input_port
                .run()
                .await
                .map_err(|e| anyhow::anyhow!("{}", e))?;
        }
    }

    Ok(())
}

/// Connect the configured scan log. Returns `None` when unconfigured or unreachable.
async fn connect_scan_log(cfg: &AppConfig) -> Option<Arc<dyn ScanLogPort>> {
    let connected = match cfg.scan_log_target()? {
        ScanLogTarget::Remote { url, token } => SqliteScanLog::connect_remote(&url, &token).await,
        ScanLogTarget::Local(path) => SqliteScanLog::connect_local(&path).await,
    };
    match connected {
        Ok(log) => {
            info!(location = %log.location(), "scan log enabled");
            Some(Arc::new(log))
        }
        Err(e) => {
            warn!(error = %e, "scan log unavailable, persistence disabled");
            None
        }
    }
}
