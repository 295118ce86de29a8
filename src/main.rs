use anyhow::{Context, Result};
use clap::Parser;
use prashna_interviews::config::{NotifierBackend, StoreBackend};
use prashna_interviews::{
    create_router, AppState, Config, DecisionTrigger, DialogueGenerator, EngineConfig,
    FileSessionStore, InMemoryJobCatalog, InMemorySessionStore, InterviewEngine, JobCatalog,
    LlmDialogueGenerator, LogNotifier, NatsClient, NatsNotifier, NatsTranscriber, Notifier,
    OpenAiCompatibleBackend, ScoreDecisionTrigger, SessionStore, Transcriber,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prashna-interviews")]
#[command(about = "Voice interview service: runs AI-led interviews over WebSocket")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/prashna")]
    config: String,

    /// Override the HTTP port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn SessionStore> = match cfg.store.backend {
        StoreBackend::Memory => {
            info!("Using in-memory session store");
            Arc::new(InMemorySessionStore::new())
        }
        StoreBackend::File => {
            info!("Using file session store at {}", cfg.store.path);
            Arc::new(FileSessionStore::open(&cfg.store.path).await?)
        }
    };
    let jobs: Arc<dyn JobCatalog> = Arc::new(InMemoryJobCatalog::new());

    info!("Connecting to STT service at {}", cfg.stt.nats_url);
    let stt_client = NatsClient::connect(&cfg.stt.nats_url, cfg.timeouts.transcription())
        .await
        .context("Failed to connect to STT NATS server")?;
    let transcriber: Arc<dyn Transcriber> =
        Arc::new(NatsTranscriber::new(stt_client, cfg.stt.clone()));

    let backend = OpenAiCompatibleBackend::from_env(cfg.llm.clone())?;
    info!("Dialogue model: {}", cfg.llm.model);
    let dialogue: Arc<dyn DialogueGenerator> = Arc::new(LlmDialogueGenerator::new(backend));

    let notifier: Arc<dyn Notifier> = match cfg.notifications.backend {
        NotifierBackend::Log => Arc::new(LogNotifier),
        NotifierBackend::Nats => {
            let client = NatsClient::connect(&cfg.notifications.nats_url, cfg.timeouts.send())
                .await
                .context("Failed to connect to notification NATS server")?;
            Arc::new(NatsNotifier::new(client, cfg.notifications.subject.clone()))
        }
    };
    let decision: Arc<dyn DecisionTrigger> = Arc::new(ScoreDecisionTrigger::new(
        store.clone(),
        notifier,
        cfg.interview.hire_threshold,
    ));

    let engine = Arc::new(InterviewEngine::new(
        store.clone(),
        jobs.clone(),
        transcriber,
        dialogue,
        decision,
        EngineConfig::new(&cfg.interview, &cfg.timeouts),
    ));
    info!(
        "Interviews run {} turns, hire threshold {}",
        engine.config().max_turns,
        cfg.interview.hire_threshold
    );

    let state = AppState::new(engine, store, jobs, cfg.service.public_base_url.clone());
    let app = create_router(state, &cfg.service.cors_origins);

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(())
}
