//! Intake scorer binary
//!
//! ```text
//! intake-scorer [--import <requests.json>] [REQUEST_ID ...]
//! ```
//!
//! Imports flat intake submissions (a JSON array), then computes and prints
//! the score record for each given request id, or for every stored request
//! when no ids are given.

use anyhow::{bail, Context};
use intake_store::{
    Config, IntakeRequest, IntakeStore, IntakeSubmission, MemoryStore, ScoringService, Storage,
    StoreBackend,
};
use risk_engine::RiskScoringEngine;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

struct Args {
    import: Option<PathBuf>,
    request_ids: Vec<Uuid>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut import = None;
    let mut request_ids = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--import" => {
                let path = args.next().context("--import requires a file path")?;
                import = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("Unknown flag: {}", flag),
            id => request_ids.push(
                Uuid::parse_str(id).with_context(|| format!("Invalid request id: {}", id))?,
            ),
        }
    }

    Ok(Args {
        import,
        request_ids,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = parse_args()?;

    // Load configuration
    let config = Config::load()?;
    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        backend = ?config.backend,
        "Starting intake scorer"
    );

    // Invalid weights stop here, before anything is scored
    let engine = RiskScoringEngine::new(&config.weights)?;

    match config.backend {
        StoreBackend::Memory => run(Arc::new(MemoryStore::new()), engine, args).await,
        StoreBackend::Rocksdb => run(Arc::new(Storage::open(&config)?), engine, args).await,
    }
}

async fn run<S: IntakeStore>(
    store: Arc<S>,
    engine: RiskScoringEngine,
    args: Args,
) -> anyhow::Result<()> {
    if let Some(path) = &args.import {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let submissions: Vec<IntakeSubmission> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        for submission in submissions {
            let request = IntakeRequest::from_submission(submission);
            store.put_request(&request)?;
            tracing::info!(request_id = %request.id, title = %request.title, "Imported request");
        }
    }

    let request_ids = if args.request_ids.is_empty() {
        store.list_requests()?.into_iter().map(|r| r.id).collect()
    } else {
        args.request_ids
    };

    let service = ScoringService::new(engine, store)?;
    for request_id in request_ids {
        let record = service.compute(request_id).await?;
        println!("{}", serde_json::to_string_pretty(&record)?);
    }

    tracing::info!(
        computed = service.metrics().computations_total.get(),
        "Intake scorer finished"
    );
    Ok(())
}
