//! Credence command-line entrypoint.
//!
//! `credence [TEXT]` analyzes TEXT (or stdin when no text is given) and prints
//! the result as JSON on stdout. Logs go to stderr.

use anyhow::{Context, bail};
use mimalloc::MiMalloc;
use tokio::io::AsyncReadExt;

use credence::config::Config;
use credence::context::AppContext;
use credence::pipeline::{AnalysisPipeline, PipelineError};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const EXIT_MODEL_UNAVAILABLE: i32 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let health_check = args.iter().any(|arg| arg == "--health-check");

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        classifier = ?config.classifier_path,
        sentiment = ?config.sentiment_path,
        ner = ?config.ner_path,
        llm_model = %config.llm_model,
        "Credence starting"
    );

    let context = AppContext::from_config(&config);

    if health_check {
        let report = context.health();
        println!("{}", serde_json::to_string_pretty(&report)?);
        std::process::exit(if report.is_ready() { 0 } else { 1 });
    }

    let text = read_input(&args).await?;
    let pipeline = AnalysisPipeline::new(context);

    match pipeline.analyze(&text).await {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Err(PipelineError::ModelUnavailable { reason }) => {
            tracing::error!(reason = %reason, "Analysis aborted: model unavailable");
            std::process::exit(EXIT_MODEL_UNAVAILABLE);
        }
    }
}

async fn read_input(args: &[String]) -> anyhow::Result<String> {
    let positional: Vec<&str> = args
        .iter()
        .filter(|arg| !arg.starts_with("--"))
        .map(String::as_str)
        .collect();

    let text = if positional.is_empty() {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("failed to read text from stdin")?;
        buf
    } else {
        positional.join(" ")
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        bail!("no text to analyze: pass it as an argument or on stdin");
    }
    Ok(text)
}
