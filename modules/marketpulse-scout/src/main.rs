use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marketpulse_common::AppConfig;
use marketpulse_scout::export::{export_all, BriefingMeta};
use marketpulse_scout::producer::GeminiSource;
use marketpulse_scout::profile::CompetitorProfile;
use marketpulse_scout::{AppStatus, PulseBoard};

#[derive(Parser)]
#[command(name = "market-pulse", about = "Competitor AI market pulse")]
struct Cli {
    /// Directory the CSV, briefing and dataset are written to
    #[arg(long, default_value = "./pulse-out")]
    output_dir: PathBuf,

    /// Refresh only; do not write any files
    #[arg(long)]
    no_export: bool,

    /// Print the drill-down for one competitor as JSON
    #[arg(long)]
    profile: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    info!("Market pulse starting...");

    let config = AppConfig::from_env()?;
    let source = GeminiSource::from_config(&config)?;

    let board = PulseBoard::new();
    let status = board.refresh(&source).await;
    if status == AppStatus::Error {
        let message = board.error().await.unwrap_or_default();
        bail!("{message}");
    }
    let data = board
        .data()
        .await
        .context("Refresh finished without a dataset")?;

    if let Some(company) = cli.profile.as_deref() {
        let profile = CompetitorProfile::for_company(&data, company);
        if !profile.is_found() {
            info!(company, "No data for competitor");
        }
        println!("{}", serde_json::to_string_pretty(&profile)?);
    }

    if cli.no_export {
        info!(moves = data.moves.len(), "Export skipped");
        return Ok(());
    }

    let meta = BriefingMeta {
        client_name: config.client_name.clone(),
        generated_on: Utc::now().date_naive(),
    };
    let report = export_all(&cli.output_dir, &data, &meta)?;
    info!(
        csv = ?report.csv,
        briefing = %report.briefing.display(),
        dataset = %report.dataset.display(),
        "Market pulse complete"
    );
    Ok(())
}
