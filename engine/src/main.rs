use anyhow::Result;
use chrono::Utc;
use tracing::{info, Level};

use insight_engine::Engine;

/// One batch tick: rebuild summaries for every subject whose local
/// Sunday-evening window is open, then exit. An external scheduler
/// (cron or similar) owns the cadence; `--force` bypasses the window
/// gate for manual reruns and backfills.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let mut data_directory: Option<String> = None;
    let mut force = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--force" => force = true,
            "--help" | "-h" => {
                println!("Usage: insight-engine [DATA_DIR] [--force]");
                println!();
                println!("  DATA_DIR   data directory (default: $INSIGHT_ENGINE_DATA_DIR or ~/.insight-engine)");
                println!("  --force    run every subject now, ignoring the Sunday-evening window");
                return Ok(());
            }
            other if data_directory.is_none() => data_directory = Some(other.to_string()),
            other => anyhow::bail!("Unexpected argument: {}", other),
        }
    }

    let engine = match data_directory {
        Some(dir) => Engine::new(dir)?,
        None => Engine::new_default()?,
    };

    let report = engine.weekly_job.run_tick(Utc::now(), force)?;
    info!(
        "Tick finished: {} processed, {} skipped, {} failed",
        report.processed, report.skipped, report.failed
    );

    if report.failed > 0 {
        anyhow::bail!("{} subject(s) failed this tick", report.failed);
    }
    Ok(())
}
