use medgraph_config::AppConfig;

use etl::{run_etl, EtlMode};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    let mode = if config.lenient_etl {
        EtlMode::Lenient
    } else {
        EtlMode::Strict
    };

    let summary = run_etl(&config.raw_data_dir, &config.processed_data_dir, mode)?;

    for (artifact, rows) in &summary.artifacts {
        tracing::info!("  {artifact}: {rows} row(s)");
    }
    for skipped in &summary.skipped {
        tracing::warn!(
            "  skipped {} record {}: {}",
            skipped.entity,
            skipped.record,
            skipped.reason
        );
    }

    Ok(())
}
