use medgraph_config::AppConfig;

use graph::loader::{load_all, reset_store};
use graph::store::Neo4jStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    let operation = std::env::args().nth(1).unwrap_or_default();

    match operation.as_str() {
        "load" => {
            let store = Neo4jStore::connect(&config.neo4j).await?;
            let summary = load_all(&store, &config.processed_data_dir).await?;
            for report in &summary.artifacts {
                tracing::info!(
                    "  {}: {} loaded, {} skipped",
                    report.artifact,
                    report.loaded,
                    report.skipped.len()
                );
            }
        }
        "reset" => {
            let store = Neo4jStore::connect(&config.neo4j).await?;
            reset_store(&store).await?;
        }
        _ => {
            eprintln!("usage: graph <load|reset>");
            std::process::exit(2);
        }
    }

    Ok(())
}
