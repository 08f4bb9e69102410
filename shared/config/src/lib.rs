use std::path::PathBuf;
use std::time::Duration;

/// Neo4j connection settings. Credentials come from the environment;
/// the database name selects the single configured target.
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub neo4j: Neo4jConfig,
    /// Directory holding the raw per-entity JSON files.
    pub raw_data_dir: PathBuf,
    /// Directory the tabular artifacts are written to and loaded from.
    pub processed_data_dir: PathBuf,
    /// When true the ETL skips defective records and reports them in the
    /// run summary instead of failing on the first defect.
    pub lenient_etl: bool,
    /// Upper bound on a single query round-trip to the store.
    pub query_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let neo4j = Neo4jConfig {
            uri: std::env::var("NEO4J_URI")
                .unwrap_or_else(|_| "bolt://localhost:7687".to_string()),
            user: std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string()),
            password: std::env::var("NEO4J_PASSWORD")
                .unwrap_or_else(|_| "password".to_string()),
            database: std::env::var("NEO4J_DATABASE").unwrap_or_else(|_| "neo4j".to_string()),
        };

        let raw_data_dir = std::env::var("RAW_DATA_DIR")
            .unwrap_or_else(|_| "data/raw_data".to_string())
            .into();
        let processed_data_dir = std::env::var("PROCESSED_DATA_DIR")
            .unwrap_or_else(|_| "data/processed_data".to_string())
            .into();

        let lenient_etl = std::env::var("ETL_LENIENT")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let query_timeout = std::env::var("QUERY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(10));

        tracing::debug!("Loaded configuration for database '{}'", neo4j.database);

        Self {
            neo4j,
            raw_data_dir,
            processed_data_dir,
            lenient_etl,
            query_timeout,
        }
    }
}
