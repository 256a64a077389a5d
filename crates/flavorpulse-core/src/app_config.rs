use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Optional YAML file with extra ingredient aliases.
    pub aliases_path: Option<PathBuf>,
    /// Optional YAML file with demand-band success rates.
    pub calibration_path: Option<PathBuf>,
    pub calibration_ttl_secs: u64,
    /// Upper bound on combinations scored at once by `batch`.
    pub max_concurrent_scores: usize,
}
