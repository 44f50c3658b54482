pub mod advisor;
pub mod artifacts;
pub mod domain;
pub mod explain;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    use crate::explain::ExplanationMode;

    pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";
    pub const DEFAULT_PORT: u16 = 8000;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub artifacts_dir: PathBuf,
        pub explanation_mode: ExplanationMode,
        pub port: u16,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let artifacts_dir = std::env::var("ARTIFACTS_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR));

            let explanation_mode = match std::env::var("EXPLANATION_MODE") {
                Ok(raw) => ExplanationMode::parse(&raw).with_context(|| {
                    format!("EXPLANATION_MODE must be \"templated\" or \"static\", got {raw:?}")
                })?,
                Err(_) => ExplanationMode::default(),
            };

            let port = std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT);

            Ok(Self {
                artifacts_dir,
                explanation_mode,
                port,
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }
    }

}
