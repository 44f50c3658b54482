use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod model;

pub use model::ForecastModel;

// File names inside the artifact directory. Fixed contract with the offline
// training pipeline.
pub const MODEL_FILE: &str = "demand_forecast_model.json";
pub const FEATURE_LIST_FILE: &str = "feature_list.json";
pub const RESIDUAL_FILE: &str = "residual_q90.json";

/// Ordered feature names. The order defines the column layout fed to the
/// model, so it must match what the model was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureList(Vec<String>);

impl FeatureList {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for FeatureList {
    fn from(names: Vec<String>) -> Self {
        Self(names)
    }
}

/// The three read-only artifacts the service needs before it can serve
/// traffic.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub model: ForecastModel,
    pub features: FeatureList,
    pub residual_q90: f64,
}

impl ArtifactBundle {
    /// Load and validate all three artifacts from `dir`.
    ///
    /// Any missing or corrupt file is an error; the caller must refuse to
    /// start serving in that case.
    pub fn load_from_dir(dir: &Path) -> anyhow::Result<Self> {
        let model: ForecastModel = read_json(&dir.join(MODEL_FILE))?;
        model
            .validate()
            .with_context(|| format!("{MODEL_FILE} is structurally invalid"))?;

        let features: FeatureList = read_json(&dir.join(FEATURE_LIST_FILE))?;
        ensure!(!features.is_empty(), "{FEATURE_LIST_FILE} is empty");

        let residual_q90: f64 = read_json(&dir.join(RESIDUAL_FILE))?;
        ensure!(
            residual_q90.is_finite() && residual_q90 >= 0.0,
            "{RESIDUAL_FILE} must hold a finite non-negative number (got {residual_q90})"
        );

        tracing::info!(
            model_kind = model.kind(),
            model_features = model.feature_count(),
            feature_list_len = features.len(),
            residual_q90,
            "artifact bundle loaded"
        );

        Ok(Self {
            model,
            features,
            residual_q90,
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read artifact {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("artifact {} does not match its schema", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_bundle(dir: &Path, model: &str, features: &str, residual: &str) {
        std::fs::write(dir.join(MODEL_FILE), model).unwrap();
        std::fs::write(dir.join(FEATURE_LIST_FILE), features).unwrap();
        std::fs::write(dir.join(RESIDUAL_FILE), residual).unwrap();
    }

    const LINEAR_MODEL: &str =
        r#"{"kind": "linear", "coefficients": [1.0, 0.5], "intercept": 3.0}"#;

    #[test]
    fn loads_a_complete_bundle() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path(), LINEAR_MODEL, r#"["lag_1", "lag_7"]"#, "12.5");

        let bundle = ArtifactBundle::load_from_dir(dir.path()).unwrap();
        assert_eq!(bundle.model.kind(), "linear");
        assert_eq!(bundle.features.len(), 2);
        assert_eq!(bundle.residual_q90, 12.5);
        assert_eq!(
            bundle.features.names().collect::<Vec<_>>(),
            vec!["lag_1", "lag_7"]
        );
    }

    #[test]
    fn missing_model_file_names_the_artifact() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(FEATURE_LIST_FILE), r#"["lag_1"]"#).unwrap();
        std::fs::write(dir.path().join(RESIDUAL_FILE), "1.0").unwrap();

        let err = ArtifactBundle::load_from_dir(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains(MODEL_FILE));
    }

    #[test]
    fn corrupt_model_json_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path(), "not json {", r#"["lag_1"]"#, "1.0");

        assert!(ArtifactBundle::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn structurally_invalid_model_is_fatal() {
        let dir = TempDir::new().unwrap();
        let no_coefficients = r#"{"kind": "linear", "coefficients": [], "intercept": 0.0}"#;
        write_bundle(dir.path(), no_coefficients, r#"["lag_1"]"#, "1.0");

        let err = ArtifactBundle::load_from_dir(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("structurally invalid"));
    }

    #[test]
    fn empty_feature_list_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path(), LINEAR_MODEL, "[]", "1.0");

        let err = ArtifactBundle::load_from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains(FEATURE_LIST_FILE));
    }

    #[test]
    fn negative_residual_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path(), LINEAR_MODEL, r#"["lag_1", "lag_7"]"#, "-2.0");

        let err = ArtifactBundle::load_from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains(RESIDUAL_FILE));
    }

    #[test]
    fn non_numeric_residual_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path(), LINEAR_MODEL, r#"["lag_1", "lag_7"]"#, r#""high""#);

        assert!(ArtifactBundle::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn zero_residual_is_allowed() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path(), LINEAR_MODEL, r#"["lag_1", "lag_7"]"#, "0.0");

        let bundle = ArtifactBundle::load_from_dir(dir.path()).unwrap();
        assert_eq!(bundle.residual_q90, 0.0);
    }

    #[test]
    fn bundled_demo_artifacts_stay_consistent() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../artifacts");

        let bundle = ArtifactBundle::load_from_dir(&dir).unwrap();
        assert_eq!(bundle.model.feature_count(), bundle.features.len());
    }
}
