use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

/// Pre-trained point-forecast regressor.
///
/// The service treats the model as an opaque function from an ordered feature
/// vector to a scalar demand estimate. Two serialized shapes are supported,
/// both produced by the offline training pipeline; `kind` tags which one a
/// given artifact holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastModel {
    Linear(LinearModel),
    GradientBoosted(GradientBoostedModel),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedModel {
    pub n_features: usize,
    pub base_score: f64,
    pub trees: Vec<RegressionTree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl ForecastModel {
    /// "linear" or "gradient_boosted"; used in logs and the CLI summary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::GradientBoosted(_) => "gradient_boosted",
        }
    }

    /// Number of input columns the model was trained on.
    pub fn feature_count(&self) -> usize {
        match self {
            Self::Linear(m) => m.coefficients.len(),
            Self::GradientBoosted(m) => m.n_features,
        }
    }

    /// Structural checks for a freshly deserialized model. A model that fails
    /// here is a corrupt artifact and must keep the process from starting.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self {
            Self::Linear(m) => m.validate(),
            Self::GradientBoosted(m) => m.validate(),
        }
    }

    /// Evaluate the point forecast for one feature vector.
    ///
    /// The vector length must match `feature_count`; a mismatch means the
    /// feature-list artifact and the model were trained against different
    /// layouts, so the request cannot be served.
    pub fn predict(&self, x: &[f64]) -> anyhow::Result<f64> {
        ensure!(
            x.len() == self.feature_count(),
            "model expects {} features, got {}",
            self.feature_count(),
            x.len()
        );

        let y = match self {
            Self::Linear(m) => m.predict(x),
            Self::GradientBoosted(m) => m.predict(x),
        };

        ensure!(y.is_finite(), "model produced a non-finite forecast ({y})");
        Ok(y)
    }
}

impl LinearModel {
    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            !self.coefficients.is_empty(),
            "linear model has no coefficients"
        );
        ensure!(
            self.coefficients.iter().all(|c| c.is_finite()),
            "linear model has a non-finite coefficient"
        );
        ensure!(
            self.intercept.is_finite(),
            "linear model intercept is not finite"
        );
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> f64 {
        let mut y = self.intercept;
        for (c, v) in self.coefficients.iter().zip(x) {
            y += c * v;
        }
        y
    }
}

impl GradientBoostedModel {
    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.n_features > 0,
            "gradient-boosted model declares zero features"
        );
        ensure!(
            self.base_score.is_finite(),
            "gradient-boosted base score is not finite"
        );
        ensure!(!self.trees.is_empty(), "gradient-boosted model has no trees");

        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .with_context(|| format!("tree {t} is invalid"))?;
        }
        Ok(())
    }

    fn predict(&self, x: &[f64]) -> f64 {
        let mut y = self.base_score;
        for tree in &self.trees {
            y += tree.response(x);
        }
        y
    }
}

impl RegressionTree {
    fn validate(&self, n_features: usize) -> anyhow::Result<()> {
        ensure!(!self.nodes.is_empty(), "tree has no nodes");

        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    ensure!(
                        feature < n_features,
                        "node {i} splits on feature {feature}, model has {n_features}"
                    );
                    ensure!(threshold.is_finite(), "node {i} threshold is not finite");
                    // Children must sit strictly after their parent so that
                    // traversal cannot loop and always reaches a leaf.
                    ensure!(
                        left > i && left < self.nodes.len(),
                        "node {i} left child {left} out of range"
                    );
                    ensure!(
                        right > i && right < self.nodes.len(),
                        "node {i} right child {right} out of range"
                    );
                }
                TreeNode::Leaf { value } => {
                    ensure!(value.is_finite(), "node {i} leaf value is not finite");
                }
            }
        }
        Ok(())
    }

    // Indexing is safe for a validated model: children stay in range and the
    // vector length is checked against n_features before descending.
    fn response(&self, x: &[f64]) -> f64 {
        let mut i = 0;
        loop {
            match self.nodes[i] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    i = if x[feature] < threshold { left } else { right };
                }
                TreeNode::Leaf { value } => return value,
            }
        }
    }
}
