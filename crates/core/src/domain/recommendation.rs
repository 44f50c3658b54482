use serde::{Deserialize, Serialize};

/// Order / hold decision derived from the risk-weighted forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Order,
    NoOrder,
}

/// Qualitative tier for the caller's risk appetite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Boundary values belong to the upper tier: 0.4 is already Medium and
    /// 0.7 is already High.
    pub fn from_alpha(alpha: f64) -> Self {
        if alpha < 0.4 {
            Self::Low
        } else if alpha < 0.7 {
            Self::Medium
        } else {
            Self::High
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    pub quantity: i64,
    pub risk_level: RiskLevel,
    pub confidence_band: String,
    pub reason: String,
}
