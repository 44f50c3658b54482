use crate::domain::request::RecommendationRequest;

/// Which explanation text the response carries.
///
/// `Templated` assembles the sentence from the request and the forecast.
/// `Static` is the legacy fixed narrative, retained behind a config switch
/// for callers that still pin on the old wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExplanationMode {
    #[default]
    Templated,
    Static,
}

impl ExplanationMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "templated" => Some(Self::Templated),
            "static" => Some(Self::Static),
            _ => None,
        }
    }
}

/// Legacy narrative; ignores the request and the forecast entirely.
pub const STATIC_REASON: &str =
    "Baseline demand is low, but recent demand variability introduces uncertainty. A small safety buffer is recommended to reduce the risk of stock-outs.";

pub fn render(req: &RecommendationRequest, p50: f64, p90: f64, mode: ExplanationMode) -> String {
    match mode {
        ExplanationMode::Templated => build_explanation(req, p50, p90),
        ExplanationMode::Static => STATIC_REASON.to_string(),
    }
}

/// Assemble the one-sentence explanation from independent clauses.
///
/// Clause order is fixed. The sales, uncertainty and risk-setting clauses
/// always contribute one of two variants; the promotion, festival and
/// discount clauses are omitted when their trigger is off.
pub fn build_explanation(req: &RecommendationRequest, p50: f64, p90: f64) -> String {
    let mut reasons: Vec<&'static str> = Vec::new();

    if req.lag_1 > req.rolling_mean_7 {
        reasons.push("recent sales are higher than usual");
    } else {
        reasons.push("recent sales are lower than average");
    }

    if (p90 - p50) > 0.5 * p50 {
        reasons.push("demand uncertainty is elevated");
    } else {
        reasons.push("demand uncertainty is low");
    }

    if req.promo_active() {
        reasons.push("a promotion is currently active");
    }

    if req.festival_period() {
        reasons.push("the period coincides with a festival");
    }

    if req.discount_pct >= 30.0 {
        reasons.push("a high discount is applied");
    }

    if req.risk_alpha >= 0.7 {
        reasons.push("a higher risk tolerance was selected");
    } else {
        reasons.push("a conservative risk setting was selected");
    }

    format!("The recommendation considers that {}.", reasons.join(", "))
}
