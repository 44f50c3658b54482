use anyhow::bail;

use crate::artifacts::ArtifactBundle;
use crate::domain::recommendation::{Action, Recommendation, RiskLevel};
use crate::domain::request::RecommendationRequest;
use crate::explain::{self, ExplanationMode};

/// Produce an order recommendation for one request.
///
/// Pure function of the request and the startup artifacts; safe to call from
/// any number of concurrent requests.
pub fn recommend(
    artifacts: &ArtifactBundle,
    req: &RecommendationRequest,
    mode: ExplanationMode,
) -> anyhow::Result<Recommendation> {
    // Model input vector, in the exact order the feature-list artifact
    // dictates. A name the request schema cannot resolve is a contract
    // mismatch between the deployed artifacts and this service.
    let mut vector = Vec::with_capacity(artifacts.features.len());
    for name in artifacts.features.names() {
        match req.feature(name) {
            Some(value) => vector.push(value),
            None => bail!("feature {name:?} from the feature list is not a request field"),
        }
    }

    let p50 = artifacts.model.predict(&vector)?;
    let p90 = p50 + artifacts.residual_q90;

    // Risk-weighted blend between the point estimate and the upper band;
    // clamped because a negative order makes no sense.
    let blended = (p50 + req.risk_alpha * (p90 - p50)).max(0.0);
    let action = if blended.round() as i64 > 0 {
        Action::Order
    } else {
        Action::NoOrder
    };

    // The returned quantity is a heuristic on the latest observed demand,
    // not on the forecast. The forecast only drives `action` and the
    // confidence band. Longstanding behavior callers depend on.
    let quantity = (req.lag_1 * (1.0 + req.discount_pct / 100.0) * req.risk_alpha) as i64;

    Ok(Recommendation {
        action,
        quantity,
        risk_level: RiskLevel::from_alpha(req.risk_alpha),
        confidence_band: format!("{}\u{2013}{} units", p50 as i64, p90 as i64),
        reason: explain::render(req, p50, p90, mode),
    })
}
