use serde::{Deserialize, Serialize};

/// One recommendation request: recent demand history, calendar context and
/// the caller's risk appetite.
///
/// Field names double as feature names. The feature-list artifact addresses
/// these fields by name when the model input vector is assembled, so renaming
/// a field here is a breaking change against deployed artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub lag_1: f64,
    pub lag_7: f64,
    pub lag_14: f64,
    pub rolling_mean_7: f64,
    pub rolling_std_14: f64,
    pub rolling_median_7: f64,
    pub promo: i32,
    pub festival: i32,
    pub discount_pct: f64,
    pub day_of_week: i32,
    pub week_of_year: i32,
    pub month: i32,
    #[serde(default = "default_risk_alpha")]
    pub risk_alpha: f64,
}

fn default_risk_alpha() -> f64 {
    0.8
}

impl RecommendationRequest {
    /// Resolve a feature value by name.
    ///
    /// Returns `None` for a name outside the request schema, which the caller
    /// treats as a contract mismatch between the feature-list artifact and
    /// this schema.
    pub fn feature(&self, name: &str) -> Option<f64> {
        let value = match name {
            "lag_1" => self.lag_1,
            "lag_7" => self.lag_7,
            "lag_14" => self.lag_14,
            "rolling_mean_7" => self.rolling_mean_7,
            "rolling_std_14" => self.rolling_std_14,
            "rolling_median_7" => self.rolling_median_7,
            "promo" => f64::from(self.promo),
            "festival" => f64::from(self.festival),
            "discount_pct" => self.discount_pct,
            "day_of_week" => f64::from(self.day_of_week),
            "week_of_year" => f64::from(self.week_of_year),
            "month" => f64::from(self.month),
            "risk_alpha" => self.risk_alpha,
            _ => return None,
        };
        Some(value)
    }

    // Flags are integers on the wire; any non-zero value counts as set.
    pub fn promo_active(&self) -> bool {
        self.promo != 0
    }

    pub fn festival_period(&self) -> bool {
        self.festival != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> serde_json::Value {
        json!({
            "lag_1": 100.0,
            "lag_7": 90.0,
            "lag_14": 85.0,
            "rolling_mean_7": 95.0,
            "rolling_std_14": 5.0,
            "rolling_median_7": 92.0,
            "promo": 1,
            "festival": 0,
            "discount_pct": 20.0,
            "day_of_week": 3,
            "week_of_year": 10,
            "month": 3,
            "risk_alpha": 0.8
        })
    }

    #[test]
    fn parses_full_payload() {
        let req: RecommendationRequest = serde_json::from_value(sample_payload()).unwrap();
        assert_eq!(req.lag_1, 100.0);
        assert_eq!(req.promo, 1);
        assert_eq!(req.risk_alpha, 0.8);
    }

    #[test]
    fn risk_alpha_defaults_when_absent() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("risk_alpha");

        let req: RecommendationRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(req.risk_alpha, 0.8);
    }

    #[test]
    fn missing_demand_field_is_an_error() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("lag_7");

        assert!(serde_json::from_value::<RecommendationRequest>(payload).is_err());
    }

    #[test]
    fn unknown_payload_fields_are_ignored() {
        let mut payload = sample_payload();
        payload
            .as_object_mut()
            .unwrap()
            .insert("store_id".into(), json!("S-104"));

        assert!(serde_json::from_value::<RecommendationRequest>(payload).is_ok());
    }

    #[test]
    fn integer_literals_fill_float_fields() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().insert("lag_1".into(), json!(100));

        let req: RecommendationRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(req.lag_1, 100.0);
    }

    #[test]
    fn every_schema_field_resolves_by_name() {
        let req: RecommendationRequest = serde_json::from_value(sample_payload()).unwrap();
        let names = [
            "lag_1",
            "lag_7",
            "lag_14",
            "rolling_mean_7",
            "rolling_std_14",
            "rolling_median_7",
            "promo",
            "festival",
            "discount_pct",
            "day_of_week",
            "week_of_year",
            "month",
            "risk_alpha",
        ];
        for name in names {
            assert!(req.feature(name).is_some(), "{name} should resolve");
        }
        assert_eq!(req.feature("promo"), Some(1.0));
        assert_eq!(req.feature("day_of_week"), Some(3.0));
    }

    #[test]
    fn unknown_name_does_not_resolve() {
        let req: RecommendationRequest = serde_json::from_value(sample_payload()).unwrap();
        assert_eq!(req.feature("unit_price"), None);
        assert_eq!(req.feature(""), None);
    }

    #[test]
    fn flag_helpers_treat_nonzero_as_set() {
        let mut req: RecommendationRequest = serde_json::from_value(sample_payload()).unwrap();
        assert!(req.promo_active());
        assert!(!req.festival_period());

        req.promo = 0;
        req.festival = 2;
        assert!(!req.promo_active());
        assert!(req.festival_period());
    }
}
