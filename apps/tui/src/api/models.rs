use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One flat observation row as served by `/api/scorecard_chart`.
///
/// The backend emits capitalized keys; everything numeric arrives either
/// as a number or as a stringly-typed column, so the optional fields stay
/// permissive here and the store decides what is usable.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationRow {
    #[serde(rename = "ID")]
    pub indicator_id: Option<i64>,
    #[serde(rename = "Category_ID")]
    pub category_id: Option<i64>,
    #[serde(rename = "Secondary_ID")]
    pub secondary_id: i64,
    #[serde(rename = "Group_Name")]
    pub group_name: Option<String>,
    #[serde(rename = "Indicator")]
    pub indicator: Option<String>,
    #[serde(rename = "Proxy")]
    pub proxy: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Year_Type")]
    pub year_type: Option<i64>,
    #[serde(rename = "Source")]
    pub source: Option<String>,
    #[serde(rename = "Value")]
    pub value: Option<String>,
    #[serde(rename = "Value_N")]
    pub value_n: Option<String>,
    #[serde(rename = "Value_Map")]
    pub value_map: Option<String>,
    #[serde(rename = "Value_Standardized")]
    pub value_standardized: Option<f64>,
    #[serde(rename = "Positive")]
    pub positive: Option<bool>,
    #[serde(rename = "Value_Standardized_Table")]
    pub value_standardized_table: Option<f64>,
}

/// One indicator definition as served by `/api/indicators`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndicatorRow {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "IndicatorID")]
    pub indicator_id: Option<i64>,
    #[serde(rename = "API_url")]
    pub api_url: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "CategoryID")]
    pub category_id: Option<i64>,
    #[serde(rename = "Dataset")]
    pub dataset: Option<String>,
    #[serde(rename = "Proxy")]
    pub proxy: Option<String>,
    #[serde(rename = "Source")]
    pub source: Option<String>,
    #[serde(rename = "IndicatorCode")]
    pub indicator_code: Option<String>,
    #[serde(rename = "IndicatorName")]
    pub indicator_name: String,
    #[serde(rename = "Positive_Negative_Indicator")]
    pub positive_negative_indicator: Option<bool>,
    #[serde(rename = "Number_Percent")]
    pub number_percent: Option<bool>,
    #[serde(rename = "Notes")]
    pub notes: Option<String>,
    /// Calendar year per country code, as stored (stringly).
    #[serde(rename = "Years", default)]
    pub years: BTreeMap<String, Option<String>>,
    /// Recency slot per country code.
    #[serde(rename = "Year_Types", default)]
    pub year_types: BTreeMap<String, Option<i64>>,
}

/// Payload for `POST /api/save_scorecard`. Snake_case keys are what the
/// write endpoint validates.
#[derive(Debug, Clone, Serialize)]
pub struct SaveScorecardRequest {
    /// None creates a new row; Some updates an existing one.
    pub secondary_id: Option<i64>,
    pub id: Option<i64>,
    pub category_id: Option<i64>,
    pub group_name: String,
    pub indicator: String,
    pub proxy: String,
    pub country: String,
    pub year: String,
    pub year_type: Option<i64>,
    pub source: String,
    pub value: String,
    pub value_n: Option<f64>,
    pub value_map: Option<String>,
    pub value_standardized: Option<f64>,
    pub positive: bool,
    pub value_standardized_table: Option<f64>,
}

/// Payload for `POST /api/save_indicator`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveIndicatorRequest {
    pub id: i64,
    pub indicator_id: i64,
    pub api_url: String,
    pub dataset: String,
    pub indicator_code: String,
    pub indicator_name: String,
    pub positive_negative_indicator: bool,
    pub number_percent: bool,
    pub proxy: String,
    pub category: String,
    pub category_id: Option<i64>,
    pub source: String,
    pub notes: String,
    pub years: BTreeMap<String, Option<i64>>,
    pub year_types: BTreeMap<String, Option<i64>>,
}

/// Reply envelope for the write endpoints: exactly one of the two fields.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiOutcome {
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ApiOutcome {
    pub fn into_result(self) -> Result<String, String> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(self
            .message
            .unwrap_or_else(|| "Saved successfully".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observation_row_decodes_backend_keys() {
        let json = r#"{
            "ID": 12, "Category_ID": 4, "Secondary_ID": 901,
            "Group_Name": "Vision", "Indicator": "GDP",
            "Proxy": "GDP per capita", "Country": "India",
            "Year": "2022", "Year_Type": 1, "Source": "WDI",
            "Value": "2388", "Value_N": "2388.0", "Value_Map": "2,388",
            "Value_Standardized": 80.5, "Positive": true,
            "Value_Standardized_Table": 41.0
        }"#;
        let row: ObservationRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.secondary_id, 901);
        assert_eq!(row.group_name.as_deref(), Some("Vision"));
        assert_eq!(row.year_type, Some(1));
        assert_eq!(row.value_standardized, Some(80.5));
    }

    #[test]
    fn observation_row_tolerates_missing_values() {
        let json = r#"{"Secondary_ID": 7, "Country": "Nepal"}"#;
        let row: ObservationRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.secondary_id, 7);
        assert!(row.value_standardized.is_none());
        assert!(row.year.is_none());
        assert!(row.year_type.is_none());
    }

    #[test]
    fn outcome_prefers_error_over_message() {
        let ok: ApiOutcome = serde_json::from_str(r#"{"message": "Scorecard saved"}"#).unwrap();
        assert_eq!(ok.into_result().as_deref(), Ok("Scorecard saved"));

        let err: ApiOutcome =
            serde_json::from_str(r#"{"error": "Missing required fields: year"}"#).unwrap();
        assert_eq!(
            err.into_result(),
            Err("Missing required fields: year".to_string())
        );
    }

    #[test]
    fn save_scorecard_serializes_snake_case() {
        let request = SaveScorecardRequest {
            secondary_id: Some(901),
            id: Some(12),
            category_id: Some(4),
            group_name: "Vision".to_string(),
            indicator: "GDP".to_string(),
            proxy: String::new(),
            country: "India".to_string(),
            year: "2022".to_string(),
            year_type: Some(1),
            source: "WDI".to_string(),
            value: "2388".to_string(),
            value_n: Some(2388.0),
            value_map: None,
            value_standardized: Some(80.5),
            positive: true,
            value_standardized_table: Some(41.0),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["secondary_id"], 901);
        assert_eq!(json["group_name"], "Vision");
        assert_eq!(json["year_type"], 1);
        assert!(json.get("Group_Name").is_none());
    }
}
