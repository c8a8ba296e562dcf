use super::models::{
    ApiOutcome, IndicatorRow, ObservationRow, SaveIndicatorRequest, SaveScorecardRequest,
};
use super::ApiError;
use std::path::Path;
use std::time::Duration;

const SCORECARD_CHART: &str = "/api/scorecard_chart";
const INDICATORS: &str = "/api/indicators";
const SAVE_SCORECARD: &str = "/api/save_scorecard";
const SAVE_INDICATOR: &str = "/api/save_indicator";

/// Thin client over the scorecard backend. One read endpoint feeds the
/// whole dashboard; the two write endpoints back the admin forms.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches the full observation set. Called once before the UI starts
    /// and again on explicit reload.
    pub async fn fetch_observations(&self) -> Result<Vec<ObservationRow>, ApiError> {
        self.get_json(SCORECARD_CHART).await
    }

    pub async fn fetch_indicators(&self) -> Result<Vec<IndicatorRow>, ApiError> {
        self.get_json(INDICATORS).await
    }

    pub async fn save_scorecard(
        &self,
        request: &SaveScorecardRequest,
    ) -> Result<String, ApiError> {
        self.post_json(SAVE_SCORECARD, request).await
    }

    pub async fn save_indicator(
        &self,
        request: &SaveIndicatorRequest,
    ) -> Result<String, ApiError> {
        self.post_json(SAVE_INDICATOR, request).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &'static str,
    ) -> Result<T, ApiError> {
        let url = format!("{}{endpoint}", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Error replies still carry a JSON envelope when the backend
            // produced them itself.
            if let Ok(outcome) = serde_json::from_str::<ApiOutcome>(&body) {
                if let Err(error) = outcome.into_result() {
                    return Err(ApiError::Rejected(error));
                }
            }
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> Result<String, ApiError> {
        let url = format!("{}{endpoint}", self.base_url);
        let response = self.http.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        let outcome: ApiOutcome = serde_json::from_str(&text)
            .map_err(|source| ApiError::Decode { endpoint, source })?;

        match outcome.into_result() {
            Ok(message) if status.is_success() => Ok(message),
            Ok(_) => Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            }),
            Err(error) => Err(ApiError::Rejected(error)),
        }
    }
}

/// Reads the same JSON array `/api/scorecard_chart` serves from a local
/// snapshot file. Used by `--data` and by offline work.
pub fn load_observations(path: impl AsRef<Path>) -> Result<Vec<ObservationRow>, ApiError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ApiError::File {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ApiError::Decode {
        endpoint: "local snapshot",
        source,
    })
}
