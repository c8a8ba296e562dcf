use crate::api::models::{
    IndicatorRow, ObservationRow, SaveIndicatorRequest, SaveScorecardRequest,
};
use crate::api::{load_observations, ApiClient};
use crate::config::AppConfig;
use color_eyre::Result;

/// Backend operations the UI triggers. Everything goes through the HTTP
/// client except the optional local snapshot used for offline work.
#[derive(Debug, Clone)]
pub struct AppActions {
    client: ApiClient,
    data_path: Option<String>,
}

impl AppActions {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = ApiClient::new(config.api_url.clone())?;
        Ok(Self {
            client,
            data_path: config.data_path.clone(),
        })
    }

    pub fn api_url(&self) -> &str {
        self.client.base_url()
    }

    /// The full observation set: local snapshot when one was configured,
    /// otherwise the backend.
    pub async fn fetch_observations(&self) -> Result<Vec<ObservationRow>> {
        if let Some(path) = &self.data_path {
            return load_observations(path).map_err(Into::into);
        }
        self.client.fetch_observations().await.map_err(Into::into)
    }

    pub async fn fetch_indicators(&self) -> Result<Vec<IndicatorRow>> {
        self.client.fetch_indicators().await.map_err(Into::into)
    }

    pub async fn save_observation(&self, request: &SaveScorecardRequest) -> Result<String> {
        self.client.save_scorecard(request).await.map_err(Into::into)
    }

    pub async fn save_indicator(&self, request: &SaveIndicatorRequest) -> Result<String> {
        self.client.save_indicator(request).await.map_err(Into::into)
    }
}
