//! HTTP client for a hosted LUIS-style prediction endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::debug;

use wayfare_core::config::{ConfigError, NluConfig};

use crate::recognizer::{Recognizer, RecognizerError, RecognizerResult};

pub struct PredictionClient {
    http: Client,
    host: String,
    app_id: String,
    api_key: SecretString,
    slot: String,
}

impl PredictionClient {
    pub fn from_config(config: &NluConfig) -> Result<Self, ConfigError> {
        if config.app_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "nlu.app_id is required for the hosted recognizer".to_string(),
            ));
        }
        let api_key = config.api_key.clone().ok_or_else(|| {
            ConfigError::Validation("nlu.api_key is required for the hosted recognizer".to_string())
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| ConfigError::Validation(source.to_string()))?;

        Ok(Self {
            http,
            host: config.host.clone(),
            app_id: config.app_id.clone(),
            api_key,
            slot: config.slot.clone(),
        })
    }

    fn predict_url(&self) -> String {
        format!(
            "https://{}/luis/prediction/v3.0/apps/{}/slots/{}/predict",
            self.host, self.app_id, self.slot
        )
    }
}

#[async_trait]
impl Recognizer for PredictionClient {
    async fn recognize(&self, utterance: &str) -> Result<RecognizerResult, RecognizerError> {
        let response = self
            .http
            .get(self.predict_url())
            .query(&[
                ("subscription-key", self.api_key.expose_secret()),
                ("query", utterance),
                ("verbose", "true"),
                ("show-all-intents", "false"),
                ("log", "false"),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|source| RecognizerError::Transport(source.to_string()))?;

        let payload: Value = response
            .json()
            .await
            .map_err(|source| RecognizerError::UnexpectedPayload(source.to_string()))?;

        let result = parse_prediction(&payload)?;
        debug!(intent = %result.top_intent, score = result.score, "prediction received");
        Ok(result)
    }
}

/// Pure payload mapping, kept separate from the transport so it can be
/// exercised against recorded fixtures.
pub fn parse_prediction(payload: &Value) -> Result<RecognizerResult, RecognizerError> {
    let prediction = payload
        .get("prediction")
        .ok_or_else(|| RecognizerError::UnexpectedPayload("missing `prediction`".to_string()))?;

    let top_intent = prediction
        .get("topIntent")
        .and_then(Value::as_str)
        .ok_or_else(|| RecognizerError::UnexpectedPayload("missing `topIntent`".to_string()))?;

    let score = prediction
        .get("intents")
        .and_then(|intents| intents.get(top_intent))
        .and_then(|intent| intent.get("score"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    let entities = prediction.get("entities").cloned().unwrap_or_else(|| json!({}));

    Ok(RecognizerResult::new(top_intent, score, entities))
}
