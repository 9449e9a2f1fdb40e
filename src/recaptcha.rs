//! reCAPTCHA v3 verification
//!
//! Tokens are checked by POSTing `secret` and `response` form-encoded to the
//! verification endpoint. A token is accepted only when the endpoint reports
//! `success: true` and a score strictly above the configured threshold.
//! Anything else, including network errors and a missing secret, is a
//! rejection.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::RecaptchaConfig;

/// Body returned by the verification endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecaptchaResponse {
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub challenge_ts: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

impl RecaptchaResponse {
    /// `success` and a score strictly above `threshold`
    pub fn passes(&self, threshold: f64) -> bool {
        self.success && self.score.is_some_and(|score| score > threshold)
    }
}

pub struct RecaptchaService {
    client: reqwest::Client,
    secret: Option<String>,
    verify_url: String,
    threshold: f64,
    required: bool,
}

impl RecaptchaService {
    pub fn new(config: &RecaptchaConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let secret = config
            .secret_key
            .clone()
            .filter(|s| !s.trim().is_empty());
        if secret.is_none() {
            warn!("reCAPTCHA secret key not configured; verification will always fail");
        }

        Ok(Self {
            client,
            secret,
            verify_url: config.verify_url.clone(),
            threshold: config.score_threshold,
            required: config.required,
        })
    }

    /// Whether contact submissions must pass verification
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Verify a client token. Never errors; failures are `false`.
    pub async fn verify(&self, token: &str) -> bool {
        let Some(secret) = self.secret.as_deref() else {
            warn!("reCAPTCHA secret key not configured, rejecting token");
            return false;
        };

        match self.request(secret, token).await {
            Ok(response) if response.passes(self.threshold) => {
                debug!("reCAPTCHA verification succeeded (score {:?})", response.score);
                true
            }
            Ok(response) => {
                warn!(
                    "reCAPTCHA verification failed: success={}, score={:?}, errors={:?}",
                    response.success, response.score, response.error_codes
                );
                false
            }
            Err(e) => {
                error!("Error verifying reCAPTCHA: {:#}", e);
                false
            }
        }
    }

    async fn request(&self, secret: &str, token: &str) -> Result<RecaptchaResponse> {
        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await
            .context("Failed to reach reCAPTCHA endpoint")?
            .error_for_status()
            .context("reCAPTCHA endpoint returned an error status")?;

        response
            .json::<RecaptchaResponse>()
            .await
            .context("Failed to decode reCAPTCHA response")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::post, Form, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    pub(crate) type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

    #[derive(Clone)]
    struct MockState {
        status: StatusCode,
        body: Value,
        seen: Seen,
    }

    async fn siteverify(
        State(state): State<MockState>,
        Form(form): Form<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        state.seen.lock().unwrap().push(form);
        (state.status, Json(state.body))
    }

    /// Start a local verification endpoint returning `body` with `status`
    pub(crate) async fn mock_endpoint(status: StatusCode, body: Value) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let app = Router::new()
            .route("/siteverify", post(siteverify))
            .with_state(MockState {
                status,
                body,
                seen: seen.clone(),
            });
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}/siteverify", addr), seen)
    }

    fn service(url: &str, secret: Option<&str>) -> RecaptchaService {
        RecaptchaService::new(&RecaptchaConfig {
            secret_key: secret.map(str::to_string),
            verify_url: url.to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_passes_threshold_is_strict() {
        let at = RecaptchaResponse {
            success: true,
            score: Some(0.5),
            ..Default::default()
        };
        let above = RecaptchaResponse {
            score: Some(0.51),
            ..at.clone()
        };
        assert!(!at.passes(0.5));
        assert!(above.passes(0.5));
    }

    #[test]
    fn test_response_decodes_error_codes() {
        let response: RecaptchaResponse = serde_json::from_value(json!({
            "success": false,
            "error-codes": ["invalid-input-secret"]
        }))
        .unwrap();
        assert_eq!(response.error_codes, vec!["invalid-input-secret"]);
        assert!(response.score.is_none());
    }

    #[tokio::test]
    async fn test_valid_token_accepted_and_form_encoded() {
        let (url, seen) =
            mock_endpoint(StatusCode::OK, json!({"success": true, "score": 0.9, "error-codes": []})).await;

        assert!(service(&url, Some("testSecretKey")).verify("validToken").await);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["secret"], "testSecretKey");
        assert_eq!(seen[0]["response"], "validToken");
    }

    #[tokio::test]
    async fn test_unsuccessful_response_rejected() {
        let (url, _) = mock_endpoint(
            StatusCode::OK,
            json!({"success": false, "score": 0.9, "error-codes": ["invalid-input-response"]}),
        )
        .await;
        assert!(!service(&url, Some("secret")).verify("token").await);
    }

    #[tokio::test]
    async fn test_low_score_rejected() {
        let (url, _) = mock_endpoint(StatusCode::OK, json!({"success": true, "score": 0.3})).await;
        assert!(!service(&url, Some("secret")).verify("token").await);
    }

    #[tokio::test]
    async fn test_missing_score_rejected() {
        let (url, _) = mock_endpoint(StatusCode::OK, json!({"success": true})).await;
        assert!(!service(&url, Some("secret")).verify("token").await);
    }

    #[tokio::test]
    async fn test_error_status_rejected() {
        let (url, _) =
            mock_endpoint(StatusCode::INTERNAL_SERVER_ERROR, json!({"success": true, "score": 0.9})).await;
        assert!(!service(&url, Some("secret")).verify("token").await);
    }

    #[tokio::test]
    async fn test_undecodable_body_rejected() {
        let (url, _) = mock_endpoint(StatusCode::OK, json!("not an object")).await;
        assert!(!service(&url, Some("secret")).verify("token").await);
    }

    #[tokio::test]
    async fn test_transport_error_rejected() {
        // Nothing listens on port 1.
        assert!(!service("http://127.0.0.1:1/siteverify", Some("secret")).verify("token").await);
    }

    #[tokio::test]
    async fn test_missing_secret_rejected_without_request() {
        let (url, seen) = mock_endpoint(StatusCode::OK, json!({"success": true, "score": 0.9})).await;

        assert!(!service(&url, None).verify("token").await);
        assert!(!service(&url, Some("  ")).verify("token").await);
        assert!(seen.lock().unwrap().is_empty());
    }
}
