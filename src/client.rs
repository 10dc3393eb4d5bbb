//! JSON client for the local refine service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::settings::ServiceSettings;
use crate::constants::service::PRINT_SUCCESS;

/// Which tab a request came from; only affects error wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Print,
    Api,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Print => f.write_str("print"),
            RequestKind::Api => f.write_str("API"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Failed to send {kind} request")]
pub struct SubmitError {
    pub kind: RequestKind,
    #[source]
    pub source: reqwest::Error,
}

/// Response body of the refine service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineResponse {
    pub task: String,
    pub taskid: String,
    #[serde(deserialize_with = "string_or_number")]
    pub result: String,
    #[serde(deserialize_with = "string_or_number")]
    pub code: String,
    pub message: String,
}

impl RefineResponse {
    /// The service reports an accepted print job as `result == "00"`
    pub fn is_success(&self) -> bool {
        self.result == PRINT_SUCCESS
    }
}

/// Accepts `"00"` as well as `0`, `null` or a missing value
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::String(s)) => s,
        Some(StringOrNumber::Int(i)) => i.to_string(),
        Some(StringOrNumber::Float(f)) => f.to_string(),
        None => String::new(),
    })
}

#[derive(Debug, Clone)]
pub struct RefineClient {
    http: reqwest::Client,
}

impl RefineClient {
    pub fn new(settings: &ServiceSettings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;
        Ok(Self { http })
    }

    /// POST `body` as JSON and parse the reply, whatever the HTTP status
    pub async fn submit<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        kind: RequestKind,
        body: &T,
    ) -> Result<RefineResponse, SubmitError> {
        debug!(endpoint = %endpoint, %kind, "Sending request");

        let result = async {
            let response = self.http.post(endpoint).json(body).send().await?;
            let status = response.status();
            let parsed = response.json::<RefineResponse>().await?;
            Ok::<_, reqwest::Error>((status, parsed))
        }
        .await;

        match result {
            Ok((status, parsed)) => {
                info!(
                    endpoint = %endpoint,
                    %kind,
                    status = status.as_u16(),
                    result = %parsed.result,
                    taskid = %parsed.taskid,
                    "Refine service replied"
                );
                Ok(parsed)
            }
            Err(source) => {
                error!(endpoint = %endpoint, %kind, error = %source, decode = source.is_decode(), "Request failed");
                Err(SubmitError { kind, source })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamMap;
    use crate::test_support::{RefineStub, dead_endpoint};
    use serde_json::json;

    fn client() -> RefineClient {
        RefineClient::new(&ServiceSettings::default()).unwrap()
    }

    #[test]
    fn test_response_tolerates_numbers_and_missing_fields() {
        let parsed: RefineResponse =
            serde_json::from_value(json!({ "result": 0, "code": 200, "message": "ok" })).unwrap();
        assert_eq!(parsed.result, "0");
        assert_eq!(parsed.code, "200");
        assert_eq!(parsed.task, "");
        assert!(!parsed.is_success());

        let parsed: RefineResponse =
            serde_json::from_value(json!({ "result": "00", "code": null })).unwrap();
        assert!(parsed.is_success());
        assert_eq!(parsed.code, "");
    }

    #[test]
    fn test_error_message_names_request_kind() {
        assert_eq!(RequestKind::Print.to_string(), "print");
        assert_eq!(RequestKind::Api.to_string(), "API");
    }

    #[tokio::test]
    async fn test_submit_posts_json_body() {
        let stub = RefineStub::start(json!({
            "task": "print", "taskid": "1", "result": "00", "code": "0", "message": "ok"
        }))
        .await;

        let mut body = ParamMap::new();
        body.insert("task".to_string(), "print".to_string());
        body.insert("file".to_string(), r"D:\a.jpg".to_string());

        let response = client().submit(&stub.endpoint, RequestKind::Api, &body).await.unwrap();
        assert!(response.is_success());
        assert_eq!(response.message, "ok");
        assert_eq!(stub.received(), vec![json!({ "task": "print", "file": r"D:\a.jpg" })]);
    }

    #[tokio::test]
    async fn test_unparseable_reply_is_generic_failure() {
        let stub = RefineStub::start(json!("not an object")).await;

        let err = client()
            .submit(&stub.endpoint, RequestKind::Print, &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to send print request");
        assert!(err.source.is_decode());
    }

    #[tokio::test]
    async fn test_unreachable_service_is_generic_failure() {
        let err = client()
            .submit(&dead_endpoint().await, RequestKind::Api, &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to send API request");
    }
}
