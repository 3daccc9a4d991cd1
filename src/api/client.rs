use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};

use super::error::{FetchError, FetchResult};
use super::types::*;
use crate::config::Config;

/// The remote retrieval service as seen by the selection controller
#[async_trait]
pub trait TimetableService: Send + Sync + 'static {
    /// Log in and fetch the default plan together with the plan list
    async fn parse_plan(&self, credentials: &Credentials) -> FetchResult<PlanBundle>;

    /// Fetch one specific plan by its URL
    async fn fetch_plan(&self, credentials: &Credentials, plan_url: &str) -> FetchResult<PlanSnapshot>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestKind {
    Login,
    PlanSwitch,
}

impl RequestKind {
    fn default_detail(self) -> &'static str {
        match self {
            RequestKind::Login => "Failed to fetch the timetable",
            RequestKind::PlanSwitch => "Failed to load the plan",
        }
    }

    fn failure(self, status: Option<StatusCode>, detail: String) -> FetchError {
        match self {
            RequestKind::Login => FetchError::Authentication { status, detail },
            RequestKind::PlanSwitch => FetchError::PlanFetch { status, detail },
        }
    }
}

pub struct PlanClient {
    client: Client,
    base_url: String,
}

impl PlanClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder();
        if config.request_timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.request_timeout_secs));
        }
        let client = builder.build().context("Failed to build timetable HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<T: serde::de::DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        kind: RequestKind,
    ) -> FetchResult<T> {
        let url = self.endpoint(path);

        let response = self.client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("POST {} failed with {}", path, status);
            let body = response.text().await.unwrap_or_default();
            return decode_response(status, &body, kind);
        }

        let text = response.text().await?;
        decode_response(status, &text, kind)
    }
}

#[async_trait]
impl TimetableService for PlanClient {
    async fn parse_plan(&self, credentials: &Credentials) -> FetchResult<PlanBundle> {
        self.post("/parse-plan", credentials, RequestKind::Login).await
    }

    async fn fetch_plan(&self, credentials: &Credentials, plan_url: &str) -> FetchResult<PlanSnapshot> {
        let request = SpecificPlanRequest {
            username: &credentials.username,
            password: &credentials.password,
            plan_url,
        };
        self.post("/get-specific-plan", &request, RequestKind::PlanSwitch).await
    }
}

/// Map a finished response onto the request's result type
fn decode_response<T: serde::de::DeserializeOwned>(
    status: StatusCode,
    body: &str,
    kind: RequestKind,
) -> FetchResult<T> {
    if !status.is_success() {
        return Err(kind.failure(Some(status), error_detail(body, kind)));
    }
    serde_json::from_str(body).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}

/// Pull `detail` out of an error body, falling back to a generic message
fn error_detail(body: &str, kind: RequestKind) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| kind.default_detail().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(r#"{"detail": "Ungültige Zugangsdaten"}"#, "Ungültige Zugangsdaten" ; "detail present")]
    #[test_case(r#"{"detail": ""}"#, "Failed to fetch the timetable" ; "blank detail")]
    #[test_case(r#"{"message": "nope"}"#, "Failed to fetch the timetable" ; "no detail field")]
    #[test_case("Internal Server Error", "Failed to fetch the timetable" ; "not json")]
    fn login_error_detail(body: &str, expected: &str) {
        assert_eq!(error_detail(body, RequestKind::Login), expected);
    }

    #[test]
    fn plan_switch_failures_map_to_plan_fetch() {
        let err = RequestKind::PlanSwitch.failure(
            Some(StatusCode::INTERNAL_SERVER_ERROR),
            error_detail("", RequestKind::PlanSwitch),
        );
        assert!(matches!(err, FetchError::PlanFetch { .. }));
        assert_eq!(err.to_string(), "Failed to load the plan");
    }

    #[test]
    fn rejected_login_is_an_authentication_error() {
        let result: FetchResult<PlanBundle> = decode_response(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Ungültige Zugangsdaten"}"#,
            RequestKind::Login,
        );
        match result {
            Err(FetchError::Authentication { status, detail }) => {
                assert_eq!(status, Some(StatusCode::UNAUTHORIZED));
                assert_eq!(detail, "Ungültige Zugangsdaten");
            }
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[test]
    fn failed_plan_switch_is_a_plan_fetch_error() {
        let result: FetchResult<PlanSnapshot> =
            decode_response(StatusCode::BAD_GATEWAY, "upstream down", RequestKind::PlanSwitch);
        match result {
            Err(FetchError::PlanFetch { status, detail }) => {
                assert_eq!(status, Some(StatusCode::BAD_GATEWAY));
                assert_eq!(detail, "Failed to load the plan");
            }
            other => panic!("expected plan fetch error, got {:?}", other),
        }
    }

    #[test]
    fn success_with_garbage_body_is_malformed() {
        let result: FetchResult<PlanBundle> =
            decode_response(StatusCode::OK, "<html>maintenance</html>", RequestKind::Login);
        assert!(matches!(result, Err(FetchError::MalformedResponse(_))));
    }

    #[test]
    fn success_decodes_body() {
        let body = r#"{"timetable": {"days": ["Mon"], "periods": ["1"], "entries": []}, "last_updated": "2024-03-04 07:15:00"}"#;
        let snapshot: PlanSnapshot = decode_response(StatusCode::OK, body, RequestKind::PlanSwitch).unwrap();
        assert_eq!(snapshot.timetable.days, vec!["Mon"]);
        assert_eq!(snapshot.last_updated.as_deref(), Some("2024-03-04 07:15:00"));
    }

    #[test]
    fn endpoints_join_onto_base_url() {
        let config = Config {
            api_base_url: "http://school.example:8000/api/dsb/".to_string(),
            ..Config::default()
        };
        let client = PlanClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("/parse-plan"),
            "http://school.example:8000/api/dsb/parse-plan"
        );
    }
}
