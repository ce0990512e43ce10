use crate::config::Config;
use crate::launch::LaunchRecord;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

pub const FETCH_FAILED: &str = "Failed to fetch launches";
pub const GENERIC_FAILURE: &str = "An error occurred";

/// Why the launch list could not be obtained.
///
/// `Status` and `Decode` mean the server answered but not with a launch list.
/// `Transport` means the request never completed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Unexpected HTTP status {0}")]
    Status(StatusCode),

    #[error("Malformed launch list: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{}", .0.as_deref().unwrap_or(GENERIC_FAILURE))]
    Transport(Option<String>),
}

impl FetchError {
    pub fn is_protocol(&self) -> bool {
        matches!(self, FetchError::Status(_) | FetchError::Decode(_))
    }

    /// The message shown after `Error: `.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Status(_) | FetchError::Decode(_) => FETCH_FAILED.to_string(),
            FetchError::Transport(Some(message)) => message.clone(),
            FetchError::Transport(None) => GENERIC_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let description = err.to_string();
        if description.trim().is_empty() {
            FetchError::Transport(None)
        } else {
            FetchError::Transport(Some(description))
        }
    }
}

/// Client for the launch list endpoint.
#[derive(Debug, Clone)]
pub struct LaunchClient {
    http: reqwest::Client,
    endpoint: String,
}

impl LaunchClient {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue the GET and parse the body as a list of launches.
    pub async fn fetch_launches(&self) -> Result<Vec<LaunchRecord>, FetchError> {
        tracing::info!(endpoint = %self.endpoint, "fetching launches");
        let response = self.http.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "launch request rejected");
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let launches: Vec<LaunchRecord> = serde_json::from_slice(&body)?;
        tracing::info!(count = launches.len(), "launches received");
        Ok(launches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::tests::STARLINK_FIXTURE;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(endpoint: String) -> LaunchClient {
        LaunchClient::new(&Config {
            endpoint,
            ..Config::default()
        })
        .unwrap()
    }

    async fn mount(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v3/launches"))
            .and(query_param("launch_year", "2020"))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    fn endpoint(server: &MockServer) -> String {
        format!("{}/v3/launches?launch_year=2020", server.uri())
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(
            FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR).user_message(),
            "Failed to fetch launches"
        );
        assert_eq!(
            FetchError::Transport(Some("Network error".into())).user_message(),
            "Network error"
        );
        assert_eq!(FetchError::Transport(None).user_message(), "An error occurred");
        assert_eq!(FetchError::Transport(None).to_string(), "An error occurred");
    }

    #[test]
    fn test_decode_error_is_protocol() {
        let err: FetchError = serde_json::from_str::<Vec<LaunchRecord>>("{}")
            .unwrap_err()
            .into();
        assert!(err.is_protocol());
        assert_eq!(err.user_message(), FETCH_FAILED);
        assert!(!FetchError::Transport(None).is_protocol());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_raw(STARLINK_FIXTURE, "application/json"),
        )
        .await;

        let launches = client_for(endpoint(&server)).fetch_launches().await.unwrap();
        let names: Vec<_> = launches.iter().map(|l| l.mission_name.as_str()).collect();
        assert_eq!(names, ["Starlink 2", "Starlink 3"]);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(503)).await;

        let err = client_for(endpoint(&server)).fetch_launches().await.unwrap_err();
        assert!(matches!(err, FetchError::Status(StatusCode::SERVICE_UNAVAILABLE)));
        assert_eq!(err.user_message(), "Failed to fetch launches");
    }

    #[tokio::test]
    async fn test_fetch_malformed_body() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_raw("<html>oops</html>", "text/html"),
        )
        .await;

        let err = client_for(endpoint(&server)).fetch_launches().await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert_eq!(err.user_message(), "Failed to fetch launches");
    }

    #[tokio::test]
    async fn test_fetch_wrong_shape_is_protocol_failure() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "launches": [] })),
        )
        .await;

        let err = client_for(endpoint(&server)).fetch_launches().await.unwrap_err();
        assert!(err.is_protocol());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_transport() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let endpoint = format!("http://127.0.0.1:{port}/v3/launches?launch_year=2020");
        let expected = reqwest::Client::new()
            .get(&endpoint)
            .send()
            .await
            .unwrap_err()
            .to_string();

        let err = client_for(endpoint).fetch_launches().await.unwrap_err();
        match &err {
            FetchError::Transport(Some(message)) => assert_eq!(message, &expected),
            other => panic!("expected transport failure, got {other:?}"),
        }
        assert_eq!(err.user_message(), expected);
    }
}
