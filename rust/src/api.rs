// Backend collaborator: message submission, control commands, shared blobs.

use std::time::Duration;

use async_trait::async_trait;
use hub_protocol::{
    control_command_path, send_message_path, shared_data_path, ControlCommandRequest,
    SendAck, SendMessageRequest, SharedData, SharedDataResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid base url `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{path} answered {status}")]
    Status { path: String, status: u16 },
}

#[async_trait]
pub trait HubApi: Send + Sync + 'static {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<SendAck, ApiError>;

    async fn fetch_shared_data(&self, data_id: &str) -> Result<SharedData, ApiError>;

    async fn send_control_command(
        &self,
        channel_id: &str,
        request: &ControlCommandRequest,
    ) -> Result<(), ApiError>;
}

#[derive(Clone)]
pub struct HttpHubApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpHubApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        url::Url::parse(base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check_status(path: &str, resp: &reqwest::Response) -> Result<(), ApiError> {
        if resp.status().is_success() {
            return Ok(());
        }
        Err(ApiError::Status {
            path: path.to_string(),
            status: resp.status().as_u16(),
        })
    }
}

#[async_trait]
impl HubApi for HttpHubApi {
    async fn send_message(&self, request: &SendMessageRequest) -> Result<SendAck, ApiError> {
        let path = send_message_path(&request.channel_id);
        let resp = self
            .client
            .post(self.endpoint(&path))
            .json(request)
            .send()
            .await?;
        Self::check_status(&path, &resp)?;
        Ok(resp.json::<SendAck>().await?)
    }

    async fn fetch_shared_data(&self, data_id: &str) -> Result<SharedData, ApiError> {
        let path = shared_data_path(data_id);
        let resp = self.client.get(self.endpoint(&path)).send().await?;
        Self::check_status(&path, &resp)?;
        Ok(resp.json::<SharedDataResponse>().await?.data)
    }

    async fn send_control_command(
        &self,
        channel_id: &str,
        request: &ControlCommandRequest,
    ) -> Result<(), ApiError> {
        let path = control_command_path(channel_id);
        let resp = self
            .client
            .post(self.endpoint(&path))
            .json(request)
            .send()
            .await?;
        Self::check_status(&path, &resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_must_parse() {
        let err = HttpHubApi::new("not a url", Duration::from_secs(1))
            .err()
            .expect("invalid url rejected");
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn endpoints_join_without_double_slash() {
        let api = HttpHubApi::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:3000");
        assert_eq!(
            api.endpoint(&shared_data_path("abc")),
            "http://localhost:3000/api/data/abc"
        );
    }
}
