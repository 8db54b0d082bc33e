use thiserror::Error;

use crate::schema::{Ack, ErrorBody, ValidContact};

pub const FALLBACK_MESSAGE: &str = "Failed to submit contact form";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server answered {status}: {}", .message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Server { status: u16, message: Option<String> },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// What the visitor gets to read.
    pub fn user_message(&self) -> &str {
        match self {
            ApiError::Server { message: Some(message), .. } if !message.is_empty() => message.as_str(),
            _ => FALLBACK_MESSAGE,
        }
    }
}

/// The one call the form makes: create a submission.
#[allow(async_fn_in_trait)]
pub trait ContactApi {
    async fn create_contact(&self, contact: &ValidContact) -> Result<Ack, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpContactApi {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpContactApi {
    pub fn new(base_url: &str) -> HttpContactApi {
        HttpContactApi::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http_client: reqwest::Client, base_url: &str) -> HttpContactApi {
        HttpContactApi {
            http_client,
            endpoint: format!("{}/api/contact", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ContactApi for HttpContactApi {
    async fn create_contact(&self, contact: &ValidContact) -> Result<Ack, ApiError> {
        let response = self.http_client.post(&self.endpoint)
            .json(contact)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.bytes().await?;
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .map(|body| body.message);

        Err(ApiError::Server { status: status.as_u16(), message })
    }
}
