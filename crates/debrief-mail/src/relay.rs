use std::time::Duration;

use async_trait::async_trait;

use crate::error::MailError;
use crate::{Mailer, OutgoingEmail, check_recipient};

/// Posts each message as JSON to an HTTP mail relay.
#[derive(Clone)]
pub struct RelayMailer {
    url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl std::fmt::Debug for RelayMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayMailer")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl RelayMailer {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self, MailError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            token,
            http,
        })
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        check_recipient(&email.to)?;

        let mut request = self.http.post(&self.url).json(email);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailError::Relay {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(status = status.as_u16(), "email accepted by relay");
        Ok(())
    }
}
