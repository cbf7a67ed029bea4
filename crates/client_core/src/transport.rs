use std::{error::Error as _, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::ControllerFrame;
use tracing::debug;

use crate::{endpoint::Endpoint, error::DispatchError};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Delivers one serialized frame to the device and reports the outcome.
#[async_trait]
pub trait FrameTransport: Send + Sync {
    async fn send_frame(&self, frame: &ControllerFrame) -> Result<(), DispatchError>;

    /// Human-readable description of where frames go.
    fn target(&self) -> String;
}

pub struct HttpTransport {
    http: Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    pub fn new(endpoint: Endpoint, timeout: Duration) -> Result<Self, DispatchError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(transport_failure)?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl FrameTransport for HttpTransport {
    async fn send_frame(&self, frame: &ControllerFrame) -> Result<(), DispatchError> {
        let response = self
            .http
            .post(self.endpoint.url().clone())
            .json(frame)
            .send()
            .await
            .map_err(transport_failure)?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                debug!(%error, "failed to read rejection body");
                String::new()
            }
        };
        Err(DispatchError::RemoteRejected {
            status: status.as_u16(),
            body,
        })
    }

    fn target(&self) -> String {
        self.endpoint.to_string()
    }
}

// reqwest's Display stops at the outermost error; the useful part
// (connection refused, dns failure) is further down the chain.
fn transport_failure(error: reqwest::Error) -> DispatchError {
    let mut detail = if error.is_timeout() {
        format!("request timed out: {error}")
    } else {
        error.to_string()
    };
    let mut source = error.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    DispatchError::TransportFailure(detail)
}
