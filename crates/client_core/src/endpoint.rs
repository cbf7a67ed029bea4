use std::fmt;

use url::Url;

use crate::error::EndpointError;

pub const DEFAULT_CONTROLLER_PATH: &str = "/controller";

/// Fully-qualified URL frames are posted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Accepts `host`, `host:port`, or a full `http(s)://` URL. Any path on
    /// the address is replaced by `path`.
    pub fn from_address(address: &str, path: &str) -> Result<Self, EndpointError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(EndpointError::Empty);
        }

        let raw = if address.contains("://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };
        let mut url = Url::parse(&raw).map_err(|source| EndpointError::Invalid {
            address: address.to_string(),
            source,
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::MissingHost(address.to_string()));
        }

        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
#[path = "tests/endpoint_tests.rs"]
mod tests;
