use thiserror::Error;

/// Outcome of a single failed frame dispatch. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("transport failure: {0}")]
    TransportFailure(String),
    #[error("device rejected frame with status {status}: {body}")]
    RemoteRejected { status: u16, body: String },
}

/// The startup probe could not reach the device.
#[derive(Debug, Error)]
#[error("could not reach controller at {endpoint}: {source}")]
pub struct ConnectivityError {
    pub endpoint: String,
    #[source]
    pub source: DispatchError,
}

impl ConnectivityError {
    pub fn hints(&self) -> Vec<String> {
        vec![
            "check that the controller device is powered on".to_string(),
            "check that the device has joined the same network as this machine".to_string(),
            format!("check that {} is the correct device address", self.endpoint),
        ]
    }
}

/// Why no session was started.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Unreachable(#[from] ConnectivityError),
    #[error("interrupted before the device answered")]
    Interrupted,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),
}

#[derive(Debug, Error)]
pub enum EndpointError {
    #[error("device address is empty")]
    Empty,
    #[error("invalid device address {address:?}: {source}")]
    Invalid {
        address: String,
        source: url::ParseError,
    },
    #[error("device address {0:?} has no host")]
    MissingHost(String),
    #[error("unsupported scheme {0:?}; only http and https are accepted")]
    UnsupportedScheme(String),
}
