//! In-memory transport and reporter shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use shared::ControllerFrame;
use tokio::time::Instant;

use crate::{
    error::DispatchError,
    session::{Reporter, SessionEvent},
    transport::FrameTransport,
};

#[derive(Debug, Clone)]
pub struct SentFrame {
    pub frame: ControllerFrame,
    pub at: Instant,
}

/// Records every frame it is handed. Queued outcomes are consumed in order;
/// once the queue is empty every send succeeds.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<SentFrame>>>,
    outcomes: Arc<Mutex<VecDeque<Result<(), DispatchError>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_with(self, error: DispatchError) -> Self {
        self.outcomes.lock().expect("outcomes").push_back(Err(error));
        self
    }

    pub fn sent(&self) -> Vec<SentFrame> {
        self.sent.lock().expect("sent").clone()
    }

    pub fn frames(&self) -> Vec<ControllerFrame> {
        self.sent().into_iter().map(|sent| sent.frame).collect()
    }
}

#[async_trait]
impl FrameTransport for RecordingTransport {
    async fn send_frame(&self, frame: &ControllerFrame) -> Result<(), DispatchError> {
        self.sent.lock().expect("sent").push(SentFrame {
            frame: *frame,
            at: Instant::now(),
        });
        self.outcomes
            .lock()
            .expect("outcomes")
            .pop_front()
            .unwrap_or(Ok(()))
    }

    fn target(&self) -> String {
        "memory://recording".to_string()
    }
}

impl Reporter for Vec<SessionEvent> {
    fn report(&mut self, event: SessionEvent) {
        self.push(event);
    }
}

pub fn refused() -> DispatchError {
    DispatchError::TransportFailure("connection refused".to_string())
}
