//! In-memory [`Connection`] for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use tg48_transport::{Connection, ConnectionId, TransportError};

type Frame = Result<Option<Vec<u8>>, TransportError>;

/// Replays queued frames, records sent ones, and pends forever once the
/// queue is empty (like an idle server).
#[derive(Default)]
pub(crate) struct MockConnection {
    frames: Mutex<VecDeque<Frame>>,
    sent: Mutex<Vec<Vec<u8>>>,
    fail_send: bool,
}

impl MockConnection {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A connection whose every `send` fails.
    pub(crate) fn failing_send() -> Self {
        Self {
            fail_send: true,
            ..Self::default()
        }
    }

    pub(crate) fn frame(self, json: &str) -> Self {
        self.frames
            .lock()
            .unwrap()
            .push_back(Ok(Some(json.as_bytes().to_vec())));
        self
    }

    pub(crate) fn closed(self) -> Self {
        self.frames.lock().unwrap().push_back(Ok(None));
        self
    }

    pub(crate) fn read_error(self) -> Self {
        self.frames.lock().unwrap().push_back(Err(
            TransportError::ReceiveFailed(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "reset by mock",
            )),
        ));
        self
    }

    pub(crate) fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().unwrap().clone()
    }
}

impl Connection for MockConnection {
    type Error = TransportError;

    async fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_send {
            return Err(TransportError::SendFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "send refused by mock",
            )));
        }
        self.sent.lock().unwrap().push(data.to_vec());
        Ok(())
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        let next = self.frames.lock().unwrap().pop_front();
        match next {
            Some(frame) => frame,
            None => std::future::pending().await,
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        ConnectionId::new(0)
    }
}
