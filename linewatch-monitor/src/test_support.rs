//! Scripted transport for deterministic tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::TransportError;
use crate::transport::Transport;

/// What a scripted endpoint does when requested.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Ok { delay_ms: u64 },
    Err { delay_ms: u64, message: String },
    Hang,
}

impl Reply {
    pub(crate) fn ok() -> Self {
        Reply::Ok { delay_ms: 0 }
    }

    pub(crate) fn ok_after(delay_ms: u64) -> Self {
        Reply::Ok { delay_ms }
    }

    pub(crate) fn err(message: &str) -> Self {
        Reply::Err {
            delay_ms: 0,
            message: message.to_string(),
        }
    }

    pub(crate) fn err_after(delay_ms: u64, message: &str) -> Self {
        Reply::Err {
            delay_ms,
            message: message.to_string(),
        }
    }
}

/// Transport whose replies are set per endpoint and can change mid-test.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, endpoint: &str, reply: Reply) -> Self {
        self.set(endpoint, reply);
        self
    }

    pub(crate) fn set(&self, endpoint: &str, reply: Reply) {
        self.replies.lock().insert(endpoint.to_string(), reply);
    }

    /// Endpoints requested so far, in order.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self, endpoint: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == endpoint).count()
    }
}

async fn delay(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, endpoint: &str, _timeout: Duration) -> Result<(), TransportError> {
        self.calls.lock().push(endpoint.to_string());
        let reply = self.replies.lock().get(endpoint).cloned();

        match reply {
            Some(Reply::Ok { delay_ms }) => {
                delay(delay_ms).await;
                Ok(())
            }
            Some(Reply::Err { delay_ms, message }) => {
                delay(delay_ms).await;
                Err(TransportError::Other(message))
            }
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(TransportError::Other(format!(
                "no reply scripted for {}",
                endpoint
            ))),
        }
    }

    fn description(&self) -> &str {
        "scripted"
    }
}
