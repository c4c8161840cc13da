//! Per-view cancellation: responses that arrive after the view closed are discarded.

use std::future::Future;

use tokio::sync::watch;

use crate::client::error::{ClientError, ClientResult};

/// Lifetime token of a view. Closing it drops in-flight calls run through [`ViewScope::run`].
#[derive(Debug)]
pub struct ViewScope {
    closed: watch::Sender<bool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        let (closed, _rx) = watch::channel(false);
        Self { closed }
    }

    /// Mark the view as gone. Idempotent.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Run `work` unless the scope closes first, in which case the future is dropped
    /// and [`ClientError::Cancelled`] is returned.
    pub async fn run<F, T>(&self, work: F) -> ClientResult<T>
    where
        F: Future<Output = ClientResult<T>>,
    {
        let mut closed = self.closed.subscribe();
        if *closed.borrow_and_update() {
            return Err(ClientError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = wait_closed(&mut closed) => Err(ClientError::Cancelled),
            outcome = work => {
                if self.is_closed() {
                    Err(ClientError::Cancelled)
                } else {
                    outcome
                }
            }
        }
    }
}

async fn wait_closed(closed: &mut watch::Receiver<bool>) {
    // An error means the scope itself was dropped, which also ends the view.
    let _ = closed.wait_for(|closed| *closed).await;
}
