//! Bounded wait over a detached generation task.
//!
//! `submit_and_wait` spawns the generation on its own task and waits on a
//! oneshot channel until the deadline. On timeout only the waiting side gives
//! up: the task keeps running, still appends its exchange to the session,
//! and its reply is dropped when the send finds no receiver. Backend cost is
//! therefore paid for abandoned requests too.

mod outcome;

pub use outcome::{BridgeOutcome, FallbackReplies};

use crate::error::{HandlerFault, TimeoutExceeded};
use crate::responder::ResponseGenerator;
use crate::utils::text::truncate_with_ellipsis;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

pub struct AsyncBridge {
    generator: Arc<ResponseGenerator>,
    fallbacks: FallbackReplies,
}

impl AsyncBridge {
    pub fn new(generator: Arc<ResponseGenerator>, fallbacks: FallbackReplies) -> Self {
        Self {
            generator,
            fallbacks,
        }
    }

    pub fn generator(&self) -> &Arc<ResponseGenerator> {
        &self.generator
    }

    pub fn fallbacks(&self) -> &FallbackReplies {
        &self.fallbacks
    }

    /// Reply text for `user_text`, or a fallback string. Never fails.
    pub async fn submit_and_wait(
        &self,
        session_key: &str,
        user_text: &str,
        sender: &str,
        timeout: Duration,
    ) -> String {
        self.submit_and_wait_outcome(session_key, user_text, sender, timeout)
            .await
            .into_reply(&self.fallbacks)
    }

    /// Like [`Self::submit_and_wait`], but reports which path produced the reply.
    pub async fn submit_and_wait_outcome(
        &self,
        session_key: &str,
        user_text: &str,
        sender: &str,
        timeout: Duration,
    ) -> BridgeOutcome {
        let receiver = self.dispatch(session_key, user_text, sender);

        match tokio::time::timeout(timeout, receiver).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_closed)) => {
                let fault = HandlerFault::TaskLost;
                tracing::error!(session = session_key, "{fault}; replying with error fallback");
                BridgeOutcome::Failed
            }
            Err(_elapsed) => {
                let error = TimeoutExceeded {
                    waited_ms: timeout.as_millis(),
                };
                tracing::warn!(
                    session = session_key,
                    text = %truncate_with_ellipsis(user_text, 50),
                    "{error}; replying with timeout fallback"
                );
                BridgeOutcome::TimedOut
            }
        }
    }

    /// Spawn the detached generation task and hand back its completion slot.
    fn dispatch(
        &self,
        session_key: &str,
        user_text: &str,
        sender: &str,
    ) -> oneshot::Receiver<BridgeOutcome> {
        let (tx, rx) = oneshot::channel();
        let generator = Arc::clone(&self.generator);
        let session_key = session_key.to_string();
        let user_text = user_text.to_string();
        let sender = sender.to_string();

        tokio::spawn(async move {
            let outcome = match generator.generate(&session_key, &user_text).await {
                Ok(reply) => BridgeOutcome::Completed(reply),
                Err(error) => {
                    tracing::error!(
                        session = %session_key,
                        sender = %sender,
                        text = %truncate_with_ellipsis(&user_text, 50),
                        "generation failed: {error}"
                    );
                    BridgeOutcome::Failed
                }
            };

            if tx.send(outcome).is_err() {
                tracing::debug!(
                    session = %session_key,
                    "waiter already gone, discarding late reply"
                );
            }
        });

        rx
    }
}
