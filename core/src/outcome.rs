//! One-shot terminal outcome of a protocol engine run.
//!
//! `OutcomeSender::complete` takes the sender by value, so an engine run can report at
//! most one outcome. If the producing task goes away without reporting (a panic in the
//! engine), the receiver resolves to `EngineError::Aborted`.

use tokio::sync::oneshot;

use crate::error::EngineError;

pub type Outcome = Result<(), EngineError>;

pub fn outcome_channel() -> (OutcomeSender, OutcomeReceiver) {
    let (tx, rx) = oneshot::channel();
    (OutcomeSender(tx), OutcomeReceiver(rx))
}

#[derive(Debug)]
pub struct OutcomeSender(oneshot::Sender<Outcome>);

impl OutcomeSender {
    pub fn complete(self, outcome: Outcome) {
        if let Err(unsent) = self.0.send(outcome) {
            // The supervisor has already returned (e.g. after a shutdown signal).
            tracing::debug!(
                ok = unsent.is_ok(),
                "engine outcome dropped: supervisor no longer waiting"
            );
        }
    }
}

#[derive(Debug)]
pub struct OutcomeReceiver(oneshot::Receiver<Outcome>);

impl OutcomeReceiver {
    pub async fn wait(self) -> Outcome {
        match self.0.await {
            Ok(outcome) => outcome,
            Err(_) => Err(EngineError::Aborted),
        }
    }
}
