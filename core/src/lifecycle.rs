//! Process lifecycle context: one cancellation signal for "the process should stop".
//!
//! The context is cancelled at most once (further cancels are no-ops), either by an
//! OS signal picked up by the listener task or by the owner. Dropping the context
//! cancels it and releases the signal listener, so every exit path of the owner tears
//! the subscription down.

use std::sync::{Arc, OnceLock};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
    Requested,
}

impl ShutdownReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interrupt => "interrupt",
            Self::Terminate => "terminate",
            Self::Requested => "requested",
        }
    }
}

pub struct LifecycleContext {
    token: CancellationToken,
    reason: Arc<OnceLock<ShutdownReason>>,
    listener: Option<JoinHandle<()>>,
}

impl LifecycleContext {
    /// A context only cancelled explicitly (or on drop).
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
            reason: Arc::new(OnceLock::new()),
            listener: None,
        }
    }

    /// A context cancelled by SIGINT or SIGTERM (Ctrl-C outside unix).
    ///
    /// Handlers are registered before this returns, so a signal delivered right
    /// after construction is not lost. Must be called inside a tokio runtime.
    pub fn with_os_signals() -> std::io::Result<Self> {
        let mut ctx = Self::new();
        let token = ctx.token.clone();
        let reason = ctx.reason.clone();

        #[cfg(unix)]
        let listener = {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigint = signal(SignalKind::interrupt())?;
            let mut sigterm = signal(SignalKind::terminate())?;
            tokio::spawn(async move {
                let got = tokio::select! {
                    _ = token.cancelled() => return,
                    _ = sigint.recv() => ShutdownReason::Interrupt,
                    _ = sigterm.recv() => ShutdownReason::Terminate,
                };
                let _ = reason.set(got);
                tracing::debug!(signal = got.as_str(), "shutdown signal received");
                token.cancel();
            })
        };

        #[cfg(not(unix))]
        let listener = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                res = tokio::signal::ctrl_c() => {
                    if let Err(e) = res {
                        tracing::warn!("ctrl-c listener failed: {}", e);
                        return;
                    }
                }
            }
            let _ = reason.set(ShutdownReason::Interrupt);
            token.cancel();
        });

        ctx.listener = Some(listener);
        Ok(ctx)
    }

    /// Token observed by other tasks; cancelling the context cancels every clone.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        let _ = self.reason.set(ShutdownReason::Requested);
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// What cancelled the context, once it has been cancelled.
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.reason.get().copied()
    }
}

impl Default for LifecycleContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for LifecycleContext {
    fn drop(&mut self) {
        self.cancel();
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_is_idempotent_and_keeps_first_reason() {
        let ctx = LifecycleContext::new();
        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.reason(), None);

        ctx.cancel();
        ctx.cancel();
        assert!(ctx.is_cancelled());
        assert_eq!(ctx.reason(), Some(ShutdownReason::Requested));
        ctx.cancelled().await;
    }

    #[tokio::test]
    async fn clones_of_the_token_observe_cancellation() {
        let ctx = LifecycleContext::new();
        let a = ctx.token();
        let b = ctx.token();
        ctx.cancel();
        a.cancelled().await;
        b.cancelled().await;
    }

    #[tokio::test]
    async fn drop_cancels_outstanding_tokens() {
        let token = {
            let ctx = LifecycleContext::with_os_signals().expect("signal handlers");
            ctx.token()
        };
        assert!(token.is_cancelled());
    }
}
