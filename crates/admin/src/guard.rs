//! Stale-response guard for requests keyed by changing input.
//!
//! Each fetch takes a [`Ticket`] from the controller's [`RequestGuard`].
//! Issuing a new ticket cancels the previous one, so an older request either
//! aborts at its next await point or, if it already resolved, fails the
//! [`RequestGuard::is_current`] check and its response is dropped.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::AdminError;

#[derive(Debug, Default)]
pub struct RequestGuard {
    generation: u64,
    token: Option<CancellationToken>,
}

/// Permission to apply one response.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    token: CancellationToken,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request generation, cancelling the previous one.
    pub fn issue(&mut self) -> Ticket {
        if let Some(previous) = self.token.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        Ticket {
            generation: self.generation,
            token,
        }
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation && !ticket.token.is_cancelled()
    }

    /// Cancel the in-flight request without starting a new one.
    pub fn invalidate(&mut self) {
        if let Some(previous) = self.token.take() {
            previous.cancel();
        }
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `fut` until it completes or this ticket is superseded.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, AdminError> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(AdminError::Cancelled),
            output = fut => Ok(output),
        }
    }
}
