//! Gate that keeps calls pending so tests can act while they are in flight.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

#[derive(Debug, Default)]
pub(super) struct Stall {
    engaged: AtomicBool,
    arrived: Notify,
}

impl Stall {
    /// Every later call through [`Stall::pass`] hangs until its future is dropped.
    pub(super) fn engage(&self) {
        self.engaged.store(true, Ordering::SeqCst);
    }

    /// Returns at once unless engaged; otherwise never returns.
    pub(super) async fn pass(&self) {
        if self.engaged.load(Ordering::SeqCst) {
            self.arrived.notify_one();
            std::future::pending::<()>().await;
        }
    }

    /// Resolves once a call is held, including one held before this is awaited.
    pub(super) async fn arrival(&self) {
        self.arrived.notified().await;
    }
}
