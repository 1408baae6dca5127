//! Single-shot "track finished" signal
//!
//! A sink receives a [`CompletionSignal`] with every `start` call and must report
//! the outcome through it. The room loop awaits the paired [`TrackCompletion`].
//! Because `finish` consumes the signal, a sink can report at most once; if it
//! drops the signal instead, the loop observes [`SinkError::Abandoned`].

use crate::error::SinkError;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Sender half, owned by the sink for the duration of one track
#[derive(Debug)]
pub struct CompletionSignal(oneshot::Sender<Result<(), SinkError>>);

/// Receiver half, awaited by the room loop
#[derive(Debug)]
pub struct TrackCompletion(oneshot::Receiver<Result<(), SinkError>>);

impl CompletionSignal {
    /// Create a connected signal/completion pair
    pub fn channel() -> (CompletionSignal, TrackCompletion) {
        let (tx, rx) = oneshot::channel();
        (CompletionSignal(tx), TrackCompletion(rx))
    }

    /// Report how the track ended
    ///
    /// `Ok(())` covers both natural end-of-track and a forced stop.
    pub fn finish(self, outcome: Result<(), SinkError>) {
        // The room may already be gone; nobody is left to tell.
        let _ = self.0.send(outcome);
    }

    /// Whether the awaiting side has gone away
    pub fn is_abandoned(&self) -> bool {
        self.0.is_closed()
    }
}

impl Future for TrackCompletion {
    type Output = Result<(), SinkError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(SinkError::Abandoned)))
    }
}
