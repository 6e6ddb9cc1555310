//! Stream plumbing shared between pipeline stages.
//!
//! Stages of the pipeline are lazy [`Stream`]s. Chaining them directly means
//! a single task polls the whole chain, one record at a time. [`handoff`]
//! splits a chain in two: a pump future that drives the upstream stage, and a
//! receiving stream for the downstream stage, connected by a rendezvous
//! channel with no slack. Both halves can then be polled concurrently (with
//! `tokio::try_join!` or similar) while memory use stays flat regardless of
//! how large either dataset is.

use futures::channel::mpsc;
use futures::{SinkExt, Stream, StreamExt};
use std::future::Future;
use std::pin::pin;

/// Split `upstream` into a pump future and a receiving stream.
///
/// The pump forwards every `Ok` item to the receiver, blocking until the
/// receiver has room. It resolves to the number of items forwarded once
/// `upstream` is exhausted, or to the first `Err` it encounters. On error the
/// channel is closed, so the receiver observes end-of-stream and the error is
/// reported through the pump alone: callers must await both halves and only
/// trust the receiver's output when the pump resolved `Ok`.
///
/// If the receiver is dropped the pump stops early and resolves `Ok` with the
/// count so far; the receiving side is then responsible for reporting why.
///
/// The channel is created with a buffer of zero. `futures` reserves one slot
/// per sender, so the producer runs at most one item ahead of the consumer.
pub fn handoff<S, T, E>(upstream: S) -> (impl Future<Output = Result<u64, E>>, impl Stream<Item = T>)
where
    S: Stream<Item = Result<T, E>>,
{
    let (mut tx, rx) = mpsc::channel(0);
    let pump = async move {
        let mut upstream = pin!(upstream);
        let mut forwarded = 0;
        while let Some(item) = upstream.next().await {
            // Returning early drops `tx`, which closes the channel.
            let item = item?;
            if tx.send(item).await.is_err() {
                tracing::debug!(forwarded, "receiver dropped; stopping handoff early");
                break;
            }
            forwarded += 1;
        }
        Ok(forwarded)
    };
    (pump, rx)
}
