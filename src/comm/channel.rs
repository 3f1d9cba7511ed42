//! In-process transport: every participant is a thread and every ordered pair
//! of participants gets its own zero-capacity channel.
//!
//! Zero capacity turns each send into a rendezvous with the matching receive,
//! the same blocking behavior the roles see under MPI. Receiving from one
//! specific pair channel keeps messages from different senders apart, and a
//! channel delivers in order, so no tag matching across senders is needed.

use super::{Tag, Transport, TransportResult};
use crate::error::TransportError;
use crate::NumberType;
use crossbeam_channel::{self as cb, Receiver, Sender};
use std::time::Instant;

#[derive(Debug)]
enum Payload {
    Count(u64),
    Values(Vec<NumberType>),
}

#[derive(Debug)]
struct Envelope {
    tag: Tag,
    payload: Payload,
}

/// One participant's end of a [universe].
#[derive(Debug)]
pub struct ChannelTransport {
    rank: usize,
    /// Indexed by destination rank.
    outboxes: Vec<Sender<Envelope>>,
    /// Indexed by source rank.
    inboxes: Vec<Receiver<Envelope>>,
    epoch: Instant,
}

/// Creates a fully connected group of `size` participants. The transport at
/// index `i` has rank `i`.
///
/// * `size`: Number of participants.
pub fn universe(size: usize) -> Vec<ChannelTransport> {
    let epoch = Instant::now();
    let mut outboxes: Vec<Vec<Sender<Envelope>>> =
        (0..size).map(|_| Vec::with_capacity(size)).collect();
    let mut inboxes: Vec<Vec<Receiver<Envelope>>> =
        (0..size).map(|_| Vec::with_capacity(size)).collect();

    for source in 0..size {
        for dest in 0..size {
            let (tx, rx) = cb::bounded(0);
            outboxes[source].push(tx);
            inboxes[dest].push(rx);
        }
    }

    outboxes
        .into_iter()
        .zip(inboxes)
        .enumerate()
        .map(|(rank, (outboxes, inboxes))| ChannelTransport {
            rank,
            outboxes,
            inboxes,
            epoch,
        })
        .collect()
}

impl ChannelTransport {
    fn check_rank(&self, rank: usize) -> TransportResult<()> {
        if rank < self.size() {
            Ok(())
        } else {
            Err(TransportError::RankOutOfRange {
                rank,
                size: self.size(),
            })
        }
    }

    fn post(&self, dest: usize, tag: Tag, payload: Payload) -> TransportResult<()> {
        self.check_rank(dest)?;
        tracing::trace!(dest, ?tag, "send");
        self.outboxes[dest]
            .send(Envelope { tag, payload })
            .map_err(|_| TransportError::Disconnected { peer: dest })
    }

    fn take(&self, source: usize, tag: Tag) -> TransportResult<Payload> {
        self.check_rank(source)?;
        let envelope = self.inboxes[source]
            .recv()
            .map_err(|_| TransportError::Disconnected { peer: source })?;
        tracing::trace!(source, tag = ?envelope.tag, "receive");

        if envelope.tag != tag {
            return Err(TransportError::UnexpectedTag {
                expected: tag,
                found: envelope.tag,
            });
        }
        Ok(envelope.payload)
    }

    fn take_count(&self, source: usize, tag: Tag) -> TransportResult<u64> {
        match self.take(source, tag)? {
            Payload::Count(value) => Ok(value),
            Payload::Values(_) => Err(TransportError::UnexpectedPayload { tag }),
        }
    }

    fn take_values_into(
        &self,
        source: usize,
        tag: Tag,
        buffer: &mut [NumberType],
    ) -> TransportResult<()> {
        match self.take(source, tag)? {
            Payload::Values(values) if values.len() == buffer.len() => {
                buffer.copy_from_slice(&values);
                Ok(())
            }
            Payload::Values(values) => Err(TransportError::LengthMismatch {
                expected: buffer.len(),
                found: values.len(),
            }),
            Payload::Count(_) => Err(TransportError::UnexpectedPayload { tag }),
        }
    }

    /// Ranks other than `root`, in increasing order.
    fn others(&self, root: usize) -> impl Iterator<Item = usize> {
        (0..self.size()).filter(move |&rank| rank != root)
    }
}

impl Transport for ChannelTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.outboxes.len()
    }

    fn time(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn broadcast_count(&self, root: usize, value: &mut u64) -> TransportResult<()> {
        self.check_rank(root)?;
        if self.rank == root {
            for dest in self.others(root) {
                self.post(dest, Tag::Broadcast, Payload::Count(*value))?;
            }
        } else {
            *value = self.take_count(root, Tag::Broadcast)?;
        }
        Ok(())
    }

    fn broadcast_values(&self, root: usize, values: &mut [NumberType]) -> TransportResult<()> {
        self.check_rank(root)?;
        if self.rank == root {
            for dest in self.others(root) {
                self.post(dest, Tag::Broadcast, Payload::Values(values.to_vec()))?;
            }
        } else {
            self.take_values_into(root, Tag::Broadcast, values)?;
        }
        Ok(())
    }

    fn send_count(&self, dest: usize, tag: Tag, value: u64) -> TransportResult<()> {
        self.post(dest, tag, Payload::Count(value))
    }

    fn receive_count(&self, source: usize, tag: Tag) -> TransportResult<u64> {
        self.take_count(source, tag)
    }

    fn send_values(&self, dest: usize, tag: Tag, values: &[NumberType]) -> TransportResult<()> {
        self.post(dest, tag, Payload::Values(values.to_vec()))
    }

    fn receive_values_into(
        &self,
        source: usize,
        tag: Tag,
        buffer: &mut [NumberType],
    ) -> TransportResult<()> {
        self.take_values_into(source, tag, buffer)
    }

    fn abort(&self, code: i32) -> ! {
        tracing::error!(rank = self.rank, code, "aborting all participants");
        std::process::exit(code)
    }
}
