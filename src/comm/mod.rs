//! Message passing between the participants of a run.
//!
//! The roles only ever talk through [Transport]: an addressed send/receive pair
//! for counts and for matrix data, and a broadcast from a root rank. Two
//! implementations exist, [mpi_comm::MpiTransport] for real process groups and
//! [channel::ChannelTransport] for participants living on threads of one process.

use crate::error::TransportError;
use crate::NumberType;

pub mod channel;
#[cfg(feature = "mpi")]
pub mod mpi_comm;

/// Message tags. MPI broadcasts carry none, [Tag::Broadcast] only exists for the
/// channel transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Tag {
    BlockSize = 1,
    BlockData = 2,
    PartialResult = 3,
    Broadcast = 4,
}

pub type TransportResult<T> = Result<T, TransportError>;

/// Blocking communication primitives shared by every participant of a run.
///
/// Every call waits until the matching call happened on the other side. A
/// broadcast must be entered by all participants with the same root.
pub trait Transport {
    /// Rank of the calling participant, `0..size()`.
    fn rank(&self) -> usize;

    /// Number of participants, fixed for the whole run.
    fn size(&self) -> usize;

    /// Wall clock in seconds since an arbitrary, per-participant epoch.
    fn time(&self) -> f64;

    /// Delivers the root's `value` to everyone else, overwriting theirs.
    fn broadcast_count(&self, root: usize, value: &mut u64) -> TransportResult<()>;

    /// Delivers the root's `values` to everyone else. All participants pass a
    /// buffer of the same length.
    fn broadcast_values(&self, root: usize, values: &mut [NumberType]) -> TransportResult<()>;

    fn send_count(&self, dest: usize, tag: Tag, value: u64) -> TransportResult<()>;

    fn receive_count(&self, source: usize, tag: Tag) -> TransportResult<u64>;

    fn send_values(&self, dest: usize, tag: Tag, values: &[NumberType]) -> TransportResult<()>;

    /// Receives exactly `buffer.len()` values from `source`.
    fn receive_values_into(
        &self,
        source: usize,
        tag: Tag,
        buffer: &mut [NumberType],
    ) -> TransportResult<()>;

    /// Tears down the whole group. Used for fatal startup errors on the
    /// coordinator while the workers already wait for it.
    fn abort(&self, code: i32) -> !;
}
