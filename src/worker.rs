use crate::comm::{Tag, Transport};
use crate::error::{Error, Result};
use crate::matrix;
use crate::partition;
use crate::{NumberType, ROOT_RANK};
use tracing::debug;

/// Handle the whole life of a non-root participant: learn the order, receive the
/// row-block and B, multiply and send the result back to the root.
///
/// Returns without further communication when the order is too small for any
/// work to be distributed.
///
/// * `transport`: Channel to the root.
pub fn worker_workflow<T: Transport>(transport: &T) -> Result<()> {
    let mut announced = 0u64;
    transport.broadcast_count(ROOT_RANK, &mut announced)?;
    let order = announced as usize;

    if partition::plan(order.max(1), transport.size()).is_local() {
        debug!(order, "nothing assigned");
        return Ok(());
    }

    let rows = transport.receive_count(ROOT_RANK, Tag::BlockSize)? as usize;
    if rows > order {
        return Err(Error::InconsistentAssignment { rows, order });
    }
    debug!(order, rows, "received assignment");

    let mut a_block: Vec<NumberType> = vec![0.0; rows * order];
    transport.receive_values_into(ROOT_RANK, Tag::BlockData, &mut a_block)?;

    let mut b: Vec<NumberType> = vec![0.0; order * order];
    transport.broadcast_values(ROOT_RANK, &mut b)?;

    let c_block = matrix::multiply(&a_block, &b, order);

    // send back the result to the root process
    transport.send_values(ROOT_RANK, Tag::PartialResult, &c_block)?;
    debug!(rows, "partial result sent");

    Ok(())
}
