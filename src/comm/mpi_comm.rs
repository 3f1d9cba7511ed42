use super::{Tag, Transport, TransportResult};
use crate::error::TransportError;
use crate::NumberType;
use mpi::datatype::Equivalence;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

/// Transport over the MPI world communicator. The universe returned by
/// `mpi::initialize` has to outlive it.
pub struct MpiTransport {
    world: SimpleCommunicator,
}

impl MpiTransport {
    pub fn new(world: SimpleCommunicator) -> Self {
        MpiTransport { world }
    }
}

impl Transport for MpiTransport {
    fn rank(&self) -> usize {
        self.world.rank() as usize
    }

    fn size(&self) -> usize {
        self.world.size() as usize
    }

    fn time(&self) -> f64 {
        mpi::time()
    }

    fn broadcast_count(&self, root: usize, value: &mut u64) -> TransportResult<()> {
        self.world
            .process_at_rank(root as i32)
            .broadcast_into(value);
        Ok(())
    }

    fn broadcast_values(&self, root: usize, values: &mut [NumberType]) -> TransportResult<()> {
        self.world
            .process_at_rank(root as i32)
            .broadcast_into(values);
        Ok(())
    }

    fn send_count(&self, dest: usize, tag: Tag, value: u64) -> TransportResult<()> {
        self.world
            .process_at_rank(dest as i32)
            .send_with_tag(&value, tag as i32);
        Ok(())
    }

    fn receive_count(&self, source: usize, tag: Tag) -> TransportResult<u64> {
        let (value, _status) = self
            .world
            .process_at_rank(source as i32)
            .receive_with_tag::<u64>(tag as i32);
        Ok(value)
    }

    fn send_values(&self, dest: usize, tag: Tag, values: &[NumberType]) -> TransportResult<()> {
        self.world
            .process_at_rank(dest as i32)
            .send_with_tag(values, tag as i32);
        Ok(())
    }

    fn receive_values_into(
        &self,
        source: usize,
        tag: Tag,
        buffer: &mut [NumberType],
    ) -> TransportResult<()> {
        let status = self
            .world
            .process_at_rank(source as i32)
            .receive_into_with_tag(buffer, tag as i32);

        let found = status.count(NumberType::equivalent_datatype()) as usize;
        if found != buffer.len() {
            return Err(TransportError::LengthMismatch {
                expected: buffer.len(),
                found,
            });
        }
        Ok(())
    }

    fn abort(&self, code: i32) -> ! {
        self.world.abort(code)
    }
}
