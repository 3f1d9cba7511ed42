use crate::checksum::checksum;
use crate::comm::{Tag, Transport};
use crate::config::Settings;
use crate::error::Result;
use crate::matrix::{self, SquareMatrix};
use crate::partition::{self, PartitionPlan};
use crate::report::{Checksums, RunReport, Verification};
use crate::{NumberType, ROOT_RANK};
use tracing::{debug, info, warn};

/// Relative tolerance of the sequential check.
const VERIFY_TOLERANCE: NumberType = 1e-9;

/// The overall work of the root node. Announce the order, create the inputs,
/// distribute row-blocks, compute its own block and collect the subresults.
/// If the order does not exceed the group size, everything is done locally.
///
/// * `transport`: Channel to the workers; the caller must be rank 0.
/// * `settings`: Validated run settings.
pub fn root_workflow<T: Transport>(
    transport: &T,
    settings: &Settings,
) -> Result<(SquareMatrix, RunReport)> {
    let order = settings.order;
    let participants = transport.size();

    // every worker waits for this before anything else
    let mut announced = order as u64;
    transport.broadcast_count(ROOT_RANK, &mut announced)?;

    let (a, mut b) = matrix::generate_inputs(order, settings.fill);
    let mut c = SquareMatrix::zeroed(order);

    let plan = partition::plan(order, participants);
    info!(order, participants, rows = ?plan.rows(), "partition plan");

    let start_time = transport.time();
    if plan.is_local() {
        debug!("order does not exceed group size, multiplying locally");
        matrix::multiply_into(a.as_slice(), b.as_slice(), c.as_mut_slice(), order);
    } else {
        distribute_and_collect(transport, &plan, &a, &mut b, &mut c)?;
    }
    let elapsed_seconds = transport.time() - start_time;

    let checksums = Checksums {
        a: checksum(a.as_slice()),
        b: checksum(b.as_slice()),
        c: checksum(c.as_slice()),
    };

    let verification = settings.verify.then(|| verify(&a, &b, &c));
    if let Some(v) = &verification {
        if !v.matches {
            warn!(
                max_abs_diff = v.max_abs_diff,
                "distributed product differs from sequential one"
            );
        }
    }

    if settings.print {
        matrix::print_matrix("A", &a);
        matrix::print_matrix("B", &b);
        matrix::print_matrix("C", &c);
    }

    let report = RunReport {
        order,
        participants,
        rows: plan.rows().to_vec(),
        elapsed_seconds,
        checksums,
        verification,
    };

    Ok((c, report))
}

/// Send each worker its row-block, replicate B, multiply the root's own block
/// and add the workers' results into `c`.
///
/// Results are received strictly in rank order and each lands at the offset its
/// placement recorded when it was sent.
///
/// * `transport`: Channel to the workers.
/// * `plan`: Non-degenerate partition plan.
/// * `a`: Left operand.
/// * `b`: Right operand. Only read, the broadcast API takes a mutable buffer.
/// * `c`: Zeroed result matrix.
pub(crate) fn distribute_and_collect<T: Transport>(
    transport: &T,
    plan: &PartitionPlan,
    a: &SquareMatrix,
    b: &mut SquareMatrix,
    c: &mut SquareMatrix,
) -> Result<()> {
    let order = plan.order();
    let placements = plan.placements();
    let Some((own, workers)) = placements.split_first() else {
        return Ok(());
    };

    for placement in workers {
        debug!(
            rank = placement.rank,
            row_offset = placement.row_offset,
            rows = placement.rows,
            "sending row-block"
        );
        transport.send_count(placement.rank, Tag::BlockSize, placement.rows as u64)?;
        transport.send_values(
            placement.rank,
            Tag::BlockData,
            a.rows(placement.row_offset, placement.rows),
        )?;
    }

    transport.broadcast_values(ROOT_RANK, b.as_mut_slice())?;

    matrix::multiply_into(
        a.rows(own.row_offset, own.rows),
        b.as_slice(),
        c.rows_mut(own.row_offset, own.rows),
        order,
    );

    let mut partial: Vec<NumberType> = Vec::new();
    for placement in workers {
        partial.clear();
        partial.resize(placement.rows * order, 0.0);
        transport.receive_values_into(placement.rank, Tag::PartialResult, &mut partial)?;
        debug!(rank = placement.rank, "received partial result");

        for (c_ij, p_ij) in c
            .rows_mut(placement.row_offset, placement.rows)
            .iter_mut()
            .zip(&partial)
        {
            *c_ij += p_ij;
        }
    }

    Ok(())
}

/// Recomputes the product in one go and compares it with `c`.
fn verify(a: &SquareMatrix, b: &SquareMatrix, c: &SquareMatrix) -> Verification {
    let sequential = matrix::multiply(a.as_slice(), b.as_slice(), a.order());

    let max_abs_diff = sequential
        .iter()
        .zip(c.as_slice())
        .map(|(s, d)| (s - d).abs())
        .fold(0.0, NumberType::max);
    let scale = sequential
        .iter()
        .map(|v| v.abs())
        .fold(1.0, NumberType::max);

    Verification {
        max_abs_diff,
        checksum_matches: checksum(&sequential) == checksum(c.as_slice()),
        matches: max_abs_diff <= VERIFY_TOLERANCE * scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::channel;
    use crate::matrix::Fill;

    #[test]
    fn single_participant_multiplies_locally() {
        let group = channel::universe(1);
        let mut settings = Settings::new(4);
        settings.verify = true;

        let (c, report) = root_workflow(&group[0], &settings).unwrap();
        assert_eq!(c.get(0, 0), 14.);
        assert_eq!(report.rows, vec![4]);
        assert_eq!(report.participants, 1);

        let v = report.verification.unwrap();
        assert!(v.matches && v.checksum_matches);
        assert_eq!(v.max_abs_diff, 0.);
    }

    #[test]
    fn checksums_cover_inputs_and_product() {
        let group = channel::universe(1);
        let settings = Settings::new(3);
        let (c, report) = root_workflow(&group[0], &settings).unwrap();

        let (a, b) = matrix::generate_inputs(3, Fill::Indexed);
        assert_eq!(report.checksums.a, checksum(a.as_slice()));
        assert_eq!(report.checksums.b, checksum(b.as_slice()));
        assert_eq!(report.checksums.c, checksum(c.as_slice()));
        assert!(report.verification.is_none());
    }

    #[test]
    fn verify_flags_a_wrong_product() {
        let (a, b) = matrix::generate_inputs(3, Fill::Indexed);
        let product = matrix::multiply(a.as_slice(), b.as_slice(), 3);
        let mut c = SquareMatrix::from_vec(3, product).unwrap();
        assert!(verify(&a, &b, &c).matches);

        c.as_mut_slice()[4] += 1.0;
        let v = verify(&a, &b, &c);
        assert!(!v.matches);
        assert!(!v.checksum_matches);
        assert_eq!(v.max_abs_diff, 1.0);
    }
}
