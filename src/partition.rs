use std::ops::Range;

/// Where one participant's row-block lives inside the full matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rank: usize,
    pub row_offset: usize,
    pub rows: usize,
}

impl Placement {
    /// Range of linear element indices covered by this block in a row-major
    /// buffer of the given order.
    pub fn elements(&self, order: usize) -> Range<usize> {
        self.row_offset * order..(self.row_offset + self.rows) * order
    }

}

/// Row counts for every participant, coordinator included, in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    order: usize,
    rows: Vec<usize>,
}

/// Splits `order` rows among `participants` ranks.
///
/// If there are no more rows than participants, everything stays with rank 0.
/// Otherwise every rank gets `order / participants` rows and the last one
/// additionally takes the remainder.
///
/// * `order`: Matrix order N, at least 1.
/// * `participants`: Group size P, at least 1.
pub fn plan(order: usize, participants: usize) -> PartitionPlan {
    assert!(participants > 0);

    let mut rows = vec![0; participants];
    if order <= participants {
        rows[0] = order;
    } else {
        let per_rank = order / participants;
        rows.fill(per_rank);
        rows[participants - 1] = order - per_rank * (participants - 1);
    }

    PartitionPlan { order, rows }
}

impl PartitionPlan {
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn participants(&self) -> usize {
        self.rows.len()
    }

    /// Row count per rank.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// True when the coordinator does all the work and nothing gets distributed,
    /// either because there are too few rows or because it is alone.
    pub fn is_local(&self) -> bool {
        self.order <= self.participants() || self.participants() == 1
    }

    /// The placement map: one entry per rank with offsets as running sums of the
    /// lower ranks' row counts.
    pub fn placements(&self) -> Vec<Placement> {
        self.rows
            .iter()
            .enumerate()
            .scan(0, |row_offset, (rank, &rows)| {
                let placement = Placement {
                    rank,
                    row_offset: *row_offset,
                    rows,
                };
                *row_offset += rows;
                Some(placement)
            })
            .collect()
    }
}
