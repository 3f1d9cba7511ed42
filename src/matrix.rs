use super::NumberType;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// How the input matrices get their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fill {
    /// `A[i] = i / N + i % N` and `B[i] = i / N + (i % N) * 2`.
    #[default]
    Indexed,
    /// Uniform values in `[0, 1)` from a seeded generator.
    Random { seed: u64 },
}

/// Dense square matrix stored row-major in one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SquareMatrix {
    order: usize,
    data: Vec<NumberType>,
}

impl SquareMatrix {
    pub fn zeroed(order: usize) -> Self {
        SquareMatrix {
            order,
            data: vec![0.0; order * order],
        }
    }

    /// Wraps an existing buffer, which must hold exactly `order * order` values.
    pub fn from_vec(order: usize, data: Vec<NumberType>) -> Option<Self> {
        (data.len() == order * order).then_some(SquareMatrix { order, data })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn as_slice(&self) -> &[NumberType] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [NumberType] {
        &mut self.data
    }

    pub fn get(&self, row: usize, column: usize) -> NumberType {
        self.data[row * self.order + column]
    }

    /// Contiguous slice holding rows `first..first + count`.
    pub fn rows(&self, first: usize, count: usize) -> &[NumberType] {
        &self.data[first * self.order..(first + count) * self.order]
    }

    pub fn rows_mut(&mut self, first: usize, count: usize) -> &mut [NumberType] {
        &mut self.data[first * self.order..(first + count) * self.order]
    }
}

/// Creates the two input matrices A and B of the given order.
///
/// * `order`: Number of rows and columns.
/// * `fill`: Value generation rule; both rules are reproducible.
pub fn generate_inputs(order: usize, fill: Fill) -> (SquareMatrix, SquareMatrix) {
    match fill {
        Fill::Indexed => {
            let a = (0..order * order)
                .map(|i| ((i / order) + (i % order)) as NumberType)
                .collect();
            let b = (0..order * order)
                .map(|i| ((i / order) + (i % order) * 2) as NumberType)
                .collect();
            (
                SquareMatrix { order, data: a },
                SquareMatrix { order, data: b },
            )
        }
        Fill::Random { seed } => {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut a = SquareMatrix::zeroed(order);
            let mut b = SquareMatrix::zeroed(order);
            rng.fill(a.as_mut_slice());
            rng.fill(b.as_mut_slice());
            (a, b)
        }
    }
}

/// Multiplies a block of rows of A with the whole of B and adds the outcome onto
/// `c_block`.
///
/// Iterates rows, then the shared dimension, then output columns, so that the
/// innermost loop walks one row of B and one row of C sequentially.
///
/// * `a_block`: `rows * order` values of A.
/// * `b`: All `order * order` values of B.
/// * `c_block`: `rows * order` values, normally zero on entry.
/// * `order`: Matrix order N.
pub fn multiply_into(
    a_block: &[NumberType],
    b: &[NumberType],
    c_block: &mut [NumberType],
    order: usize,
) {
    debug_assert_eq!(b.len(), order * order);
    debug_assert_eq!(a_block.len(), c_block.len());

    if order == 0 {
        return;
    }

    for (a_row, c_row) in a_block
        .chunks_exact(order)
        .zip(c_block.chunks_exact_mut(order))
    {
        for (a_ik, b_row) in a_row.iter().zip(b.chunks_exact(order)) {
            let a_ik = *a_ik;
            for (c_ij, b_kj) in c_row.iter_mut().zip(b_row) {
                *c_ij += a_ik * b_kj;
            }
        }
    }
}

/// Allocating variant of [multiply_into].
pub fn multiply(a_block: &[NumberType], b: &[NumberType], order: usize) -> Vec<NumberType> {
    let mut c_block = vec![0.0; a_block.len()];
    multiply_into(a_block, b, &mut c_block, order);
    c_block
}

/// Prints a matrix in the classical representation (rows are stacked vertically).
///
/// * `label`: Printed in front of the matrix.
/// * `a`: The matrix to be printed.
pub fn print_matrix(label: &str, a: &SquareMatrix) {
    println!("{label}:");
    if a.order() == 0 {
        return;
    }
    for row in a.as_slice().chunks_exact(a.order()) {
        println!("{:?}", row);
    }
}
