use super::NumberType;
use serde::Serialize;
use std::fmt;

const SEED: u32 = 0x811c_9dc5;
const PRIME: u32 = 0x0100_0193;

/// Digest of a matrix's raw bytes. Only meant for comparing runs.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Checksum(pub u32);

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Folds the little-endian bytes of every value, in order, into a 32 bit
/// accumulator. Moving a value to another position changes the result.
///
/// * `values`: Raw matrix contents.
pub fn checksum(values: &[NumberType]) -> Checksum {
    let digest = values
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .fold(SEED, |acc, byte| {
            (acc.rotate_left(5) ^ u32::from(byte)).wrapping_mul(PRIME)
        });

    Checksum(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_data_gives_identical_digest() {
        let values: Vec<NumberType> = (0..64).map(|i| i as NumberType * 0.5).collect();
        let copy = values.clone();
        assert_eq!(checksum(&values), checksum(&values));
        assert_eq!(checksum(&values), checksum(&copy));
    }

    #[test]
    fn swapping_distinct_values_changes_digest() {
        let values: Vec<NumberType> = (0..16).map(|i| i as NumberType).collect();
        let original = checksum(&values);

        for (i, j) in [(0, 1), (3, 12), (14, 15), (0, 15)] {
            let mut swapped = values.clone();
            swapped.swap(i, j);
            assert_ne!(checksum(&swapped), original, "swap of {i} and {j}");
        }
    }

    #[test]
    fn empty_input_is_the_seed() {
        assert_eq!(checksum(&[]), Checksum(SEED));
    }

    #[test]
    fn displays_as_hex() {
        assert_eq!(Checksum(0xab).to_string(), "0x000000ab");
    }
}
