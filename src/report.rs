use crate::checksum::Checksum;
use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksums {
    pub a: Checksum,
    pub b: Checksum,
    pub c: Checksum,
}

/// Comparison of the distributed product against a sequential one.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    pub max_abs_diff: f64,
    pub checksum_matches: bool,
    pub matches: bool,
}

/// What the coordinator prints at the end of a run.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunReport {
    pub order: usize,
    pub participants: usize,
    /// Row count per rank.
    pub rows: Vec<usize>,
    /// Distribution, computation and gathering, in seconds.
    pub elapsed_seconds: f64,
    pub checksums: Checksums,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<Verification>,
}

impl RunReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Multiplied {n}x{n} matrices on {} participants (rows per rank: {:?})",
            self.participants,
            self.rows,
            n = self.order,
        )?;
        writeln!(f, "It took {} seconds to finish!", self.elapsed_seconds)?;
        writeln!(f, "checksum A: {}", self.checksums.a)?;
        writeln!(f, "checksum B: {}", self.checksums.b)?;
        write!(f, "checksum C: {}", self.checksums.c)?;

        if let Some(v) = &self.verification {
            write!(
                f,
                "\nsequential check: {} (max abs diff {:e}, checksum {})",
                if v.matches { "ok" } else { "MISMATCH" },
                v.max_abs_diff,
                if v.checksum_matches { "equal" } else { "differs" },
            )?;
        }
        Ok(())
    }
}
