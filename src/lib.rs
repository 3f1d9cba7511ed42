//! Dense square matrix multiplication distributed by row-blocks over a fixed
//! group of message-passing participants.
//!
//! Rank 0 owns the problem: it plans the row partition, hands every worker its
//! block of A, broadcasts B, multiplies its own block and collects the partial
//! products in rank order. See [root::root_workflow] and
//! [worker::worker_workflow].

use std::thread;

use tracing::info_span;

pub mod checksum;
pub mod comm;
pub mod config;
pub mod error;
pub mod matrix;
pub mod partition;
pub mod report;
pub mod root;
pub mod worker;

use config::Settings;
use error::{ConfigError, Error, Result};
use matrix::SquareMatrix;
use report::RunReport;

pub type NumberType = f64;

pub const ROOT_RANK: usize = 0;

/// Runs a complete multiplication with every participant on its own thread of
/// the calling process, connected by [comm::channel::ChannelTransport]. The
/// calling thread acts as the root.
///
/// * `participants`: Group size, at least 1.
/// * `settings`: Validated run settings.
pub fn run_local(participants: usize, settings: &Settings) -> Result<(SquareMatrix, RunReport)> {
    let participants = config::parse_participants(participants)?;

    thread::scope(|s| {
        let mut group = comm::channel::universe(participants).into_iter();
        let root = group.next().ok_or(ConfigError::NoParticipants)?;

        let workers: Vec<_> = group
            .map(|transport| {
                s.spawn(move || {
                    let rank = comm::Transport::rank(&transport);
                    let _span = info_span!("rank", rank).entered();
                    worker::worker_workflow(&transport)
                })
            })
            .collect();

        let outcome = {
            let _span = info_span!("rank", rank = ROOT_RANK).entered();
            root::root_workflow(&root, settings)
        };
        // unblocks workers still waiting on the root after a failure
        drop(root);

        let mut worker_error = None;
        for (i, handle) in workers.into_iter().enumerate() {
            let result = handle
                .join()
                .unwrap_or(Err(Error::ParticipantPanicked { rank: i + 1 }));
            if let Err(e) = result {
                worker_error.get_or_insert(e);
            }
        }

        let outcome = outcome?;
        match worker_error {
            Some(e) => Err(e),
            None => Ok(outcome),
        }
    })
}
