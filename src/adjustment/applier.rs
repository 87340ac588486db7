use log::{error, trace};
use std::time::Instant;

use super::digest::{compute_digest, verify};
use super::level::recalculate_level;
use super::record::AdjustmentSet;
use super::{AdjustmentConfig, AdjustmentError, Direction};
use crate::account::AccountRepository;

/// Counts reported after a successful adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentReport {
    pub accounts_adjusted: usize,
    /// Accounts whose stored level differs from before the call.
    pub levels_changed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustmentOutcome {
    Applied(AdjustmentReport),
    /// The dataset's address digest did not match; nothing was written.
    DigestMismatch {
        expected: String,
        computed: Option<String>,
    },
}

impl AdjustmentOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, AdjustmentOutcome::Applied(_))
    }
}

/// Apply (`Forward`) or reverse (`Reverse`) the dataset's deltas, then
/// re-derive the level of every touched account.
///
/// Not idempotent: two `Forward` calls without a `Reverse` in between
/// subtract the dataset twice. The block pipeline must invoke each direction
/// exactly once per block event.
pub fn apply<R>(
    direction: Direction,
    config: &AdjustmentConfig,
    repository: &mut R,
) -> Result<AdjustmentOutcome, AdjustmentError>
where
    R: AccountRepository + ?Sized,
{
    let adjustments = AdjustmentSet::from_records(direction, config.dataset.records());

    if !verify(&config.expected_digest, adjustments.addresses()) {
        let computed = compute_digest(adjustments.addresses());
        error!(
            "Verify hash failed! Stopping {:?} blocks minted adjustment (expected {}, computed {:?})",
            direction, config.expected_digest, computed
        );
        if config.strict_digest {
            return Err(AdjustmentError::DigestMismatch {
                expected: config.expected_digest.clone(),
                computed,
            });
        }
        return Ok(AdjustmentOutcome::DigestMismatch {
            expected: config.expected_digest.clone(),
            computed,
        });
    }

    trace!("Verify hash passed! Running {direction:?} blocks minted adjustment");
    let t0 = Instant::now();
    repository.update_blocks_minted_adjustments(&adjustments)?;
    trace!(
        "{} addresses adjusted ({:?}) in {} ms",
        adjustments.len(),
        direction,
        t0.elapsed().as_millis()
    );

    let mut levels_changed = 0;
    for address in adjustments.addresses() {
        let change = recalculate_level(repository, address, &config.thresholds)?;
        if change.changed() {
            trace!(
                "Minter {} level {} -> {} ({direction:?})",
                change.address, change.previous, change.level
            );
            levels_changed += 1;
        }
    }
    trace!(
        "Account levels updated for {levels_changed} blocks minted adjustment addresses ({direction:?})"
    );

    Ok(AdjustmentOutcome::Applied(AdjustmentReport {
        accounts_adjusted: adjustments.len(),
        levels_changed,
    }))
}
