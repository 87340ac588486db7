use log::trace;
use thiserror::Error;

use crate::account::{AccountRepository, DataError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("cumulative blocks by level must not be empty")]
    Empty,

    #[error("level 0 threshold must be 0, got {0}")]
    NonZeroBase(u32),

    #[error("threshold for level {level} ({threshold}) is below the previous level's ({previous})")]
    Decreasing {
        level: usize,
        threshold: u32,
        previous: u32,
    },
}

/// Cumulative blocks-minted threshold per level, index 0 being level 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelThresholds(Vec<u32>);

impl LevelThresholds {
    pub fn new(cumulative_blocks_by_level: Vec<u32>) -> Result<Self, ThresholdError> {
        match cumulative_blocks_by_level.first() {
            None => return Err(ThresholdError::Empty),
            Some(&base) if base != 0 => return Err(ThresholdError::NonZeroBase(base)),
            Some(_) => {}
        }
        for (level, pair) in cumulative_blocks_by_level.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(ThresholdError::Decreasing {
                    level: level + 1,
                    threshold: pair[1],
                    previous: pair[0],
                });
            }
        }
        Ok(Self(cumulative_blocks_by_level))
    }

    pub fn max_level(&self) -> u32 {
        (self.0.len() - 1) as u32
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// Highest level whose threshold `effective` reaches; negative totals
    /// are level 0.
    pub fn level_for(&self, effective: i64) -> u32 {
        if effective < 0 {
            return 0;
        }
        self.0
            .iter()
            .rposition(|&threshold| effective >= i64::from(threshold))
            .map_or(0, |level| level as u32)
    }
}

/// Outcome of re-deriving one account's level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChange {
    pub address: String,
    pub previous: u32,
    pub level: u32,
}

impl LevelChange {
    pub fn changed(&self) -> bool {
        self.previous != self.level
    }
}

/// Re-derive `address`'s level from its effective blocks minted and persist
/// it. The write happens even when the level is unchanged.
pub fn recalculate_level<R>(
    repository: &mut R,
    address: &str,
    thresholds: &LevelThresholds,
) -> Result<LevelChange, DataError>
where
    R: AccountRepository + ?Sized,
{
    let mut account = repository
        .get_account(address)?
        .ok_or_else(|| DataError::UnknownAccount(address.to_string()))?;

    let previous = account.level;
    account.level = thresholds.level_for(account.effective_blocks_minted());
    repository.set_level(&account)?;
    trace!("Minter {} updated to level {}", account.address, account.level);

    Ok(LevelChange {
        address: account.address,
        previous,
        level: account.level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountData, InMemoryAccountRepository};

    fn thresholds() -> LevelThresholds {
        LevelThresholds::new(vec![0, 100, 300, 700]).unwrap()
    }

    #[test]
    fn level_boundaries() {
        let t = thresholds();
        let cases = [
            (-5, 0),
            (0, 0),
            (50, 0),
            (100, 1),
            (299, 1),
            (300, 2),
            (699, 2),
            (700, 3),
            (1_000_000, 3),
        ];
        for (effective, expected) in cases {
            assert_eq!(t.level_for(effective), expected, "effective={effective}");
        }
        assert_eq!(t.max_level(), 3);
    }

    #[test]
    fn equal_thresholds_favor_higher_level() {
        let t = LevelThresholds::new(vec![0, 10, 10, 20]).unwrap();
        assert_eq!(t.level_for(10), 2);
        assert_eq!(t.level_for(9), 0);
    }

    #[test]
    fn rejects_malformed_tables() {
        assert_eq!(LevelThresholds::new(vec![]), Err(ThresholdError::Empty));
        assert_eq!(
            LevelThresholds::new(vec![5, 10]),
            Err(ThresholdError::NonZeroBase(5))
        );
        assert_eq!(
            LevelThresholds::new(vec![0, 100, 50]),
            Err(ThresholdError::Decreasing {
                level: 2,
                threshold: 50,
                previous: 100
            })
        );
    }

    #[test]
    fn recalculate_persists_and_reports_change() {
        let mut repo = InMemoryAccountRepository::new();
        let mut acc = AccountData::new("Qminter");
        acc.blocks_minted = 350;
        acc.blocks_minted_penalty = -20;
        acc.level = 1;
        repo.insert(acc);

        let change = recalculate_level(&mut repo, "Qminter", &thresholds()).unwrap();
        assert_eq!(change.previous, 1);
        assert_eq!(change.level, 2);
        assert!(change.changed());
        assert_eq!(repo.get("Qminter").unwrap().level, 2);

        let again = recalculate_level(&mut repo, "Qminter", &thresholds()).unwrap();
        assert!(!again.changed());
    }

    #[test]
    fn negative_effective_drops_to_level_zero() {
        let mut repo = InMemoryAccountRepository::new();
        let mut acc = AccountData::new("Qminter");
        acc.blocks_minted = 800;
        acc.blocks_minted_adjustment = -900;
        acc.level = 3;
        repo.insert(acc);

        let change = recalculate_level(&mut repo, "Qminter", &thresholds()).unwrap();
        assert_eq!(change.level, 0);
        assert_eq!(repo.get("Qminter").unwrap().level, 0);
    }

    #[test]
    fn missing_account_is_an_error() {
        let mut repo = InMemoryAccountRepository::new();
        assert_eq!(
            recalculate_level(&mut repo, "Qnobody", &thresholds()),
            Err(DataError::UnknownAccount("Qnobody".into()))
        );
    }
}
