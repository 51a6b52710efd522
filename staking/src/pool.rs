//! Staking pool with cycle snapshots and pro-rata dividends

use crate::error::{Result, StakingError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vertigo_core::constants::BPS_DENOM;
use vertigo_core::AccountId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakePosition {
    pub amount: u64,
    /// Dividends are paid for cycles in `last_claim_cycle..current`, so a
    /// cycle is never credited twice. Set to the entry cycle on first stake.
    pub last_claim_cycle: u64,
    /// Cycle index at the account's last synchronization. A pool reset
    /// strands positions until they re-sync via claim or weekly reset.
    pub pool_epoch: u64,
}

/// Snapshot of one completed cycle. Taken at reset so past cycles stay
/// reproducible regardless of later stakes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeCycle {
    pub index: u64,
    pub tax_bps: u64,
    pub total_staked: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakingPool {
    label: String,
    enabled: bool,
    cycle_index: u64,
    total_staked: u64,
    /// Gross reward pot distributed across stakers per completed cycle.
    cycle_reward: u64,
    positions: HashMap<AccountId, StakePosition>,
    history: Vec<StakeCycle>,
}

impl StakingPool {
    pub fn new(label: &str, cycle_reward: u64) -> Self {
        Self {
            label: label.to_string(),
            enabled: false,
            cycle_index: 0,
            total_staked: 0,
            cycle_reward,
            positions: HashMap::new(),
            history: Vec::new(),
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn cycle_index(&self) -> u64 {
        self.cycle_index
    }

    pub fn total_staked(&self) -> u64 {
        self.total_staked
    }

    pub fn position(&self, account: &str) -> Option<&StakePosition> {
        self.positions.get(account)
    }

    pub fn staked_amount(&self, account: &str) -> u64 {
        self.positions.get(account).map(|p| p.amount).unwrap_or(0)
    }

    pub fn history(&self) -> &[StakeCycle] {
        &self.history
    }

    pub fn stake(&mut self, account: &str, amount: u64) -> Result<()> {
        if !self.enabled {
            return Err(StakingError::StakingDisabled);
        }
        if let Some(position) = self.positions.get_mut(account) {
            if position.pool_epoch < self.cycle_index {
                return Err(StakingError::StalePoolEpoch {
                    account_cycle: position.pool_epoch,
                    pool_cycle: self.cycle_index,
                });
            }
            position.amount += amount;
        } else {
            self.positions.insert(
                account.to_string(),
                StakePosition {
                    amount,
                    last_claim_cycle: self.cycle_index,
                    pool_epoch: self.cycle_index,
                },
            );
        }
        self.total_staked += amount;
        Ok(())
    }

    /// Reduce the stake. Accrued dividends are claimed separately.
    pub fn unstake(&mut self, account: &str, amount: u64) -> Result<()> {
        let staked = self.staked_amount(account);
        if amount > staked {
            return Err(StakingError::InsufficientStake {
                requested: amount,
                staked,
            });
        }
        if let Some(position) = self.positions.get_mut(account) {
            position.amount -= amount;
        }
        self.total_staked -= amount;
        Ok(())
    }

    fn accrued(&self, position: &StakePosition) -> u64 {
        if position.amount == 0 {
            return 0;
        }
        let mut total = 0u64;
        for cycle in self.history.iter() {
            if cycle.index < position.last_claim_cycle || cycle.total_staked == 0 {
                continue;
            }
            let net_pot = self.cycle_reward * (BPS_DENOM - cycle.tax_bps) / BPS_DENOM;
            total += net_pot * position.amount / cycle.total_staked;
        }
        total
    }

    /// Dividends pending for the account at the current cycle.
    pub fn pending_dividends(&self, account: &str) -> u64 {
        self.positions
            .get(account)
            .map(|p| self.accrued(p))
            .unwrap_or(0)
    }

    /// Claim accrued dividends and re-synchronize the position with the
    /// current cycle. A stranded empty position (full unstake before a
    /// reset) cannot claim until resynchronized through a weekly reset.
    pub fn retrieve_dividends(&mut self, account: &str) -> Result<u64> {
        let Some(position) = self.positions.get(account) else {
            return Ok(0);
        };
        if position.amount == 0 && position.pool_epoch < self.cycle_index {
            return Err(StakingError::StalePoolEpoch {
                account_cycle: position.pool_epoch,
                pool_cycle: self.cycle_index,
            });
        }
        let payout = self.accrued(position);
        if let Some(position) = self.positions.get_mut(account) {
            position.last_claim_cycle = self.cycle_index;
            position.pool_epoch = self.cycle_index;
        }
        Ok(payout)
    }

    /// Settlement-path synchronization: claims whatever is accrued and
    /// re-aligns the position with the current cycle. Never fails.
    pub fn sync(&mut self, account: &str) -> u64 {
        let Some(position) = self.positions.get(account) else {
            return 0;
        };
        let payout = self.accrued(position);
        if let Some(position) = self.positions.get_mut(account) {
            position.last_claim_cycle = self.cycle_index;
            position.pool_epoch = self.cycle_index;
        }
        payout
    }

    /// Close the current cycle: snapshot its totals and tax, then advance
    /// the counter. In-flight positions become stale until they re-sync.
    pub fn reset(&mut self, tax_bps: u64) -> u64 {
        self.history.push(StakeCycle {
            index: self.cycle_index,
            tax_bps,
            total_staked: self.total_staked,
        });
        self.cycle_index += 1;
        log::info!(
            "{} pool reset: cycle {} closed, {} staked",
            self.label,
            self.cycle_index - 1,
            self.total_staked
        );
        self.cycle_index
    }
}
