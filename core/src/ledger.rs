//! Token ledger with fee-skimming transfers

use crate::error::{CoreError, Result};
use crate::payout::TeamPayout;
use crate::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub address: AccountId,
    pub balance: u64,
}

/// Per-account token balances plus supply counters.
///
/// All mutating operations validate fully before touching any balance, so a
/// failed call leaves the ledger unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    accounts: HashMap<AccountId, Account>,
    total_minted: u64,
    total_burned: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, address: &str) -> u64 {
        self.accounts
            .get(address)
            .map(|acc| acc.balance)
            .unwrap_or(0)
    }

    pub fn total_minted(&self) -> u64 {
        self.total_minted
    }

    pub fn total_burned(&self) -> u64 {
        self.total_burned
    }

    /// Sum of all account balances, for conservation checks.
    pub fn total_balance(&self) -> u64 {
        self.accounts.values().map(|acc| acc.balance).sum()
    }

    fn account_mut(&mut self, address: &str) -> &mut Account {
        self.accounts
            .entry(address.to_string())
            .or_insert_with(|| Account {
                address: address.to_string(),
                balance: 0,
            })
    }

    pub fn mint(&mut self, recipient: &str, amount: u64) -> Result<()> {
        let new_supply = self
            .total_minted
            .checked_add(amount)
            .ok_or(CoreError::AmountOverflow)?;

        self.account_mut(recipient).balance += amount;
        self.total_minted = new_supply;
        Ok(())
    }

    pub fn burn(&mut self, holder: &str, amount: u64) -> Result<()> {
        let available = self.balance(holder);
        if available < amount {
            return Err(CoreError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        self.account_mut(holder).balance -= amount;
        self.total_burned += amount;
        Ok(())
    }

    pub fn transfer(&mut self, from: &str, to: &str, amount: u64) -> Result<()> {
        let available = self.balance(from);
        if available < amount {
            return Err(CoreError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        self.account_mut(from).balance -= amount;
        self.account_mut(to).balance += amount;
        Ok(())
    }

    /// Transfer with the team payout skim applied.
    ///
    /// Each recipient is credited its own basis-point share of `amount`; the
    /// remainder goes to `to`. Rounding dust stays with `to`, so the sum of
    /// credits always equals `amount`.
    pub fn fee_skimming_transfer(
        &mut self,
        from: &str,
        to: &str,
        amount: u64,
        payouts: &TeamPayout,
    ) -> Result<()> {
        let available = self.balance(from);
        if available < amount {
            return Err(CoreError::InsufficientBalance {
                requested: amount,
                available,
            });
        }

        let mut skimmed = 0u64;
        let mut shares: Vec<(AccountId, u64)> = Vec::with_capacity(payouts.recipients().len());
        for r in payouts.recipients() {
            let share = amount
                .checked_mul(r.fee_basis_points)
                .ok_or(CoreError::AmountOverflow)?
                / crate::constants::BPS_DENOM;
            shares.push((r.account.clone(), share));
        }

        self.account_mut(from).balance -= amount;
        for (account, share) in &shares {
            self.account_mut(account).balance += share;
            skimmed += share;
            log::debug!("skimmed {} to payout recipient {}", share, account);
        }
        self.account_mut(to).balance += amount - skimmed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_and_transfer() {
        let mut ledger = Ledger::new();

        ledger.mint("alice", 1_000).unwrap();
        assert_eq!(ledger.balance("alice"), 1_000);
        assert_eq!(ledger.total_minted(), 1_000);

        ledger.transfer("alice", "bob", 400).unwrap();
        assert_eq!(ledger.balance("alice"), 600);
        assert_eq!(ledger.balance("bob"), 400);
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let mut ledger = Ledger::new();
        ledger.mint("alice", 100).unwrap();

        let err = ledger.transfer("alice", "bob", 200).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientBalance {
                requested: 200,
                available: 100
            }
        ));
        // failed transfer leaves balances untouched
        assert_eq!(ledger.balance("alice"), 100);
        assert_eq!(ledger.balance("bob"), 0);
    }

    #[test]
    fn test_fee_skimming_transfer_conserves_amount() {
        let mut ledger = Ledger::new();
        let mut payouts = TeamPayout::new();
        payouts.modify("team-a", 50).unwrap();
        payouts.modify("team-b", 100).unwrap();

        ledger.mint("pool", 10_000).unwrap();
        ledger
            .fee_skimming_transfer("pool", "alice", 10_000, &payouts)
            .unwrap();

        assert_eq!(ledger.balance("team-a"), 50);
        assert_eq!(ledger.balance("team-b"), 100);
        assert_eq!(ledger.balance("alice"), 9_850);
        assert_eq!(ledger.total_balance(), 10_000);
    }

    #[test]
    fn test_fee_skim_rejects_overflowing_amount() {
        let mut ledger = Ledger::new();
        let mut payouts = TeamPayout::new();
        payouts.modify("team-a", 50).unwrap();

        ledger.mint("pool", u64::MAX).unwrap();
        let err = ledger
            .fee_skimming_transfer("pool", "alice", u64::MAX, &payouts)
            .unwrap_err();
        assert!(matches!(err, CoreError::AmountOverflow));
        // failed transfer leaves balances untouched
        assert_eq!(ledger.balance("pool"), u64::MAX);
        assert_eq!(ledger.balance("alice"), 0);
    }

    #[test]
    fn test_burn_tracks_supply() {
        let mut ledger = Ledger::new();
        ledger.mint("alice", 500).unwrap();
        ledger.burn("alice", 200).unwrap();

        assert_eq!(ledger.total_minted() - ledger.total_burned(), 300);
        assert_eq!(ledger.total_balance(), 300);
    }
}
