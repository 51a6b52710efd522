//! Team payout recipient set

use crate::error::{CoreError, Result};
use crate::AccountId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutRecipient {
    pub account: AccountId,
    pub fee_basis_points: u64,
}

/// Accounts entitled to a flat basis-point skim on settlement transfers.
/// Zero-weight entries are removed from the set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamPayout {
    recipients: Vec<PayoutRecipient>,
}

impl TeamPayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a recipient. A zero weight removes the entry.
    pub fn modify(&mut self, account: &str, fee_basis_points: u64) -> Result<()> {
        if self.total_basis_points() - self.basis_points_of(account) + fee_basis_points
            > crate::constants::BPS_DENOM
        {
            return Err(CoreError::InvalidFeeBasisPoints(fee_basis_points));
        }

        self.recipients.retain(|r| r.account != account);
        if fee_basis_points > 0 {
            self.recipients.push(PayoutRecipient {
                account: account.to_string(),
                fee_basis_points,
            });
        }
        Ok(())
    }

    pub fn recipients(&self) -> &[PayoutRecipient] {
        &self.recipients
    }

    pub fn basis_points_of(&self, account: &str) -> u64 {
        self.recipients
            .iter()
            .find(|r| r.account == account)
            .map(|r| r.fee_basis_points)
            .unwrap_or(0)
    }

    pub fn total_basis_points(&self) -> u64 {
        self.recipients.iter().map(|r| r.fee_basis_points).sum()
    }
}
