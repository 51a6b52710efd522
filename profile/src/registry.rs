//! Profile registry and whitelist

use crate::error::{ProfileError, Result};
use crate::{MAX_TIER, MIN_TIER};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vertigo_core::AccountId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub owner: AccountId,
    pub tier: u8,
    pub vcash_balance: u64,
    pub last_reset_epoch: u64,
    /// Purchased default-property access for tier-3 profiles. Grants the
    /// purchase right of lower tiers without changing the tier number.
    pub has_default_upgrade: bool,
}

impl Profile {
    /// Numeric row for the profile storage domain.
    pub fn storage_row(&self) -> Vec<u64> {
        vec![
            self.tier as u64,
            self.vcash_balance,
            self.last_reset_epoch,
            self.has_default_upgrade as u64,
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRegistry {
    profiles: HashMap<u64, Profile>,
    by_owner: HashMap<AccountId, u64>,
    whitelist: HashMap<AccountId, u8>,
    next_id: u64,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn validate_tier(tier: u8) -> Result<()> {
        if !(MIN_TIER..=MAX_TIER).contains(&tier) {
            return Err(ProfileError::InvalidTier(tier));
        }
        Ok(())
    }

    /// Whitelist an account at a tier. For an account with a minted profile
    /// this is a tier upgrade and must be monotone.
    pub fn whitelist(&mut self, account: &str, tier: u8) -> Result<()> {
        Self::validate_tier(tier)?;
        if let Some(profile) = self
            .by_owner
            .get(account)
            .and_then(|id| self.profiles.get_mut(id))
        {
            if tier < profile.tier {
                return Err(ProfileError::TierDowngrade {
                    from: profile.tier,
                    to: tier,
                });
            }
            profile.tier = tier;
        }
        self.whitelist.insert(account.to_string(), tier);
        Ok(())
    }

    pub fn is_whitelisted(&self, account: &str) -> bool {
        self.whitelist.contains_key(account)
    }

    /// Mint the account's profile at its whitelisted tier. One per account.
    pub fn mint(&mut self, owner: &str) -> Result<u64> {
        let tier = *self
            .whitelist
            .get(owner)
            .ok_or_else(|| ProfileError::NotWhitelisted(owner.to_string()))?;
        if self.by_owner.contains_key(owner) {
            return Err(ProfileError::ProfileAlreadyMinted(owner.to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.profiles.insert(
            id,
            Profile {
                id,
                owner: owner.to_string(),
                tier,
                vcash_balance: 0,
                last_reset_epoch: 0,
                has_default_upgrade: false,
            },
        );
        self.by_owner.insert(owner.to_string(), id);
        Ok(id)
    }

    pub fn get(&self, id: u64) -> Result<&Profile> {
        self.profiles
            .get(&id)
            .ok_or(ProfileError::ProfileNotFound(id))
    }

    pub fn get_mut(&mut self, id: u64) -> Result<&mut Profile> {
        self.profiles
            .get_mut(&id)
            .ok_or(ProfileError::ProfileNotFound(id))
    }

    pub fn id_of_owner(&self, owner: &str) -> Option<u64> {
        self.by_owner.get(owner).copied()
    }

    /// Caller must own the profile.
    pub fn get_owned(&self, id: u64, caller: &str) -> Result<&Profile> {
        let profile = self.get(id)?;
        if profile.owner != caller {
            return Err(ProfileError::NotProfileOwner(id));
        }
        Ok(profile)
    }

    /// Default properties are open to tiers 1-2; tier 3 needs the purchased
    /// upgrade.
    pub fn check_default_access(&self, id: u64) -> Result<()> {
        let profile = self.get(id)?;
        if profile.tier <= 2 || profile.has_default_upgrade {
            Ok(())
        } else {
            Err(ProfileError::TierMismatch { tier: profile.tier })
        }
    }

    pub fn debit_vcash(&mut self, id: u64, amount: u64) -> Result<()> {
        let profile = self.get_mut(id)?;
        if profile.vcash_balance < amount {
            return Err(ProfileError::InsufficientVCash {
                requested: amount,
                available: profile.vcash_balance,
            });
        }
        profile.vcash_balance -= amount;
        Ok(())
    }

    pub fn credit_vcash(&mut self, id: u64, amount: u64) -> Result<()> {
        self.get_mut(id)?.vcash_balance += amount;
        Ok(())
    }

    /// Grant tier-3 default access, paid in vCash by the engine.
    pub fn apply_tier3_upgrade(&mut self, id: u64) -> Result<()> {
        let profile = self.get_mut(id)?;
        if profile.tier != MAX_TIER {
            return Err(ProfileError::TierMismatch { tier: profile.tier });
        }
        profile.has_default_upgrade = true;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.profiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_requires_whitelist() {
        let mut registry = ProfileRegistry::new();
        assert!(matches!(
            registry.mint("alice"),
            Err(ProfileError::NotWhitelisted(_))
        ));

        registry.whitelist("alice", 1).unwrap();
        let id = registry.mint("alice").unwrap();
        assert_eq!(registry.get(id).unwrap().tier, 1);
    }

    #[test]
    fn test_one_profile_per_account() {
        let mut registry = ProfileRegistry::new();
        registry.whitelist("alice", 2).unwrap();
        registry.mint("alice").unwrap();

        assert!(matches!(
            registry.mint("alice"),
            Err(ProfileError::ProfileAlreadyMinted(_))
        ));
    }

    #[test]
    fn test_tier_upgrade_is_monotone() {
        let mut registry = ProfileRegistry::new();
        registry.whitelist("alice", 1).unwrap();
        let id = registry.mint("alice").unwrap();

        registry.whitelist("alice", 2).unwrap();
        assert_eq!(registry.get(id).unwrap().tier, 2);

        assert!(matches!(
            registry.whitelist("alice", 1),
            Err(ProfileError::TierDowngrade { from: 2, to: 1 })
        ));
    }

    #[test]
    fn test_default_access_gating() {
        let mut registry = ProfileRegistry::new();
        registry.whitelist("low", 1).unwrap();
        registry.whitelist("high", 3).unwrap();
        let low = registry.mint("low").unwrap();
        let high = registry.mint("high").unwrap();

        assert!(registry.check_default_access(low).is_ok());
        assert!(matches!(
            registry.check_default_access(high),
            Err(ProfileError::TierMismatch { tier: 3 })
        ));

        registry.apply_tier3_upgrade(high).unwrap();
        assert!(registry.check_default_access(high).is_ok());
    }

    #[test]
    fn test_vcash_debit_bound() {
        let mut registry = ProfileRegistry::new();
        registry.whitelist("alice", 1).unwrap();
        let id = registry.mint("alice").unwrap();

        registry.credit_vcash(id, 100).unwrap();
        assert!(matches!(
            registry.debit_vcash(id, 150),
            Err(ProfileError::InsufficientVCash {
                requested: 150,
                available: 100
            })
        ));
        registry.debit_vcash(id, 60).unwrap();
        assert_eq!(registry.get(id).unwrap().vcash_balance, 40);
    }
}
