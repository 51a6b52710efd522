//! Engine state and public operations

use crate::error::{EngineError, Result};
use vertigo_core::constants::{
    CYCLE_REWARD, DEFAULT_INCOME_BASE, GENESIS_SUPPLY, TIER3_UPGRADE_COST,
};
use vertigo_core::{AccountId, EpochClock, Ledger, TeamPayout};
use vertigo_profile::{ProfileError, ProfileRegistry, MAX_TIER};
use vertigo_property::{PropertyError, PropertyRegistry, RentalMarket, SplitTerms};
use vertigo_staking::{seed_schedule, StakingError, StakingPool, TaxContract};
use vertigo_storage::{FlatContract, StorageContract, StorageError, StorageSystem};

/// System account that settlement rewards are minted into before the
/// fee-skimming transfer to the profile owner.
pub const REWARD_POOL: &str = "system:reward-pool";

/// System account holding tokens staked into the Vert pool.
pub const STAKE_VAULT: &str = "system:stake-vault";

/// Logical storage domains, one `StorageSystem` each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageDomain {
    Staking,
    Profile,
    Property,
}

/// Row offset of per-cycle snapshots in the staking domain (row 0 holds the
/// tax schedule parameters).
const CYCLE_ROW_BASE: u64 = 1;

pub struct VertigoEngine {
    admin: AccountId,
    ledger: Ledger,
    payouts: TeamPayout,
    clock: EpochClock,
    profiles: ProfileRegistry,
    properties: PropertyRegistry,
    rentals: RentalMarket,
    vcash_pool: StakingPool,
    vert_pool: StakingPool,
    staking_store: StorageSystem,
    profile_store: StorageSystem,
    property_store: StorageSystem,
}

impl VertigoEngine {
    pub fn new(admin: &str) -> Result<Self> {
        let mut ledger = Ledger::new();
        ledger.mint(admin, GENESIS_SUPPLY)?;

        let mut vcash_pool = StakingPool::new("vcash", CYCLE_REWARD);
        let mut vert_pool = StakingPool::new("vert", CYCLE_REWARD);
        vcash_pool.set_enabled(true);
        vert_pool.set_enabled(true);

        let mut staking_store = StorageSystem::new("staking", Box::new(TaxContract));
        seed_schedule(&mut staking_store);

        Ok(Self {
            admin: admin.to_string(),
            ledger,
            payouts: TeamPayout::new(),
            clock: EpochClock::new(),
            profiles: ProfileRegistry::new(),
            properties: PropertyRegistry::new(),
            rentals: RentalMarket::new(),
            vcash_pool,
            vert_pool,
            staking_store,
            profile_store: StorageSystem::new("profile", Box::new(FlatContract)),
            property_store: StorageSystem::new("property", Box::new(FlatContract)),
        })
    }

    fn ensure_admin(&self, caller: &str) -> Result<()> {
        if caller != self.admin {
            return Err(EngineError::Unauthorized(caller.to_string()));
        }
        Ok(())
    }

    fn persist_profile(&mut self, profile_id: u64) -> Result<()> {
        let row = self.profiles.get(profile_id)?.storage_row();
        self.profile_store.set_row(profile_id, row);
        Ok(())
    }

    fn persist_property(&mut self, property_id: u64) -> Result<()> {
        let row = self.properties.get(property_id)?.storage_row();
        self.property_store.set_row(property_id, row);
        Ok(())
    }

    // ---- queries ------------------------------------------------------

    pub fn balance_of(&self, account: &str) -> u64 {
        self.ledger.balance(account)
    }

    pub fn current_epoch(&self) -> u64 {
        self.clock.current()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn profiles(&self) -> &ProfileRegistry {
        &self.profiles
    }

    pub fn properties(&self) -> &PropertyRegistry {
        &self.properties
    }

    pub fn rentals(&self) -> &RentalMarket {
        &self.rentals
    }

    pub fn payouts(&self) -> &TeamPayout {
        &self.payouts
    }

    pub fn vert_pool(&self) -> &StakingPool {
        &self.vert_pool
    }

    pub fn vcash_pool(&self) -> &StakingPool {
        &self.vcash_pool
    }

    pub fn storage_generation(&self, domain: StorageDomain) -> u32 {
        self.store(domain).generation()
    }

    fn store(&self, domain: StorageDomain) -> &StorageSystem {
        match domain {
            StorageDomain::Staking => &self.staking_store,
            StorageDomain::Profile => &self.profile_store,
            StorageDomain::Property => &self.property_store,
        }
    }

    /// Tax rate for a cycle, resolved through the storage contract active at
    /// call time. Total for all non-negative indices.
    pub fn get_stake_tax(&self, cycle_index: i64) -> Result<u64> {
        match self.staking_store.query(cycle_index) {
            Ok(tax) => Ok(tax),
            Err(StorageError::IndexOutOfRange(i)) => {
                Err(EngineError::Staking(StakingError::CycleOutOfRange(i)))
            }
            Err(err) => Err(EngineError::Storage(err)),
        }
    }

    /// The distinct portion of the schedule, cycles 0..15.
    pub fn get_stake_taxes(&self) -> Result<Vec<u64>> {
        (0..vertigo_staking::TAX_SCHEDULE_SPAN as i64)
            .map(|cycle| self.get_stake_tax(cycle))
            .collect()
    }

    // ---- profiles -----------------------------------------------------

    pub fn whitelist_user(&mut self, caller: &str, account: &str, tier: u8) -> Result<()> {
        self.ensure_admin(caller)?;
        self.profiles.whitelist(account, tier)?;
        Ok(())
    }

    pub fn mint_profile(&mut self, caller: &str) -> Result<u64> {
        let profile_id = self.profiles.mint(caller)?;
        self.persist_profile(profile_id)?;
        Ok(profile_id)
    }

    /// Tier-3 profiles buy default-property access for vCash.
    pub fn upgrade_tier3_profile(&mut self, caller: &str, profile_id: u64) -> Result<()> {
        let profile = self.profiles.get_owned(profile_id, caller)?;
        if profile.tier != MAX_TIER {
            return Err(EngineError::Profile(ProfileError::TierMismatch {
                tier: profile.tier,
            }));
        }
        self.profiles.debit_vcash(profile_id, TIER3_UPGRADE_COST)?;
        self.profiles.apply_tier3_upgrade(profile_id)?;
        self.persist_profile(profile_id)?;
        Ok(())
    }

    // ---- properties ---------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    pub fn create_property(
        &mut self,
        caller: &str,
        name: &str,
        base_price: u64,
        pay_bonus_seconds: u64,
        is_vcash: bool,
        is_default: bool,
        standard_uri: &str,
        premium_uri: &str,
    ) -> Result<u64> {
        self.ensure_admin(caller)?;
        let property_id = self.properties.create(
            name,
            base_price,
            pay_bonus_seconds,
            is_vcash,
            is_default,
            standard_uri,
            premium_uri,
        );
        self.persist_property(property_id)?;
        Ok(property_id)
    }

    /// Targeted attribute update. `extra` is the legacy packed-layout
    /// selector payload and carries no meaning here.
    pub fn modify_packed_property_struct(
        &mut self,
        caller: &str,
        property_id: u64,
        field: u64,
        value: u64,
        extra: u64,
    ) -> Result<()> {
        self.ensure_admin(caller)?;
        let _ = extra;
        self.properties.modify_attributes(property_id, field, value)?;
        self.persist_property(property_id)?;
        Ok(())
    }

    pub fn buy_special_property(&mut self, caller: &str, property_id: u64) -> Result<()> {
        let property = self.properties.get(property_id)?;
        if !property.attributes.buyable {
            return Err(EngineError::Property(PropertyError::NotBuyable(property_id)));
        }
        if property.owner.is_some() {
            return Err(EngineError::Property(PropertyError::PropertyAlreadyOwned(
                property_id,
            )));
        }
        let price = property.base_price;
        self.ledger.transfer(caller, &self.admin.clone(), price)?;
        self.properties.assign_to_buyer(property_id, caller)?;
        self.persist_property(property_id)?;
        Ok(())
    }

    pub fn buy_vcash_property(&mut self, caller: &str, property_id: u64) -> Result<()> {
        let property = self.properties.get(property_id)?;
        if !property.is_default || !property.is_vcash {
            return Err(EngineError::Property(PropertyError::NotBuyable(property_id)));
        }
        if property.owner.is_some() {
            return Err(EngineError::Property(PropertyError::PropertyAlreadyOwned(
                property_id,
            )));
        }
        let price = property.base_price;
        let profile_id = self
            .profiles
            .id_of_owner(caller)
            .ok_or_else(|| ProfileError::NoProfile(caller.to_string()))?;
        self.profiles.check_default_access(profile_id)?;
        self.profiles.debit_vcash(profile_id, price)?;
        self.properties.assign_to_buyer(property_id, caller)?;
        self.persist_profile(profile_id)?;
        self.persist_property(property_id)?;
        Ok(())
    }

    pub fn buy_vertigo_property(&mut self, caller: &str, property_id: u64) -> Result<()> {
        let property = self.properties.get(property_id)?;
        if !property.is_default || property.is_vcash {
            return Err(EngineError::Property(PropertyError::NotBuyable(property_id)));
        }
        if property.owner.is_some() {
            return Err(EngineError::Property(PropertyError::PropertyAlreadyOwned(
                property_id,
            )));
        }
        let price = property.base_price;
        self.ledger.transfer(caller, &self.admin.clone(), price)?;
        self.properties.assign_to_buyer(property_id, caller)?;
        self.persist_property(property_id)?;
        Ok(())
    }

    pub fn transfer_property_ownership(
        &mut self,
        caller: &str,
        new_owner: &str,
        property_id: u64,
    ) -> Result<()> {
        self.properties
            .transfer_ownership(caller, property_id, new_owner)?;
        self.persist_property(property_id)?;
        Ok(())
    }

    pub fn transfer_default_property_ownership(
        &mut self,
        caller: &str,
        from_index: u64,
        to_index: u64,
    ) -> Result<()> {
        self.properties
            .transfer_default_ownership(caller, from_index, to_index)?;
        let from_id = self.properties.default_slot(from_index)?;
        let to_id = self.properties.default_slot(to_index)?;
        self.persist_property(from_id)?;
        self.persist_property(to_id)?;
        Ok(())
    }

    // ---- rentals ------------------------------------------------------

    pub fn make_rental_offer(
        &mut self,
        caller: &str,
        candidate: &str,
        property_id: u64,
        price: u64,
        split_owner: u32,
        split_renter: u32,
    ) -> Result<u64> {
        let split = SplitTerms {
            owner_share: split_owner,
            renter_share: split_renter,
        };
        let offer_id =
            self.rentals
                .make_offer(&self.properties, caller, property_id, candidate, price, split)?;
        Ok(offer_id)
    }

    /// `split_flag` is a legacy argument of the observed call surface and is
    /// ignored; split terms are fixed at offer creation.
    pub fn accept_rental_offer(
        &mut self,
        caller: &str,
        offer_id: u64,
        property_id: u64,
        paid_price: u64,
        split_flag: u64,
    ) -> Result<()> {
        let _ = split_flag;
        let price = self
            .rentals
            .validate_accept(caller, offer_id, property_id, paid_price)?
            .price;
        let owner = match self.properties.owner_of(property_id)? {
            Some(owner) => owner.clone(),
            None => return Err(EngineError::Property(PropertyError::NotCurrentOwner(property_id))),
        };
        if price > 0 && owner != caller {
            self.ledger.transfer(caller, &owner, price)?;
        }
        self.rentals.mark_accepted(offer_id)?;
        Ok(())
    }

    pub fn reclaim_rental_ownership(&mut self, caller: &str, property_id: u64) -> Result<()> {
        self.rentals.reclaim(&self.properties, caller, property_id)?;
        Ok(())
    }

    pub fn withdraw_rental_offer(&mut self, caller: &str, property_id: u64) -> Result<()> {
        self.rentals.withdraw(&self.properties, caller, property_id)?;
        Ok(())
    }

    // ---- tokens & staking ---------------------------------------------

    pub fn transfer(&mut self, caller: &str, to: &str, amount: u64) -> Result<()> {
        self.ledger.transfer(caller, to, amount)?;
        Ok(())
    }

    pub fn modify_team_payout_recipients(
        &mut self,
        caller: &str,
        account: &str,
        fee_basis_points: u64,
    ) -> Result<()> {
        self.ensure_admin(caller)?;
        self.payouts.modify(account, fee_basis_points)?;
        Ok(())
    }

    /// Stake vCash from an owned profile into the vCash reward pool.
    pub fn stake_vcash(&mut self, caller: &str, profile_id: u64, amount: u64) -> Result<()> {
        let profile = self.profiles.get_owned(profile_id, caller)?;
        let available = profile.vcash_balance;
        if available < amount {
            return Err(EngineError::Profile(ProfileError::InsufficientVCash {
                requested: amount,
                available,
            }));
        }
        self.vcash_pool.stake(caller, amount)?;
        self.profiles.debit_vcash(profile_id, amount)?;
        self.persist_profile(profile_id)?;
        Ok(())
    }

    /// Stake tokens into the Vert pool; tokens move to the stake vault.
    pub fn stake_vert(&mut self, caller: &str, amount: u64) -> Result<()> {
        let available = self.ledger.balance(caller);
        if available < amount {
            return Err(EngineError::Core(
                vertigo_core::CoreError::InsufficientBalance {
                    requested: amount,
                    available,
                },
            ));
        }
        self.vert_pool.stake(caller, amount)?;
        self.ledger.transfer(caller, STAKE_VAULT, amount)?;
        Ok(())
    }

    pub fn unstake_vert(&mut self, caller: &str, amount: u64) -> Result<()> {
        self.vert_pool.unstake(caller, amount)?;
        self.ledger.transfer(STAKE_VAULT, caller, amount)?;
        Ok(())
    }

    /// Claim accrued Vert-pool dividends into the caller's balance.
    pub fn retrieve_vert_staking_dividends(&mut self, caller: &str) -> Result<u64> {
        let payout = self.vert_pool.retrieve_dividends(caller)?;
        if payout > 0 {
            self.ledger.mint(caller, payout)?;
        }
        Ok(payout)
    }

    /// Close the current pool cycle and advance the settlement epoch.
    /// Snapshots the ended cycle into the staking storage domain.
    pub fn reset_pool(&mut self, caller: &str) -> Result<u64> {
        self.ensure_admin(caller)?;

        let vcash_cycle = self.vcash_pool.cycle_index();
        let tax = self.get_stake_tax(vcash_cycle as i64)?;
        let staked = self.vcash_pool.total_staked();
        self.vcash_pool.reset(tax);
        self.staking_store
            .set_row(CYCLE_ROW_BASE + vcash_cycle, vec![tax, staked]);

        let vert_cycle = self.vert_pool.cycle_index();
        let vert_tax = self.get_stake_tax(vert_cycle as i64)?;
        self.vert_pool.reset(vert_tax);

        let epoch = self.clock.advance();
        log::info!("pool reset complete, epoch advanced to {}", epoch);
        Ok(epoch)
    }

    pub fn set_staking_enabled(&mut self, caller: &str, enabled: bool) -> Result<()> {
        self.ensure_admin(caller)?;
        self.vcash_pool.set_enabled(enabled);
        self.vert_pool.set_enabled(enabled);
        Ok(())
    }

    // ---- storage rotation ---------------------------------------------

    /// Rotate the active storage accessor for a domain. Row data survives;
    /// subsequent queries resolve against the new contract.
    pub fn cycle(
        &mut self,
        caller: &str,
        domain: StorageDomain,
        contract: Box<dyn StorageContract>,
    ) -> Result<u32> {
        self.ensure_admin(caller)?;
        let system = match domain {
            StorageDomain::Staking => &mut self.staking_store,
            StorageDomain::Profile => &mut self.profile_store,
            StorageDomain::Property => &mut self.property_store,
        };
        Ok(system.cycle(contract))
    }

    // ---- settlement ---------------------------------------------------

    /// Settle one profile up to the current epoch: default income, property
    /// and rental income for every epoch since the last settlement, and
    /// pending staking dividends, each credited exactly once. Token income
    /// flows through the fee-skimming transfer so team payout recipients are
    /// skimmed at settlement.
    pub fn weekly_reset(&mut self, caller: &str, profile_id: u64) -> Result<u64> {
        let epoch = self.clock.current();
        let (tier, last_reset) = {
            let profile = self.profiles.get_owned(profile_id, caller)?;
            (profile.tier, profile.last_reset_epoch)
        };
        if last_reset == epoch {
            return Err(EngineError::EpochAlreadySettled { profile_id, epoch });
        }
        let elapsed = epoch - last_reset;

        // Compute all deltas before mutating anything.
        let mut vcash_income = DEFAULT_INCOME_BASE * (4 - tier as u64);
        let mut token_income = 0u64;

        for &id in self.properties.owned_by(caller) {
            let property = self.properties.get(id)?;
            let income = property.epoch_income();
            let owner_part = match self.rentals.active_rental(id) {
                Some(offer) => offer.split.apply(income).0,
                None => income,
            };
            if property.is_vcash {
                vcash_income += owner_part;
            } else {
                token_income += owner_part;
            }
        }

        for offer in self.rentals.rented_in_by(caller) {
            let property = self.properties.get(offer.property_id)?;
            let renter_part = offer.split.apply(property.epoch_income()).1;
            if property.is_vcash {
                vcash_income += renter_part;
            } else {
                token_income += renter_part;
            }
        }

        // Income accrues for every epoch since the profile's last settlement;
        // dividends already span every completed cycle on their own.
        vcash_income *= elapsed;
        token_income *= elapsed;

        let dividends =
            self.vcash_pool.pending_dividends(caller) + self.vert_pool.pending_dividends(caller);
        token_income += dividends;

        // Apply.
        self.vcash_pool.sync(caller);
        self.vert_pool.sync(caller);
        self.profiles.credit_vcash(profile_id, vcash_income)?;
        if token_income > 0 {
            self.ledger.mint(REWARD_POOL, token_income)?;
            self.ledger
                .fee_skimming_transfer(REWARD_POOL, caller, token_income, &self.payouts)?;
        }
        self.profiles.get_mut(profile_id)?.last_reset_epoch = epoch;
        self.persist_profile(profile_id)?;

        log::debug!(
            "profile {} settled epoch {}: {} tokens, {} vCash",
            profile_id,
            epoch,
            token_income,
            vcash_income
        );
        Ok(token_income)
    }
}
