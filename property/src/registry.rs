//! Property records and ownership

use crate::error::{PropertyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vertigo_core::constants::{BPS_DENOM, EPOCH_SECONDS, PROPERTY_YIELD_BPS};
use vertigo_core::AccountId;

/// Recognized mutable attribute fields. Indices match the original packed
/// layout's field selector argument.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AttributeField {
    Category,
    Rarity,
    BonusTier,
    Buyable,
}

impl AttributeField {
    pub fn from_index(index: u64) -> Result<Self> {
        match index {
            0 => Ok(AttributeField::Category),
            1 => Ok(AttributeField::Rarity),
            2 => Ok(AttributeField::BonusTier),
            3 => Ok(AttributeField::Buyable),
            other => Err(PropertyError::UnknownField(other)),
        }
    }

    /// Width-derived maximum value (category 3 bits, rarity 4, bonus tier 3,
    /// buyable 1).
    pub fn max_value(&self) -> u64 {
        match self {
            AttributeField::Category => 7,
            AttributeField::Rarity => 15,
            AttributeField::BonusTier => 7,
            AttributeField::Buyable => 1,
        }
    }
}

/// Unpacked category and rarity bits. Mutated only through
/// [`PropertyRegistry::modify_attributes`], never by ownership transfer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PropertyAttributes {
    pub category: u8,
    pub rarity: u8,
    pub bonus_tier: u8,
    pub buyable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: u64,
    pub name: String,
    pub base_price: u64,
    pub pay_bonus_seconds: u64,
    pub is_vcash: bool,
    pub is_default: bool,
    pub standard_uri: String,
    pub premium_uri: String,
    pub attributes: PropertyAttributes,
    pub owner: Option<AccountId>,
}

impl Property {
    /// Income produced over one settlement epoch, before any rental split.
    /// The pay bonus extends accrual by at most one bonus period per epoch.
    /// Intermediates are widened to 128 bits; the result is at most a tenth
    /// of the base price, so the narrowing cast cannot truncate.
    pub fn epoch_income(&self) -> u64 {
        let base = self.base_price as u128 * PROPERTY_YIELD_BPS as u128 / BPS_DENOM as u128;
        let bonus = self.pay_bonus_seconds.min(EPOCH_SECONDS);
        (base * (EPOCH_SECONDS + bonus) as u128 / EPOCH_SECONDS as u128) as u64
    }

    /// Numeric row for the property storage domain.
    pub fn storage_row(&self) -> Vec<u64> {
        vec![
            self.base_price,
            self.pay_bonus_seconds,
            self.is_vcash as u64,
            self.is_default as u64,
            self.attributes.category as u64,
            self.attributes.rarity as u64,
            self.attributes.bonus_tier as u64,
            self.attributes.buyable as u64,
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyRegistry {
    properties: Vec<Property>,
    by_owner: HashMap<AccountId, Vec<u64>>,
    /// Property ids of default properties, in creation order. The default
    /// ownership transfer operation addresses these slots.
    default_slots: Vec<u64>,
}

impl PropertyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a property with the next sequential id. Names are not required
    /// to be unique. Default properties start unowned (system-held) until
    /// bought.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        name: &str,
        base_price: u64,
        pay_bonus_seconds: u64,
        is_vcash: bool,
        is_default: bool,
        standard_uri: &str,
        premium_uri: &str,
    ) -> u64 {
        let id = self.properties.len() as u64;
        self.properties.push(Property {
            id,
            name: name.to_string(),
            base_price,
            pay_bonus_seconds,
            is_vcash,
            is_default,
            standard_uri: standard_uri.to_string(),
            premium_uri: premium_uri.to_string(),
            attributes: PropertyAttributes::default(),
            owner: None,
        });
        if is_default {
            self.default_slots.push(id);
        }
        id
    }

    pub fn get(&self, id: u64) -> Result<&Property> {
        self.properties
            .get(id as usize)
            .ok_or(PropertyError::PropertyNotFound(id))
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Property> {
        self.properties
            .get_mut(id as usize)
            .ok_or(PropertyError::PropertyNotFound(id))
    }

    pub fn owner_of(&self, id: u64) -> Result<Option<&AccountId>> {
        Ok(self.get(id)?.owner.as_ref())
    }

    pub fn owned_by(&self, account: &str) -> &[u64] {
        self.by_owner
            .get(account)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn default_slot(&self, index: u64) -> Result<u64> {
        self.default_slots
            .get(index as usize)
            .copied()
            .ok_or(PropertyError::PropertyNotFound(index))
    }

    pub fn count(&self) -> usize {
        self.properties.len()
    }

    /// Targeted attribute update; other attributes are untouched.
    pub fn modify_attributes(&mut self, id: u64, field: u64, value: u64) -> Result<()> {
        let field = AttributeField::from_index(field)?;
        if value > field.max_value() {
            return Err(PropertyError::ValueOutOfRange {
                value,
                max: field.max_value(),
            });
        }
        let attrs = &mut self.get_mut(id)?.attributes;
        match field {
            AttributeField::Category => attrs.category = value as u8,
            AttributeField::Rarity => attrs.rarity = value as u8,
            AttributeField::BonusTier => attrs.bonus_tier = value as u8,
            AttributeField::Buyable => attrs.buyable = value != 0,
        }
        Ok(())
    }

    fn unindex_owner(&mut self, owner: &str, id: u64) {
        if let Some(ids) = self.by_owner.get_mut(owner) {
            ids.retain(|&p| p != id);
        }
    }

    fn index_owner(&mut self, owner: &str, id: u64) {
        self.by_owner.entry(owner.to_string()).or_default().push(id);
    }

    /// Atomic owner swap, caller must be the current owner.
    pub fn transfer_ownership(&mut self, caller: &str, id: u64, new_owner: &str) -> Result<()> {
        match self.get(id)?.owner.as_deref() {
            Some(owner) if owner == caller => {}
            _ => return Err(PropertyError::NotCurrentOwner(id)),
        }
        self.unindex_owner(caller, id);
        self.index_owner(new_owner, id);
        self.get_mut(id)?.owner = Some(new_owner.to_string());
        Ok(())
    }

    /// Move the caller's ownership of the default property at slot
    /// `from_index` onto the default property at slot `to_index`. The swap is
    /// atomic: the previous owner of the target slot (if any) takes over the
    /// source slot.
    pub fn transfer_default_ownership(
        &mut self,
        caller: &str,
        from_index: u64,
        to_index: u64,
    ) -> Result<()> {
        let from_id = self.default_slot(from_index)?;
        let to_id = self.default_slot(to_index)?;

        match self.get(from_id)?.owner.as_deref() {
            Some(owner) if owner == caller => {}
            _ => return Err(PropertyError::NotCurrentOwner(from_id)),
        }

        let displaced = self.get(to_id)?.owner.clone();
        self.unindex_owner(caller, from_id);
        self.index_owner(caller, to_id);
        if let Some(prev) = &displaced {
            self.unindex_owner(prev, to_id);
            self.index_owner(prev, from_id);
        }
        self.get_mut(to_id)?.owner = Some(caller.to_string());
        self.get_mut(from_id)?.owner = displaced;
        Ok(())
    }

    /// Assign ownership of a system-held property to a buyer.
    pub fn assign_to_buyer(&mut self, id: u64, buyer: &str) -> Result<()> {
        if self.get(id)?.owner.is_some() {
            return Err(PropertyError::PropertyAlreadyOwned(id));
        }
        self.index_owner(buyer, id);
        self.get_mut(id)?.owner = Some(buyer.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> PropertyRegistry {
        let mut registry = PropertyRegistry::new();
        registry.create("name", 100, 86_400, true, false, "uri", "uri2");
        registry.create("name", 1, 420, true, true, "uri", "uri2");
        registry
    }

    #[test]
    fn test_sequential_ids_and_default_slots() {
        let registry = sample_registry();
        assert_eq!(registry.count(), 2);
        assert_eq!(registry.default_slot(0).unwrap(), 1);
        assert!(registry.default_slot(1).is_err());
    }

    #[test]
    fn test_modify_attributes_validates_field() {
        let mut registry = sample_registry();

        registry.modify_attributes(0, 3, 1).unwrap();
        assert!(registry.get(0).unwrap().attributes.buyable);
        // other attributes untouched
        assert_eq!(registry.get(0).unwrap().attributes.rarity, 0);

        assert!(matches!(
            registry.modify_attributes(0, 9, 1),
            Err(PropertyError::UnknownField(9))
        ));
        assert!(matches!(
            registry.modify_attributes(0, 1, 99),
            Err(PropertyError::ValueOutOfRange { value: 99, max: 15 })
        ));
    }

    #[test]
    fn test_transfer_requires_current_owner() {
        let mut registry = sample_registry();
        registry.assign_to_buyer(0, "alice").unwrap();

        assert!(matches!(
            registry.transfer_ownership("bob", 0, "carol"),
            Err(PropertyError::NotCurrentOwner(0))
        ));

        registry.transfer_ownership("alice", 0, "bob").unwrap();
        assert_eq!(registry.owner_of(0).unwrap().unwrap(), "bob");
        assert!(registry.owned_by("alice").is_empty());
        assert_eq!(registry.owned_by("bob"), &[0]);
    }

    #[test]
    fn test_default_slot_swap() {
        let mut registry = sample_registry();
        registry.create("H", 1, 269, false, true, "", "");
        // defaults: slot 0 -> id 1, slot 1 -> id 2
        registry.assign_to_buyer(1, "alice").unwrap();
        registry.assign_to_buyer(2, "bob").unwrap();

        registry.transfer_default_ownership("alice", 0, 1).unwrap();
        assert_eq!(registry.owner_of(2).unwrap().unwrap(), "alice");
        assert_eq!(registry.owner_of(1).unwrap().unwrap(), "bob");
    }

    #[test]
    fn test_epoch_income_caps_bonus() {
        let mut registry = PropertyRegistry::new();
        let modest = registry.create("a", 10_000, 86_400, false, false, "", "");
        let huge = registry.create("b", 10_000, 10 * EPOCH_SECONDS, false, false, "", "");

        let base = 10_000 * PROPERTY_YIELD_BPS / BPS_DENOM;
        let modest_income = registry.get(modest).unwrap().epoch_income();
        let huge_income = registry.get(huge).unwrap().epoch_income();

        assert_eq!(
            modest_income,
            base * (EPOCH_SECONDS + 86_400) / EPOCH_SECONDS
        );
        // bonus never exceeds one full period
        assert_eq!(huge_income, base * 2);
    }

    #[test]
    fn test_epoch_income_extreme_price() {
        let mut registry = PropertyRegistry::new();
        let id = registry.create("a", u64::MAX, EPOCH_SECONDS, false, false, "", "");

        let expected = (u64::MAX as u128 * PROPERTY_YIELD_BPS as u128 / BPS_DENOM as u128 * 2) as u64;
        assert_eq!(registry.get(id).unwrap().epoch_income(), expected);
    }
}
