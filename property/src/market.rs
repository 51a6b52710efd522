//! Rental offer state machine
//!
//! Per property: `Open -> Accepted -> Reclaimed`, with `Open` reachable
//! again only after the active offer is withdrawn or reclaimed. At most one
//! offer per property may be live (open or accepted) at a time.

use crate::error::{PropertyError, Result};
use crate::registry::PropertyRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vertigo_core::AccountId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OfferStatus {
    Open,
    Accepted,
    Reclaimed,
    Withdrawn,
}

/// Income split between property owner and renter, as integer ratio parts.
/// A zero-total split pays the owner in full.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SplitTerms {
    pub owner_share: u32,
    pub renter_share: u32,
}

impl SplitTerms {
    /// Split an income amount; rounding dust goes to the owner. Total over
    /// the parts and the product are widened so extreme shares cannot
    /// overflow.
    pub fn apply(&self, income: u64) -> (u64, u64) {
        let total = self.owner_share as u64 + self.renter_share as u64;
        if total == 0 {
            return (income, 0);
        }
        let renter = (income as u128 * self.renter_share as u128 / total as u128) as u64;
        (income - renter, renter)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalOffer {
    pub offer_id: u64,
    pub property_id: u64,
    pub candidate: AccountId,
    pub price: u64,
    pub split: SplitTerms,
    pub status: OfferStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RentalMarket {
    offers: HashMap<u64, RentalOffer>,
    /// Offer currently live (open or accepted) per property.
    active_by_property: HashMap<u64, u64>,
    next_offer_id: u64,
}

impl RentalMarket {
    pub fn new() -> Self {
        Self {
            offers: HashMap::new(),
            active_by_property: HashMap::new(),
            next_offer_id: 1,
        }
    }

    pub fn get(&self, offer_id: u64) -> Result<&RentalOffer> {
        self.offers
            .get(&offer_id)
            .ok_or(PropertyError::OfferNotFound(offer_id))
    }

    /// The accepted rental currently splitting a property's income, if any.
    pub fn active_rental(&self, property_id: u64) -> Option<&RentalOffer> {
        self.active_by_property
            .get(&property_id)
            .and_then(|id| self.offers.get(id))
            .filter(|offer| offer.status == OfferStatus::Accepted)
    }

    /// Accepted rentals where `account` is the renter.
    pub fn rented_in_by(&self, account: &str) -> Vec<&RentalOffer> {
        self.active_by_property
            .values()
            .filter_map(|id| self.offers.get(id))
            .filter(|offer| offer.status == OfferStatus::Accepted && offer.candidate == account)
            .collect()
    }

    pub fn make_offer(
        &mut self,
        registry: &PropertyRegistry,
        caller: &str,
        property_id: u64,
        candidate: &str,
        price: u64,
        split: SplitTerms,
    ) -> Result<u64> {
        match registry.owner_of(property_id)? {
            Some(owner) if owner == caller => {}
            _ => return Err(PropertyError::NotPropertyOwner(property_id)),
        }
        if self.active_by_property.contains_key(&property_id) {
            return Err(PropertyError::OfferAlreadyOpen(property_id));
        }

        let offer_id = self.next_offer_id;
        self.next_offer_id += 1;
        self.offers.insert(
            offer_id,
            RentalOffer {
                offer_id,
                property_id,
                candidate: candidate.to_string(),
                price,
                split,
                status: OfferStatus::Open,
            },
        );
        self.active_by_property.insert(property_id, offer_id);
        Ok(offer_id)
    }

    /// Validate an acceptance without mutating, so the caller can sequence
    /// the rent payment between validation and [`RentalMarket::mark_accepted`].
    pub fn validate_accept(
        &self,
        caller: &str,
        offer_id: u64,
        property_id: u64,
        paid_price: u64,
    ) -> Result<&RentalOffer> {
        let offer = self.get(offer_id)?;
        if offer.property_id != property_id {
            return Err(PropertyError::OfferNotFound(offer_id));
        }
        if offer.status != OfferStatus::Open {
            return Err(PropertyError::OfferNotOpen(offer_id));
        }
        if offer.candidate != caller {
            return Err(PropertyError::NotRenterCandidate(offer_id));
        }
        if paid_price != offer.price {
            return Err(PropertyError::PriceMismatch {
                paid: paid_price,
                asked: offer.price,
            });
        }
        Ok(offer)
    }

    /// Transition a validated offer to `Accepted`.
    pub fn mark_accepted(&mut self, offer_id: u64) -> Result<()> {
        let offer = self
            .offers
            .get_mut(&offer_id)
            .ok_or(PropertyError::OfferNotFound(offer_id))?;
        if offer.status != OfferStatus::Open {
            return Err(PropertyError::OfferNotOpen(offer_id));
        }
        offer.status = OfferStatus::Accepted;
        Ok(())
    }

    /// Owner ends an accepted rental; full income returns to the owner from
    /// the next settlement on.
    pub fn reclaim(
        &mut self,
        registry: &PropertyRegistry,
        caller: &str,
        property_id: u64,
    ) -> Result<()> {
        match registry.owner_of(property_id)? {
            Some(owner) if owner == caller => {}
            _ => return Err(PropertyError::NotPropertyOwner(property_id)),
        }
        let offer_id = *self
            .active_by_property
            .get(&property_id)
            .ok_or(PropertyError::NoActiveRental(property_id))?;
        let offer = self
            .offers
            .get_mut(&offer_id)
            .ok_or(PropertyError::OfferNotFound(offer_id))?;
        if offer.status != OfferStatus::Accepted {
            return Err(PropertyError::NoActiveRental(property_id));
        }
        offer.status = OfferStatus::Reclaimed;
        self.active_by_property.remove(&property_id);
        Ok(())
    }

    /// Owner cancels an open offer, reopening the property's slot.
    pub fn withdraw(
        &mut self,
        registry: &PropertyRegistry,
        caller: &str,
        property_id: u64,
    ) -> Result<()> {
        match registry.owner_of(property_id)? {
            Some(owner) if owner == caller => {}
            _ => return Err(PropertyError::NotPropertyOwner(property_id)),
        }
        let offer_id = *self
            .active_by_property
            .get(&property_id)
            .ok_or(PropertyError::OfferNotFound(property_id))?;
        let offer = self
            .offers
            .get_mut(&offer_id)
            .ok_or(PropertyError::OfferNotFound(offer_id))?;
        if offer.status != OfferStatus::Open {
            return Err(PropertyError::OfferNotOpen(offer_id));
        }
        offer.status = OfferStatus::Withdrawn;
        self.active_by_property.remove(&property_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (PropertyRegistry, RentalMarket) {
        let mut registry = PropertyRegistry::new();
        registry.create("name", 100, 86_400, true, false, "uri", "uri2");
        registry.assign_to_buyer(0, "alice").unwrap();
        (registry, RentalMarket::new())
    }

    fn even_split() -> SplitTerms {
        SplitTerms {
            owner_share: 1,
            renter_share: 1,
        }
    }

    #[test]
    fn test_only_owner_makes_offers() {
        let (registry, mut market) = setup();
        assert!(matches!(
            market.make_offer(&registry, "bob", 0, "bob", 10, even_split()),
            Err(PropertyError::NotPropertyOwner(0))
        ));
    }

    #[test]
    fn test_one_live_offer_per_property() {
        let (registry, mut market) = setup();
        market
            .make_offer(&registry, "alice", 0, "bob", 10, even_split())
            .unwrap();
        assert!(matches!(
            market.make_offer(&registry, "alice", 0, "carol", 5, even_split()),
            Err(PropertyError::OfferAlreadyOpen(0))
        ));
    }

    #[test]
    fn test_exact_price_acceptance() {
        let (registry, mut market) = setup();
        let offer_id = market
            .make_offer(&registry, "alice", 0, "bob", 10, even_split())
            .unwrap();

        assert!(matches!(
            market.validate_accept("bob", offer_id, 0, 12),
            Err(PropertyError::PriceMismatch { paid: 12, asked: 10 })
        ));
        market.validate_accept("bob", offer_id, 0, 10).unwrap();
        market.mark_accepted(offer_id).unwrap();

        assert!(market.active_rental(0).is_some());
        assert_eq!(market.rented_in_by("bob").len(), 1);
    }

    #[test]
    fn test_reclaim_ends_split_and_reopens_slot() {
        let (registry, mut market) = setup();
        let offer_id = market
            .make_offer(&registry, "alice", 0, "bob", 0, even_split())
            .unwrap();
        market.mark_accepted(offer_id).unwrap();

        assert!(matches!(
            market.reclaim(&registry, "bob", 0),
            Err(PropertyError::NotPropertyOwner(0))
        ));
        market.reclaim(&registry, "alice", 0).unwrap();
        assert!(market.active_rental(0).is_none());

        // slot is open again
        market
            .make_offer(&registry, "alice", 0, "carol", 1, even_split())
            .unwrap();
    }

    #[test]
    fn test_withdraw_reopens_slot() {
        let (registry, mut market) = setup();
        market
            .make_offer(&registry, "alice", 0, "bob", 10, even_split())
            .unwrap();
        market.withdraw(&registry, "alice", 0).unwrap();
        market
            .make_offer(&registry, "alice", 0, "bob", 10, even_split())
            .unwrap();
    }

    #[test]
    fn test_split_terms() {
        let split = SplitTerms {
            owner_share: 1,
            renter_share: 3,
        };
        assert_eq!(split.apply(100), (25, 75));

        let all_owner = SplitTerms {
            owner_share: 0,
            renter_share: 0,
        };
        assert_eq!(all_owner.apply(100), (100, 0));

        // rounding dust stays with the owner
        let uneven = SplitTerms {
            owner_share: 1,
            renter_share: 1,
        };
        assert_eq!(uneven.apply(101), (51, 50));
    }

    #[test]
    fn test_split_terms_extreme_shares() {
        let owner_heavy = SplitTerms {
            owner_share: u32::MAX,
            renter_share: 1,
        };
        assert_eq!(owner_heavy.apply(100), (100, 0));

        let renter_heavy = SplitTerms {
            owner_share: 1,
            renter_share: u32::MAX,
        };
        assert_eq!(renter_heavy.apply(100), (1, 99));

        let even = SplitTerms {
            owner_share: 1,
            renter_share: 1,
        };
        let (owner, renter) = even.apply(u64::MAX);
        assert_eq!(owner + renter, u64::MAX);
        assert_eq!(owner, renter + 1);
    }
}
