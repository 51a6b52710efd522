//! Vertigo Property Module
//!
//! Ownable, rentable, income-producing assets:
//! - `PropertyRegistry`: sequential-id property records with typed
//!   attributes (the unpacked form of the original packed flags) and atomic
//!   ownership transfer.
//! - `RentalMarket`: per-property offer state machine with exact-price
//!   acceptance and owner/renter income splits.

pub mod error;
pub mod market;
pub mod registry;

pub use error::{PropertyError, Result};
pub use market::{OfferStatus, RentalMarket, RentalOffer, SplitTerms};
pub use registry::{AttributeField, Property, PropertyAttributes, PropertyRegistry};
