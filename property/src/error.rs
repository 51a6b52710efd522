//! Property and rental error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropertyError {
    #[error("Property not found: {0}")]
    PropertyNotFound(u64),

    #[error("Caller is not the property owner: {0}")]
    NotPropertyOwner(u64),

    #[error("Caller is not the current owner: {0}")]
    NotCurrentOwner(u64),

    #[error("An offer is already open for property {0}")]
    OfferAlreadyOpen(u64),

    #[error("Offer not found: {0}")]
    OfferNotFound(u64),

    #[error("Offer is not open for acceptance: {0}")]
    OfferNotOpen(u64),

    #[error("Caller is not the offer's renter candidate: {0}")]
    NotRenterCandidate(u64),

    #[error("Price mismatch: paid {paid}, asked {asked}")]
    PriceMismatch { paid: u64, asked: u64 },

    #[error("Unknown packed field: {0}")]
    UnknownField(u64),

    #[error("Value {value} out of range for field (max {max})")]
    ValueOutOfRange { value: u64, max: u64 },

    #[error("Property {0} is not buyable through this path")]
    NotBuyable(u64),

    #[error("Property already owned: {0}")]
    PropertyAlreadyOwned(u64),

    #[error("No active rental for property {0}")]
    NoActiveRental(u64),
}

pub type Result<T> = std::result::Result<T, PropertyError>;
