//! Address lookup behind a small trait, plus the throttling wrapper used by
//! the row loop.

pub mod nominatim;
pub mod rate_limit;

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub use crate::model::Coordinates;
use crate::model::AddressRow;

pub use nominatim::Nominatim;
pub use rate_limit::{RateLimitPolicy, RateLimiter};

/// Failure reported by a geocoding provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// Worth retrying: network trouble, throttling, a temporarily failing service.
    #[error("transient geocoding failure: {0}")]
    Transient(String),
    /// Anything else; retrying would not help.
    #[error("unexpected geocoding failure: {0}")]
    Unexpected(String),
}

/// Resolves an address to coordinates.
pub trait Geocoder {
    /// `Ok(None)` means the provider answered but knows no such place.
    fn lookup(&self, address: &AddressRow) -> Result<Option<Coordinates>, GeocodeError>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn lookup(&self, address: &AddressRow) -> Result<Option<Coordinates>, GeocodeError> {
        (**self).lookup(address)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn lookup(&self, address: &AddressRow) -> Result<Option<Coordinates>, GeocodeError> {
        (**self).lookup(address)
    }
}

/// Final result of a throttled lookup, with every failure mode kept apart.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(Coordinates),
    NotFound,
    /// Transient failures outlasted the retry budget.
    RetriesExhausted(String),
    Unexpected(String),
}

impl LookupOutcome {
    /// Projects the outcome onto "write a cell or not".
    pub fn coordinates(&self) -> Option<Coordinates> {
        match self {
            LookupOutcome::Found(coordinates) => Some(*coordinates),
            _ => None,
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            LookupOutcome::Found(_) => OutcomeKind::Found,
            LookupOutcome::NotFound => OutcomeKind::NotFound,
            LookupOutcome::RetriesExhausted(_) => OutcomeKind::RetriesExhausted,
            LookupOutcome::Unexpected(_) => OutcomeKind::Unexpected,
        }
    }
}

/// Payload-free discriminant of [`LookupOutcome`], used for tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Found,
    NotFound,
    RetriesExhausted,
    Unexpected,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::Found => write!(f, "found"),
            OutcomeKind::NotFound => write!(f, "not found"),
            OutcomeKind::RetriesExhausted => write!(f, "retries exhausted"),
            OutcomeKind::Unexpected => write!(f, "unexpected error"),
        }
    }
}
