use geocoding::{Forward, GeocodingError, Openstreetmap};
use tracing::debug;

use super::{Coordinates, GeocodeError, Geocoder};
use crate::model::AddressRow;

/// Public OpenStreetMap Nominatim instance.
pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/";

/// Forward geocoder backed by an OpenStreetMap Nominatim server.
pub struct Nominatim {
    provider: Openstreetmap,
    endpoint: String,
}

impl Nominatim {
    /// Uses the public Nominatim instance.
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Uses a self-hosted or alternative Nominatim base URL.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        // The provider appends `search` directly to the base URL.
        let mut endpoint = endpoint.into();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        Self {
            provider: Openstreetmap::new_with_endpoint(endpoint.clone()),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for Nominatim {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for Nominatim {
    fn lookup(&self, address: &AddressRow) -> Result<Option<Coordinates>, GeocodeError> {
        let query = address.query();
        let points = Forward::<f64>::forward(&self.provider, &query).map_err(classify)?;
        // Points are (x, y) = (longitude, latitude).
        let coordinates = points
            .first()
            .map(|point| Coordinates::new(point.y(), point.x()));
        debug!(%query, ?coordinates, "nominatim answered");
        Ok(coordinates)
    }
}

fn classify(error: GeocodingError) -> GeocodeError {
    match error {
        GeocodingError::Request(error) => GeocodeError::Transient(error.to_string()),
        other => GeocodeError::Unexpected(other.to_string()),
    }
}
