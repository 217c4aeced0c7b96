#[cfg(feature = "geocoding")]
pub mod nominatim;

#[cfg(feature = "geocoding")]
pub use nominatim::{GeocodeError, NominatimGeocoder};
