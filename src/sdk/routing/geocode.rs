use std::sync::Mutex;

use super::cache::GeoCache;
use super::error::RoutingError;
use super::service::Geocoder;
use crate::sdk::geo::GeoPoint;

/// Turns user input into a coordinate. A literal `"lat,lon"` pair is used as
/// is; anything else goes to the geocoder.
pub fn resolve_location<G>(input: &str, geocoder: &G) -> Result<GeoPoint, RoutingError>
where
    G: Geocoder + ?Sized,
{
    let input = input.trim();
    if input.is_empty() {
        return Err(RoutingError::GeocodeNotFound(String::new()));
    }

    match input.parse::<GeoPoint>() {
        Ok(point) => Ok(point),
        Err(why) => {
            log::debug!("\"{}\" is not a literal coordinate ({}), geocoding", input, why);
            geocoder.geocode(input)
        }
    }
}

/// Puts a [`GeoCache`] in front of a geocoder. Only successful lookups are
/// stored.
pub struct CachedGeocoder<'a, G: ?Sized> {
    inner: &'a G,
    cache: Mutex<GeoCache>,
}

impl<'a, G: Geocoder + ?Sized> CachedGeocoder<'a, G> {
    pub fn new(inner: &'a G, cache: GeoCache) -> Self {
        Self {
            inner,
            cache: Mutex::new(cache),
        }
    }

    /// Returns the cache, e.g. to persist it after a run.
    pub fn into_cache(self) -> GeoCache {
        self.cache.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<G: Geocoder + ?Sized> Geocoder for CachedGeocoder<'_, G> {
    fn geocode(&self, address: &str) -> Result<GeoPoint, RoutingError> {
        let cached = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get_geocode(address);
        if let Some(point) = cached {
            log::debug!("[CACHE HIT] {}", address);
            return Ok(point);
        }

        let point = self.inner.geocode(address)?;
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert_geocode(address, point);
        Ok(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGeocoder {
        calls: AtomicUsize,
    }

    impl Geocoder for CountingGeocoder {
        fn geocode(&self, address: &str) -> Result<GeoPoint, RoutingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match address {
                "Rennes" => Ok(GeoPoint::new(48.11, -1.68)),
                _ => Err(RoutingError::GeocodeNotFound(address.to_string())),
            }
        }
    }

    #[test]
    fn literal_coordinates_skip_the_geocoder() {
        let geocoder = CountingGeocoder {
            calls: AtomicUsize::new(0),
        };
        let point = resolve_location(" 47.2, -1.55 ", &geocoder).unwrap();
        assert_eq!(point, GeoPoint::new(47.2, -1.55));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn blank_input_is_not_found() {
        let geocoder = CountingGeocoder {
            calls: AtomicUsize::new(0),
        };
        assert!(matches!(
            resolve_location("   ", &geocoder),
            Err(RoutingError::GeocodeNotFound(_))
        ));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn out_of_range_pair_is_geocoded_instead() {
        let geocoder = CountingGeocoder {
            calls: AtomicUsize::new(0),
        };
        assert!(resolve_location("123,456", &geocoder).is_err());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cache_answers_repeat_queries() {
        let counting = CountingGeocoder {
            calls: AtomicUsize::new(0),
        };
        let cached = CachedGeocoder::new(&counting, GeoCache::default());

        assert!(cached.geocode("Rennes").is_ok());
        assert!(cached.geocode("rennes ").is_ok());
        assert!(cached.geocode("Atlantis").is_err());
        assert!(cached.geocode("Atlantis").is_err());

        assert_eq!(counting.calls.load(Ordering::SeqCst), 3);
        let cache = cached.into_cache();
        assert_eq!(cache.len(), 1);
    }
}
