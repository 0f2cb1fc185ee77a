use crate::sdk::geo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, io::Result as IoResult, path::Path};

/// Geocoding results keyed by the normalised query text. Routes are never
/// cached.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct GeoCache {
    geocodes: HashMap<String, GeoPoint>,
}

fn normalise(address: &str) -> String {
    address.trim().to_lowercase()
}

impl GeoCache {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        if path.as_ref().exists() {
            let data = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> IoResult<()> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
    }

    pub fn get_geocode(&self, address: &str) -> Option<GeoPoint> {
        self.geocodes.get(&normalise(address)).copied()
    }

    pub fn insert_geocode(&mut self, address: &str, point: GeoPoint) {
        self.geocodes.insert(normalise(address), point);
    }

    pub fn len(&self) -> usize {
        self.geocodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geocodes.is_empty()
    }
}
