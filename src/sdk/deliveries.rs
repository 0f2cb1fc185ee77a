use chrono::{DateTime, NaiveDateTime};
use csv::ReaderBuilder;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fs::File, path::Path};
use thiserror::Error;

/// A delivery record as stored. Only `id` is mandatory; `drop_point` holds
/// either a literal `"lat,lon"` pair or a free-text address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    pub pickup_point: Option<String>,
    pub drop_point: Option<String>,
    pub description: Option<String>,
    pub item_weight: Option<f64>,
    pub dimensions: Option<String>,
    pub value: Option<f64>,
    pub speed: Option<String>,
    pub zone: Option<String>,
    pub time_slot: Option<String>,
    pub fragile: Option<bool>,
    pub status: Option<String>,
    pub delivery_cost: Option<f64>,
    pub carbon_saved: Option<f64>,
    /// UTC. Unreadable timestamps load as `None`.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Accepts RFC 3339 (`Z` or an offset, converted to UTC) and the naive
/// `T`- or space-separated forms.
fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(stamped) = DateTime::parse_from_rfc3339(value) {
        return Some(stamped.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| {
            let parsed = parse_timestamp(&value);
            if parsed.is_none() {
                log::warn!("Ignoring unreadable created_at \"{}\"", value);
            }
            parsed
        }))
}

impl Delivery {
    /// The drop point, if it is non-blank.
    pub fn drop_point(&self) -> Option<&str> {
        self.drop_point
            .as_deref()
            .map(str::trim)
            .filter(|drop| !drop.is_empty())
    }
}

#[derive(Error, Debug)]
pub enum DeliveryStoreError {
    #[error("Failed to open delivery file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed delivery record: {0}")]
    Csv(#[from] csv::Error),
}

pub trait DeliveryStore {
    /// Deliveries belonging to `zone`, in storage order.
    fn deliveries_for_zone(&self, zone: &str) -> Result<Vec<Delivery>, DeliveryStoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryLookup {
    deliveries: Vec<Delivery>,
}

impl DeliveryLookup {
    pub fn new(deliveries: Vec<Delivery>) -> Self {
        Self { deliveries }
    }

    /// Loads the records of a headered CSV file. Rows whose fields do not
    /// match their column types are logged and skipped.
    pub fn from_csv<P: AsRef<Path>>(csv_path: P) -> Result<Self, DeliveryStoreError> {
        let file = File::open(csv_path)?;
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut deliveries = Vec::new();
        for record in rdr.deserialize::<Delivery>() {
            match record {
                Ok(delivery) => deliveries.push(delivery),
                Err(why) if matches!(why.kind(), csv::ErrorKind::Deserialize { .. }) => {
                    log::warn!("Skipping malformed delivery record: {}", why);
                }
                Err(why) => return Err(why.into()),
            }
        }
        log::debug!("Loaded {} deliveries", deliveries.len());

        Ok(Self { deliveries })
    }

    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }
}

impl DeliveryStore for DeliveryLookup {
    fn deliveries_for_zone(&self, zone: &str) -> Result<Vec<Delivery>, DeliveryStoreError> {
        let zone = zone.trim();
        Ok(self
            .deliveries
            .iter()
            .filter(|delivery| delivery.zone.as_deref().map(str::trim) == Some(zone))
            .cloned()
            .collect())
    }
}
