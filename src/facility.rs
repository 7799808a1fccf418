//! Facility key parsing.
//!
//! A facility key is an opaque delimited string encoding state, city and an
//! address label. Two wire formats exist in the field and they are NOT
//! cross-compatible:
//!
//! - Underscore: `CA_Oakland_5333 Adeline St` (state, city, address)
//! - Hyphenated: `CA - Oakland - West - Retail - 5333 Adeline St`
//!   (state and city in fixed positions, address is the last of 5 fields)
//!
//! The active format is deployment configuration (`keyFormat` in config);
//! there is no auto-detection. Malformed input parses to all-empty parts so
//! downstream filtering degrades to "no match" instead of failing.

use serde::{Deserialize, Serialize};

/// Which delimiter convention facility keys use in this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KeyFormat {
    #[default]
    Underscore,
    Hyphenated,
}

/// Hyphenated keys carry exactly this many ` - `-separated fields.
const HYPHENATED_FIELD_COUNT: usize = 5;

/// Structured decomposition of a facility key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityKey {
    pub state: String,
    pub city: String,
    pub address: String,
}

impl FacilityKey {
    /// Parse a raw facility key in the given format.
    ///
    /// Never fails: on too few segments every part comes back empty.
    pub fn parse(raw: &str, format: KeyFormat) -> FacilityKey {
        let raw = raw.trim();
        match format {
            KeyFormat::Underscore => parse_underscore(raw),
            KeyFormat::Hyphenated => parse_hyphenated(raw),
        }
    }

    /// True when parsing produced no usable parts.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.city.is_empty() && self.address.is_empty()
    }
}

/// `STATE_CITY_ADDRESS` where the address may itself contain underscores.
fn parse_underscore(raw: &str) -> FacilityKey {
    let mut parts = raw.splitn(3, '_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(state), Some(city), Some(address)) => FacilityKey {
            state: state.trim().to_string(),
            city: city.trim().to_string(),
            address: address.trim().to_string(),
        },
        _ => FacilityKey::default(),
    }
}

/// `STATE - CITY - REGION - TYPE - ADDRESS`: five fields, address last.
fn parse_hyphenated(raw: &str) -> FacilityKey {
    let parts: Vec<&str> = raw.split(" - ").collect();
    if parts.len() < HYPHENATED_FIELD_COUNT {
        return FacilityKey::default();
    }
    FacilityKey {
        state: parts[0].trim().to_string(),
        city: parts[1].trim().to_string(),
        address: parts[parts.len() - 1].trim().to_string(),
    }
}
