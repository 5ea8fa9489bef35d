//! The property domain model and the raw listing-feed shape it is parsed
//! from.
//!
//! The feed is a JSON array produced by the listing scraper. Records are
//! mapped into [`Property`] wholesale at load time; once loaded, properties
//! are immutable and the whole set is replaced on reload, never mutated in
//! place.

use anyhow::Context;
use bevy::prelude::Resource;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::geo::GeoPoint;

/// A user-assigned triage tag on a property. Stored independently of the
/// property itself, so it survives feed reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Shortlist,
    #[default]
    Unclassified,
    Reject,
}

impl Classification {
    pub fn display(self) -> &'static str {
        match self {
            Classification::Shortlist => "Shortlist",
            Classification::Unclassified => "Unclassified",
            Classification::Reject => "Rejected",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Classification::Shortlist => "shortlist",
            Classification::Unclassified => "unclassified",
            Classification::Reject => "reject",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "shortlist" => Some(Classification::Shortlist),
            "unclassified" => Some(Classification::Unclassified),
            "reject" => Some(Classification::Reject),
            _ => None,
        }
    }
}

/// A single listed property.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: String,
    pub coordinates: GeoPoint,
    /// First address line, used as the display title.
    pub title: String,
    /// Second address line.
    pub location: String,
    /// Asking price as a whole number of pounds.
    pub price: i64,
    pub bedrooms: u32,
    pub img_url: String,
    pub link_url: String,
    pub provider: String,
    pub published: Option<DateTime<Utc>>,
}

/// The full loaded property set, in feed order.
#[derive(Resource, Debug, Default, Clone)]
pub struct PropertyCatalog {
    pub properties: Vec<Property>,
}

impl PropertyCatalog {
    pub fn new(properties: Vec<Property>) -> Self {
        Self { properties }
    }
}

// Raw feed shapes ////////////////////////////////////////////////////////////

#[derive(Deserialize)]
struct RawProperty {
    id: String,
    coordinates: RawCoordinates,
    location_line_1: String,
    location_line_2: String,
    price: i64,
    bedrooms: u32,
    #[serde(default)]
    photos: Vec<RawPhoto>,
    url: String,
    provider: String,
    #[serde(default)]
    published_datetime: Option<String>,
}

#[derive(Deserialize)]
struct RawCoordinates {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawPhoto {
    url: String,
}

/// Parses the raw listing feed. Any malformed record fails the whole load;
/// the map stays usable with an empty property set.
pub fn parse_property_feed(json: &str) -> anyhow::Result<Vec<Property>> {
    let raw: Vec<RawProperty> =
        serde_json::from_str(json).context("property feed is not a valid listing array")?;
    Ok(raw.into_iter().map(Property::from_raw).collect())
}

impl Property {
    fn from_raw(raw: RawProperty) -> Self {
        let published = raw.published_datetime.as_deref().and_then(|text| {
            match DateTime::parse_from_rfc3339(text) {
                Ok(stamp) => Some(stamp.with_timezone(&Utc)),
                Err(err) => {
                    log::warn!(
                        "ignoring unparseable published_datetime {text:?} on {}: {err}",
                        raw.id
                    );
                    None
                }
            }
        });
        Self {
            id: raw.id,
            coordinates: GeoPoint::new(raw.coordinates.lat, raw.coordinates.lng),
            title: raw.location_line_1,
            location: raw.location_line_2,
            price: raw.price,
            bedrooms: raw.bedrooms,
            img_url: raw
                .photos
                .first()
                .map(|photo| photo.url.clone())
                .unwrap_or_default(),
            link_url: raw.url,
            provider: raw.provider,
            published,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"[
        {
            "id": "p-100",
            "coordinates": {"lat": 57.13, "lng": -2.11},
            "location_line_1": "12 Harbour Street",
            "location_line_2": "Footdee, Aberdeen",
            "price": 185000,
            "bedrooms": 3,
            "photos": [{"url": "https://img.example/100.jpg"}],
            "url": "https://listings.example/p-100",
            "provider": "acme-homes",
            "published_datetime": "2025-11-02T09:30:00Z"
        },
        {
            "id": "p-101",
            "coordinates": {"lat": 57.14, "lng": -2.12},
            "location_line_1": "4 Granite Place",
            "location_line_2": "Rosemount, Aberdeen",
            "price": 240000,
            "bedrooms": 2,
            "photos": [],
            "url": "https://listings.example/p-101",
            "provider": "acme-homes"
        }
    ]"#;

    #[test]
    fn maps_feed_fields() {
        let properties = parse_property_feed(FEED).expect("feed should parse");
        assert_eq!(properties.len(), 2);
        let first = &properties[0];
        assert_eq!(first.id, "p-100");
        assert_eq!(first.title, "12 Harbour Street");
        assert_eq!(first.location, "Footdee, Aberdeen");
        assert_eq!(first.img_url, "https://img.example/100.jpg");
        assert!(first.published.is_some());
    }

    #[test]
    fn missing_photo_and_timestamp_are_tolerated() {
        let properties = parse_property_feed(FEED).expect("feed should parse");
        let second = &properties[1];
        assert_eq!(second.img_url, "");
        assert!(second.published.is_none());
    }

    #[test]
    fn malformed_record_fails_the_whole_load() {
        let broken = r#"[{"id": "p-1"}]"#;
        assert!(parse_property_feed(broken).is_err());
    }

    #[test]
    fn classification_keys_round_trip() {
        for tag in [
            Classification::Shortlist,
            Classification::Unclassified,
            Classification::Reject,
        ] {
            assert_eq!(Classification::from_key(tag.key()), Some(tag));
        }
        assert_eq!(Classification::from_key("bogus"), None);
    }
}
