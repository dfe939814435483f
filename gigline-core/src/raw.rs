//! Raw record shapes returned by the Ticketmaster Discovery API.
//!
//! Every field is optional: upstream payloads routinely omit nested
//! structures, and the normaliser decides whether a gap is fatal for the
//! record or defaults to [`UNKNOWN`](crate::UNKNOWN). Unknown JSON fields are
//! ignored.
//!
//! See: <https://developer.ticketmaster.com/products-and-docs/apis/discovery-api/v2/>

#[cfg(feature = "serde")]
use serde::Deserialize;

/// One entry of the `_embedded.events` array.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawEvent {
    /// Upstream identifier, used only for diagnostics.
    pub id: Option<String>,
    /// Event title.
    pub name: Option<String>,
    /// Advertised price ranges; only the first entry is used.
    #[cfg_attr(feature = "serde", serde(rename = "priceRanges"))]
    pub price_ranges: Option<Vec<RawPriceRange>>,
    /// Nested attractions and venues.
    #[cfg_attr(feature = "serde", serde(rename = "_embedded"))]
    pub embedded: Option<RawEventEmbedded>,
}

/// Price range entry.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawPriceRange {
    /// Minimum ticket price.
    pub min: Option<f64>,
    /// Maximum ticket price.
    pub max: Option<f64>,
    /// ISO currency code.
    pub currency: Option<String>,
}

/// Nested `_embedded` object of an event.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawEventEmbedded {
    /// Performers; the first is treated as the headliner.
    pub attractions: Option<Vec<RawAttraction>>,
    /// Venues; the first is treated as the location.
    pub venues: Option<Vec<RawVenue>>,
}

/// Performer entry.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawAttraction {
    /// Performer name.
    pub name: Option<String>,
}

/// Venue entry.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawVenue {
    /// Venue name.
    pub name: Option<String>,
    /// City object.
    pub city: Option<RawCity>,
    /// State object.
    pub state: Option<RawState>,
}

/// City object of a venue.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawCity {
    /// City name.
    pub name: Option<String>,
}

/// State object of a venue.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RawState {
    /// Full state name.
    pub name: Option<String>,
    /// Postal code such as `CA`.
    #[cfg_attr(feature = "serde", serde(rename = "stateCode"))]
    pub state_code: Option<String>,
}

impl RawEvent {
    /// First advertised price range, if any.
    #[must_use]
    pub fn first_price_range(&self) -> Option<&RawPriceRange> {
        self.price_ranges.as_deref().and_then(<[_]>::first)
    }

    /// Name of the headline attraction, if present.
    #[must_use]
    pub fn headliner(&self) -> Option<&str> {
        self.embedded
            .as_ref()
            .and_then(|embedded| embedded.attractions.as_deref())
            .and_then(<[_]>::first)
            .and_then(|attraction| attraction.name.as_deref())
    }

    /// First listed venue, if present.
    #[must_use]
    pub fn venue(&self) -> Option<&RawVenue> {
        self.embedded
            .as_ref()
            .and_then(|embedded| embedded.venues.as_deref())
            .and_then(<[_]>::first)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn deserialise_full_event() {
        let json = r#"{
            "id": "vv1A",
            "name": "Winter Tour",
            "priceRanges": [{"type": "standard", "currency": "USD", "min": 45.5, "max": 120.0}],
            "_embedded": {
                "venues": [{"name": "Arena", "city": {"name": "Detroit"}, "state": {"name": "Michigan", "stateCode": "MI"}}],
                "attractions": [{"name": "The Band"}, {"name": "Support Act"}]
            }
        }"#;

        let event: RawEvent = serde_json::from_str(json).expect("should deserialise");

        let price = event.first_price_range().expect("price range");
        assert_eq!(price.min, Some(45.5));
        assert_eq!(price.max, Some(120.0));
        assert_eq!(event.headliner(), Some("The Band"));
        let venue = event.venue().expect("venue");
        assert_eq!(
            venue.city.as_ref().and_then(|city| city.name.as_deref()),
            Some("Detroit")
        );
        assert_eq!(
            venue.state.as_ref().and_then(|state| state.state_code.as_deref()),
            Some("MI")
        );
    }

    #[test]
    fn deserialise_sparse_event() {
        let event: RawEvent =
            serde_json::from_str(r#"{"name": "Mystery", "_embedded": {}}"#).expect("deserialise");

        assert!(event.first_price_range().is_none());
        assert!(event.headliner().is_none());
        assert!(event.venue().is_none());
    }

    #[test]
    fn empty_price_list_has_no_first_range() {
        let event: RawEvent =
            serde_json::from_str(r#"{"priceRanges": []}"#).expect("deserialise");
        assert!(event.first_price_range().is_none());
    }
}
