//!  Delulu Travel Agent
//!
//!  Copyright (C) 2026  Mamy Ratsimbazafy
//!
//!  This program is free software: you can redistribute it and/or modify
//!  it under the terms of the GNU Affero General Public License as published by
//!  the Free Software Foundation, either version 3 of the License, or
//!  (at your option) any later version.
//!
//!  This program is distributed in the hope that it will be useful,
//!  but WITHOUT ANY WARRANTY; without even the implied warranty of
//!  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//!  GNU Affero General Public License for more details.
//!
//!  You should have received a copy of the GNU Affero General Public License
//!  along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! # Fares Query Builder
//!
//! Side-effect free construction of the booking page query string.
//! A fresh map is built on every call; the provider defaults are never mutated.

use std::collections::BTreeMap;

use crate::fares_validation::{SearchRequest, TripType};

/// Parameters the booking page requires but the search does not configure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDefaults {
    return_airport_code: String,
    senior_passengers_count: u32,
    fare_type: String,
    passenger_type: String,
    promo_code: String,
    reset: bool,
    redirect_to_vision: bool,
    integration_tag: String,
    leapfrog_request: bool,
}

impl Default for ProviderDefaults {
    fn default() -> Self {
        Self {
            return_airport_code: String::new(),
            senior_passengers_count: 0,
            fare_type: "USD".to_string(),
            passenger_type: "ADULT".to_string(),
            promo_code: String::new(),
            reset: true,
            redirect_to_vision: true,
            integration_tag: "HOMEQBOMAIR".to_string(),
            leapfrog_request: true,
        }
    }
}

impl ProviderDefaults {
    pub fn fare_type(mut self, currency: impl Into<String>) -> Self {
        self.fare_type = currency.into();
        self
    }

    pub fn promo_code(mut self, promo_code: impl Into<String>) -> Self {
        self.promo_code = promo_code.into();
        self
    }

    pub fn integration_tag(mut self, tag: impl Into<String>) -> Self {
        self.integration_tag = tag.into();
        self
    }

    pub fn senior_passengers_count(mut self, count: u32) -> Self {
        self.senior_passengers_count = count;
        self
    }

    fn pairs(&self) -> [(&'static str, String); 9] {
        [
            ("returnAirportCode", self.return_airport_code.clone()),
            (
                "seniorPassengersCount",
                self.senior_passengers_count.to_string(),
            ),
            ("fareType", self.fare_type.clone()),
            ("passengerType", self.passenger_type.clone()),
            ("promoCode", self.promo_code.clone()),
            ("reset", self.reset.to_string()),
            ("redirectToVision", self.redirect_to_vision.to_string()),
            ("int", self.integration_tag.clone()),
            ("leapfrogRequest", self.leapfrog_request.to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalQuery {
    params: BTreeMap<String, String>,
}

impl CanonicalQuery {
    pub fn build(request: &SearchRequest, defaults: &ProviderDefaults) -> Self {
        let mut params: BTreeMap<String, String> = defaults
            .pairs()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let mut set = |key: &str, value: String| {
            params.insert(key.to_string(), value);
        };
        set("originationAirportCode", request.from_airport.clone());
        set("destinationAirportCode", request.to_airport.clone());
        set("tripType", request.trip_type.as_str().to_string());
        set("departureDate", request.depart_date.clone());
        set(
            "departureTimeOfDay",
            request.depart_time_of_day.as_str().to_string(),
        );
        set("adultPassengersCount", request.adults.to_string());

        // The booking page wants both return keys even on one-way searches.
        let (return_date, return_time) = match request.trip_type {
            TripType::RoundTrip => (
                request.return_date.clone().unwrap_or_default(),
                request
                    .return_time_of_day
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_default(),
            ),
            TripType::OneWay => (String::new(), String::new()),
        };
        set("returnDate", return_date);
        set("returnTimeOfDay", return_time);

        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// `key=value` pairs joined by `&`. Values are not percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    pub fn search_url(&self, base_url: &str) -> String {
        format!("{}?{}", base_url, self.to_query_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fares_validation::TimeOfDay;

    fn request(trip_type: TripType) -> SearchRequest {
        SearchRequest {
            from_airport: "DEN".to_string(),
            to_airport: "MDW".to_string(),
            depart_date: "2030-07-17".to_string(),
            return_date: Some("2030-07-19".to_string()),
            trip_type,
            depart_time_of_day: TimeOfDay::BeforeNoon,
            return_time_of_day: Some(TimeOfDay::AfterSix),
            adults: 2,
        }
    }

    #[test]
    fn one_way_has_empty_return_keys() {
        // Even if a caller smuggles return fields through, one-way clears them.
        let query = CanonicalQuery::build(&request(TripType::OneWay), &ProviderDefaults::default());
        assert_eq!(query.get("returnDate"), Some(""));
        assert_eq!(query.get("returnTimeOfDay"), Some(""));
        assert_eq!(query.get("tripType"), Some("oneway"));
    }

    #[test]
    fn round_trip_carries_all_fields() {
        let query =
            CanonicalQuery::build(&request(TripType::RoundTrip), &ProviderDefaults::default());
        assert_eq!(query.len(), 17);
        assert_eq!(query.get("originationAirportCode"), Some("DEN"));
        assert_eq!(query.get("destinationAirportCode"), Some("MDW"));
        assert_eq!(query.get("departureDate"), Some("2030-07-17"));
        assert_eq!(query.get("departureTimeOfDay"), Some("BEFORE_NOON"));
        assert_eq!(query.get("returnDate"), Some("2030-07-19"));
        assert_eq!(query.get("returnTimeOfDay"), Some("AFTER_SIX"));
        assert_eq!(query.get("adultPassengersCount"), Some("2"));
        assert_eq!(query.get("fareType"), Some("USD"));
        assert_eq!(query.get("passengerType"), Some("ADULT"));
        assert_eq!(query.get("seniorPassengersCount"), Some("0"));
        assert_eq!(query.get("int"), Some("HOMEQBOMAIR"));
        assert_eq!(query.get("reset"), Some("true"));
        assert_eq!(query.get("promoCode"), Some(""));
    }

    #[test]
    fn query_string_is_unencoded_pairs() {
        let query =
            CanonicalQuery::build(&request(TripType::RoundTrip), &ProviderDefaults::default());
        let qs = query.to_query_string();
        let pairs: Vec<&str> = qs.split('&').collect();
        assert_eq!(pairs.len(), query.len());
        assert!(pairs.contains(&"returnAirportCode="));
        assert!(pairs.contains(&"tripType=roundtrip"));

        let url = query.search_url("https://example.test/select.html");
        assert!(url.starts_with("https://example.test/select.html?"));
        assert!(url.ends_with(&qs));
    }

    #[test]
    fn builds_do_not_leak_into_each_other() {
        let defaults = ProviderDefaults::default();
        let round = CanonicalQuery::build(&request(TripType::RoundTrip), &defaults);
        let one = CanonicalQuery::build(&request(TripType::OneWay), &defaults);
        assert_eq!(round.get("returnDate"), Some("2030-07-19"));
        assert_eq!(one.get("returnDate"), Some(""));
        assert_eq!(defaults, ProviderDefaults::default());
    }

    #[test]
    fn defaults_can_be_overridden() {
        let defaults = ProviderDefaults::default()
            .fare_type("POINTS")
            .promo_code("SPRING")
            .integration_tag("HOMEQBOMAIR_V2")
            .senior_passengers_count(1);
        let query = CanonicalQuery::build(&request(TripType::OneWay), &defaults);
        assert_eq!(query.get("fareType"), Some("POINTS"));
        assert_eq!(query.get("promoCode"), Some("SPRING"));
        assert_eq!(query.get("int"), Some("HOMEQBOMAIR_V2"));
        assert_eq!(query.get("seniorPassengersCount"), Some("1"));
    }
}
