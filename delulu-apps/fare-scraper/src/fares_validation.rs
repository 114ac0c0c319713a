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

//! # Fares Search Validation
//!
//! Side-effect free checks turning raw user input into a canonical `SearchRequest`.
//! Everything here fails fast, before any page is loaded.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ScrapeError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const MAX_PASSENGERS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    OneWay,
    RoundTrip,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::OneWay => "oneway",
            TripType::RoundTrip => "roundtrip",
        }
    }

    /// Number of price matrix blocks the results page shows for this trip.
    pub fn directions(&self) -> usize {
        match self {
            TripType::OneWay => 1,
            TripType::RoundTrip => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeOfDay {
    AllDay,
    BeforeNoon,
    NoonToSix,
    AfterSix,
}

impl TimeOfDay {
    const CANONICAL: [TimeOfDay; 4] = [
        TimeOfDay::AllDay,
        TimeOfDay::BeforeNoon,
        TimeOfDay::NoonToSix,
        TimeOfDay::AfterSix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::AllDay => "ALL_DAY",
            TimeOfDay::BeforeNoon => "BEFORE_NOON",
            TimeOfDay::NoonToSix => "NOON_TO_SIX",
            TimeOfDay::AfterSix => "AFTER_SIX",
        }
    }
}

pub fn validate_airport_code(code: &str) -> Result<String> {
    if !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ScrapeError::Validation(format!(
            "airport code '{}' contains non-alphabetic characters",
            code
        )));
    }
    if code.len() != 3 {
        return Err(ScrapeError::Validation(format!(
            "airport code '{}' must be exactly 3 characters",
            code
        )));
    }
    Ok(code.to_ascii_uppercase())
}

pub fn validate_trip_type(trip_type: &str) -> Result<TripType> {
    match trip_type {
        "oneway" => Ok(TripType::OneWay),
        "roundtrip" => Ok(TripType::RoundTrip),
        _ => Err(ScrapeError::Validation(format!(
            "trip type '{}' not valid, must be 'roundtrip' or 'oneway'",
            trip_type
        ))),
    }
}

pub fn validate_date(date: &str) -> Result<String> {
    validate_date_against(date, Local::now().date_naive())
}

/// Same-day dates are rejected: once the flight date arrives there is nothing
/// left to watch for.
pub fn validate_date_against(date: &str, today: NaiveDate) -> Result<String> {
    let parsed = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| {
        ScrapeError::Validation(format!("date '{}' not in the format YYYY-MM-DD or invalid", date))
    })?;
    if parsed <= today {
        return Err(ScrapeError::PastDate {
            date: date.to_string(),
        });
    }
    Ok(date.to_string())
}

/// Accepts the canonical tokens (case-sensitive) or the lowercase synonyms
/// `anytime`, `morning`, `afternoon`, `evening`.
///
/// Canonical tokens are matched by containment, so `"xBEFORE_NOON"` is accepted
/// as `BEFORE_NOON`. Callers have relied on this looseness.
pub fn validate_time_of_day(value: &str) -> Result<TimeOfDay> {
    if let Some(canonical) = TimeOfDay::CANONICAL
        .iter()
        .find(|t| value.contains(t.as_str()))
    {
        return Ok(*canonical);
    }
    match value {
        "anytime" => Ok(TimeOfDay::AllDay),
        "morning" => Ok(TimeOfDay::BeforeNoon),
        "afternoon" => Ok(TimeOfDay::NoonToSix),
        "evening" => Ok(TimeOfDay::AfterSix),
        _ => Err(ScrapeError::Validation(format!(
            "time of day '{}' invalid",
            value
        ))),
    }
}

pub fn validate_passengers_count(count: u32) -> Result<u32> {
    if (1..=MAX_PASSENGERS).contains(&count) {
        Ok(count)
    } else {
        Err(ScrapeError::Validation(format!(
            "passengers count '{}' must be 1 through {}",
            count, MAX_PASSENGERS
        )))
    }
}

/// A search that passed validation. Return fields are `Some` only for round trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub from_airport: String,
    pub to_airport: String,
    pub depart_date: String,
    pub return_date: Option<String>,
    pub trip_type: TripType,
    pub depart_time_of_day: TimeOfDay,
    pub return_time_of_day: Option<TimeOfDay>,
    pub adults: u32,
}

/// Raw search input as supplied by the caller.
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub from_airport: String,
    pub to_airport: String,
    pub depart_date: String,
    pub return_date: Option<String>,
    pub trip_type: String,
    pub depart_time_of_day: String,
    pub return_time_of_day: String,
    pub adults: u32,
    pub debug_dump: bool,
}

impl SearchParams {
    pub fn builder(
        from_airport: impl Into<String>,
        to_airport: impl Into<String>,
        depart_date: impl Into<String>,
    ) -> SearchParamsBuilder {
        SearchParamsBuilder {
            params: SearchParams {
                from_airport: from_airport.into(),
                to_airport: to_airport.into(),
                depart_date: depart_date.into(),
                return_date: None,
                trip_type: TripType::RoundTrip.as_str().to_string(),
                depart_time_of_day: TimeOfDay::AllDay.as_str().to_string(),
                return_time_of_day: TimeOfDay::AllDay.as_str().to_string(),
                adults: 1,
                debug_dump: false,
            },
        }
    }

    pub fn validate(&self) -> Result<SearchRequest> {
        let from_airport = validate_airport_code(&self.from_airport)?;
        let to_airport = validate_airport_code(&self.to_airport)?;
        let trip_type = validate_trip_type(&self.trip_type)?;
        let depart_date = validate_date(&self.depart_date)?;
        let depart_time_of_day = validate_time_of_day(&self.depart_time_of_day)?;
        let adults = validate_passengers_count(self.adults)?;

        let (return_date, return_time_of_day) = match trip_type {
            TripType::RoundTrip => {
                let raw = self.return_date.as_deref().unwrap_or_default();
                (
                    Some(validate_date(raw)?),
                    Some(validate_time_of_day(&self.return_time_of_day)?),
                )
            }
            TripType::OneWay => (None, None),
        };

        Ok(SearchRequest {
            from_airport,
            to_airport,
            depart_date,
            return_date,
            trip_type,
            depart_time_of_day,
            return_time_of_day,
            adults,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SearchParamsBuilder {
    params: SearchParams,
}

impl SearchParamsBuilder {
    pub fn return_date(mut self, return_date: impl Into<String>) -> Self {
        self.params.return_date = Some(return_date.into());
        self
    }

    pub fn trip_type(mut self, trip_type: impl Into<String>) -> Self {
        self.params.trip_type = trip_type.into();
        self
    }

    pub fn depart_time_of_day(mut self, window: impl Into<String>) -> Self {
        self.params.depart_time_of_day = window.into();
        self
    }

    pub fn return_time_of_day(mut self, window: impl Into<String>) -> Self {
        self.params.return_time_of_day = window.into();
        self
    }

    pub fn adults(mut self, adults: u32) -> Self {
        self.params.adults = adults;
        self
    }

    pub fn debug_dump(mut self, enabled: bool) -> Self {
        self.params.debug_dump = enabled;
        self
    }

    pub fn build(self) -> SearchParams {
        self.params
    }
}
