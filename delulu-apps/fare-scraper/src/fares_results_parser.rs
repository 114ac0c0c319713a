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

//! # Fares Results Parser
//!
//! Turns the price matrix blocks of a rendered booking page into flight
//! segment records. The label parsers are pure; the walkers read the DOM
//! through a `Navigator`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::{Result, ScrapeError};
use crate::fares_layout::PageLayout;
use crate::fares_validation::TripType;
use crate::navigator::{Locator, Navigator};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FlightSegmentRecord {
    pub flight: String,
    pub origination: String,
    pub destination: String,
    /// Hours, rounded to 2 decimals.
    pub duration: f64,
    pub stops: u32,
    /// `None` when unavailable or sold out.
    pub fare: Option<u32>,
    pub fare_anytime: Option<u32>,
    pub fare_business_select: Option<u32>,
}

/// One segment list per direction: `[outbound]` or `[outbound, return]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    pub segments: Vec<Vec<FlightSegmentRecord>>,
}

impl SearchResult {
    pub fn outbound(&self) -> &[FlightSegmentRecord] {
        self.segments.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn inbound(&self) -> Option<&[FlightSegmentRecord]> {
        self.segments.get(1).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// A label that does not have the shape the parsers expect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("marker '{marker}' missing in '{text}'")]
    MissingMarker { marker: &'static str, text: String },

    #[error("no {what} token in '{text}'")]
    MissingToken { what: &'static str, text: String },

    #[error("cannot read {what} from '{token}' in '{text}'")]
    BadNumber {
        what: &'static str,
        token: String,
        text: String,
    },
}

impl From<FieldError> for ScrapeError {
    fn from(err: FieldError) -> Self {
        ScrapeError::General {
            kind: "FieldError".to_string(),
            details: err.to_string(),
        }
    }
}

/// `"Flight # 1234 "` -> `"1234"`.
pub fn parse_flight_number(label: &str) -> std::result::Result<String, FieldError> {
    let after = label.split('#').nth(1).ok_or(FieldError::MissingMarker {
        marker: "#",
        text: label.to_string(),
    })?;
    Ok(after.chars().filter(|c| !c.is_whitespace()).collect())
}

/// Drops a trailing "Next Day" qualifier: `"12:05AM Next Day"` -> `"12:05AM"`.
pub fn parse_destination_time(text: &str) -> std::result::Result<String, FieldError> {
    text.split_whitespace()
        .next()
        .map(str::to_string)
        .ok_or(FieldError::MissingToken {
            what: "time",
            text: text.to_string(),
        })
}

/// Reads `"... Duration 2h 15m 1"` as `(2.25, 1)`.
///
/// Non-stop rows carry no third token, so stops default to 0.
/// The 0.001 bias keeps half values from rounding down.
pub fn parse_duration(label: &str) -> std::result::Result<(f64, u32), FieldError> {
    let (_, rest) = label.split_once("Duration").ok_or(FieldError::MissingMarker {
        marker: "Duration",
        text: label.to_string(),
    })?;
    let tokens: Vec<&str> = rest.split_whitespace().collect();

    let hours = duration_part(label, tokens.first().copied(), 'h', "hours")?;
    let minutes = duration_part(label, tokens.get(1).copied(), 'm', "minutes")?;
    let duration = round_2(hours + minutes / 60.0 + 0.001);

    let stops = match tokens.get(2) {
        None => 0,
        Some(token) => token.parse::<u32>().map_err(|_| FieldError::BadNumber {
            what: "stops",
            token: token.to_string(),
            text: label.to_string(),
        })?,
    };

    Ok((duration, stops))
}

fn duration_part(
    label: &str,
    token: Option<&str>,
    unit: char,
    what: &'static str,
) -> std::result::Result<f64, FieldError> {
    let token = token.ok_or(FieldError::MissingToken {
        what,
        text: label.to_string(),
    })?;
    let number = token.split(unit).next().unwrap_or(token);
    number.parse::<f64>().map_err(|_| FieldError::BadNumber {
        what,
        token: token.to_string(),
        text: label.to_string(),
    })
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `"$123 per person"` -> `Some(123)`; "Unavailable" / "Sold out" -> `None`.
pub fn parse_fare(text: &str) -> std::result::Result<Option<u32>, FieldError> {
    if text.contains("Unavailable") || text.contains("Sold out") {
        return Ok(None);
    }
    let after = text.split('$').nth(1).ok_or(FieldError::MissingMarker {
        marker: "$",
        text: text.to_string(),
    })?;
    let amount = after.split_whitespace().next().ok_or(FieldError::MissingToken {
        what: "fare",
        text: text.to_string(),
    })?;
    amount
        .parse::<u32>()
        .map(Some)
        .map_err(|_| FieldError::BadNumber {
            what: "fare",
            token: amount.to_string(),
            text: text.to_string(),
        })
}

/// Extract every direction of a results page.
///
/// Price matrices are looked up page-wide, as the provider renders each
/// direction in its own product block; the results container only signals
/// that rendering finished. A block count other than one per direction means
/// the layout changed or data is partial, and is not retried.
pub async fn extract_price_matrices<N: Navigator>(
    navigator: &N,
    layout: &PageLayout,
    trip_type: TripType,
) -> Result<Vec<Vec<FlightSegmentRecord>>> {
    let matrices = navigator
        .find_all(None, &layout.price_matrix())
        .await?;

    let expected = trip_type.directions();
    if matrices.len() != expected {
        return Err(ScrapeError::Structural {
            expected,
            found: matrices.len(),
        });
    }

    let mut segments = Vec::with_capacity(expected);
    for matrix in &matrices {
        segments.push(extract_flight_rows(navigator, matrix, layout).await?);
    }
    Ok(segments)
}

pub async fn extract_flight_rows<N: Navigator>(
    navigator: &N,
    matrix: &N::Element,
    layout: &PageLayout,
) -> Result<Vec<FlightSegmentRecord>> {
    let rows = navigator
        .find_all(Some(matrix), &layout.flight_row())
        .await?;

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let record = extract_flight_row(navigator, row, layout).await?;
        tracing::debug!(
            "Flight {} {} -> {} ({}h, {} stops) fares {:?}/{:?}/{:?}",
            record.flight,
            record.origination,
            record.destination,
            record.duration,
            record.stops,
            record.fare,
            record.fare_anytime,
            record.fare_business_select
        );
        records.push(record);
    }
    Ok(records)
}

async fn extract_flight_row<N: Navigator>(
    navigator: &N,
    row: &N::Element,
    layout: &PageLayout,
) -> Result<FlightSegmentRecord> {
    let class = |name: &String| Locator::ClassName(name.clone());
    let css = |selector: &String| Locator::Css(selector.clone());

    let flight_label = text_in(navigator, row, &class(&layout.flight_number_class)).await?;
    let origination = text_in(navigator, row, &css(&layout.origination_css)).await?;
    let destination = text_in(navigator, row, &css(&layout.destination_css)).await?;
    let duration_label = text_in(navigator, row, &class(&layout.duration_class)).await?;
    let fare = text_in(navigator, row, &class(&layout.fare_base_class)).await?;
    let fare_anytime = text_in(navigator, row, &class(&layout.fare_anytime_class)).await?;
    let fare_business_select =
        text_in(navigator, row, &class(&layout.fare_business_select_class)).await?;

    let (duration, stops) = parse_duration(&duration_label)?;

    Ok(FlightSegmentRecord {
        flight: parse_flight_number(&flight_label)?,
        origination,
        destination: parse_destination_time(&destination)?,
        duration,
        stops,
        fare: parse_fare(&fare)?,
        fare_anytime: parse_fare(&fare_anytime)?,
        fare_business_select: parse_fare(&fare_business_select)?,
    })
}

async fn text_in<N: Navigator>(
    navigator: &N,
    scope: &N::Element,
    locator: &Locator,
) -> Result<String> {
    let element = navigator
        .find_first(Some(scope), locator)
        .await?;
    Ok(navigator.text(&element).await?)
}
