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

//! # Scrape Errors
//!
//! Every failure a fare search can surface to its caller.

use thiserror::Error;

use crate::navigator::NavigatorError;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Malformed or out-of-range input field. Fixable by the caller.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The date is today or earlier. Watching this flight is over.
    #[error("'{date}' invalid - scraping can only be done until the day before the flight")]
    PastDate { date: String },

    #[error("timeout after {seconds} seconds waiting for the search result page")]
    Timeout { seconds: u64 },

    /// Inventory for the requested dates is most likely not published yet.
    /// Inferred from the generic error list marker, see `ErrorMarkerClassifier`.
    #[error("routes for the requested dates do not appear to be open yet")]
    RoutesNotOpen,

    /// The provider bounced the search back to its input form.
    #[error("the provider asked to re-enter the search parameters")]
    RemoteRejection,

    #[error("expected {expected} price matrix block(s), found {found}: page layout changed")]
    Structural { expected: usize, found: usize },

    #[error("general scrape failure - an exception of type {kind} occurred: {details}")]
    General { kind: String, details: String },
}

impl ScrapeError {
    /// Wrap an unexpected failure, keeping its type name and debug rendering.
    pub fn general<E: std::fmt::Debug>(err: E) -> Self {
        Self::General {
            kind: short_type_name::<E>().to_string(),
            details: format!("{:?}", err),
        }
    }

    /// Failures where polling again later may yield a result.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::RoutesNotOpen)
    }

    pub fn stop_polling(&self) -> bool {
        matches!(self, Self::PastDate { .. })
    }
}

/// Driver failures keep the driver's own type name as the failure kind.
impl From<NavigatorError> for ScrapeError {
    fn from(err: NavigatorError) -> Self {
        match err {
            NavigatorError::Driver { kind, message } => Self::General {
                kind,
                details: message,
            },
            other => Self::general(other),
        }
    }
}

pub(crate) fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
