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

// Library for delulu-fare-scraper
// Fare search on booking pages that only exist as rendered HTML

mod debug_dump;
mod errors;
mod fares_layout;
mod fares_page_state;
mod fares_query_builder;
mod fares_results_parser;
mod fares_search;
mod fares_validation;
mod navigator;
mod navigator_snapshot;
#[cfg(feature = "webdriver")]
mod navigator_webdriver;

pub use debug_dump::{dump_file_name, write_page_dump};
pub use errors::{Result, ScrapeError};
pub use fares_layout::PageLayout;
pub use fares_page_state::{
    ErrorMarkerClassifier, PageOutcome, PageState, PageStateClassifier, await_page_outcome,
};
pub use fares_query_builder::{CanonicalQuery, ProviderDefaults};
pub use fares_results_parser::{
    FieldError, FlightSegmentRecord, SearchResult, extract_flight_rows, extract_price_matrices,
    parse_destination_time, parse_duration, parse_fare, parse_flight_number,
};
pub use fares_search::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, FareScraper, ScraperConfig};
pub use fares_validation::*;
pub use navigator::{Locator, Navigator, NavigatorError};
pub use navigator_snapshot::SnapshotNavigator;
#[cfg(feature = "webdriver")]
pub use navigator_webdriver::WebDriverNavigator;
