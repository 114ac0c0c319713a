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

//! End-to-end fare searches against static booking pages.
//!
//! Run with:
//!     cargo test --test t_fares_search_snapshot


use std::time::Duration;

use async_trait::async_trait;
use delulu_fare_scraper::{
    FareScraper, Locator, Navigator, NavigatorError, PageLayout, PageState, PageStateClassifier,
    ScrapeError, ScraperConfig, SearchParams, SnapshotNavigator,
};
use fares_fixtures::*;

fn scraper(html: String) -> FareScraper<SnapshotNavigator> {
    FareScraper::new(SnapshotNavigator::from_html(html), ScraperConfig::default())
}

fn round_trip() -> SearchParams {
    SearchParams::builder("den", "mdw", future_date(30))
        .return_date(future_date(33))
        .build()
}

fn one_way() -> SearchParams {
    SearchParams::builder("MDW", "MCO", future_date(30))
        .trip_type("oneway")
        .depart_time_of_day("morning")
        .adults(2)
        .build()
}

#[tokio::test]
async fn round_trip_with_one_row_per_direction() {
    let outbound = price_matrix(&[flight_row(
        "1234",
        "6:05AM",
        "9:40AM",
        "2h 15m",
        ["$123 per person", "$301", "$345"],
    )]);
    let inbound = price_matrix(&[flight_row(
        "4321",
        "10:30PM",
        "12:05AM Next Day",
        "1h 35m 1",
        ["Sold out", "$289", "Unavailable"],
    )]);
    let scraper = scraper(results_page(&[outbound, inbound]));

    let result = scraper.search(&round_trip()).await.expect("search succeeds");

    assert_eq!(result.len(), 2);
    assert_eq!(result.outbound().len(), 1);
    assert_eq!(result.inbound().map(<[_]>::len), Some(1));

    let out = &result.outbound()[0];
    assert_eq!(out.flight, "1234");
    assert_eq!(out.origination, "6:05AM");
    assert_eq!(out.destination, "9:40AM");
    assert_eq!(out.duration, 2.25);
    assert_eq!(out.stops, 0);
    assert_eq!(out.fare, Some(123));
    assert_eq!(out.fare_anytime, Some(301));
    assert_eq!(out.fare_business_select, Some(345));

    let back = &result.inbound().unwrap()[0];
    assert_eq!(back.flight, "4321");
    assert_eq!(back.destination, "12:05AM");
    assert_eq!(back.duration, 1.58);
    assert_eq!(back.stops, 1);
    assert_eq!(back.fare, None);
    assert_eq!(back.fare_anytime, Some(289));
    assert_eq!(back.fare_business_select, None);
}

#[tokio::test]
async fn navigates_to_the_canonical_query() {
    let matrix = price_matrix(&[flight_row("1", "6:00AM", "8:00AM", "2h 0m", ["$1", "$2", "$3"])]);
    let scraper = scraper(results_page(&[matrix.clone(), matrix]));

    scraper.search(&round_trip()).await.expect("search succeeds");

    let urls = scraper.navigator().visited_urls();
    assert_eq!(urls.len(), 1);
    let url = &urls[0];
    assert!(url.starts_with("https://www.southwest.com/air/booking/select.html?"));
    assert!(url.contains("originationAirportCode=DEN"));
    assert!(url.contains("destinationAirportCode=MDW"));
    assert!(url.contains(&format!("returnDate={}", future_date(33))));
    assert!(url.contains("tripType=roundtrip"));
    assert!(url.contains("fareType=USD"));
}

#[tokio::test]
async fn one_way_reads_a_single_matrix() {
    let rows = vec![
        flight_row("12 34", "6:05AM", "9:40AM", "2h 35m", ["$99", "$250", "$280"]),
        flight_row("567", "1:15PM", "7:55PM", "5h 40m 2", ["$79", "Sold out", "$310"]),
    ];
    let scraper = scraper(results_page(&[price_matrix(&rows)]));

    let result = scraper.search(&one_way()).await.expect("search succeeds");

    assert_eq!(result.len(), 1);
    assert!(result.inbound().is_none());
    let flights = result.outbound();
    assert_eq!(flights.len(), 2);
    assert_eq!(flights[0].flight, "1234");
    assert_eq!(flights[0].duration, 2.58);
    assert_eq!(flights[1].stops, 2);
    assert_eq!(flights[1].fare_anytime, None);

    let url = &scraper.navigator().visited_urls()[0];
    assert!(url.contains("returnDate=&") || url.ends_with("returnDate="));
    assert!(url.contains("departureTimeOfDay=BEFORE_NOON"));
    assert!(url.contains("adultPassengersCount=2"));
}

#[tokio::test]
async fn empty_matrix_yields_empty_direction() {
    let scraper = scraper(results_page(&[price_matrix(&[])]));
    let result = scraper.search(&one_way()).await.expect("search succeeds");
    assert_eq!(result.len(), 1);
    assert!(result.outbound().is_empty());
}

#[tokio::test]
async fn error_list_means_routes_not_open() {
    let scraper = scraper(routes_not_open_page());
    let err = scraper.search(&round_trip()).await.unwrap_err();
    assert!(matches!(err, ScrapeError::RoutesNotOpen), "got {err:?}");
    assert!(err.is_transient());
}

#[tokio::test]
async fn reentry_form_means_remote_rejection() {
    let scraper = scraper(reentry_form_page());
    let err = scraper.search(&one_way()).await.unwrap_err();
    assert!(matches!(err, ScrapeError::RemoteRejection), "got {err:?}");
}

#[tokio::test]
async fn nothing_resolving_is_a_timeout_and_still_dumps() {
    let dir = temp_dump_dir("timeout");
    let config = ScraperConfig {
        dump_dir: dir.clone(),
        ..ScraperConfig::default()
    };
    let scraper = FareScraper::new(SnapshotNavigator::from_html(loading_page()), config);
    let params = SearchParams::builder("MDW", "MCO", future_date(30))
        .trip_type("oneway")
        .debug_dump(true)
        .build();

    let err = scraper.search(&params).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Timeout { seconds: 20 }), "got {err:?}");
    let dumps = dump_files(&dir);
    assert_eq!(dumps.len(), 1, "dump files: {dumps:?}");
    let content = std::fs::read_to_string(dir.join(&dumps[0])).unwrap();
    assert!(content.contains("Loading results"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn unwritable_dump_dir_does_not_mask_the_result() {
    let config = ScraperConfig {
        dump_dir: std::env::temp_dir().join("delulu-fares-missing").join("nested"),
        ..ScraperConfig::default()
    };
    let matrix = price_matrix(&[flight_row("9", "6:00AM", "8:00AM", "2h 0m", ["$1", "$2", "$3"])]);
    let scraper = FareScraper::new(SnapshotNavigator::from_html(results_page(&[matrix])), config);
    let params = SearchParams::builder("MDW", "MCO", future_date(30))
        .trip_type("oneway")
        .debug_dump(true)
        .build();

    let result = scraper.search(&params).await.expect("dump failure is not fatal");
    assert_eq!(result.outbound().len(), 1);
}

#[tokio::test]
async fn round_trip_with_one_matrix_is_structural() {
    let matrix = price_matrix(&[flight_row("1", "6:00AM", "8:00AM", "2h 0m", ["$1", "$2", "$3"])]);
    // Only product-1 is needed for the wait to resolve.
    let html = results_page(&[String::new(), matrix]);
    let scraper = scraper(html);

    let err = scraper.search(&round_trip()).await.unwrap_err();
    assert!(
        matches!(err, ScrapeError::Structural { expected: 2, found: 1 }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn malformed_row_is_a_general_failure() {
    let matrix = price_matrix(&[flight_row("1", "6:00AM", "8:00AM", "soon", ["$1", "$2", "$3"])]);
    let scraper = scraper(results_page(&[matrix]));
    let err = scraper.search(&one_way()).await.unwrap_err();
    assert!(matches!(err, ScrapeError::General { .. }), "got {err:?}");
}

#[tokio::test]
async fn broken_results_selector_is_a_general_failure() {
    let layout = PageLayout::from_json(r#"{"one_way_results": "div["}"#).unwrap();
    let config = ScraperConfig {
        layout,
        ..ScraperConfig::default()
    };
    let scraper = FareScraper::new(SnapshotNavigator::from_html(results_page(&[])), config);

    let err = scraper.search(&one_way()).await.unwrap_err();

    match err {
        ScrapeError::General { kind, details } => {
            assert_eq!(kind, "NavigatorError");
            assert!(details.contains("InvalidSelector"), "details: {details}");
            assert!(details.contains("div["), "details: {details}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(scraper.navigator().visited_urls().len(), 1);
}

#[derive(Debug)]
#[allow(dead_code)]
struct SessionLost(&'static str);

/// A browser whose page load always fails but can still serialize its page.
struct DroppedSession;

#[async_trait(?Send)]
impl Navigator for DroppedSession {
    type Element = ();

    async fn navigate(&self, _url: &str) -> Result<(), NavigatorError> {
        Err(NavigatorError::driver(SessionLost("browser closed")))
    }

    async fn wait_for_any(&self, _: &[String], _: Duration) -> Result<(), NavigatorError> {
        panic!("no wait after a failed page load");
    }

    async fn find_first(&self, _: Option<&()>, locator: &Locator) -> Result<(), NavigatorError> {
        Err(NavigatorError::NotFound(locator.to_string()))
    }

    async fn find_all(&self, _: Option<&()>, _: &Locator) -> Result<Vec<()>, NavigatorError> {
        Ok(Vec::new())
    }

    async fn attribute(&self, _: &(), _: &str) -> Result<Option<String>, NavigatorError> {
        Ok(None)
    }

    async fn text(&self, _: &()) -> Result<String, NavigatorError> {
        Ok(String::new())
    }

    async fn page_source(&self) -> Result<String, NavigatorError> {
        Ok("<html><body>Session lost</body></html>".to_string())
    }
}

#[tokio::test]
async fn failed_page_load_names_the_driver_error_and_still_dumps() {
    let dir = temp_dump_dir("dropped");
    let config = ScraperConfig {
        dump_dir: dir.clone(),
        ..ScraperConfig::default()
    };
    let scraper = FareScraper::new(DroppedSession, config);
    assert_eq!(scraper.config().dump_dir, dir);
    let params = SearchParams::builder("MDW", "MCO", future_date(30))
        .trip_type("oneway")
        .debug_dump(true)
        .build();

    let err = scraper.search(&params).await.unwrap_err();

    match err {
        ScrapeError::General { kind, details } => {
            assert_eq!(kind, "SessionLost");
            assert!(details.contains("browser closed"), "details: {details}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let dumps = dump_files(&dir);
    assert_eq!(dumps.len(), 1, "dump files: {dumps:?}");
    let content = std::fs::read_to_string(dir.join(&dumps[0])).unwrap();
    assert!(content.contains("Session lost"));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn validation_fails_before_navigation() {
    let scraper = scraper(results_page(&[]));

    let bad_code = SearchParams::builder("MD1", "MCO", future_date(30)).build();
    let err = scraper.search(&bad_code).await.unwrap_err();
    assert!(matches!(err, ScrapeError::Validation(_)));

    let past = SearchParams::builder("MDW", "MCO", "2000-01-01").build();
    let err = scraper.search(&past).await.unwrap_err();
    assert!(matches!(err, ScrapeError::PastDate { .. }));
    assert!(err.stop_polling());

    let crowd = SearchParams::builder("MDW", "MCO", future_date(30))
        .trip_type("oneway")
        .adults(9)
        .build();
    assert!(matches!(
        scraper.search(&crowd).await,
        Err(ScrapeError::Validation(_))
    ));

    assert!(scraper.navigator().visited_urls().is_empty());
}

struct ResultsAlways;

impl PageStateClassifier for ResultsAlways {
    fn classify(&self, _class_attribute: &str, _layout: &PageLayout) -> PageState {
        PageState::Results
    }
}

#[tokio::test]
async fn classifier_is_injectable() {
    let matrix = price_matrix(&[flight_row("77", "6:00AM", "8:00AM", "2h 0m", ["$1", "$2", "$3"])]);
    let html = results_page(&[matrix]).replace(
        "<div id=\"swa-content\">",
        "<div id=\"swa-content\"><div class=\"page-error--list\">Heads up: bag fees changed</div>",
    );

    let default = scraper(html.clone());
    assert!(matches!(
        default.search(&one_way()).await,
        Err(ScrapeError::RoutesNotOpen)
    ));

    let lenient = scraper(html).with_classifier(ResultsAlways);
    let result = lenient.search(&one_way()).await.expect("search succeeds");
    assert_eq!(result.outbound()[0].flight, "77");
}

#[tokio::test]
async fn layout_overrides_drive_extraction() {
    let matrix = price_matrix(&[flight_row("5", "6:00AM", "8:00AM", "2h 0m", ["$1", "$2", "$3"])])
        .replace("air-booking-select-price-matrix", "fare-matrix");
    let layout = PageLayout::from_json(r#"{"price_matrix_class": "fare-matrix"}"#).unwrap();
    let config = ScraperConfig {
        layout,
        ..ScraperConfig::default()
    };
    let scraper = FareScraper::new(SnapshotNavigator::from_html(results_page(&[matrix])), config);

    let result = scraper.search(&one_way()).await.expect("search succeeds");
    assert_eq!(result.outbound()[0].flight, "5");
}

#[tokio::test]
async fn results_serialize_to_json() {
    let matrix = price_matrix(&[flight_row("8", "6:00AM", "8:00AM", "2h 0m", ["Sold out", "$2", "$3"])]);
    let scraper = scraper(results_page(&[matrix]));
    let result = scraper.search(&one_way()).await.expect("search succeeds");

    let json = serde_json::to_value(&result).unwrap();
    let flight = &json["segments"][0][0];
    assert_eq!(flight["flight"], "8");
    assert_eq!(flight["fare"], serde_json::Value::Null);
    assert_eq!(flight["fare_anytime"], 2);
    assert_eq!(flight["duration"], 2.0);
}
