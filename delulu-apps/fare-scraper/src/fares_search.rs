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

//! # Fare Search Client
//!
//! Effectful (browser, time, filesystem) side of a fare search:
//! validate, build the query, load the page, classify it, extract.
//! One call is one page load; nothing is retried and nothing is kept between calls.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::debug_dump::write_page_dump;
use crate::errors::{Result, ScrapeError};
use crate::fares_layout::PageLayout;
use crate::fares_page_state::{
    ErrorMarkerClassifier, PageOutcome, PageStateClassifier, await_page_outcome,
};
use crate::fares_query_builder::{CanonicalQuery, ProviderDefaults};
use crate::fares_results_parser::{SearchResult, extract_price_matrices};
use crate::fares_validation::{SearchParams, TripType};
use crate::navigator::Navigator;

pub const DEFAULT_BASE_URL: &str = "https://www.southwest.com/air/booking/select.html";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    /// Bound on the single wait after navigation.
    pub timeout: Duration,
    pub layout: PageLayout,
    pub defaults: ProviderDefaults,
    /// Where `dump-*.html` files go when a search asks for a debug dump.
    pub dump_dir: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            layout: PageLayout::default(),
            defaults: ProviderDefaults::default(),
            dump_dir: PathBuf::from("."),
        }
    }
}

pub struct FareScraper<N, C = ErrorMarkerClassifier> {
    navigator: N,
    classifier: C,
    config: ScraperConfig,
}

impl<N: Navigator> FareScraper<N> {
    pub fn new(navigator: N, config: ScraperConfig) -> Self {
        Self {
            navigator,
            classifier: ErrorMarkerClassifier,
            config,
        }
    }
}

impl<N: Navigator, C: PageStateClassifier> FareScraper<N, C> {
    /// Swap the page state heuristic without touching the search flow.
    pub fn with_classifier<D: PageStateClassifier>(self, classifier: D) -> FareScraper<N, D> {
        FareScraper {
            navigator: self.navigator,
            classifier,
            config: self.config,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn into_navigator(self) -> N {
        self.navigator
    }

    pub async fn search(&self, params: &SearchParams) -> Result<SearchResult> {
        let overall_start = Instant::now();
        let request = params.validate()?;

        let query = CanonicalQuery::build(&request, &self.config.defaults);
        let url = query.search_url(&self.config.base_url);
        tracing::info!("🔗 Search URL: {}", url);

        let load_start = Instant::now();
        let outcome = self.load_and_classify(&url, request.trip_type).await;
        tracing::info!("Page settled in {:?}", load_start.elapsed());

        if params.debug_dump {
            self.dump_page().await;
        }

        match outcome? {
            PageOutcome::Success(_) => {}
            PageOutcome::ValidationRejected => return Err(ScrapeError::RemoteRejection),
            PageOutcome::RoutesNotOpen => return Err(ScrapeError::RoutesNotOpen),
            PageOutcome::Timeout => {
                return Err(ScrapeError::Timeout {
                    seconds: self.config.timeout.as_secs(),
                });
            }
        }

        let parse_start = Instant::now();
        let segments =
            extract_price_matrices(&self.navigator, &self.config.layout, request.trip_type)
                .await?;
        tracing::debug!(
            "Extracted {:?} flights per direction in {:?}",
            segments.iter().map(Vec::len).collect::<Vec<_>>(),
            parse_start.elapsed()
        );
        tracing::info!("Total search time: {:?}", overall_start.elapsed());

        Ok(SearchResult { segments })
    }

    async fn load_and_classify(
        &self,
        url: &str,
        trip_type: TripType,
    ) -> Result<PageOutcome<N::Element>> {
        self.navigator
            .navigate(url)
            .await?;
        await_page_outcome(
            &self.navigator,
            &self.classifier,
            &self.config.layout,
            trip_type,
            self.config.timeout,
        )
        .await
    }

    /// Best effort: a failed dump is logged and never replaces the search outcome.
    async fn dump_page(&self) {
        let markup = match self.navigator.page_source().await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Could not read page source for debug dump: {}", e);
                return;
            }
        };
        match write_page_dump(&self.config.dump_dir, &markup, Local::now()) {
            Ok(path) => tracing::info!("Saved page dump to {}", path.display()),
            Err(e) => tracing::warn!(
                "Could not write debug dump to {}: {}",
                self.config.dump_dir.display(),
                e
            ),
        }
    }
}
