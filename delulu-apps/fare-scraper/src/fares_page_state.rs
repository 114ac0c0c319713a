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

//! # Fares Page State
//!
//! Decides how a booking page load ended: results, a rejected form,
//! routes that are not open yet, or nothing at all within the timeout.

use std::time::Duration;

use crate::errors::Result;
use crate::fares_layout::PageLayout;
use crate::fares_validation::TripType;
use crate::navigator::{Navigator, NavigatorError};

/// Exactly one of these is produced per search attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome<E> {
    /// Carries the resolved results container.
    Success(E),
    ValidationRejected,
    RoutesNotOpen,
    Timeout,
}

/// What the element that ended the wait says about the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    RoutesNotOpen,
    ValidationRejected,
    Results,
}

/// Maps the class attribute of the resolved terminal element to a page state.
pub trait PageStateClassifier {
    fn classify(&self, class_attribute: &str, layout: &PageLayout) -> PageState;
}

/// Default classifier.
///
/// Heuristic: the provider used to tag unscheduled routes with a dedicated
/// `error-no-routes-exist` class. That marker is gone, so any global error
/// list is read as "routes not open yet". Other provider errors land here too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorMarkerClassifier;

impl PageStateClassifier for ErrorMarkerClassifier {
    fn classify(&self, class_attribute: &str, layout: &PageLayout) -> PageState {
        if class_attribute.contains(&layout.error_list_class) {
            PageState::RoutesNotOpen
        } else if class_attribute.contains(&layout.form_container_class) {
            PageState::ValidationRejected
        } else {
            PageState::Results
        }
    }
}

/// Wait for the first terminal selector and classify what resolved.
pub async fn await_page_outcome<N, C>(
    navigator: &N,
    classifier: &C,
    layout: &PageLayout,
    trip_type: TripType,
    timeout: Duration,
) -> Result<PageOutcome<N::Element>>
where
    N: Navigator,
    C: PageStateClassifier,
{
    let selectors = layout.terminal_selectors(trip_type);
    tracing::debug!("Waiting up to {:?} for any of {:?}", timeout, selectors);

    let element = match navigator.wait_for_any(&selectors, timeout).await {
        Ok(element) => element,
        Err(NavigatorError::Timeout { .. }) => return Ok(PageOutcome::Timeout),
        Err(e) => return Err(e.into()),
    };

    let class_attribute = navigator
        .attribute(&element, "class")
        .await?
        .unwrap_or_default();

    let outcome = match classifier.classify(&class_attribute, layout) {
        PageState::RoutesNotOpen => {
            tracing::warn!(
                "Error list shown (class='{}'); assuming routes are not open yet",
                class_attribute
            );
            PageOutcome::RoutesNotOpen
        }
        PageState::ValidationRejected => {
            tracing::warn!("Booking page asked to re-enter the search parameters");
            PageOutcome::ValidationRejected
        }
        PageState::Results => PageOutcome::Success(element),
    };
    Ok(outcome)
}
