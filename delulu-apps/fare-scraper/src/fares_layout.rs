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

//! # Booking Page Layout
//!
//! Class names and CSS selectors of the provider's result page.
//! They drift whenever the provider ships a redesign, so they live in data
//! and can be overridden from a JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::fares_validation::TripType;
use crate::navigator::Locator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PageLayout {
    /// Class marking the global error list.
    pub error_list_class: String,
    /// Class marking the form the provider shows when it wants input re-entered.
    pub form_container_class: String,
    pub one_way_results: String,
    pub round_trip_results: String,
    pub price_matrix_class: String,
    pub flight_row_class: String,
    pub flight_number_class: String,
    pub origination_css: String,
    pub destination_css: String,
    pub duration_class: String,
    /// "Wanna Get Away"
    pub fare_base_class: String,
    pub fare_anytime_class: String,
    pub fare_business_select_class: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            error_list_class: "page-error--list".to_string(),
            form_container_class: "trip--form-container".to_string(),
            one_way_results: "#air-booking-product-0".to_string(),
            round_trip_results: "#air-booking-product-1".to_string(),
            price_matrix_class: "air-booking-select-price-matrix".to_string(),
            flight_row_class: "air-booking-select-detail".to_string(),
            flight_number_class: "flight-numbers--flight-number".to_string(),
            origination_css: "div[type='origination']".to_string(),
            destination_css: "div[type='destination']".to_string(),
            duration_class: "flight-stops--duration".to_string(),
            fare_base_class: "fare-button_primary-yellow".to_string(),
            fare_anytime_class: "fare-button_secondary-light-blue".to_string(),
            fare_business_select_class: "fare-button_primary-blue".to_string(),
        }
    }
}

impl PageLayout {
    /// Missing keys keep their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid page layout JSON")
    }

    /// Selectors whose first match ends the wait after navigation.
    pub fn terminal_selectors(&self, trip_type: TripType) -> Vec<String> {
        let results = match trip_type {
            TripType::RoundTrip => &self.round_trip_results,
            TripType::OneWay => &self.one_way_results,
        };
        vec![
            format!(".{}", self.error_list_class),
            format!(".{}", self.form_container_class),
            results.clone(),
        ]
    }

    pub(crate) fn price_matrix(&self) -> Locator {
        Locator::ClassName(self.price_matrix_class.clone())
    }

    pub(crate) fn flight_row(&self) -> Locator {
        Locator::ClassName(self.flight_row_class.clone())
    }
}
