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

//! # Navigator
//!
//! The browser capability the fare scraper drives. The scraper never owns a
//! browser itself: it is handed something that can load a page, wait for
//! markers, and read text back out of the DOM.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::errors::short_type_name;

/// How to locate an element, scoped to a node or to the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    ClassName(String),
    Css(String),
}

impl Locator {
    pub fn as_css(&self) -> String {
        match self {
            Locator::ClassName(class) => format!(".{}", class),
            Locator::Css(css) => css.clone(),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_css())
    }
}

#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("no element matching {selectors:?} became interactable within {timeout:?}")]
    Timeout {
        selectors: Vec<String>,
        timeout: Duration,
    },

    #[error("no element matching '{0}'")]
    NotFound(String),

    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("{kind}: {message}")]
    Driver { kind: String, message: String },
}

impl NavigatorError {
    pub fn driver<E: std::fmt::Debug>(err: E) -> Self {
        Self::Driver {
            kind: short_type_name::<E>().to_string(),
            message: format!("{:?}", err),
        }
    }
}

/// One browser session. Not shared between concurrent searches, hence `?Send`.
#[async_trait(?Send)]
pub trait Navigator {
    type Element: Clone;

    async fn navigate(&self, url: &str) -> Result<(), NavigatorError>;

    /// Block up to `timeout` until any element matching one of `selectors`
    /// is interactable, and return the first one.
    async fn wait_for_any(
        &self,
        selectors: &[String],
        timeout: Duration,
    ) -> Result<Self::Element, NavigatorError>;

    async fn find_first(
        &self,
        scope: Option<&Self::Element>,
        locator: &Locator,
    ) -> Result<Self::Element, NavigatorError>;

    async fn find_all(
        &self,
        scope: Option<&Self::Element>,
        locator: &Locator,
    ) -> Result<Vec<Self::Element>, NavigatorError>;

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, NavigatorError>;

    async fn text(&self, element: &Self::Element) -> Result<String, NavigatorError>;

    /// Full serialized markup, for debug dumps.
    async fn page_source(&self) -> Result<String, NavigatorError>;
}
