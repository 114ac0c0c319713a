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

//! # WebDriver Navigator
//!
//! `Navigator` backed by a live thirtyfour WebDriver session
//! (geckodriver or chromedriver listening on a local port).

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thirtyfour::error::WebDriverErrorInner;
use thirtyfour::prelude::*;

use crate::navigator::{Locator, Navigator, NavigatorError};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub struct WebDriverNavigator {
    driver: WebDriver,
    poll_interval: Duration,
}

impl WebDriverNavigator {
    pub fn new(driver: WebDriver) -> Self {
        Self {
            driver,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Start a Firefox session on the WebDriver server at `server_url`.
    pub async fn connect(server_url: &str, headless: bool) -> Result<Self> {
        let mut caps = DesiredCapabilities::firefox();
        if headless {
            caps.set_headless().context("Failed to request headless mode")?;
        }
        let driver = WebDriver::new(server_url, caps)
            .await
            .with_context(|| format!("WebDriver session at {} failed", server_url))?;
        Ok(Self::new(driver))
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await.context("WebDriver quit failed")
    }
}

/// The query reports an exhausted wait as `NoSuchElement`.
fn wait_error(err: WebDriverError, selectors: &[String], timeout: Duration) -> NavigatorError {
    if matches!(err.as_inner(), WebDriverErrorInner::NoSuchElement(_)) {
        NavigatorError::Timeout {
            selectors: selectors.to_vec(),
            timeout,
        }
    } else {
        NavigatorError::driver(err)
    }
}

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::ClassName(class) => By::ClassName(class.clone()),
        Locator::Css(css) => By::Css(css.clone()),
    }
}

#[async_trait(?Send)]
impl Navigator for WebDriverNavigator {
    type Element = WebElement;

    async fn navigate(&self, url: &str) -> Result<(), NavigatorError> {
        self.driver.goto(url).await.map_err(NavigatorError::driver)
    }

    async fn wait_for_any(
        &self,
        selectors: &[String],
        timeout: Duration,
    ) -> Result<WebElement, NavigatorError> {
        let (first, rest) = selectors
            .split_first()
            .ok_or_else(|| NavigatorError::InvalidSelector {
                selector: String::new(),
                reason: "no selectors to wait for".to_string(),
            })?;
        let query = rest
            .iter()
            .fold(self.driver.query(By::Css(first.clone())), |query, css| {
                query.or(By::Css(css.clone()))
            });
        query
            .wait(timeout, self.poll_interval)
            .and_clickable()
            .first()
            .await
            .map_err(|e| wait_error(e, selectors, timeout))
    }

    async fn find_first(
        &self,
        scope: Option<&WebElement>,
        locator: &Locator,
    ) -> Result<WebElement, NavigatorError> {
        let found = match scope {
            Some(element) => element.find(to_by(locator)).await,
            None => self.driver.find(to_by(locator)).await,
        };
        found.map_err(NavigatorError::driver)
    }

    async fn find_all(
        &self,
        scope: Option<&WebElement>,
        locator: &Locator,
    ) -> Result<Vec<WebElement>, NavigatorError> {
        let found = match scope {
            Some(element) => element.find_all(to_by(locator)).await,
            None => self.driver.find_all(to_by(locator)).await,
        };
        found.map_err(NavigatorError::driver)
    }

    async fn attribute(
        &self,
        element: &WebElement,
        name: &str,
    ) -> Result<Option<String>, NavigatorError> {
        element.attr(name).await.map_err(NavigatorError::driver)
    }

    async fn text(&self, element: &WebElement) -> Result<String, NavigatorError> {
        element.text().await.map_err(NavigatorError::driver)
    }

    async fn page_source(&self) -> Result<String, NavigatorError> {
        self.driver.source().await.map_err(NavigatorError::driver)
    }
}
