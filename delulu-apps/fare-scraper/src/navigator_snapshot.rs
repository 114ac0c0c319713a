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

//! # Snapshot Navigator
//!
//! Serves one saved page (typically a `dump-*.html` debug dump) as a static DOM.
//! Lets a dump be replayed through the extractor offline, and stands in for a
//! real browser in tests.

use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::navigator::{Locator, Navigator, NavigatorError};

pub struct SnapshotNavigator {
    document: Html,
    source: String,
    visited: RefCell<Vec<String>>,
}

impl SnapshotNavigator {
    pub fn from_html(html: impl Into<String>) -> Self {
        let source = html.into();
        Self {
            document: Html::parse_document(&source),
            source,
            visited: RefCell::new(Vec::new()),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let html = std::fs::read_to_string(path)?;
        Ok(Self::from_html(html))
    }

    /// URLs passed to `navigate`, in order.
    pub fn visited_urls(&self) -> Vec<String> {
        self.visited.borrow().clone()
    }

    fn element(&self, id: NodeId) -> Result<ElementRef<'_>, NavigatorError> {
        self.document
            .tree
            .get(id)
            .and_then(ElementRef::wrap)
            .ok_or_else(|| NavigatorError::NotFound(format!("node {:?}", id)))
    }

    fn select_ids(
        &self,
        scope: Option<&NodeId>,
        locator: &Locator,
    ) -> Result<Vec<NodeId>, NavigatorError> {
        let selector = parse_selector(&locator.as_css())?;
        let ids: Vec<NodeId> = match scope {
            Some(id) => self
                .element(*id)?
                .select(&selector)
                .map(|el| (*el).id())
                .collect(),
            None => self
                .document
                .select(&selector)
                .map(|el| (*el).id())
                .collect(),
        };
        Ok(ids)
    }
}

fn parse_selector(css: &str) -> Result<Selector, NavigatorError> {
    Selector::parse(css).map_err(|e| NavigatorError::InvalidSelector {
        selector: css.to_string(),
        reason: format!("{:?}", e),
    })
}

#[async_trait(?Send)]
impl Navigator for SnapshotNavigator {
    type Element = NodeId;

    async fn navigate(&self, url: &str) -> Result<(), NavigatorError> {
        tracing::debug!("[snapshot] navigate to {}", url);
        self.visited.borrow_mut().push(url.to_string());
        Ok(())
    }

    async fn wait_for_any(
        &self,
        selectors: &[String],
        timeout: Duration,
    ) -> Result<NodeId, NavigatorError> {
        // A static page never changes, so a miss now is a miss at the deadline.
        let selector = parse_selector(&selectors.join(", "))?;
        self.document
            .select(&selector)
            .next()
            .map(|el| (*el).id())
            .ok_or_else(|| NavigatorError::Timeout {
                selectors: selectors.to_vec(),
                timeout,
            })
    }

    async fn find_first(
        &self,
        scope: Option<&NodeId>,
        locator: &Locator,
    ) -> Result<NodeId, NavigatorError> {
        self.select_ids(scope, locator)?
            .into_iter()
            .next()
            .ok_or_else(|| NavigatorError::NotFound(locator.to_string()))
    }

    async fn find_all(
        &self,
        scope: Option<&NodeId>,
        locator: &Locator,
    ) -> Result<Vec<NodeId>, NavigatorError> {
        self.select_ids(scope, locator)
    }

    async fn attribute(
        &self,
        element: &NodeId,
        name: &str,
    ) -> Result<Option<String>, NavigatorError> {
        Ok(self
            .element(*element)?
            .value()
            .attr(name)
            .map(str::to_string))
    }

    /// Text nodes concatenated, whitespace runs collapsed to one space,
    /// roughly what a browser reports as rendered text.
    async fn text(&self, element: &NodeId) -> Result<String, NavigatorError> {
        let raw: String = self.element(*element)?.text().collect();
        Ok(raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }

    async fn page_source(&self) -> Result<String, NavigatorError> {
        Ok(self.source.clone())
    }
}
