//! Exact-name character search
//!
//! The remote search has no exact-match mode, so results are paged through
//! linearly until a candidate passes [`SearchFilter`] or the page bound is hit.

use serde_json::Value;
use tracing::{debug, info};

use super::{decode_checked, RisingStonesService};
use crate::client::{Endpoint, RawResponse};
use crate::error::{Error, Result};
use crate::models::{Region, SearchResponse, UserInfo, UserProfile};

/// Rows requested per page
pub const SEARCH_PAGE_SIZE: u32 = 60;

/// Pages read before giving up
pub const SEARCH_MAX_PAGES: u32 = 30;

/// Disambiguation for characters sharing a name across servers
///
/// The server argument doubles as a region alias: a candidate passes when its
/// group name equals the argument, or its region equals the alias target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    group_name: String,
    region: Option<Region>,
}

impl SearchFilter {
    pub fn new(server: &str) -> Self {
        let group_name = server.trim().to_string();
        let region = Region::from_alias(&group_name);
        Self { group_name, region }
    }

    pub fn is_empty(&self) -> bool {
        self.group_name.is_empty() && self.region.is_none()
    }

    pub fn matches(&self, name: &str, candidate: &UserProfile) -> bool {
        if candidate.character_name != name {
            return false;
        }
        if self.is_empty() {
            return true;
        }
        if !self.group_name.is_empty() && candidate.group_name == self.group_name {
            return true;
        }
        self.region
            .is_some_and(|region| candidate.area_name == region.as_str())
    }
}

/// Rows of a search page; `data: null` reads as an empty page
fn page_rows(data: Value) -> Result<Vec<UserProfile>> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(data).map_err(|e| Error::decode("search results", e))
}

impl RisingStonesService {
    /// Find a character by exact name, optionally narrowed by server or region alias
    pub async fn search_user(&self, name: &str, server: &str) -> Result<UserInfo> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }

        let filter = SearchFilter::new(server);
        info!(name, server, region = ?filter.region, "Searching user");

        for page in 1..=SEARCH_MAX_PAGES {
            let query = [
                ("type", "6".to_string()),
                ("orderBy", "comment".to_string()),
                ("keywords", name.to_string()),
                ("limit", SEARCH_PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ];

            let response = self
                .client
                .get(Endpoint::Search, &query)
                .await
                .and_then(RawResponse::error_for_status)
                .map_err(|e| Error::fetch(format!("searching page {page}"), e))?;

            let envelope: SearchResponse = decode_checked("search page", &response.body)
                .map_err(|e| Error::fetch(format!("searching page {page}"), e))?;
            let rows = page_rows(envelope.data)
                .map_err(|e| Error::fetch(format!("searching page {page}"), e))?;

            if rows.is_empty() {
                debug!(page, "Empty search page, stopping");
                break;
            }

            debug!(page, rows = rows.len(), "Search page received");

            if let Some(hit) = rows.into_iter().find(|row| filter.matches(name, row)) {
                info!(name, page, uuid = %hit.uuid, "User found");
                return Ok(hit.into());
            }
        }

        Err(Error::NotFound(format!("user {name} was not found")))
    }
}
