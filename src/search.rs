use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::types::{SearchResults, UserSummary};

pub const DEFAULT_PER_PAGE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    User,
    Org,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::User => write!(f, "user"),
            AccountType::Org => write!(f, "org"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    Followers,
    Repositories,
    Joined,
}

impl fmt::Display for SearchSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchSort::Followers => write!(f, "followers"),
            SearchSort::Repositories => write!(f, "repositories"),
            SearchSort::Joined => write!(f, "joined"),
        }
    }
}

/// GitHub search qualifiers appended to the free-text term.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub location: Option<String>,
    pub min_repos: Option<u32>,
    pub min_followers: Option<u32>,
    pub account_type: Option<AccountType>,
    pub sort: Option<SearchSort>,
}

impl SearchFilters {
    /// Space-join the term with each active qualifier. The result travels as a
    /// single `q` parameter; URL encoding happens in the client.
    pub fn build_query(&self, term: &str) -> String {
        let mut parts = vec![term.to_string()];
        if let Some(location) = &self.location {
            parts.push(format!("location:{}", location));
        }
        if let Some(n) = self.min_repos {
            parts.push(format!("repos:>={}", n));
        }
        if let Some(n) = self.min_followers {
            parts.push(format!("followers:>={}", n));
        }
        if let Some(account_type) = self.account_type {
            parts.push(format!("type:{}", account_type));
        }
        if let Some(sort) = self.sort {
            parts.push(format!("sort:{}", sort));
        }
        parts.join(" ")
    }
}

/// Snapshot handed out for a single page fetch.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub query: String,
    pub page: u32,
    pub per_page: u32,
    generation: u64,
}

/// Accumulates search pages for the active query.
///
/// Each page fetch starts from a [`PageRequest`] snapshot carrying the pager's
/// generation at that moment. Starting a new query bumps the generation, so a
/// slow response to a superseded request is discarded instead of landing on
/// top of the newer result set.
#[derive(Debug)]
pub struct SearchPager {
    per_page: u32,
    query: String,
    page: u32,
    total_count: u32,
    items: Vec<UserSummary>,
    seen: HashSet<String>,
    generation: u64,
}

impl SearchPager {
    pub fn new(per_page: u32) -> Self {
        Self {
            per_page,
            query: String::new(),
            page: 0,
            total_count: 0,
            items: Vec::new(),
            seen: HashSet::new(),
            generation: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Start a fresh accumulation for `query`, superseding any in-flight page.
    pub fn begin(&mut self, query: &str) -> PageRequest {
        self.generation += 1;
        self.query = query.to_string();
        self.page = 1;
        self.total_count = 0;
        self.items.clear();
        self.seen.clear();
        PageRequest {
            query: self.query.clone(),
            page: self.page,
            per_page: self.per_page,
            generation: self.generation,
        }
    }

    /// Request the next page of the current query, or None when there is no
    /// active query or nothing more to fetch.
    pub fn next_page(&mut self) -> Option<PageRequest> {
        if self.query.is_empty() || !self.has_more() {
            return None;
        }
        self.page += 1;
        Some(PageRequest {
            query: self.query.clone(),
            page: self.page,
            per_page: self.per_page,
            generation: self.generation,
        })
    }

    /// Apply a fetched page, de-duplicating by login against everything seen
    /// for this query. Returns false when the request was superseded and the
    /// results were dropped.
    pub fn apply(&mut self, request: &PageRequest, results: SearchResults) -> bool {
        if request.generation != self.generation {
            debug!(
                "Discarding stale page {} for superseded query '{}'",
                request.page, request.query
            );
            return false;
        }
        self.total_count = results.total_count;
        for item in results.items {
            if self.seen.insert(item.login.clone()) {
                self.items.push(item);
            }
        }
        true
    }

    /// Drop all accumulated state, superseding any in-flight page.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.query.clear();
        self.page = 0;
        self.total_count = 0;
        self.items.clear();
        self.seen.clear();
    }

    pub fn items(&self) -> &[UserSummary] {
        &self.items
    }

    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    pub fn has_more(&self) -> bool {
        (self.items.len() as u32) < self.total_count
    }
}
