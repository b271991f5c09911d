//! Paginated trackback loading with a seen-watermark.
//!
//! [`load`] walks the search backend's result pages for one site, newest
//! first, and stops as soon as it reaches an item at or before the
//! watermark left by the previous call.  It never fetches more than
//! [`MAX_PAGES`] pages in one call; callers that need to drain a large
//! backlog call it again with the returned state.
//!
//! ## Ordering assumption
//!
//! The early stop abandons the rest of the current page the moment one
//! stale item is seen.  That is only correct when the backend returns items
//! strictly newest-first within a page.  If it ever does not, newer items
//! that follow a stale one are dropped.

use chrono::{DateTime, Utc};

use crate::error::{LoaderError, Result};
use crate::message::{create_message, created_at, Message};
use crate::source::{SearchClient, SearchQuery, REALTIME_WINDOW};

/// Default number of items requested per page.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Hard cap on pages fetched by a single [`load`] call.
pub const MAX_PAGES: u32 = 9;

/// Where the loader is, for one site.
///
/// Pass it into [`load`] and keep the state that comes back; that is the
/// only way the watermark advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderState {
    /// Domain to search within.
    pub site: Option<String>,
    pub per_page: u32,
    /// Creation time of the newest trackback already loaded.
    pub watermark: Option<DateTime<Utc>>,
}

impl LoaderState {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: Some(site.into()),
            ..Self::default()
        }
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_watermark(mut self, watermark: Option<DateTime<Utc>>) -> Self {
        self.watermark = watermark;
        self
    }
}

impl Default for LoaderState {
    fn default() -> Self {
        Self {
            site: None,
            per_page: DEFAULT_PER_PAGE,
            watermark: None,
        }
    }
}

/// Load every trackback newer than `state.watermark`, up to the page cap.
///
/// Returns the messages in the order they were encountered (page order, then
/// in-page order) together with the updated state.  The new watermark is the
/// creation time of the first item accepted in this call; if nothing new was
/// seen the watermark is unchanged.
///
/// Fails with [`LoaderError::Configuration`] before any request when no site
/// is set or `per_page` is zero.  Search and message errors propagate as-is;
/// `state` is untouched in that case.
pub fn load<C>(client: &C, state: &LoaderState) -> Result<(Vec<Message>, LoaderState)>
where
    C: SearchClient + ?Sized,
{
    let site = match state.site.as_deref() {
        Some(site) if !site.trim().is_empty() => site,
        _ => {
            return Err(LoaderError::Configuration(
                "cannot load trackbacks without a site defined".into(),
            ))
        }
    };

    if state.per_page == 0 {
        return Err(LoaderError::Configuration(
            "cannot load trackbacks with a page size of zero".into(),
        ));
    }

    let last_loaded_at = state.watermark;
    let mut new_watermark: Option<DateTime<Utc>> = None;
    let mut messages = Vec::new();
    let mut page = 1;

    loop {
        let results = client.search(&SearchQuery {
            site,
            window: REALTIME_WINDOW,
            page,
            per_page: state.per_page,
        })?;
        tracing::debug!(
            site,
            page,
            items = results.items.len(),
            last_offset = results.last_offset,
            total = results.total,
            "fetched search page"
        );

        let mut reached_seen = false;
        for item in &results.items {
            let item_created_at = created_at(item)?;
            if last_loaded_at.is_some_and(|seen| item_created_at <= seen) {
                reached_seen = true;
                break;
            }
            new_watermark.get_or_insert(item_created_at);

            messages.push(create_message(item)?);
        }

        page += 1;

        if reached_seen || results.last_offset >= results.total || page > MAX_PAGES {
            break;
        }
    }

    tracing::info!(
        site,
        pages = page - 1,
        loaded = messages.len(),
        watermark = ?new_watermark.or(last_loaded_at),
        "loaded trackbacks"
    );

    let next = LoaderState {
        watermark: new_watermark.or(last_loaded_at),
        ..state.clone()
    };
    Ok((messages, next))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
