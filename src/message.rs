//! The normalized message record built from a search result.
//!
//! `Message` is what the loader hands back to its caller and what the
//! aggregator later attaches to a topic.  [`create_message`] is the only way
//! the loader builds one.
//!
//! ## For contributors
//!
//! Message construction is a pure function of the [`SearchItem`]: no network,
//! no clock.  Keep it that way so the loader tests can stay fully offline.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{LoaderError, Result};
use crate::source::SearchItem;
use crate::topic::TopicId;

/// Name stamped on every message and topic produced by this loader.
pub const SOURCE_NAME: &str = "twitter-trackback";

/// Trailing run of digits at the end of a permalink.
static TRAILING_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)$").expect("valid regex"));

/// A single trackback, normalized from the search backend.
///
/// ## Sorting
///
/// `Message` implements [`Ord`] for **reverse-chronological** ordering:
/// newer messages sort before older ones.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Message {
    /// Always [`SOURCE_NAME`] for messages built by this crate.
    pub source: String,

    /// Identifier of the tweet on the source network.
    pub source_id: String,

    /// Nickname of the author.
    pub author: String,

    /// The target URL that was mentioned.  Messages sharing a URL share a
    /// topic.
    pub url: String,

    pub created_at: DateTime<Utc>,

    /// Owning topic, set once the message has been aggregated.
    pub topic: Option<TopicId>,
}

impl Ord for Message {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| self.source_id.cmp(&other.source_id))
    }
}

impl PartialOrd for Message {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Convert a search item's epoch seconds into a UTC timestamp.
pub fn created_at(item: &SearchItem) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(item.created_at, 0).ok_or_else(|| {
        LoaderError::Parse(format!(
            "trackback date {} is out of range",
            item.created_at
        ))
    })
}

/// Build a [`Message`] from one search result.
///
/// Fails with [`LoaderError::Parse`] when the permalink does not end in a
/// numeric identifier; a message is never silently dropped.
pub fn create_message(item: &SearchItem) -> Result<Message> {
    let source_id = TRAILING_ID
        .captures(&item.permalink)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            LoaderError::Parse(format!(
                "permalink has no trailing identifier: {}",
                item.permalink
            ))
        })?;

    Ok(Message {
        source: SOURCE_NAME.to_string(),
        source_id,
        author: item.author_nick.clone(),
        url: item.url.clone(),
        created_at: created_at(item)?,
        topic: None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(permalink: &str, created_at: i64) -> SearchItem {
        SearchItem {
            permalink: permalink.to_string(),
            author_nick: "coplusk".to_string(),
            url: "https://github.com/tomwaddington/suggestedshare/commit/1e4117f001d224cd15039ff030bc39b105f24a13".to_string(),
            created_at,
        }
    }

    #[test]
    fn create_message_copies_fields() {
        let msg = create_message(&item(
            "http://twitter.com/coplusk/status/23909517578211328",
            1294785476,
        ))
        .unwrap();

        assert_eq!(msg.source, "twitter-trackback");
        assert_eq!(msg.source_id, "23909517578211328");
        assert_eq!(msg.author, "coplusk");
        assert_eq!(
            msg.url,
            "https://github.com/tomwaddington/suggestedshare/commit/1e4117f001d224cd15039ff030bc39b105f24a13"
        );
        assert_eq!(msg.created_at, Utc.timestamp_opt(1294785476, 0).unwrap());
        assert!(msg.topic.is_none());
    }

    #[test]
    fn only_the_trailing_digits_are_used() {
        let msg = create_message(&item("http://twitter.com/user42/status/777", 0)).unwrap();
        assert_eq!(msg.source_id, "777");
    }

    #[test]
    fn permalink_without_trailing_digits_is_rejected() {
        let err = create_message(&item("http://twitter.com/user/status/123/photo", 0)).unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
    }

    #[test]
    fn out_of_range_date_is_rejected() {
        let err = create_message(&item("http://twitter.com/a/status/1", i64::MAX)).unwrap_err();
        assert!(matches!(err, LoaderError::Parse(_)));
    }

    #[test]
    fn sort_reverse_chronological() {
        let old = create_message(&item("http://t/1", 100)).unwrap();
        let new = create_message(&item("http://t/2", 300)).unwrap();
        let mid = create_message(&item("http://t/3", 200)).unwrap();

        let mut msgs = vec![old, new, mid];
        msgs.sort();

        assert_eq!(msgs[0].source_id, "2", "newest first");
        assert_eq!(msgs[1].source_id, "3");
        assert_eq!(msgs[2].source_id, "1", "oldest last");
    }
}
