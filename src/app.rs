use std::collections::HashSet;

use ratatui::widgets::ListState;

use grapevine::TopicId;

use crate::poll::Trackback;

pub struct App {
    /// Site being watched, shown in the list title.
    pub site: String,
    /// De-duplicated, reverse-chronological trackbacks.
    pub trackbacks: Vec<Trackback>,
    /// Tweet ids already shown.
    seen: HashSet<String>,
    /// Distinct topics among the shown trackbacks.
    topics: HashSet<TopicId>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last poll status message.
    pub status: String,
}

impl App {
    pub fn new(site: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            trackbacks: Vec::new(),
            seen: HashSet::new(),
            topics: HashSet::new(),
            list_state: ListState::default(),
            quit: false,
            status: "Starting…".into(),
        }
    }

    /// Merge newly-loaded trackbacks, de-duplicate, and re-sort.
    ///
    /// Returns how many were actually new.
    pub fn merge_trackbacks(&mut self, incoming: Vec<Trackback>) -> usize {
        let before = self.trackbacks.len();
        for trackback in incoming {
            if self.seen.insert(trackback.message.source_id.clone()) {
                if let Some(id) = trackback.message.topic {
                    self.topics.insert(id);
                }
                self.trackbacks.push(trackback);
            }
        }
        self.trackbacks.sort_by(|a, b| a.message.cmp(&b.message));
        self.trackbacks.len() - before
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub fn selected(&self) -> Option<&Trackback> {
        self.list_state
            .selected()
            .and_then(|i| self.trackbacks.get(i))
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.trackbacks.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.trackbacks.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.trackbacks.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.trackbacks.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.trackbacks.is_empty() {
            self.list_state.select(Some(self.trackbacks.len() - 1));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use grapevine::{Message, SOURCE_NAME};

    pub(crate) fn make_trackback(id: &str, secs: i64, topic: u64, name: &str) -> Trackback {
        Trackback {
            message: Message {
                source: SOURCE_NAME.to_string(),
                source_id: id.to_string(),
                author: format!("author{id}"),
                url: format!("http://example.com/{topic}"),
                created_at: Utc.timestamp_opt(secs, 0).unwrap(),
                topic: Some(TopicId(topic)),
            },
            topic_name: name.to_string(),
        }
    }

    pub(crate) fn sample_trackbacks() -> Vec<Trackback> {
        vec![
            make_trackback("1", 100, 1, "Old"),
            make_trackback("2", 200, 2, "Mid"),
            make_trackback("3", 300, 1, "Old"),
        ]
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_starts_empty() {
        let app = App::new("github.com");
        assert!(app.trackbacks.is_empty());
        assert!(!app.quit);
        assert!(app.list_state.selected().is_none());
        assert_eq!(app.topic_count(), 0);
    }

    // -- merge_trackbacks ----------------------------------------------------

    #[test]
    fn merge_inserts_and_sorts_reverse_chronological() {
        let mut app = App::new("github.com");
        let added = app.merge_trackbacks(sample_trackbacks());

        assert_eq!(added, 3);
        let ids: Vec<&str> = app
            .trackbacks
            .iter()
            .map(|t| t.message.source_id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
        assert_eq!(app.topic_count(), 2);
    }

    #[test]
    fn merge_deduplicates_by_tweet_id() {
        let mut app = App::new("github.com");
        app.merge_trackbacks(vec![make_trackback("dup", 100, 1, "First")]);
        let added = app.merge_trackbacks(vec![
            make_trackback("dup", 150, 1, "Second copy"),
            make_trackback("new", 200, 1, "First"),
        ]);

        assert_eq!(added, 1);
        assert_eq!(app.trackbacks.len(), 2);
        assert!(app
            .trackbacks
            .iter()
            .any(|t| t.message.source_id == "dup" && t.topic_name == "First"));
    }

    #[test]
    fn merge_handles_empty_input() {
        let mut app = App::new("github.com");
        assert_eq!(app.merge_trackbacks(vec![]), 0);
        assert!(app.trackbacks.is_empty());
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn navigation_on_empty_is_noop() {
        let mut app = App::new("github.com");
        app.select_next();
        app.select_previous();
        app.select_first();
        app.select_last();
        assert!(app.list_state.selected().is_none());
        assert!(app.selected().is_none());
    }

    #[test]
    fn select_next_starts_at_zero_then_clamps() {
        let mut app = App::new("github.com");
        app.merge_trackbacks(sample_trackbacks());

        app.select_next();
        assert_eq!(app.list_state.selected(), Some(0));
        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.list_state.selected(), Some(2));
    }

    #[test]
    fn select_previous_clamps_at_zero() {
        let mut app = App::new("github.com");
        app.merge_trackbacks(sample_trackbacks());

        app.select_last();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(1));
        app.select_first();
        app.select_previous();
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn selected_returns_the_highlighted_trackback() {
        let mut app = App::new("github.com");
        app.merge_trackbacks(sample_trackbacks());

        app.select_last();
        assert_eq!(app.selected().map(|t| t.message.source_id.as_str()), Some("1"));
    }
}
