//! Background trackback polling.
//!
//! Runs on a dedicated thread, periodically loading new trackbacks for the
//! configured site, aggregating them into topics and sending the results to
//! the UI thread over an [`mpsc`] channel.
//!
//! ## For contributors
//!
//! The [`Poller`] owns everything a cycle touches: the search client, the
//! aggregator with its store, and the [`LoaderState`].  Nothing is shared
//! with the UI thread except the channel, so no locking is needed.  To track
//! several sites, run one poller per site.

use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use grapevine::checkpoint::{self, Checkpoint};
use grapevine::{
    load, InMemoryStore, LoaderState, Message, SearchClient, TitleFetcher, TopicAggregator,
};

/// A message together with the name of the topic it was filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trackback {
    pub message: Message,
    pub topic_name: String,
}

/// Messages sent from the poller thread to the UI thread.
pub enum PollMsg {
    /// A cycle completed; these trackbacks are new.
    Trackbacks(Vec<Trackback>),
    /// A cycle failed with this error description.
    Error(String),
}

/// One site's loading pipeline.
pub struct Poller<C, F> {
    client: C,
    aggregator: TopicAggregator<InMemoryStore, F>,
    state: LoaderState,
    checkpoint_path: Option<PathBuf>,
}

impl<C, F> Poller<C, F>
where
    C: SearchClient,
    F: TitleFetcher,
{
    pub fn new(client: C, fetcher: F, state: LoaderState) -> Self {
        Self {
            client,
            aggregator: TopicAggregator::new(InMemoryStore::new(), fetcher),
            state,
            checkpoint_path: None,
        }
    }

    /// Write the watermark to `path` after every successful cycle.
    pub fn with_checkpoint(mut self, path: Option<PathBuf>) -> Self {
        self.checkpoint_path = path;
        self
    }

    pub fn state(&self) -> &LoaderState {
        &self.state
    }

    pub fn topic_count(&self) -> usize {
        self.aggregator.repository().topics().len()
    }

    /// Load, aggregate and checkpoint once.
    ///
    /// The watermark only advances once the new messages have been
    /// aggregated, so a failed cycle is retried in full on the next one.
    pub fn poll_once(&mut self) -> Result<Vec<Trackback>> {
        let (mut messages, next) = load(&self.client, &self.state)?;
        self.aggregator
            .aggregate(&mut messages)
            .context("aggregating trackbacks")?;
        self.state = next;

        if let Some(path) = &self.checkpoint_path {
            if let Some(cp) = Checkpoint::from_state(&self.state) {
                checkpoint::write(path, &cp)
                    .with_context(|| format!("writing checkpoint {}", path.display()))?;
            }
        }

        let store = self.aggregator.repository();
        Ok(messages
            .into_iter()
            .map(|message| {
                let topic_name = message
                    .topic
                    .and_then(|id| store.topic(id))
                    .map(|t| t.name.clone())
                    .unwrap_or_default();
                Trackback {
                    message,
                    topic_name,
                }
            })
            .collect())
    }
}

/// Spawn the background polling thread.
///
/// Returns a receiver that the main loop should drain on every tick.
/// The thread stops when the receiver is dropped.
pub fn spawn<C, F>(mut poller: Poller<C, F>, interval: Duration) -> mpsc::Receiver<PollMsg>
where
    C: SearchClient + Send + 'static,
    F: TitleFetcher + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || loop {
        let msg = match poller.poll_once() {
            Ok(trackbacks) => PollMsg::Trackbacks(trackbacks),
            Err(e) => {
                let text = format!("{e:#}");
                tracing::warn!(error = %text, "poll cycle failed");
                PollMsg::Error(text)
            }
        };
        if tx.send(msg).is_err() {
            return;
        }
        thread::sleep(interval);
    });

    rx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use grapevine::{LoaderError, SearchItem, SearchPage, SearchQuery};
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Returns the same single page every time.
    struct OnePage(Vec<SearchItem>);

    impl SearchClient for OnePage {
        fn search(&self, _query: &SearchQuery<'_>) -> grapevine::Result<SearchPage> {
            Ok(SearchPage {
                items: self.0.clone(),
                last_offset: self.0.len() as u64,
                total: self.0.len() as u64,
            })
        }
    }

    struct Titled(&'static str);

    impl TitleFetcher for Titled {
        fn fetch(&self, _url: &str) -> grapevine::Result<String> {
            Ok(format!("<title>{}</title>", self.0))
        }
    }

    /// Fails the first `remaining` fetches.
    struct Flaky {
        remaining: Cell<u32>,
    }

    impl TitleFetcher for Flaky {
        fn fetch(&self, url: &str) -> grapevine::Result<String> {
            if self.remaining.get() > 0 {
                self.remaining.set(self.remaining.get() - 1);
                return Err(LoaderError::Network(format!("timed out: {url}")));
            }
            Ok("<title>Back</title>".into())
        }
    }

    fn item(id: u64, created_at: i64, url: &str) -> SearchItem {
        SearchItem {
            permalink: format!("http://twitter.com/someone/status/{id}"),
            author_nick: "someone".into(),
            url: url.into(),
            created_at,
        }
    }

    #[test]
    fn poll_once_returns_named_trackbacks_and_advances() {
        let client = OnePage(vec![item(2, 200, "http://a"), item(1, 100, "http://a")]);
        let mut poller = Poller::new(client, Titled("Page A"), LoaderState::new("a"));

        let trackbacks = poller.poll_once().unwrap();

        assert_eq!(trackbacks.len(), 2);
        assert!(trackbacks.iter().all(|t| t.topic_name == "Page A"));
        assert_eq!(poller.topic_count(), 1);
        assert_eq!(poller.state().watermark, Some(Utc.timestamp_opt(200, 0).unwrap()));

        let again = poller.poll_once().unwrap();
        assert!(again.is_empty(), "nothing new on the second cycle");
    }

    #[test]
    fn failed_aggregation_keeps_the_watermark() {
        let client = OnePage(vec![item(1, 100, "http://a")]);
        let fetcher = Flaky {
            remaining: Cell::new(1),
        };
        let mut poller = Poller::new(client, fetcher, LoaderState::new("a"));

        assert!(poller.poll_once().is_err());
        assert!(poller.state().watermark.is_none());

        let retried = poller.poll_once().unwrap();
        assert_eq!(retried.len(), 1);
        assert_eq!(retried[0].topic_name, "Back");
    }

    #[test]
    fn checkpoint_is_written_after_a_cycle() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        let client = OnePage(vec![item(1, 100, "http://a")]);
        let mut poller = Poller::new(client, Titled("A"), LoaderState::new("a"))
            .with_checkpoint(Some(path.clone()));

        poller.poll_once().unwrap();

        let saved = checkpoint::read(&path).unwrap().unwrap();
        assert_eq!(saved.site, "a");
        assert_eq!(saved.watermark, Some(Utc.timestamp_opt(100, 0).unwrap()));
    }

    #[test]
    fn spawned_poller_sends_results() {
        let client = OnePage(vec![item(1, 100, "http://a")]);
        let poller = Poller::new(client, Titled("A"), LoaderState::new("a"));

        let rx = spawn(poller, Duration::from_secs(3600));
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            PollMsg::Trackbacks(trackbacks) => assert_eq!(trackbacks.len(), 1),
            PollMsg::Error(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn spawned_poller_reports_errors() {
        let poller = Poller::new(OnePage(vec![]), Titled("A"), LoaderState::default());

        let rx = spawn(poller, Duration::from_secs(3600));
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            PollMsg::Error(e) => assert!(e.contains("without a site")),
            PollMsg::Trackbacks(_) => panic!("expected a configuration error"),
        }
    }
}
