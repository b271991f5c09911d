//! Grouping messages into topics.
//!
//! A topic is every message that mentions the same target URL.  The
//! [`TopicAggregator`] finds or creates the topic for each message and
//! attaches the message to it; storage sits behind the
//! [`TopicRepository`] and [`MessageRepository`] traits so the aggregator
//! does not care what engine holds the data.
//!
//! ## For contributors — adding a storage backend
//!
//! Implement both repository traits for your store.  The aggregator relies
//! on read-your-writes: a topic returned by [`TopicRepository::create`] must
//! be visible to the next [`TopicRepository::find_by_source_and_url`] call
//! in the same pass, otherwise two messages for one URL produce two topics.

mod naming;
mod store;

pub use naming::{extract_title, name_for, truncate_name, MAX_NAME_CHARS};
pub use store::InMemoryStore;

use std::fmt;

use crate::error::Result;
use crate::message::Message;
use crate::source::TitleFetcher;

/// Repository-assigned identity of a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TopicId(pub u64);

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stored topic.  `(source, url)` is unique across the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub source: String,
    pub url: String,
    /// Title of the target page, at most [`MAX_NAME_CHARS`] characters.
    pub name: String,
}

/// A topic that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTopic {
    pub source: String,
    pub url: String,
    pub name: String,
}

pub trait TopicRepository {
    fn find_by_source_and_url(&self, source: &str, url: &str) -> Result<Option<Topic>>;

    /// Store a new topic and return it with its assigned id.
    fn create(&mut self, topic: NewTopic) -> Result<Topic>;
}

pub trait MessageRepository {
    fn save(&mut self, message: &Message) -> Result<()>;
}

/// What one aggregation pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    pub messages: usize,
    pub topics_created: usize,
}

/// Attaches messages to topics, creating and naming topics on first sight
/// of a URL.
pub struct TopicAggregator<R, F> {
    repository: R,
    fetcher: F,
}

impl<R, F> TopicAggregator<R, F>
where
    R: TopicRepository + MessageRepository,
    F: TitleFetcher,
{
    pub fn new(repository: R, fetcher: F) -> Self {
        Self {
            repository,
            fetcher,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Attach each message to its topic and save it, in order.
    ///
    /// Each message sees the topics created for earlier ones in the same
    /// call, so a URL gets one topic no matter how often it appears or how
    /// many times this is called.  The first error stops the pass; messages
    /// before it stay saved.
    pub fn aggregate(&mut self, messages: &mut [Message]) -> Result<AggregateSummary> {
        let mut summary = AggregateSummary::default();

        for message in messages.iter_mut() {
            let topic = match self
                .repository
                .find_by_source_and_url(&message.source, &message.url)?
            {
                Some(topic) => topic,
                None => {
                    let topic = self.create_topic(message)?;
                    summary.topics_created += 1;
                    topic
                }
            };

            message.topic = Some(topic.id);
            self.repository.save(message)?;
            summary.messages += 1;
        }

        tracing::info!(
            messages = summary.messages,
            topics_created = summary.topics_created,
            "aggregated trackbacks"
        );
        Ok(summary)
    }

    fn create_topic(&mut self, message: &Message) -> Result<Topic> {
        let name = name_for(&self.fetcher, &message.url)?;
        let topic = self.repository.create(NewTopic {
            source: message.source.clone(),
            url: message.url.clone(),
            name,
        })?;
        tracing::debug!(topic = %topic.id, url = %topic.url, name = %topic.name, "created topic");
        Ok(topic)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
