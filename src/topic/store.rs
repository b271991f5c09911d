//! In-memory repository used by the terminal app.

use std::collections::HashMap;

use super::{MessageRepository, NewTopic, Topic, TopicId, TopicRepository};
use crate::error::Result;
use crate::message::Message;

/// Keeps topics and messages in process memory.
///
/// Topics are indexed by `(source, url)`; messages are keyed by
/// `(source, source_id)` so saving the same message twice replaces it.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    topics: Vec<Topic>,
    by_key: HashMap<(String, String), TopicId>,
    messages: Vec<Message>,
    message_index: HashMap<(String, String), usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Ids are handed out as 1-based positions in `topics`.
    pub fn topic(&self, id: TopicId) -> Option<&Topic> {
        let idx = usize::try_from(id.0).ok()?.checked_sub(1)?;
        self.topics.get(idx)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

impl TopicRepository for InMemoryStore {
    fn find_by_source_and_url(&self, source: &str, url: &str) -> Result<Option<Topic>> {
        Ok(self
            .by_key
            .get(&(source.to_string(), url.to_string()))
            .and_then(|id| self.topic(*id))
            .cloned())
    }

    fn create(&mut self, topic: NewTopic) -> Result<Topic> {
        let key = (topic.source.clone(), topic.url.clone());
        if let Some(existing) = self.by_key.get(&key).and_then(|id| self.topic(*id)) {
            return Ok(existing.clone());
        }

        let topic = Topic {
            id: TopicId(self.topics.len() as u64 + 1),
            source: topic.source,
            url: topic.url,
            name: topic.name,
        };
        self.by_key.insert(key, topic.id);
        self.topics.push(topic.clone());
        Ok(topic)
    }
}

impl MessageRepository for InMemoryStore {
    fn save(&mut self, message: &Message) -> Result<()> {
        let key = (message.source.clone(), message.source_id.clone());
        match self.message_index.get(&key) {
            Some(&idx) => self.messages[idx] = message.clone(),
            None => {
                self.message_index.insert(key, self.messages.len());
                self.messages.push(message.clone());
            }
        }
        Ok(())
    }
}
