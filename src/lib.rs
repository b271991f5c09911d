//! grapevine — ingest Twitter trackbacks for a site and group them into
//! topics.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────────┐ SearchPage ┌───────────┐ Vec<Message> ┌─────────────────┐
//! │ SearchClient │ ─────────► │  loader   │ ───────────► │ TopicAggregator │
//! │  (topsy.rs)  │            │ (load())  │              │   (topic/)      │
//! └──────────────┘            └───────────┘              └─────────────────┘
//!                                   │                          │     ▲
//!                          create_message()          name_for()│     │ HTML
//!                                   ▼                          ▼     │
//!                             ┌───────────┐              ┌──────────────┐
//!                             │ message.rs│              │ TitleFetcher │
//!                             └───────────┘              └──────────────┘
//! ```
//!
//! * **`source/`** — the [`SearchClient`] and [`TitleFetcher`] traits and
//!   their HTTP implementations (Topsy and plain page fetches).
//! * **`message`** — the normalized [`Message`] and how one is built from a
//!   search result.
//! * **`loader`** — paginated loading with the seen-watermark and page cap.
//! * **`topic/`** — topics, the repository traits, naming and aggregation.
//! * **`checkpoint`** — persisting the watermark between runs.
//!
//! Everything here is blocking and single-threaded.  Run one
//! [`LoaderState`] per site per thread.

pub mod checkpoint;
pub mod error;
pub mod loader;
pub mod message;
pub mod source;
pub mod topic;

pub use error::{LoaderError, Result};
pub use loader::{load, LoaderState, DEFAULT_PER_PAGE, MAX_PAGES};
pub use message::{create_message, Message, SOURCE_NAME};
pub use source::{
    HttpTitleFetcher, SearchClient, SearchItem, SearchPage, SearchQuery, TitleFetcher,
    TopsyClient,
};
pub use topic::{
    AggregateSummary, InMemoryStore, MessageRepository, NewTopic, Topic, TopicAggregator,
    TopicId, TopicRepository,
};
