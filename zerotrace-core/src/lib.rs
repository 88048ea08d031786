//! ZeroTrace Core Library
//!
//! Conversation sync engine for the ZeroTrace end-to-end encrypted messenger.
//! Keeps a local cache of two-party threads consistent with the remote
//! service and drives incremental polling of the open thread.

pub mod config;
pub mod conversations;
pub mod error;
pub mod events;
pub mod gateway;
pub mod poller;
pub mod storage;
pub mod sync;
pub mod thread;
pub mod types;

pub use config::{ClientConfig, DEFAULT_API_BASE};
pub use conversations::{ConversationStore, UpsertOutcome};
pub use error::{ClientError, ClientResult};
pub use events::{CallbackHandler, EventDispatcher, EventHandler, NoticeLevel, SyncEvent};
pub use gateway::{
    GatewayError, GatewayResult, HttpGateway, MessageSigner, MockGateway, RemoteGateway,
    StubSigner,
};
pub use poller::Poller;
pub use storage::{IdentityVault, KeyValueStore, MemoryStore, SqliteStore, StorageError};
pub use sync::{ActiveThread, PollOutcome, SessionContext, SyncEngine, SyncReport};
pub use thread::{canonical_thread_id, short_hash};
pub use types::{
    Identity, IdentityExport, Message, Profile, RemoteThread, SendReceipt, SendRequest, StateRoot,
    StateStatus, Thread, EMPTY_STATE_ROOT,
};
