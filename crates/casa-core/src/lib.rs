pub mod api;
pub mod config;
pub mod model;
pub mod push;
pub mod search;
pub mod store;
pub mod sync;

// Re-export commonly used types
pub use api::{ApiError, HttpApi, PropertyApi};
pub use config::Config;
pub use model::{Property, PropertyDraft, PropertySummary};
pub use push::{ChannelState, PushChannel};
pub use store::{LocalStore, StoreError};
pub use sync::{Served, SyncCore, SyncError};
