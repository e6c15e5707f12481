pub mod config;
pub mod controller;
pub mod coordinator;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod models;
pub mod source;

pub use config::FeedConfig;
pub use controller::{FetchKind, FetchRequest, PaginationController};
pub use coordinator::{spawn_coordinator, CoordinatorHandle, Intent, Update};
pub use error::FetchError;
pub use favorites::FavoritesStore;
pub use filter::FilterState;
pub use models::{Article, Page};
pub use source::{FeedSource, HttpFeedSource};
