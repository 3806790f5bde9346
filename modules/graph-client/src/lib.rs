pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::{FeedOperations, FriendOperations, GraphClient, MediaOperations};
pub use error::{GraphError, Result};
pub use traits::GraphApi;
pub use types::{CreatedObject, PagedList, PagingParameters, Post, PostData, Reference, User};
