pub mod config;
pub mod wrapper;

pub use config::WrapperConfig;
pub use wrapper::FacebookWrapper;

pub use graph_client::{GraphError, PagedList, PagingParameters, Post, PostData, Result, User};
