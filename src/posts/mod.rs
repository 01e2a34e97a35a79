// Posts module
// Blog posts with paging, search and summarization

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use models::{Post, PostPage, PostRequest, PostResponse, SummaryResponse};
pub use repository::PostRepository;
pub use service::PostService;
