// Comments module
// Comments always live under a post

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use models::{Comment, CommentRequest, CommentResponse};
pub use repository::CommentRepository;
pub use service::CommentService;
