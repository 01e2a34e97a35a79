// Authentication module
// Stateless JWT authentication, user directory lookup and authorization guards

pub mod directory;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use directory::{InMemoryDirectory, UserDirectory};
pub use error::AuthError;
pub use middleware::{authenticate, AuthState, AuthenticatedUser};
pub use models::{JwtAuthResponse, LoginRequest, Role, SignupRequest, User, UserResponse};
pub use repository::UserRepository;
pub use service::AuthService;
pub use token::{Claims, TokenError, TokenProvider};
