/// HTTP middleware for the social API
///
/// Provides JWT authentication, request activity stamping, and
/// ownership-based permission checks.
pub mod activity;
pub mod jwt_auth;
pub mod permissions;

pub use activity::ActivityTrackerMiddleware;
pub use jwt_auth::{JwtAuthMiddleware, UserId};
pub use permissions::*;
