/// Business logic layer for the social API
///
/// This module provides high-level operations:
/// - Post service: post listing, detail assembly, writes, comments
/// - Engagement service: like toggling and like analytics
/// - Media storage: validated image writes under the media root
pub mod engagement;
pub mod media;
pub mod posts;

// Re-export commonly used services
pub use engagement::EngagementService;
pub use media::MediaStorage;
pub use posts::PostService;
