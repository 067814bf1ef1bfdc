// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod media_client;
pub mod moderation_service;
pub mod notifier;
pub mod platform_client;
pub mod rating_aggregator;
pub mod response_service;
pub mod review_service;

pub use media_client::*;
pub use moderation_service::*;
pub use notifier::*;
pub use platform_client::*;
pub use rating_aggregator::*;
pub use response_service::*;
pub use review_service::*;
