//! API Routes
//!
//! Route handlers organized by functionality.

pub mod health;
pub mod oneshot;
pub mod page;
pub mod sessions;
