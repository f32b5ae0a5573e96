//! API Routes
//!
//! Route handlers organized by functionality.

pub mod feed;
pub mod health;
pub mod status;
pub mod transit;
