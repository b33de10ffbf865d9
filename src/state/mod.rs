//! State management module
//!
//! This module handles all session state, including:
//! - Shared data structures: images, connections, viewer (data.rs)
//! - Reveal flags shared by every rendered image (visibility.rs)
//! - Image feeds handed over by the data layer (feed.rs)

pub mod data;
pub mod feed;
pub mod visibility;
