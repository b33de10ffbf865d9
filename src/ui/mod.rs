//! iced widgets for guarded images
//!
//! - badge.rs: the "18+" toggle badge
//! - prompt.rs: inline sign-in prompt
//! - card.rs: one feed group rendered as a card of image tiles

pub mod badge;
pub mod card;
pub mod prompt;
