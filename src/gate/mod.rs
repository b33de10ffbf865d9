//! Adult content gating
//!
//! - `context`: images of one rendering pass, resolved for the viewer
//! - `evaluator`: Visible / Hidden for one image
//! - `disclosure`: badge state machine and sign-in checkpoint
//! - `render`: protected / placeholder slots

pub mod context;
pub mod disclosure;
pub mod evaluator;
pub mod render;

pub use context::{GuardContext, ImageScope};
pub use disclosure::{BadgeKey, BadgeState, ClickDecision, ClickOutcome, DisclosureGate, ToggleTarget};
pub use evaluator::{disposition, evaluate, Disposition};
pub use render::{placeholder, protected, render_with, Slot};
