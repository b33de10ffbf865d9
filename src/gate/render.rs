//! Render policy shared by every presentation of a guarded image
//!
//! The protected slot and the placeholder slot are exact complements for
//! adult images. Non-adult images always get the protected content.

use crate::state::visibility::VisibilityStore;

use super::context::ImageScope;
use super::evaluator::{disposition, Disposition};

/// Which of the two slots renders for an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Protected,
    Placeholder,
}

pub fn active_slot(scope: &ImageScope<'_>, store: &VisibilityStore) -> Slot {
    match disposition(scope, store) {
        Disposition::Visible => Slot::Protected,
        Disposition::Hidden => Slot::Placeholder,
    }
}

/// Render `content` only while the image may be shown
pub fn protected<T>(scope: &ImageScope<'_>, store: &VisibilityStore, content: impl FnOnce() -> T) -> Option<T> {
    match active_slot(scope, store) {
        Slot::Protected => Some(content()),
        Slot::Placeholder => None,
    }
}

/// Render `content` only while an adult image is hidden
pub fn placeholder<T>(scope: &ImageScope<'_>, store: &VisibilityStore, content: impl FnOnce() -> T) -> Option<T> {
    if !scope.image().nsfw {
        return None;
    }

    match active_slot(scope, store) {
        Slot::Placeholder => Some(content()),
        Slot::Protected => None,
    }
}

/// Hand the disposition to a caller supplied renderer
pub fn render_with<T>(
    scope: &ImageScope<'_>,
    store: &VisibilityStore,
    render: impl FnOnce(Disposition) -> T,
) -> T {
    render(disposition(scope, store))
}
