//! Disclosure gate: the "18+" badge and what clicking it does
//!
//! Anonymous viewers never change visibility. Their click opens an inline
//! prompt pointing at the sign-in page instead. Signed-in viewers who blur
//! adult content toggle the image, or the whole connection when the context
//! has one. Every click on the badge is swallowed so it never activates the
//! element underneath.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::state::data::{Connection, ImageId};
use crate::state::visibility::VisibilityStore;

use super::context::{GuardContext, ImageScope};
use super::evaluator::{disposition, is_revealed};

/// Message shown in the sign-in prompt
pub const LOGIN_PROMPT: &str = "You must be logged in to view adult content";

/// Where the badge sits on top of its image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgePosition {
    Static,
    #[default]
    TopLeft,
    TopRight,
}

/// What a badge click flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleTarget {
    Image(ImageId),
    Connection(Connection),
}

/// Per-image state of the badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeState {
    /// No badge: nothing to disclose
    NotApplicable,
    /// Anonymous viewer on adult content, clicking opens the sign-in prompt
    LockedPendingAuth,
    /// Badge rendered as a marker only, clicks do nothing
    Informational,
    InteractiveHidden,
    InteractiveShown,
}

impl BadgeState {
    pub fn is_rendered(&self) -> bool {
        !matches!(self, BadgeState::NotApplicable)
    }

    pub fn is_toggleable(&self) -> bool {
        matches!(self, BadgeState::InteractiveHidden | BadgeState::InteractiveShown)
    }
}

/// Policy decision for a badge click, consumed by the UI binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickDecision {
    /// Stop propagation and flip the target
    Allow(ToggleTarget),
    /// Stop propagation and open/close the sign-in prompt
    SuppressAndPrompt,
    /// Stop propagation, nothing else happens
    Inert,
}

/// What a click ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Toggled { target: ToggleTarget, revealed: bool },
    Revealed { count: usize },
    PromptOpened,
    PromptClosed,
    Ignored,
}

/// Whether a badge is shown at all.
///
/// Moderators still get the badge on intrinsically adult images even when
/// their own preference lets the image through unblurred.
pub fn badge_applicable(scope: &ImageScope<'_>) -> bool {
    let image = scope.image();
    image.nsfw || (image.image_nsfw && scope.viewer().is_moderator)
}

/// What the badge flips: the connection if the context has one, else the image
pub fn toggle_target(scope: &ImageScope<'_>) -> ToggleTarget {
    match scope.connect() {
        Some(connection) => ToggleTarget::Connection(*connection),
        None => ToggleTarget::Image(scope.image().id),
    }
}

pub fn badge_state(scope: &ImageScope<'_>, store: &VisibilityStore) -> BadgeState {
    if !badge_applicable(scope) {
        return BadgeState::NotApplicable;
    }

    let viewer = scope.viewer();
    if scope.image().nsfw && !viewer.authenticated {
        return BadgeState::LockedPendingAuth;
    }
    if !viewer.toggleable() {
        return BadgeState::Informational;
    }

    if is_revealed(scope.image().id, scope.connect(), store) {
        BadgeState::InteractiveShown
    } else {
        BadgeState::InteractiveHidden
    }
}

pub fn decide_click(scope: &ImageScope<'_>) -> ClickDecision {
    if !badge_applicable(scope) {
        return ClickDecision::Inert;
    }

    let viewer = scope.viewer();
    if scope.image().nsfw && !viewer.authenticated {
        ClickDecision::SuppressAndPrompt
    } else if viewer.toggleable() {
        ClickDecision::Allow(toggle_target(scope))
    } else {
        ClickDecision::Inert
    }
}

/// `<auth-path>?returnUrl=<current-path>`
pub fn login_href(auth_path: &str, current_path: &str) -> String {
    format!("{auth_path}?returnUrl={current_path}")
}

/// Contents of the inline sign-in prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPrompt {
    pub message: &'static str,
    pub login_href: String,
}

/// Identity of one rendered badge
///
/// The same image can appear in several places (a model card and a plain
/// gallery), each with its own badge and its own prompt. `slot` tells them
/// apart; the gallery uses the feed group index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BadgeKey {
    pub slot: usize,
    pub image: ImageId,
}

impl BadgeKey {
    pub fn new(slot: usize, image: ImageId) -> Self {
        Self { slot, image }
    }
}

/// Applies badge clicks and tracks which sign-in prompts are open
#[derive(Debug, Clone, Default)]
pub struct DisclosureGate {
    auth_path: String,
    open_prompts: HashSet<BadgeKey>,
}

impl DisclosureGate {
    pub fn new(auth_path: impl Into<String>) -> Self {
        Self {
            auth_path: auth_path.into(),
            open_prompts: HashSet::new(),
        }
    }

    pub fn auth_path(&self) -> &str {
        &self.auth_path
    }

    pub fn is_prompt_open(&self, key: BadgeKey) -> bool {
        self.open_prompts.contains(&key)
    }

    pub fn close_prompt(&mut self, key: BadgeKey) {
        self.open_prompts.remove(&key);
    }

    /// Close every prompt, e.g. when the badges they belong to are gone
    pub fn close_all_prompts(&mut self) {
        self.open_prompts.clear();
    }

    /// Prompt for the sign-in page, returning to `current_path` afterwards
    pub fn prompt(&self, current_path: &str) -> AuthPrompt {
        AuthPrompt {
            message: LOGIN_PROMPT,
            login_href: login_href(&self.auth_path, current_path),
        }
    }

    /// Handle a click on badge `key`, showing the image of `scope`
    pub fn click(&mut self, key: BadgeKey, scope: &ImageScope<'_>, store: &mut VisibilityStore) -> ClickOutcome {
        match decide_click(scope) {
            ClickDecision::Allow(target) => {
                let revealed = match &target {
                    ToggleTarget::Image(id) => store.toggle_image(*id),
                    ToggleTarget::Connection(connection) => store.toggle_connection(connection),
                };
                ClickOutcome::Toggled { target, revealed }
            }
            ClickDecision::SuppressAndPrompt => self.flip_prompt(key),
            ClickDecision::Inert => {
                debug!(image_id = scope.image().id, "ignored badge click");
                ClickOutcome::Ignored
            }
        }
    }

    /// Reveal every image of the scope's context, gated like a badge click.
    ///
    /// `count` is the number of images that actually became visible. It is
    /// zero when a connection override keeps the context hidden.
    pub fn reveal_all(&mut self, key: BadgeKey, scope: &ImageScope<'_>, store: &mut VisibilityStore) -> ClickOutcome {
        if !scope.image().nsfw {
            return ClickOutcome::Ignored;
        }
        if !scope.viewer().authenticated {
            return self.flip_prompt(key);
        }

        let context = scope.context();
        let hidden_before = hidden_count(context, store);
        store.reveal_images(&context.image_ids());
        let count = hidden_before.saturating_sub(hidden_count(context, store));

        if count == 0 {
            debug!(image_id = scope.image().id, "reveal all left the context unchanged");
        }
        ClickOutcome::Revealed { count }
    }

    fn flip_prompt(&mut self, key: BadgeKey) -> ClickOutcome {
        if self.open_prompts.remove(&key) {
            debug!(slot = key.slot, image_id = key.image, "closed sign-in prompt");
            ClickOutcome::PromptClosed
        } else {
            self.open_prompts.insert(key);
            info!(slot = key.slot, image_id = key.image, "adult content requires sign-in");
            ClickOutcome::PromptOpened
        }
    }
}

fn hidden_count(context: &GuardContext, store: &VisibilityStore) -> usize {
    context
        .scopes()
        .filter(|scope| !disposition(scope, store).is_visible())
        .count()
}
