//! Shared data structures for the gating engine
//!
//! These structs represent the data model that flows between
//! the data-fetching layer, the gating engine and the UI layer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of an image as handed out by the data-fetching layer
pub type ImageId = i64;

/// A single image as supplied by the data-fetching layer
///
/// Only `id` and `nsfw` matter to the guard. Every other field
/// (url, name, hash, dimensions, ...) is kept opaque in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Unique ID (descriptors without one are skipped by the guard)
    #[serde(default)]
    pub id: Option<ImageId>,
    /// Intrinsic adult content flag, absent means `false`
    #[serde(default)]
    pub nsfw: Option<bool>,
    /// Remaining fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageDescriptor {
    /// Create a descriptor with no opaque fields
    pub fn new(id: ImageId, nsfw: bool) -> Self {
        Self {
            id: Some(id),
            nsfw: Some(nsfw),
            extra: Map::new(),
        }
    }

    /// Attach a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.extra.insert("name".to_string(), Value::String(name.into()));
        self
    }

    /// Display name, if the data layer supplied one
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }
}

/// An image resolved against the viewer's preferences
///
/// Built once per gating context and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardedImage {
    pub id: ImageId,
    /// Effective adult flag: intrinsic flag AND viewer blurs adult content
    pub nsfw: bool,
    /// Intrinsic adult flag, before the viewer's preference is applied
    pub image_nsfw: bool,
    pub descriptor: ImageDescriptor,
}

impl GuardedImage {
    /// Resolve a descriptor for a viewer. Returns `None` when the
    /// descriptor has no id. Id 0 is treated as unset.
    pub fn resolve(descriptor: &ImageDescriptor, viewer: &Viewer) -> Option<Self> {
        let id = descriptor.id.filter(|id| *id != 0)?;
        let image_nsfw = descriptor.nsfw.unwrap_or(false);

        Some(Self {
            id,
            nsfw: image_nsfw && viewer.should_blur(),
            image_nsfw,
            descriptor: descriptor.clone(),
        })
    }

    /// Label used by the gallery when no name is available
    pub fn label(&self) -> String {
        match self.descriptor.name() {
            Some(name) => name.to_string(),
            None => format!("Image #{}", self.id),
        }
    }
}

/// Kind of entity owning a group of images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Model,
    ModelVersion,
    Review,
    User,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Model => "model",
            EntityType::ModelVersion => "modelVersion",
            EntityType::Review => "review",
            EntityType::User => "user",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group of images sharing a logical owner (e.g. a model card)
///
/// Lets the owner reveal or hide all of its images at once, even those
/// it has not loaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub entity_type: EntityType,
    pub entity_id: i64,
}

impl Connection {
    pub fn new(entity_type: EntityType, entity_id: i64) -> Self {
        Self {
            entity_type,
            entity_id,
        }
    }

    /// Key under which the visibility store tracks this connection
    pub fn key(&self) -> ConnectionKey {
        // Entity type names never contain '_', so the pair maps to a unique key.
        ConnectionKey(format!("{}_{}", self.entity_id, self.entity_type))
    }
}

/// Serialized connection identity, `<entityId>_<entityType>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionKey(String);

impl ConnectionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The viewer as reported by the session/identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewer {
    /// Signed in
    pub authenticated: bool,
    /// Personal preference: blur adult content
    pub blur_nsfw: bool,
    pub is_moderator: bool,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl Viewer {
    /// A viewer without a session. Adult content is always blurred.
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            blur_nsfw: true,
            is_moderator: false,
        }
    }

    pub fn signed_in(blur_nsfw: bool) -> Self {
        Self {
            authenticated: true,
            blur_nsfw,
            is_moderator: false,
        }
    }

    pub fn moderator(blur_nsfw: bool) -> Self {
        Self {
            authenticated: true,
            blur_nsfw,
            is_moderator: true,
        }
    }

    /// Whether adult images are gated for this viewer
    pub fn should_blur(&self) -> bool {
        !self.authenticated || self.blur_nsfw
    }

    /// Whether clicking a badge may flip visibility
    pub fn toggleable(&self) -> bool {
        self.authenticated && self.blur_nsfw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_key_is_deterministic() {
        let model = Connection::new(EntityType::Model, 7);
        assert_eq!(model.key(), model.key());
        assert_eq!(model.key().as_str(), "7_model");
    }

    #[test]
    fn test_connection_key_differs_per_entity_type() {
        let model = Connection::new(EntityType::Model, 7);
        let review = Connection::new(EntityType::Review, 7);
        assert_ne!(model.key(), review.key());
        assert_eq!(review.key().as_str(), "7_review");
    }

    #[test]
    fn test_connection_keys_do_not_collide() {
        let types = [
            EntityType::Model,
            EntityType::ModelVersion,
            EntityType::Review,
            EntityType::User,
        ];
        let mut keys = std::collections::HashSet::new();
        for entity_type in types {
            for entity_id in [0, 1, 7, 11, 71] {
                assert!(keys.insert(Connection::new(entity_type, entity_id).key()));
            }
        }
    }

    #[test]
    fn test_effective_nsfw_follows_blur_preference() {
        let descriptor = ImageDescriptor::new(1, true);

        let blurred = GuardedImage::resolve(&descriptor, &Viewer::signed_in(true)).unwrap();
        assert!(blurred.nsfw);
        assert!(blurred.image_nsfw);

        let unblurred = GuardedImage::resolve(&descriptor, &Viewer::signed_in(false)).unwrap();
        assert!(!unblurred.nsfw);
        assert!(unblurred.image_nsfw);
    }

    #[test]
    fn test_anonymous_viewer_always_blurs() {
        let viewer = Viewer::anonymous();
        assert!(viewer.should_blur());
        assert!(!viewer.toggleable());

        let image = GuardedImage::resolve(&ImageDescriptor::new(3, true), &viewer).unwrap();
        assert!(image.nsfw);
    }

    #[test]
    fn test_descriptor_without_id_is_skipped() {
        let descriptor: ImageDescriptor =
            serde_json::from_str(r#"{"nsfw": true, "url": "a.png"}"#).unwrap();
        assert!(GuardedImage::resolve(&descriptor, &Viewer::anonymous()).is_none());
    }

    #[test]
    fn test_descriptor_with_zero_id_is_skipped() {
        let descriptor = ImageDescriptor::new(0, true);
        assert!(GuardedImage::resolve(&descriptor, &Viewer::signed_in(true)).is_none());
        assert!(GuardedImage::resolve(&ImageDescriptor::new(-1, true), &Viewer::anonymous()).is_some());
    }

    #[test]
    fn test_descriptor_keeps_opaque_fields() {
        let descriptor: ImageDescriptor =
            serde_json::from_str(r#"{"id": 9, "name": "sunset", "width": 512}"#).unwrap();
        assert_eq!(descriptor.nsfw, None);
        assert_eq!(descriptor.name(), Some("sunset"));
        assert_eq!(descriptor.extra.get("width"), Some(&Value::from(512)));

        let image = GuardedImage::resolve(&descriptor, &Viewer::anonymous()).unwrap();
        assert!(!image.nsfw);
        assert_eq!(image.label(), "sunset");
    }

    #[test]
    fn test_connection_deserializes_camel_case() {
        let connect: Connection =
            serde_json::from_str(r#"{"entityType": "modelVersion", "entityId": 12}"#).unwrap();
        assert_eq!(connect, Connection::new(EntityType::ModelVersion, 12));
        assert_eq!(connect.key().as_str(), "12_modelVersion");
    }
}
