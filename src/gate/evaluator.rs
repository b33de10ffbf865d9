//! Effective visibility of a guarded image
//!
//! Precedence: connection override, then image override, then hidden.
//! Images that are not effectively adult are always visible.

use crate::state::data::{Connection, GuardedImage, ImageId};
use crate::state::visibility::VisibilityStore;

use super::context::ImageScope;

/// Outcome of evaluating an image against the gating rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    Visible,
    Hidden,
}

impl Disposition {
    fn from_revealed(revealed: bool) -> Self {
        if revealed {
            Disposition::Visible
        } else {
            Disposition::Hidden
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, Disposition::Visible)
    }
}

/// Whether the store currently reveals `image_id`.
///
/// An entry for the connection, `true` or `false`, always wins over the
/// image's own entry.
pub fn is_revealed(image_id: ImageId, connect: Option<&Connection>, store: &VisibilityStore) -> bool {
    connect
        .and_then(|connection| store.connection_revealed(connection))
        .or_else(|| store.image_revealed(image_id))
        .unwrap_or(false)
}

pub fn evaluate(image: &GuardedImage, connect: Option<&Connection>, store: &VisibilityStore) -> Disposition {
    if !image.nsfw {
        return Disposition::Visible;
    }

    Disposition::from_revealed(is_revealed(image.id, connect, store))
}

/// Evaluate the image of a scope against its context's connection
pub fn disposition(scope: &ImageScope<'_>, store: &VisibilityStore) -> Disposition {
    evaluate(scope.image(), scope.connect(), store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::context::GuardContext;
    use crate::state::data::{EntityType, ImageDescriptor, Viewer};

    fn image(id: ImageId, nsfw: bool) -> GuardedImage {
        GuardedImage::resolve(&ImageDescriptor::new(id, nsfw), &Viewer::signed_in(true)).unwrap()
    }

    #[test]
    fn test_non_adult_always_visible() {
        let safe = image(1, false);
        let connect = Connection::new(EntityType::Model, 1);
        let mut store = VisibilityStore::new();

        assert_eq!(evaluate(&safe, None, &store), Disposition::Visible);

        store.toggle_image(1);
        store.toggle_image(1);
        store.toggle_connection(&connect);
        store.toggle_connection(&connect);

        assert_eq!(evaluate(&safe, None, &store), Disposition::Visible);
        assert_eq!(evaluate(&safe, Some(&connect), &store), Disposition::Visible);
    }

    #[test]
    fn test_blur_preference_disables_gating() {
        let descriptor = ImageDescriptor::new(5, true);
        let unblurred = GuardedImage::resolve(&descriptor, &Viewer::signed_in(false)).unwrap();
        let store = VisibilityStore::new();
        assert_eq!(evaluate(&unblurred, None, &store), Disposition::Visible);
    }

    #[test]
    fn test_adult_hidden_by_default() {
        let store = VisibilityStore::new();
        assert_eq!(evaluate(&image(1, true), None, &store), Disposition::Hidden);

        let connect = Connection::new(EntityType::Model, 9);
        assert_eq!(evaluate(&image(1, true), Some(&connect), &store), Disposition::Hidden);
    }

    #[test]
    fn test_toggle_flips_disposition() {
        let adult = image(42, true);
        let mut store = VisibilityStore::new();

        for _ in 0..4 {
            let before = evaluate(&adult, None, &store);
            store.toggle_image(42);
            assert_ne!(evaluate(&adult, None, &store), before);
        }
    }

    #[test]
    fn test_connection_overrides_image() {
        let adult = image(42, true);
        let connect = Connection::new(EntityType::Model, 7);
        let mut store = VisibilityStore::new();

        // image explicitly hidden, connection revealed
        store.toggle_image(42);
        store.toggle_image(42);
        store.toggle_connection(&connect);
        assert_eq!(evaluate(&adult, Some(&connect), &store), Disposition::Visible);

        // connection explicitly hidden beats an image reveal
        store.toggle_image(42);
        store.toggle_connection(&connect);
        assert_eq!(store.image_revealed(42), Some(true));
        assert_eq!(evaluate(&adult, Some(&connect), &store), Disposition::Hidden);

        // without the connection the image flag applies
        assert_eq!(evaluate(&adult, None, &store), Disposition::Visible);
    }

    #[test]
    fn test_precedence_exhaustive() {
        let adult = image(8, true);
        let connect = Connection::new(EntityType::ModelVersion, 8);
        let states = [None, Some(false), Some(true)];

        for group in states {
            for single in states {
                let mut store = VisibilityStore::new();
                set_image(&mut store, 8, single);
                set_connection(&mut store, &connect, group);

                let expected = match (group, single) {
                    (Some(g), _) => g,
                    (None, Some(i)) => i,
                    (None, None) => false,
                };
                assert_eq!(
                    evaluate(&adult, Some(&connect), &store).is_visible(),
                    expected,
                    "group={group:?} image={single:?}"
                );
            }
        }
    }

    #[test]
    fn test_disposition_uses_scope_connection() {
        let connect = Connection::new(EntityType::User, 3);
        let context = GuardContext::new(
            &[ImageDescriptor::new(1, true)],
            Some(connect),
            Viewer::signed_in(true),
        );
        let mut store = VisibilityStore::new();
        let scope = context.scope(1).unwrap();

        assert_eq!(disposition(&scope, &store), Disposition::Hidden);
        store.toggle_connection(&connect);
        assert_eq!(disposition(&scope, &store), Disposition::Visible);
    }

    fn set_image(store: &mut VisibilityStore, id: ImageId, value: Option<bool>) {
        match value {
            None => {}
            Some(true) => {
                store.toggle_image(id);
            }
            Some(false) => {
                store.toggle_image(id);
                store.toggle_image(id);
            }
        }
    }

    fn set_connection(store: &mut VisibilityStore, connect: &Connection, value: Option<bool>) {
        match value {
            None => {}
            Some(true) => {
                store.toggle_connection(connect);
            }
            Some(false) => {
                store.toggle_connection(connect);
                store.toggle_connection(connect);
            }
        }
    }
}
