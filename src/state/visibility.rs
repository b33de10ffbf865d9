//! Session-wide reveal state for adult images
//!
//! One store lives for the whole session and is shared by every rendered
//! image, badge and slot. Entries are only ever flipped or set, never
//! removed. Subscribers are notified synchronously after each mutation,
//! so every consumer observes the same update in the same pass.

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use super::data::{Connection, ConnectionKey, ImageId};

/// A committed change to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityChange {
    Image { id: ImageId, revealed: bool },
    Images { ids: Vec<ImageId> },
    Connection { key: ConnectionKey, revealed: bool },
}

/// Handle returned by [`VisibilityStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&VisibilityChange)>;

/// Reveal flags for individual images and for connections
#[derive(Default)]
pub struct VisibilityStore {
    image_reveals: HashMap<ImageId, bool>,
    connection_reveals: HashMap<ConnectionKey, bool>,
    /// Bumped once per committed change
    revision: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl VisibilityStore {
    /// Create an empty store (start of a session)
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the reveal flag of one image. Absent counts as hidden,
    /// so the first toggle reveals. Returns the new flag.
    pub fn toggle_image(&mut self, id: ImageId) -> bool {
        let entry = self.image_reveals.entry(id).or_insert(false);
        *entry = !*entry;
        let revealed = *entry;

        debug!(image_id = id, revealed, "toggled image");
        self.commit(VisibilityChange::Image { id, revealed });
        revealed
    }

    /// Reveal every image in `ids`. Already revealed images stay revealed.
    pub fn reveal_images(&mut self, ids: &[ImageId]) {
        if ids.is_empty() {
            return;
        }

        for id in ids {
            self.image_reveals.insert(*id, true);
        }

        debug!(count = ids.len(), "revealed images");
        self.commit(VisibilityChange::Images { ids: ids.to_vec() });
    }

    /// Flip the reveal flag of a connection. Returns the new flag.
    pub fn toggle_connection(&mut self, connection: &Connection) -> bool {
        let key = connection.key();
        let entry = self.connection_reveals.entry(key.clone()).or_insert(false);
        *entry = !*entry;
        let revealed = *entry;

        debug!(connection = %key, revealed, "toggled connection");
        self.commit(VisibilityChange::Connection { key, revealed });
        revealed
    }

    /// Per-image override, `None` if the image was never touched
    pub fn image_revealed(&self, id: ImageId) -> Option<bool> {
        self.image_reveals.get(&id).copied()
    }

    /// Per-connection override, `None` if the connection was never touched
    pub fn connection_revealed(&self, connection: &Connection) -> Option<bool> {
        self.connection_reveals.get(&connection.key()).copied()
    }

    /// Number of committed changes since the session started
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Register a callback invoked after every committed change
    pub fn subscribe(&mut self, subscriber: impl FnMut(&VisibilityChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// The mutation is already applied when subscribers run.
    fn commit(&mut self, change: VisibilityChange) {
        self.revision += 1;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&change);
        }
    }
}

impl fmt::Debug for VisibilityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityStore")
            .field("image_reveals", &self.image_reveals)
            .field("connection_reveals", &self.connection_reveals)
            .field("revision", &self.revision)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::EntityType;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_toggle_image_flips() {
        let mut store = VisibilityStore::new();
        assert_eq!(store.image_revealed(42), None);

        assert!(store.toggle_image(42));
        assert_eq!(store.image_revealed(42), Some(true));

        assert!(!store.toggle_image(42));
        assert_eq!(store.image_revealed(42), Some(false));

        assert!(store.toggle_image(42));
    }

    #[test]
    fn test_toggle_unknown_ids() {
        let mut store = VisibilityStore::new();
        assert!(store.toggle_image(-5));
        assert!(store.toggle_image(i64::MAX));
        assert_eq!(store.image_revealed(0), None);
    }

    #[test]
    fn test_reveal_images_is_idempotent() {
        let mut store = VisibilityStore::new();
        store.toggle_image(2);
        store.toggle_image(2);
        assert_eq!(store.image_revealed(2), Some(false));

        store.reveal_images(&[1, 2, 3]);
        store.reveal_images(&[3, 1]);

        for id in [1, 2, 3] {
            assert_eq!(store.image_revealed(id), Some(true));
        }
    }

    #[test]
    fn test_toggle_connection_flips() {
        let mut store = VisibilityStore::new();
        let model = Connection::new(EntityType::Model, 7);
        let review = Connection::new(EntityType::Review, 7);

        assert!(store.toggle_connection(&model));
        assert_eq!(store.connection_revealed(&model), Some(true));
        assert_eq!(store.connection_revealed(&review), None);

        assert!(!store.toggle_connection(&model));
        assert_eq!(store.connection_revealed(&model), Some(false));
    }

    #[test]
    fn test_subscribers_see_committed_state() {
        let mut store = VisibilityStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        store.subscribe(move |change| first.borrow_mut().push(("first", change.clone())));
        let second = Rc::clone(&seen);
        store.subscribe(move |change| second.borrow_mut().push(("second", change.clone())));

        store.toggle_image(42);

        let expected = VisibilityChange::Image {
            id: 42,
            revealed: true,
        };
        assert_eq!(
            *seen.borrow(),
            vec![("first", expected.clone()), ("second", expected)]
        );
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = VisibilityStore::new();
        let count = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&count);
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        store.toggle_image(1);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.toggle_image(1);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_empty_reveal_is_not_a_change() {
        let mut store = VisibilityStore::new();
        store.reveal_images(&[]);
        assert_eq!(store.revision(), 0);
    }
}
