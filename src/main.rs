use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use image_guard::config::Settings;
use image_guard::gate::context::require;
use image_guard::gate::{BadgeKey, ClickOutcome, DisclosureGate, GuardContext};
use image_guard::logging::setup_logging;
use image_guard::state::data::ImageId;
use image_guard::state::feed::{load_feed_async, Feed};
use image_guard::state::visibility::VisibilityStore;
use image_guard::GateError;

mod ui;

/// Main application state
struct Gallery {
    settings: Settings,
    /// Images handed over by the data layer
    feed: Feed,
    /// Reveal flags for the whole session
    store: VisibilityStore,
    gate: DisclosureGate,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// Click on the "18+" badge of an image
    BadgeClicked { group: usize, image: ImageId },
    /// Click on a card's "Reveal all" button
    RevealAll { group: usize, image: ImageId },
    /// Click on the tile itself
    OpenImage(ImageId),
    /// Sign-in link from the prompt
    Login(String),
    /// User clicked the "Open Feed" button
    OpenFeed,
    /// Background feed loading completed
    FeedLoaded(Result<Feed, String>),
}

impl Gallery {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // Load viewer settings, the app still works with defaults
        let settings = Settings::load().unwrap_or_else(|err| {
            warn!("falling back to default settings: {err}");
            Settings::default()
        });

        // One visibility store for the whole session
        let mut store = VisibilityStore::new();
        store.subscribe(|change| debug!(?change, "visibility changed"));

        let gate = DisclosureGate::new(settings.auth_path.clone());

        // Start with the demo feed, replaced once the configured feed loads
        let task = match settings.feed_path.clone() {
            Some(path) => load_feed(path),
            None => Task::none(),
        };

        let feed = Feed::demo();
        let status = format!("Ready. {} images in feed.", feed.image_count());
        info!(viewer = ?settings.viewer, "image guard initialized");

        (
            Gallery {
                settings,
                feed,
                store,
                gate,
                status,
            },
            task,
        )
    }

    /// Gating context of one feed group, rebuilt on every pass
    fn context(&self, group: usize) -> Option<GuardContext> {
        self.feed
            .groups
            .get(group)
            .map(|group| GuardContext::new(&group.images, group.connect, self.settings.viewer))
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::BadgeClicked { group, image } => {
                // Rebuild the context the badge was rendered in
                let context = self.context(group);
                let key = BadgeKey::new(group, image);

                // Let the gate decide: toggle, open the sign-in prompt, or nothing
                let outcome = require(context.as_ref())
                    .and_then(|context| context.scope(image))
                    .map(|scope| self.gate.click(key, &scope, &mut self.store));
                self.report(outcome);
            }
            Message::RevealAll { group, image } => {
                let context = self.context(group);
                let key = BadgeKey::new(group, image);

                // Anonymous viewers get the prompt on the first adult tile instead
                let outcome = require(context.as_ref())
                    .and_then(|context| context.scope(image))
                    .map(|scope| self.gate.reveal_all(key, &scope, &mut self.store));
                self.report(outcome);
            }
            Message::OpenImage(id) => {
                info!(image_id = id, "opened image");
                self.status = format!("Opened image #{id}");
            }
            Message::Login(href) => {
                // Navigation belongs to the host, we only hand over the link.
                info!(%href, "navigating to sign-in");
                self.status = format!("Sign in at {href}");
            }
            Message::OpenFeed => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select Image Feed")
                    .add_filter("Image feed", &["json"])
                    .pick_file();

                if let Some(path) = file {
                    // Update status, then load the feed in the background
                    self.status = format!("Loading {}...", path.display());
                    return load_feed(path);
                }
            }
            Message::FeedLoaded(Ok(feed)) => {
                // Contexts are rebuilt from the new feed on the next view,
                // open prompts belonged to the old groups
                self.gate.close_all_prompts();
                self.status = format!("Loaded {} images in {} groups.", feed.image_count(), feed.groups.len());
                self.feed = feed;
            }
            Message::FeedLoaded(Err(err)) => {
                warn!("failed to load feed: {err}");
                self.status = format!("Failed to load feed: {err}");
            }
        }

        Task::none()
    }

    fn report(&mut self, outcome: Result<ClickOutcome, GateError>) {
        match outcome {
            Ok(ClickOutcome::Toggled { revealed, .. }) => {
                self.status = if revealed {
                    "Showing adult content".to_string()
                } else {
                    "Hiding adult content".to_string()
                };
            }
            Ok(ClickOutcome::Revealed { count: 0 }) => {
                // A hidden connection still overrides the per-image reveals
                self.status = "No visible change, the group is hidden".to_string();
            }
            Ok(ClickOutcome::Revealed { count }) => {
                self.status = format!("Revealed {count} images");
            }
            Ok(ClickOutcome::PromptOpened | ClickOutcome::PromptClosed | ClickOutcome::Ignored) => {}
            Err(err) => {
                // The feed changed under a queued click.
                warn!("dropped badge click: {err}");
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let card_view = ui::card::CardView {
            store: &self.store,
            gate: &self.gate,
            settings: &self.settings,
        };

        // One card per feed group, each with a fresh gating context
        let cards = self.feed.groups.iter().enumerate().map(|(index, group)| {
            let context = GuardContext::new(&group.images, group.connect, self.settings.viewer);
            ui::card::card(&card_view, index, group.title.as_deref(), &context)
        });

        let header = row![
            text("Image Guard").size(32),
            button("Open Feed").on_press(Message::OpenFeed).padding(10),
        ]
        .spacing(20);

        let content: Column<Message> = cards
            .fold(column![header, text(&self.status).size(16)], |content, card| content.push(card))
            .spacing(20)
            .padding(30);

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn load_feed(path: PathBuf) -> Task<Message> {
    Task::perform(load_feed_async(path), |result| {
        Message::FeedLoaded(result.map_err(|err| err.to_string()))
    })
}

fn main() -> iced::Result {
    setup_logging();

    iced::application("Image Guard", Gallery::update, Gallery::view)
        .theme(Gallery::theme)
        .centered()
        .run_with(Gallery::new)
}
