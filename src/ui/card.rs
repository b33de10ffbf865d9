use iced::widget::{button, column, container, mouse_area, row, stack, text, Column, Space};
use iced::{Element, Length};
use iced_aw::Wrap;

use image_guard::config::Settings;
use image_guard::gate::disclosure::{badge_state, BadgeKey, BadgePosition, DisclosureGate};
use image_guard::gate::{placeholder, protected, GuardContext, ImageScope};
use image_guard::state::visibility::VisibilityStore;

use crate::ui::{badge::badge, prompt::prompt};
use crate::Message;

const TILE_WIDTH: f32 = 180.0;
const TILE_HEIGHT: f32 = 120.0;

/// Everything a card needs to read while rendering
pub struct CardView<'s> {
    pub store: &'s VisibilityStore,
    pub gate: &'s DisclosureGate,
    pub settings: &'s Settings,
}

/// A feed group rendered as a card of image tiles
pub fn card<'a>(view: &CardView<'_>, group: usize, title: Option<&str>, context: &GuardContext) -> Element<'a, Message> {
    let title = title.map(str::to_string).unwrap_or_else(|| format!("Group {}", group + 1));

    // Title, plus "Reveal all" when the group has adult images
    let mut header = row![text(title).size(20), Space::with_width(Length::Fill)].spacing(10);
    if let Some(first_nsfw) = context.scopes().find(|scope| scope.image().nsfw) {
        header = header.push(
            button(text("Reveal all").size(12))
                .padding([2, 8])
                .on_press(Message::RevealAll {
                    group,
                    image: first_nsfw.image().id,
                }),
        );
    }

    // Tiles wrap onto new lines as the window narrows
    let tiles = context.render(|scope, _| tile(view, group, scope));

    let content = column![header, Wrap::with_elements(tiles).spacing(12.0).line_spacing(12.0)].spacing(12);

    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}

/// One image: protected content or placeholder, with badge and prompt on top
fn tile<'a>(view: &CardView<'_>, group: usize, scope: ImageScope<'_>) -> Element<'a, Message> {
    let image = scope.image();
    let label = image.label();

    // Exactly one of the two slots renders for an adult image
    let body: Column<'a, Message> = column![]
        .push_maybe(protected(&scope, view.store, || text(label).size(16)))
        .push_maybe(placeholder(&scope, view.store, || {
            text("Adult content hidden").size(14)
        }))
        .spacing(4);

    // Clicking the tile itself opens the image
    let base = mouse_area(
        container(body)
            .padding(10)
            .center_x(Length::Fixed(TILE_WIDTH))
            .center_y(Length::Fixed(TILE_HEIGHT))
            .style(container::bordered_box),
    )
    .on_press(Message::OpenImage(image.id));

    // Badge and its sign-in prompt are layered on top of the tile
    let key = BadgeKey::new(group, image.id);
    let state = badge_state(&scope, view.store);
    let overlay: Column<'a, Message> = column![]
        .push_maybe(badge(
            state,
            BadgePosition::TopLeft,
            Message::BadgeClicked {
                group,
                image: image.id,
            },
        ))
        .push_maybe(
            view.gate
                .is_prompt_open(key)
                .then(|| prompt(view.gate.prompt(&view.settings.current_path))),
        );

    stack![base, overlay]
        .width(Length::Fixed(TILE_WIDTH))
        .height(Length::Fixed(TILE_HEIGHT))
        .into()
}
