use iced::alignment::Horizontal;
use iced::widget::{button, container, text};
use iced::{Element, Length, Theme};

use image_guard::gate::disclosure::{BadgePosition, BadgeState};

use crate::Message;

/// The "18+" badge placed over a guarded image
///
/// The badge always publishes `on_press`, even when the click will be
/// ignored, so the press is captured here and never reaches the tile below.
pub fn badge<'a>(state: BadgeState, position: BadgePosition, on_press: Message) -> Option<Element<'a, Message>> {
    let label = match state {
        BadgeState::NotApplicable => return None,
        BadgeState::InteractiveHidden => "18+ | show",
        BadgeState::InteractiveShown => "18+ | hide",
        BadgeState::LockedPendingAuth | BadgeState::Informational => "18+",
    };

    let style: fn(&Theme, button::Status) -> button::Style = if state.is_toggleable() || state == BadgeState::LockedPendingAuth {
        button::danger
    } else {
        button::secondary
    };

    let badge = button(text(label).size(12))
        .padding([2, 6])
        .style(style)
        .on_press(on_press);

    let placed = match position {
        BadgePosition::Static => return Some(badge.into()),
        BadgePosition::TopLeft => container(badge).align_x(Horizontal::Left),
        BadgePosition::TopRight => container(badge).align_x(Horizontal::Right),
    };

    Some(placed.width(Length::Fill).padding(6).into())
}
