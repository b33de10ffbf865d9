use iced::widget::{button, column, container, text};
use iced::{Element, Length};

use image_guard::gate::disclosure::AuthPrompt;

use crate::Message;

/// Inline prompt asking an anonymous viewer to sign in
pub fn prompt<'a>(prompt: AuthPrompt) -> Element<'a, Message> {
    let content = column![
        text(prompt.message).size(13),
        button(text("Login").size(12))
            .padding([4, 10])
            .on_press(Message::Login(prompt.login_href)),
    ]
    .spacing(6);

    container(content)
        .padding(8)
        .width(Length::Fixed(170.0))
        .style(container::rounded_box)
        .into()
}
