use crate::app::Message;
use crate::utils::display::severity_color;
use iced::widget::{button, center, column, container, opaque, stack, text};
use iced::{Color, Element, Length};
use relay_picker_core::notice::Notice;
use relay_picker_core::selection::{Level, SelectionEvent};

/// A list item; presses are disabled while `is_locked`.
pub fn choice_button(
    level: Level,
    item: &str,
    is_active: bool,
    is_locked: bool,
) -> button::Button<'_, Message> {
    button(text(item).size(14))
        .width(Length::Fill)
        .padding(5)
        .style(if is_active {
            button::primary
        } else {
            button::secondary
        })
        .on_press_maybe((!is_locked).then(|| {
            Message::Selection(SelectionEvent::for_level(level, item.to_string()))
        }))
}

pub fn secure_button(is_dispatching: bool) -> button::Button<'static, Message> {
    let label = if is_dispatching {
        "Securing..."
    } else {
        "Secure my connection"
    };

    button(text(label).size(16))
        .width(Length::Fill)
        .padding([10, 20])
        .style(button::primary)
        .on_press_maybe((!is_dispatching).then_some(Message::SecureConnection))
}

pub fn notice_card(notice: &Notice) -> Element<'_, Message> {
    let body = text(notice.body.as_str())
        .size(14)
        .color(severity_color(notice.severity));

    container(
        column![
            text(notice.title.as_str()).size(20),
            body,
            button(text("OK").size(14))
                .padding([6, 20])
                .style(button::primary)
                .on_press(Message::DismissNotice),
        ]
        .spacing(15),
    )
    .width(Length::Fixed(420.0))
    .padding(20)
    .style(container::rounded_box)
    .into()
}

/// Lays `content` over `base`, blocking interaction with `base` until the
/// overlay goes away.
pub fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(center(opaque(content)).style(|_theme| container::Style {
            background: Some(
                Color {
                    a: 0.8,
                    ..Color::BLACK
                }
                .into(),
            ),
            ..container::Style::default()
        }))
    ]
    .into()
}
