use crate::app::{Message, RelayPicker};
use crate::ui::components;
use crate::utils::display::empty_list_hint;
use iced::widget::{column, container, scrollable, text, Column, Row};
use iced::{Center, Element, Length};
use relay_picker_core::selection::{CascadingSelector, Level};

pub fn main_view(app: &RelayPicker) -> Element<Message> {
    let content = match &app.selector {
        Some(selector) => picker_view(selector, app.is_dispatching),
        None => load_error_view(app.load_error.as_deref()),
    };

    let content = container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(10);

    match &app.notice {
        Some(notice) => components::modal(content, components::notice_card(notice)),
        None => content.into(),
    }
}

fn picker_view(selector: &CascadingSelector, is_dispatching: bool) -> Element<Message> {
    let lists = Level::ALL
        .into_iter()
        .fold(Row::new().spacing(10), |row, level| {
            row.push(level_column(selector, level, is_dispatching))
        })
        .height(Length::Fill);

    column![
        text("Mullvad VPN").size(22),
        lists,
        components::secure_button(is_dispatching),
    ]
    .spacing(10)
    .into()
}

fn level_column(
    selector: &CascadingSelector,
    level: Level,
    is_dispatching: bool,
) -> Element<Message> {
    let list = selector.list(level);

    let body: Element<Message> = if list.is_empty() {
        text(empty_list_hint(level)).size(14).into()
    } else {
        let buttons = list.items().iter().enumerate().fold(
            Column::new().spacing(5).padding(5),
            |column, (index, item)| {
                column.push(components::choice_button(
                    level,
                    item.as_str(),
                    list.is_active(index),
                    is_dispatching,
                ))
            },
        );
        scrollable(buttons).height(Length::Fill).into()
    };

    container(column![text(level.title()).size(16), body].spacing(8))
        .width(Length::FillPortion(1))
        .height(Length::Fill)
        .padding(10)
        .style(container::bordered_box)
        .into()
}

fn load_error_view(error: Option<&str>) -> Element<Message> {
    Column::new()
        .spacing(10)
        .push(text("Could not load the location table").size(18))
        .push(text(error.unwrap_or("Unknown error").to_string()).size(14))
        .align_x(Center)
        .width(Length::Fill)
        .into()
}
