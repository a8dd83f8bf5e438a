mod app;
mod ui;
mod utils;

use app::RelayPicker;

pub fn main() -> iced::Result {
    tracing_subscriber::fmt::init();

    iced::application(RelayPicker::title, RelayPicker::update, RelayPicker::view)
        .theme(RelayPicker::theme)
        .window_size((800.0, 400.0))
        .centered()
        .run()
}
