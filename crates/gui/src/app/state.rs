use crate::app::Message;
use iced::{Color, Element, Task, Theme};
use log::{debug, info, warn};
use relay_picker_core::dispatch::Dispatcher;
use relay_picker_core::file_handling;
use relay_picker_core::notice::Notice;
use relay_picker_core::selection::{CascadingSelector, SelectionEvent};

pub struct RelayPicker {
    pub selector: Option<CascadingSelector>,
    pub load_error: Option<String>,
    pub dispatcher: Dispatcher,
    pub notice: Option<Notice>,
    /// Set while the client runs; no second dispatch starts until it clears.
    pub is_dispatching: bool,
}

impl RelayPicker {
    pub fn title(&self) -> String {
        "Mullvad VPN".to_string()
    }

    pub fn theme(&self) -> Theme {
        Theme::custom(
            "Mullvad Dark".to_string(),
            iced::theme::Palette {
                background: Color::from_rgb8(0x24, 0x24, 0x24),
                text: Color::WHITE,
                primary: Color::from_rgb8(0x19, 0x76, 0xD2),
                success: Color::from_rgb8(0x0D, 0x47, 0xA1),
                danger: Color::from_rgb8(0xE5, 0x39, 0x35),
            },
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Selection(event) => {
                self.apply_selection(event);
                Task::none()
            }
            Message::SecureConnection => self.secure_connection(),
            Message::Dispatched(notice) => {
                self.is_dispatching = false;
                self.notice = Some(notice);
                Task::none()
            }
            Message::DismissNotice => {
                self.notice = None;
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<Message> {
        crate::ui::views::main_view(self)
    }

    fn apply_selection(&mut self, event: SelectionEvent) {
        // The running command was built from the current selection.
        if self.is_dispatching {
            debug!("Ignoring {event:?} while the client runs");
            return;
        }

        let Some(selector) = self.selector.as_mut() else {
            return;
        };

        // The lists only offer valid items, so this means the lists and the
        // selector went out of sync.
        if let Err(e) = selector.apply(event) {
            warn!("Rejected selection: {e}");
            self.notice = Some(Notice::error("Error", e.to_string()));
        }
    }

    fn secure_connection(&mut self) -> Task<Message> {
        if self.is_dispatching {
            return Task::none();
        }

        let Some(selector) = &self.selector else {
            return Task::none();
        };

        match self.dispatcher.prepare(selector.current_selection()) {
            Ok(invocation) => {
                info!("Securing connection with `{invocation}`");
                self.is_dispatching = true;
                let dispatcher = self.dispatcher.clone();
                Task::perform(
                    async move { Notice::from_dispatch(dispatcher.run(&invocation)) },
                    Message::Dispatched,
                )
            }
            Err(e) => {
                self.notice = Some(Notice::from_dispatch(Err(e)));
                Task::none()
            }
        }
    }
}

impl Default for RelayPicker {
    fn default() -> Self {
        let (selector, load_error) = match file_handling::resolve_location_table(&None) {
            Ok(table) => (Some(CascadingSelector::new(table)), None),
            Err(e) => {
                warn!("Failed to load locations: {e}");
                (None, Some(e.to_string()))
            }
        };

        Self {
            selector,
            load_error,
            dispatcher: Dispatcher::default(),
            notice: None,
            is_dispatching: false,
        }
    }
}
