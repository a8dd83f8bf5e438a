use relay_picker_core::notice::Notice;
use relay_picker_core::selection::SelectionEvent;

#[derive(Debug, Clone)]
pub enum Message {
    Selection(SelectionEvent),
    SecureConnection,
    Dispatched(Notice),
    DismissNotice,
}
