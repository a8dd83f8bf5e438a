use std::io::{stdout, Write};
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::event::{
    DisableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::style::Color::{DarkBlue, DarkGreen, Reset, Yellow};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{event, execute, queue, terminal, ExecutableCommand};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use itertools::Itertools;
use log::debug;

use super::types::{
    column_index, next_level, previous_level, CycleDirection, PickerAction, PickerChoice, UiState,
};
use relay_picker_core::error::{Error, Result};
use relay_picker_core::notice::INCOMPLETE_SELECTION_MESSAGE;
use relay_picker_core::selection::{CascadingSelector, Level, SelectionEvent};

/// Row of the first list item; row 0 is the header, row 1 the column titles.
const FIRST_ITEM_ROW: u16 = 2;

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Disable raw mode on drop
        let _ = disable_raw_mode();
        let mut stdout = stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

/// Indexes of the items in `items` matching `filter`, in list order.
#[must_use]
pub fn visible_indexes(items: &[String], filter: &str) -> Vec<usize> {
    if filter.is_empty() {
        return (0..items.len()).collect();
    }

    let matcher = SkimMatcherV2::default();
    items
        .iter()
        .positions(|item| matcher.fuzzy_match(item, filter).is_some())
        .collect()
}

/// Visible item indexes of a column; only the focused column is filtered.
fn column_indexes(ui_state: &UiState, selector: &CascadingSelector, level: Level) -> Vec<usize> {
    let items = selector.list(level).items();
    if level == ui_state.focus && ui_state.is_filtering {
        visible_indexes(items, &ui_state.filter_text)
    } else {
        visible_indexes(items, "")
    }
}

/// Builds the selection event for the item under the focused cursor.
fn select_under_cursor(ui_state: &UiState, selector: &CascadingSelector) -> PickerAction {
    let level = ui_state.focus;
    let indexes = column_indexes(ui_state, selector, level);

    match indexes.get(ui_state.cursor(level).selected_index) {
        Some(&item_index) => {
            let item = selector.list(level).items()[item_index].clone();
            PickerAction::Select(SelectionEvent::for_level(level, item))
        }
        None => PickerAction::Ignore,
    }
}

/// Handle keyboard events in the location picker
#[must_use]
pub fn handle_key_event(
    key_event: KeyEvent,
    ui_state: &UiState,
    selector: &CascadingSelector,
) -> PickerAction {
    let visible_count = column_indexes(ui_state, selector, ui_state.focus).len();

    match key_event.code {
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            PickerAction::Quit
        }
        KeyCode::Up => PickerAction::Update(ui_state.move_cursor(CycleDirection::Up, visible_count)),
        KeyCode::Down => {
            PickerAction::Update(ui_state.move_cursor(CycleDirection::Down, visible_count))
        }
        KeyCode::Enter => select_under_cursor(ui_state, selector),
        KeyCode::Backspace if ui_state.is_filtering => {
            let mut updated_state = ui_state.clone();
            updated_state.filter_text.pop();
            updated_state.cursors[column_index(ui_state.focus)] = Default::default();
            PickerAction::Update(updated_state)
        }
        KeyCode::Esc if ui_state.is_filtering => PickerAction::Update(ui_state.focus_on(ui_state.focus)),
        KeyCode::Char(c) if ui_state.is_filtering => {
            let mut updated_state = ui_state.clone();
            updated_state.filter_text.push(c);
            updated_state.cursors[column_index(ui_state.focus)] = Default::default();
            PickerAction::Update(updated_state)
        }
        KeyCode::Left | KeyCode::Char('h') => match previous_level(ui_state.focus) {
            Some(level) => PickerAction::Update(ui_state.focus_on(level)),
            None => PickerAction::Ignore,
        },
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
            match next_level(ui_state.focus) {
                Some(level) if !selector.list(level).is_empty() => {
                    PickerAction::Update(ui_state.focus_on(level))
                }
                _ => PickerAction::Ignore,
            }
        }
        KeyCode::Char('k') => {
            PickerAction::Update(ui_state.move_cursor(CycleDirection::Up, visible_count))
        }
        KeyCode::Char('j') => {
            PickerAction::Update(ui_state.move_cursor(CycleDirection::Down, visible_count))
        }
        KeyCode::Char('/') => {
            let mut updated_state = ui_state.focus_on(ui_state.focus);
            updated_state.is_filtering = true;
            PickerAction::Update(updated_state)
        }
        KeyCode::Char('s') => {
            if selector.current_selection().is_complete() {
                PickerAction::Confirm
            } else {
                let mut updated_state = ui_state.clone();
                updated_state.status = Some(INCOMPLETE_SELECTION_MESSAGE.to_string());
                PickerAction::Update(updated_state)
            }
        }
        KeyCode::Char('q') | KeyCode::Esc => PickerAction::Quit,
        _ => PickerAction::Ignore,
    }
}

/// Translates a left click at (`column`, `row`) into an action.
#[must_use]
pub fn handle_click(
    column: u16,
    row: u16,
    ui_state: &UiState,
    selector: &CascadingSelector,
) -> PickerAction {
    if row < FIRST_ITEM_ROW || ui_state.column_width() == 0 {
        return PickerAction::Ignore;
    }

    let Some(&level) = Level::ALL.get(usize::from(column / ui_state.column_width())) else {
        return PickerAction::Ignore;
    };

    let indexes = column_indexes(ui_state, selector, level);
    let clicked_index = usize::from(row - FIRST_ITEM_ROW) + ui_state.cursor(level).offset;

    match indexes.get(clicked_index) {
        Some(&item_index) => {
            let item = selector.list(level).items()[item_index].clone();
            PickerAction::Select(SelectionEvent::for_level(level, item))
        }
        None => PickerAction::Ignore,
    }
}

/// Prompts the user to choose a location, driving `selector` as they pick.
///
/// Returns once the user confirms a complete selection or quits.
pub fn prompt_for_location(selector: &mut CascadingSelector) -> Result<PickerChoice> {
    let mut stdout = stdout();

    stdout.execute(EnterAlternateScreen).map_err(Error::Stdio)?;
    enable_raw_mode().map_err(Error::Stdio)?;

    let _raw_mode_guard = RawModeGuard; // When this goes out of scope, raw mode and mouse capture is disabled
    stdout
        .execute(event::EnableMouseCapture)
        .map_err(Error::Stdio)?;

    let (width, height) = terminal::size().map_err(Error::Stdio)?;
    let mut ui_state = UiState::new(width, height, selector);
    let mut should_redraw = true;

    let mut down_position: Option<(u16, u16)> = None;

    loop {
        if should_redraw {
            redraw_ui(&ui_state, selector).map_err(Error::Stdio)?;
            should_redraw = false;
        }

        if !event::poll(Duration::from_millis(500)).map_err(Error::Stdio)? {
            continue;
        }

        let action = match event::read().map_err(Error::Stdio)? {
            Event::Key(key_event) => handle_key_event(key_event, &ui_state, selector),
            Event::Mouse(MouseEvent {
                kind,
                column,
                row,
                modifiers,
            }) if modifiers == KeyModifiers::NONE => match kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    down_position = Some((column, row));
                    PickerAction::Ignore
                }
                MouseEventKind::Up(MouseButton::Left) => match down_position.take() {
                    Some(position) if position == (column, row) => {
                        handle_click(column, row, &ui_state, selector)
                    }
                    _ => PickerAction::Ignore,
                },
                _ => PickerAction::Ignore,
            },
            Event::Resize(width, height) => PickerAction::Update(ui_state.resized(width, height)),
            _ => PickerAction::Ignore,
        };

        match action {
            PickerAction::Ignore => {}
            PickerAction::Update(new_ui_state) => {
                should_redraw = new_ui_state != ui_state;
                ui_state = new_ui_state;
            }
            PickerAction::Select(event) => {
                let level = event.level();
                debug!("Picker selected {event:?}");
                selector.apply(event)?;

                let index = selector.list(level).active_index().unwrap_or_default();
                ui_state = ui_state.after_selection(level, index);
                should_redraw = true;
            }
            PickerAction::Confirm => return Ok(PickerChoice::Confirm),
            PickerAction::Quit => {
                execute!(stdout, Clear(ClearType::All)).map_err(Error::Stdio)?;
                return Ok(PickerChoice::Quit);
            }
        }
    }
}

fn redraw_ui(ui_state: &UiState, selector: &CascadingSelector) -> std::io::Result<()> {
    let mut stdout = stdout();

    queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    print_header(ui_state)?;

    for level in Level::ALL {
        print_column(ui_state, selector, level)?;
    }

    print_status_line(ui_state, selector)?;

    stdout.flush()
}

/// Print the header for the location picker
fn print_header(ui_state: &UiState) -> std::io::Result<()> {
    let mut stdout = stdout();

    let instructions = if ui_state.is_filtering {
        "  <esc>: Stop Filtering".to_string()
    } else {
        "  ←/→: Column   |   ↑/↓: Move   |   <enter>: Select   |   /: Filter   |   s: Secure my connection   |   q: Quit".to_string()
    };

    queue!(
        stdout,
        MoveTo(0, 0),
        SetBackgroundColor(DarkGreen),
        Print(fit_to_width(&instructions, usize::from(ui_state.viewport.width))),
        SetBackgroundColor(Reset),
        SetForegroundColor(Reset),
    )?;

    Ok(())
}

/// Truncate or pad `content` so it takes exactly `width` characters
fn fit_to_width(content: &str, width: usize) -> String {
    let truncated: String = content.chars().take(width).collect();
    let padding = width.saturating_sub(truncated.chars().count());
    format!("{truncated}{}", " ".repeat(padding))
}

fn print_column(
    ui_state: &UiState,
    selector: &CascadingSelector,
    level: Level,
) -> std::io::Result<()> {
    let mut stdout = stdout();

    let column_width = ui_state.column_width();
    let x = column_width * column_index(level) as u16;
    let cell_width = usize::from(column_width.saturating_sub(1));
    let is_focused = level == ui_state.focus;

    let title = format!(" {}", level.title());
    queue!(stdout, MoveTo(x, 1))?;
    if is_focused {
        queue!(stdout, SetAttribute(Attribute::Underlined))?;
    }
    queue!(
        stdout,
        SetAttribute(Attribute::Bold),
        Print(fit_to_width(&title, cell_width)),
        SetAttribute(Attribute::Reset),
    )?;

    let list = selector.list(level);
    let cursor = ui_state.cursor(level);
    let indexes = column_indexes(ui_state, selector, level);

    let visible_rows = indexes
        .iter()
        .enumerate()
        .skip(cursor.offset)
        .take(ui_state.list_height());

    for (row, (visible_index, &item_index)) in visible_rows.enumerate() {
        let is_under_cursor = is_focused && visible_index == cursor.selected_index;
        let is_active = list.is_active(item_index);

        let marker = if is_active { "●" } else { " " };
        let content = format!("{marker} {}", list.items()[item_index]);

        queue!(stdout, MoveTo(x, FIRST_ITEM_ROW + row as u16))?;

        if is_under_cursor {
            queue!(
                stdout,
                SetAttribute(Attribute::Bold),
                SetBackgroundColor(DarkBlue),
                SetForegroundColor(Yellow),
            )?;
        } else if is_active {
            queue!(stdout, SetForegroundColor(Yellow))?;
        }

        queue!(
            stdout,
            Print(fit_to_width(&content, cell_width)),
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(Reset),
            SetForegroundColor(Reset),
        )?;
    }

    Ok(())
}

fn print_status_line(ui_state: &UiState, selector: &CascadingSelector) -> std::io::Result<()> {
    let mut stdout = stdout();
    let row = ui_state.viewport.height.saturating_sub(1);

    queue!(stdout, MoveTo(0, row))?;

    if ui_state.is_filtering {
        queue!(
            stdout,
            SetAttribute(Attribute::Bold),
            Print(format!("Filter: {}", ui_state.filter_text)),
            SetAttribute(Attribute::Reset)
        )?;
    } else if let Some(status) = &ui_state.status {
        queue!(
            stdout,
            SetForegroundColor(Color::Red),
            Print(status),
            SetForegroundColor(Reset)
        )?;
    } else {
        queue!(
            stdout,
            Print(format!("Selected: {}", selector.current_selection()))
        )?;
    }

    Ok(())
}
