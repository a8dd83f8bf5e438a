//! Type definitions for the location picker and its UI state.

use relay_picker_core::selection::{CascadingSelector, Level, SelectionEvent};

/// Rows taken by the header, the column titles and the status line.
const CHROME_ROWS: u16 = 3;

/// How the user left the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerChoice {
    Confirm,
    Quit,
}

/// Represents the user's choice when confirming a command run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunChoice {
    Yes,
    No,
}

/// Direction to move the cursor within a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Up,
    Down,
}

/// What a key press or click asks the picker to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerAction {
    Ignore,
    Update(UiState),
    Select(SelectionEvent),
    Confirm,
    Quit,
}

/// Cursor position and scroll offset of one column.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct ColumnCursor {
    /// Index into the column's visible items
    pub selected_index: usize,
    /// First visible item
    pub offset: usize,
}

/// Size of the terminal.
#[derive(Clone, PartialEq, Debug)]
pub struct ViewportState {
    pub height: u16,
    pub width: u16,
}

/// Complete UI state of the picker.
#[derive(Clone, PartialEq, Debug)]
pub struct UiState {
    /// Column receiving keyboard input
    pub focus: Level,
    pub cursors: [ColumnCursor; 3],
    pub viewport: ViewportState,
    /// Whether the user is currently filtering the focused column
    pub is_filtering: bool,
    /// Current filter/search text
    pub filter_text: String,
    /// One-line message shown at the bottom until the next action
    pub status: Option<String>,
}

#[must_use]
pub fn column_index(level: Level) -> usize {
    match level {
        Level::Country => 0,
        Level::City => 1,
        Level::Server => 2,
    }
}

#[must_use]
pub fn next_level(level: Level) -> Option<Level> {
    match level {
        Level::Country => Some(Level::City),
        Level::City => Some(Level::Server),
        Level::Server => None,
    }
}

#[must_use]
pub fn previous_level(level: Level) -> Option<Level> {
    match level {
        Level::Country => None,
        Level::City => Some(Level::Country),
        Level::Server => Some(Level::City),
    }
}

impl UiState {
    /// Starts on the first level without a choice, cursors on active items.
    #[must_use]
    pub fn new(width: u16, height: u16, selector: &CascadingSelector) -> Self {
        let missing = selector.current_selection().missing_levels();
        let focus = missing.first().copied().unwrap_or(Level::Server);

        let mut ui_state = Self {
            focus,
            cursors: [ColumnCursor::default(); 3],
            viewport: ViewportState { height, width },
            is_filtering: false,
            filter_text: String::new(),
            status: None,
        };

        for level in Level::ALL {
            if let Some(active) = selector.list(level).active_index() {
                ui_state.cursors[column_index(level)].selected_index = active;
                ui_state.scroll_into_view(level);
            }
        }

        ui_state
    }

    #[must_use]
    pub fn cursor(&self, level: Level) -> ColumnCursor {
        self.cursors[column_index(level)]
    }

    /// Number of item rows that fit under the column titles.
    #[must_use]
    pub fn list_height(&self) -> usize {
        usize::from(self.viewport.height.saturating_sub(CHROME_ROWS)).max(1)
    }

    #[must_use]
    pub fn column_width(&self) -> u16 {
        self.viewport.width / 3
    }

    /// Adjusts the offset of a column so its cursor is visible.
    pub fn scroll_into_view(&mut self, level: Level) {
        let list_height = self.list_height();
        let cursor = &mut self.cursors[column_index(level)];

        if cursor.selected_index < cursor.offset {
            cursor.offset = cursor.selected_index;
        } else if cursor.selected_index >= cursor.offset + list_height {
            cursor.offset = cursor.selected_index + 1 - list_height;
        }
    }

    /// Moves the focused cursor, wrapping around at either end.
    #[must_use]
    pub fn move_cursor(&self, direction: CycleDirection, visible_count: usize) -> Self {
        let mut ui_state = self.clone();
        ui_state.status = None;

        if visible_count == 0 {
            return ui_state;
        }

        let cursor = &mut ui_state.cursors[column_index(self.focus)];
        cursor.selected_index = match direction {
            CycleDirection::Up if cursor.selected_index == 0 => visible_count - 1,
            CycleDirection::Up => cursor.selected_index - 1,
            CycleDirection::Down => (cursor.selected_index + 1) % visible_count,
        };

        ui_state.scroll_into_view(self.focus);
        ui_state
    }

    /// Moves focus to another column, ending any filter.
    #[must_use]
    pub fn focus_on(&self, level: Level) -> Self {
        let mut ui_state = self.clone();
        ui_state.focus = level;
        ui_state.is_filtering = false;
        ui_state.filter_text.clear();
        ui_state.status = None;
        ui_state
    }

    /// State after `level` received a new choice at `index`.
    ///
    /// The columns below were repopulated, so their cursors start over and
    /// focus moves one level down.
    #[must_use]
    pub fn after_selection(&self, level: Level, index: usize) -> Self {
        let mut ui_state = self.focus_on(next_level(level).unwrap_or(level));
        ui_state.cursors[column_index(level)].selected_index = index;
        ui_state.scroll_into_view(level);

        let mut below = next_level(level);
        while let Some(lower) = below {
            ui_state.cursors[column_index(lower)] = ColumnCursor::default();
            below = next_level(lower);
        }

        ui_state
    }

    /// State after a terminal resize, keeping every cursor visible.
    #[must_use]
    pub fn resized(&self, width: u16, height: u16) -> Self {
        let mut ui_state = self.clone();
        ui_state.viewport = ViewportState { height, width };
        for level in Level::ALL {
            ui_state.scroll_into_view(level);
        }
        ui_state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_picker_core::file_handling::parse_location_table;

    fn create_test_selector() -> CascadingSelector {
        let table = parse_location_table(
            "Sweden:\n  Stockholm:\n    - se-sto-001\n    - se-sto-002\n  Malmö:\n    - se-mma-001\nGermany:\n  Berlin:\n    - de-ber-001\n",
            "test",
        )
        .unwrap();
        CascadingSelector::new(table)
    }

    fn create_test_state(height: u16) -> UiState {
        UiState::new(90, height, &create_test_selector())
    }

    #[test]
    fn test_new_focuses_first_missing_level() {
        let mut selector = create_test_selector();
        assert_eq!(UiState::new(90, 20, &selector).focus, Level::Country);

        selector.select_country("Sweden").unwrap();
        selector.select_city("Malmö").unwrap();
        let ui_state = UiState::new(90, 20, &selector);

        assert_eq!(ui_state.focus, Level::Server);
        assert_eq!(ui_state.cursor(Level::City).selected_index, 1);
    }

    #[test]
    fn test_move_cursor_wraps() {
        let ui_state = create_test_state(20);

        let up = ui_state.move_cursor(CycleDirection::Up, 3);
        assert_eq!(up.cursor(Level::Country).selected_index, 2);

        let down = up.move_cursor(CycleDirection::Down, 3);
        assert_eq!(down.cursor(Level::Country).selected_index, 0);
    }

    #[test]
    fn test_move_cursor_empty_column() {
        let ui_state = create_test_state(20).focus_on(Level::Server);
        let moved = ui_state.move_cursor(CycleDirection::Down, 0);
        assert_eq!(moved.cursor(Level::Server), ColumnCursor::default());
    }

    #[test]
    fn test_move_cursor_scrolls() {
        // Two item rows fit on screen
        let mut ui_state = create_test_state(5);
        assert_eq!(ui_state.list_height(), 2);

        for _ in 0..3 {
            ui_state = ui_state.move_cursor(CycleDirection::Down, 5);
        }

        let cursor = ui_state.cursor(Level::Country);
        assert_eq!(cursor.selected_index, 3);
        assert_eq!(cursor.offset, 2);

        let wrapped = ui_state
            .move_cursor(CycleDirection::Down, 5)
            .move_cursor(CycleDirection::Down, 5);
        assert_eq!(wrapped.cursor(Level::Country).selected_index, 0);
        assert_eq!(wrapped.cursor(Level::Country).offset, 0);
    }

    #[test]
    fn test_after_selection_moves_focus_and_resets_below() {
        let mut ui_state = create_test_state(20);
        ui_state.cursors[column_index(Level::City)].selected_index = 4;
        ui_state.cursors[column_index(Level::Server)].offset = 2;
        ui_state.is_filtering = true;
        ui_state.filter_text = "swe".to_string();

        let ui_state = ui_state.after_selection(Level::Country, 1);

        assert_eq!(ui_state.focus, Level::City);
        assert_eq!(ui_state.cursor(Level::Country).selected_index, 1);
        assert_eq!(ui_state.cursor(Level::City), ColumnCursor::default());
        assert_eq!(ui_state.cursor(Level::Server), ColumnCursor::default());
        assert!(!ui_state.is_filtering);
        assert!(ui_state.filter_text.is_empty());
    }

    #[test]
    fn test_after_server_selection_keeps_focus() {
        let ui_state = create_test_state(20)
            .focus_on(Level::Server)
            .after_selection(Level::Server, 1);
        assert_eq!(ui_state.focus, Level::Server);
        assert_eq!(ui_state.cursor(Level::Server).selected_index, 1);
    }

    #[test]
    fn test_resized_keeps_cursor_visible() {
        let mut ui_state = create_test_state(20);
        ui_state.cursors[0].selected_index = 10;

        let resized = ui_state.resized(60, 6);

        assert_eq!(resized.viewport.width, 60);
        assert_eq!(resized.column_width(), 20);
        assert_eq!(resized.cursor(Level::Country).offset, 8);
    }

    #[test]
    fn test_level_navigation() {
        assert_eq!(next_level(Level::Country), Some(Level::City));
        assert_eq!(next_level(Level::Server), None);
        assert_eq!(previous_level(Level::City), Some(Level::Country));
        assert_eq!(previous_level(Level::Country), None);
        assert_eq!(column_index(Level::Server), 2);
    }
}
