use iced::Color;
use relay_picker_core::notice::Severity;
use relay_picker_core::selection::Level;

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::WHITE,
        Severity::Warning => Color::from_rgb(0.95, 0.75, 0.2),
        Severity::Error => Color::from_rgb(0.8, 0.2, 0.2),
    }
}

/// Shown in an empty column until the level above it has a choice.
pub fn empty_list_hint(level: Level) -> &'static str {
    match level {
        Level::Country => "No countries available",
        Level::City => "Select a country",
        Level::Server => "Select a city",
    }
}
