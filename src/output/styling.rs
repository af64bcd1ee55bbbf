use console::style;

use crate::watch::status::BuildState;

/// Styling helpers for terminal output
pub fn bright_yellow(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn bright_green(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn dim(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).dim()
}

pub fn magenta_bold(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).magenta().bold()
}

/// Terminal colour for a build state in listings.
pub fn state_color(state: BuildState) -> comfy_table::Color {
    match state {
        BuildState::Passed => comfy_table::Color::Green,
        BuildState::Queued => comfy_table::Color::Blue,
        BuildState::Failed => comfy_table::Color::Red,
        BuildState::Running => comfy_table::Color::Cyan,
        BuildState::Pending => comfy_table::Color::Reset,
    }
}
