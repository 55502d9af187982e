use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme resolved from the config. Only the first call wins.
pub fn init(theme: Theme) {
    let _ = THEME.set(theme);
}

/// Get the active theme, the default one when `init` was never called.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub marker: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub focus: Style,
    pub status: Style,
    pub highlight: Style,
    pub pending: Style,
    pub error: Style,
    pub badge: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            marker: Style::default().fg(Color::Green),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            focus: Style::default().fg(Color::Green),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            highlight: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            pending: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            badge: Style::default().fg(Color::Magenta),
        }
    }
}

impl Theme {
    /// Get a built-in preset by name.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "gruvbox" => Self::gruvbox(),
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    fn dracula() -> Self {
        let bg = Color::Rgb(68, 71, 90);
        let fg = Color::Rgb(248, 248, 242);
        Self {
            name: "dracula".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(189, 147, 249)), // purple
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)), // cyan
            marker: Style::default().fg(Color::Rgb(80, 250, 123)),
            header: Style::default().fg(fg).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(bg),
            focus: Style::default().fg(Color::Rgb(80, 250, 123)),
            status: Style::default().fg(fg).bg(bg),
            highlight: Style::default().bg(bg).add_modifier(Modifier::BOLD),
            badge: Style::default().fg(Color::Rgb(255, 121, 198)),
            ..Self::default()
        }
    }

    fn gruvbox() -> Self {
        let bg = Color::Rgb(80, 73, 69);
        let fg = Color::Rgb(235, 219, 178);
        Self {
            name: "gruvbox".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(250, 189, 47)), // yellow
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(131, 165, 152)), // aqua
            marker: Style::default().fg(Color::Rgb(184, 187, 38)),
            header: Style::default().fg(fg).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(146, 131, 116)),
            border: Style::default().fg(Color::Rgb(102, 92, 84)),
            focus: Style::default().fg(Color::Rgb(184, 187, 38)),
            status: Style::default().fg(fg).bg(bg),
            highlight: Style::default().bg(bg).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Rgb(251, 73, 52)).add_modifier(Modifier::BOLD),
            ..Self::default()
        }
    }

    fn nord() -> Self {
        let bg = Color::Rgb(67, 76, 94);
        let fg = Color::Rgb(229, 233, 240);
        Self {
            name: "nord".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)), // yellow
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)), // frost
            marker: Style::default().fg(Color::Rgb(163, 190, 140)),
            header: Style::default().fg(fg).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(bg),
            focus: Style::default().fg(Color::Rgb(143, 188, 187)),
            status: Style::default().fg(fg).bg(bg),
            highlight: Style::default().bg(bg).add_modifier(Modifier::BOLD),
            error: Style::default().fg(Color::Rgb(191, 97, 106)).add_modifier(Modifier::BOLD),
            ..Self::default()
        }
    }
}

// ── TOML config types ──

/// The `[theme]` table of `config.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct ThemeConfig {
    preset: Option<String>,
    today_fg: Option<String>,
    today_bg: Option<String>,
    selected_fg: Option<String>,
    selected_bg: Option<String>,
    marker_fg: Option<String>,
    header_fg: Option<String>,
    dim_fg: Option<String>,
    border_fg: Option<String>,
    status_fg: Option<String>,
    status_bg: Option<String>,
    error_fg: Option<String>,
}

impl ThemeConfig {
    pub fn into_theme(self) -> Theme {
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        let fg_overrides = [
            (&self.today_fg, &mut theme.today),
            (&self.selected_fg, &mut theme.selected),
            (&self.marker_fg, &mut theme.marker),
            (&self.header_fg, &mut theme.header),
            (&self.dim_fg, &mut theme.dim),
            (&self.border_fg, &mut theme.border),
            (&self.status_fg, &mut theme.status),
            (&self.error_fg, &mut theme.error),
        ];
        for (value, style) in fg_overrides {
            if let Some(c) = value.as_deref().and_then(parse_color) {
                *style = style.fg(c);
            }
        }

        let bg_overrides = [
            (&self.today_bg, &mut theme.today),
            (&self.selected_bg, &mut theme.selected),
            (&self.status_bg, &mut theme.status),
        ];
        for (value, style) in bg_overrides {
            if let Some(c) = value.as_deref().and_then(parse_color) {
                *style = style.bg(c);
            }
        }

        theme
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#').filter(|h| h.len() == 6 && h.is_ascii()) {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => None,
    }
}
