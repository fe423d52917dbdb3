use ratatui::style::{Color, Style};

use crate::app::NotificationLevel;
use crate::board::BallColor;

/// Color theme for Tablero.
///
/// Chrome uses the terminal's default foreground; only balls, markers and
/// notifications get color.
pub struct Theme;

impl Theme {
    pub const FG: Color = Color::Reset;
    pub const DIM: Color = Color::DarkGray;

    // Column chrome
    pub const COLUMN_BORDER: Color = Color::Reset;
    pub const COLUMN_TITLE: Color = Color::Reset;

    // Ball colors (urgency / custom)
    pub const BALL_RED: Color = Color::Red;
    pub const BALL_YELLOW: Color = Color::Yellow;
    pub const BALL_GREEN: Color = Color::Green;
    pub const BALL_DEFAULT: Color = Color::Blue;

    // Decorative canvas palette: #5DDB89, #FF5252, #FFE55C
    pub const CANVAS_PALETTE: [Color; 3] = [
        Color::Rgb(0x5D, 0xDB, 0x89),
        Color::Rgb(0xFF, 0x52, 0x52),
        Color::Rgb(0xFF, 0xE5, 0x5C),
    ];

    // Status bar
    pub const STATUS_ERROR: Color = Color::Red;

    pub fn dim_style() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Notification style for the status line.
    pub fn status_style(level: NotificationLevel) -> Style {
        match level {
            NotificationLevel::Info => Style::default().fg(Self::FG),
            NotificationLevel::Error => Style::default().fg(Self::STATUS_ERROR),
        }
    }

    /// Terminal color for a resolved ball color.
    pub fn ball_color(color: BallColor) -> Color {
        match color {
            BallColor::Red => Self::BALL_RED,
            BallColor::Yellow => Self::BALL_YELLOW,
            BallColor::Green => Self::BALL_GREEN,
            BallColor::Default => Self::BALL_DEFAULT,
        }
    }

    /// Terminal color for a canvas palette index.
    pub fn canvas_color(index: u8) -> Color {
        Self::CANVAS_PALETTE[index as usize % Self::CANVAS_PALETTE.len()]
    }
}
