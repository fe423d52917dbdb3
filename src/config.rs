use serde::{Deserialize, Serialize};

/// Inclusive clamp window, in percent of the column dimension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClampWindow {
    pub min: f64,
    pub max: f64,
}

impl ClampWindow {
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// Board configuration.
///
/// The clamp windows are hand-tuned to the board artwork; they are data, not
/// derived values, which is why they live here instead of in the mapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Per-column horizontal windows, in column order (col-1, col-2, col-3).
    /// `max` already has the ball width subtracted, so a ball at `max` sits
    /// flush against the column's usable right edge.
    #[serde(default = "default_column_windows")]
    pub column_windows: [ClampWindow; 3],
    /// Shared vertical window.
    #[serde(default = "default_top_window")]
    pub top_window: ClampWindow,
    /// Ball footprint, in percent of column width/height.
    #[serde(default = "default_ball_width_pct")]
    pub ball_width_pct: f64,
    #[serde(default = "default_ball_height_pct")]
    pub ball_height_pct: f64,
    /// Windows used for randomized initial placement in col-1.
    #[serde(default = "default_spawn_left")]
    pub spawn_left: ClampWindow,
    #[serde(default = "default_spawn_top")]
    pub spawn_top: ClampWindow,
    /// Viewport width (px) at or below which the decorative canvas runs.
    #[serde(default = "default_canvas_breakpoint")]
    pub canvas_breakpoint: f64,
    /// Pixel metric of one terminal cell.
    #[serde(default = "default_cell_width_px")]
    pub cell_width_px: f64,
    #[serde(default = "default_cell_height_px")]
    pub cell_height_px: f64,
}

const BALL_WIDTH_PCT: f64 = 12.1;
const BALL_HEIGHT_PCT: f64 = 7.2;

fn default_column_windows() -> [ClampWindow; 3] {
    [
        ClampWindow { min: 28.5, max: 95.6 - BALL_WIDTH_PCT },
        ClampWindow { min: 17.8, max: 82.2 - BALL_WIDTH_PCT },
        ClampWindow { min: 4.4, max: 71.6 - BALL_WIDTH_PCT },
    ]
}

fn default_top_window() -> ClampWindow {
    ClampWindow { min: 15.4, max: 90.0 - BALL_HEIGHT_PCT }
}

fn default_ball_width_pct() -> f64 {
    BALL_WIDTH_PCT
}

fn default_ball_height_pct() -> f64 {
    BALL_HEIGHT_PCT
}

fn default_spawn_left() -> ClampWindow {
    ClampWindow { min: 28.5, max: 83.5 }
}

fn default_spawn_top() -> ClampWindow {
    ClampWindow { min: 15.4, max: 82.8 }
}

fn default_canvas_breakpoint() -> f64 {
    768.0
}

fn default_cell_width_px() -> f64 {
    8.0
}

fn default_cell_height_px() -> f64 {
    16.0
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            column_windows: default_column_windows(),
            top_window: default_top_window(),
            ball_width_pct: default_ball_width_pct(),
            ball_height_pct: default_ball_height_pct(),
            spawn_left: default_spawn_left(),
            spawn_top: default_spawn_top(),
            canvas_breakpoint: default_canvas_breakpoint(),
            cell_width_px: default_cell_width_px(),
            cell_height_px: default_cell_height_px(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_board_artwork() {
        let config = BoardConfig::default();
        assert_eq!(config.column_windows[0].min, 28.5);
        assert_eq!(config.column_windows[1].max, 82.2 - 12.1);
        assert_eq!(config.top_window.max, 90.0 - 7.2);
        assert_eq!(config.canvas_breakpoint, 768.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: BoardConfig = toml::from_str("canvas_breakpoint = 1024.0").unwrap();
        assert_eq!(config.canvas_breakpoint, 1024.0);
        assert_eq!(config.ball_width_pct, 12.1);
        assert_eq!(config.column_windows[2].min, 4.4);
    }

    #[test]
    fn test_window_clamp_snaps_to_edges() {
        let w = ClampWindow { min: 17.8, max: 70.1 };
        assert_eq!(w.clamp(-40.0), 17.8);
        assert_eq!(w.clamp(200.0), 70.1);
        assert_eq!(w.clamp(50.0), 50.0);
    }
}
