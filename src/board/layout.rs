use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::storage::{self, KvStore, StorageError};
use super::{ColumnId, Registry};
use crate::config::BoardConfig;

/// A pointer position in the shared pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PxRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PxRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Pixel-space equivalent of a terminal cell rect.
    pub fn from_cells(rect: ratatui::layout::Rect, config: &BoardConfig) -> Self {
        Self {
            x: rect.x as f64 * config.cell_width_px,
            y: rect.y as f64 * config.cell_height_px,
            width: rect.width as f64 * config.cell_width_px,
            height: rect.height as f64 * config.cell_height_px,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// A committed logical position: column plus percentage coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub column: ColumnId,
    pub left_pct: f64,
    pub top_pct: f64,
}

/// Resolve which column lies under a release point, by direct bounding-box
/// test against the three column rects.
pub fn column_at(areas: &[PxRect; 3], p: Point) -> Option<ColumnId> {
    ColumnId::ALL
        .into_iter()
        .find(|col| areas[col.index()].contains(p))
}

/// Map an absolute pointer position to a clamped column-relative placement.
///
/// The pointer is treated as the ball center, so half the ball footprint is
/// subtracted before converting to percentages. The result always lands
/// inside the column's clamp window; out-of-range drops snap to the nearest
/// edge.
pub fn map_to_column(
    p: Point,
    column: ColumnId,
    area: PxRect,
    config: &BoardConfig,
) -> Placement {
    let ball_w = config.ball_width_pct / 100.0 * area.width;
    let ball_h = config.ball_height_pct / 100.0 * area.height;

    let relative_x = p.x - area.x - ball_w / 2.0;
    let relative_y = p.y - area.y - ball_h / 2.0;

    let left_pct = relative_x / area.width * 100.0;
    let top_pct = relative_y / area.height * 100.0;

    Placement {
        column,
        left_pct: config.column_windows[column.index()].clamp(left_pct),
        top_pct: config.top_window.clamp(top_pct),
    }
}

/// Topmost ball under a pointer, if any. Balls later in the draw order win.
pub fn ball_at(
    registry: &Registry,
    areas: &[PxRect; 3],
    config: &BoardConfig,
    p: Point,
) -> Option<String> {
    registry.balls().iter().rev().find_map(|ball| {
        let area = areas[ball.column.index()];
        let footprint = PxRect::new(
            area.x + ball.left_pct / 100.0 * area.width,
            area.y + ball.top_pct / 100.0 * area.height,
            config.ball_width_pct / 100.0 * area.width,
            config.ball_height_pct / 100.0 * area.height,
        );
        footprint.contains(p).then(|| ball.id.clone())
    })
}

/// One persisted snapshot entry. `left`/`top` keep their `%` suffix on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacementEntry {
    #[serde(rename = "colId")]
    pub col_id: String,
    pub left: String,
    pub top: String,
}

/// Full persisted mapping of ball id to column and position.
pub type LayoutSnapshot = BTreeMap<String, PlacementEntry>;

fn format_pct(value: f64) -> String {
    format!("{value}%")
}

fn parse_pct(value: &str) -> Option<f64> {
    value.strip_suffix('%')?.trim().parse().ok()
}

/// Build the full snapshot from every live ball and overwrite the persisted
/// record wholesale.
pub fn save_state(store: &KvStore, registry: &Registry) -> Result<(), StorageError> {
    let mut snapshot = LayoutSnapshot::new();
    for ball in registry.balls() {
        snapshot.insert(
            ball.id.clone(),
            PlacementEntry {
                col_id: ball.column.as_str().to_string(),
                left: format_pct(ball.left_pct),
                top: format_pct(ball.top_pct),
            },
        );
    }
    storage::save_layout(store, &snapshot)
}

/// Apply the persisted snapshot to every live ball that has an entry.
///
/// Balls without an entry keep their current placement. A missing or
/// corrupt snapshot, an unknown column id, or an unparseable percentage is
/// silently skipped; loading never fails.
pub fn load_state(store: &KvStore, registry: &mut Registry) {
    let snapshot = storage::load_layout(store);
    if snapshot.is_empty() {
        return;
    }

    let ids: Vec<String> = registry.balls().iter().map(|b| b.id.clone()).collect();
    for id in ids {
        let Some(entry) = snapshot.get(&id) else { continue };
        let Ok(column) = ColumnId::from_str(&entry.col_id) else { continue };
        let (Some(left), Some(top)) = (parse_pct(&entry.left), parse_pct(&entry.top)) else {
            continue;
        };
        if let Some(ball) = registry.ball_mut(&id) {
            ball.column = column;
            ball.left_pct = left;
            ball.top_pct = top;
        }
    }
}
