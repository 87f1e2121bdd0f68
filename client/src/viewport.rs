use grid_shared::Position;

/// Side of one grid cell in CSS pixels at zoom 1.0.
pub const BASE_CELL_SIZE: f64 = 100.0;

pub const MIN_ZOOM: f64 = 0.05;
pub const MAX_ZOOM: f64 = 5.0;

/// Nudge applied before flooring in [`Viewport::screen_to_cell`] so that a
/// cell's own top-left pixel, computed by [`Viewport::cell_origin`], maps
/// back to that cell despite f64 rounding in the offset round trip.
const CELL_SNAP_EPSILON: f64 = 1e-9;

/// Viewport manages the pan/zoom transformation between the infinite grid
/// plane and canvas screen coordinates. Pan is stored in grid units so that
/// the view stays anchored to the same cells when the zoom changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    /// Size of one cell on screen at the current zoom.
    pub fn cell_size_px(&self) -> f64 {
        BASE_CELL_SIZE * self.zoom
    }

    /// Pan offset in screen pixels.
    pub fn offset_px(&self) -> (f64, f64) {
        (self.pan_x * self.zoom, self.pan_y * self.zoom)
    }

    /// Set the zoom level, clamped to the supported range.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Step the zoom level by `delta` (e.g. +-0.1 from the toolbar buttons).
    pub fn zoom_by(&mut self, delta: f64) {
        self.set_zoom(self.zoom + delta);
    }

    /// Pan by a screen-space delta. Dividing by zoom converts the pixel
    /// movement into grid units, so dragging tracks the cursor at any zoom.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx / self.zoom;
        self.pan_y += dy / self.zoom;
    }

    /// Map a screen coordinate (relative to the canvas origin) to the cell
    /// underneath it.
    pub fn screen_to_cell(&self, sx: f64, sy: f64) -> Position {
        let cell_px = self.cell_size_px();
        let (ox, oy) = self.offset_px();
        Position {
            x: ((sx - ox) / cell_px + CELL_SNAP_EPSILON).floor() as i64,
            y: ((sy - oy) / cell_px + CELL_SNAP_EPSILON).floor() as i64,
        }
    }

    /// Screen coordinates of a cell's top-left corner.
    pub fn cell_origin(&self, position: Position) -> (f64, f64) {
        let cell_px = self.cell_size_px();
        let (ox, oy) = self.offset_px();
        (
            position.x as f64 * cell_px + ox,
            position.y as f64 * cell_px + oy,
        )
    }

    /// Return to the origin at default zoom.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
