#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

//! Pure geometry and styling helpers for the canvas renderer.

pub const GRID_LINE_COLOR: &str = "#ddd";
pub const SQUARE_BORDER_COLOR: &str = "#000";
pub const DEFAULT_SQUARE_BG: &str = "#f0f0f0";
pub const OWNER_LABEL_COLOR: &str = "rgba(0, 0, 0, 0.5)";
pub const LINK_MARKER_COLOR: &str = "#0000ff";
pub const SEARCH_HIGHLIGHT_COLOR: &str = "#00ff00";
pub const SELECTION_HIGHLIGHT_COLOR: &str = "#ff0000";
pub const HIGHLIGHT_LINE_WIDTH: f64 = 3.0;

/// Inner padding between a cell border and its text box.
pub const CELL_INSET_PX: f64 = 5.0;

pub const DEFAULT_CONTENT_FONT_PX: f64 = 16.0;
pub const DEFAULT_FONT_WEIGHT: &str = "normal";
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Screen-space rectangle of a cell: (x, y, w, h).
pub fn cell_rect(cell_x: i64, cell_y: i64, cell_px: f64, offset_x: f64, offset_y: f64) -> (f64, f64, f64, f64) {
    (
        cell_x as f64 * cell_px + offset_x,
        cell_y as f64 * cell_px + offset_y,
        cell_px,
        cell_px,
    )
}

/// Distance from the canvas edge to the first grid line. Always in
/// `[0, cell_px)` regardless of the pan direction.
pub fn grid_line_phase(offset_px: f64, cell_px: f64) -> f64 {
    offset_px.rem_euclid(cell_px)
}

/// Effective font size for square content: the configured size scales with
/// zoom but never exceeds a fifth of the cell, so text stays inside it.
pub fn content_font_px(configured_px: f64, zoom: f64, cell_px: f64) -> f64 {
    (configured_px * zoom).min(cell_px / 5.0).max(1.0)
}

/// Font size for the owner label in the top-left corner.
pub fn owner_font_px(zoom: f64, cell_px: f64) -> f64 {
    (12.0 * zoom).min(cell_px / 10.0).max(1.0)
}

/// Font size for the link marker glyph in the bottom-right corner.
pub fn link_font_px(zoom: f64, cell_px: f64) -> f64 {
    (14.0 * zoom).min(cell_px / 7.0).max(1.0)
}

/// True when the rectangle lies entirely off a `canvas_w` x `canvas_h` canvas.
pub fn rect_offscreen(x: f64, y: f64, w: f64, h: f64, canvas_w: f64, canvas_h: f64) -> bool {
    x + w < 0.0 || y + h < 0.0 || x > canvas_w || y > canvas_h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_rect_tiles_the_plane() {
        let (x0, y0, w, h) = cell_rect(0, 0, 100.0, 0.0, 0.0);
        let (x1, _, _, _) = cell_rect(1, 0, 100.0, 0.0, 0.0);
        assert_eq!((x0, y0), (0.0, 0.0));
        assert_eq!((w, h), (100.0, 100.0));
        assert_eq!(x1, x0 + w);

        let (nx, ny, _, _) = cell_rect(-2, -3, 50.0, 10.0, 20.0);
        assert_eq!((nx, ny), (-90.0, -130.0));
    }

    #[test]
    fn grid_line_phase_stays_in_range() {
        for offset in [-1234.5_f64, -100.0, -0.1, 0.0, 0.1, 99.9, 100.0, 5678.0] {
            let phase = grid_line_phase(offset, 100.0);
            assert!(
                (0.0..100.0).contains(&phase),
                "phase {phase} out of range for offset {offset}"
            );
        }
        assert_eq!(grid_line_phase(-30.0, 100.0), 70.0);
        assert_eq!(grid_line_phase(230.0, 100.0), 30.0);
    }

    #[test]
    fn content_font_scales_with_zoom_and_caps_at_cell_fraction() {
        // Unconstrained: 16px at zoom 1 in a 100px cell caps at 20px, so 16.
        assert_eq!(content_font_px(16.0, 1.0, 100.0), 16.0);
        // Cap kicks in: 60px configured is clipped to cell_px / 5.
        assert_eq!(content_font_px(60.0, 1.0, 100.0), 20.0);
        // Tiny zoom floors at 1px.
        assert_eq!(content_font_px(16.0, 0.05, 5.0), 1.0);
    }

    #[test]
    fn label_fonts_floor_at_one_pixel() {
        assert_eq!(owner_font_px(0.05, 5.0), 1.0);
        assert_eq!(link_font_px(0.05, 5.0), 1.0);
        // At zoom 1 the owner label hits its cell_px/10 cap; the link glyph
        // stays at its base 14px, under the cell_px/7 cap of ~14.3.
        assert_eq!(owner_font_px(1.0, 100.0), 10.0);
        assert_eq!(link_font_px(1.0, 100.0), 14.0);
        // Cap kicks in once the cell shrinks.
        assert_eq!(link_font_px(1.0, 70.0), 10.0);
    }

    #[test]
    fn offscreen_culling_keeps_partially_visible_cells() {
        assert!(rect_offscreen(-200.0, 0.0, 100.0, 100.0, 800.0, 600.0));
        assert!(rect_offscreen(0.0, 700.0, 100.0, 100.0, 800.0, 600.0));
        assert!(!rect_offscreen(-50.0, -50.0, 100.0, 100.0, 800.0, 600.0));
        assert!(!rect_offscreen(790.0, 590.0, 100.0, 100.0, 800.0, 600.0));
    }
}
