use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, WheelEvent};

use grid_shared::{Position, SquareMap};

use crate::app::{SearchResults, Selected};
use crate::grid_layout::{
    self, CELL_INSET_PX, DEFAULT_CONTENT_FONT_PX, DEFAULT_FONT_FAMILY, DEFAULT_FONT_WEIGHT,
    cell_rect, content_font_px, grid_line_phase, link_font_px, owner_font_px, rect_offscreen,
};
use crate::images::{ImageLoader, LoadedImages};
use crate::render_loop::RenderScheduler;
use crate::text_fit::{TextMeasure, fit_text};
use crate::viewport::Viewport;

const CLICK_SLOP_PX: f64 = 5.0;
const WHEEL_ZOOM_SENSITIVITY: f64 = 0.001;
const LINK_GLYPH: &str = "\u{1F517}";

/// Measures text against the live 2D context so fitted sizes match what
/// `fill_text` will actually paint.
struct CanvasTextMeasure<'a> {
    ctx: &'a CanvasRenderingContext2d,
    weight: &'a str,
    family: &'a str,
}

impl CanvasTextMeasure<'_> {
    fn set_font(&self, font_px: f64) {
        self.ctx
            .set_font(&format!("{} {font_px}px {}", self.weight, self.family));
    }
}

impl TextMeasure for CanvasTextMeasure<'_> {
    fn text_width(&self, text: &str, font_px: f64) -> f64 {
        self.set_font(font_px);
        self.ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
    }

    fn text_height(&self, text: &str, font_px: f64) -> f64 {
        self.set_font(font_px);
        self.ctx
            .measure_text(text)
            .map(|m| m.actual_bounding_box_ascent() + m.actual_bounding_box_descent())
            .unwrap_or(font_px)
    }
}

/// Canvas 2D grid renderer. Every frame repaints the whole scene from the
/// current signals; the scheduler coalesces bursts of changes into one rAF.
#[component]
pub fn GridCanvas() -> impl IntoView {
    let viewport: RwSignal<Viewport> = expect_context();
    let squares: RwSignal<SquareMap> = expect_context();
    let loaded_images: RwSignal<LoadedImages> = expect_context();
    let Selected(selected) = expect_context();
    let SearchResults(search_results) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let image_loader = ImageLoader::new(loaded_images);

    // Track drag state
    let is_dragging = Rc::new(Cell::new(false));
    let drag_start_x = Rc::new(Cell::new(0.0f64));
    let drag_start_y = Rc::new(Cell::new(0.0f64));
    let last_x = Rc::new(Cell::new(0.0f64));
    let last_y = Rc::new(Cell::new(0.0f64));

    let loader_render = image_loader.clone();
    let scheduler = RenderScheduler::new(move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return;
        };
        let canvas: &HtmlCanvasElement = &canvas;

        let Some(parent) = canvas.parent_element() else {
            return;
        };
        let w = parent.client_width() as f64;
        let h = parent.client_height() as f64;
        if w <= 0.0 || h <= 0.0 {
            return;
        }

        let dpr = web_sys::window()
            .map(|win| win.device_pixel_ratio())
            .unwrap_or(1.0);
        let px_w = (w * dpr) as u32;
        let px_h = (h * dpr) as u32;
        if canvas.width() != px_w || canvas.height() != px_h {
            canvas.set_width(px_w);
            canvas.set_height(px_h);
        }

        let Some(ctx) = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        else {
            return;
        };
        ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0).ok();

        viewport.with_untracked(|vp| {
            squares.with_untracked(|squares| {
                selected.with_untracked(|selected| {
                    search_results.with_untracked(|search| {
                        loaded_images.with_untracked(|images| {
                            render_grid(GridFrameInput {
                                ctx: &ctx,
                                w,
                                h,
                                vp,
                                squares,
                                selected,
                                search,
                                images,
                                loader: &loader_render,
                            });
                        });
                    });
                });
            });
        });
    });
    let scheduler = Rc::new(scheduler);

    // Any grid state change enqueues exactly one repaint.
    let sched_state = scheduler.clone();
    Effect::new(move || {
        viewport.track();
        squares.track();
        selected.track();
        search_results.track();
        loaded_images.track();
        sched_state.mark_dirty();
    });

    // --- Input handlers ---

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let delta = -e.delta_y() * WHEEL_ZOOM_SENSITIVITY;
        viewport.update(|vp| vp.zoom_by(delta));
    };

    let on_pointer_down = {
        let is_dragging = is_dragging.clone();
        let drag_start_x = drag_start_x.clone();
        let drag_start_y = drag_start_y.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            is_dragging.set(true);
            drag_start_x.set(e.client_x() as f64);
            drag_start_y.set(e.client_y() as f64);
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let is_dragging = is_dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            if !is_dragging.get() {
                return;
            }
            let dx = e.client_x() as f64 - last_x.get();
            let dy = e.client_y() as f64 - last_y.get();
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);
            viewport.update(|vp| vp.pan(dx, dy));
        }
    };

    let on_pointer_up = {
        let is_dragging = is_dragging.clone();
        let drag_start_x = drag_start_x.clone();
        let drag_start_y = drag_start_y.clone();
        move |e: PointerEvent| {
            is_dragging.set(false);

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }

            // A release within the slop radius is a click, not a drag.
            let dx = (e.client_x() as f64 - drag_start_x.get()).abs();
            let dy = (e.client_y() as f64 - drag_start_y.get()).abs();
            if dx >= CLICK_SLOP_PX || dy >= CLICK_SLOP_PX {
                return;
            }

            let local = canvas_ref
                .get_untracked()
                .map(|el| {
                    let rect = el.get_bounding_client_rect();
                    (
                        e.client_x() as f64 - rect.left(),
                        e.client_y() as f64 - rect.top(),
                    )
                })
                .unwrap_or((e.offset_x() as f64, e.offset_y() as f64));
            let cell = viewport.with_untracked(|vp| vp.screen_to_cell(local.0, local.1));

            if selected.get_untracked() != Some(cell) {
                selected.set(Some(cell));
            }

            let link = squares.with_untracked(|squares| {
                squares
                    .get(&cell.cell_id())
                    .and_then(|square| square.content.link.clone())
            });
            if let Some(link) = link
                && let Some(window) = web_sys::window()
            {
                window.open_with_url_and_target(&link, "_blank").ok();
            }
        }
    };

    let on_pointer_leave = {
        let is_dragging = is_dragging.clone();
        move |_: PointerEvent| {
            is_dragging.set(false);
        }
    };

    view! {
        <div style="position: relative; flex: 1; overflow: hidden;">
            <canvas
                node_ref=canvas_ref
                style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none; cursor: grab;"
                on:wheel=on_wheel
                on:pointerdown=on_pointer_down
                on:pointermove=on_pointer_move
                on:pointerup=on_pointer_up
                on:pointerleave=on_pointer_leave
            />
        </div>
    }
}

struct GridFrameInput<'a> {
    ctx: &'a CanvasRenderingContext2d,
    w: f64,
    h: f64,
    vp: &'a Viewport,
    squares: &'a SquareMap,
    selected: &'a Option<Position>,
    search: &'a HashSet<String>,
    images: &'a LoadedImages,
    loader: &'a ImageLoader,
}

/// Paint one full frame: grid lines, squares with their content, then the
/// search and selection highlights on top.
fn render_grid(input: GridFrameInput<'_>) {
    let GridFrameInput {
        ctx,
        w,
        h,
        vp,
        squares,
        selected,
        search,
        images,
        loader,
    } = input;

    ctx.clear_rect(0.0, 0.0, w, h);

    let cell_px = vp.cell_size_px();
    let (offset_x, offset_y) = vp.offset_px();

    // Grid lines across the visible area.
    ctx.set_stroke_style_str(grid_layout::GRID_LINE_COLOR);
    ctx.set_line_width(1.0);
    let mut x = grid_line_phase(offset_x, cell_px);
    while x < w {
        ctx.begin_path();
        ctx.move_to(x, 0.0);
        ctx.line_to(x, h);
        ctx.stroke();
        x += cell_px;
    }
    let mut y = grid_line_phase(offset_y, cell_px);
    while y < h {
        ctx.begin_path();
        ctx.move_to(0.0, y);
        ctx.line_to(w, y);
        ctx.stroke();
        y += cell_px;
    }

    // Stable paint order so overlapping strokes look the same every frame.
    let mut ordered: Vec<&grid_shared::Square> = squares.values().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    for square in ordered {
        let Some(position) = Position::from_cell_id(&square.id) else {
            continue;
        };
        let (sx, sy, sw, sh) = cell_rect(position.x, position.y, cell_px, offset_x, offset_y);
        if rect_offscreen(sx, sy, sw, sh, w, h) {
            continue;
        }

        let bg = square
            .content
            .background_color
            .as_deref()
            .unwrap_or(grid_layout::DEFAULT_SQUARE_BG);
        ctx.set_fill_style_str(bg);
        ctx.fill_rect(sx, sy, sw, sh);

        ctx.set_stroke_style_str(grid_layout::SQUARE_BORDER_COLOR);
        ctx.set_line_width(1.0);
        ctx.stroke_rect(sx, sy, sw, sh);

        if let Some(text) = &square.content.text {
            let weight = square
                .content
                .font_weight
                .as_deref()
                .unwrap_or(DEFAULT_FONT_WEIGHT);
            let family = square
                .content
                .font_family
                .as_deref()
                .unwrap_or(DEFAULT_FONT_FAMILY);
            let configured = square.content.font_size.unwrap_or(DEFAULT_CONTENT_FONT_PX);
            let max_font = content_font_px(configured, vp.zoom, cell_px);
            let box_size = cell_px - 2.0 * CELL_INSET_PX;

            let measure = CanvasTextMeasure {
                ctx,
                weight,
                family,
            };
            let fitted = fit_text(&measure, text, max_font, box_size, box_size);

            measure.set_font(fitted.font_px);
            ctx.set_fill_style_str("#000");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            let cx = sx + sw / 2.0;
            let line_height = fitted.line_height();
            let mut line_y =
                sy + sh / 2.0 - (fitted.lines.len().saturating_sub(1)) as f64 * line_height / 2.0;
            for line in &fitted.lines {
                ctx.fill_text(line, cx, line_y).ok();
                line_y += line_height;
            }
        }

        // Image lands over the text, under the owner label and link glyph.
        if let Some(src) = &square.content.image {
            match images.get(src) {
                Some(img) => {
                    ctx.draw_image_with_html_image_element_and_dw_and_dh(img, sx, sy, sw, sh)
                        .ok();
                }
                // Kick off the load; the images signal enqueues a repaint
                // once it lands.
                None => loader.request(src),
            }
        }

        if let Some(owner) = &square.owner {
            ctx.set_fill_style_str(grid_layout::OWNER_LABEL_COLOR);
            ctx.set_font(&format!("{}px Arial", owner_font_px(vp.zoom, cell_px)));
            ctx.set_text_align("left");
            ctx.set_text_baseline("top");
            ctx.fill_text(owner, sx + CELL_INSET_PX, sy + CELL_INSET_PX).ok();
        }

        if square.content.link.is_some() {
            ctx.set_fill_style_str(grid_layout::LINK_MARKER_COLOR);
            ctx.set_font(&format!("{}px Arial", link_font_px(vp.zoom, cell_px)));
            ctx.set_text_align("right");
            ctx.set_text_baseline("bottom");
            ctx.fill_text(LINK_GLYPH, sx + sw - CELL_INSET_PX, sy + sh - CELL_INSET_PX)
                .ok();
        }
    }

    // Search highlights, then the selection on top of everything.
    ctx.set_line_width(grid_layout::HIGHLIGHT_LINE_WIDTH);
    ctx.set_stroke_style_str(grid_layout::SEARCH_HIGHLIGHT_COLOR);
    for id in search {
        let Some(position) = Position::from_cell_id(id) else {
            continue;
        };
        let (sx, sy, sw, sh) = cell_rect(position.x, position.y, cell_px, offset_x, offset_y);
        if !rect_offscreen(sx, sy, sw, sh, w, h) {
            ctx.stroke_rect(sx, sy, sw, sh);
        }
    }

    if let Some(position) = selected {
        let (sx, sy, sw, sh) = cell_rect(position.x, position.y, cell_px, offset_x, offset_y);
        ctx.set_stroke_style_str(grid_layout::SELECTION_HIGHLIGHT_COLOR);
        ctx.stroke_rect(sx, sy, sw, sh);
    }
}
