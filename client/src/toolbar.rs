use leptos::prelude::*;
use wasm_bindgen::JsCast;

use grid_shared::SquareMap;

use crate::app::{SearchTerm, Selected, ShowLeaderboard};
use crate::viewport::{BASE_CELL_SIZE, Viewport};

const ZOOM_STEP: f64 = 0.1;

/// Top bar: title, square search, leaderboard toggle, and view controls.
#[component]
pub fn Toolbar() -> impl IntoView {
    let viewport: RwSignal<Viewport> = expect_context();
    let squares: RwSignal<SquareMap> = expect_context();
    let SearchTerm(search_term) = expect_context();
    let Selected(selected) = expect_context();
    let ShowLeaderboard(show_leaderboard) = expect_context();

    let on_search = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            return;
        };
        let term = input.value();
        search_term.set(term.clone());

        // Jump to the first match so the highlight is actually on screen.
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return;
        }
        let first = squares.with_untracked(|squares| {
            let mut ids: Vec<&str> = squares
                .values()
                .filter(|square| {
                    square.id.to_lowercase().contains(&needle)
                        || square
                            .owner
                            .as_deref()
                            .is_some_and(|owner| owner.to_lowercase().contains(&needle))
                })
                .map(|square| square.id.as_str())
                .collect();
            ids.sort_unstable();
            ids.first().and_then(|id| grid_shared::Position::from_cell_id(id))
        });
        if let Some(pos) = first {
            let (w, h) = window_dimensions();
            viewport.update(|vp| {
                vp.set_zoom(1.0);
                // Center the matched cell in the view.
                vp.pan_x = -(pos.x as f64) * BASE_CELL_SIZE + w / 2.0 - BASE_CELL_SIZE / 2.0;
                vp.pan_y = -(pos.y as f64) * BASE_CELL_SIZE + h / 2.0 - BASE_CELL_SIZE / 2.0;
            });
        }
    };

    view! {
        <div style="display: flex; align-items: center; justify-content: space-between; padding: 10px 16px; background: #fff; box-shadow: 0 1px 4px rgba(0,0,0,0.15); z-index: 10;">
            <h1 style="font-size: 1.4rem; font-weight: bold; margin: 0;">"The Grid"</h1>
            <div style="display: flex; align-items: center; gap: 10px;">
                <input
                    type="text"
                    placeholder="Search squares..."
                    prop:value=move || search_term.get()
                    on:input=on_search
                    style="padding: 6px 14px; border: 1px solid #ccc; border-radius: 16px; width: 200px;"
                />
                <button
                    on:click=move |_| show_leaderboard.update(|v| *v = !*v)
                    style="padding: 6px 14px; background: #eab308; color: #fff; border: none; border-radius: 4px; cursor: pointer;"
                >
                    "Leaderboard"
                </button>
                <button
                    title="Reset View"
                    on:click=move |_| {
                        viewport.update(Viewport::reset);
                        selected.set(None);
                    }
                    style="padding: 6px 12px; background: #e5e7eb; border: none; border-radius: 16px; cursor: pointer;"
                >
                    "Home"
                </button>
                <button
                    title="Zoom Out"
                    on:click=move |_| viewport.update(|vp| vp.zoom_by(-ZOOM_STEP))
                    style="padding: 6px 12px; background: #e5e7eb; border: none; border-radius: 16px; cursor: pointer;"
                >
                    "\u{2212}"
                </button>
                <span style="font-weight: 500; min-width: 48px; text-align: center;">
                    {move || format!("{:.0}%", viewport.get().zoom * 100.0)}
                </span>
                <button
                    title="Zoom In"
                    on:click=move |_| viewport.update(|vp| vp.zoom_by(ZOOM_STEP))
                    style="padding: 6px 12px; background: #e5e7eb; border: none; border-radius: 16px; cursor: pointer;"
                >
                    "+"
                </button>
            </div>
        </div>
    }
}

fn window_dimensions() -> (f64, f64) {
    let Some(window) = web_sys::window() else {
        return (800.0, 600.0);
    };
    let w = window
        .inner_width()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(800.0);
    let h = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(600.0);
    (w, h)
}
