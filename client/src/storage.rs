#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use gloo_storage::{LocalStorage, Storage};
use grid_shared::{Square, SquareMap};

const SQUARES_STORAGE_KEY: &str = "the-grid:squares";

/// Persistence seam for the square map. The UI only talks to this trait so
/// the localStorage backend can be swapped for a server one later without
/// touching the purchase or customization flows.
pub trait SquareStore {
    /// All persisted squares, keyed by cell id.
    fn load_all(&self) -> SquareMap;
    /// Insert or replace one square.
    fn save(&self, square: &Square);
    /// Reassign a square to `new_owner`. Returns the updated square, or
    /// `None` when no square with that id exists.
    fn transfer(&self, id: &str, new_owner: &str) -> Option<Square>;
}

/// Browser-local backend; the whole map is one JSON value under a single key.
#[derive(Clone, Copy, Default)]
pub struct LocalSquareStore;

impl LocalSquareStore {
    fn write_all(&self, squares: &SquareMap) {
        if let Err(err) = LocalStorage::set(SQUARES_STORAGE_KEY, squares) {
            web_sys::console::warn_1(&format!("failed to persist squares: {err}").into());
        }
    }
}

impl SquareStore for LocalSquareStore {
    fn load_all(&self) -> SquareMap {
        LocalStorage::get(SQUARES_STORAGE_KEY).unwrap_or_default()
    }

    fn save(&self, square: &Square) {
        let mut squares = self.load_all();
        squares.insert(square.id.clone(), square.clone());
        self.write_all(&squares);
    }

    fn transfer(&self, id: &str, new_owner: &str) -> Option<Square> {
        let mut squares = self.load_all();
        let square = squares.get_mut(id)?;
        square.owner = Some(new_owner.to_string());
        let updated = square.clone();
        self.write_all(&squares);
        Some(updated)
    }
}
