#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::rc::Rc;

use js_sys::Reflect;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;

const ONLOAD_HANDLE_KEY: &str = "__gridImageOnload";
const ONERROR_HANDLE_KEY: &str = "__gridImageOnerror";

/// Decoded square images keyed by source URL.
pub type LoadedImages = HashMap<String, HtmlImageElement>;

/// Demand-driven image cache for square backgrounds.
///
/// The renderer calls [`ImageLoader::request`] for every image URL it
/// encounters while painting; URLs already loaded or in flight are ignored.
/// A finished load lands in the `images` signal, which the canvas observes
/// to enqueue a repaint, so the square fills in on a later frame rather
/// than blocking the current one.
#[derive(Clone)]
pub struct ImageLoader {
    images: RwSignal<LoadedImages>,
    pending: Rc<RefCell<HashSet<String>>>,
    failed: Rc<RefCell<HashSet<String>>>,
}

impl ImageLoader {
    pub fn new(images: RwSignal<LoadedImages>) -> Self {
        Self {
            images,
            pending: Rc::new(RefCell::new(HashSet::new())),
            failed: Rc::new(RefCell::new(HashSet::new())),
        }
    }

    /// Begin loading `src` unless it is already loaded, in flight, or failed.
    pub fn request(&self, src: &str) {
        if self.pending.borrow().contains(src)
            || self.failed.borrow().contains(src)
            || self.images.with_untracked(|images| images.contains_key(src))
        {
            return;
        }

        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(_) => return,
        };
        self.pending.borrow_mut().insert(src.to_string());

        let src_owned = src.to_string();
        let images = self.images;
        let pending = self.pending.clone();
        let img_for_load = img.clone();
        let src_for_load = src_owned.clone();
        let onload = Closure::<dyn FnMut()>::new(move || {
            clear_image_handlers(&img_for_load);
            pending.borrow_mut().remove(&src_for_load);
            let img = img_for_load.clone();
            let src = src_for_load.clone();
            images.update(|loaded| {
                loaded.insert(src, img);
            });
        });

        let pending_err = self.pending.clone();
        let failed = self.failed.clone();
        let img_for_error = img.clone();
        let src_for_error = src_owned.clone();
        let onerror = Closure::<dyn FnMut()>::new(move || {
            clear_image_handlers(&img_for_error);
            pending_err.borrow_mut().remove(&src_for_error);
            // Remember the failure so a repaint does not retry every frame.
            failed.borrow_mut().insert(src_for_error.clone());
        });

        let onload_js = onload.into_js_value();
        let onerror_js = onerror.into_js_value();
        img.set_onload(Some(onload_js.unchecked_ref()));
        img.set_onerror(Some(onerror_js.unchecked_ref()));
        let _ = Reflect::set(
            img.as_ref(),
            &JsValue::from_str(ONLOAD_HANDLE_KEY),
            &onload_js,
        );
        let _ = Reflect::set(
            img.as_ref(),
            &JsValue::from_str(ONERROR_HANDLE_KEY),
            &onerror_js,
        );
        img.set_src(&src_owned);
    }
}

fn clear_image_handlers(img: &HtmlImageElement) {
    img.set_onload(None);
    img.set_onerror(None);
    let _ = Reflect::delete_property(img.as_ref(), &JsValue::from_str(ONLOAD_HANDLE_KEY));
    let _ = Reflect::delete_property(img.as_ref(), &JsValue::from_str(ONERROR_HANDLE_KEY));
}
