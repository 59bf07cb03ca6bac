//! WebAssembly bindings for pixelgrid

use crate::{CanvasSize, ClickOutcome, ColorMode, ImageBuffer, Session};
use wasm_bindgen::prelude::*;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WasmSession {
    inner: Session,
}

#[wasm_bindgen]
impl WasmSession {
    /// Create a session from canvas `ImageData` bytes (always RGBA).
    #[wasm_bindgen(constructor)]
    pub fn new(image_data: &[u8], width: u32, height: u32) -> Result<WasmSession, JsValue> {
        let image = ImageBuffer::from_raw(width, height, ColorMode::Rgba, image_data.to_vec())
            .map_err(js_err)?;
        Ok(WasmSession { inner: Session::new(image) })
    }

    #[wasm_bindgen]
    pub fn set_canvas(&mut self, width: u32, height: u32) {
        self.inner.set_canvas(CanvasSize::new(width, height));
    }

    #[wasm_bindgen]
    pub fn begin_selection(&mut self) {
        self.inner.begin_selection();
    }

    #[wasm_bindgen]
    pub fn clear_selection(&mut self) {
        self.inner.clear_selection();
    }

    /// Returns "ignored", "first" or "grid".
    #[wasm_bindgen]
    pub fn click(&mut self, x: f64, y: f64) -> Result<String, JsValue> {
        let outcome = self.inner.click(x, y).map_err(js_err)?;
        Ok(match outcome {
            ClickOutcome::Ignored => "ignored",
            ClickOutcome::FirstCorner(p) => {
                web_sys::console::log_1(&format!("first corner at ({}, {})", p.x, p.y).into());
                "first"
            }
            ClickOutcome::GridReady(_) => "grid",
        }
        .to_string())
    }

    #[wasm_bindgen]
    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    #[wasm_bindgen]
    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    #[wasm_bindgen]
    pub fn reset_view(&mut self) {
        self.inner.reset_view();
    }

    #[wasm_bindgen]
    pub fn pan_by(&mut self, dx: i32, dy: i32) {
        self.inner.pan_by(dx, dy);
    }

    /// Current view as `{zoom, pan_x, pan_y, base_scale}` JSON.
    #[wasm_bindgen]
    pub fn view_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.inner.view()).map_err(js_err)
    }

    /// Current grid as `{cell_size, offset_x, offset_y}` JSON, or `null`.
    #[wasm_bindgen]
    pub fn grid_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.grid()).map_err(js_err)
    }

    /// Source with the grid drawn over it, as RGBA bytes of the source size.
    #[wasm_bindgen]
    pub fn overlay_rgba(&self) -> Result<Vec<u8>, JsValue> {
        let preview = self.inner.preview().map_err(js_err)?;
        Ok(preview.into_raw())
    }

    /// Resample and return `{data, width, height}` with RGBA `data`.
    #[wasm_bindgen]
    pub fn process(&mut self) -> Result<js_sys::Object, JsValue> {
        let out = self.inner.process().map_err(js_err)?;
        let result = js_sys::Object::new();
        js_sys::Reflect::set(&result, &"data".into(), &js_sys::Uint8Array::from(out.pixels()))?;
        js_sys::Reflect::set(&result, &"width".into(), &out.width().into())?;
        js_sys::Reflect::set(&result, &"height".into(), &out.height().into())?;
        Ok(result)
    }
}
