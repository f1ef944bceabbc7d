//! Divergence web frontend
//!
//! Browser client for the Divergence backend. Renders the landing, home,
//! profile and project pages with egui and keeps the session in
//! `localStorage`.

#![cfg(target_arch = "wasm32")]

mod app;
mod http_client;
mod pages;
mod platforms;
mod storage;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize tracing for WASM
    tracing_wasm::set_as_global_default();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let canvas = document
        .get_element_by_id("canvas")
        .ok_or_else(|| JsValue::from_str("No canvas element"))?
        .dyn_into::<web_sys::HtmlCanvasElement>()?;

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async move {
        let started = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| {
                    egui_extras::install_image_loaders(&cc.egui_ctx);
                    let mut fonts = egui::FontDefinitions::default();
                    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
                    cc.egui_ctx.set_fonts(fonts);
                    Ok(Box::new(app::WebApp::new(cc.egui_ctx.clone())))
                }),
            )
            .await;
        if let Err(e) = started {
            tracing::error!("Failed to start eframe: {:?}", e);
        }
    });

    Ok(())
}
