//! Typed wrappers around the browser APIs the widgets need.
//!
//! Every call goes through `web-sys`; failures surface as `anyhow::Error`
//! (or `None` for lookups) instead of panicking. Listeners registered here
//! live for the lifetime of the page.

use anyhow::{anyhow, Context};
use f1_db::{Table, TableSet};
use f1_sync::KeyValueStore;
use f1_viz::legend::{ApproxMeasure, TextMeasure, CHIP_FONT};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

fn window() -> anyhow::Result<web_sys::Window> {
    web_sys::window().ok_or_else(|| anyhow!("no window"))
}

fn js_error(context: &str, err: JsValue) -> anyhow::Error {
    let message = err
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err));
    anyhow!("{}: {}", context, message)
}

// ───── Fetch ─────

/// Fetch `url` as text. `Ok(None)` when the server answers with a non-2xx
/// status.
pub async fn fetch_optional_text(url: &str) -> anyhow::Result<Option<String>> {
    let response = JsFuture::from(window()?.fetch_with_str(url))
        .await
        .map_err(|e| js_error(&format!("fetch {} failed", url), e))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|e| js_error("fetch did not return a Response", e))?;
    if !response.ok() {
        log::warn!("[F1] fetch: {} returned HTTP {}", url, response.status());
        return Ok(None);
    }
    let promise = response
        .text()
        .map_err(|e| js_error(&format!("reading {} failed", url), e))?;
    let text = JsFuture::from(promise)
        .await
        .map_err(|e| js_error(&format!("reading {} failed", url), e))?;
    Ok(text.as_string())
}

/// Fetch every CSV export from `base_path` concurrently.
///
/// Required tables fail the whole load; a missing results table is left as
/// `None` for the data layer to degrade around.
pub async fn fetch_tables(base_path: &str) -> anyhow::Result<TableSet> {
    let base = base_path.trim_end_matches('/');
    let fetches = Table::ALL.into_iter().map(|table| {
        let url = format!("{}/{}", base, table.file_name());
        async move {
            let result = fetch_optional_text(&url).await;
            (table, url, result)
        }
    });
    let fetched = futures_util::future::join_all(fetches).await;

    let mut tables = TableSet::default();
    for (table, url, result) in fetched {
        match result {
            Ok(Some(text)) => tables.set(table, text),
            Ok(None) if !table.is_required() => {}
            Ok(None) => return Err(anyhow!("{} is not available", url)),
            Err(e) if !table.is_required() => {
                log::warn!("[F1] fetch: optional {} failed: {:#}", url, e);
            }
            Err(e) => return Err(e).with_context(|| format!("failed to fetch {}", url)),
        }
    }
    log::info!("[F1] fetch: loaded CSV tables from {}", base);
    Ok(tables)
}

// ───── Storage ─────

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// `window.localStorage` as a [`KeyValueStore`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        local_storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let storage = local_storage().ok_or_else(|| anyhow!("localStorage unavailable"))?;
        storage
            .set_item(key, value)
            .map_err(|e| js_error(&format!("localStorage.setItem({}) failed", key), e))
    }
}

/// Call `handler(key, new_value)` on every cross-document storage change.
pub fn on_storage_change(handler: impl Fn(Option<String>, Option<String>) + 'static) -> anyhow::Result<()> {
    let cb = Closure::wrap(Box::new(move |event: web_sys::StorageEvent| {
        handler(event.key(), event.new_value());
    }) as Box<dyn FnMut(web_sys::StorageEvent)>);
    window()?
        .add_event_listener_with_callback("storage", cb.as_ref().unchecked_ref())
        .map_err(|e| js_error("addEventListener(storage) failed", e))?;
    cb.forget();
    Ok(())
}

// ───── Keyboard ─────

/// Call `handler` whenever Escape is pressed anywhere on the page.
pub fn on_escape(handler: impl Fn() + 'static) -> anyhow::Result<()> {
    let cb = Closure::wrap(Box::new(move |event: web_sys::KeyboardEvent| {
        if event.key() == "Escape" {
            handler();
        }
    }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);
    window()?
        .add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())
        .map_err(|e| js_error("addEventListener(keydown) failed", e))?;
    cb.forget();
    Ok(())
}

// ───── Resize ─────

/// A window listener that is removed again when dropped.
pub struct WindowListener {
    event: &'static str,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref()) {
            log::warn!("[F1] bridge: removeEventListener({}) failed: {:?}", self.event, e);
        }
    }
}

/// Call `handler` on every window resize until the returned listener drops.
pub fn on_resize(handler: impl Fn() + 'static) -> anyhow::Result<WindowListener> {
    let callback = Closure::wrap(Box::new(move |_: web_sys::Event| handler()) as Box<dyn FnMut(web_sys::Event)>);
    window()?
        .add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
        .map_err(|e| js_error("addEventListener(resize) failed", e))?;
    Ok(WindowListener {
        event: "resize",
        callback,
    })
}

// ───── Layout ─────

pub fn viewport_width() -> Option<f64> {
    web_sys::window()?.inner_width().ok()?.as_f64()
}

/// Client-space `(left, top, width, height)` of the element with `id`, if
/// it is laid out.
pub fn element_rect(id: &str) -> Option<(f64, f64, f64, f64)> {
    let element = web_sys::window()?.document()?.get_element_by_id(id)?;
    let rect = element.get_bounding_client_rect();
    (rect.width() > 0.0).then(|| (rect.left(), rect.top(), rect.width(), rect.height()))
}

pub fn element_size(id: &str) -> Option<(f64, f64)> {
    element_rect(id).map(|(_, _, w, h)| (w, h))
}

pub fn element_width(id: &str) -> Option<f64> {
    element_size(id).map(|(w, _)| w)
}

// ───── Text measurement ─────

/// Measures label widths with a 2D canvas, falling back to an estimate when
/// no canvas is available.
pub struct CanvasMeasure {
    ctx: Option<web_sys::CanvasRenderingContext2d>,
    fallback: ApproxMeasure,
}

impl CanvasMeasure {
    pub fn new(font: &str) -> Self {
        let ctx = canvas_context();
        if let Some(ctx) = &ctx {
            ctx.set_font(font);
        } else {
            log::warn!("[F1] measure: no 2d canvas, using approximate text widths");
        }
        Self {
            ctx,
            fallback: ApproxMeasure::default(),
        }
    }

    /// Measure with the legend chip font.
    pub fn for_chips() -> Self {
        Self::new(CHIP_FONT)
    }
}

fn canvas_context() -> Option<web_sys::CanvasRenderingContext2d> {
    let document = web_sys::window()?.document()?;
    let canvas: web_sys::HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
    canvas.get_context("2d").ok()??.dyn_into().ok()
}

impl TextMeasure for CanvasMeasure {
    fn text_width(&self, text: &str) -> f64 {
        self.ctx
            .as_ref()
            .and_then(|ctx| ctx.measure_text(text).ok())
            .map(|m| m.width())
            .unwrap_or_else(|| self.fallback.text_width(text))
    }
}
