//! Browser entry point: mounts the radar into a canvas appended to the page
//! and forwards DOM events to the view.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent, WheelEvent, Window,
};

use crate::config::{SegmentCount, ViewConfig};
use crate::input::{wheel_notch, MouseButton, PixelRatio, SegmentKey};
use crate::render::CanvasRenderer;
use crate::view::{Platform, RadarView};

type SharedView = Rc<RefCell<RadarView<CanvasRenderer>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Handle owned by JavaScript. Dropping it detaches every DOM listener.
#[wasm_bindgen]
pub struct RadarApp {
    view: SharedView,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl RadarApp {
    /// Mounts the radar with `segments` wedges, or the default count.
    #[wasm_bindgen(constructor)]
    pub fn new(segments: Option<u32>) -> Result<RadarApp, JsValue> {
        let segments = match segments {
            Some(value) => SegmentCount::new(value as i64).map_err(to_js)?,
            None => SegmentCount::DEFAULT,
        };
        Self::mount(segments).map_err(to_js)
    }

    #[wasm_bindgen(js_name = isHeadless)]
    pub fn is_headless(&self) -> bool {
        self.view.borrow().is_headless()
    }

    #[wasm_bindgen(js_name = segmentCount)]
    pub fn segment_count(&self) -> Option<u32> {
        self.view.borrow().segment_count().map(SegmentCount::get)
    }

    /// Applies a user supplied count. Returns `false` when the value was
    /// rejected and the scene kept as is.
    #[wasm_bindgen(js_name = setSegmentCount)]
    pub fn set_segment_count(&self, value: f64) -> Result<bool, JsValue> {
        self.view
            .borrow_mut()
            .on_segment_input(value)
            .map_err(to_js)
    }

    /// Forwards `change` events of the `<input>` with `id` to the view.
    #[wasm_bindgen(js_name = bindInput)]
    pub fn bind_input(&mut self, id: &str) -> Result<(), JsValue> {
        if self.is_headless() {
            return Ok(());
        }
        let document = browser()
            .map(|(_, document)| document)
            .ok_or_else(|| JsValue::from_str("document not available"))?;
        let input = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {id}")))?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| JsValue::from_str(&format!("element {id} is not an input")))?;

        let view = Rc::clone(&self.view);
        let source = input.clone();
        let listener = EventListener::new(&input, "change", move |_| {
            with_view(&view, |view| view.on_segment_input(source.value_as_number()).map(drop));
        });
        self.listeners.push(listener);
        Ok(())
    }

    pub fn render(&self) -> Result<(), JsValue> {
        self.view.borrow_mut().render().map_err(to_js)
    }
}

impl RadarApp {
    fn mount(segments: SegmentCount) -> Result<Self> {
        let Some((window, document)) = browser() else {
            let view = RadarView::mount(Platform::Headless, ViewConfig::default())?;
            return Ok(Self {
                view: Rc::new(RefCell::new(view)),
                listeners: Vec::new(),
            });
        };

        let canvas = create_canvas(&document)?;
        let (width, height) = fit_canvas(&window, &canvas)?;
        canvas.set_width(width);
        canvas.set_height(height);
        let renderer = CanvasRenderer::new(canvas.clone())?;
        let config = ViewConfig {
            segments,
            width,
            height,
            ..ViewConfig::default()
        };
        let view: SharedView = Rc::new(RefCell::new(RadarView::mount(
            Platform::Display(renderer),
            config,
        )?));
        let listeners = attach_listeners(&view, &window, &document, &canvas);
        Ok(Self { view, listeners })
    }
}

/// Window and document, when running inside a page.
fn browser() -> Option<(Window, Document)> {
    let window = web_sys::window()?;
    let document = window.document()?;
    Some((window, document))
}

fn pixel_ratio(window: &Window) -> PixelRatio {
    PixelRatio::new(window.device_pixel_ratio())
}

/// Window inner size in CSS pixels.
fn inner_size(window: &Window) -> (f64, f64) {
    let read = |value: Result<JsValue, JsValue>| {
        value
            .ok()
            .and_then(|value| value.as_f64())
            .map(|value| value.max(1.0))
            .unwrap_or(1.0)
    };
    (read(window.inner_width()), read(window.inner_height()))
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement> {
    let canvas = document
        .create_element("canvas")
        .map_err(|err| anyhow!("failed to create canvas: {err:?}"))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| anyhow!("created element is not a canvas"))?;
    let body = document
        .body()
        .ok_or_else(|| anyhow!("document has no body"))?;
    body.append_child(&canvas)
        .map_err(|err| anyhow!("failed to attach canvas: {err:?}"))?;
    Ok(canvas)
}

/// Stretches the canvas over the window in CSS pixels and returns the
/// backing-store size for the current device pixel ratio.
fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> Result<(u32, u32)> {
    let (css_width, css_height) = inner_size(window);
    let style = canvas.style();
    style
        .set_property("width", &format!("{css_width}px"))
        .and_then(|()| style.set_property("height", &format!("{css_height}px")))
        .map_err(|err| anyhow!("failed to size canvas: {err:?}"))?;
    Ok(pixel_ratio(window).to_physical_size(css_width, css_height))
}

/// Mouse position in backing-store pixels.
fn surface_point(window: &Window, event: &MouseEvent) -> (f32, f32) {
    pixel_ratio(window).to_physical_point(event.offset_x() as f64, event.offset_y() as f64)
}

fn attach_listeners(
    view: &SharedView,
    window: &Window,
    document: &Document,
    canvas: &HtmlCanvasElement,
) -> Vec<EventListener> {
    let mut listeners = Vec::new();

    {
        let view = Rc::clone(view);
        let source = window.clone();
        let canvas = canvas.clone();
        listeners.push(EventListener::new(window, "resize", move |_| {
            with_view(&view, |view| {
                let (width, height) = fit_canvas(&source, &canvas)?;
                view.resize(width, height)
            });
        }));
    }

    {
        let view = Rc::clone(view);
        let window = window.clone();
        listeners.push(EventListener::new(canvas, "mousedown", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let button = MouseButton::from_dom(event.button());
                let (x, y) = surface_point(&window, event);
                with_view(&view, |view| {
                    view.pointer_down(button, x, y);
                    Ok(())
                });
            }
        }));
    }

    {
        let view = Rc::clone(view);
        let window = window.clone();
        listeners.push(EventListener::new(canvas, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let (x, y) = surface_point(&window, event);
                with_view(&view, |view| view.pointer_move(x, y));
            }
        }));
    }

    {
        let view = Rc::clone(view);
        listeners.push(EventListener::new(canvas, "mouseup", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                let button = MouseButton::from_dom(event.button());
                with_view(&view, |view| {
                    view.pointer_up(button);
                    Ok(())
                });
            }
        }));
    }

    // Right drag pans, so keep the browser menu out of the way.
    listeners.push(EventListener::new_with_options(
        canvas,
        "contextmenu",
        EventListenerOptions::enable_prevent_default(),
        |event| event.prevent_default(),
    ));

    {
        let view = Rc::clone(view);
        listeners.push(EventListener::new_with_options(
            canvas,
            "wheel",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let Some(event) = event.dyn_ref::<WheelEvent>() {
                    event.prevent_default();
                    let notch = wheel_notch(event.delta_y());
                    with_view(&view, |view| view.wheel(notch));
                }
            },
        ));
    }

    {
        let view = Rc::clone(view);
        listeners.push(EventListener::new(document, "keydown", move |event| {
            let from_text_field = event
                .target()
                .is_some_and(|target| target.has_type::<HtmlInputElement>());
            let Some(key) = event
                .dyn_ref::<KeyboardEvent>()
                .and_then(|event| SegmentKey::from_document_key(&event.key(), from_text_field))
            else {
                return;
            };
            with_view(&view, |view| {
                match view.segment_count().and_then(|count| count.step(key.delta())) {
                    Some(next) => view.set_segment_count(next),
                    None => Ok(()),
                }
            });
        }));
    }

    listeners
}

/// Runs `action` unless the view is already borrowed by an outer callback.
fn with_view(
    view: &SharedView,
    action: impl FnOnce(&mut RadarView<CanvasRenderer>) -> Result<()>,
) {
    let Ok(mut view) = view.try_borrow_mut() else {
        return;
    };
    if let Err(err) = action(&mut view) {
        web_sys::console::error_1(&JsValue::from_str(&format!("{err:?}")));
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{err:#}"))
}
