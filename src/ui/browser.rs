//! Browser implementation of the page host on top of `web-sys`
//!
//! Listener and observer closures are leaked with `forget()`: the page keeps
//! them for its whole lifetime.

use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, EventTarget, HtmlButtonElement, HtmlElement,
    HtmlInputElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent, MouseEvent, Node, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition,
    ScrollToOptions, Window,
};

use crate::core::config::CONFIG_ELEMENT_ID;
use crate::core::host::{Listener, VisibilityCallback};
use crate::core::{
    DomEvent, DomNode, Host, Landing, LandingConfig, LandingError, ObserverOptions, Rect, Target,
    log_debug_info,
};

impl DomNode for HtmlElement {
    fn tag_name(&self) -> String {
        Element::tag_name(self).to_lowercase()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        Element::get_attribute(self, name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        let _ = Element::set_attribute(self, name, value);
    }

    fn has_class(&self, class: &str) -> bool {
        Element::class_list(self).contains(class)
    }

    fn add_class(&self, class: &str) {
        let _ = Element::class_list(self).add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = Element::class_list(self).remove_1(class);
    }

    fn set_class_name(&self, class_name: &str) {
        Element::set_class_name(self, class_name);
    }

    fn style(&self, property: &str) -> String {
        HtmlElement::style(self)
            .get_property_value(property)
            .unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        let _ = HtmlElement::style(self).set_property(property, value);
    }

    fn remove_style(&self, property: &str) {
        let _ = HtmlElement::style(self).remove_property(property);
    }

    fn text(&self) -> String {
        Node::text_content(self).unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        Node::set_text_content(self, Some(text));
    }

    fn value(&self) -> String {
        self.dyn_ref::<HtmlInputElement>()
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn set_value(&self, value: &str) {
        if let Some(input) = self.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        }
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(button) = self.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if let Some(input) = self.dyn_ref::<HtmlInputElement>() {
            input.set_disabled(disabled);
        }
    }

    fn focus(&self) {
        let _ = HtmlElement::focus(self);
    }

    fn scroll_into_view(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Nearest);
        Element::scroll_into_view_with_scroll_into_view_options(self, &options);
    }

    fn rect(&self) -> Rect {
        let rect = Element::get_bounding_client_rect(self);
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn offset_top(&self) -> f64 {
        HtmlElement::offset_top(self) as f64
    }

    fn offset_height(&self) -> f64 {
        HtmlElement::offset_height(self) as f64
    }

    fn parent(&self) -> Option<Self> {
        Node::parent_element(self).and_then(|parent| parent.dyn_into::<HtmlElement>().ok())
    }

    fn children(&self) -> Vec<Self> {
        let children = Element::children(self);
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter_map(|child| child.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn append_child(&self, child: &Self) {
        let _ = Node::append_child(self, child);
    }

    fn remove(&self) {
        Element::remove(self);
    }

    fn is_connected(&self) -> bool {
        Node::is_connected(self)
    }

    fn is_same(&self, other: &Self) -> bool {
        let other: &Node = other;
        Node::is_same_node(self, Some(other))
    }
}

/// The live page: window, document and their timers
pub struct BrowserHost {
    window: Window,
    document: Document,
}

impl BrowserHost {
    pub fn new() -> Result<Self, LandingError> {
        let window =
            web_sys::window().ok_or_else(|| LandingError::Browser("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| LandingError::Browser("no document".to_string()))?;
        Ok(Self { window, document })
    }

    fn event_target(&self, target: Target<'_, HtmlElement>) -> EventTarget {
        match target {
            Target::Window => self.window.clone().into(),
            Target::Document => self.document.clone().into(),
            Target::Element(element) => element.clone().into(),
        }
    }
}

/// Translate a browser event for the component listeners
fn dom_event(event: &web_sys::Event) -> DomEvent<HtmlElement> {
    let target = event
        .target()
        .and_then(|target| target.dyn_into::<HtmlElement>().ok());
    let mut dom_event = DomEvent::new(target);
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        dom_event = dom_event.with_pointer(mouse.client_x() as f64, mouse.client_y() as f64);
    }
    if let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() {
        dom_event = dom_event.with_key(keyboard.key());
    }
    dom_event
}

impl Host for BrowserHost {
    type Node = HtmlElement;

    fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }

    fn head(&self) -> Option<HtmlElement> {
        self.document.head().map(Into::into)
    }

    fn create_element(&self, tag: &str) -> Option<HtmlElement> {
        self.document
            .create_element(tag)
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn query_all(&self, selector: &str) -> Vec<HtmlElement> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            leptos::logging::warn!("Invalid selector: {}", selector);
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0)
    }

    fn document_height(&self) -> f64 {
        self.document
            .document_element()
            .map(|root| root.scroll_height() as f64)
            .unwrap_or(0.0)
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn random(&self) -> f64 {
        js_sys::Math::random()
    }

    fn listen(&self, target: Target<'_, HtmlElement>, name: &str, listener: Listener<HtmlElement>) {
        let handler = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
            let translated = dom_event(&event);
            listener(&translated);
            if translated.is_default_prevented() {
                event.prevent_default();
            }
        });

        let _ = self
            .event_target(target)
            .add_event_listener_with_callback(name, handler.as_ref().unchecked_ref());
        handler.forget();
    }

    fn observe(
        &self,
        target: &HtmlElement,
        options: &ObserverOptions,
        on_visible: VisibilityCallback<HtmlElement>,
    ) {
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    if let Ok(element) = entry.target().dyn_into::<HtmlElement>() {
                        on_visible(&element);
                    }
                }
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => observer.observe(target),
            Err(e) => leptos::logging::warn!("Failed to create intersection observer: {:?}", e),
        }
        callback.forget();
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, callback).forget();
    }

    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>) {
        leptos::prelude::request_animation_frame(callback);
    }
}

/// Read configuration overrides from the page, falling back to defaults
fn read_config(host: &BrowserHost) -> LandingConfig {
    let Some(element) = host.element_by_id(CONFIG_ELEMENT_ID) else {
        return LandingConfig::default();
    };
    match LandingConfig::from_json(&element.text()) {
        Ok(config) => config,
        Err(e) => {
            leptos::logging::warn!("{}; using defaults", e);
            LandingConfig::default()
        }
    }
}

/// Install `window.debugTapIn()`
fn expose_debug_helper(host: Rc<BrowserHost>) -> Result<(), LandingError> {
    let window = host.window.clone();
    let debug = Closure::<dyn Fn() -> JsValue>::new(move || {
        let counts = log_debug_info(host.as_ref());
        serde_wasm_bindgen::to_value(&counts).unwrap_or(JsValue::UNDEFINED)
    });

    js_sys::Reflect::set(&window, &JsValue::from_str("debugTapIn"), debug.as_ref())
        .map_err(|e| LandingError::Browser(format!("{:?}", e)))?;
    debug.forget();
    Ok(())
}

fn boot() {
    let host = match BrowserHost::new() {
        Ok(host) => Rc::new(host),
        Err(e) => {
            leptos::logging::warn!("{}", e);
            return;
        }
    };

    let config = read_config(&host);
    Landing::init(host.clone(), &config);

    if let Err(e) = expose_debug_helper(host) {
        leptos::logging::warn!("{}", e);
    }
}

/// Start the page behaviors once the DOM is ready
pub fn mount() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        leptos::logging::warn!("No document to mount on");
        return;
    };

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(boot);
        let _ = document
            .add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref());
    } else {
        boot();
    }
}
