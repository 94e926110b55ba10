//! Host abstraction over the page document, viewport and event loop
//!
//! Every component is written against [`Host`] and [`DomNode`] instead of the
//! browser APIs directly. The browser binding lives in `ui::browser`; tests use
//! the in-memory host from `core::testing`.

use std::cell::Cell;
use std::time::Duration;

/// Bounding box of an element relative to the viewport
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// A handle to one element of the page
///
/// Handles are cheap to clone and compare by identity through [`DomNode::is_same`].
/// Style properties use CSS names (`z-index`, not `zIndex`).
pub trait DomNode: Clone + 'static {
    fn tag_name(&self) -> String;
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);

    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    /// Replace the whole class list
    fn set_class_name(&self, class_name: &str);

    /// Inline style value, empty when unset
    fn style(&self, property: &str) -> String;
    fn set_style(&self, property: &str, value: &str);
    fn remove_style(&self, property: &str);

    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    /// Current value of a form control, empty for other elements
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn set_disabled(&self, disabled: bool);
    fn focus(&self);
    fn scroll_into_view(&self);

    fn rect(&self) -> Rect;
    fn offset_top(&self) -> f64;
    fn offset_height(&self) -> f64;

    fn parent(&self) -> Option<Self>;
    fn children(&self) -> Vec<Self>;
    fn append_child(&self, child: &Self);
    /// Detach from the tree. Removing a detached node is a no-op.
    fn remove(&self);
    fn is_connected(&self) -> bool;
    fn is_same(&self, other: &Self) -> bool;

    fn set_styles(&self, styles: &[(&str, &str)]) {
        for (property, value) in styles {
            self.set_style(property, value);
        }
    }

    fn toggle_class(&self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    /// All descendants in document order
    fn descendants(&self) -> Vec<Self> {
        let mut out = Vec::new();
        for child in self.children() {
            out.push(child.clone());
            out.extend(child.descendants());
        }
        out
    }
}

/// Event payload handed to listeners
#[derive(Debug)]
pub struct DomEvent<N> {
    pub target: Option<N>,
    pub client_x: f64,
    pub client_y: f64,
    pub key: Option<String>,
    default_prevented: Cell<bool>,
}

impl<N> DomEvent<N> {
    pub fn new(target: Option<N>) -> Self {
        Self {
            target,
            client_x: 0.0,
            client_y: 0.0,
            key: None,
            default_prevented: Cell::new(false),
        }
    }

    pub fn with_pointer(mut self, client_x: f64, client_y: f64) -> Self {
        self.client_x = client_x;
        self.client_y = client_y;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Where an event listener is attached
pub enum Target<'a, N> {
    Window,
    Document,
    Element(&'a N),
}

pub type Listener<N> = Box<dyn Fn(&DomEvent<N>)>;
pub type VisibilityCallback<N> = Box<dyn Fn(&N)>;

/// Intersection observer settings
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the element that must be visible (0.0 - 1.0)
    pub threshold: f64,
    /// CSS margin applied to the viewport, e.g. `0px 0px -50px 0px`
    pub root_margin: String,
}

impl ObserverOptions {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            root_margin: "0px".to_string(),
        }
    }

    pub fn with_root_margin(mut self, root_margin: impl Into<String>) -> Self {
        self.root_margin = root_margin.into();
        self
    }
}

/// Document, viewport and scheduling services of the page
pub trait Host: 'static {
    type Node: DomNode;

    fn body(&self) -> Option<Self::Node>;
    fn head(&self) -> Option<Self::Node>;
    fn create_element(&self, tag: &str) -> Option<Self::Node>;
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;

    fn query(&self, selector: &str) -> Option<Self::Node> {
        self.query_all(selector).into_iter().next()
    }

    /// Current vertical scroll offset
    fn scroll_y(&self) -> f64;
    /// Height of the visible viewport
    fn viewport_height(&self) -> f64;
    /// Full scroll height of the document
    fn document_height(&self) -> f64;
    /// Smooth-scroll the viewport to an absolute offset
    fn scroll_to(&self, top: f64);

    /// Uniform random number in `[0, 1)`
    fn random(&self) -> f64;

    fn listen(&self, target: Target<'_, Self::Node>, event: &str, listener: Listener<Self::Node>);

    /// Call `on_visible` each time `target` starts intersecting the viewport
    fn observe(
        &self,
        target: &Self::Node,
        options: &ObserverOptions,
        on_visible: VisibilityCallback<Self::Node>,
    );

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>);
    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>);
}
