//! In-memory host for tests
//!
//! Provides a small document tree, a subset of CSS selectors, event dispatch
//! with bubbling, a virtual clock for timers, a frame queue and manually
//! triggered intersection observers.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::rc::{Rc, Weak};
use std::str::Chars;
use std::time::Duration;

use super::host::{
    DomEvent, DomNode, Host, Listener, ObserverOptions, Rect, Target, VisibilityCallback,
};

type FocusSlot = Rc<RefCell<Weak<RefCell<NodeData>>>>;

#[derive(Default)]
struct NodeData {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    disabled: bool,
    rect: Rect,
    offset_top: f64,
    offset_height: f64,
    scrolled_into_view: u32,
    is_root: bool,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<MemNode>,
}

/// Element of the in-memory document
#[derive(Clone)]
pub struct MemNode {
    data: Rc<RefCell<NodeData>>,
    focus: FocusSlot,
}

impl std::fmt::Debug for MemNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.data.borrow();
        write!(f, "<{}", data.tag)?;
        if let Some(id) = data.attrs.get("id") {
            write!(f, " id=\"{}\"", id)?;
        }
        if !data.classes.is_empty() {
            write!(f, " class=\"{}\"", data.classes.join(" "))?;
        }
        write!(f, ">")
    }
}

impl MemNode {
    fn new(tag: &str, focus: FocusSlot) -> Self {
        Self {
            data: Rc::new(RefCell::new(NodeData {
                tag: tag.to_lowercase(),
                ..Default::default()
            })),
            focus,
        }
    }

    /// Builder: set the id attribute
    pub fn with_id(self, id: &str) -> Self {
        self.set_attribute("id", id);
        self
    }

    /// Builder: add space separated classes
    pub fn with_class(self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
        self
    }

    /// Builder: set an attribute
    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_rect(self, rect: Rect) -> Self {
        self.data.borrow_mut().rect = rect;
        self
    }

    pub fn with_offset(self, top: f64, height: f64) -> Self {
        {
            let mut data = self.data.borrow_mut();
            data.offset_top = top;
            data.offset_height = height;
        }
        self
    }

    /// Builder: append children and return self
    pub fn with_children(self, children: &[MemNode]) -> Self {
        for child in children {
            self.append_child(child);
        }
        self
    }

    pub fn is_focused(&self) -> bool {
        self.focus
            .borrow()
            .upgrade()
            .is_some_and(|focused| Rc::ptr_eq(&focused, &self.data))
    }

    pub fn is_disabled(&self) -> bool {
        self.data.borrow().disabled
    }

    pub fn scrolled_into_view(&self) -> u32 {
        self.data.borrow().scrolled_into_view
    }

    /// All inline style properties currently set
    pub fn inline_styles(&self) -> BTreeMap<String, String> {
        self.data.borrow().styles.clone()
    }

    fn matches(&self, selector: &Compound) -> bool {
        let data = self.data.borrow();
        if let Some(tag) = &selector.tag
            && *tag != data.tag
        {
            return false;
        }
        if let Some(id) = &selector.id
            && data.attrs.get("id") != Some(id)
        {
            return false;
        }
        if !selector.classes.iter().all(|c| data.classes.contains(c)) {
            return false;
        }
        selector.attrs.iter().all(|attr| {
            let value = data.attrs.get(&attr.name);
            match (&attr.op, value) {
                (_, None) => false,
                (AttrOp::Exists, Some(_)) => true,
                (AttrOp::Equals(expected), Some(v)) => v == expected,
                (AttrOp::Prefix(prefix), Some(v)) => v.starts_with(prefix.as_str()),
            }
        })
    }
}

impl DomNode for MemNode {
    fn tag_name(&self) -> String {
        self.data.borrow().tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        let data = self.data.borrow();
        if name == "class" {
            return (!data.classes.is_empty()).then(|| data.classes.join(" "));
        }
        data.attrs.get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if name == "class" {
            self.set_class_name(value);
            return;
        }
        self.data
            .borrow_mut()
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn has_class(&self, class: &str) -> bool {
        self.data.borrow().classes.iter().any(|c| c == class)
    }

    fn add_class(&self, class: &str) {
        if !self.has_class(class) {
            self.data.borrow_mut().classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.data.borrow_mut().classes.retain(|c| c != class);
    }

    fn set_class_name(&self, class_name: &str) {
        self.data.borrow_mut().classes = class_name.split_whitespace().map(String::from).collect();
    }

    fn style(&self, property: &str) -> String {
        self.data
            .borrow()
            .styles
            .get(property)
            .cloned()
            .unwrap_or_default()
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut data = self.data.borrow_mut();
        if value.is_empty() {
            data.styles.remove(property);
        } else {
            data.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn remove_style(&self, property: &str) {
        self.data.borrow_mut().styles.remove(property);
    }

    fn text(&self) -> String {
        self.data.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        self.data.borrow_mut().text = text.to_string();
    }

    fn value(&self) -> String {
        self.data.borrow().value.clone()
    }

    fn set_value(&self, value: &str) {
        self.data.borrow_mut().value = value.to_string();
    }

    fn set_disabled(&self, disabled: bool) {
        self.data.borrow_mut().disabled = disabled;
    }

    fn focus(&self) {
        *self.focus.borrow_mut() = Rc::downgrade(&self.data);
    }

    fn scroll_into_view(&self) {
        self.data.borrow_mut().scrolled_into_view += 1;
    }

    fn rect(&self) -> Rect {
        self.data.borrow().rect
    }

    fn offset_top(&self) -> f64 {
        self.data.borrow().offset_top
    }

    fn offset_height(&self) -> f64 {
        self.data.borrow().offset_height
    }

    fn parent(&self) -> Option<Self> {
        let parent = self.data.borrow().parent.upgrade()?;
        Some(MemNode {
            data: parent,
            focus: self.focus.clone(),
        })
    }

    fn children(&self) -> Vec<Self> {
        self.data.borrow().children.clone()
    }

    fn append_child(&self, child: &Self) {
        child.remove();
        child.data.borrow_mut().parent = Rc::downgrade(&self.data);
        self.data.borrow_mut().children.push(child.clone());
    }

    fn remove(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        parent
            .data
            .borrow_mut()
            .children
            .retain(|c| !Rc::ptr_eq(&c.data, &self.data));
        self.data.borrow_mut().parent = Weak::new();
    }

    fn is_connected(&self) -> bool {
        let mut current = self.clone();
        loop {
            if current.data.borrow().is_root {
                return true;
            }
            match current.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

// ============================================================================
// Selectors
// ============================================================================

enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
}

struct AttrSelector {
    name: String,
    op: AttrOp,
}

#[derive(Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

/// Parse a comma separated list of compound selectors
/// (`tag`, `.class`, `#id`, `[attr]`, `[attr="v"]`, `[attr^="v"]`)
fn parse_selector_list(selector: &str) -> Vec<Compound> {
    selector.split(',').map(|s| parse_compound(s.trim())).collect()
}

fn parse_compound(input: &str) -> Compound {
    let mut compound = Compound::default();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '.' => {
                chars.next();
                compound.classes.push(read_ident(&mut chars));
            }
            '#' => {
                chars.next();
                compound.id = Some(read_ident(&mut chars));
            }
            '[' => {
                chars.next();
                let body: String = chars.by_ref().take_while(|&c| c != ']').collect();
                compound.attrs.push(parse_attr(&body));
            }
            _ => {
                let ident = read_ident(&mut chars);
                if ident.is_empty() {
                    chars.next();
                } else {
                    compound.tag = Some(ident.to_lowercase());
                }
            }
        }
    }
    compound
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_alphanumeric() || c == '-' || c == '_' {
            ident.push(c);
            chars.next();
        } else {
            break;
        }
    }
    ident
}

fn parse_attr(body: &str) -> AttrSelector {
    let unquote = |v: &str| v.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string();
    if let Some((name, value)) = body.split_once("^=") {
        AttrSelector {
            name: name.trim().to_string(),
            op: AttrOp::Prefix(unquote(value)),
        }
    } else if let Some((name, value)) = body.split_once('=') {
        AttrSelector {
            name: name.trim().to_string(),
            op: AttrOp::Equals(unquote(value)),
        }
    } else {
        AttrSelector {
            name: body.trim().to_string(),
            op: AttrOp::Exists,
        }
    }
}

// ============================================================================
// Host
// ============================================================================

enum ListenKey {
    Window,
    Document,
    Element(MemNode),
}

struct Registration {
    key: ListenKey,
    event: String,
    listener: Rc<dyn Fn(&DomEvent<MemNode>)>,
}

struct Observation {
    target: MemNode,
    options: ObserverOptions,
    on_visible: Rc<dyn Fn(&MemNode)>,
}

struct Timer {
    due: u64,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

/// In-memory [`Host`] with a virtual clock
pub struct MemHost {
    root: MemNode,
    head: MemNode,
    body: MemNode,
    focus: FocusSlot,
    scroll_y: Cell<f64>,
    viewport_height: Cell<f64>,
    document_height: Cell<f64>,
    scroll_requests: RefCell<Vec<f64>>,
    random_value: Cell<f64>,
    now_ms: Cell<u64>,
    next_seq: Cell<u64>,
    timers: RefCell<Vec<Timer>>,
    frames: RefCell<Vec<Box<dyn FnOnce()>>>,
    listeners: RefCell<Vec<Registration>>,
    observations: RefCell<Vec<Observation>>,
}

impl MemHost {
    pub fn new() -> Rc<Self> {
        let focus: FocusSlot = Rc::new(RefCell::new(Weak::new()));
        let root = MemNode::new("html", focus.clone());
        root.data.borrow_mut().is_root = true;
        let head = MemNode::new("head", focus.clone());
        let body = MemNode::new("body", focus.clone());
        root.append_child(&head);
        root.append_child(&body);

        Rc::new(Self {
            root,
            head,
            body,
            focus,
            scroll_y: Cell::new(0.0),
            viewport_height: Cell::new(800.0),
            document_height: Cell::new(2800.0),
            scroll_requests: RefCell::new(Vec::new()),
            random_value: Cell::new(0.5),
            now_ms: Cell::new(0),
            next_seq: Cell::new(0),
            timers: RefCell::new(Vec::new()),
            frames: RefCell::new(Vec::new()),
            listeners: RefCell::new(Vec::new()),
            observations: RefCell::new(Vec::new()),
        })
    }

    /// Create a detached element
    pub fn element(&self, tag: &str) -> MemNode {
        MemNode::new(tag, self.focus.clone())
    }

    /// Create an element and append it to `<body>`
    pub fn add(&self, tag: &str) -> MemNode {
        let node = self.element(tag);
        self.body.append_child(&node);
        node
    }

    pub fn body_node(&self) -> MemNode {
        self.body.clone()
    }

    pub fn head_node(&self) -> MemNode {
        self.head.clone()
    }

    pub fn set_viewport(&self, viewport_height: f64, document_height: f64) {
        self.viewport_height.set(viewport_height);
        self.document_height.set(document_height);
    }

    pub fn set_random(&self, value: f64) {
        self.random_value.set(value);
    }

    /// Offsets passed to [`Host::scroll_to`]
    pub fn scroll_requests(&self) -> Vec<f64> {
        self.scroll_requests.borrow().clone()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Advance the virtual clock, firing due timers in order
    pub fn advance(&self, millis: u64) {
        let target = self.now_ms.get() + millis;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let position = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                position.map(|i| timers.remove(i))
            };
            match next {
                Some(timer) => {
                    self.now_ms.set(timer.due);
                    (timer.callback)();
                }
                None => break,
            }
        }
        self.now_ms.set(target);
    }

    /// Run every queued frame callback; returns how many ran
    pub fn run_frame(&self) -> usize {
        let frames = std::mem::take(&mut *self.frames.borrow_mut());
        let count = frames.len();
        for frame in frames {
            frame();
        }
        count
    }

    /// Set the scroll offset and fire a window `scroll` event
    pub fn scroll(&self, offset: f64) {
        self.scroll_y.set(offset);
        self.dispatch_window("scroll");
    }

    pub fn dispatch_window(&self, event: &str) {
        let listeners = self.collect(|key| matches!(key, ListenKey::Window), event);
        let dom_event = DomEvent::new(None);
        for listener in listeners {
            listener(&dom_event);
        }
    }

    pub fn dispatch_document(&self, event: &str, dom_event: DomEvent<MemNode>) {
        let listeners = self.collect(|key| matches!(key, ListenKey::Document), event);
        for listener in listeners {
            listener(&dom_event);
        }
    }

    /// Dispatch an event at `target`, bubbling through its ancestors to the document.
    /// Returns the event so callers can inspect `is_default_prevented`.
    pub fn dispatch(
        &self,
        target: &MemNode,
        event: &str,
        dom_event: DomEvent<MemNode>,
    ) -> DomEvent<MemNode> {
        let mut current = Some(target.clone());
        while let Some(node) = current {
            let listeners = self.collect(
                |key| matches!(key, ListenKey::Element(n) if n.is_same(&node)),
                event,
            );
            for listener in listeners {
                listener(&dom_event);
            }
            current = node.parent();
        }
        if target.is_connected() {
            let listeners = self.collect(|key| matches!(key, ListenKey::Document), event);
            for listener in listeners {
                listener(&dom_event);
            }
        }
        dom_event
    }

    pub fn click(&self, target: &MemNode) -> DomEvent<MemNode> {
        self.dispatch(target, "click", DomEvent::new(Some(target.clone())))
    }

    pub fn click_at(&self, target: &MemNode, x: f64, y: f64) -> DomEvent<MemNode> {
        self.dispatch(
            target,
            "click",
            DomEvent::new(Some(target.clone())).with_pointer(x, y),
        )
    }

    pub fn fire(&self, target: &MemNode, event: &str) -> DomEvent<MemNode> {
        self.dispatch(target, event, DomEvent::new(Some(target.clone())))
    }

    pub fn press_key(&self, key: &str) {
        self.dispatch_document("keydown", DomEvent::new(None).with_key(key));
    }

    /// Report `target` as intersecting; returns how many observers fired
    pub fn intersect(&self, target: &MemNode) -> usize {
        let callbacks: Vec<_> = self
            .observations
            .borrow()
            .iter()
            .filter(|o| o.target.is_same(target))
            .map(|o| o.on_visible.clone())
            .collect();
        for callback in &callbacks {
            callback(target);
        }
        callbacks.len()
    }

    /// Options of every observer registered on `target`
    pub fn observers_of(&self, target: &MemNode) -> Vec<ObserverOptions> {
        self.observations
            .borrow()
            .iter()
            .filter(|o| o.target.is_same(target))
            .map(|o| o.options.clone())
            .collect()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|r| r.event == event)
            .count()
    }

    fn collect(
        &self,
        key_matches: impl Fn(&ListenKey) -> bool,
        event: &str,
    ) -> Vec<Rc<dyn Fn(&DomEvent<MemNode>)>> {
        self.listeners
            .borrow()
            .iter()
            .filter(|r| r.event == event && key_matches(&r.key))
            .map(|r| r.listener.clone())
            .collect()
    }
}

impl Host for MemHost {
    type Node = MemNode;

    fn body(&self) -> Option<MemNode> {
        Some(self.body.clone())
    }

    fn head(&self) -> Option<MemNode> {
        Some(self.head.clone())
    }

    fn create_element(&self, tag: &str) -> Option<MemNode> {
        Some(self.element(tag))
    }

    fn element_by_id(&self, id: &str) -> Option<MemNode> {
        self.root
            .descendants()
            .into_iter()
            .find(|n| n.attribute("id").as_deref() == Some(id))
    }

    fn query_all(&self, selector: &str) -> Vec<MemNode> {
        let compounds = parse_selector_list(selector);
        self.root
            .descendants()
            .into_iter()
            .filter(|n| compounds.iter().any(|c| n.matches(c)))
            .collect()
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height.get()
    }

    fn document_height(&self) -> f64 {
        self.document_height.get()
    }

    fn scroll_to(&self, top: f64) {
        self.scroll_requests.borrow_mut().push(top);
    }

    fn random(&self) -> f64 {
        self.random_value.get()
    }

    fn listen(&self, target: Target<'_, MemNode>, event: &str, listener: Listener<MemNode>) {
        let key = match target {
            Target::Window => ListenKey::Window,
            Target::Document => ListenKey::Document,
            Target::Element(node) => ListenKey::Element(node.clone()),
        };
        self.listeners.borrow_mut().push(Registration {
            key,
            event: event.to_string(),
            listener: Rc::from(listener),
        });
    }

    fn observe(
        &self,
        target: &MemNode,
        options: &ObserverOptions,
        on_visible: VisibilityCallback<MemNode>,
    ) {
        self.observations.borrow_mut().push(Observation {
            target: target.clone(),
            options: options.clone(),
            on_visible: Rc::from(on_visible),
        });
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now_ms.get() + delay.as_millis() as u64,
            seq,
            callback,
        });
    }

    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>) {
        self.frames.borrow_mut().push(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matching() {
        let host = MemHost::new();
        let link = host.add("a").with_class("nav-link").with_attr("href", "#features");
        let mail = host.add("a").with_attr("href", "mailto:hi@tapin.app");
        let card = host.add("div").with_class("card interactive-card");
        let animated = host.add("div").with_attr("data-aos", "fade-up");

        assert_eq!(host.query_all(".nav-link").len(), 1);
        assert!(host.query_all("a[href^=\"mailto:\"]")[0].is_same(&mail));
        assert!(host.query_all(".interactive-card")[0].is_same(&card));
        assert!(host.query_all("[data-aos]")[0].is_same(&animated));
        // Union selectors yield each element once, in document order
        let union = host.query_all(".nav-link, a[href^=\"#\"]");
        assert_eq!(union.len(), 1);
        assert!(union[0].is_same(&link));
    }

    #[test]
    fn test_element_by_id_and_detach() {
        let host = MemHost::new();
        let form = host.add("form").with_id("waitlistForm");
        assert!(host.element_by_id("waitlistForm").is_some());
        assert!(form.is_connected());

        form.remove();
        assert!(!form.is_connected());
        assert!(host.element_by_id("waitlistForm").is_none());
        // Second removal is a no-op
        form.remove();
    }

    #[test]
    fn test_timers_fire_in_order() {
        let host = MemHost::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(300, "c"), (100, "a"), (200, "b")] {
            let log = log.clone();
            host.set_timeout(
                Duration::from_millis(delay),
                Box::new(move || log.borrow_mut().push(label)),
            );
        }
        host.advance(150);
        assert_eq!(*log.borrow(), vec!["a"]);
        host.advance(1000);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(host.now_ms(), 1150);
    }

    #[test]
    fn test_dispatch_bubbles_to_ancestors() {
        let host = MemHost::new();
        let link = host.element("a");
        let panel = host.add("ul").with_children(std::slice::from_ref(&link));
        let hits = Rc::new(Cell::new(0));

        let counter = hits.clone();
        host.listen(
            Target::Element(&panel),
            "click",
            Box::new(move |_: &DomEvent<MemNode>| counter.set(counter.get() + 1)),
        );
        host.click(&link);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_empty_style_value_unsets_property() {
        let host = MemHost::new();
        let node = host.add("div");
        node.set_style("transform", "scale(0.95)");
        node.set_style("transform", "");
        assert!(node.inline_styles().is_empty());
    }
}
