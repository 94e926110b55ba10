//! Mobile navigation menu
//!
//! The toggle's `span` children are the hamburger bars. Opening morphs them
//! into an X and drops the link panel down; closing reverses both and, once
//! the exit transition is over, strips every inline style the open path set.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::config::LandingConfig;
use super::host::{DomEvent, DomNode, Host, Target};

/// Inline layout applied to the panel while open
const PANEL_OPEN: [(&str, &str); 11] = [
    ("display", "flex"),
    ("flex-direction", "column"),
    ("position", "absolute"),
    ("top", "100%"),
    ("left", "0"),
    ("right", "0"),
    ("background", "rgba(255, 255, 255, 0.98)"),
    ("backdrop-filter", "blur(20px)"),
    ("padding", "1rem"),
    ("box-shadow", "0 4px 20px rgba(0, 0, 0, 0.1)"),
    ("border-top", "1px solid rgba(0, 0, 0, 0.08)"),
];

const PANEL_HIDDEN: [(&str, &str); 2] = [("transform", "translateY(-10px)"), ("opacity", "0")];
const PANEL_SHOWN: [(&str, &str); 2] = [("transform", "translateY(0)"), ("opacity", "1")];

/// Bar styles forming the X, by bar index
const BARS_OPEN: [(&str, &str); 3] = [
    ("transform", "rotate(45deg) translate(5px, 5px)"),
    ("opacity", "0"),
    ("transform", "rotate(-45deg) translate(7px, -6px)"),
];

struct MenuInner<H: Host> {
    host: Rc<H>,
    toggle: H::Node,
    panel: H::Node,
    open: Cell<bool>,
    transition: Duration,
    enter_delay: Duration,
}

/// Two-state mobile menu
pub struct MobileMenu<H: Host> {
    inner: Rc<MenuInner<H>>,
}

impl<H: Host> Clone for MobileMenu<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> MobileMenu<H> {
    pub fn init(host: Rc<H>, toggle: H::Node, panel: H::Node, config: &LandingConfig) -> Self {
        let menu = Self {
            inner: Rc::new(MenuInner {
                host: host.clone(),
                toggle,
                panel,
                open: Cell::new(false),
                transition: Duration::from_millis(config.menu_transition_ms),
                enter_delay: config.enter_delay(),
            }),
        };

        let this = menu.clone();
        host.listen(
            Target::Element(&menu.inner.toggle),
            "click",
            Box::new(move |_: &DomEvent<H::Node>| this.toggle()),
        );

        let this = menu.clone();
        host.listen(
            Target::Element(&menu.inner.panel),
            "click",
            Box::new(move |event: &DomEvent<H::Node>| {
                let on_link = event
                    .target
                    .as_ref()
                    .is_some_and(|target| target.has_class("nav-link"));
                if on_link && this.is_open() {
                    this.close();
                }
            }),
        );

        menu
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    pub fn toggle(&self) {
        if self.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    fn bars(&self) -> Vec<H::Node> {
        self.inner
            .toggle
            .children()
            .into_iter()
            .filter(|child| child.tag_name() == "span")
            .collect()
    }

    pub fn open(&self) {
        let inner = &self.inner;
        inner.open.set(true);

        for (bar, (property, value)) in self.bars().iter().zip(BARS_OPEN) {
            bar.set_style(property, value);
        }

        inner.panel.set_styles(&PANEL_OPEN);
        inner.panel.set_styles(&PANEL_HIDDEN);

        let this = self.clone();
        inner.host.set_timeout(
            inner.enter_delay,
            Box::new(move || {
                // Closed before the enter transition started
                if this.is_open() {
                    this.inner.panel.set_styles(&PANEL_SHOWN);
                }
            }),
        );
    }

    pub fn close(&self) {
        let inner = &self.inner;
        inner.open.set(false);

        for (bar, (property, _)) in self.bars().iter().zip(BARS_OPEN) {
            bar.remove_style(property);
        }

        inner.panel.set_styles(&PANEL_HIDDEN);

        let this = self.clone();
        inner.host.set_timeout(
            inner.transition,
            Box::new(move || {
                // Reopened during the exit transition
                if this.is_open() {
                    return;
                }
                let panel = &this.inner.panel;
                for (property, _) in PANEL_OPEN.iter().chain(PANEL_HIDDEN.iter()) {
                    panel.remove_style(property);
                }
            }),
        );
    }
}
