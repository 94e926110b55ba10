//! Scroll-driven visual updates
//!
//! Scroll events are coalesced through a [`FrameGate`] so at most one update
//! runs per rendering frame. Each update:
//! - toggles the navbar `scrolled` class and hides/shows it by scroll direction
//! - moves the hero and the decorative shapes (parallax)
//! - resizes the progress bar at the top of the viewport

use std::cell::Cell;
use std::rc::Rc;

use super::config::LandingConfig;
use super::css::{css_number, px};
use super::host::{DomEvent, DomNode, Host, Target};

/// Id given to the progress bar element
pub const PROGRESS_BAR_ID: &str = "scroll-progress";

const PROGRESS_BAR_STYLES: [(&str, &str); 8] = [
    ("position", "fixed"),
    ("top", "0"),
    ("left", "0"),
    ("width", "0%"),
    ("height", "3px"),
    ("background", "linear-gradient(90deg, #3b82f6, #06b6d4)"),
    ("z-index", "10001"),
    ("transition", "width 0.1s ease"),
];

/// Allows one pending frame callback at a time
#[derive(Debug, Default)]
pub struct FrameGate {
    ticking: Cell<bool>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the caller should schedule a frame
    pub fn try_acquire(&self) -> bool {
        !self.ticking.replace(true)
    }

    /// Mark the pending frame as done
    pub fn release(&self) {
        self.ticking.set(false);
    }

    pub fn is_pending(&self) -> bool {
        self.ticking.get()
    }
}

/// Whether the navbar is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavbarPosition {
    Shown,
    Hidden,
}

impl NavbarPosition {
    pub fn transform(&self) -> &'static str {
        match self {
            NavbarPosition::Shown => "translateY(0)",
            NavbarPosition::Hidden => "translateY(-100%)",
        }
    }
}

/// Navbar appearance for one scroll update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavbarState {
    pub scrolled: bool,
    pub position: NavbarPosition,
}

/// Navbar appearance at `offset` given the previous offset
pub fn navbar_state(offset: f64, last_offset: f64, config: &LandingConfig) -> NavbarState {
    let position = if offset > config.hide_threshold && offset > last_offset {
        NavbarPosition::Hidden
    } else {
        NavbarPosition::Shown
    };
    NavbarState {
        scrolled: offset > config.scrolled_threshold,
        position,
    }
}

/// Scroll progress in percent, clamped to `[0, 100]`
pub fn progress_percent(offset: f64, scrollable_height: f64) -> f64 {
    if scrollable_height <= 0.0 {
        return 0.0;
    }
    (offset / scrollable_height * 100.0).clamp(0.0, 100.0)
}

/// Transform for the shape at `index`
pub fn shape_transform(offset: f64, index: usize, config: &LandingConfig) -> String {
    let speed = config.shape_base_speed + index as f64 * config.shape_speed_step;
    format!(
        "translateY({}) rotate({}deg)",
        px(offset * speed),
        css_number(offset * config.shape_rotation_rate)
    )
}

/// Elements moved by scrolling; all optional
pub struct ScrollElements<N> {
    pub navbar: Option<N>,
    pub hero: Option<N>,
    pub shapes: Vec<N>,
}

impl<N> Default for ScrollElements<N> {
    fn default() -> Self {
        Self {
            navbar: None,
            hero: None,
            shapes: Vec::new(),
        }
    }
}

struct ScrollInner<H: Host> {
    host: Rc<H>,
    elements: ScrollElements<H::Node>,
    progress_bar: Option<H::Node>,
    config: LandingConfig,
    gate: FrameGate,
    last_offset: Cell<f64>,
}

/// Frame-coalesced scroll effects
pub struct ScrollEngine<H: Host> {
    inner: Rc<ScrollInner<H>>,
}

impl<H: Host> Clone for ScrollEngine<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> ScrollEngine<H> {
    /// Create the progress bar and start listening for scroll events
    pub fn init(host: Rc<H>, elements: ScrollElements<H::Node>, config: &LandingConfig) -> Self {
        let progress_bar = create_progress_bar(host.as_ref());
        let last_offset = Cell::new(host.scroll_y());

        let engine = Self {
            inner: Rc::new(ScrollInner {
                host: host.clone(),
                elements,
                progress_bar,
                config: config.clone(),
                gate: FrameGate::new(),
                last_offset,
            }),
        };

        let this = engine.clone();
        host.listen(
            Target::Window,
            "scroll",
            Box::new(move |_: &DomEvent<H::Node>| this.on_scroll()),
        );
        engine
    }

    /// Schedule an update for the next frame unless one is pending
    pub fn on_scroll(&self) {
        if self.inner.gate.try_acquire() {
            let this = self.clone();
            self.inner
                .host
                .request_animation_frame(Box::new(move || this.update()));
        }
    }

    /// Apply every scroll effect for the current offset
    pub fn update(&self) {
        let inner = &self.inner;
        let offset = inner.host.scroll_y();

        if let Some(navbar) = &inner.elements.navbar {
            let state = navbar_state(offset, inner.last_offset.get(), &inner.config);
            navbar.toggle_class("scrolled", state.scrolled);
            navbar.set_style("transform", state.position.transform());
        }

        if let Some(hero) = &inner.elements.hero
            && offset < inner.host.viewport_height()
        {
            let shift = px(offset * inner.config.hero_parallax_rate);
            hero.set_style("transform", &format!("translateY({})", shift));
        }

        for (index, shape) in inner.elements.shapes.iter().enumerate() {
            shape.set_style("transform", &shape_transform(offset, index, &inner.config));
        }

        if let Some(bar) = &inner.progress_bar {
            let scrollable = inner.host.document_height() - inner.host.viewport_height();
            let width = progress_percent(offset, scrollable);
            bar.set_style("width", &format!("{}%", css_number(width)));
        }

        inner.last_offset.set(offset);
        inner.gate.release();
    }

    pub fn progress_bar(&self) -> Option<H::Node> {
        self.inner.progress_bar.clone()
    }
}

fn create_progress_bar<H: Host>(host: &H) -> Option<H::Node> {
    let body = host.body()?;
    let bar = host.create_element("div")?;
    bar.set_attribute("id", PROGRESS_BAR_ID);
    bar.set_attribute("role", "progressbar");
    bar.set_styles(&PROGRESS_BAR_STYLES);
    body.append_child(&bar);
    Some(bar)
}
