//! Micro-interactions on buttons, cards and links, plus keyboard handling
//!
//! Everything here is stateless: each handler builds or restyles elements and
//! schedules its own cleanup.

use std::rc::Rc;
use std::time::Duration;

use super::config::LandingConfig;
use super::css::{inject_style, px};
use super::host::{DomEvent, DomNode, Host, Target};
use super::scroll::PROGRESS_BAR_ID;

/// Id of the injected ripple keyframes
pub const RIPPLE_STYLE_ID: &str = "ripple-styles";
/// Id of the injected keyboard focus outline
pub const KEYBOARD_STYLE_ID: &str = "keyboard-styles";
/// Body class set while the user navigates with the keyboard
pub const KEYBOARD_CLASS: &str = "keyboard-navigation";
pub const TOOLTIP_TEXT: &str = "Opening email client...";

const RIPPLE_CSS: &str = "
@keyframes ripple {
    to { transform: scale(2); opacity: 0; }
}
";

const KEYBOARD_CSS: &str = "
.keyboard-navigation *:focus {
    outline: 2px solid #3b82f6 !important;
    outline-offset: 2px !important;
}
";

const CARD_GLOW: &str = "0 20px 40px rgba(59, 130, 246, 0.2), 0 0 0 1px rgba(59, 130, 246, 0.1)";
const CARD_HOVER: &str = "translateY(-8px) scale(1.02)";

/// Elements that get micro-interactions
pub struct InteractionElements<N> {
    pub buttons: Vec<N>,
    pub cards: Vec<N>,
    pub demo: Option<N>,
    pub mail_links: Vec<N>,
}

impl<N> Default for InteractionElements<N> {
    fn default() -> Self {
        Self {
            buttons: Vec::new(),
            cards: Vec::new(),
            demo: None,
            mail_links: Vec::new(),
        }
    }
}

struct InteractionsInner<H: Host> {
    host: Rc<H>,
    config: LandingConfig,
}

/// Visual feedback for pointer and keyboard input
pub struct Interactions<H: Host> {
    inner: Rc<InteractionsInner<H>>,
}

impl<H: Host> Clone for Interactions<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> Interactions<H> {
    pub fn init(
        host: Rc<H>,
        elements: InteractionElements<H::Node>,
        config: &LandingConfig,
    ) -> Self {
        let interactions = Self {
            inner: Rc::new(InteractionsInner {
                host: host.clone(),
                config: config.clone(),
            }),
        };

        for button in &elements.buttons {
            interactions.bind_button(button);
        }
        for card in &elements.cards {
            interactions.bind_card(card);
        }
        if let Some(demo) = &elements.demo {
            let this = interactions.clone();
            host.listen(
                Target::Element(demo),
                "click",
                Box::new(move |event: &DomEvent<H::Node>| {
                    event.prevent_default();
                    this.open_demo();
                }),
            );
        }
        for link in &elements.mail_links {
            let this = interactions.clone();
            let link_ref = link.clone();
            host.listen(
                Target::Element(link),
                "click",
                Box::new(move |_: &DomEvent<H::Node>| this.show_mail_feedback(&link_ref)),
            );
        }
        inject_style(host.as_ref(), RIPPLE_STYLE_ID, RIPPLE_CSS);

        interactions.bind_keyboard();
        interactions
    }

    fn bind_button(&self, button: &H::Node) {
        let host = &self.inner.host;

        let this = self.clone();
        let target = button.clone();
        host.listen(
            Target::Element(button),
            "click",
            Box::new(move |event: &DomEvent<H::Node>| this.ripple(&target, event)),
        );
        let target = button.clone();
        host.listen(
            Target::Element(button),
            "mouseenter",
            Box::new(move |_: &DomEvent<H::Node>| {
                target.set_style("transform", "translateY(-2px) scale(1.02)")
            }),
        );
        let target = button.clone();
        host.listen(
            Target::Element(button),
            "mouseleave",
            Box::new(move |_: &DomEvent<H::Node>| {
                target.set_style("transform", "translateY(0) scale(1)")
            }),
        );
    }

    fn bind_card(&self, card: &H::Node) {
        let host = &self.inner.host;

        let target = card.clone();
        host.listen(
            Target::Element(card),
            "mouseenter",
            Box::new(move |_: &DomEvent<H::Node>| {
                target.set_styles(&[
                    ("transform", CARD_HOVER),
                    ("transition", "all 0.3s cubic-bezier(0.4, 0, 0.2, 1)"),
                    ("box-shadow", CARD_GLOW),
                ])
            }),
        );
        let target = card.clone();
        host.listen(
            Target::Element(card),
            "mouseleave",
            Box::new(move |_: &DomEvent<H::Node>| {
                target.set_style("transform", "translateY(0) scale(1)");
                target.remove_style("box-shadow");
            }),
        );

        let target = card.clone();
        let timers = host.clone();
        let feedback = self.inner.config.press_feedback();
        host.listen(
            Target::Element(card),
            "click",
            Box::new(move |_: &DomEvent<H::Node>| {
                target.set_style("transform", "translateY(-8px) scale(0.98)");
                let card = target.clone();
                timers.set_timeout(
                    feedback,
                    Box::new(move || card.set_style("transform", CARD_HOVER)),
                );
            }),
        );
    }

    /// Spawn a ripple centered on the click point, removed once it has played
    pub fn ripple(&self, button: &H::Node, event: &DomEvent<H::Node>) {
        let host = &self.inner.host;
        let Some(ripple) = host.create_element("span") else {
            return;
        };

        let rect = button.rect();
        let size = rect.width.max(rect.height);
        let x = event.client_x - rect.left - size / 2.0;
        let y = event.client_y - rect.top - size / 2.0;
        ripple.set_styles(&[
            ("position", "absolute"),
            ("width", px(size).as_str()),
            ("height", px(size).as_str()),
            ("left", px(x).as_str()),
            ("top", px(y).as_str()),
            ("background", "rgba(255, 255, 255, 0.3)"),
            ("border-radius", "50%"),
            ("transform", "scale(0)"),
            ("animation", "ripple 0.6s ease-out"),
            ("pointer-events", "none"),
        ]);
        button.append_child(&ripple);

        host.set_timeout(
            Duration::from_millis(self.inner.config.ripple_ms),
            Box::new(move || ripple.remove()),
        );
    }

    /// Open the "demo coming soon" dialog
    pub fn open_demo(&self) -> Option<H::Node> {
        let host = &self.inner.host;
        let body = host.body()?;
        let overlay = host.create_element("div")?;
        let content = host.create_element("div")?;
        let title = host.create_element("h3")?;
        let text = host.create_element("p")?;
        let dismiss = host.create_element("button")?;

        let z_index = self.inner.config.overlay_z_index.to_string();
        overlay.set_styles(&[
            ("position", "fixed"),
            ("top", "0"),
            ("left", "0"),
            ("width", "100%"),
            ("height", "100%"),
            ("background", "rgba(0, 0, 0, 0.8)"),
            ("display", "flex"),
            ("align-items", "center"),
            ("justify-content", "center"),
            ("z-index", z_index.as_str()),
            ("opacity", "0"),
            ("transition", "opacity 0.3s ease"),
        ]);
        content.set_styles(&[
            ("background", "white"),
            ("padding", "2rem"),
            ("border-radius", "16px"),
            ("text-align", "center"),
            ("max-width", "400px"),
            ("transform", "scale(0.9)"),
            ("transition", "transform 0.3s ease"),
        ]);

        title.set_text("🚀 Demo Coming Soon!");
        title.set_styles(&[("margin-bottom", "1rem"), ("color", "#111827")]);
        text.set_text(
            "Our interactive demo is currently in development. \
             Join the waitlist to be notified when it's ready!",
        );
        text.set_styles(&[("color", "#6b7280"), ("margin-bottom", "2rem")]);
        dismiss.set_text("Got it!");
        dismiss.set_styles(&[
            ("background", "#3b82f6"),
            ("color", "white"),
            ("border", "none"),
            ("padding", "0.75rem 1.5rem"),
            ("border-radius", "8px"),
            ("cursor", "pointer"),
            ("font-weight", "600"),
        ]);

        content.append_child(&title);
        content.append_child(&text);
        content.append_child(&dismiss);
        overlay.append_child(&content);
        body.append_child(&overlay);

        let (fading, scaling) = (overlay.clone(), content.clone());
        host.set_timeout(
            self.inner.config.enter_delay(),
            Box::new(move || {
                fading.set_style("opacity", "1");
                scaling.set_style("transform", "scale(1)");
            }),
        );

        let backdrop = overlay.clone();
        host.listen(
            Target::Element(&overlay),
            "click",
            Box::new(move |event: &DomEvent<H::Node>| {
                if event.target.as_ref().is_some_and(|t| t.is_same(&backdrop)) {
                    backdrop.remove();
                }
            }),
        );
        let closing = overlay.clone();
        host.listen(
            Target::Element(&dismiss),
            "click",
            Box::new(move |_: &DomEvent<H::Node>| closing.remove()),
        );

        Some(overlay)
    }

    /// Press feedback on a mail link and a transient tooltip above it
    pub fn show_mail_feedback(&self, link: &H::Node) {
        let host = &self.inner.host;
        let config = &self.inner.config;

        link.set_style("transform", "scale(0.95)");
        let pressed = link.clone();
        host.set_timeout(
            config.press_feedback(),
            Box::new(move || pressed.remove_style("transform")),
        );

        let (Some(body), Some(tooltip)) = (host.body(), host.create_element("div")) else {
            return;
        };
        let rect = link.rect();
        tooltip.set_text(TOOLTIP_TEXT);
        tooltip.set_styles(&[
            ("position", "fixed"),
            ("top", px(rect.top - 40.0).as_str()),
            ("left", px(rect.left + rect.width / 2.0).as_str()),
            ("transform", "translateX(-50%)"),
            ("background", "#111827"),
            ("color", "white"),
            ("padding", "0.5rem 1rem"),
            ("border-radius", "6px"),
            ("font-size", "0.8rem"),
            ("z-index", "1000"),
            ("opacity", "0"),
            ("transition", "opacity 0.3s ease"),
        ]);
        body.append_child(&tooltip);

        let showing = tooltip.clone();
        host.set_timeout(
            config.enter_delay(),
            Box::new(move || showing.set_style("opacity", "1")),
        );

        let timers = host.clone();
        let fade_out = config.fade_out();
        host.set_timeout(
            Duration::from_millis(config.tooltip_ms),
            Box::new(move || {
                tooltip.set_style("opacity", "0");
                timers.set_timeout(fade_out, Box::new(move || tooltip.remove()));
            }),
        );
    }

    /// Remove every body-level overlay (fixed position, z-index at or above
    /// the overlay threshold). Returns how many were removed.
    pub fn dismiss_overlays(&self) -> usize {
        let Some(body) = self.inner.host.body() else {
            return 0;
        };
        let threshold = self.inner.config.overlay_z_index;
        let overlays: Vec<H::Node> = body
            .children()
            .into_iter()
            .filter(|node| node.attribute("id").as_deref() != Some(PROGRESS_BAR_ID))
            .filter(|node| node.style("position") == "fixed")
            .filter(|node| {
                node.style("z-index")
                    .trim()
                    .parse::<i32>()
                    .is_ok_and(|z| z >= threshold)
            })
            .collect();

        for overlay in &overlays {
            overlay.remove();
        }
        overlays.len()
    }

    fn bind_keyboard(&self) {
        let host = &self.inner.host;

        let this = self.clone();
        host.listen(
            Target::Document,
            "keydown",
            Box::new(move |event: &DomEvent<H::Node>| match event.key.as_deref() {
                Some("Escape") => {
                    this.dismiss_overlays();
                }
                Some("Tab") => {
                    if let Some(body) = this.inner.host.body() {
                        body.add_class(KEYBOARD_CLASS);
                    }
                }
                _ => {}
            }),
        );

        let this = self.clone();
        host.listen(
            Target::Document,
            "mousedown",
            Box::new(move |_: &DomEvent<H::Node>| {
                if let Some(body) = this.inner.host.body() {
                    body.remove_class(KEYBOARD_CLASS);
                }
            }),
        );

        inject_style(host.as_ref(), KEYBOARD_STYLE_ID, KEYBOARD_CSS);
    }
}
