//! Visibility-triggered animations
//!
//! Two independent behaviors share the intersection machinery:
//! - `[data-aos]` elements get `aos-animate` when they scroll into view, after
//!   their own `data-delay`; their reveal siblings cascade in 100ms steps.
//! - `section` elements fade and slide in. Their observers are registered with
//!   a 200ms stagger per section index.
//!
//! Sections are also tagged `in-viewport` the first time they are seen.

use std::rc::Rc;
use std::time::Duration;

use super::config::LandingConfig;
use super::host::{DomNode, Host, ObserverOptions};

/// Attribute flagging an element for reveal animation
pub const REVEAL_ATTR: &str = "data-aos";
/// Attribute holding a per-element reveal delay in milliseconds
pub const DELAY_ATTR: &str = "data-delay";
/// Class added when the reveal animation should play
pub const REVEAL_CLASS: &str = "aos-animate";
/// Class added to sections that have been in the viewport
pub const IN_VIEWPORT_CLASS: &str = "in-viewport";

const SECTION_HIDDEN: [(&str, &str); 3] = [
    ("opacity", "0"),
    ("transform", "translateY(30px)"),
    ("transition", "all 0.8s cubic-bezier(0.4, 0, 0.2, 1)"),
];

const SECTION_SHOWN: [(&str, &str); 2] = [("opacity", "1"), ("transform", "translateY(0)")];

/// Parse a `data-delay` value the way `parseInt` reads it: leading digits,
/// anything else counts as zero
pub fn reveal_delay(value: Option<&str>) -> Duration {
    let digits: String = value
        .unwrap_or_default()
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    Duration::from_millis(digits.parse().unwrap_or(0))
}

/// Elements animated on visibility
pub struct RevealElements<N> {
    pub animated: Vec<N>,
    pub sections: Vec<N>,
}

struct RevealInner<H: Host> {
    host: Rc<H>,
    config: LandingConfig,
}

/// Intersection-driven reveal animations
pub struct RevealAnimator<H: Host> {
    inner: Rc<RevealInner<H>>,
}

impl<H: Host> Clone for RevealAnimator<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> RevealAnimator<H> {
    pub fn init(host: Rc<H>, elements: RevealElements<H::Node>, config: &LandingConfig) -> Self {
        let animator = Self {
            inner: Rc::new(RevealInner {
                host: host.clone(),
                config: config.clone(),
            }),
        };

        let reveal_options = ObserverOptions::new(config.reveal_threshold)
            .with_root_margin(config.reveal_root_margin.clone());
        for element in &elements.animated {
            let this = animator.clone();
            host.observe(
                element,
                &reveal_options,
                Box::new(move |target: &H::Node| this.reveal(target)),
            );
        }

        let section_options = ObserverOptions::new(config.section_threshold);
        for (index, section) in elements.sections.iter().enumerate() {
            section.set_styles(&SECTION_HIDDEN);

            let this = animator.clone();
            let section = section.clone();
            let options = section_options.clone();
            host.set_timeout(
                Duration::from_millis(config.section_stagger_ms * index as u64),
                Box::new(move || this.watch_section(&section, &options)),
            );
        }

        for section in &elements.sections {
            host.observe(
                section,
                &section_options,
                Box::new(|target: &H::Node| target.add_class(IN_VIEWPORT_CLASS)),
            );
        }

        animator
    }

    /// Play the reveal for `target` and cascade through its reveal siblings
    pub fn reveal(&self, target: &H::Node) {
        let host = &self.inner.host;

        let delay = reveal_delay(target.attribute(DELAY_ATTR).as_deref());
        let element = target.clone();
        host.set_timeout(delay, Box::new(move || element.add_class(REVEAL_CLASS)));

        let Some(parent) = target.parent() else {
            return;
        };
        let siblings = parent
            .descendants()
            .into_iter()
            .filter(|node| node.attribute(REVEAL_ATTR).is_some());
        for (index, sibling) in siblings.enumerate() {
            if sibling.is_same(target) {
                continue;
            }
            let stagger = Duration::from_millis(self.inner.config.reveal_stagger_ms * index as u64);
            host.set_timeout(stagger, Box::new(move || sibling.add_class(REVEAL_CLASS)));
        }
    }

    fn watch_section(&self, section: &H::Node, options: &ObserverOptions) {
        self.inner.host.observe(
            section,
            options,
            Box::new(|target: &H::Node| target.set_styles(&SECTION_SHOWN)),
        );
    }
}
