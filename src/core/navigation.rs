//! In-page anchor navigation
//!
//! Links whose `href` starts with `#` scroll smoothly to their target, leaving
//! room for the fixed navbar, and get a short press feedback.

use std::rc::Rc;

use super::config::LandingConfig;
use super::host::{DomEvent, DomNode, Host, Target};

struct NavigationInner<H: Host> {
    host: Rc<H>,
    navbar: Option<H::Node>,
    config: LandingConfig,
}

/// Smooth scrolling for in-page links
pub struct AnchorNavigation<H: Host> {
    inner: Rc<NavigationInner<H>>,
}

impl<H: Host> Clone for AnchorNavigation<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> AnchorNavigation<H> {
    pub fn init(
        host: Rc<H>,
        links: &[H::Node],
        navbar: Option<H::Node>,
        config: &LandingConfig,
    ) -> Self {
        let navigation = Self {
            inner: Rc::new(NavigationInner {
                host: host.clone(),
                navbar,
                config: config.clone(),
            }),
        };

        for link in links {
            let this = navigation.clone();
            let link_ref = link.clone();
            host.listen(
                Target::Element(link),
                "click",
                Box::new(move |event: &DomEvent<H::Node>| this.on_click(&link_ref, event)),
            );
        }
        navigation
    }

    /// Offset subtracted from anchor targets
    pub fn navbar_offset(&self) -> f64 {
        let height = self
            .inner
            .navbar
            .as_ref()
            .map(|navbar| navbar.offset_height())
            .unwrap_or(0.0);
        if height > 0.0 {
            height
        } else {
            self.inner.config.navbar_fallback_height
        }
    }

    fn on_click(&self, link: &H::Node, event: &DomEvent<H::Node>) {
        let Some(href) = link.attribute("href") else {
            return;
        };
        let Some(target_id) = href.strip_prefix('#') else {
            return;
        };
        event.prevent_default();

        let host = &self.inner.host;
        let Some(target) = host.element_by_id(target_id) else {
            return;
        };
        host.scroll_to(target.offset_top() - self.navbar_offset());

        link.set_style("transform", "scale(0.95)");
        let link = link.clone();
        host.set_timeout(
            self.inner.config.press_feedback(),
            Box::new(move || link.remove_style("transform")),
        );
    }
}
