//! Element census behind the `debugTapIn()` console helper

use std::fmt;

use serde::Serialize;

use super::host::Host;

/// Counts of the element categories the page scripts bind to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCounts {
    pub nav_links: usize,
    pub interactive_cards: usize,
    pub buttons: usize,
    pub form_controls: usize,
    pub animated: usize,
}

impl ElementCounts {
    pub fn collect<H: Host>(host: &H) -> Self {
        Self {
            nav_links: host.query_all(".nav-link").len(),
            interactive_cards: host.query_all(".interactive-card").len(),
            buttons: host.query_all(".btn").len(),
            form_controls: host.query_all(".form-control").len(),
            animated: host.query_all("[data-aos]").len(),
        }
    }
}

impl fmt::Display for ElementCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TapIn Debug Info:")?;
        writeln!(f, "Navigation links: {}", self.nav_links)?;
        writeln!(f, "Interactive cards: {}", self.interactive_cards)?;
        writeln!(f, "Buttons: {}", self.buttons)?;
        writeln!(f, "Form elements: {}", self.form_controls)?;
        write!(f, "Animated elements: {}", self.animated)
    }
}

/// Log the element census and return it
pub fn log_debug_info<H: Host>(host: &H) -> ElementCounts {
    let counts = ElementCounts::collect(host);
    for line in counts.to_string().lines() {
        leptos::logging::log!("{}", line);
    }
    counts
}
