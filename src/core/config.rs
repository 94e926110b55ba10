//! Tuning configuration for the landing page behaviors.
//!
//! Every threshold, delay and duration used by the components lives here.
//! The browser bootstrap loads overrides with `LandingConfig::from_json()` from an
//! optional `<script type="application/json" id="tapin-config">` element.

use std::time::Duration;

use serde::Deserialize;

use super::error::LandingError;

/// Id of the optional element carrying JSON configuration overrides
pub const CONFIG_ELEMENT_ID: &str = "tapin-config";

/// Landing page configuration. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    /// Scroll offset past which the navbar gets the `scrolled` class
    pub scrolled_threshold: f64,
    /// Scroll offset past which the navbar hides on scroll-down
    pub hide_threshold: f64,

    /// Visible fraction that triggers a reveal animation
    pub reveal_threshold: f64,
    /// Viewport margin for reveal animations (bottom bias)
    pub reveal_root_margin: String,
    /// Stagger between sibling reveal elements
    pub reveal_stagger_ms: u64,
    /// Visible fraction that fades a section in
    pub section_threshold: f64,
    /// Delay between section observer registrations
    pub section_stagger_ms: u64,

    /// Hero translation per scrolled unit
    pub hero_parallax_rate: f64,
    /// Parallax speed of the first shape
    pub shape_base_speed: f64,
    /// Extra parallax speed per shape index
    pub shape_speed_step: f64,
    /// Shape rotation in degrees per scrolled unit
    pub shape_rotation_rate: f64,

    /// Navbar height used for anchor offsets when the navbar has none
    pub navbar_fallback_height: f64,
    /// Duration of the press feedback on links and cards
    pub press_feedback_ms: u64,
    /// Delay before an enter transition starts
    pub enter_delay_ms: u64,
    /// Duration of fade-out transitions before removal
    pub fade_out_ms: u64,

    /// Simulated waitlist submission latency
    pub submit_latency_ms: u64,
    /// Lifetime of error messages and of the success/error states
    pub message_dismiss_ms: u64,
    /// Delay between celebration glyphs
    pub celebration_stagger_ms: u64,
    /// Lifetime of one celebration glyph
    pub celebration_lifetime_ms: u64,
    /// Duration of the form pulse after a successful submission
    pub success_pulse_ms: u64,

    /// Lifetime of a button ripple
    pub ripple_ms: u64,
    /// Time a mail tooltip stays visible
    pub tooltip_ms: u64,
    /// Minimum z-index of elements dismissed with Escape
    pub overlay_z_index: i32,

    /// Mobile menu close transition
    pub menu_transition_ms: u64,
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold: 50.0,
            hide_threshold: 100.0,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -50px 0px".to_string(),
            reveal_stagger_ms: 100,
            section_threshold: 0.1,
            section_stagger_ms: 200,
            hero_parallax_rate: -0.2,
            shape_base_speed: 0.1,
            shape_speed_step: 0.05,
            shape_rotation_rate: 0.1,
            navbar_fallback_height: 80.0,
            press_feedback_ms: 150,
            enter_delay_ms: 10,
            fade_out_ms: 300,
            submit_latency_ms: 2000,
            message_dismiss_ms: 5000,
            celebration_stagger_ms: 200,
            celebration_lifetime_ms: 3000,
            success_pulse_ms: 200,
            ripple_ms: 600,
            tooltip_ms: 2000,
            overlay_z_index: 10000,
            menu_transition_ms: 300,
        }
    }
}

impl LandingConfig {
    /// Parse configuration overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, LandingError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn press_feedback(&self) -> Duration {
        Duration::from_millis(self.press_feedback_ms)
    }

    pub fn enter_delay(&self) -> Duration {
        Duration::from_millis(self.enter_delay_ms)
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }
}
