//! Landing page behaviors, written against the [`Host`] abstraction so they run
//! the same in the browser and in native tests

pub mod config;
pub mod css;
pub mod diagnostics;
pub mod error;
pub mod form;
pub mod host;
pub mod interactions;
pub mod menu;
pub mod navigation;
pub mod page;
pub mod reveal;
pub mod scroll;
pub mod validation;

#[cfg(test)]
pub mod testing;

pub use config::LandingConfig;
pub use diagnostics::{ElementCounts, log_debug_info};
pub use error::{LandingError, SubmitError};
pub use form::{
    FormController, FormElements, MessageKind, SimulatedSubmitter, SubmissionState,
    WaitlistSubmitter,
};
pub use host::{DomEvent, DomNode, Host, ObserverOptions, Rect, Target};
pub use interactions::{InteractionElements, Interactions};
pub use menu::MobileMenu;
pub use navigation::AnchorNavigation;
pub use page::Landing;
pub use reveal::{RevealAnimator, RevealElements};
pub use scroll::{ScrollElements, ScrollEngine};
pub use validation::{Field, FieldState, ValidationError, WaitlistEntry};
