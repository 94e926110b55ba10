//! Waitlist form controller
//!
//! Validates the name and email fields as the user types, runs the submission
//! state machine and shows feedback messages:
//!
//! ```text
//! idle --submit(valid)--> submitting --(done)--> success --(timeout)--> idle
//! idle --submit(invalid)--> error --(timeout)--> idle
//! ```
//!
//! The actual submission goes through a [`WaitlistSubmitter`], so the network
//! can be swapped for a timer in the browser and a scripted result in tests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::config::LandingConfig;
use super::css::{css_number, inject_style, px};
use super::error::SubmitError;
use super::host::{DomEvent, DomNode, Host, Target};
use super::validation::{Field, FieldState, WaitlistEntry, classify, validate_submission};

/// Id of the injected celebration keyframes
pub const CELEBRATION_STYLE_ID: &str = "celebration-styles";
/// Glyphs emitted after a successful sign-up, in order
pub const CELEBRATION_GLYPHS: [&str; 5] = ["🎉", "✨", "🚀", "💙", "🎊"];
/// Message shown when the submitter reports a failure
pub const SUBMIT_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

const CELEBRATION_CSS: &str = "
@keyframes celebrate {
    0% { opacity: 0; transform: translate(-50%, -50%) scale(0.5) rotate(0deg); }
    50% { opacity: 1; transform: translate(-50%, -50%) scale(1.2) rotate(180deg); }
    100% { opacity: 0; transform: translate(-50%, -50%) scale(1) rotate(360deg) translateY(-100px); }
}
";

const MESSAGE_HIDDEN: [(&str, &str); 2] = [("transform", "translateY(-10px)"), ("opacity", "0")];
const MESSAGE_SHOWN: [(&str, &str); 2] = [("transform", "translateY(0)"), ("opacity", "1")];

/// Where the form is in its submit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn class(&self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }
}

/// Sends a validated sign-up somewhere.
///
/// `done` must be called exactly once, possibly later from a timer or a
/// network callback.
pub trait WaitlistSubmitter {
    fn submit(&self, entry: WaitlistEntry, done: Box<dyn FnOnce(Result<(), SubmitError>)>);
}

/// Submitter that succeeds after a fixed latency without talking to anyone
pub struct SimulatedSubmitter<H: Host> {
    host: Rc<H>,
    latency: Duration,
}

impl<H: Host> SimulatedSubmitter<H> {
    pub fn new(host: Rc<H>, latency: Duration) -> Self {
        Self { host, latency }
    }
}

impl<H: Host> WaitlistSubmitter for SimulatedSubmitter<H> {
    fn submit(&self, entry: WaitlistEntry, done: Box<dyn FnOnce(Result<(), SubmitError>)>) {
        leptos::logging::log!("Submitting waitlist entry for {}", entry.email);
        self.host.set_timeout(self.latency, Box::new(move || done(Ok(()))));
    }
}

/// Elements owned by the form controller. Everything but the form is optional.
pub struct FormElements<N> {
    pub form: N,
    pub name: Option<N>,
    pub email: Option<N>,
    pub submit: Option<N>,
    pub text: Option<N>,
    pub loader: Option<N>,
    pub message: Option<N>,
}

struct FormInner<H: Host> {
    host: Rc<H>,
    elements: FormElements<H::Node>,
    submitter: Box<dyn WaitlistSubmitter>,
    config: LandingConfig,
    state: Cell<SubmissionState>,
    /// Bumped on every message; expiry timers of older messages no-op
    message_generation: Cell<u64>,
}

/// Waitlist form controller
pub struct FormController<H: Host> {
    inner: Rc<FormInner<H>>,
}

impl<H: Host> Clone for FormController<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: Host> FormController<H> {
    pub fn init(
        host: Rc<H>,
        elements: FormElements<H::Node>,
        submitter: Box<dyn WaitlistSubmitter>,
        config: &LandingConfig,
    ) -> Self {
        let controller = Self {
            inner: Rc::new(FormInner {
                host: host.clone(),
                elements,
                submitter,
                config: config.clone(),
                state: Cell::new(SubmissionState::Idle),
                message_generation: Cell::new(0),
            }),
        };

        for field in [Field::Name, Field::Email] {
            let Some(input) = controller.field_node(field) else {
                continue;
            };
            for event in ["input", "blur"] {
                let this = controller.clone();
                host.listen(
                    Target::Element(input),
                    event,
                    Box::new(move |_: &DomEvent<H::Node>| {
                        this.validate_field(field);
                    }),
                );
            }

            let lift = input.clone();
            host.listen(
                Target::Element(input),
                "focus",
                Box::new(move |_: &DomEvent<H::Node>| {
                    if let Some(container) = lift.parent() {
                        container.set_style("transform", "translateY(-2px)");
                    }
                }),
            );
            let settle = input.clone();
            host.listen(
                Target::Element(input),
                "blur",
                Box::new(move |_: &DomEvent<H::Node>| {
                    if let Some(container) = settle.parent() {
                        container.set_style("transform", "translateY(0)");
                    }
                }),
            );
        }

        let this = controller.clone();
        host.listen(
            Target::Element(&controller.inner.elements.form),
            "submit",
            Box::new(move |event: &DomEvent<H::Node>| {
                event.prevent_default();
                this.submit();
            }),
        );

        controller
    }

    pub fn state(&self) -> SubmissionState {
        self.inner.state.get()
    }

    fn field_node(&self, field: Field) -> Option<&H::Node> {
        match field {
            Field::Name => self.inner.elements.name.as_ref(),
            Field::Email => self.inner.elements.email.as_ref(),
        }
    }

    fn field_value(&self, field: Field) -> String {
        self.field_node(field)
            .map(|input| input.value())
            .unwrap_or_default()
    }

    /// Re-style one field from its current content
    pub fn validate_field(&self, field: Field) -> FieldState {
        let Some(input) = self.field_node(field) else {
            return FieldState::Empty;
        };
        let state = classify(field, &input.value());

        input.remove_class("valid");
        input.remove_class("invalid");
        if let Some(class) = state.class() {
            input.add_class(class);
        }
        input.set_style("border-color", state.border_color());
        state
    }

    /// Validate and submit the form. Ignored while a submission is in flight.
    pub fn submit(&self) {
        if self.state() == SubmissionState::Submitting {
            return;
        }

        let name = self.field_value(Field::Name);
        let email = self.field_value(Field::Email);
        let entry = match validate_submission(&name, &email) {
            Ok(entry) => entry,
            Err(error) => {
                self.inner.state.set(SubmissionState::Error);
                self.show_message(&error.to_string(), MessageKind::Error);
                if let Some(input) = self.field_node(error.field()) {
                    input.focus();
                }
                return;
            }
        };

        self.inner.state.set(SubmissionState::Submitting);
        self.set_loading(true);

        let this = self.clone();
        let name = entry.name.clone();
        self.inner.submitter.submit(
            entry,
            Box::new(move |result| this.finish(&name, result)),
        );
    }

    fn finish(&self, name: &str, result: Result<(), SubmitError>) {
        self.set_loading(false);
        match result {
            Ok(()) => {
                leptos::logging::log!("Waitlist sign-up completed for {}", name);
                self.inner.state.set(SubmissionState::Success);
                self.show_message(
                    &format!(
                        "Thanks {}! You've been added to our waitlist. We'll be in touch soon.",
                        name
                    ),
                    MessageKind::Success,
                );
                self.reset_fields();
                self.celebrate();
                self.pulse();
            }
            Err(e) => {
                leptos::logging::warn!("{}", e);
                self.inner.state.set(SubmissionState::Error);
                self.show_message(SUBMIT_FAILED_MESSAGE, MessageKind::Error);
            }
        }
    }

    fn set_loading(&self, loading: bool) {
        let elements = &self.inner.elements;
        if let Some(submit) = &elements.submit {
            submit.set_disabled(loading);
            submit.set_style("transform", if loading { "scale(0.98)" } else { "scale(1)" });
        }
        if let Some(text) = &elements.text {
            text.set_style("opacity", if loading { "0" } else { "1" });
        }
        if let Some(loader) = &elements.loader {
            loader.toggle_class("hidden", !loading);
        }
    }

    fn reset_fields(&self) {
        for field in [Field::Name, Field::Email] {
            if let Some(input) = self.field_node(field) {
                input.set_value("");
                self.validate_field(field);
            }
        }
    }

    /// Show a feedback message. Error messages fade out after the dismiss
    /// delay; success messages stay.
    pub fn show_message(&self, text: &str, kind: MessageKind) {
        let host = &self.inner.host;
        let generation = self.inner.message_generation.get() + 1;
        self.inner.message_generation.set(generation);

        if let Some(message) = &self.inner.elements.message {
            message.set_text(text);
            message.set_class_name(&format!("form-message {}", kind.class()));
            message.set_styles(&MESSAGE_HIDDEN);

            let entering = message.clone();
            host.set_timeout(
                self.inner.config.enter_delay(),
                Box::new(move || entering.set_styles(&MESSAGE_SHOWN)),
            );
            message.scroll_into_view();
        }

        let this = self.clone();
        host.set_timeout(
            Duration::from_millis(self.inner.config.message_dismiss_ms),
            Box::new(move || this.expire_message(generation, kind)),
        );
    }

    fn is_current(&self, generation: u64) -> bool {
        self.inner.message_generation.get() == generation
    }

    fn expire_message(&self, generation: u64, kind: MessageKind) {
        if !self.is_current(generation) {
            return;
        }
        if matches!(
            self.state(),
            SubmissionState::Success | SubmissionState::Error
        ) {
            self.inner.state.set(SubmissionState::Idle);
        }

        if kind != MessageKind::Error {
            return;
        }
        let Some(message) = self.inner.elements.message.clone() else {
            return;
        };
        if !message.has_class(kind.class()) {
            return;
        }
        message.set_style("opacity", "0");

        let this = self.clone();
        self.inner.host.set_timeout(
            self.inner.config.fade_out(),
            Box::new(move || {
                if this.is_current(generation) {
                    message.add_class("hidden");
                }
            }),
        );
    }

    fn celebrate(&self) {
        let host = &self.inner.host;
        let config = &self.inner.config;
        let lifetime = Duration::from_millis(config.celebration_lifetime_ms);

        for (index, glyph) in CELEBRATION_GLYPHS.into_iter().enumerate() {
            let emitter = host.clone();
            host.set_timeout(
                Duration::from_millis(config.celebration_stagger_ms * index as u64),
                Box::new(move || spawn_glyph(emitter, glyph, lifetime)),
            );
        }

        inject_style(host.as_ref(), CELEBRATION_STYLE_ID, CELEBRATION_CSS);
    }

    fn pulse(&self) {
        let form = self.inner.elements.form.clone();
        form.set_style("transform", "scale(1.02)");
        self.inner.host.set_timeout(
            Duration::from_millis(self.inner.config.success_pulse_ms),
            Box::new(move || form.set_style("transform", "scale(1)")),
        );
    }
}

fn spawn_glyph<H: Host>(host: Rc<H>, glyph: &str, lifetime: Duration) {
    let (Some(body), Some(celebration)) = (host.body(), host.create_element("div")) else {
        return;
    };
    let left = format!("{}%", css_number(50.0 + (host.random() - 0.5) * 40.0));
    let size = px(40.0 + host.random() * 20.0);
    let animation = format!(
        "celebrate {}s ease-out forwards",
        css_number(2.0 + host.random())
    );
    celebration.set_styles(&[
        ("position", "fixed"),
        ("top", "50%"),
        ("left", left.as_str()),
        ("transform", "translate(-50%, -50%)"),
        ("font-size", size.as_str()),
        ("z-index", "9999"),
        ("pointer-events", "none"),
        ("animation", animation.as_str()),
    ]);
    celebration.set_text(glyph);
    body.append_child(&celebration);

    host.set_timeout(
        lifetime,
        Box::new(move || {
            if celebration.is_connected() {
                celebration.remove();
            }
        }),
    );
}
