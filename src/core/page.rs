//! Page bootstrap: find each component's elements and wire everything up

use std::rc::Rc;
use std::time::Duration;

use super::config::LandingConfig;
use super::form::{FormController, FormElements, SimulatedSubmitter, WaitlistSubmitter};
use super::host::{DomNode, Host};
use super::interactions::{InteractionElements, Interactions};
use super::menu::MobileMenu;
use super::navigation::AnchorNavigation;
use super::reveal::{RevealAnimator, RevealElements};
use super::scroll::{ScrollElements, ScrollEngine};

/// Selectors of the elements the page scripts bind to
pub mod selectors {
    pub const NAVBAR: &str = ".navbar";
    pub const HERO: &str = ".hero";
    pub const SHAPES: &str = ".shape";
    pub const ANIMATED: &str = "[data-aos]";
    pub const SECTIONS: &str = "section";
    pub const ANCHORS: &str = ".nav-link, a[href^=\"#\"]";
    pub const BUTTONS: &str = ".btn";
    pub const CARDS: &str = ".interactive-card";
    pub const DEMO: &str = ".preview-demo-btn";
    pub const MAIL_LINKS: &str = "a[href^=\"mailto:\"]";
    pub const MENU_TOGGLE: &str = ".mobile-menu-toggle";
    pub const MENU_PANEL: &str = ".nav-links";

    pub const FORM_ID: &str = "waitlistForm";
    pub const NAME_ID: &str = "name";
    pub const EMAIL_ID: &str = "email";
    pub const MESSAGE_ID: &str = "form-message";
    pub const SUBMIT_CLASS: &str = "submit-btn";
    pub const TEXT_CLASS: &str = "btn-text";
    pub const LOADER_CLASS: &str = "btn-loader";
}

/// Every interactive component of the landing page
pub struct Landing<H: Host> {
    pub navigation: AnchorNavigation<H>,
    pub scroll: ScrollEngine<H>,
    pub reveal: RevealAnimator<H>,
    pub form: Option<FormController<H>>,
    pub interactions: Interactions<H>,
    pub menu: Option<MobileMenu<H>>,
}

impl<H: Host> Landing<H> {
    /// Bootstrap with the simulated waitlist submitter
    pub fn init(host: Rc<H>, config: &LandingConfig) -> Self {
        let submitter = SimulatedSubmitter::new(
            host.clone(),
            Duration::from_millis(config.submit_latency_ms),
        );
        Self::init_with_submitter(host, config, Box::new(submitter))
    }

    pub fn init_with_submitter(
        host: Rc<H>,
        config: &LandingConfig,
        submitter: Box<dyn WaitlistSubmitter>,
    ) -> Self {
        let navbar = host.query(selectors::NAVBAR);

        let navigation = AnchorNavigation::init(
            host.clone(),
            &host.query_all(selectors::ANCHORS),
            navbar.clone(),
            config,
        );

        let scroll = ScrollEngine::init(
            host.clone(),
            ScrollElements {
                navbar,
                hero: host.query(selectors::HERO),
                shapes: host.query_all(selectors::SHAPES),
            },
            config,
        );

        let reveal = RevealAnimator::init(
            host.clone(),
            RevealElements {
                animated: host.query_all(selectors::ANIMATED),
                sections: host.query_all(selectors::SECTIONS),
            },
            config,
        );

        let form = form_elements(host.as_ref())
            .map(|elements| FormController::init(host.clone(), elements, submitter, config));

        let interactions = Interactions::init(
            host.clone(),
            InteractionElements {
                buttons: host.query_all(selectors::BUTTONS),
                cards: host.query_all(selectors::CARDS),
                demo: host.query(selectors::DEMO),
                mail_links: host.query_all(selectors::MAIL_LINKS),
            },
            config,
        );

        let menu = match (
            host.query(selectors::MENU_TOGGLE),
            host.query(selectors::MENU_PANEL),
        ) {
            (Some(toggle), Some(panel)) => {
                Some(MobileMenu::init(host.clone(), toggle, panel, config))
            }
            _ => None,
        };

        leptos::logging::log!("TapIn website initialized successfully!");

        Self {
            navigation,
            scroll,
            reveal,
            form,
            interactions,
            menu,
        }
    }
}

/// First descendant of `root` carrying `class`
fn find_within<N: DomNode>(root: &N, class: &str) -> Option<N> {
    root.descendants()
        .into_iter()
        .find(|node| node.has_class(class))
}

fn form_elements<H: Host>(host: &H) -> Option<FormElements<H::Node>> {
    let form = host.element_by_id(selectors::FORM_ID)?;
    let submit = find_within(&form, selectors::SUBMIT_CLASS);
    let text = submit
        .as_ref()
        .and_then(|submit| find_within(submit, selectors::TEXT_CLASS));
    let loader = submit
        .as_ref()
        .and_then(|submit| find_within(submit, selectors::LOADER_CLASS));

    Some(FormElements {
        name: host.element_by_id(selectors::NAME_ID),
        email: host.element_by_id(selectors::EMAIL_ID),
        message: host.element_by_id(selectors::MESSAGE_ID),
        submit,
        text,
        loader,
        form,
    })
}
