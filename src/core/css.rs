//! Helpers for building inline style values and injected stylesheets

use super::host::{DomNode, Host};

/// Format a number for CSS: at most three decimals, no trailing zeros, no `-0`
pub fn css_number(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 || !rounded.is_finite() {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

pub fn px(value: f64) -> String {
    format!("{}px", css_number(value))
}

/// Append a `<style id=..>` element to `<head>` unless one with that id exists.
/// Returns true when the stylesheet was added.
pub fn inject_style<H: Host>(host: &H, id: &str, css: &str) -> bool {
    if host.element_by_id(id).is_some() {
        return false;
    }
    let (Some(head), Some(style)) = (host.head(), host.create_element("style")) else {
        return false;
    };
    style.set_attribute("id", id);
    style.set_text(css);
    head.append_child(&style);
    true
}
