//! Small browser utilities shared by the components.

use js_sys::Reflect;
use num_format::{Locale, ToFormattedString};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::HtmlElement;

const APPLICANT_ID_KEY: &str = "portal_applicant_id";

/// Displays a temporary notification at the bottom of the screen.
pub fn show_toast(message: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", "rgba(0, 0, 0, 0.8)").ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// The opaque applicant id kept in local storage. Sign-in lives outside the
/// portal, so a browser-local id is generated on first use.
pub fn applicant_id() -> String {
    let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
    if let Some(storage) = &storage {
        if let Ok(Some(id)) = storage.get_item(APPLICANT_ID_KEY) {
            if !id.is_empty() {
                return id;
            }
        }
    }
    let id = uuid::Uuid::new_v4().to_string();
    if let Some(storage) = storage {
        if storage.set_item(APPLICANT_ID_KEY, &id).is_err() {
            gloo_console::warn!("Could not persist the applicant id");
        }
    }
    id
}

/// Sets the global `app_dirty` flag read by the page's unload guard.
pub fn set_window_dirty_flag(dirty: bool) {
    if let Some(window) = web_sys::window() {
        let _ = Reflect::set(
            &window,
            &JsValue::from_str("app_dirty"),
            &JsValue::from_bool(dirty),
        );
    }
}

pub fn is_window_dirty() -> bool {
    web_sys::window()
        .and_then(|window| Reflect::get(&window, &JsValue::from_str("app_dirty")).ok())
        .and_then(|flag| flag.as_bool())
        .unwrap_or(false)
}

/// Asks before leaving a view with unsaved edits.
pub fn confirm_discard() -> bool {
    if !is_window_dirty() {
        return true;
    }
    let confirmed = web_sys::window()
        .and_then(|window| {
            window
                .confirm_with_message("You have unsaved changes. Leave anyway?")
                .ok()
        })
        .unwrap_or(true);
    if confirmed {
        set_window_dirty_flag(false);
    }
    confirmed
}

pub fn compute_md5(input: &str) -> String {
    format!("{:x}", md5::compute(input))
}

/// `$12,500.00`
pub fn format_amount(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as i64;
    let sign = if amount < 0.0 { "-" } else { "" };
    format!(
        "{}${}.{:02}",
        sign,
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_use_grouping_and_cents() {
        assert_eq!(format_amount(12500.0), "$12,500.00");
        assert_eq!(format_amount(0.5), "$0.50");
        assert_eq!(format_amount(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn md5_is_hex() {
        assert_eq!(compute_md5(""), "d41d8cd98f00b204e9800998ecf8427e");
    }
}
