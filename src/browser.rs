//! Thin wrappers over the `web_sys` calls the pages share: timers, window
//! listeners, dialogs and object URLs.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

fn millis(duration: Duration) -> i32 {
    duration.as_millis().min(i32::MAX as u128) as i32
}

/// Run `f` once after `delay`.
pub fn set_timeout(delay: Duration, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::once(f);
    if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        millis(delay),
    ) {
        tracing::warn!("setTimeout failed: {:?}", e);
    }
    callback.forget();
}

/// Call `tick` every `period` until it returns `false`.
pub fn run_interval(period: Duration, mut tick: impl FnMut() -> bool + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let handle_in = Rc::clone(&handle);
    let callback = Closure::<dyn FnMut()>::new(move || {
        if !tick() {
            if let (Some(id), Some(w)) = (handle_in.take(), web_sys::window()) {
                w.clear_interval_with_handle(id);
            }
        }
    });
    match window.set_interval_with_callback_and_timeout_and_arguments_0(
        callback.as_ref().unchecked_ref(),
        millis(period),
    ) {
        Ok(id) => handle.set(Some(id)),
        Err(e) => tracing::warn!("setInterval failed: {:?}", e),
    }
    callback.forget();
}

/// Listen for `event` on the window for the rest of the page's life.
pub fn on_window_event(event: &str, handler: impl FnMut(web_sys::Event) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    if let Err(e) = window.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
        tracing::warn!("Could not listen for {}: {:?}", event, e);
    }
    callback.forget();
}

pub fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        let options = web_sys::ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(web_sys::ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}

/// Native `confirm()` dialog. A blocked dialog counts as "no".
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// `blob:` URL for previewing a local file without reading it.
pub fn object_url(file: &web_sys::File) -> Option<String> {
    web_sys::Url::create_object_url_with_blob(file).ok()
}

pub fn revoke_object_url(url: &str) {
    if url.starts_with("blob:") {
        let _ = web_sys::Url::revoke_object_url(url);
    }
}
