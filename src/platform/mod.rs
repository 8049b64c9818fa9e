//! Platform plumbing for the browser event loop
//!
//! Timed suspension and wall-clock reads. Everything DOM-shaped lives in
//! `scene` and `overlay`; this module only wraps the scheduler.

/// Suspend the calling task for `ms` milliseconds without blocking frame
/// scheduling. Built on `setTimeout` behind a promise, so the physics loop
/// keeps running while a sequence waits.
#[cfg(target_arch = "wasm32")]
pub async fn sleep(ms: f64) {
    use wasm_bindgen_futures::JsFuture;

    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms as i32);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Milliseconds since an arbitrary epoch, good enough for frame timing and
/// seeding
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}
