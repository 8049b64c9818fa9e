//! Credits captions and the final reveal surface
//!
//! All id-addressed DOM plumbing for the post-blast narrative. The physics
//! core never touches elements directly; it calls through these helpers.

use wasm_bindgen::JsCast;
use web_sys as web;

/// Ordered caption element ids: the role/name credit, then the title
/// announcement
pub const CREDIT_LINES: &[&str] = &["scene-credit", "scene-title"];

#[inline]
pub fn show(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        let _ = el.class_list().add_1("is-visible");
    }
}

#[inline]
pub fn hide(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        let _ = el.class_list().remove_1("is-visible");
    }
}

/// Pin the spotlight highlight to the viewport center while credits play
pub fn lock_spotlight(document: &web::Document) {
    if let Some(body) = document.body() {
        let _ = body.class_list().add_1("spot-locked");
        let style = body.style();
        let _ = style.set_property("--spot-x", "50%");
        let _ = style.set_property("--spot-y", "50%");
    }
}

pub fn unlock_spotlight(document: &web::Document) {
    if let Some(body) = document.body() {
        let _ = body.class_list().remove_1("spot-locked");
    }
}

/// Swap the scene surface for the looping reveal video and unlock the page
pub fn reveal(document: &web::Document, video_url: &str, rate: f64) {
    let Some(wrap) = document.get_element_by_id("wrap") else {
        return;
    };
    wrap.set_inner_html("");

    let video = document
        .create_element("video")
        .ok()
        .and_then(|el| el.dyn_into::<web::HtmlVideoElement>().ok());
    if let Some(video) = video {
        video.set_src(video_url);
        video.set_muted(true);
        video.set_loop(true);
        video.set_autoplay(true);
        video.set_playback_rate(rate);
        let _ = video.set_attribute("playsinline", "");
        let _ = wrap.append_child(&video);
        let _ = video.play();
    }

    if let Some(body) = document.body() {
        let _ = body.class_list().add_1("app-on");
        let _ = body.style().set_property("overflow", "auto");
    }
    log::info!("reveal: scene surface swapped for the loop video");
}

/// Measure the now-visible nav bar into the `--nav-h` custom property
pub fn sync_nav_offset(document: &web::Document) {
    let Some(nav) = document.get_element_by_id("nav") else {
        return;
    };
    let h = nav.get_bounding_client_rect().height();
    if let Some(root) = document
        .document_element()
        .and_then(|el| el.dyn_into::<web::HtmlElement>().ok())
    {
        let _ = root.style().set_property("--nav-h", &format!("{h:.0}px"));
    }
}
