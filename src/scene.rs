//! SVG scene loading and screen-space geometry
//!
//! Fetches the title artwork, inlines it into the page, and exposes the
//! animatable block elements plus the client-space geometry the integrator
//! needs.

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

use crate::consts::FALLBACK_VIEW_HEIGHT;
use crate::sim::CenterSource;

/// The inlined title scene: svg root plus the selected block elements
pub struct Scene {
    pub svg: web::SvgsvgElement,
    pub blocks: Vec<web::SvgGraphicsElement>,
    /// View-box height, used for the off-screen heuristic
    pub view_height: f32,
}

/// Fetch the SVG asset, inline it under `#wrap`, and select the blocks
pub async fn load(document: &web::Document, url: &str) -> Result<Scene, JsValue> {
    let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let resp_value = JsFuture::from(window.fetch_with_str(url)).await?;
    let resp: web::Response = resp_value.dyn_into()?;
    let text = JsFuture::from(resp.text()?).await?;
    let svg_text = text.as_string().unwrap_or_default();

    let wrap = document
        .get_element_by_id("wrap")
        .ok_or_else(|| JsValue::from_str("missing #wrap container"))?;
    wrap.set_inner_html(&svg_text);

    let svg: web::SvgsvgElement = wrap
        .query_selector("svg")?
        .ok_or_else(|| JsValue::from_str("asset contained no <svg>"))?
        .dyn_into()?;

    let view_height = view_height_of(&svg);
    let blocks = select_blocks(&svg)?;
    log::info!(
        "scene loaded: {} blocks, view height {view_height}",
        blocks.len()
    );

    Ok(Scene {
        svg,
        blocks,
        view_height,
    })
}

fn view_height_of(svg: &web::SvgsvgElement) -> f32 {
    let vb = svg.view_box().base_val();
    if vb.width() > 0.0 {
        vb.height()
    } else {
        log::warn!(
            "svg missing a usable viewBox; physics falls back to height {FALLBACK_VIEW_HEIGHT}"
        );
        FALLBACK_VIEW_HEIGHT
    }
}

/// Named `block-*` shapes, falling back to every path when the artwork ships
/// without named shapes. Zero blocks is a silent no-op scene, not an error.
fn select_blocks(svg: &web::SvgsvgElement) -> Result<Vec<web::SvgGraphicsElement>, JsValue> {
    let mut blocks = collect(svg.query_selector_all("[id^=\"block-\"]")?);
    if blocks.is_empty() {
        blocks = collect(svg.query_selector_all("path")?);
    }
    for el in &blocks {
        let _ = el.class_list().add_1("block");
    }
    Ok(blocks)
}

fn collect(list: web::NodeList) -> Vec<web::SvgGraphicsElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web::SvgGraphicsElement>().ok())
        .collect()
}

impl Scene {
    /// Screen-space center of one block: local bounding box center mapped
    /// through the live screen transform. A detached or hidden block (no
    /// CTM) reports the origin rather than failing.
    pub fn element_center(&self, el: &web::SvgGraphicsElement) -> Vec2 {
        let (Ok(bbox), Some(ctm)) = (el.get_b_box(), el.get_screen_ctm()) else {
            return Vec2::ZERO;
        };
        let pt = self.svg.create_svg_point();
        pt.set_x(bbox.x() + bbox.width() / 2.0);
        pt.set_y(bbox.y() + bbox.height() / 2.0);
        let c = pt.matrix_transform(&ctm);
        Vec2::new(c.x(), c.y())
    }

    /// Write a body's offset as the block's visual transform (px, 2dp)
    pub fn apply_offset(&self, index: usize, pos: Vec2) {
        if let Some(el) = self.blocks.get(index) {
            let _ = el.style().set_property(
                "transform",
                &format!("translate({:.2}px, {:.2}px)", pos.x, pos.y),
            );
        }
    }
}

impl CenterSource for Scene {
    fn center_of(&self, index: usize) -> Vec2 {
        self.blocks
            .get(index)
            .map(|el| self.element_center(el))
            .unwrap_or(Vec2::ZERO)
    }
}
