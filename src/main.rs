//! Title Blast entry point
//!
//! Wires pointer input, the frame loop, and the credits driver to the
//! simulation core.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{AddEventListenerOptions, PointerEvent, TouchEvent};

    use title_blast::overlay::{self, CREDIT_LINES};
    use title_blast::platform;
    use title_blast::scene::{self, Scene};
    use title_blast::sim::{Mode, SceneState, Stage, Timeline, step, trigger_blast};
    use title_blast::tuning::Feel;

    const SCENE_URL: &str = "assets/svg/openingtitle.svg";
    const REVEAL_VIDEO_URL: &str = "assets/video/reveal-loop.mp4";

    /// App instance holding the scene, the simulation context, and the RNG
    struct App {
        state: SceneState,
        feel: Feel,
        scene: Scene,
        rng: Pcg32,
        offscreen_logged: bool,
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logger");

        log::info!("title sequence starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let feel = read_feel_override(&document);

        let scene = match scene::load(&document, SCENE_URL).await {
            Ok(scene) => scene,
            Err(err) => {
                log::error!("scene load failed: {err:?}");
                return;
            }
        };

        let seed = platform::now_ms() as u64;
        let state = SceneState::new(scene.blocks.len(), seed);
        let rng = state.rng_state.to_rng();
        let app = Rc::new(RefCell::new(App {
            state,
            feel,
            scene,
            rng,
            offscreen_logged: false,
        }));

        setup_pointer_tracking(app.clone());
        setup_blast_trigger(app.clone());
        setup_auto_advance(app.clone());

        request_animation_frame(app);

        log::info!("title sequence running (seed {seed})");
    }

    /// Optional partial feel override from an inline JSON block:
    /// `<script type="application/json" id="feel-config">{"repel":{"radius":220}}</script>`
    fn read_feel_override(document: &web_sys::Document) -> Feel {
        document
            .get_element_by_id("feel-config")
            .and_then(|el| el.text_content())
            .map(|json| Feel::from_json(&json))
            .unwrap_or_default()
    }

    /// Passive move/leave listeners feeding the shared cursor, last write
    /// wins; the frame step reads whatever is current at call time.
    fn setup_pointer_tracking(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut a = app.borrow_mut();
                a.state.cursor.pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                a.state.cursor.active = true;
            });
            add_passive_listener(&window, "pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let mut a = app.borrow_mut();
                    a.state.cursor.pos =
                        Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    a.state.cursor.active = true;
                }
            });
            add_passive_listener(&window, "touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["pointerleave", "touchend"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().state.cursor.active = false;
            });
            add_passive_listener(&window, name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn add_passive_listener(target: &web_sys::Window, name: &str, callback: &js_sys::Function) {
        let opts = AddEventListenerOptions::new();
        opts.set_passive(true);
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            name, callback, &opts,
        );
    }

    /// The first pointer-down on the scene flips the state machine. The
    /// listener registers with `once`; the sim-level mode guard covers the
    /// synthesized fallback path racing a real click.
    fn setup_blast_trigger(app: Rc<RefCell<App>>) {
        let svg = app.borrow().scene.svg.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let click = Vec2::new(event.client_x() as f32, event.client_y() as f32);
            begin_blast(&app, click);
        });
        let opts = AddEventListenerOptions::new();
        opts.set_once(true);
        let _ = svg.add_event_listener_with_callback_and_add_event_listener_options(
            "pointerdown",
            closure.as_ref().unchecked_ref(),
            &opts,
        );
        closure.forget();
    }

    /// Safety fallback: a passive viewer still gets the full sequence. If
    /// the mode is still Repel when the timer fires, synthesize a centered
    /// click through the same transition path as a real pointer-down.
    fn setup_auto_advance(app: Rc<RefCell<App>>) {
        let delay = app.borrow().feel.auto_advance_ms as i32;
        let closure = Closure::once(move || {
            let still_repel = app.borrow().state.mode == Mode::Repel;
            if still_repel {
                log::info!("no interaction after {delay}ms; auto-advancing");
                begin_blast(&app, viewport_center());
            }
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay,
            );
        }
        closure.forget();
    }

    fn viewport_center() -> Vec2 {
        let Some(window) = web_sys::window() else {
            return Vec2::ZERO;
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Vec2::new(w as f32 / 2.0, h as f32 / 2.0)
    }

    /// Shared Repel -> Blast transition: impulse now, credits after
    fn begin_blast(app: &Rc<RefCell<App>>, click: Vec2) {
        {
            let a = &mut *app.borrow_mut();
            let App {
                state,
                feel,
                scene,
                rng,
                ..
            } = a;
            if !trigger_blast(state, &feel.blast, click, &*scene, rng) {
                return;
            }
            log::info!("blast triggered at ({:.0}, {:.0})", click.x, click.y);
        }
        wasm_bindgen_futures::spawn_local(run_credits(app.clone()));
    }

    /// The post-blast narrative: settle, captions in order, then reveal.
    /// A linear sequence of awaited delays; the frame loop keeps
    /// integrating (debris keeps falling) the whole way through.
    async fn run_credits(app: Rc<RefCell<App>>) {
        let (credits, first_run) = {
            let mut a = app.borrow_mut();
            (a.feel.credits, a.state.begin_credits())
        };
        if !first_run {
            return;
        }

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let timeline = Timeline::new(&credits, CREDIT_LINES.len());
        log::info!(
            "credits: {} captions over {:.0}ms",
            CREDIT_LINES.len(),
            timeline.total_ms()
        );

        // let the debris visibly separate before the first caption
        platform::sleep(credits.settle_ms).await;
        overlay::lock_spotlight(&document);

        let mut stage = Stage::Idle.advance(CREDIT_LINES.len());
        while stage != Stage::Reveal {
            match stage {
                Stage::Showing(i) => {
                    overlay::show(&document, CREDIT_LINES[i]);
                    platform::sleep(timeline.hold_ms).await;
                }
                Stage::Holding(i) => {
                    overlay::hide(&document, CREDIT_LINES[i]);
                    platform::sleep(timeline.gap_ms).await;
                }
                _ => {}
            }
            stage = stage.advance(CREDIT_LINES.len());
        }

        overlay::unlock_spotlight(&document);
        overlay::reveal(&document, REVEAL_VIDEO_URL, credits.video_rate);
        overlay::sync_nav_offset(&document);
        setup_nav_resize();
        log::info!("credits complete; page revealed");
    }

    /// Keep the nav-height offset fresh for the rest of the session
    fn setup_nav_resize() {
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                overlay::sync_nav_offset(&document);
            }
        });
        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// One simulation step + transform write-back, then reschedule. Runs
    /// every frame in every mode for the life of the page view.
    fn frame(app: Rc<RefCell<App>>) {
        {
            let a = &mut *app.borrow_mut();
            let App {
                state,
                feel,
                scene,
                offscreen_logged,
                ..
            } = a;

            step(state, feel, &*scene);
            for (i, body) in state.bodies.iter().enumerate() {
                scene.apply_offset(i, body.pos);
            }

            if state.mode == Mode::Blast
                && !*offscreen_logged
                && state.all_offscreen(scene.view_height)
            {
                *offscreen_logged = true;
                log::debug!("all debris left the frame after {} frames", state.frames);
            }
        }
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("title-blast (native) starting...");
    log::info!("the title sequence targets the browser - serve the wasm build instead");

    headless_settle_check();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless smoke run: nudged blocks settle back to rest with no cursor
#[cfg(not(target_arch = "wasm32"))]
fn headless_settle_check() {
    use glam::Vec2;
    use title_blast::sim::{FixedCenters, SceneState, step};
    use title_blast::tuning::Feel;

    let feel = Feel::default();
    let mut state = SceneState::new(10, 42);
    for (i, body) in state.bodies.iter_mut().enumerate() {
        body.pos = Vec2::new(i as f32 * 3.0 - 15.0, 10.0);
    }
    let centers = FixedCenters(vec![Vec2::ZERO; 10]);
    for _ in 0..100 {
        step(&mut state, &feel, &centers);
    }
    let worst = state
        .bodies
        .iter()
        .map(|b| b.pos.length())
        .fold(0.0f32, f32::max);
    assert!(worst < 0.01, "blocks failed to settle (worst offset {worst})");
    println!("✓ settle check passed (worst offset {worst:.5}px)");
}
