//! Bubble Fidget entry point
//!
//! On wasm32 this drives a `<canvas id="canvas">` through requestAnimationFrame.
//! Natively it runs a scripted headless session and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

    use bubble_fidget::platform::FrameHost;
    use bubble_fidget::renderer::{DrawCircle, css_color};
    use bubble_fidget::{BubbleSettings, Engine};

    /// Page state shared between the frame callback and event listeners
    struct App {
        engine: Engine,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    /// requestAnimationFrame, with each callback holding only a weak handle
    /// so a torn-down app is never resurrected
    struct RafHost {
        app: Weak<RefCell<App>>,
    }

    impl FrameHost for RafHost {
        fn request_frame(&mut self) -> i32 {
            let Some(window) = web_sys::window() else {
                return 0;
            };
            let app = self.app.clone();
            let closure = Closure::once(move |time: f64| on_animation_frame(app, time));
            let handle = window
                .request_animation_frame(closure.as_ref().unchecked_ref())
                .unwrap_or(0);
            closure.forget();
            handle
        }

        fn cancel_frame(&mut self, handle: i32) {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }

    fn on_animation_frame(app: Weak<RefCell<App>>, time: f64) {
        let Some(app) = app.upgrade() else {
            return;
        };
        let mut host = RafHost {
            app: Rc::downgrade(&app),
        };
        let mut guard = app.borrow_mut();
        let App { engine, canvas, ctx } = &mut *guard;
        if let Some(circles) = engine.on_frame(&mut host, time) {
            paint(ctx, canvas, circles);
        }
    }

    fn paint(ctx: &CanvasRenderingContext2d, canvas: &HtmlCanvasElement, circles: &[DrawCircle]) {
        ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        for circle in circles {
            let color = css_color(circle.color);
            ctx.save();
            ctx.set_global_alpha(circle.alpha as f64);
            ctx.set_fill_style_str(&color);
            if circle.is_glow() {
                ctx.set_shadow_color(&color);
                ctx.set_shadow_blur(circle.glow as f64);
            }
            ctx.begin_path();
            let _ = ctx.arc(
                circle.x as f64,
                circle.y as f64,
                circle.radius as f64,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
            ctx.restore();
        }
    }

    /// Read `data-settings` off the canvas, falling back to defaults
    fn read_settings(canvas: &HtmlCanvasElement) -> BubbleSettings {
        let Some(json) = canvas.get_attribute("data-settings") else {
            return BubbleSettings::default();
        };
        BubbleSettings::from_json(&json).unwrap_or_else(|err| {
            log::warn!("Ignoring invalid data-settings ({}), using defaults", err);
            BubbleSettings::default()
        })
    }

    /// Match the backing store to the laid-out size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (f32, f32) {
        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width as f32, height as f32)
    }

    fn pointer_listener(
        target: &web_sys::EventTarget,
        kind: &str,
        app: &Rc<RefCell<App>>,
        handler: fn(&mut Engine, &MouseEvent),
    ) -> Result<(), JsValue> {
        let app = Rc::downgrade(app);
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if let Some(app) = app.upgrade() {
                handler(&mut app.borrow_mut().engine, &event);
            }
        });
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_input_handlers(app: &Rc<RefCell<App>>) -> Result<(), JsValue> {
        let canvas = app.borrow().canvas.clone();

        pointer_listener(&canvas, "mousedown", app, |engine, event| {
            engine.pointer_down(event.offset_x() as f32, event.offset_y() as f32, event.time_stamp());
        })?;
        pointer_listener(&canvas, "mousemove", app, |engine, event| {
            engine.pointer_move(event.offset_x() as f32, event.offset_y() as f32);
        })?;
        pointer_listener(&canvas, "mouseup", app, |engine, _| engine.pointer_up())?;
        pointer_listener(&canvas, "mouseleave", app, |engine, _| engine.pointer_leave())?;

        // Window resize
        let window = web_sys::window().ok_or("no window")?;
        let weak = Rc::downgrade(app);
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if let Some(app) = weak.upgrade() {
                let mut app = app.borrow_mut();
                let (width, height) = fit_canvas(&app.canvas);
                app.engine.resize(width, height);
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();

        Ok(())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Bubble Fidget starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let (width, height) = fit_canvas(&canvas);
        let settings = read_settings(&canvas);
        let seed = js_sys::Date::now() as u64;

        let app = Rc::new(RefCell::new(App {
            engine: Engine::new(seed, width, height, settings),
            canvas,
            ctx,
        }));
        setup_input_handlers(&app)?;

        APP.with(|slot| *slot.borrow_mut() = Some(app));
        start();
        Ok(())
    }

    fn with_app(f: impl FnOnce(&Rc<RefCell<App>>)) {
        APP.with(|slot| {
            if let Some(app) = slot.borrow().as_ref() {
                f(app);
            }
        });
    }

    /// Begin (or resume) animating
    #[wasm_bindgen]
    pub fn start() {
        with_app(|app| {
            let mut host = RafHost {
                app: Rc::downgrade(app),
            };
            app.borrow_mut().engine.start(&mut host);
        });
    }

    /// Cancel the pending frame and any running gesture timers
    #[wasm_bindgen]
    pub fn stop() {
        with_app(|app| {
            let mut host = RafHost {
                app: Rc::downgrade(app),
            };
            app.borrow_mut().engine.stop(&mut host);
        });
    }

    /// Apply a new configuration record (same JSON shape as `data-settings`)
    #[wasm_bindgen]
    pub fn configure(json: &str) -> Result<(), JsValue> {
        let settings = BubbleSettings::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?;
        with_app(|app| app.borrow_mut().engine.set_settings(settings));
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bubble Fidget (native) starting headless session...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use bubble_fidget::platform::FrameHost;
    use bubble_fidget::{BubbleSettings, Engine};
    use glam::Vec2;

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Stand-in for a display's frame callback
    #[derive(Default)]
    struct LoopHost {
        next_handle: i32,
        pending: Option<i32>,
    }

    impl FrameHost for LoopHost {
        fn request_frame(&mut self) -> i32 {
            self.next_handle += 1;
            self.pending = Some(self.next_handle);
            self.next_handle
        }

        fn cancel_frame(&mut self, handle: i32) {
            if self.pending == Some(handle) {
                self.pending = None;
            }
        }
    }

    struct Session {
        engine: Engine,
        host: LoopHost,
        time_ms: f64,
    }

    impl Session {
        fn frames(&mut self, count: usize) {
            for _ in 0..count {
                if self.host.pending.take().is_none() {
                    return;
                }
                self.time_ms += FRAME_MS;
                self.engine.on_frame(&mut self.host, self.time_ms);
            }
        }

        fn click(&mut self, at: Vec2) {
            self.engine.pointer_down(at.x, at.y, self.time_ms);
            self.engine.pointer_up();
        }

        /// First point on a coarse grid with no bubble under it
        fn empty_spot(&self) -> Vec2 {
            let world = self.engine.world();
            (1..8)
                .flat_map(|i| (1..6).map(move |j| Vec2::new(i as f32 * 100.0, j as f32 * 100.0)))
                .find(|&p| world.bubble_at(p).is_none())
                .unwrap_or(Vec2::new(WIDTH / 2.0, 40.0))
        }

        fn intact_bubble(&self) -> Option<Vec2> {
            self.engine
                .world()
                .bubbles
                .iter()
                .find(|b| b.is_intact())
                .map(|b| b.pos)
        }

        fn report(&self, stage: &str) {
            let world = self.engine.world();
            let intact = world.bubbles.iter().filter(|b| b.is_intact()).count();
            log::info!(
                "[{:>6}] frame {:>5}: {} bubbles ({} intact), {} visible dots, {} primitives",
                stage,
                world.time_ticks,
                world.bubbles.len(),
                intact,
                world.visible_dots(),
                self.engine.draw_list().len()
            );
        }
    }

    pub fn run() {
        let seed = 2024;
        let mut session = Session {
            engine: Engine::new(seed, WIDTH, HEIGHT, BubbleSettings::default()),
            host: LoopHost::default(),
            time_ms: 0.0,
        };
        session.engine.start(&mut session.host);

        session.frames(60);
        session.report("settle");

        let spot = session.empty_spot();
        session.click(spot);
        session.frames(30);
        session.report("blow");

        if let Some(target) = session.intact_bubble() {
            session.click(target);
            session.frames(30);
        }
        session.report("pop");

        if let Some(target) = session.intact_bubble() {
            session
                .engine
                .pointer_down(target.x, target.y, session.time_ms);
            for step in 1..=20 {
                session
                    .engine
                    .pointer_move(target.x + step as f32 * 6.0, target.y - step as f32 * 3.0);
                session.frames(1);
            }
            session.engine.pointer_up();
            session.frames(60);
        }
        session.report("throw");

        let spot = session.empty_spot();
        session.click(spot);
        session.frames(5);
        session.engine.pointer_down(spot.x, spot.y, session.time_ms);
        session.frames(60);
        session.engine.pointer_up();
        session.report("spawn");

        session.frames(600);
        session.report("fade");

        session.engine.stop(&mut session.host);
        session.frames(10);
        session.report("stop");
    }
}
