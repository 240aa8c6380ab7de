//! Road Rivals entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

    use road_rivals::audio::{AudioManager, SoundEffect};
    use road_rivals::consts::*;
    use road_rivals::sim::{
        GameEvent, GameState, PlayerId, resize, restart, restart_with_config, tick,
    };
    use road_rivals::{KeyState, MatchHistory, Settings};

    /// Colors for traffic skins, indexed by `TrafficCar::skin`
    const TRAFFIC_COLORS: [&str; 4] = ["#9e9e9e", "#fdd835", "#8d6e63", "#26a69a"];

    /// Game instance holding all state
    struct Game {
        state: GameState,
        ctx: CanvasRenderingContext2d,
        keys: KeyState,
        settings: Settings,
        audio: AudioManager,
        history: MatchHistory,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.settings.bindings.snapshot(&self.keys);
                let events = tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;
                self.handle_events(&events);

                if self.state.is_finished() {
                    self.accumulator = 0.0;
                    break;
                }
            }
        }

        /// Route simulation events to audio, HUD and history
        fn handle_events(&mut self, events: &[GameEvent]) {
            for event in events {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
                match event {
                    GameEvent::ScoreChanged { level, lives } => update_hud(*level, *lives),
                    GameEvent::GameOver { outcome } => {
                        self.history.record(
                            *outcome,
                            self.state.level,
                            self.state.lives,
                            js_sys::Date::now(),
                        );
                        self.history.save();
                        show_message(Some(&format!(
                            "{} {} | Enter: rematch, V: {} rules",
                            outcome.message(),
                            self.history.summary(),
                            self.settings.variant.next().as_str()
                        )));
                    }
                    _ => {}
                }
            }
        }

        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            let events = restart(&mut self.state, seed);
            self.keys.clear();
            self.accumulator = 0.0;
            show_message(None);
            self.handle_events(&events);
        }

        /// Switch to the next rule set, remember it and start a fresh game
        fn switch_variant(&mut self) {
            let variant = self.settings.cycle_variant();
            self.settings.save();
            log::info!("Switched to {} rules", variant.as_str());

            let seed = js_sys::Date::now() as u64;
            let events = restart_with_config(&mut self.state, seed, self.settings.sim_config());
            self.keys.clear();
            self.accumulator = 0.0;
            show_message(None);
            self.handle_events(&events);
        }

        /// Draw the current frame
        fn render(&self) {
            let ctx = &self.ctx;
            let geo = &self.state.geometry;
            let (w, h) = (geo.width() as f64, geo.height() as f64);
            let road_x = geo.road_x as f64;
            let road_w = geo.road_width as f64;

            ctx.set_fill_style_str("#2e7d32");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str("#333333");
            ctx.fill_rect(road_x, 0.0, road_w, h);

            // Lane markings scroll with the road
            ctx.set_stroke_style_str("#ffffff");
            ctx.set_line_width(4.0);
            let dash = js_sys::Array::of2(&JsValue::from_f64(30.0), &JsValue::from_f64(20.0));
            let _ = ctx.set_line_dash(&dash);
            ctx.set_line_dash_offset(-self.state.scroll as f64);
            for lane in 1..geo.lane_count {
                let x = road_x + geo.lane_width as f64 * lane as f64;
                ctx.begin_path();
                ctx.move_to(x, 0.0);
                ctx.line_to(x, h);
                ctx.stroke();
            }
            let _ = ctx.set_line_dash(&js_sys::Array::new());

            let finish_y = self.state.finish_line_y() as f64;
            if finish_y > -20.0 && finish_y < h {
                ctx.set_fill_style_str("#ffffff");
                ctx.fill_rect(road_x, finish_y, road_w, 20.0);
            }

            for car in &self.state.traffic {
                let color = TRAFFIC_COLORS[car.skin as usize % TRAFFIC_COLORS.len()];
                fill_rect(ctx, color, &car.rect);
            }
            for player in &self.state.players {
                let color = match player.id {
                    PlayerId::Blue => "#1e88e5",
                    PlayerId::Red => "#e53935",
                };
                fill_rect(ctx, color, &player.rect);
            }
        }
    }

    fn fill_rect(ctx: &CanvasRenderingContext2d, color: &str, rect: &road_rivals::sim::Rect) {
        ctx.set_fill_style_str(color);
        ctx.fill_rect(
            rect.pos.x as f64,
            rect.pos.y as f64,
            rect.size.x as f64,
            rect.size.y as f64,
        );
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    /// Write level and lives into the HUD
    fn update_hud(level: u32, lives: [u32; 2]) {
        let Some(document) = document() else { return };
        let fields = [
            ("level", level),
            ("blueLives", lives[PlayerId::Blue.index()]),
            ("redLives", lives[PlayerId::Red.index()]),
        ];
        for (id, value) in fields {
            if let Some(el) = document.get_element_by_id(id) {
                el.set_text_content(Some(&value.to_string()));
            }
        }
    }

    /// Show the end-of-match banner, or hide it with `None`
    fn show_message(text: Option<&str>) {
        let Some(document) = document() else { return };
        let display = if text.is_some() { "block" } else { "none" };
        if let Some(el) = document.get_element_by_id("message") {
            if let Some(text) = text {
                if let Some(label) = document.get_element_by_id("message-text") {
                    label.set_text_content(Some(text));
                }
            }
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let _ = el.style().set_property("display", display);
            }
        }
    }

    /// `?variant=` from the page URL, if present
    fn variant_from_query(window: &web_sys::Window) -> Option<String> {
        let search = window.location().search().ok()?;
        web_sys::UrlSearchParams::new_with_str(&search)
            .ok()?
            .get("variant")
    }

    fn viewport_size() -> (f32, f32) {
        let Some(window) = web_sys::window() else {
            return (800.0, 600.0);
        };
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        (w as f32, h as f32)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Road Rivals starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let (width, height) = viewport_size();
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let mut settings = Settings::load();
        if let Some(name) = variant_from_query(&window) {
            if settings.select_variant(&name) {
                settings.save();
            }
        }
        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, settings.sim_config(), width, height);
        log::info!(
            "Game initialized with seed: {} ({} rules)",
            seed,
            settings.variant.as_str()
        );
        update_hud(state.level, state.lives);
        show_message(None);

        let game = Rc::new(RefCell::new(Game {
            state,
            ctx,
            keys: KeyState::new(),
            audio: AudioManager::new(
                settings.effective_volume(),
                settings.effective_music_volume(),
            ),
            settings,
            history: MatchHistory::load(),
            accumulator: 0.0,
            last_time: 0.0,
        }));

        setup_keyboard(game.clone());
        setup_resize(game.clone(), canvas);
        setup_restart_button(game.clone());
        setup_focus(game.clone());

        request_animation_frame(game);
        log::info!("Road Rivals running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.settings.bindings.is_bound(&key) {
                    event.prevent_default();
                }
                // Browsers only allow audio after a user gesture
                g.audio.start_music();
                if g.state.is_finished() {
                    match key.as_str() {
                        "Enter" => {
                            g.restart();
                            return;
                        }
                        "v" | "V" => {
                            g.switch_variant();
                            return;
                        }
                        _ => {}
                    }
                }
                g.keys.press(&key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                game.borrow_mut().keys.release(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>, canvas: HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (w, h) = viewport_size();
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            resize(&mut game.borrow_mut().state, w, h);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No #restart-btn in page, restart with Enter only");
        }
    }

    fn setup_focus(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Window blur: keyup events will be lost, so release everything
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys.clear();
                if g.settings.mute_on_blur {
                    g.audio.set_suspended(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_suspended(false);
            });
            let _ = window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Road Rivals (native) starting...");
    log::info!("Native mode runs a headless autopilot match - run with `trunk serve` to play");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let mut settings = road_rivals::Settings::load();
    if let Some(name) = args.next() {
        if settings.select_variant(&name) {
            settings.save();
        }
    }

    headless::run(seed, &settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use road_rivals::sim::{Controls, GameEvent, GameState, PlayerId, TickInput, tick};
    use road_rivals::{MatchHistory, Settings};

    /// Give up on a match that never ends
    const MAX_TICKS: u64 = 60 * 60 * 10;
    /// How far ahead the autopilot looks for traffic
    const LOOKAHEAD: f32 = 220.0;

    pub fn run(seed: u64, settings: &Settings) {
        let mut state = GameState::new(seed, settings.sim_config(), 800.0, 600.0);
        let mut history = MatchHistory::load();
        log::info!(
            "Seed {} ({} rules), {} traffic cars",
            seed,
            settings.variant.as_str(),
            state.traffic.len()
        );

        while !state.is_finished() && state.time_ticks < MAX_TICKS {
            let input = autopilot(&state);
            for event in tick(&mut state, &input) {
                match event {
                    GameEvent::LifeLost { player, cause } => {
                        log::info!(
                            "tick {}: {} lost a life ({:?})",
                            state.time_ticks,
                            player.as_str(),
                            cause
                        )
                    }
                    GameEvent::GameOver { outcome } => {
                        history.record(outcome, state.level, state.lives, 0.0);
                        log::info!("tick {}: {}", state.time_ticks, outcome.message());
                    }
                    other => log::debug!("tick {}: {:?}", state.time_ticks, other),
                }
            }
        }

        if !state.is_finished() {
            log::warn!("Stopped after {} ticks without a result", MAX_TICKS);
        }
        println!(
            "Level {} reached, lives Blue {} / Red {}. {}",
            state.level,
            state.lives_of(PlayerId::Blue),
            state.lives_of(PlayerId::Red),
            history.summary()
        );
        history.save();
    }

    /// Drive forward, swerve away from traffic ahead, stay on the road
    fn autopilot(state: &GameState) -> TickInput {
        let geo = &state.geometry;
        let step = state.config.player_step;
        let road_center = geo.road_x + geo.road_width / 2.0;

        TickInput {
            players: PlayerId::ALL.map(|id| {
                let me = state.player(id).rect;
                let threatened = state.traffic.iter().any(|car| {
                    car.rect.right() > me.left() - step
                        && car.rect.left() < me.right() + step
                        && car.rect.bottom() > me.top() - LOOKAHEAD
                        && car.rect.top() < me.bottom()
                });

                let mut controls = Controls {
                    up: !threatened,
                    ..Controls::default()
                };
                if threatened {
                    let can_left = me.left() - step >= geo.left_edge();
                    let can_right = me.right() + step <= geo.right_edge();
                    let prefer_right = me.pos.x + me.size.x / 2.0 < road_center;
                    controls.right = can_right && (prefer_right || !can_left);
                    controls.left = can_left && !controls.right;
                    controls.down = me.bottom() + step < geo.height();
                }
                controls
            }),
        }
    }
}
