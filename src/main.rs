//! Timber Rally entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlElement, HtmlInputElement, HtmlSelectElement, KeyboardEvent, MouseEvent, WheelEvent};

    use glam::Vec2;
    use timber_rally::consts::*;
    use timber_rally::hud;
    use timber_rally::input::InputAggregator;
    use timber_rally::leaderboard::{Leaderboard, format_elapsed};
    use timber_rally::sim::{GameEvent, GamePhase, GameState, tick};

    // JS bindings for gamepad haptics and the render bridge
    #[wasm_bindgen(inline_js = "
        export function trigger_rumble(duration_ms, strong, weak) {
            const pads = navigator.getGamepads ? navigator.getGamepads() : [];
            for (const pad of pads) {
                if (pad && pad.vibrationActuator) {
                    pad.vibrationActuator.playEffect('dual-rumble', {
                        duration: duration_ms,
                        strongMagnitude: strong,
                        weakMagnitude: weak,
                    }).catch(() => {});
                }
            }
        }

        export function push_frame(json) {
            if (window.renderFrame) {
                window.renderFrame(json);
            }
        }
    ")]
    extern "C" {
        fn trigger_rumble(duration_ms: f64, strong: f64, weak: f64);
        fn push_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        aggregator: InputAggregator,
        leaderboard: Leaderboard,
        player_name: String,
        accumulator: f32,
        last_time: f64,
        // Mouse drag state for camera orbit
        dragging: bool,
        last_mouse: (f32, f32),
        // One-time game-over handling latch
        game_over_handled: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                aggregator: InputAggregator::new(),
                leaderboard: Leaderboard::load(),
                player_name: String::from("Anonymous"),
                accumulator: 0.0,
                last_time: 0.0,
                dragging: false,
                last_mouse: (0.0, 0.0),
                game_over_handled: false,
            }
        }

        /// Run simulation ticks, reacting to the events they emit
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            self.poll_gamepad();

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.aggregator.tick_input();
                let events = tick(&mut self.state, &input, SIM_DT);
                self.aggregator.end_tick();
                self.accumulator -= SIM_DT;
                substeps += 1;

                for event in &events {
                    match event {
                        GameEvent::RockHit { .. } => {
                            trigger_rumble(300.0, 0.8, 0.4);
                        }
                        GameEvent::LevelComplete { level } => {
                            log::info!("Reached level {level}");
                        }
                        GameEvent::GameOver => self.handle_game_over(),
                        _ => {}
                    }
                }
            }
        }

        /// Submit the run and show the summary panel (once per run)
        fn handle_game_over(&mut self) {
            if self.game_over_handled {
                return;
            }
            self.game_over_handled = true;

            let elapsed = self.state.elapsed_secs as u32;
            self.leaderboard.submit(
                &self.player_name,
                self.state.score,
                self.state.max_score,
                elapsed,
                js_sys::Date::now(),
            );
            self.leaderboard.save();

            let document = web_sys::window().unwrap().document().unwrap();
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "");
            }
            if let Some(el) = document.get_element_by_id("final-summary") {
                el.set_text_content(Some(&hud::game_over_summary(&self.player_name, &self.state)));
            }
            if let Some(el) = document.get_element_by_id("final-time") {
                el.set_text_content(Some(&format!("Time: {}", format_elapsed(elapsed))));
            }
            if let Some(el) = document.get_element_by_id("final-message") {
                el.set_text_content(Some(hud::game_over_message(self.state.seed)));
            }
            render_leaderboard(&self.leaderboard);
        }

        /// Read the first connected standard-mapping gamepad, if any
        fn poll_gamepad(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Ok(pads) = window.navigator().get_gamepads() else {
                return;
            };

            for pad in pads.iter() {
                let Ok(pad) = pad.dyn_into::<web_sys::Gamepad>() else {
                    continue;
                };
                let axes: Vec<f64> = pad
                    .axes()
                    .iter()
                    .map(|a| a.as_f64().unwrap_or(0.0))
                    .collect();
                let buttons = pad.buttons();
                self.aggregator.gamepad_frame(&axes, |i| {
                    buttons
                        .get(i)
                        .dyn_into::<web_sys::GamepadButton>()
                        .map(|b| b.pressed())
                        .unwrap_or(false)
                });
                return;
            }
            self.aggregator.clear_gamepad();
        }

        /// Push the frame to the external renderer
        fn render(&self) {
            if let Ok(json) = serde_json::to_string(&self.state.render_view()) {
                push_frame(&json);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            if let Some(el) = document.get_element_by_id("speed") {
                el.set_text_content(Some(&hud::speed_label(&self.state)));
            }
            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&hud::score_label(&self.state)));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&hud::level_label(&self.state)));
            }
            if let Some(el) = document.get_element_by_id("timer") {
                el.set_text_content(Some(&hud::time_label(&self.state)));
            }
            if let Some(el) = document.get_element_by_id("boostFill") {
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let _ = el
                        .style()
                        .set_property("width", &format!("{}%", hud::boost_percent(&self.state)));
                }
            }

            // Center-screen overlay (countdown, level banner, pause)
            if let Some(el) = document.get_element_by_id("overlay") {
                match hud::overlay_text(&self.state) {
                    Some(text) => {
                        el.set_text_content(Some(&text));
                        let _ = el.set_attribute("class", "overlay");
                    }
                    None => {
                        let _ = el.set_attribute("class", "overlay hidden");
                    }
                }
            }
        }

        /// Reset for a fresh run with the same player
        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed);
            self.accumulator = 0.0;
            self.aggregator = InputAggregator::new();
            self.game_over_handled = false;

            let document = web_sys::window().unwrap().document().unwrap();
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }

    /// Rebuild the leaderboard table rows
    fn render_leaderboard(board: &Leaderboard) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(list) = document.get_element_by_id("leaderboard-list") else {
            return;
        };
        list.set_text_content(None);
        for (i, entry) in board.entries.iter().enumerate() {
            if let Ok(row) = document.create_element("li") {
                row.set_text_content(Some(&format!(
                    "{}. {} - {} / {} ({})",
                    i + 1,
                    entry.name,
                    entry.score,
                    entry.max_score,
                    format_elapsed(entry.elapsed_secs),
                )));
                let _ = list.append_child(&row);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Timber Rally starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Offer returning players their previous name
        populate_name_picker(&game.borrow().leaderboard);
        render_leaderboard(&game.borrow().leaderboard);

        setup_start_screen(game.clone());
        setup_input_handlers(game.clone());
        setup_menu_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Timber Rally running!");
    }

    /// Fill the start-screen dropdown with known player names
    fn populate_name_picker(board: &Leaderboard) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(select) = document
            .get_element_by_id("player-select")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };
        for name in board.player_names() {
            if let Ok(option) = document.create_element("option") {
                option.set_text_content(Some(&name));
                let _ = option.set_attribute("value", &name);
                let _ = select.append_child(&option);
            }
        }
    }

    fn setup_start_screen(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("play-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let document = web_sys::window().unwrap().document().unwrap();

                // Typed name wins over the dropdown pick
                let typed = document
                    .get_element_by_id("player-name")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|el| el.value().trim().to_string())
                    .unwrap_or_default();
                let picked = document
                    .get_element_by_id("player-select")
                    .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
                    .map(|el| el.value())
                    .unwrap_or_default();

                let name = if !typed.is_empty() {
                    typed
                } else if !picked.is_empty() {
                    picked
                } else {
                    String::from("Anonymous")
                };

                let mut g = game.borrow_mut();
                g.player_name = name;
                log::info!("Starting run for {}", g.player_name);

                if let Some(el) = document.get_element_by_id("start-screen") {
                    let _ = el.set_attribute("class", "hidden");
                }
                if let Some(el) = document.get_element_by_id("hud") {
                    let _ = el.set_attribute("class", "");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Keyboard down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let code = event.code();
                match code.as_str() {
                    "Escape" => g.aggregator.request_pause(),
                    "KeyR" => g.aggregator.request_camera_reset(),
                    _ => {
                        if g.aggregator.key_event(&code, true) {
                            event.prevent_default();
                        }
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().aggregator.key_event(&event.code(), false);
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse drag orbits the camera
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.dragging = true;
                g.last_mouse = (event.client_x() as f32, event.client_y() as f32);
            });
            let _ = document
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                if !g.dragging {
                    return;
                }
                let (x, y) = (event.client_x() as f32, event.client_y() as f32);
                let (lx, ly) = g.last_mouse;
                g.last_mouse = (x, y);
                g.aggregator
                    .add_orbit(Vec2::new((x - lx) * 0.01, (y - ly) * 0.01));
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().dragging = false;
            });
            let _ = document
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel zooms
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: WheelEvent| {
                event.prevent_default();
                game.borrow_mut()
                    .aggregator
                    .add_zoom(event.delta_y() as f32 * 0.01);
            });
            let _ = document
                .add_event_listener_with_callback("wheel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().aggregator.request_pause();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("respawn-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().aggregator.request_respawn();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Play again keeps the current player
        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Quit mid-run: bank a personal best, then back to the start screen
        if let Some(btn) = document.get_element_by_id("quit-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                {
                    let mut g = game.borrow_mut();
                    if g.leaderboard.is_personal_best(&g.player_name, g.state.score) {
                        let elapsed = g.state.elapsed_secs as u32;
                        let name = g.player_name.clone();
                        let (score, max_score) = (g.state.score, g.state.max_score);
                        g.leaderboard
                            .submit(&name, score, max_score, elapsed, js_sys::Date::now());
                        g.leaderboard.save();
                    }
                }
                if let Some(window) = web_sys::window() {
                    let _ = window.location().reload();
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.aggregator.request_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.aggregator.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use timber_rally::consts::SIM_DT;
    use timber_rally::sim::{GameState, TickInput, tick};

    env_logger::init();
    log::info!("Timber Rally (native) starting...");
    log::info!("Native mode has no renderer - run with `trunk serve` for the web version");

    // Drive a short headless run as a smoke check
    let mut state = GameState::new(42);
    let input = TickInput {
        throttle: true,
        ..TickInput::default()
    };
    for _ in 0..600 {
        tick(&mut state, &input, SIM_DT);
    }
    log::info!(
        "After 10s headless: phase {:?}, speed {:.2}, score {}",
        state.phase,
        state.vehicle.speed,
        state.score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
