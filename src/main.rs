//! Tank Duel entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, KeyboardEvent};

    use tank_duel::clock::{BrowserClock, Clock};
    use tank_duel::consts::*;
    use tank_duel::renderer::CanvasRenderer;
    use tank_duel::sim::{GameState, InputEvent, Outcome, handle_input, tick};
    use tank_duel::{GameConfig, StartupError};

    const CANVAS_ID: &str = "game-canvas";
    const POWER_BAR_ID: &str = "power-bar-fill";
    const INDICATOR_ID: &str = "active-tank-indicator";
    const GAME_OVER_ID: &str = "game-over-message";
    const WINNER_TEXT_ID: &str = "winner-text";
    const RESTART_ID: &str = "restart-button";

    /// HUD elements outside the canvas
    struct Hud {
        power_bar: HtmlElement,
        indicator: HtmlElement,
        game_over: HtmlElement,
        winner_text: HtmlElement,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: BrowserClock,
        renderer: CanvasRenderer,
        hud: Hud,
        accumulator: f32,
        last_time: f64,
        /// Whether an animation frame is scheduled
        running: bool,
    }

    impl Game {
        fn input(&mut self, event: InputEvent) {
            handle_input(&mut self.state, event, &self.clock);
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS && !self.state.is_over() {
                tick(&mut self.state);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }

            // Entities are drawn from the snapshot; events only feed the log
            for event in self.state.drain_events() {
                log::trace!("{event:?}");
            }
        }

        /// Render the current frame
        fn render(&self) {
            let snap = self.state.snapshot(self.clock.now_ms());
            if let Err(e) = self.renderer.render(&snap) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let snap = self.state.snapshot(self.clock.now_ms());

            let _ = self
                .hud
                .power_bar
                .style()
                .set_property("width", &format!("{}%", snap.charge_ratio * 100.0));

            let indicator = if snap.active_tank_alive {
                snap.active_tank_id.to_string()
            } else {
                "-".to_string()
            };
            self.hud.indicator.set_text_content(Some(&indicator));
            let _ = self.hud.indicator.set_attribute(
                "class",
                &format!("tank-indicator tank-{}-indicator", snap.active_tank_id),
            );

            match snap.outcome {
                Some(outcome) => {
                    let text = match outcome {
                        Outcome::Winner(id) => format!("Player {id} Wins!"),
                        Outcome::Draw => "It's a Draw!".to_string(),
                    };
                    self.hud.winner_text.set_text_content(Some(&text));
                    let _ = self.hud.game_over.style().set_property("display", "block");
                }
                None => {
                    let _ = self.hud.game_over.style().set_property("display", "none");
                }
            }
        }
    }

    fn element<T: JsCast>(
        document: &Document,
        id: &'static str,
        expected: &'static str,
    ) -> Result<T, StartupError> {
        document
            .get_element_by_id(id)
            .ok_or(StartupError::MissingElement(id))?
            .dyn_into::<T>()
            .map_err(|_| StartupError::WrongElementType { id, expected })
    }

    pub fn run() -> Result<(), StartupError> {
        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoDocument)?;

        // Validate every collaborator before touching game state
        let canvas: HtmlCanvasElement = element(&document, CANVAS_ID, "canvas")?;
        let hud = Hud {
            power_bar: element(&document, POWER_BAR_ID, "html element")?,
            indicator: element(&document, INDICATOR_ID, "html element")?,
            game_over: element(&document, GAME_OVER_ID, "html element")?,
            winner_text: element(&document, WINNER_TEXT_ID, "html element")?,
        };
        let restart: HtmlElement = element(&document, RESTART_ID, "html element")?;
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<web_sys::CanvasRenderingContext2d>().ok())
            .ok_or(StartupError::NoCanvasContext(CANVAS_ID))?;

        let config = GameConfig::load();
        config.validate()?;
        canvas.set_width(config.width as u32);
        canvas.set_height(config.height as u32);

        let seed = js_sys::Date::now() as u64;
        let renderer = CanvasRenderer::new(ctx, &config);
        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(seed, config),
            clock: BrowserClock,
            renderer,
            hud,
            accumulator: 0.0,
            last_time: 0.0,
            running: false,
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_restart_button(&restart, game.clone());
        start_loop(game);

        log::info!("Tank Duel running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let input = match event.key().as_str() {
                    "ArrowLeft" => InputEvent::AimLeft,
                    "ArrowRight" => InputEvent::AimRight,
                    " " => InputEvent::ChargeStart,
                    "t" | "T" => InputEvent::SwitchTurn,
                    _ => return,
                };
                event.prevent_default();
                game.borrow_mut().input(input);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " {
                    event.prevent_default();
                    game.borrow_mut().input(InputEvent::ChargeRelease);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(button: &HtmlElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            game.borrow_mut().input(InputEvent::Reset);
            start_loop(game.clone());
        });
        let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Schedule the loop unless it is already running
    fn start_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.running {
                return;
            }
            g.running = true;
            g.last_time = 0.0;
            g.accumulator = 0.0;
        }
        request_animation_frame(game);
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
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
            g.update_hud();

            // Stop scheduling once the match is decided; reset re-arms
            if g.state.is_over() {
                g.running = false;
            }
            g.running
        };

        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
    }
    log::info!("Tank Duel starting...");

    if let Err(e) = wasm_game::run() {
        log::error!("Cannot start game: {e}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tank Duel (native) starting...");
    log::info!("Native mode has no renderer - run with `trunk serve` for the web version");

    headless_duel();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a scripted exchange of fixed shots and print the result
#[cfg(not(target_arch = "wasm32"))]
fn headless_duel() {
    use tank_duel::{GameConfig, normalize_degrees};
    use tank_duel::clock::ManualClock;
    use tank_duel::sim::{GameState, InputEvent, handle_input, tick};

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut state = GameState::new(seed, GameConfig::load());
    let clock = ManualClock::new(0.0);
    log::info!("Headless duel with seed {seed}");

    // (aim presses, hold ms) per shot, alternating tanks
    let script: [(i32, f64); 6] = [(0, 900.0), (0, 900.0), (1, 1100.0), (-1, 1100.0), (2, 1300.0), (-2, 1300.0)];

    for (presses, hold_ms) in script {
        if state.is_over() {
            break;
        }
        let aim = if presses >= 0 {
            InputEvent::AimRight
        } else {
            InputEvent::AimLeft
        };
        for _ in 0..presses.unsigned_abs() {
            handle_input(&mut state, aim, &clock);
        }
        handle_input(&mut state, InputEvent::ChargeStart, &clock);
        clock.advance(hold_ms);
        handle_input(&mut state, InputEvent::ChargeRelease, &clock);

        while !state.bullets.is_empty() && !state.is_over() {
            tick(&mut state);
        }
        for event in state.drain_events() {
            log::debug!("{event:?}");
        }
        handle_input(&mut state, InputEvent::SwitchTurn, &clock);
    }

    for tank in &state.tanks {
        println!(
            "Tank {}: health {}, turret at {:.0} deg",
            tank.id,
            tank.display_health(),
            normalize_degrees(tank.turret_angle)
        );
    }
    match state.outcome {
        Some(outcome) => println!("Result: {outcome:?}"),
        None => println!("Result: undecided after {} ticks", state.time_ticks),
    }
}
