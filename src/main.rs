//! Promille Racer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use promille_racer::audio::{AudioManager, SoundEffect};
    use promille_racer::renderer::{CanvasRenderer, DomOverlay};
    use promille_racer::sim::{
        Command, Direction, GameEvent, GameMode, Session, Steer, TickInput, Viewport,
    };
    use promille_racer::{Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session,
        renderer: CanvasRenderer,
        overlay: DomOverlay,
        audio: AudioManager,
        settings: Settings,
        /// Input gathered since the last frame
        input: TickInput,
        viewport: Viewport,
    }

    impl Game {
        fn command(&mut self, command: Command) {
            let to_menu = command == Command::ReturnToMenu;
            self.overlay.show_menu(to_menu);
            if !to_menu {
                // The canvas only has its real size once the game screen shows
                self.sync_viewport();
            }

            let seed = js_sys::Date::now() as u64;
            self.session.handle(command, seed);
            self.input = TickInput::default();
            if !to_menu {
                self.audio.resume();
                self.audio.play(SoundEffect::Start);
            }
        }

        fn mode(&self) -> Option<GameMode> {
            self.session.game().map(|g| g.mode)
        }

        fn sync_viewport(&mut self) {
            let (w, h) = self.renderer.fit_to_display();
            let viewport = Viewport::new(w, h);
            if viewport != self.viewport {
                self.viewport = viewport;
                self.session.resize(viewport);
            }
        }

        fn frame(&mut self, time: f64) {
            self.sync_viewport();

            let input = std::mem::take(&mut self.input);
            match self.session.frame(time, &input) {
                Some(frame) => {
                    self.renderer.draw(&frame, &self.settings);
                    self.overlay.update(&frame);
                }
                None => self.renderer.clear(),
            }

            let events = self.session.drain_events();
            for event in &events {
                match *event {
                    GameEvent::AnswerCorrect { explanation, .. } => {
                        self.overlay.show_explanation(true, explanation)
                    }
                    GameEvent::AnswerWrong { explanation, .. } => {
                        self.overlay.show_explanation(false, explanation)
                    }
                    _ => {}
                }
            }
            self.audio.play_events(&events);
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.audio.apply_settings(&self.settings);
            let muted = self.settings.muted;
            log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Promille Racer starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let renderer = CanvasRenderer::new(canvas.clone())?;
        let (w, h) = renderer.fit_to_display();
        let viewport = Viewport::new(w, h);
        let tuning = Tuning::default();
        let settings = Settings::default();

        let mut overlay = DomOverlay::new(document, tuning.max_promille);
        overlay.show_menu(true);

        let game = Rc::new(RefCell::new(Game {
            session: Session::new(tuning, viewport),
            renderer,
            overlay,
            audio: AudioManager::new(&settings),
            settings,
            input: TickInput::default(),
            viewport,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Promille Racer running!");
        Ok(())
    }

    /// Canvas-relative X of a touch
    fn touch_x(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<f32> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some((touch.client_x() as f64 - rect.left()) as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Click: jump to the lane under the cursor
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().input.steer = Some(Steer::ClickAt(event.offset_x() as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move: follow the cursor
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().input.steer = Some(Steer::Pointer(event.offset_x() as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap: jump to lane
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&canvas_clone, &event) {
                    game.borrow_mut().input.steer = Some(Steer::ClickAt(x));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Drag: follow the finger
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(x) = touch_x(&canvas_clone, &event) {
                    game.borrow_mut().input.steer = Some(Steer::Pointer(x));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => {
                        g.input.steer = Some(Steer::Nudge(Direction::Left));
                    }
                    "ArrowRight" | "d" | "D" => {
                        g.input.steer = Some(Steer::Nudge(Direction::Right));
                    }
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "m" | "M" => g.toggle_mute(),
                    _ => return,
                }
                event.prevent_default();
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("No window, game loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }

    fn on_click(id: &str, game: Rc<RefCell<Game>>, action: impl Fn(&mut Game) + 'static) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            action(&mut *game.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        on_click("start-btn", game.clone(), |g| g.command(Command::Start));
        on_click("restart-btn", game.clone(), |g| g.command(Command::Restart));
        on_click("menu-btn", game.clone(), |g| {
            g.command(Command::ReturnToMenu)
        });
        on_click("resume-btn", game.clone(), |g| g.input.pause = true);
        on_click("quiz-answer-0", game.clone(), |g| g.input.answer = Some(0));
        on_click("quiz-answer-1", game, |g| g.input.answer = Some(1));
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.mode() == Some(GameMode::Active) {
                        g.input.pause = true;
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
                if g.mode() == Some(GameMode::Active) {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Promille Racer (native) starting...");
    log::info!("Native mode runs a headless autopilot");
    log::info!("Use `trunk serve` for the web version");

    let options = <headless::Options as clap::Parser>::parse();
    if let Err(e) = headless::run(&options) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Headless autopilot run: drives a session with a simple lane-picking bot
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;
    use std::path::PathBuf;

    use clap::Parser;
    use promille_racer::Tuning;
    use promille_racer::consts::*;
    use promille_racer::sim::{
        Command, GameEvent, GameMode, GameState, Lane, Obstacle, Session, Steer, TickInput,
        Viewport,
    };

    /// Headless autopilot run
    #[derive(Debug, Parser, Clone)]
    #[command(
        name = "promille-racer",
        version,
        about = "Runs Promille Racer headless with a lane-picking autopilot"
    )]
    pub struct Options {
        /// Tuning JSON file (defaults to the built-in balance)
        pub tuning_path: Option<PathBuf>,

        /// Seed for the run
        #[arg(short, long, default_value_t = 1)]
        pub seed: u64,

        /// Seconds of game time to simulate at 60 Hz
        #[arg(short = 't', long, default_value_t = 120.0)]
        pub seconds: f32,
    }

    /// Lane with the most room ahead; bottles count as half a car
    pub fn safest_lane(game: &GameState) -> Lane {
        // Anything below the player's bottom edge is already behind
        let horizon = game.player.y + game.tuning.player_height;
        let danger = |lane: Lane| -> f32 {
            game.obstacles
                .iter()
                .filter(|obs| obs.pos().y < horizon)
                .filter(|obs| match obs {
                    Obstacle::Car { lane: l, .. } => *l == lane,
                    Obstacle::Bottle { pos, .. } => game.road.lane_at(pos.x) == lane,
                })
                .map(|obs| {
                    let weight = match obs {
                        Obstacle::Car { .. } => 1.0,
                        Obstacle::Bottle { .. } => 0.5,
                    };
                    weight * (obs.pos().y + game.tuning.car_height).max(1.0)
                })
                .fold(0.0, f32::max)
        };
        let current = game.player.lane(&game.road, &game.tuning);
        Lane::ALL
            .into_iter()
            .min_by(|a, b| {
                // Prefer staying put on ties
                let da = danger(*a) - if *a == current { 1.0 } else { 0.0 };
                let db = danger(*b) - if *b == current { 1.0 } else { 0.0 };
                da.total_cmp(&db)
            })
            .unwrap_or(current)
    }

    /// Pick this frame's input for the bot
    pub fn autopilot(game: &GameState) -> TickInput {
        if let Some(q) = game.quiz.pending() {
            // Gets every third question wrong
            let wrong = game.time_ticks % 3 == 0;
            let answer = if wrong { 1 - q.correct } else { q.correct };
            return TickInput {
                answer: Some(answer),
                ..Default::default()
            };
        }
        TickInput {
            steer: Some(Steer::Lane(safest_lane(game))),
            ..Default::default()
        }
    }

    pub fn run(options: &Options) -> Result<(), Box<dyn Error>> {
        let tuning = match &options.tuning_path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let tuning = Tuning::from_json(&json)?;
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            None => Tuning::default(),
        };

        let viewport = Viewport::new(DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
        let mut session = Session::new(tuning, viewport);
        session.handle(Command::Start, options.seed);

        let frame_ms = (REFERENCE_FRAME_DT * 1000.0) as f64;
        let frames = (options.seconds * REFERENCE_FPS) as u64;
        let mut cars_hit = 0;
        let mut quizzes = 0;

        for i in 0..frames {
            let input = match session.game() {
                Some(game) if game.mode != GameMode::GameOver => autopilot(game),
                _ => break,
            };
            session.frame(i as f64 * frame_ms, &input);
            for event in session.drain_events() {
                match event {
                    GameEvent::CarHit { .. } => cars_hit += 1,
                    GameEvent::QuizShown => quizzes += 1,
                    GameEvent::Milestone(units) => log::info!("Milestone: {} km", units),
                    _ => {}
                }
            }
        }

        if let Some(game) = session.game() {
            println!(
                "mode={:?} distance={:.2} lives={} promille={:.2} cars_hit={} quizzes={} cause={:?}",
                game.mode,
                game.player.distance,
                game.player.lives,
                game.player.promille,
                cars_hit,
                quizzes,
                game.game_over_cause,
            );
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> Result<Options, clap::Error> {
            let argv = std::iter::once("promille-racer").chain(args.iter().copied());
            Options::try_parse_from(argv)
        }

        #[test]
        fn test_parse_options() {
            let options = parse(&["--seed", "7", "tuning.json"]).unwrap();
            assert_eq!(options.seed, 7);
            assert_eq!(options.tuning_path, Some(PathBuf::from("tuning.json")));
            assert_eq!(options.seconds, 120.0);

            let options = parse(&["--seed=9", "--seconds=2.5"]).unwrap();
            assert_eq!(options.seed, 9);
            assert_eq!(options.seconds, 2.5);
            assert!(options.tuning_path.is_none());

            let options = parse(&["-s", "4", "-t", "10"]).unwrap();
            assert_eq!(options.seed, 4);
            assert_eq!(options.seconds, 10.0);
        }

        #[test]
        fn test_parse_options_rejects_bad_input() {
            assert!(parse(&["--bogus"]).is_err());
            assert!(parse(&["--seed"]).is_err());
            assert!(parse(&["--seed", "abc"]).is_err());
            let help = parse(&["--help"]).unwrap_err();
            assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
        }

        #[test]
        fn test_autopilot_dodges_car_ahead() {
            let mut game = GameState::new(1, Viewport::new(1000.0, 700.0), Tuning::default());
            let x = game.road.lane_left(Lane::Middle);
            game.obstacles.push(Obstacle::Car {
                pos: glam::Vec2::new(x, 400.0),
                lane: Lane::Middle,
                speed: 420.0,
            });
            assert_ne!(safest_lane(&game), Lane::Middle);
        }

        #[test]
        fn test_autopilot_stays_put_on_empty_road() {
            let game = GameState::new(1, Viewport::new(1000.0, 700.0), Tuning::default());
            assert_eq!(safest_lane(&game), Lane::Middle);
        }

        #[test]
        fn test_headless_run_completes() {
            let options = parse(&["--seconds", "5", "--seed", "3"]).unwrap();
            assert!(run(&options).is_ok());
        }

        #[test]
        fn test_headless_run_reports_missing_tuning_file() {
            let options = parse(&["--seconds", "1", "no-such-tuning.json"]).unwrap();
            assert!(run(&options).is_err());
        }
    }
}
