//! Nova Strike entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, HtmlCanvasElement, HtmlElement, HtmlInputElement, KeyboardEvent, MouseEvent,
        TouchEvent,
    };

    use nova_strike::assets::AssetRegistry;
    use nova_strike::audio::{AudioManager, SoundEffect};
    use nova_strike::consts::*;
    use nova_strike::renderer::CanvasRenderer;
    use nova_strike::settings::Settings;
    use nova_strike::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct App {
        state: GameState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
        input: TickInput,
        accumulator: f32,
        last_time: f64,
        joystick_active: bool,
    }

    impl App {
        /// Run simulation ticks against the current input snapshot
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
                self.input.shield = false;
            }

            // Map simulation events onto the audio service
            for event in self.state.drain_events() {
                match event {
                    GameEvent::RoundStarted => self.audio.play_music(),
                    GameEvent::PlayerFired => self.audio.play(SoundEffect::Shoot),
                    GameEvent::HostileDestroyed { .. } => self.audio.play(SoundEffect::Explosion),
                    GameEvent::PlayerHit => self.audio.play(SoundEffect::Hit),
                    GameEvent::ShieldRaised => self.audio.play(SoundEffect::PowerUp),
                    GameEvent::GameOver => self.audio.stop_music(),
                    GameEvent::LevelUp { .. } => {}
                }
            }
        }

        fn render(&mut self) {
            let state = &self.state;
            self.renderer.render(state);
        }

        fn start_round(&mut self) {
            self.state.start(self.settings.difficulty);
        }

        fn restart_round(&mut self) {
            self.state.restart(self.settings.difficulty);
        }

        /// Update HUD elements in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            set_text(&document, "score", &self.state.score.to_string());
            set_text(&document, "lives", &self.state.lives.to_string());
            set_text(&document, "level", &self.state.level.to_string());

            let phase = self.state.phase;
            set_hidden(&document, "menu-screen", phase != GamePhase::Menu);
            set_hidden(&document, "pause-screen", phase != GamePhase::Paused);
            set_hidden(&document, "game-over-screen", phase != GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                set_text(&document, "final-score", &self.state.score.to_string());
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("failed to init logger");

        log::info!("Nova Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game-canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_VIEW_W as f64);
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(DEFAULT_VIEW_H as f64);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let viewport = Vec2::new(width as f32, height as f32);

        let settings = Settings::load();
        let assets = AssetRegistry::load();
        let renderer = CanvasRenderer::new(&canvas, assets, viewport).expect("no 2d context");
        let audio = AudioManager::new(&settings);

        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, viewport);
        log::info!("game initialized with seed {}", seed);

        let app = Rc::new(RefCell::new(App {
            state,
            renderer,
            audio,
            settings,
            input: TickInput::default(),
            accumulator: 0.0,
            last_time: 0.0,
            joystick_active: false,
        }));

        set_difficulty_label(&document, &app.borrow().settings);
        sync_volume_sliders(&document, &app.borrow().settings);

        setup_keyboard(app.clone());
        setup_buttons(app.clone());
        setup_volume_sliders(app.clone());
        setup_mobile_controls(app.clone());
        setup_auto_pause(app.clone());
        setup_resize(app.clone(), canvas.clone());

        request_animation_frame(app);

        log::info!("Nova Strike running!");
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.code().as_str() {
                    "KeyW" | "ArrowUp" => a.input.up = true,
                    "KeyS" | "ArrowDown" => a.input.down = true,
                    "KeyA" | "ArrowLeft" => a.input.left = true,
                    "KeyD" | "ArrowRight" => a.input.right = true,
                    "Space" => {
                        event.prevent_default();
                        a.input.fire = true;
                    }
                    "KeyE" => a.input.shield = true,
                    "KeyP" => a.input.pause = true,
                    "KeyR" => a.restart_round(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.code().as_str() {
                    "KeyW" | "ArrowUp" => a.input.up = false,
                    "KeyS" | "ArrowDown" => a.input.down = false,
                    "KeyA" | "ArrowLeft" => a.input.left = false,
                    "KeyD" | "ArrowRight" => a.input.right = false,
                    "Space" => a.input.fire = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().start_round();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("play-again-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().restart_round();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("difficulty-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                a.settings.difficulty = a.settings.difficulty.next();
                a.settings.save();
                let document = web_sys::window().unwrap().document().unwrap();
                set_difficulty_label(&document, &a.settings);
                log::info!("difficulty changed to {}", a.settings.difficulty.as_str());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn set_difficulty_label(document: &Document, settings: &Settings) {
        set_text(
            document,
            "difficulty-btn",
            &format!("Difficulty: {}", settings.difficulty.as_str()),
        );
    }

    /// Reflect persisted volumes back into the menu sliders
    fn sync_volume_sliders(document: &Document, settings: &Settings) {
        let set = |id: &str, volume: f32| {
            if let Some(slider) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                slider.set_value(&((volume * 100.0).round() as u32).to_string());
            }
        };
        set("music-volume", settings.music_volume);
        set("sound-volume", settings.sound_volume);
    }

    fn setup_volume_sliders(app: Rc<RefCell<App>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        let hook = |id: &str, app: Rc<RefCell<App>>, music: bool| {
            let Some(slider) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                let Some(target) = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let Ok(percent) = target.value().parse::<f32>() else {
                    return;
                };
                let volume = percent / 100.0;
                let mut a = app.borrow_mut();
                if music {
                    a.audio.set_music_volume(volume);
                    a.settings.music_volume = volume;
                } else {
                    a.audio.set_sound_volume(volume);
                    a.settings.sound_volume = volume;
                }
                a.settings.save();
            });
            let _ =
                slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        };

        hook("music-volume", app.clone(), true);
        hook("sound-volume", app, false);
    }

    fn setup_mobile_controls(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Only reveal the overlay on touch devices
        if window.navigator().max_touch_points() > 0 {
            set_hidden(&document, "mobile-controls", false);
        }

        let Some(base) = document
            .get_element_by_id("joystick-base")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };

        // Joystick start/move (touch)
        {
            let app = app.clone();
            let base_el = base.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().joystick_active = true;
                if let Some(touch) = event.touches().get(0) {
                    update_joystick(
                        &app,
                        &base_el,
                        touch.client_x() as f64,
                        touch.client_y() as f64,
                    );
                }
            });
            for kind in ["touchstart", "touchmove"] {
                let _ =
                    base.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Joystick release
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                a.joystick_active = false;
                a.input.joystick = None;
                reset_joystick_stick();
            });
            let _ = base
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse fallback for desktop testing
        {
            let app = app.clone();
            let base_el = base.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                app.borrow_mut().joystick_active = true;
                update_joystick(&app, &base_el, event.client_x() as f64, event.client_y() as f64);
            });
            let _ = base
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let base_el = base.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let active = app.borrow().joystick_active;
                if active {
                    update_joystick(
                        &app,
                        &base_el,
                        event.client_x() as f64,
                        event.client_y() as f64,
                    );
                }
            });
            let _ = document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut a = app.borrow_mut();
                if a.joystick_active {
                    a.joystick_active = false;
                    a.input.joystick = None;
                    reset_joystick_stick();
                }
            });
            let _ = document
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Fire button: held while touched
        if let Some(btn) = document.get_element_by_id("fire-button") {
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    app.borrow_mut().input.fire = true;
                });
                let _ = btn
                    .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
                closure.forget();
            }
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    app.borrow_mut().input.fire = false;
                });
                let _ = btn
                    .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        // Shield button: one-shot
        if let Some(btn) = document.get_element_by_id("shield-button") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().input.shield = true;
            });
            let _ = btn
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Translate a pointer position over the joystick base into the
    /// normalized [-1, 1] input vector and move the stick graphic.
    fn update_joystick(app: &Rc<RefCell<App>>, base: &HtmlElement, client_x: f64, client_y: f64) {
        let rect = base.get_bounding_client_rect();
        let center_x = rect.left() + rect.width() / 2.0;
        let center_y = rect.top() + rect.height() / 2.0;
        // half the stick graphic stays inside the base
        let max_dist = rect.width() / 2.0 - 25.0;
        if max_dist <= 0.0 {
            return;
        }

        let mut dx = client_x - center_x;
        let mut dy = client_y - center_y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist > max_dist {
            let scale = max_dist / dist;
            dx *= scale;
            dy *= scale;
        }

        app.borrow_mut().input.joystick = Some(Vec2::new(
            (dx / max_dist) as f32,
            (dy / max_dist) as f32,
        ));

        if let Some(stick) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("joystick-stick"))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = stick
                .style()
                .set_property("transform", &format!("translate({dx}px, {dy}px)"));
        }
    }

    fn reset_joystick_stick() {
        if let Some(stick) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("joystick-stick"))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = stick
                .style()
                .set_property("transform", "translate(0px, 0px)");
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    if a.state.phase == GamePhase::Playing {
                        a.input.pause = true;
                        log::info!("auto-paused (tab hidden)");
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
                let mut a = app.borrow_mut();
                if a.state.phase == GamePhase::Playing {
                    a.input.pause = true;
                    log::info!("auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>, canvas: HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let width = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(DEFAULT_VIEW_W as f64);
            let height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(DEFAULT_VIEW_H as f64);
            canvas.set_width(width as u32);
            canvas.set_height(height as u32);
            app.borrow_mut()
                .state
                .set_viewport(Vec2::new(width as f32, height as f32));
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
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
    log::info!("Nova Strike (native) starting...");
    log::info!("native mode has no renderer - run with `trunk serve` for the web version");

    println!("\nRunning headless smoke round...");
    smoke_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulate a short unattended round to prove the sim core works headless.
#[cfg(not(target_arch = "wasm32"))]
fn smoke_round() {
    use glam::Vec2;
    use nova_strike::settings::Difficulty;
    use nova_strike::sim::{GamePhase, GameState, TickInput, tick};

    let mut state = GameState::new(1234, Vec2::new(800.0, 600.0));
    state.start(Difficulty::Normal);
    let input = TickInput {
        fire: true,
        ..Default::default()
    };
    for _ in 0..3600 {
        tick(&mut state, &input);
        if state.phase == GamePhase::GameOver {
            break;
        }
    }
    println!(
        "✓ simulated {} ticks: score {}, level {}, lives {}",
        state.time_ticks, state.score, state.level, state.lives
    );
}
