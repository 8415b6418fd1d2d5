//! 2048 entry point
//!
//! Handles platform-specific initialization and wires the browser shell
//! (DOM rendering, input capture, menu/overlay flow) to the game session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlSelectElement, KeyboardEvent, TouchEvent};

    use wasm_2048::consts::GRID_SIZE;
    use wasm_2048::game::{Coord, Direction, MoveReport, Session, SessionEvent};
    use wasm_2048::{BestScore, Settings};

    /// Time the shell gives tile animations (slide, merge pop, spawn) before
    /// it reports the transition rendered. Owned entirely by the shell; the
    /// session only sees the completion call.
    const TRANSITION_MS: i32 = 350;

    /// Lifetime of the "+N" score floater and best-score pulse.
    const FLOATER_MS: i32 = 500;

    /// Minimum swipe distance in CSS pixels before a touch counts as a move.
    const SWIPE_THRESHOLD: f64 = 20.0;

    /// Shell state wrapping the game session
    struct App {
        session: Session<Pcg32>,
        settings: Settings,
        /// Menu screen showing; directional input is not forwarded
        in_menu: bool,
        /// Last touchstart position for swipe detection
        touch_start: Option<(f64, f64)>,
    }

    impl App {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let best = BestScore::load();
            let session = Session::new(
                settings.effective_starting_tiles(),
                best,
                Pcg32::seed_from_u64(seed),
            );
            Self {
                session,
                settings,
                in_menu: true,
                touch_start: None,
            }
        }
    }

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("2048 starting...");

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));
        log::info!("Session created with seed: {}", seed);

        show_menu(&app);
        setup_menu(app.clone());
        setup_input_handlers(app.clone());
        setup_new_game_button(app.clone());

        log::info!("2048 running!");
    }

    /// Show the menu screen, hide the board, refresh the menu best score.
    fn show_menu(app: &Rc<RefCell<App>>) {
        let document = document();
        app.borrow_mut().in_menu = true;

        if let Some(menu) = document.get_element_by_id("game-menu") {
            let _ = menu.class_list().remove_1("hidden");
        }
        if let Some(container) = document.query_selector(".container").ok().flatten() {
            let _ = container.class_list().add_1("hidden");
        }
        if let Some(el) = document.get_element_by_id("menu-best-score") {
            el.set_text_content(Some(&app.borrow().session.best_score().to_string()));
        }
    }

    /// Start (or restart) a game from the menu's current selections.
    fn start_game(app: &Rc<RefCell<App>>) {
        let document = document();

        {
            let mut a = app.borrow_mut();

            // Starting tile count from the menu select
            if let Some(select) = document
                .get_element_by_id("starting-tiles")
                .and_then(|e| e.dyn_into::<HtmlSelectElement>().ok())
            {
                if let Ok(count) = select.value().parse::<u8>() {
                    a.settings.starting_tiles = count;
                    a.settings.save();
                }
            }
            let count = a.settings.effective_starting_tiles();
            a.session.set_starting_tiles(count);
            a.session.reset();
            a.in_menu = false;
        }

        if let Some(menu) = document.get_element_by_id("game-menu") {
            let _ = menu.class_list().add_1("hidden");
        }
        if let Some(container) = document.query_selector(".container").ok().flatten() {
            let _ = container.class_list().remove_1("hidden");
        }

        render_grid(app);
        update_hud(app);
        log::info!(
            "Game started ({} starting tiles)",
            app.borrow().session.starting_tiles()
        );
    }

    fn setup_menu(app: Rc<RefCell<App>>) {
        let document = document();

        // Start button
        if let Some(btn) = document.get_element_by_id("start-game") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                start_game(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // How to Play modal open/close
        if let Some(btn) = document.get_element_by_id("how-to-play") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                set_modal_active(true);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for selector in [".how-to-play-modal .close-button", ".modal-overlay"] {
            if let Some(el) = document.query_selector(selector).ok().flatten() {
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    set_modal_active(false);
                });
                let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn set_modal_active(active: bool) {
        let document = document();
        for selector in [".how-to-play-modal", ".modal-overlay"] {
            if let Some(el) = document.query_selector(selector).ok().flatten() {
                let _ = if active {
                    el.class_list().add_1("active")
                } else {
                    el.class_list().remove_1("active")
                };
            }
        }
    }

    fn setup_new_game_button(app: Rc<RefCell<App>>) {
        if let Some(btn) = document().get_element_by_id("new-game") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                show_menu(&app);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        // Keyboard: arrow keys
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let direction = match event.key().as_str() {
                    "ArrowUp" => Direction::Up,
                    "ArrowDown" => Direction::Down,
                    "ArrowLeft" => Direction::Left,
                    "ArrowRight" => Direction::Right,
                    _ => return,
                };
                event.prevent_default();
                dispatch_direction(&app, direction);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch: swipe on the board
        let Some(board) = document().query_selector(".grid-container").ok().flatten() else {
            log::warn!("No grid container; touch input disabled");
            return;
        };
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    app.borrow_mut().touch_start =
                        Some((touch.client_x() as f64, touch.client_y() as f64));
                }
            });
            let _ = board
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let Some((start_x, start_y)) = app.borrow_mut().touch_start.take() else {
                    return;
                };
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let dx = touch.client_x() as f64 - start_x;
                let dy = touch.client_y() as f64 - start_y;
                if dx.abs().max(dy.abs()) < SWIPE_THRESHOLD {
                    return;
                }
                let direction = if dx.abs() > dy.abs() {
                    if dx > 0.0 { Direction::Right } else { Direction::Left }
                } else if dy > 0.0 {
                    Direction::Down
                } else {
                    Direction::Up
                };
                dispatch_direction(&app, direction);
            });
            let _ = board
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Forward a direction to the session and animate the result.
    fn dispatch_direction(app: &Rc<RefCell<App>>, direction: Direction) {
        let report = {
            let mut a = app.borrow_mut();
            if a.in_menu {
                return;
            }
            // The session drops input unless it is idle, so a gesture that
            // lands mid-animation simply returns None here.
            a.session.handle_direction(direction)
        };
        let Some(report) = report else {
            return;
        };

        animate_report(app, &report);
        process_events(app);
        schedule_transition_end(app.clone());
    }

    /// After the animation window, tell the session the render is done and
    /// settle the board into its plain (animation-free) representation.
    fn schedule_transition_end(app: Rc<RefCell<App>>) {
        let closure = Closure::once(move || {
            app.borrow_mut().session.transition_rendered();
            render_grid(&app);
            process_events(&app);
        });
        let _ = web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                TRANSITION_MS,
            );
        closure.forget();
    }

    /// Drain session notifications into HUD updates and overlays.
    fn process_events(app: &Rc<RefCell<App>>) {
        let events = app.borrow_mut().session.drain_events();
        let document = document();
        for event in events {
            match event {
                SessionEvent::ScoreChanged { score, delta } => {
                    if let Some(el) = document.get_element_by_id("score") {
                        el.set_text_content(Some(&score.to_string()));
                    }
                    flash_score_delta(&document, delta);
                }
                SessionEvent::BestScoreChanged { best } => {
                    if let Some(el) = document.get_element_by_id("best-score") {
                        el.set_text_content(Some(&best.to_string()));
                        pulse_class(&el, "best-score-updated");
                    }
                }
                SessionEvent::GameWon { score } => {
                    log::info!("Game won with score {}", score);
                    show_end_overlay(app, true, score);
                }
                SessionEvent::GameOver { score } => {
                    log::info!("Game over with score {}", score);
                    show_end_overlay(app, false, score);
                }
            }
        }
    }

    fn update_hud(app: &Rc<RefCell<App>>) {
        let document = document();
        let a = app.borrow();
        if let Some(el) = document.get_element_by_id("score") {
            el.set_text_content(Some(&a.session.score().to_string()));
        }
        if let Some(el) = document.get_element_by_id("best-score") {
            el.set_text_content(Some(&a.session.best_score().to_string()));
        }
    }

    /// Float a "+N" indicator next to the score readout.
    fn flash_score_delta(document: &Document, delta: u32) {
        let Some(parent) = document
            .get_element_by_id("score")
            .and_then(|e| e.parent_element())
        else {
            return;
        };
        let Ok(addition) = document.create_element("div") else {
            return;
        };
        addition.set_class_name("score-addition");
        addition.set_text_content(Some(&format!("+{delta}")));
        let _ = parent.append_child(&addition);

        let closure = Closure::once(move || {
            addition.remove();
        });
        let _ = web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                FLOATER_MS,
            );
        closure.forget();
    }

    /// Add a class and strip it again once its animation has played.
    fn pulse_class(el: &Element, class: &str) {
        let _ = el.class_list().add_1(class);
        let el = el.clone();
        let class = class.to_string();
        let closure = Closure::once(move || {
            let _ = el.class_list().remove_1(&class);
        });
        let _ = web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                FLOATER_MS,
            );
        closure.forget();
    }

    /// Rebuild the 4x4 cell scaffold, returning the container.
    fn rebuild_board(document: &Document) -> Option<Element> {
        let container = document.query_selector(".grid-container").ok().flatten()?;
        container.set_inner_html("");
        for row in 0..GRID_SIZE {
            let grid_row = document.create_element("div").ok()?;
            grid_row.set_class_name("grid-row");
            for col in 0..GRID_SIZE {
                let cell = document.create_element("div").ok()?;
                cell.set_class_name("grid-cell");
                let _ = cell.set_attribute("data-row", &row.to_string());
                let _ = cell.set_attribute("data-col", &col.to_string());
                let _ = grid_row.append_child(&cell);
            }
            let _ = container.append_child(&grid_row);
        }
        Some(container)
    }

    fn cell_at(container: &Element, at: Coord) -> Option<Element> {
        container
            .query_selector(&format!(
                ".grid-cell[data-row=\"{}\"][data-col=\"{}\"]",
                at.row, at.col
            ))
            .ok()
            .flatten()
    }

    fn make_tile(document: &Document, value: u32) -> Option<HtmlElement> {
        let tile = document.create_element("div").ok()?;
        tile.set_class_name("tile");
        tile.set_text_content(Some(&value.to_string()));
        let _ = tile.set_attribute("data-value", &value.to_string());
        tile.dyn_into::<HtmlElement>().ok()
    }

    /// Pixel offset that places a tile rendered in `to` visually over `from`.
    fn offset_between(container: &Element, from: Coord, to: Coord) -> (f64, f64) {
        match (cell_at(container, from), cell_at(container, to)) {
            (Some(from_cell), Some(to_cell)) => {
                let from_rect = from_cell.get_bounding_client_rect();
                let to_rect = to_cell.get_bounding_client_rect();
                (
                    from_rect.left() - to_rect.left(),
                    from_rect.top() - to_rect.top(),
                )
            }
            _ => (0.0, 0.0),
        }
    }

    fn place_offset(tile: &HtmlElement, dx: f64, dy: f64) {
        let _ = tile
            .style()
            .set_property("transform", &format!("translate({dx}px, {dy}px)"));
    }

    /// Render the current grid with no animation state.
    fn render_grid(app: &Rc<RefCell<App>>) {
        let document = document();
        let Some(container) = rebuild_board(&document) else {
            return;
        };
        let a = app.borrow();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let at = Coord::new(row, col);
                let value = a.session.grid().get(at);
                if value == 0 {
                    continue;
                }
                if let (Some(cell), Some(tile)) = (cell_at(&container, at), make_tile(&document, value)) {
                    let _ = cell.append_child(&tile);
                }
            }
        }
    }

    /// Render the committed grid staged for animation: slides start at their
    /// origin offsets, merges get ghost halves, the spawn scales in. A
    /// requestAnimationFrame pass clears the offsets so CSS transitions play.
    fn animate_report(app: &Rc<RefCell<App>>, report: &MoveReport) {
        let document = document();
        let Some(container) = rebuild_board(&document) else {
            return;
        };
        let mut sliding: Vec<HtmlElement> = Vec::new();

        let a = app.borrow();
        let grid = a.session.grid();
        let spawned_at = report.spawned.map(|s| s.at);

        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let at = Coord::new(row, col);
                let value = grid.get(at);
                if value == 0 {
                    continue;
                }
                let Some(cell) = cell_at(&container, at) else {
                    continue;
                };

                if spawned_at == Some(at) {
                    if let Some(tile) = make_tile(&document, value) {
                        let _ = tile.class_list().add_1("tile-new");
                        let _ = cell.append_child(&tile);
                    }
                } else if let Some(merge) = report.merges.iter().find(|m| m.to == at) {
                    // Ghost halves slide in from both origins, then the
                    // doubled tile pops over them.
                    for from in merge.from {
                        if let Some(ghost) = make_tile(&document, merge.value / 2) {
                            let _ = ghost.class_list().add_1("ghost");
                            let (dx, dy) = offset_between(&container, from, at);
                            let _ = cell.append_child(&ghost);
                            place_offset(&ghost, dx, dy);
                            sliding.push(ghost);
                        }
                    }
                    if let Some(tile) = make_tile(&document, value) {
                        let _ = tile.class_list().add_1("tile-merged");
                        let _ = cell.append_child(&tile);
                    }
                } else if let Some(mv) = report.moves.iter().find(|m| m.to == at) {
                    if let Some(tile) = make_tile(&document, value) {
                        let (dx, dy) = offset_between(&container, mv.from, at);
                        let _ = cell.append_child(&tile);
                        place_offset(&tile, dx, dy);
                        sliding.push(tile);
                    }
                } else if let Some(tile) = make_tile(&document, value) {
                    let _ = cell.append_child(&tile);
                }
            }
        }
        drop(a);

        // Next frame: zero the offsets so the CSS transform transition runs.
        let closure = Closure::once(move |_time: f64| {
            for tile in sliding {
                place_offset(&tile, 0.0, 0.0);
            }
        });
        let _ = web_sys::window()
            .unwrap()
            .request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Win/lose overlay with the final score and a replay button.
    fn show_end_overlay(app: &Rc<RefCell<App>>, won: bool, score: u32) {
        let document = document();
        let Ok(overlay) = document.create_element("div") else {
            return;
        };
        overlay.set_class_name(if won { "game-over win" } else { "game-over" });

        let best = app.borrow().session.best_score();
        let headline = if won { "You Win!" } else { "Game Over!" };
        let best_line = if score >= best && score > 0 {
            "New Best Score!".to_string()
        } else {
            format!("Best score: {best}")
        };
        let Ok(content) = document.create_element("div") else {
            return;
        };
        content.set_class_name("game-over-content");
        content.set_inner_html(&format!(
            "<h2>{headline}</h2><p>Your score: {score}</p><p class=\"final-score\">{best_line}</p>"
        ));

        if let Ok(button) = document.create_element("button") {
            button.set_text_content(Some(if won { "Play Again" } else { "Try Again" }));
            let app = app.clone();
            let overlay_for_close = overlay.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                overlay_for_close.remove();
                show_menu(&app);
            });
            let _ = button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
            let _ = content.append_child(&button);
        }

        let _ = overlay.append_child(&content);
        if let Some(body) = document.body() {
            let _ = body.append_child(&overlay);
        }
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
    log::info!("2048 (native) starting...");
    log::info!("Native mode is a smoke check - run with `trunk serve` for the web version");

    println!("\nRunning scripted smoke game...");
    smoke_game();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_game() {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_2048::BestScore;
    use wasm_2048::game::{Direction, Phase, Session};

    let mut session = Session::new(2, BestScore::new(), Pcg32::seed_from_u64(2048));
    let mut moves = 0u32;

    'game: while moves < 10_000 {
        let mut advanced = false;
        for direction in Direction::ALL {
            if session.handle_direction(direction).is_some() {
                session.transition_rendered();
                moves += 1;
                advanced = true;
                if matches!(session.phase(), Phase::Terminal(_)) {
                    break 'game;
                }
            }
        }
        assert!(advanced, "session idle but no direction accepted");
    }

    // Every occupied cell must hold a power of two.
    for row in session.grid().rows() {
        for &v in row {
            assert!(v == 0 || v.is_power_of_two());
        }
    }

    println!("{}", session.grid());
    println!(
        "moves: {}, score: {}, final phase: {:?}",
        moves,
        session.score(),
        session.phase()
    );
    println!("✓ Smoke game completed");
}
