//! DOM overlay: HUD values, quiz popup, pause and game over screens
//!
//! Every element is optional. A missing element is reported once and then
//! skipped; it never stops the game loop.

use std::collections::HashSet;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::{HudText, format_distance, screen_visibility};
use crate::sim::{GameMode, GameOverCause, QuizQuestion, RenderFrame};

pub struct DomOverlay {
    document: Document,
    max_promille: f32,
    /// Prompt of the question currently in the popup
    shown_quiz: Option<&'static str>,
    last_hud: Option<HudText>,
    warned: HashSet<&'static str>,
}

impl DomOverlay {
    pub fn new(document: Document, max_promille: f32) -> Self {
        Self {
            document,
            max_promille,
            shown_quiz: None,
            last_hud: None,
            warned: HashSet::new(),
        }
    }

    fn element(&mut self, id: &'static str) -> Option<Element> {
        let el = self.document.get_element_by_id(id);
        if el.is_none() && self.warned.insert(id) {
            log::warn!("Missing DOM element #{}", id);
        }
        el
    }

    fn set_text(&mut self, id: &'static str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(&mut self, id: &'static str, visible: bool) {
        if let Some(el) = self.element(id) {
            let class_list = el.class_list();
            if visible {
                let _ = class_list.remove_1("hidden");
            } else {
                let _ = class_list.add_1("hidden");
            }
        }
    }

    /// Menu screen vs game screen; also called on every start and restart
    pub fn show_menu(&mut self, menu: bool) {
        for (id, visible) in screen_visibility(menu) {
            self.set_visible(id, visible);
        }
        self.shown_quiz = None;
        self.last_hud = None;
    }

    /// Sync everything for one frame
    pub fn update(&mut self, frame: &RenderFrame) {
        self.update_hud(frame);
        self.update_quiz(frame.quiz.as_ref());
        self.set_visible(
            "pause-overlay",
            frame.mode == GameMode::Paused && frame.quiz.is_none(),
        );
        match frame.game_over {
            Some(cause) if frame.mode == GameMode::GameOver => {
                self.show_game_over(cause, frame.hud.distance)
            }
            _ => self.set_visible("game-over", false),
        }
    }

    fn update_hud(&mut self, frame: &RenderFrame) {
        let text = HudText::from_hud(&frame.hud, self.max_promille);
        if self.last_hud.as_ref() == Some(&text) {
            return;
        }

        self.set_text("distance-value", &text.distance);
        self.set_text("lives-value", &text.lives);
        self.set_text("promille-value", &text.promille);
        if let Some(bar) = self
            .element("promille-bar")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let _ = bar
                .style()
                .set_property("width", &format!("{:.1}%", text.promille_bar_percent));
        }
        if let Some(stats) = self.element("stats") {
            let _ = stats
                .class_list()
                .toggle_with_force("promille-warning", text.warning);
        }
        self.last_hud = Some(text);
    }

    fn update_quiz(&mut self, quiz: Option<&QuizQuestion>) {
        let prompt = quiz.map(|q| q.prompt);
        if prompt == self.shown_quiz {
            return;
        }
        self.shown_quiz = prompt;

        match quiz {
            Some(q) => {
                self.set_text("quiz-question", q.prompt);
                self.set_text("quiz-answer-0", q.answers[0]);
                self.set_text("quiz-answer-1", q.answers[1]);
                self.set_visible("quiz-explanation", false);
                self.set_visible("quiz-popup", true);
            }
            None => self.set_visible("quiz-popup", false),
        }
    }

    /// Show why an answer was right or wrong until the next question
    pub fn show_explanation(&mut self, correct: bool, explanation: Option<&str>) {
        let verdict = if correct { "Riktig!" } else { "Feil!" };
        let text = match explanation {
            Some(e) => format!("{} {}", verdict, e),
            None => verdict.to_string(),
        };
        self.set_text("quiz-explanation", &text);
        self.set_visible("quiz-explanation", true);
    }

    fn show_game_over(&mut self, cause: GameOverCause, distance: f32) {
        let reason = match cause {
            GameOverCause::OutOfLives => "Du krasjet for mange ganger.",
            GameOverCause::MaxPromille => "Promillen ble for høy.",
        };
        self.set_text("game-over-cause", reason);
        self.set_text("final-distance", &format_distance(distance));
        self.set_visible("game-over", true);
    }
}
