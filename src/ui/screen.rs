use crossterm::event::{KeyCode, KeyEvent};
use log::warn;
use ratatui::Frame;

use crate::{
    announce::{Announcer, CaptionAnnouncer, Sound},
    app::GameContext,
    runtime::GameEvent,
    settings::{Difficulty, Settings, Shape},
    ui::{board_area, letter_at, render_game, render_menu, render_results, render_settings},
};

/// Longest player name the menu accepts
pub const MAX_NAME_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ScreenKind {
    MainMenu,
    Game,
    Settings,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Switch(ScreenKind),
    Quit,
}

/// A UI screen: owns its local state, reacts to input and renders itself.
/// `on_enter`/`on_exit` run when the app switches screens.
pub trait Screen {
    fn kind(&self) -> ScreenKind;
    fn on_enter(&mut self, _ctx: &mut GameContext) {}
    fn on_exit(&mut self, _ctx: &mut GameContext) {}
    fn on_event(&mut self, event: &GameEvent, ctx: &mut GameContext) -> Transition;
    fn on_tick(&mut self, _delta_ms: u32, _ctx: &mut GameContext) -> Transition {
        Transition::Stay
    }
    fn render(&self, ctx: &GameContext, f: &mut Frame);
}

/// Helper to construct the screen for a kind
pub fn make_screen(kind: ScreenKind) -> Box<dyn Screen> {
    match kind {
        ScreenKind::MainMenu => Box::new(MainMenuScreen::default()),
        ScreenKind::Game => Box::new(GameScreen),
        ScreenKind::Settings => Box::new(SettingsScreen::default()),
        ScreenKind::Results => Box::new(ResultsScreen),
    }
}

fn key_of(event: &GameEvent) -> Option<KeyEvent> {
    match event {
        GameEvent::Key(key) => Some(*key),
        _ => None,
    }
}

/// Name entry
#[derive(Debug, Default)]
pub struct MainMenuScreen {
    name: String,
}

impl Screen for MainMenuScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::MainMenu
    }

    fn on_enter(&mut self, ctx: &mut GameContext) {
        self.name = if ctx.session.player_name().is_empty() {
            ctx.profile.player_name()
        } else {
            ctx.session.player_name().to_string()
        };
    }

    fn on_event(&mut self, event: &GameEvent, ctx: &mut GameContext) -> Transition {
        let Some(key) = key_of(event) else {
            return Transition::Stay;
        };
        match key.code {
            KeyCode::Esc => Transition::Quit,
            KeyCode::Tab => Transition::Switch(ScreenKind::Settings),
            KeyCode::Enter => {
                let name = self.name.trim().to_string();
                let avatar = ctx.profile.player_avatar().unwrap_or_default();
                if let Err(e) = ctx.profile.save_player(&name, &avatar) {
                    warn!("could not save player: {e}");
                }
                ctx.session.set_player_name(name);
                Transition::Switch(ScreenKind::Game)
            }
            KeyCode::Backspace => {
                self.name.pop();
                Transition::Stay
            }
            KeyCode::Char(c) if !c.is_control() && self.name.chars().count() < MAX_NAME_LEN => {
                self.name.push(c);
                Transition::Stay
            }
            _ => Transition::Stay,
        }
    }

    fn render(&self, ctx: &GameContext, f: &mut Frame) {
        render_menu(ctx, &self.name, f);
    }
}

/// The board
#[derive(Debug, Default)]
pub struct GameScreen;

impl GameScreen {
    fn after_input(ctx: &GameContext) -> Transition {
        if ctx.session.phase().is_finished() {
            Transition::Switch(ScreenKind::Results)
        } else {
            Transition::Stay
        }
    }
}

impl Screen for GameScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Game
    }

    fn on_enter(&mut self, ctx: &mut GameContext) {
        ctx.session.start_session();
        ctx.session.start_round();
    }

    fn on_exit(&mut self, ctx: &mut GameContext) {
        ctx.session.pause();
        ctx.session.announcer_mut().stop_all();
    }

    fn on_event(&mut self, event: &GameEvent, ctx: &mut GameContext) -> Transition {
        match event {
            GameEvent::Click { column, row } => {
                let board = board_area(ctx.terminal);
                if let Some(id) = letter_at(board, ctx.session.letters(), *column, *row) {
                    ctx.session.on_letter_tapped(id);
                }
                Self::after_input(ctx)
            }
            GameEvent::Key(key) => match key.code {
                KeyCode::Esc => Transition::Switch(ScreenKind::MainMenu),
                KeyCode::Char(' ') => {
                    ctx.session.toggle_pause();
                    Transition::Stay
                }
                KeyCode::Char(c) => {
                    let letter = ctx.session.find_letter(c).or_else(|| {
                        ctx.session
                            .letters()
                            .iter()
                            .find(|l| l.value.eq_ignore_ascii_case(&c))
                    });
                    if let Some(id) = letter.map(|l| l.id) {
                        ctx.session.submit_answer(id);
                    }
                    Self::after_input(ctx)
                }
                _ => Transition::Stay,
            },
            GameEvent::Resize | GameEvent::Tick => Transition::Stay,
        }
    }

    fn on_tick(&mut self, delta_ms: u32, ctx: &mut GameContext) -> Transition {
        ctx.session.tick(delta_ms);
        Self::after_input(ctx)
    }

    fn render(&self, ctx: &GameContext, f: &mut Frame) {
        render_game(ctx, f);
    }
}

/// Win or lose summary
#[derive(Debug, Default)]
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Results
    }

    fn on_event(&mut self, event: &GameEvent, _ctx: &mut GameContext) -> Transition {
        let Some(key) = key_of(event) else {
            return Transition::Stay;
        };
        match key.code {
            KeyCode::Char('r') | KeyCode::Enter => Transition::Switch(ScreenKind::Game),
            KeyCode::Char('m') | KeyCode::Esc => Transition::Switch(ScreenKind::MainMenu),
            KeyCode::Char('q') => Transition::Quit,
            _ => Transition::Stay,
        }
    }

    fn render(&self, ctx: &GameContext, f: &mut Frame) {
        render_results(ctx, f);
    }
}

/// Rows on the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Distractors,
    CaseSensitive,
    Countdown,
    TargetHint,
    WinScore,
    LoseScore,
    Shape,
    Alphabetical,
    Volume,
}

impl SettingsField {
    pub const ALL: [SettingsField; 9] = [
        SettingsField::Distractors,
        SettingsField::CaseSensitive,
        SettingsField::Countdown,
        SettingsField::TargetHint,
        SettingsField::WinScore,
        SettingsField::LoseScore,
        SettingsField::Shape,
        SettingsField::Alphabetical,
        SettingsField::Volume,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::Distractors => "Distractors",
            SettingsField::CaseSensitive => "Case sensitive",
            SettingsField::Countdown => "Seconds per round",
            SettingsField::TargetHint => "Show target",
            SettingsField::WinScore => "Points to win",
            SettingsField::LoseScore => "Mistakes to lose",
            SettingsField::Shape => "Biscuit shape",
            SettingsField::Alphabetical => "Alphabetical order",
            SettingsField::Volume => "Volume",
        }
    }

    pub fn value(self, s: &Settings) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" }.to_string();
        match self {
            SettingsField::Distractors => s.distractor_count.to_string(),
            SettingsField::CaseSensitive => on_off(s.case_sensitive),
            SettingsField::Countdown => format!("{}", s.countdown_time / 1000),
            SettingsField::TargetHint => on_off(s.show_target_hint),
            SettingsField::WinScore => s.win_score.to_string(),
            SettingsField::LoseScore => s.lose_score.to_string(),
            SettingsField::Shape => s.biscuit_shape.to_string(),
            SettingsField::Alphabetical => on_off(s.use_alphabetical_order),
            SettingsField::Volume => format!("{:.0}%", s.volume * 100.0),
        }
    }

    /// Step the value up (`up == true`) or down, staying in range
    pub fn adjust(self, s: &mut Settings, up: bool) {
        let step = |v: u32, lo: u32, hi: u32| {
            if up {
                (v + 1).min(hi)
            } else {
                v.saturating_sub(1).max(lo)
            }
        };
        match self {
            SettingsField::Distractors => {
                s.distractor_count = step(s.distractor_count.max(0) as u32, 0, 25) as i32;
            }
            SettingsField::CaseSensitive => s.case_sensitive = !s.case_sensitive,
            SettingsField::Countdown => {
                s.countdown_time = step(s.countdown_time / 1000, 1, 60) * 1000;
            }
            SettingsField::TargetHint => s.show_target_hint = !s.show_target_hint,
            SettingsField::WinScore => s.win_score = step(s.win_score, 1, 99),
            SettingsField::LoseScore => s.lose_score = step(s.lose_score, 1, 99),
            SettingsField::Shape => {
                const SHAPES: [Shape; 4] = [Shape::Circle, Shape::Star, Shape::Heart, Shape::Mixed];
                let idx = SHAPES.iter().position(|&x| x == s.biscuit_shape).unwrap_or(0);
                let next = if up { idx + 1 } else { idx + SHAPES.len() - 1 };
                s.biscuit_shape = SHAPES[next % SHAPES.len()];
            }
            SettingsField::Alphabetical => s.use_alphabetical_order = !s.use_alphabetical_order,
            SettingsField::Volume => {
                let pct = (s.volume * 10.0).round() as u32;
                s.volume = step(pct, 0, 10) as f32 / 10.0;
            }
        }
    }
}

/// Edits a working copy; only Enter commits it
#[derive(Debug, Default)]
pub struct SettingsScreen {
    draft: Settings,
    cursor: usize,
}

impl SettingsScreen {
    pub fn selected(&self) -> SettingsField {
        SettingsField::ALL[self.cursor]
    }

    fn rows(&self) -> Vec<(String, String)> {
        SettingsField::ALL
            .iter()
            .map(|f| (f.label().to_string(), f.value(&self.draft)))
            .collect()
    }

    fn commit(&self, ctx: &mut GameContext) {
        let settings = self.draft.clone().sanitized();
        if let Err(e) = ctx.profile.save_settings(&settings) {
            warn!("could not save settings: {e}");
        }
        let mut announcer = CaptionAnnouncer::new(settings.case_sensitive);
        announcer.set_volume(settings.volume);
        *ctx.session.announcer_mut() = announcer;
        ctx.session.set_settings(settings);
    }
}

impl Screen for SettingsScreen {
    fn kind(&self) -> ScreenKind {
        ScreenKind::Settings
    }

    fn on_enter(&mut self, ctx: &mut GameContext) {
        self.draft = ctx.session.settings().clone();
        self.cursor = 0;
    }

    fn on_event(&mut self, event: &GameEvent, ctx: &mut GameContext) -> Transition {
        let Some(key) = key_of(event) else {
            return Transition::Stay;
        };
        let last = SettingsField::ALL.len() - 1;
        match key.code {
            KeyCode::Esc => return Transition::Switch(ScreenKind::MainMenu),
            KeyCode::Enter => {
                self.commit(ctx);
                return Transition::Switch(ScreenKind::MainMenu);
            }
            KeyCode::Up => self.cursor = self.cursor.checked_sub(1).unwrap_or(last),
            KeyCode::Down => self.cursor = (self.cursor + 1) % SettingsField::ALL.len(),
            KeyCode::Left | KeyCode::Right => {
                self.selected().adjust(&mut self.draft, key.code == KeyCode::Right);
                ctx.session.announcer_mut().play_sound(Sound::Click);
            }
            KeyCode::Char('1') => self.draft = self.draft.clone().with_difficulty(Difficulty::Easy),
            KeyCode::Char('2') => {
                self.draft = self.draft.clone().with_difficulty(Difficulty::Medium)
            }
            KeyCode::Char('3') => self.draft = self.draft.clone().with_difficulty(Difficulty::Hard),
            _ => {}
        }
        Transition::Stay
    }

    fn render(&self, _ctx: &GameContext, f: &mut Frame) {
        render_settings(&self.rows(), self.cursor, f);
    }
}
