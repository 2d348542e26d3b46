use crate::{
    announce::CaptionAnnouncer,
    countdown::UrgencyThresholds,
    runtime::GameEvent,
    session::Session,
    store::{KeyValueStore, Profile},
    ui::screen::{make_screen, Screen, ScreenKind, Transition},
};
use crossterm::event::{KeyCode, KeyModifiers};
use log::debug;
use ratatui::{layout::Rect, Frame};

/// Everything the screens share
pub struct GameContext {
    pub session: Session<CaptionAnnouncer>,
    pub profile: Profile<Box<dyn KeyValueStore>>,
    pub thresholds: UrgencyThresholds,
    /// Last known terminal size, for mapping clicks onto the board
    pub terminal: Rect,
}

impl GameContext {
    pub fn new(
        session: Session<CaptionAnnouncer>,
        profile: Profile<Box<dyn KeyValueStore>>,
    ) -> Self {
        Self {
            session,
            profile,
            thresholds: UrgencyThresholds::default(),
            terminal: Rect::new(0, 0, 80, 24),
        }
    }
}

/// Top-level state: the shared context plus whichever screen is showing
pub struct App {
    pub ctx: GameContext,
    screen: Box<dyn Screen>,
    pub should_quit: bool,
}

impl App {
    pub fn new(ctx: GameContext, first: ScreenKind) -> Self {
        let mut app = Self {
            ctx,
            screen: make_screen(first),
            should_quit: false,
        };
        app.screen.on_enter(&mut app.ctx);
        app
    }

    pub fn screen_kind(&self) -> ScreenKind {
        self.screen.kind()
    }

    pub fn switch_to(&mut self, kind: ScreenKind) {
        debug!("screen {} -> {kind}", self.screen_kind());
        self.screen.on_exit(&mut self.ctx);
        self.screen = make_screen(kind);
        self.screen.on_enter(&mut self.ctx);
    }

    /// Feed one event in. `elapsed_ms` is the real time since the last tick
    /// and only matters for `GameEvent::Tick`.
    pub fn handle(&mut self, event: GameEvent, elapsed_ms: u32) {
        if let GameEvent::Key(key) = &event {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                self.quit();
                return;
            }
        }

        let transition = match event {
            GameEvent::Tick => {
                self.ctx.session.announcer_mut().tick(elapsed_ms);
                self.screen.on_tick(elapsed_ms, &mut self.ctx)
            }
            other => self.screen.on_event(&other, &mut self.ctx),
        };

        match transition {
            Transition::Stay => {}
            Transition::Switch(kind) => self.switch_to(kind),
            Transition::Quit => self.quit(),
        }
    }

    pub fn render(&mut self, f: &mut Frame) {
        self.ctx.terminal = f.area();
        self.screen.render(&self.ctx, f);
    }

    fn quit(&mut self) {
        self.screen.on_exit(&mut self.ctx);
        self.should_quit = true;
    }
}
