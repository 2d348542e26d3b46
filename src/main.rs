use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use lettertap::{
    announce::{Announcer, CaptionAnnouncer},
    app::{App, GameContext},
    runtime::{CrosstermEventSource, FixedTicker, GameEvent, Runner, TickClock},
    session::Session,
    settings::{Difficulty, Settings, Shape},
    store::{FileStore, KeyValueStore, MemoryStore, Profile},
    ui::screen::ScreenKind,
};
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Instant,
};

/// letter recognition game for small children, played with the mouse
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A letter recognition game: a letter is announced and the child clicks the matching biscuit before the timer runs out."
)]
pub struct Cli {
    /// number of wrong letters shown next to the target
    #[clap(short = 'd', long)]
    distractors: Option<i32>,

    /// a capital and a small letter no longer count as the same
    #[clap(long)]
    case_sensitive: bool,

    /// seconds per round
    #[clap(short = 't', long)]
    countdown_secs: Option<u32>,

    /// points needed to win
    #[clap(short = 'w', long)]
    win: Option<u32>,

    /// mistakes that end the game
    #[clap(short = 'l', long)]
    lose: Option<u32>,

    /// ask for the letters A to Z in order instead of at random
    #[clap(long)]
    alphabetical: bool,

    /// highlight the target letter on the board
    #[clap(long, conflicts_with = "no_hint")]
    show_hint: bool,

    /// never highlight the target letter
    #[clap(long)]
    no_hint: bool,

    /// biscuit shape
    #[clap(long, value_enum)]
    shape: Option<Shape>,

    /// volume between 0 and 1; 0 mutes captions
    #[clap(long)]
    volume: Option<f32>,

    /// preset for distractors and case sensitivity, applied before the other flags
    #[clap(long, value_enum)]
    difficulty: Option<Difficulty>,

    /// seed for a reproducible game
    #[clap(long)]
    seed: Option<u64>,

    /// player name, skips the name prompt
    #[clap(short = 'p', long)]
    player: Option<String>,

    /// write the resulting settings back to the store
    #[clap(long)]
    save: bool,

    /// ignore stored settings and start from the defaults
    #[clap(long)]
    reset_settings: bool,

    /// keep everything in memory; nothing is read from or written to disk
    #[clap(long)]
    no_persist: bool,
}

impl Cli {
    /// Layer the flags on top of `base`
    fn apply(&self, base: Settings) -> Settings {
        let mut s = if self.reset_settings {
            Settings::default()
        } else {
            base
        };
        if let Some(difficulty) = self.difficulty {
            s = s.with_difficulty(difficulty);
        }
        if let Some(d) = self.distractors {
            s.distractor_count = d;
        }
        if self.case_sensitive {
            s.case_sensitive = true;
        }
        if let Some(secs) = self.countdown_secs {
            s.countdown_time = secs.saturating_mul(1000);
        }
        if let Some(win) = self.win {
            s.win_score = win;
        }
        if let Some(lose) = self.lose {
            s.lose_score = lose;
        }
        if self.alphabetical {
            s.use_alphabetical_order = true;
        }
        if self.show_hint {
            s.show_target_hint = true;
        }
        if self.no_hint {
            s.show_target_hint = false;
        }
        if let Some(shape) = self.shape {
            s.biscuit_shape = shape;
        }
        if let Some(volume) = self.volume {
            s.volume = volume;
        }
        s.sanitized()
    }

    fn build_app(&self) -> App {
        let store: Box<dyn KeyValueStore> = if self.no_persist {
            Box::new(MemoryStore::new())
        } else {
            Box::new(FileStore::new())
        };
        let mut profile = Profile::new(store);
        let settings = self.apply(profile.settings());
        if self.save {
            if let Err(e) = profile.save_settings(&settings) {
                warn!("could not save settings: {e}");
            }
        }

        let mut announcer = CaptionAnnouncer::new(settings.case_sensitive);
        announcer.set_volume(settings.volume);
        let mut session = Session::seeded(settings, announcer, self.seed);

        let first = match &self.player {
            Some(name) => {
                let avatar = profile.player_avatar().unwrap_or_default();
                if let Err(e) = profile.save_player(name, &avatar) {
                    warn!("could not save player: {e}");
                }
                session.set_player_name(name.clone());
                ScreenKind::Game
            }
            None => ScreenKind::MainMenu,
        };

        App::new(GameContext::new(session, profile), first)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let mut app = cli.build_app();

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let mut clock = TickClock::new(runner.interval(), Instant::now());

    terminal.draw(|f| app.render(f))?;
    while !app.should_quit {
        let event = runner.step();
        let timed_out = matches!(event, GameEvent::Tick);
        if !timed_out {
            app.handle(event, 0);
        }
        if !app.should_quit {
            if let Some(elapsed_ms) = clock.poll(Instant::now(), timed_out) {
                app.handle(GameEvent::Tick, elapsed_ms);
            }
        }
        terminal.draw(|f| app.render(f))?;
    }

    Ok(())
}
