use crate::{
    alphabet::letters_match,
    announce::{Announcer, Sound},
    countdown::Countdown,
    generator::{Letter, LetterId, RoundGenerator},
    layout::assign_positions,
    scheduler::{Scheduler, Task},
    settings::Settings,
    util::format_game_time,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Delay between a round appearing and its target being spoken
pub const ANNOUNCE_DELAY_MS: u32 = 300;
/// How long an encouragement stays visible
pub const ENCOURAGEMENT_MS: u32 = 3000;

pub const ENCOURAGEMENTS: &[&str] = &[
    "Great job!",
    "Amazing!",
    "Keep going!",
    "So clever!",
    "Perfect!",
    "That's it!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum GamePhase {
    Idle,
    Playing,
    Paused,
    /// Passed through between a correct answer and the next round
    RoundTransition,
    Won,
    Lost,
}

impl GamePhase {
    pub fn is_finished(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Not playing, paused, or the letter is not on the board any more
    Ignored,
    Correct,
    Incorrect,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Ignored,
    Running,
    /// Counted as a wrong answer; a new round has started
    TimedOut,
    Lost,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub phase: GamePhase,
    pub is_playing: bool,
    pub is_paused: bool,
    pub score: u32,
    pub errors: u32,
    pub round: u32,
    pub target: Option<char>,
    pub letters: Vec<Letter>,
    pub countdown: Countdown,
    /// Next target index in alphabetical mode
    pub progress_index: usize,
    pub encouragement: Option<String>,
    /// Active play time; stops while paused and once the game is over
    pub elapsed_ms: u64,
}

impl SessionState {
    fn new(countdown_ms: u32) -> Self {
        Self {
            phase: GamePhase::Idle,
            is_playing: false,
            is_paused: false,
            score: 0,
            errors: 0,
            round: 0,
            target: None,
            letters: Vec::new(),
            countdown: Countdown::new(countdown_ms),
            progress_index: 0,
            encouragement: None,
            elapsed_ms: 0,
        }
    }

    pub fn round_active(&self) -> bool {
        self.target.is_some()
    }
}

/// The game: owns the session state and drives it from taps and ticks.
///
/// Randomness comes only from `rng`, so a seeded generator replays a game
/// exactly. Audio goes out through the [`Announcer`].
#[derive(Debug)]
pub struct Session<A: Announcer, R: Rng = StdRng> {
    settings: Settings,
    player_name: String,
    state: SessionState,
    scheduler: Scheduler,
    announcer: A,
    rng: R,
}

impl<A: Announcer> Session<A, StdRng> {
    /// Seeded when `seed` is given, from entropy otherwise
    pub fn seeded(settings: Settings, announcer: A, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(settings, announcer, rng)
    }
}

impl<A: Announcer, R: Rng> Session<A, R> {
    pub fn new(settings: Settings, announcer: A, rng: R) -> Self {
        let settings = settings.sanitized();
        Self {
            state: SessionState::new(settings.countdown_time),
            settings,
            player_name: String::new(),
            scheduler: Scheduler::new(),
            announcer,
            rng,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// New settings apply from the next `start_session`
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    pub fn announcer(&self) -> &A {
        &self.announcer
    }

    pub fn announcer_mut(&mut self) -> &mut A {
        &mut self.announcer
    }

    pub fn letters(&self) -> &[Letter] {
        &self.state.letters
    }

    pub fn letter(&self, id: LetterId) -> Option<&Letter> {
        self.state.letters.iter().find(|l| l.id == id)
    }

    /// Letter on the board showing exactly `value`
    pub fn find_letter(&self, value: char) -> Option<&Letter> {
        self.state.letters.iter().find(|l| l.value == value)
    }

    pub fn formatted_game_time(&self) -> String {
        format_game_time(self.state.elapsed_ms)
    }

    #[cfg(test)]
    pub(crate) fn has_pending(&self, task: Task) -> bool {
        self.scheduler.is_pending(task)
    }

    /// Reset scores and start playing. Valid in any phase.
    pub fn start_session(&mut self) {
        self.scheduler.cancel_all();
        self.announcer.stop_all();
        self.announcer.set_volume(self.settings.volume);

        self.state = SessionState::new(self.settings.countdown_time);
        self.state.is_playing = true;
        self.state.phase = GamePhase::Playing;
        info!(
            "session started: win at {}, lose at {}, {} distractors",
            self.settings.win_score,
            self.settings.lose_score,
            self.settings.distractors()
        );
    }

    pub fn start_round(&mut self) {
        self.scheduler.cancel_where(|t| matches!(t, Task::AnnounceTarget { .. }));

        self.state.round += 1;
        let round = self.state.round;
        let generated = RoundGenerator::new(&self.settings).generate(
            round,
            self.state.progress_index,
            &mut self.rng,
        );
        let mut letters = generated.letters;
        assign_positions(&mut letters, &mut self.rng);

        self.state.target = Some(generated.target);
        self.state.letters = letters;
        self.state.progress_index = generated.next_progress;
        self.state.countdown.reset(self.settings.countdown_time);
        self.state.is_playing = true;
        self.state.is_paused = false;
        self.state.phase = GamePhase::Playing;

        self.scheduler.schedule(ANNOUNCE_DELAY_MS, Task::AnnounceTarget { round });
        debug!(
            "round {round}: target {:?} among {} letters",
            generated.target,
            self.state.letters.len()
        );
    }

    /// Input from the board
    pub fn on_letter_tapped(&mut self, id: LetterId) -> AnswerOutcome {
        self.submit_answer(id)
    }

    pub fn submit_answer(&mut self, id: LetterId) -> AnswerOutcome {
        if !self.state.is_playing || self.state.is_paused {
            return AnswerOutcome::Ignored;
        }
        let (Some(letter), Some(target)) = (self.letter(id), self.state.target) else {
            debug!("ignoring tap on stale letter {id}");
            return AnswerOutcome::Ignored;
        };

        if letters_match(letter.value, target, self.settings.case_sensitive) {
            self.state.score += 1;
            self.announcer.play_sound(Sound::Correct);
            self.encourage();
            if let Some(end) = self.check_end() {
                return self.finish(end);
            }
            self.state.phase = GamePhase::RoundTransition;
            self.start_round();
            AnswerOutcome::Correct
        } else {
            self.state.errors += 1;
            self.announcer.play_sound(Sound::Wrong);
            match self.check_end() {
                Some(end) => self.finish(end),
                // The round stays on the board for another try.
                None => AnswerOutcome::Incorrect,
            }
        }
    }

    pub fn tick(&mut self, delta_ms: u32) -> TickOutcome {
        if !self.state.is_playing || self.state.is_paused {
            return TickOutcome::Ignored;
        }
        self.state.elapsed_ms += delta_ms as u64;

        for task in self.scheduler.advance(delta_ms) {
            self.run_task(task);
        }

        if !self.state.round_active() || !self.state.countdown.tick(delta_ms) {
            return TickOutcome::Running;
        }

        self.state.errors += 1;
        self.announcer.play_sound(Sound::Wrong);
        debug!("round {} timed out", self.state.round);
        match self.check_end() {
            Some(end) => {
                self.finish(end);
                TickOutcome::Lost
            }
            None => {
                self.start_round();
                TickOutcome::TimedOut
            }
        }
    }

    pub fn pause(&mut self) {
        if !self.state.is_playing || self.state.is_paused {
            return;
        }
        self.state.is_paused = true;
        self.state.phase = GamePhase::Paused;
        self.state.encouragement = None;
        self.scheduler.cancel_all();
        self.announcer.stop_all();
    }

    /// Continue after a pause; the target is spoken again.
    pub fn resume(&mut self) {
        if !self.state.is_paused {
            return;
        }
        self.state.is_paused = false;
        self.state.phase = GamePhase::Playing;
        if self.state.round_active() {
            self.scheduler.schedule(
                ANNOUNCE_DELAY_MS,
                Task::AnnounceTarget {
                    round: self.state.round,
                },
            );
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.state.is_paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Win is checked before loss.
    fn check_end(&self) -> Option<GamePhase> {
        if self.state.score >= self.settings.win_score {
            Some(GamePhase::Won)
        } else if self.state.errors >= self.settings.lose_score {
            Some(GamePhase::Lost)
        } else {
            None
        }
    }

    fn finish(&mut self, phase: GamePhase) -> AnswerOutcome {
        self.state.is_playing = false;
        self.state.phase = phase;
        self.scheduler.cancel_all();
        info!(
            "session over: {phase} with score {} and {} errors in {}",
            self.state.score,
            self.state.errors,
            self.formatted_game_time()
        );
        if phase == GamePhase::Won {
            self.announcer.play_sound(Sound::Win);
            AnswerOutcome::Won
        } else {
            self.announcer.play_sound(Sound::Lose);
            AnswerOutcome::Lost
        }
    }

    fn encourage(&mut self) {
        let phrase = ENCOURAGEMENTS.choose(&mut self.rng).copied().unwrap_or("Great job!");
        self.state.encouragement = Some(if self.player_name.is_empty() {
            phrase.to_string()
        } else {
            format!("{}, {phrase}", self.player_name)
        });
        self.scheduler.cancel_where(|t| *t == Task::ClearEncouragement);
        self.scheduler.schedule(ENCOURAGEMENT_MS, Task::ClearEncouragement);
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::AnnounceTarget { round } => {
                if round == self.state.round && self.state.is_playing {
                    if let Some(target) = self.state.target {
                        self.announcer.announce(target);
                    }
                }
            }
            Task::ClearEncouragement => self.state.encouragement = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::{Cue, RecordingAnnouncer};
    use assert_matches::assert_matches;

    fn session(settings: Settings) -> Session<RecordingAnnouncer> {
        Session::seeded(settings, RecordingAnnouncer::new(), Some(42))
    }

    fn target_id<A: Announcer, R: Rng>(s: &Session<A, R>) -> LetterId {
        s.letters().iter().find(|l| l.is_target).unwrap().id
    }

    fn wrong_id<A: Announcer, R: Rng>(s: &Session<A, R>) -> LetterId {
        s.letters().iter().find(|l| !l.is_target).unwrap().id
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = session(Settings::default());
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(!s.state().is_playing);
        assert_eq!(s.state().target, None);
    }

    #[test]
    fn test_start_session_resets() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        s.submit_answer(wrong_id(&s));
        s.start_session();

        let st = s.state();
        assert_eq!(st.phase, GamePhase::Playing);
        assert!(st.is_playing);
        assert!(!st.is_paused);
        assert_eq!((st.score, st.errors, st.round), (0, 0, 0));
        assert!(st.letters.is_empty());
        assert_eq!(st.target, None);
        assert_eq!(st.countdown.remaining_ms(), 10_000);
        assert_eq!(s.announcer().volume, Some(0.8));
    }

    #[test]
    fn test_start_round_sets_up_board() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();

        let st = s.state();
        assert_eq!(st.round, 1);
        assert_eq!(st.letters.len(), 5);
        assert_eq!(st.letters.iter().filter(|l| l.is_target).count(), 1);
        assert_eq!(
            Some(st.letters.iter().find(|l| l.is_target).unwrap().value),
            st.target
        );
        assert!(s.has_pending(Task::AnnounceTarget { round: 1 }));
    }

    #[test]
    fn test_target_is_announced_after_delay() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        s.tick(ANNOUNCE_DELAY_MS - 1);
        assert!(s.announcer().letters().is_empty());
        s.tick(1);
        assert_eq!(s.announcer().letters(), vec![s.state().target.unwrap()]);
    }

    #[test]
    fn test_new_round_cancels_previous_announcement() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        s.tick(ANNOUNCE_DELAY_MS / 2);
        s.start_round();
        s.tick(ANNOUNCE_DELAY_MS / 2);
        assert!(s.announcer().letters().is_empty());

        s.tick(ANNOUNCE_DELAY_MS);
        assert_eq!(s.announcer().letters(), vec![s.state().target.unwrap()]);
    }

    #[test]
    fn test_start_session_cancels_scheduled_tasks() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        s.start_session();
        s.tick(3 * ANNOUNCE_DELAY_MS);
        assert!(s.announcer().letters().is_empty());
        assert!(!s.has_pending(Task::AnnounceTarget { round: 1 }));
    }

    #[test]
    fn test_wrong_answer_keeps_round() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        let target = s.state().target;

        assert_eq!(s.submit_answer(wrong_id(&s)), AnswerOutcome::Incorrect);
        assert_eq!(s.state().errors, 1);
        assert_eq!(s.state().round, 1);
        assert_eq!(s.state().target, target);
        assert_eq!(s.announcer().sounds(), vec![Sound::Wrong]);
    }

    #[test]
    fn test_correct_answer_advances_round() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        s.tick(2000);

        assert_eq!(s.submit_answer(target_id(&s)), AnswerOutcome::Correct);
        assert_eq!(s.state().score, 1);
        assert_eq!(s.state().round, 2);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.state().countdown.remaining_ms(), 10_000);
        assert!(s.state().encouragement.is_some());
    }

    #[test]
    fn test_stale_letter_is_ignored() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        let old = target_id(&s);
        s.submit_answer(old);

        let before = (s.state().score, s.state().errors, s.state().round);
        assert_eq!(s.submit_answer(old), AnswerOutcome::Ignored);
        assert_eq!(before, (s.state().score, s.state().errors, s.state().round));
    }

    #[test]
    fn test_input_before_playing_is_ignored() {
        let mut s = session(Settings::default());
        let id = LetterId { round: 1, slot: 0 };
        assert_eq!(s.submit_answer(id), AnswerOutcome::Ignored);
        assert_eq!(s.tick(1000), TickOutcome::Ignored);
    }

    #[test]
    fn test_case_insensitive_match() {
        let mut s = session(Settings {
            case_sensitive: false,
            ..Settings::default()
        });
        s.start_session();
        s.start_round();
        // Swap the target's case on the board; it must still count.
        let target = s.state().target.unwrap();
        let flipped = if target.is_ascii_uppercase() {
            target.to_ascii_lowercase()
        } else {
            target.to_ascii_uppercase()
        };
        s.state.letters.iter_mut().find(|l| l.is_target).unwrap().value = flipped;
        assert_eq!(s.submit_answer(target_id(&s)), AnswerOutcome::Correct);
    }

    #[test]
    fn test_case_sensitive_mismatch() {
        let mut s = session(Settings {
            case_sensitive: true,
            ..Settings::default()
        });
        s.start_session();
        s.start_round();
        let target = s.state().target.unwrap();
        s.state.letters.iter_mut().find(|l| l.is_target).unwrap().value =
            if target.is_ascii_uppercase() {
                target.to_ascii_lowercase()
            } else {
                target.to_ascii_uppercase()
            };
        assert_eq!(s.submit_answer(target_id(&s)), AnswerOutcome::Incorrect);
    }

    #[test]
    fn test_timeout_counts_as_error_and_advances() {
        let mut s = session(Settings {
            countdown_time: 1000,
            ..Settings::default()
        });
        s.start_session();
        s.start_round();

        assert_eq!(s.tick(1000), TickOutcome::TimedOut);
        assert_eq!(s.state().errors, 1);
        assert_eq!(s.state().round, 2);
        assert_eq!(s.state().countdown.remaining_ms(), 1000);
    }

    #[test]
    fn test_timeout_can_lose() {
        let mut s = session(Settings {
            countdown_time: 1000,
            lose_score: 1,
            ..Settings::default()
        });
        s.start_session();
        s.start_round();
        assert_eq!(s.tick(1500), TickOutcome::Lost);
        assert_eq!(s.phase(), GamePhase::Lost);
        assert_eq!(s.state().countdown.remaining_ms(), 0);
    }

    #[test]
    fn test_no_countdown_before_first_round() {
        let mut s = session(Settings {
            countdown_time: 1000,
            ..Settings::default()
        });
        s.start_session();
        assert_eq!(s.tick(5000), TickOutcome::Running);
        assert_eq!(s.state().errors, 0);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        s.tick(1000);
        s.pause();

        assert_eq!(s.phase(), GamePhase::Paused);
        assert_eq!(s.tick(5000), TickOutcome::Ignored);
        assert_eq!(s.state().countdown.remaining_ms(), 9000);
        assert_eq!(s.submit_answer(target_id(&s)), AnswerOutcome::Ignored);
        assert_eq!(s.announcer().cues.last(), Some(&Cue::StopAll));
        assert!(!s.has_pending(Task::AnnounceTarget { round: 1 }));
    }

    #[test]
    fn test_pause_cancels_pending_announcement() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        s.pause();
        s.resume();
        s.tick(ANNOUNCE_DELAY_MS);
        // Only the announcement scheduled on resume fires
        assert_eq!(s.announcer().letters().len(), 1);
    }

    #[test]
    fn test_resume_reannounces() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        s.tick(ANNOUNCE_DELAY_MS);
        s.pause();
        s.resume();
        assert_eq!(s.phase(), GamePhase::Playing);
        s.tick(ANNOUNCE_DELAY_MS);
        let target = s.state().target.unwrap();
        assert_eq!(s.announcer().letters(), vec![target, target]);
    }

    #[test]
    fn test_toggle_pause() {
        let mut s = session(Settings::default());
        s.start_session();
        s.toggle_pause();
        assert!(s.state().is_paused);
        s.toggle_pause();
        assert!(!s.state().is_paused);
    }

    #[test]
    fn test_pause_when_not_playing_is_noop() {
        let mut s = session(Settings::default());
        s.pause();
        assert_eq!(s.phase(), GamePhase::Idle);
        assert!(!s.state().is_paused);
    }

    #[test]
    fn test_encouragement_uses_player_name_and_clears() {
        let mut s = session(Settings::default());
        s.set_player_name("Yiyi");
        s.start_session();
        s.start_round();
        s.submit_answer(target_id(&s));

        let text = s.state().encouragement.clone().unwrap();
        assert!(text.starts_with("Yiyi, "), "{text}");
        s.tick(ENCOURAGEMENT_MS - 1);
        assert!(s.state().encouragement.is_some());
        s.tick(1);
        assert!(s.state().encouragement.is_none());
    }

    #[test]
    fn test_win_stops_play_and_freezes_clock() {
        let mut s = session(Settings {
            win_score: 1,
            ..Settings::default()
        });
        s.start_session();
        s.start_round();
        s.tick(1234);

        assert_matches!(s.submit_answer(target_id(&s)), AnswerOutcome::Won);
        assert!(!s.state().is_playing);
        assert_eq!(s.formatted_game_time(), "0:01");
        assert_eq!(s.tick(60_000), TickOutcome::Ignored);
        assert_eq!(s.state().elapsed_ms, 1234);
        assert_eq!(s.announcer().sounds(), vec![Sound::Correct, Sound::Win]);
        assert!(s.phase().is_finished());
    }

    #[test]
    fn test_score_and_errors_never_decrease() {
        let mut s = session(Settings {
            win_score: 50,
            lose_score: 50,
            countdown_time: 700,
            ..Settings::default()
        });
        s.start_session();
        s.start_round();
        let mut last = (0, 0);
        for i in 0..60u32 {
            match i % 3 {
                0 => {
                    s.submit_answer(target_id(&s));
                }
                1 => {
                    s.submit_answer(wrong_id(&s));
                }
                _ => {
                    s.tick(350);
                }
            }
            let now = (s.state().score, s.state().errors);
            assert!(now.0 >= last.0 && now.1 >= last.1);
            last = now;
        }
    }

    #[test]
    fn test_settings_apply_on_next_session() {
        let mut s = session(Settings::default());
        s.set_settings(Settings {
            countdown_time: 2500,
            ..Settings::default()
        });
        s.start_session();
        assert_eq!(s.state().countdown.max_ms(), 2500);
    }

    #[test]
    fn test_find_letter() {
        let mut s = session(Settings::default());
        s.start_session();
        s.start_round();
        let target = s.state().target.unwrap();
        assert!(s.find_letter(target).unwrap().is_target);
        assert!(s.find_letter('!').is_none());
    }
}
