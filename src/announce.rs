use crate::alphabet::LetterCase;

/// Fixed vocabulary of effect cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Sound {
    Correct,
    Wrong,
    Win,
    Lose,
    Click,
}

impl Sound {
    pub fn file_name(&self) -> String {
        format!("{self}.mp3")
    }
}

/// Output side of the game: voice and sound cues. All calls are
/// fire-and-forget; nothing in the session waits on playback.
pub trait Announcer {
    fn announce(&mut self, letter: char);
    fn play_sound(&mut self, sound: Sound);
    /// Cancel anything in flight
    fn stop_all(&mut self);
    fn set_volume(&mut self, _volume: f32) {}
}

/// Audio clip for a letter. Case-sensitive games use separate recordings for
/// capital and small letters; otherwise one clip per letter is enough.
pub fn clip_for_letter(letter: char, case_sensitive: bool) -> String {
    let upper = letter.to_ascii_uppercase();
    if !case_sensitive {
        return format!("{upper}.mp3");
    }
    match LetterCase::of(letter) {
        Some(LetterCase::Lower) => format!("low_{upper}.mp3"),
        _ => format!("cap_{upper}.mp3"),
    }
}

/// Handle for one announcement in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnouncementToken(u64);

/// Generation counter for announcements.
///
/// Starting an announcement supersedes the previous one; `stop_all`
/// supersedes everything. A completion callback that arrives with an old
/// token is ignored.
#[derive(Debug, Default)]
pub struct AnnouncementTracker {
    generation: u64,
    active: Option<AnnouncementToken>,
}

impl AnnouncementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> AnnouncementToken {
        self.generation += 1;
        let token = AnnouncementToken(self.generation);
        self.active = Some(token);
        token
    }

    pub fn is_current(&self, token: AnnouncementToken) -> bool {
        self.active == Some(token)
    }

    /// Returns true if `token` was still the active announcement
    pub fn complete(&mut self, token: AnnouncementToken) -> bool {
        if self.is_current(token) {
            self.active = None;
            true
        } else {
            false
        }
    }

    pub fn stop_all(&mut self) {
        self.generation += 1;
        self.active = None;
    }

    pub fn active(&self) -> Option<AnnouncementToken> {
        self.active
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cue {
    Letter(char),
    Sound(Sound),
    StopAll,
}

/// Records every cue; used by tests and headless runs
#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    pub cues: Vec<Cue>,
    pub volume: Option<f32>,
}

impl RecordingAnnouncer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn letters(&self) -> Vec<char> {
        self.cues
            .iter()
            .filter_map(|c| match c {
                Cue::Letter(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    pub fn sounds(&self) -> Vec<Sound> {
        self.cues
            .iter()
            .filter_map(|c| match c {
                Cue::Sound(s) => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&mut self, letter: char) {
        self.cues.push(Cue::Letter(letter));
    }

    fn play_sound(&mut self, sound: Sound) {
        self.cues.push(Cue::Sound(sound));
    }

    fn stop_all(&mut self) {
        self.cues.push(Cue::StopAll);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = Some(volume);
    }
}

/// How long a caption stays on screen
pub const CAPTION_MS: u32 = 1500;

/// Terminal stand-in for audio: cues become short captions the UI shows.
#[derive(Debug, Default)]
pub struct CaptionAnnouncer {
    tracker: AnnouncementTracker,
    caption: Option<(AnnouncementToken, String, u32)>,
    muted: bool,
    case_sensitive: bool,
}

impl CaptionAnnouncer {
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            case_sensitive,
            ..Self::default()
        }
    }

    fn show(&mut self, text: String) {
        if self.muted {
            return;
        }
        let token = self.tracker.begin();
        self.caption = Some((token, text, CAPTION_MS));
    }

    /// Age the caption; it disappears once its time is up
    pub fn tick(&mut self, delta_ms: u32) {
        if let Some((token, _, left)) = self.caption.as_mut() {
            *left = left.saturating_sub(delta_ms);
            if *left == 0 {
                let token = *token;
                self.tracker.complete(token);
            }
        }
        if let Some((token, _, _)) = &self.caption {
            if !self.tracker.is_current(*token) {
                self.caption = None;
            }
        }
    }

    pub fn caption(&self) -> Option<&str> {
        self.caption
            .as_ref()
            .filter(|(token, _, _)| self.tracker.active() == Some(*token))
            .map(|(_, text, _)| text.as_str())
    }
}

impl Announcer for CaptionAnnouncer {
    fn announce(&mut self, letter: char) {
        let clip = clip_for_letter(letter, self.case_sensitive);
        self.show(format!("♪ \"{letter}\"  ({clip})"));
    }

    fn play_sound(&mut self, sound: Sound) {
        self.show(format!("♪ {sound}  ({})", sound.file_name()));
    }

    fn stop_all(&mut self) {
        self.tracker.stop_all();
        self.caption = None;
    }

    fn set_volume(&mut self, volume: f32) {
        self.muted = volume <= 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_names() {
        assert_eq!(clip_for_letter('a', false), "A.mp3");
        assert_eq!(clip_for_letter('A', false), "A.mp3");
        assert_eq!(clip_for_letter('A', true), "cap_A.mp3");
        assert_eq!(clip_for_letter('q', true), "low_Q.mp3");
    }

    #[test]
    fn test_sound_names() {
        assert_eq!(Sound::Correct.to_string(), "correct");
        assert_eq!(Sound::Wrong.file_name(), "wrong.mp3");
    }

    #[test]
    fn test_new_announcement_supersedes_old() {
        let mut t = AnnouncementTracker::new();
        let first = t.begin();
        let second = t.begin();
        assert!(!t.is_current(first));
        assert!(!t.complete(first));
        assert_eq!(t.active(), Some(second));
        assert!(t.complete(second));
        assert_eq!(t.active(), None);
    }

    #[test]
    fn test_stop_all_invalidates_token() {
        let mut t = AnnouncementTracker::new();
        let token = t.begin();
        t.stop_all();
        assert!(!t.is_current(token));
        assert!(!t.complete(token));
    }

    #[test]
    fn test_recording_announcer() {
        let mut a = RecordingAnnouncer::new();
        a.announce('b');
        a.play_sound(Sound::Win);
        a.stop_all();
        assert_eq!(a.letters(), vec!['b']);
        assert_eq!(a.sounds(), vec![Sound::Win]);
        assert_eq!(a.cues.last(), Some(&Cue::StopAll));
    }

    #[test]
    fn test_caption_expires_and_stops() {
        let mut a = CaptionAnnouncer::new(false);
        a.announce('k');
        assert!(a.caption().unwrap().contains("K.mp3"));
        a.tick(CAPTION_MS - 1);
        assert!(a.caption().is_some());
        a.tick(1);
        assert!(a.caption().is_none());

        a.play_sound(Sound::Correct);
        assert_eq!(a.caption(), Some("♪ correct  (correct.mp3)"));
        a.stop_all();
        assert!(a.caption().is_none());
    }

    #[test]
    fn test_muted_caption_announcer_is_silent() {
        let mut a = CaptionAnnouncer::new(true);
        a.set_volume(0.0);
        a.announce('k');
        assert!(a.caption().is_none());
    }
}
