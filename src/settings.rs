use rand::Rng;
use serde::{Deserialize, Serialize};

/// Visual variant for the biscuits the letters are drawn on
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Shape {
    #[default]
    Circle,
    Star,
    Heart,
    Mixed,
}

/// Concrete shape of a single letter; `Shape::Mixed` resolves to one of these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Star,
    Heart,
}

impl Shape {
    pub fn resolve<R: Rng>(self, rng: &mut R) -> ShapeKind {
        match self {
            Shape::Circle => ShapeKind::Circle,
            Shape::Star => ShapeKind::Star,
            Shape::Heart => ShapeKind::Heart,
            Shape::Mixed => match rng.gen_range(0..3) {
                0 => ShapeKind::Circle,
                1 => ShapeKind::Star,
                _ => ShapeKind::Heart,
            },
        }
    }
}

/// Game settings, persisted as JSON under a fixed store key.
///
/// Field names are serialized in camelCase so settings written by the
/// browser build of the game load unchanged. Unknown or missing fields fall
/// back to the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub distractor_count: i32,
    pub case_sensitive: bool,
    /// Milliseconds per round
    pub countdown_time: u32,
    pub show_target_hint: bool,
    pub win_score: u32,
    pub lose_score: u32,
    pub biscuit_shape: Shape,
    pub use_alphabetical_order: bool,
    pub volume: f32,
}

pub const DEFAULT_COUNTDOWN_MS: u32 = 10_000;
pub const DEFAULT_WIN_SCORE: u32 = 10;
pub const DEFAULT_LOSE_SCORE: u32 = 5;

impl Default for Settings {
    fn default() -> Self {
        Self {
            distractor_count: 4,
            case_sensitive: false,
            countdown_time: DEFAULT_COUNTDOWN_MS,
            show_target_hint: true,
            win_score: DEFAULT_WIN_SCORE,
            lose_score: DEFAULT_LOSE_SCORE,
            biscuit_shape: Shape::Circle,
            use_alphabetical_order: false,
            volume: 0.8,
        }
    }
}

impl Settings {
    /// Number of distractors to draw, never negative
    pub fn distractors(&self) -> usize {
        self.distractor_count.max(0) as usize
    }

    /// Restore the invariants a hand-edited settings file may have broken
    pub fn sanitized(mut self) -> Self {
        self.distractor_count = self.distractor_count.max(0);
        if self.countdown_time == 0 {
            self.countdown_time = DEFAULT_COUNTDOWN_MS;
        }
        if self.win_score == 0 {
            self.win_score = DEFAULT_WIN_SCORE;
        }
        if self.lose_score == 0 {
            self.lose_score = DEFAULT_LOSE_SCORE;
        }
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        let (distractors, case_sensitive) = difficulty.parameters();
        self.distractor_count = distractors;
        self.case_sensitive = case_sensitive;
        self
    }
}

/// Quick presets offered on the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum_macros::Display)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// (distractor count, case sensitive)
    pub fn parameters(self) -> (i32, bool) {
        match self {
            Difficulty::Easy => (0, false),
            Difficulty::Medium => (2, false),
            Difficulty::Hard => (4, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.distractor_count, 4);
        assert_eq!(s.countdown_time, 10_000);
        assert_eq!(s.win_score, 10);
        assert_eq!(s.lose_score, 5);
        assert!(s.show_target_hint);
        assert!(!s.case_sensitive);
        assert!(!s.use_alphabetical_order);
        assert_eq!(s.biscuit_shape, Shape::Circle);
    }

    #[test]
    fn test_camel_case_json() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"distractorCount\":4"));
        assert!(json.contains("\"useAlphabeticalOrder\":false"));
        assert!(json.contains("\"biscuitShape\":\"circle\""));
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let s: Settings =
            serde_json::from_str(r#"{"winScore": 3, "biscuitShape": "mixed"}"#).unwrap();
        assert_eq!(s.win_score, 3);
        assert_eq!(s.biscuit_shape, Shape::Mixed);
        assert_eq!(s.lose_score, 5);
        assert_eq!(s.distractor_count, 4);
    }

    #[test]
    fn test_sanitized() {
        let s = Settings {
            distractor_count: -3,
            countdown_time: 0,
            win_score: 0,
            lose_score: 0,
            volume: 4.2,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(s.distractor_count, 0);
        assert_eq!(s.distractors(), 0);
        assert_eq!(s.countdown_time, DEFAULT_COUNTDOWN_MS);
        assert_eq!(s.win_score, DEFAULT_WIN_SCORE);
        assert_eq!(s.lose_score, DEFAULT_LOSE_SCORE);
        assert_eq!(s.volume, 1.0);
    }

    #[test]
    fn test_difficulty_presets() {
        let easy = Settings::default().with_difficulty(Difficulty::Easy);
        assert_eq!(easy.distractor_count, 0);
        assert!(!easy.case_sensitive);

        let hard = Settings::default().with_difficulty(Difficulty::Hard);
        assert_eq!(hard.distractor_count, 4);
        assert!(hard.case_sensitive);
    }

    #[test]
    fn test_mixed_shape_resolves_to_all_kinds() {
        let mut rng = StdRng::seed_from_u64(3);
        let kinds: std::collections::HashSet<_> =
            (0..100).map(|_| Shape::Mixed.resolve(&mut rng)).collect();
        assert_eq!(kinds.len(), 3);
        assert_eq!(Shape::Star.resolve(&mut rng), ShapeKind::Star);
    }
}
