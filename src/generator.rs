use crate::{
    alphabet::{self, LetterCase, ALPHABET_LEN},
    layout::Position,
    settings::{Settings, ShapeKind},
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

/// Identifies a letter within a round. The round number is part of the id,
/// so a tap that arrives after the round changed can never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LetterId {
    pub round: u32,
    pub slot: u8,
}

impl fmt::Display for LetterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}-{}", self.round, self.slot)
    }
}

/// One letter biscuit on the board
#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    pub id: LetterId,
    pub value: char,
    pub is_target: bool,
    pub position: Position,
    pub shape: ShapeKind,
}

/// Everything a new round needs from the generator
#[derive(Debug, Clone)]
pub struct GeneratedRound {
    pub target: char,
    pub case: LetterCase,
    /// Shuffled; positions are left at the origin for the layout pass
    pub letters: Vec<Letter>,
    pub next_progress: usize,
}

/// Picks the target and the distractors for a round
pub struct RoundGenerator<'a> {
    settings: &'a Settings,
}

impl<'a> RoundGenerator<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// `progress` is the alphabetical-mode cursor; it is returned unchanged in
    /// random mode.
    pub fn generate<R: Rng>(&self, round: u32, progress: usize, rng: &mut R) -> GeneratedRound {
        let case = LetterCase::random(rng);
        let all = alphabet::letters(case);

        let (target, next_progress) = if self.settings.use_alphabetical_order {
            (
                alphabet::letter_at(case, progress),
                (progress + 1) % ALPHABET_LEN,
            )
        } else {
            (*all.choose(rng).unwrap_or(&all[0]), progress)
        };

        let pool: Vec<char> = all.iter().copied().filter(|&c| c != target).collect();
        let distractors: Vec<char> = pool
            .choose_multiple(rng, self.settings.distractors())
            .copied()
            .collect();

        let mut letters: Vec<Letter> = std::iter::once((target, true))
            .chain(distractors.into_iter().map(|c| (c, false)))
            .enumerate()
            .map(|(slot, (value, is_target))| Letter {
                id: LetterId {
                    round,
                    slot: slot as u8,
                },
                value,
                is_target,
                position: Position::default(),
                shape: self.settings.biscuit_shape.resolve(rng),
            })
            .collect();
        letters.shuffle(rng);

        GeneratedRound {
            target,
            case,
            letters,
            next_progress,
        }
    }
}
