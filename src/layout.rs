//! Spreads the letters of a round over the normalized play area.
//!
//! Candidates are the centres of a jittered grid with about four cells per
//! letter. Letters take, one at a time, the candidate farthest from every
//! letter already placed, in a single pass.

use crate::generator::Letter;
use itertools::iproduct;
use rand::seq::SliceRandom;
use rand::Rng;

/// Point in the unit square; (0, 0) is the top-left corner of the play area
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Grid dimension for `n` letters: ceil(sqrt(4n))
pub fn grid_dimension(n: usize) -> usize {
    ((4 * n) as f64).sqrt().ceil() as usize
}

/// Jittered, shuffled candidate points for `n` letters
pub fn candidate_points<R: Rng>(n: usize, rng: &mut R) -> Vec<Position> {
    let d = grid_dimension(n);
    if d == 0 {
        return Vec::new();
    }
    let cell = 1.0 / d as f32;
    // Jitter is half a cell wide, centred on the cell centre.
    let jitter = cell * 0.25;

    let mut points: Vec<Position> = iproduct!(0..d, 0..d)
        .map(|(i, j)| {
            Position::new(
                cell * (i as f32 + 0.5) + rng.gen_range(-jitter..=jitter),
                cell * (j as f32 + 0.5) + rng.gen_range(-jitter..=jitter),
            )
        })
        .collect();
    points.shuffle(rng);
    points
}

/// Pick positions for `n` letters by greedy farthest-point selection
pub fn spread_points<R: Rng>(n: usize, rng: &mut R) -> Vec<Position> {
    let candidates = candidate_points(n, rng);
    place_greedy(candidates, n, rng)
}

/// Uniform point away from the edges, for when the candidates run out
pub fn fallback_point<R: Rng>(rng: &mut R) -> Position {
    Position::new(rng.gen_range(0.1..=0.9), rng.gen_range(0.1..=0.9))
}

fn place_greedy<R: Rng>(mut candidates: Vec<Position>, n: usize, rng: &mut R) -> Vec<Position> {
    let mut placed: Vec<Position> = Vec::with_capacity(n);

    for _ in 0..n {
        let best = candidates
            .iter()
            .enumerate()
            .map(|(idx, c)| {
                let nearest = placed
                    .iter()
                    .map(|p| p.distance(c))
                    .fold(f32::INFINITY, f32::min);
                (idx, nearest)
            })
            // Keep the first candidate on ties so the shuffle decides.
            .fold(None, |best: Option<(usize, f32)>, (idx, dist)| match best {
                Some((_, best_dist)) if best_dist >= dist => best,
                _ => Some((idx, dist)),
            });

        let position = match best {
            Some((idx, _)) => candidates.swap_remove(idx),
            None => fallback_point(rng),
        };
        placed.push(position);
    }
    placed
}

/// Assign a position to every letter in place
pub fn assign_positions<R: Rng>(letters: &mut [Letter], rng: &mut R) {
    let positions = spread_points(letters.len(), rng);
    for (letter, position) in letters.iter_mut().zip(positions) {
        letter.position = position;
    }
}
