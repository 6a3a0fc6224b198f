//! Random draw sources for roster allocation.
//!
//! The allocation engine never touches an RNG directly. It asks a
//! [`DrawSource`] for candidate ids and rarity rolls, so production code can
//! use [`RandomDraws`] while tests replay a fixed sequence with
//! [`ScriptedDraws`].
use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of candidate entity ids and rarity rolls.
pub trait DrawSource: Send {
    /// Draw an id uniformly from `[1, upper]`.
    fn draw_id(&mut self, upper: u32) -> u32;

    /// Roll a die with `sides` faces (1..=sides).
    fn roll_die(&mut self, sides: u32) -> u32;

    /// True with probability `1 / odds`.
    ///
    /// `odds == 0` never succeeds and `odds == 1` always does.
    fn roll_rare(&mut self, odds: u32) -> bool {
        match odds {
            0 => false,
            1 => true,
            sides => self.roll_die(sides) == 1,
        }
    }
}

/// [`DrawSource`] backed by a seedable standard RNG.
pub struct RandomDraws {
    rng: StdRng,
}

impl RandomDraws {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence, mainly for local runs and diagnostics.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDraws {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl DrawSource for RandomDraws {
    fn draw_id(&mut self, upper: u32) -> u32 {
        self.rng.gen_range(1..=upper.max(1))
    }

    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides.max(1))
    }
}

/// Replays a fixed list of ids and rarity rolls.
///
/// Both lists cycle once exhausted. An empty rarity list always rolls
/// "not rare"; an empty id list always draws `1`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDraws {
    ids: VecDeque<u32>,
    rarity: VecDeque<bool>,
}

impl ScriptedDraws {
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            rarity: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn with_rarity(mut self, rolls: impl IntoIterator<Item = bool>) -> Self {
        self.rarity = rolls.into_iter().collect();
        self
    }
}

impl DrawSource for ScriptedDraws {
    fn draw_id(&mut self, _upper: u32) -> u32 {
        match self.ids.pop_front() {
            Some(id) => {
                self.ids.push_back(id);
                id
            }
            None => 1,
        }
    }

    fn roll_die(&mut self, sides: u32) -> u32 {
        sides.max(1)
    }

    fn roll_rare(&mut self, _odds: u32) -> bool {
        match self.rarity.pop_front() {
            Some(rare) => {
                self.rarity.push_back(rare);
                rare
            }
            None => false,
        }
    }
}
