/// Random selection — the only source of variety in a generated story.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Chooses an index into a non-empty list.
///
/// Every "pick one of N" in the engine goes through this trait so tests can
/// replay an exact sequence of rolls.
pub trait Picker {
    /// Return an index in `0..len`. Callers guarantee `len > 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl<P: Picker + ?Sized> Picker for &mut P {
    fn pick_index(&mut self, len: usize) -> usize {
        (**self).pick_index(len)
    }
}

/// Pick one element uniformly. `None` only for an empty slice, in which
/// case no roll is consumed.
pub fn choose<'a, T, P>(picker: &mut P, items: &'a [T]) -> Option<&'a T>
where
    P: Picker + ?Sized,
{
    if items.is_empty() {
        return None;
    }
    let index = picker.pick_index(items.len());
    items.get(index.min(items.len() - 1))
}

/// Uniform picking backed by a `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomPicker<R> {
    rng: R,
}

impl<R: Rng> RandomPicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPicker<StdRng> {
    /// Reproducible picking for previews and tests.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Picker for RandomPicker<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Replays a fixed list of rolls. Each roll is reduced modulo the list
/// length; once the script runs out every pick is 0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPicker {
    rolls: VecDeque<usize>,
    draws: usize,
}

impl ScriptedPicker {
    pub fn new(rolls: impl IntoIterator<Item = usize>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            draws: 0,
        }
    }

    /// A picker that always takes the first element.
    pub fn first() -> Self {
        Self::default()
    }

    /// Number of picks made so far.
    pub fn draws(&self) -> usize {
        self.draws
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl Picker for ScriptedPicker {
    fn pick_index(&mut self, len: usize) -> usize {
        self.draws += 1;
        self.rolls.pop_front().map_or(0, |roll| roll % len)
    }
}
