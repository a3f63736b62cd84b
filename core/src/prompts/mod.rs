//! Prompt selection
//!
//! Each mode has its own pool. Prompts are drawn at random without
//! replacement until the pool is exhausted, then the pool starts over. The
//! prompt served last is held back from the first draw after a restart of
//! the pool, so the same prompt never comes up twice in a row.

mod builtin;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tickbomb_types::{GameConfig, GameMode, PromptOverrides};
use tracing::trace;

pub use builtin::{FRIEND, PINK};

/// Supplies the prompt shown for each turn.
pub trait PromptSource {
    /// Draw the next prompt for `mode`.
    fn next_prompt(&mut self, mode: GameMode) -> String;

    /// Forget which prompts have been served, in every mode.
    fn reset_history(&mut self);
}

#[derive(Debug, Clone)]
struct PromptPool {
    prompts: Vec<String>,
    used: HashSet<usize>,
    last: Option<usize>,
}

impl PromptPool {
    fn new(prompts: Vec<String>) -> Self {
        Self {
            prompts,
            used: HashSet::new(),
            last: None,
        }
    }

    /// Custom prompts when any are given, otherwise the built-in list
    fn with_fallback(custom: &[String], builtin: &[&str]) -> Self {
        if custom.is_empty() {
            Self::new(builtin.iter().map(|p| p.to_string()).collect())
        } else {
            Self::new(custom.to_vec())
        }
    }

    fn draw(&mut self, rng: &mut dyn RngCore) -> String {
        let len = self.prompts.len();
        if self.used.len() >= len {
            trace!(len, "prompt pool exhausted, starting over");
            self.used.clear();
        }

        let candidates: Vec<usize> = (0..len)
            .filter(|idx| !self.used.contains(idx))
            .filter(|idx| len == 1 || self.last != Some(*idx))
            .collect();

        let idx = candidates[rng.gen_range(0..candidates.len())];
        self.used.insert(idx);
        self.last = Some(idx);
        self.prompts[idx].clone()
    }

    fn reset(&mut self) {
        self.used.clear();
        self.last = None;
    }
}

/// Default [`PromptSource`] over the built-in lists, optionally replaced per
/// mode from config.
pub struct PromptBank {
    friend: PromptPool,
    pink: PromptPool,
    rng: Box<dyn RngCore>,
}

impl PromptBank {
    pub fn new() -> Self {
        Self::with_rng(Box::new(StdRng::from_entropy()))
    }

    pub fn with_rng(rng: Box<dyn RngCore>) -> Self {
        Self::from_overrides(&PromptOverrides::default(), rng)
    }

    /// A mode with an empty override list keeps its built-in prompts.
    pub fn from_overrides(overrides: &PromptOverrides, rng: Box<dyn RngCore>) -> Self {
        Self {
            friend: PromptPool::with_fallback(overrides.for_mode(GameMode::Friend), FRIEND),
            pink: PromptPool::with_fallback(overrides.for_mode(GameMode::Pink), PINK),
            rng,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::from_overrides(&config.prompts, Box::new(StdRng::from_entropy()))
    }

    /// Number of prompts available in `mode`
    pub fn pool_size(&self, mode: GameMode) -> usize {
        self.pool(mode).prompts.len()
    }

    /// Number of prompts served in `mode` since its pool last started over
    pub fn used(&self, mode: GameMode) -> usize {
        self.pool(mode).used.len()
    }

    fn pool(&self, mode: GameMode) -> &PromptPool {
        match mode {
            GameMode::Friend => &self.friend,
            GameMode::Pink => &self.pink,
        }
    }
}

impl Default for PromptBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptSource for PromptBank {
    fn next_prompt(&mut self, mode: GameMode) -> String {
        let pool = match mode {
            GameMode::Friend => &mut self.friend,
            GameMode::Pink => &mut self.pink,
        };
        pool.draw(&mut *self.rng)
    }

    fn reset_history(&mut self) {
        self.friend.reset();
        self.pink.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    fn bank(seed: u64) -> PromptBank {
        PromptBank::with_rng(Box::new(ChaCha8Rng::seed_from_u64(seed)))
    }

    fn custom(friend: &[&str]) -> PromptBank {
        let overrides = PromptOverrides {
            friend: friend.iter().map(|p| p.to_string()).collect(),
            pink: Vec::new(),
        };
        PromptBank::from_overrides(&overrides, Box::new(ChaCha8Rng::seed_from_u64(3)))
    }

    #[test]
    fn full_cycle_serves_every_prompt_once() {
        let mut bank = bank(1);
        let size = bank.pool_size(GameMode::Pink);
        assert_eq!(size, PINK.len());

        let served: HashSet<String> = (0..size)
            .map(|_| bank.next_prompt(GameMode::Pink))
            .collect();
        assert_eq!(served.len(), size);
        assert_eq!(bank.used(GameMode::Pink), size);
    }

    #[test]
    fn modes_keep_separate_history() {
        let mut bank = bank(2);
        bank.next_prompt(GameMode::Friend);
        bank.next_prompt(GameMode::Friend);
        bank.next_prompt(GameMode::Pink);

        assert_eq!(bank.used(GameMode::Friend), 2);
        assert_eq!(bank.used(GameMode::Pink), 1);
        assert!(FRIEND.contains(&bank.next_prompt(GameMode::Friend).as_str()));
    }

    #[test]
    fn exhausted_pool_starts_over_without_immediate_repeat() {
        for seed in 0..50 {
            let mut bank = bank(seed);
            let mut previous = String::new();
            for _ in 0..FRIEND.len() * 4 {
                let prompt = bank.next_prompt(GameMode::Friend);
                assert_ne!(prompt, previous, "seed {seed}");
                previous = prompt;
            }
        }
    }

    #[test]
    fn reset_history_clears_every_mode() {
        let mut bank = bank(4);
        bank.next_prompt(GameMode::Friend);
        bank.next_prompt(GameMode::Pink);
        bank.reset_history();

        assert_eq!(bank.used(GameMode::Friend), 0);
        assert_eq!(bank.used(GameMode::Pink), 0);
    }

    #[test]
    fn overrides_replace_builtin_per_mode() {
        let mut bank = custom(&["一", "二"]);
        assert_eq!(bank.pool_size(GameMode::Friend), 2);
        assert_eq!(bank.pool_size(GameMode::Pink), PINK.len());

        let mut drawn: Vec<String> = (0..2).map(|_| bank.next_prompt(GameMode::Friend)).collect();
        drawn.sort();
        assert_eq!(drawn, vec!["一", "二"]);
    }

    #[test]
    fn single_prompt_pool_repeats() {
        let mut bank = custom(&["だけ"]);
        for _ in 0..3 {
            assert_eq!(bank.next_prompt(GameMode::Friend), "だけ");
        }
    }
}
