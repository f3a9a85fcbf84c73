//! Which catalog entry plays next.
//!
//! Both policies never pick the same index twice in a row:
//! - `RoundRobin` walks the catalog in order.
//! - `ShuffledPool` shows every index once per cycle in random order; the
//!   first pick of a new cycle also skips the motion that just played.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rng::PickRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    RoundRobin,
    #[default]
    ShuffledPool,
}

impl std::str::FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round_robin" | "round-robin" => Ok(SelectionPolicy::RoundRobin),
            "shuffled_pool" | "shuffled-pool" | "shuffled" => Ok(SelectionPolicy::ShuffledPool),
            other => Err(format!("unknown selection policy: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no motion available to play (catalog size {catalog_size}, last played {last:?})")]
    NoCandidates {
        catalog_size: usize,
        last: Option<usize>,
    },
}

/// Selection bookkeeping for one sequencer.
#[derive(Debug, Clone)]
pub struct Selector {
    policy: SelectionPolicy,
    /// Round-robin cursor: index to play next
    current: usize,
    /// Indices not yet shown in the current shuffled cycle
    pool: Vec<usize>,
    /// Index of the motion that played last
    last: Option<usize>,
}

impl Selector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            current: 0,
            pool: Vec::new(),
            last: None,
        }
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn last(&self) -> Option<usize> {
        self.last
    }

    /// Indices still waiting in the current shuffled cycle.
    pub fn remaining_pool(&self) -> &[usize] {
        &self.pool
    }

    /// Pick the next index for a catalog of `catalog_size` entries.
    pub fn pick(
        &mut self,
        catalog_size: usize,
        rng: &mut impl PickRng,
    ) -> Result<usize, SelectionError> {
        let picked = match self.policy {
            SelectionPolicy::RoundRobin => self.next_round_robin(catalog_size)?,
            SelectionPolicy::ShuffledPool => self.next_shuffled(catalog_size, rng)?,
        };
        self.last = Some(picked);
        Ok(picked)
    }

    fn no_candidates(&self, catalog_size: usize) -> SelectionError {
        SelectionError::NoCandidates {
            catalog_size,
            last: self.last,
        }
    }

    fn next_round_robin(&mut self, catalog_size: usize) -> Result<usize, SelectionError> {
        if catalog_size == 0 {
            return Err(self.no_candidates(catalog_size));
        }
        let candidate = self.current % catalog_size;
        if self.last == Some(candidate) {
            return Err(self.no_candidates(catalog_size));
        }
        self.current = (candidate + 1) % catalog_size;
        Ok(candidate)
    }

    fn next_shuffled(
        &mut self,
        catalog_size: usize,
        rng: &mut impl PickRng,
    ) -> Result<usize, SelectionError> {
        // Drop stale entries if the catalog shrank
        self.pool.retain(|&i| i < catalog_size);
        if self.pool.is_empty() {
            self.pool.extend(0..catalog_size);
        }

        let candidates = self
            .pool
            .iter()
            .filter(|&&i| Some(i) != self.last)
            .count();
        if candidates == 0 {
            return Err(self.no_candidates(catalog_size));
        }

        let nth = rng.pick_index(candidates);
        let (pos, &picked) = self
            .pool
            .iter()
            .enumerate()
            .filter(|&(_, &i)| Some(i) != self.last)
            .nth(nth)
            .ok_or_else(|| self.no_candidates(catalog_size))?;
        self.pool.remove(pos);
        Ok(picked)
    }
}
