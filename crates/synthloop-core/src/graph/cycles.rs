//! Exact-length crafting cycle enumeration.
//!
//! # Overview
//!
//! A loop of length `k` is a sequence of `k` distinct items where each item
//! is crafted from the previous one and the first is crafted from the last.
//! [`CycleSearch`] enumerates every such sequence by depth-first backtracking
//! over a [`CraftGraph`].
//!
//! # Algorithm
//!
//! For each starting item `s`:
//!
//! 1. The *closers* of `s` are its ingredients (other than itself). If there
//!    are none, no loop can return to `s` and it is skipped.
//! 2. While the partial sequence is shorter than `k - 1`, extend it with any
//!    unused item that can be crafted from its last member.
//! 3. At length `k - 1`, every unused item that can be crafted from the last
//!    member *and* is a closer completes a loop.
//!
//! The path is kept on an explicit frame stack, one frame per partial-sequence
//! member, so deep searches never grow the native call stack. The "remaining
//! pool" is a bitset of used items restored on backtrack.
//!
//! Without a fixed start each cycle is reported once per rotation, since every
//! member is tried as the start. Set [`SearchOptions::unique_rotations`] to
//! keep one rotation per cycle.
//!
//! # Budget
//!
//! The search space is factorial in the worst case. A [`SearchBudget`] caps
//! the number of expansion steps and/or wall-clock time; when it runs out the
//! search stops and [`SearchOutcome::truncated`] records why. The default
//! budget is unlimited.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::time::{Duration, Instant};

use fixedbitset::FixedBitSet;
use tracing::{debug, info, instrument, warn};

use super::build::CraftGraph;
use crate::model::Loop;

// ---------------------------------------------------------------------------
// Options and outcome
// ---------------------------------------------------------------------------

/// Optional limits on search effort. `Default` is unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchBudget {
    /// Maximum number of expansion steps (start items tried plus candidates
    /// pushed onto the path).
    pub max_steps: Option<u64>,
    /// Maximum wall-clock time.
    pub max_duration: Option<Duration>,
}

impl SearchBudget {
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_steps: None,
            max_duration: None,
        }
    }

    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.max_steps.is_none() && self.max_duration.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    pub budget: SearchBudget,
    /// Report each cycle once, in the rotation first discovered.
    pub unique_rotations: bool,
}

/// Which limit stopped a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetLimit {
    Steps(u64),
    Duration(Duration),
}

impl fmt::Display for BudgetLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steps(max) => write!(f, "step limit {max}"),
            Self::Duration(max) => write!(f, "time limit {}ms", max.as_millis()),
        }
    }
}

/// The search stopped before exploring the whole space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search stopped at {limit} after {steps} steps; results are partial")]
pub struct SearchBudgetExceeded {
    pub limit: BudgetLimit,
    pub steps: u64,
}

/// Loops found by a search, plus whether the search was exhaustive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome<'a> {
    pub loops: Vec<Loop<'a>>,
    pub steps: u64,
    /// `Some` when a budget cut the search short.
    pub truncated: Option<SearchBudgetExceeded>,
}

impl<'a> SearchOutcome<'a> {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            loops: Vec::new(),
            steps: 0,
            truncated: None,
        }
    }

    #[must_use]
    pub const fn is_exhaustive(&self) -> bool {
        self.truncated.is_none()
    }

    /// Return the loops only if the search covered the whole space.
    ///
    /// # Errors
    ///
    /// Returns [`SearchBudgetExceeded`] if the search was truncated.
    pub fn into_exhaustive(self) -> Result<Vec<Loop<'a>>, SearchBudgetExceeded> {
        match self.truncated {
            Some(exceeded) => Err(exceeded),
            None => Ok(self.loops),
        }
    }
}

// ---------------------------------------------------------------------------
// CycleSearch
// ---------------------------------------------------------------------------

/// Loop enumeration over a prepared [`CraftGraph`].
#[derive(Debug)]
pub struct CycleSearch<'g, 'a> {
    graph: &'g CraftGraph<'a>,
    options: SearchOptions,
}

impl<'g, 'a> CycleSearch<'g, 'a> {
    #[must_use]
    pub const fn new(graph: &'g CraftGraph<'a>, options: SearchOptions) -> Self {
        Self { graph, options }
    }

    /// Find all loops of exactly `length` items.
    ///
    /// With `start = Some(idx)` only loops beginning at pool index `idx` are
    /// produced; otherwise every pool item is tried as the start. Loops that
    /// do not contain every name in `required` are dropped afterwards.
    #[instrument(skip(self, required), fields(items = self.graph.len()))]
    pub fn run(
        &self,
        length: usize,
        start: Option<usize>,
        required: &BTreeSet<String>,
    ) -> SearchOutcome<'a> {
        match start {
            Some(idx) => self.run_from(length, &[idx], required),
            None => {
                let starts: Vec<usize> = (0..self.graph.len()).collect();
                self.run_from(length, &starts, required)
            }
        }
    }

    /// Find loops starting at each of `starts` in turn, concatenating results.
    ///
    /// One budget covers the whole run.
    pub fn run_from(
        &self,
        length: usize,
        starts: &[usize],
        required: &BTreeSet<String>,
    ) -> SearchOutcome<'a> {
        if length < 2 || length > self.graph.len() {
            debug!(length, "no loop of this length can exist");
            return SearchOutcome::empty();
        }

        let mut walker = Walker::new(self.graph, length, self.options.budget);
        for &start in starts {
            if walker.exhausted() {
                break;
            }
            walker.search_from(start);
        }

        let Walker {
            found,
            steps,
            truncated,
            ..
        } = walker;

        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let loops: Vec<Loop<'a>> = found
            .into_iter()
            .filter(|members| !self.options.unique_rotations || seen.insert(canonical(members)))
            .map(|members| Loop::new(members.into_iter().map(|idx| self.graph.item(idx)).collect()))
            .filter(|cycle| required.iter().all(|name| cycle.contains_name(name)))
            .collect();

        if let Some(exceeded) = &truncated {
            warn!(%exceeded, found = loops.len(), "cycle search truncated");
        } else {
            info!(length, found = loops.len(), steps, "cycle search complete");
        }

        SearchOutcome {
            loops,
            steps,
            truncated,
        }
    }
}

/// Rotate `members` so the smallest pool index comes first.
fn canonical(members: &[usize]) -> Vec<usize> {
    let pivot = members
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| *idx)
        .map_or(0, |(pos, _)| pos);
    let mut rotated = members[pivot..].to_vec();
    rotated.extend_from_slice(&members[..pivot]);
    rotated
}

// ---------------------------------------------------------------------------
// Walker: explicit-stack backtracking
// ---------------------------------------------------------------------------

/// Candidates for extending the path by one member.
struct Frame {
    candidates: Vec<usize>,
    cursor: usize,
}

impl Frame {
    fn new(successors: &[usize], used: &FixedBitSet) -> Self {
        Self {
            candidates: successors
                .iter()
                .copied()
                .filter(|&idx| !used.contains(idx))
                .collect(),
            cursor: 0,
        }
    }

    fn next_candidate(&mut self) -> Option<usize> {
        let candidate = self.candidates.get(self.cursor).copied();
        self.cursor += 1;
        candidate
    }
}

struct Walker<'g, 'a> {
    graph: &'g CraftGraph<'a>,
    length: usize,
    budget: SearchBudget,
    started: Instant,
    steps: u64,
    truncated: Option<SearchBudgetExceeded>,
    found: Vec<Vec<usize>>,
}

impl<'g, 'a> Walker<'g, 'a> {
    fn new(graph: &'g CraftGraph<'a>, length: usize, budget: SearchBudget) -> Self {
        Self {
            graph,
            length,
            budget,
            started: Instant::now(),
            steps: 0,
            truncated: None,
            found: Vec::new(),
        }
    }

    const fn exhausted(&self) -> bool {
        self.truncated.is_some()
    }

    /// Count one step. Returns `false` once the budget is spent.
    fn tick(&mut self) -> bool {
        if self.truncated.is_some() {
            return false;
        }

        let limit = match (self.budget.max_steps, self.budget.max_duration) {
            (Some(max), _) if self.steps >= max => Some(BudgetLimit::Steps(max)),
            (_, Some(max)) if self.started.elapsed() > max => Some(BudgetLimit::Duration(max)),
            _ => None,
        };
        if let Some(limit) = limit {
            self.truncated = Some(SearchBudgetExceeded {
                limit,
                steps: self.steps,
            });
            return false;
        }

        self.steps += 1;
        true
    }

    fn search_from(&mut self, start: usize) {
        if !self.tick() {
            return;
        }

        let closers = self.graph.predecessor_set(start);
        if closers.count_ones(..) == 0 {
            debug!(start = %self.graph.item(start).name, "no closers, pruned");
            return;
        }

        let mut used = FixedBitSet::with_capacity(self.graph.len());
        used.insert(start);
        let mut path = vec![start];

        if path.len() == self.length - 1 {
            self.close(&path, &used, &closers);
            return;
        }

        // Invariant: stack.len() == path.len(); frame i extends path[..=i].
        let mut stack = vec![Frame::new(self.graph.successors(start), &used)];

        while let Some(frame) = stack.last_mut() {
            let Some(next) = frame.next_candidate() else {
                stack.pop();
                if let Some(last) = path.pop() {
                    used.set(last, false);
                }
                continue;
            };

            if !self.tick() {
                return;
            }

            path.push(next);
            used.insert(next);

            if path.len() == self.length - 1 {
                self.close(&path, &used, &closers);
                path.pop();
                used.set(next, false);
            } else {
                stack.push(Frame::new(self.graph.successors(next), &used));
            }
        }
    }

    /// Emit every loop completed by one closer after `path`.
    fn close(&mut self, path: &[usize], used: &FixedBitSet, closers: &FixedBitSet) {
        let Some(&last) = path.last() else {
            return;
        };
        for &candidate in self.graph.successors(last) {
            if used.contains(candidate) || !closers.contains(candidate) {
                continue;
            }
            let mut members = Vec::with_capacity(path.len() + 1);
            members.extend_from_slice(path);
            members.push(candidate);
            self.found.push(members);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
