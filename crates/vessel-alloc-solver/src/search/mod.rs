// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

pub mod alns;
pub mod baseline;
pub mod ga;
pub mod oplib;
pub mod tabu;

pub use alns::AlnsSearch;
pub use ga::GeneticSearch;
pub use tabu::TabuSearch;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use vessel_alloc_model::prelude::Solution;

/// Result of one search stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRun {
    /// Best solution the stage has seen, never worse than its seed.
    pub best: Solution,
    /// Iterations actually executed.
    pub iterations: usize,
    /// Whether the stage stopped on the wall clock budget.
    pub budget_exhausted: bool,
}

/// Deterministic per-stage rng.
#[inline]
pub(crate) fn stage_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
