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

use std::cmp::Ordering;
use vessel_alloc_core::prelude::Money;

/// Search objective of a solution: real cost plus constraint penalty.
///
/// Solutions compare by the sum of the two, with a lower penalty breaking
/// ties so that of two equally priced plans the cleaner one wins. The
/// ordering is total (NaN sorts via `f64::total_cmp`), which lets fitness
/// values act as keys in minimum selections.
#[derive(Debug, Clone, Copy)]
pub struct Fitness {
    cost: Money,
    penalty: Money,
}

impl Fitness {
    #[inline]
    pub const fn new(cost: Money, penalty: Money) -> Self {
        Self { cost, penalty }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        self.cost
    }

    #[inline]
    pub fn penalty(&self) -> Money {
        self.penalty
    }

    /// The value search minimizes.
    #[inline]
    pub fn total(&self) -> Money {
        self.cost + self.penalty
    }

    /// Whether the solution violates no constraints.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.penalty == 0.0
    }
}

impl PartialEq for Fitness {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fitness {}

impl PartialOrd for Fitness {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fitness {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.total()
            .total_cmp(&other.total())
            .then_with(|| self.penalty.total_cmp(&other.penalty))
    }
}

impl std::fmt::Display for Fitness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fitness(cost: {:.2}, penalty: {:.2})",
            self.cost, self.penalty
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_is_cost_plus_penalty() {
        let f = Fitness::new(1_000.0, 250.0);
        assert_eq!(f.total(), 1_250.0);
    }

    #[test]
    fn test_zero_is_clean() {
        assert!(Fitness::zero().is_clean());
        assert!(!Fitness::new(0.0, 1.0).is_clean());
    }

    #[test]
    fn test_ordering_by_total() {
        let cheap = Fitness::new(100.0, 0.0);
        let pricey = Fitness::new(200.0, 0.0);
        assert!(cheap < pricey);
    }

    #[test]
    fn test_penalty_dominates_cheap_cost() {
        let dirty = Fitness::new(10.0, 1_000_000.0);
        let clean = Fitness::new(500_000.0, 0.0);
        assert!(clean < dirty);
    }

    #[test]
    fn test_equal_total_prefers_lower_penalty() {
        let clean = Fitness::new(100.0, 0.0);
        let dirty = Fitness::new(50.0, 50.0);
        assert!(clean < dirty);
        assert_ne!(clean, dirty);
    }

    #[test]
    fn test_min_selection_is_stable() {
        let values = vec![
            Fitness::new(300.0, 0.0),
            Fitness::new(100.0, 50.0),
            Fitness::new(120.0, 0.0),
        ];
        let best = values.iter().min().unwrap();
        assert_eq!(best.total(), 120.0);
    }

    #[test]
    fn test_display_format() {
        let f = Fitness::new(12.5, 0.0);
        assert_eq!(f.to_string(), "Fitness(cost: 12.50, penalty: 0.00)");
    }
}
