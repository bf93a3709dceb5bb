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

use crate::{
    problem::vessel::VesselIdentifier,
    solution::{asg::Assignment, fitness::Fitness},
};
use vessel_alloc_core::prelude::Tons;

/// A complete allocation plan: one entry per assigned vessel, plus the
/// fitness it was last evaluated at.
///
/// Solutions are plain values. Search algorithms copy them explicitly
/// and never share mutable state through them.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    assignments: Vec<Assignment>,
    fitness: Fitness,
}

impl Solution {
    #[inline]
    pub fn new(assignments: Vec<Assignment>, fitness: Fitness) -> Self {
        Self {
            assignments,
            fitness,
        }
    }

    #[inline]
    pub fn empty() -> Self {
        Self::new(Vec::new(), Fitness::zero())
    }

    #[inline]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    #[inline]
    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    #[inline]
    pub fn find(&self, vessel: VesselIdentifier) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.vessel() == vessel)
    }

    /// Total tonnage moved by this plan.
    #[inline]
    pub fn assigned_tonnage(&self) -> Tons {
        self.assignments.iter().map(|a| a.quantity()).sum()
    }

    #[inline]
    pub fn with_fitness(mut self, fitness: Fitness) -> Self {
        self.fitness = fitness;
        self
    }

    #[inline]
    pub fn into_assignments(self) -> Vec<Assignment> {
        self.assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::Material,
        problem::{
            plant::PlantIdentifier,
            port::PortIdentifier,
            route::{Route, RouteIdentifier},
            vessel::Vessel,
        },
    };
    use chrono::NaiveDate;

    #[inline]
    fn assignment(vessel_id: u32, quantity: i64) -> Assignment {
        let vessel = Vessel::new(
            VesselIdentifier::new(vessel_id),
            format!("MV {vessel_id}"),
            Material::IronOre,
            Tons::new(100_000),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            3.0,
            10_000.0,
            "Saldanha",
        )
        .unwrap();
        let route = Route::new(
            RouteIdentifier::new(vessel_id),
            PortIdentifier::new(1),
            PlantIdentifier::new(1),
            2.0,
            2,
            Tons::new(100_000),
        )
        .unwrap();
        Assignment::new(&vessel, &route, Tons::new(quantity), 2, 1.0).unwrap()
    }

    #[test]
    fn test_empty_solution() {
        let s = Solution::empty();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.assigned_tonnage(), Tons::new(0));
        assert_eq!(s.fitness(), Fitness::zero());
    }

    #[test]
    fn test_assigned_tonnage_sums_quantities() {
        let s = Solution::new(
            vec![assignment(1, 40_000), assignment(2, 35_000)],
            Fitness::zero(),
        );
        assert_eq!(s.assigned_tonnage(), Tons::new(75_000));
    }

    #[test]
    fn test_find_by_vessel() {
        let s = Solution::new(
            vec![assignment(1, 40_000), assignment(2, 35_000)],
            Fitness::zero(),
        );
        assert_eq!(
            s.find(VesselIdentifier::new(2)).unwrap().quantity(),
            Tons::new(35_000)
        );
        assert!(s.find(VesselIdentifier::new(9)).is_none());
    }

    #[test]
    fn test_with_fitness_replaces_fitness() {
        let s = Solution::new(vec![assignment(1, 10_000)], Fitness::zero())
            .with_fitness(Fitness::new(500.0, 0.0));
        assert_eq!(s.fitness().total(), 500.0);
    }
}
