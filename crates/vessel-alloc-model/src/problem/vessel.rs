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
    common::{Identifier, IdentifierMarkerName, Material},
    problem::err::{NegativeValueError, NonPositiveTonnageError, RecordError},
};
use chrono::NaiveDate;
use std::collections::HashMap;
use vessel_alloc_core::prelude::{Money, Tons};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VesselIdentifierMarker;

impl IdentifierMarkerName for VesselIdentifierMarker {
    const NAME: &'static str = "VesselId";
}

pub type VesselIdentifier = Identifier<u32, VesselIdentifierMarker>;

/// An inbound vessel carrying a single cargo grade.
///
/// `laydays` is the contractual allowance in days before demurrage
/// accrues; `demurrage_rate` is charged per day beyond it.
#[derive(Debug, Clone, PartialEq)]
pub struct Vessel {
    id: VesselIdentifier,
    name: String,
    cargo: Material,
    capacity: Tons,
    eta: NaiveDate,
    laydays: f64,
    demurrage_rate: Money,
    origin: String,
}

impl Vessel {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: VesselIdentifier,
        name: impl Into<String>,
        cargo: Material,
        capacity: Tons,
        eta: NaiveDate,
        laydays: f64,
        demurrage_rate: Money,
        origin: impl Into<String>,
    ) -> Result<Self, RecordError> {
        if !capacity.is_positive() {
            return Err(NonPositiveTonnageError::new("vessel capacity", capacity).into());
        }
        if !laydays.is_finite() || laydays < 0.0 {
            return Err(NegativeValueError::new("vessel laydays", laydays).into());
        }
        if !demurrage_rate.is_finite() || demurrage_rate < 0.0 {
            return Err(NegativeValueError::new("vessel demurrage rate", demurrage_rate).into());
        }
        Ok(Self {
            id,
            name: name.into(),
            cargo,
            capacity,
            eta,
            laydays,
            demurrage_rate,
            origin: origin.into(),
        })
    }

    #[inline]
    pub fn id(&self) -> VesselIdentifier {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn cargo(&self) -> Material {
        self.cargo
    }

    #[inline]
    pub fn capacity(&self) -> Tons {
        self.capacity
    }

    #[inline]
    pub fn eta(&self) -> NaiveDate {
        self.eta
    }

    #[inline]
    pub fn laydays(&self) -> f64 {
        self.laydays
    }

    #[inline]
    pub fn demurrage_rate(&self) -> Money {
        self.demurrage_rate
    }

    #[inline]
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct VesselContainer(HashMap<VesselIdentifier, Vessel>);

impl Default for VesselContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl VesselContainer {
    #[inline]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self(HashMap::with_capacity(cap))
    }

    #[inline]
    pub fn insert(&mut self, vessel: Vessel) -> Option<Vessel> {
        self.0.insert(vessel.id(), vessel)
    }

    #[inline]
    pub fn remove(&mut self, id: VesselIdentifier) -> Option<Vessel> {
        self.0.remove(&id)
    }

    #[inline]
    pub fn contains_id(&self, id: VesselIdentifier) -> bool {
        self.0.contains_key(&id)
    }

    #[inline]
    pub fn get(&self, id: VesselIdentifier) -> Option<&Vessel> {
        self.0.get(&id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Vessel> {
        self.0.values()
    }
}

impl FromIterator<Vessel> for VesselContainer {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Vessel>>(iter: I) -> Self {
        let mut c = Self::new();
        for v in iter {
            c.insert(v);
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn vid(n: u32) -> VesselIdentifier {
        VesselIdentifier::new(n)
    }

    #[inline]
    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    #[inline]
    fn vessel(n: u32, capacity: i64) -> Vessel {
        Vessel::new(
            vid(n),
            format!("MV Test {n}"),
            Material::IronOre,
            Tons::new(capacity),
            date(1),
            3.0,
            12_000.0,
            "Port Hedland",
        )
        .unwrap()
    }

    #[test]
    fn test_new_valid_vessel() {
        let v = vessel(1, 75_000);
        assert_eq!(v.id(), vid(1));
        assert_eq!(v.capacity(), Tons::new(75_000));
        assert_eq!(v.cargo(), Material::IronOre);
        assert_eq!(v.laydays(), 3.0);
        assert_eq!(v.origin(), "Port Hedland");
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Vessel::new(
            vid(1),
            "MV Empty",
            Material::IronOre,
            Tons::new(0),
            date(1),
            3.0,
            12_000.0,
            "Dampier",
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::NonPositiveTonnage(_)));
    }

    #[test]
    fn test_negative_laydays_rejected() {
        let err = Vessel::new(
            vid(1),
            "MV Odd",
            Material::Limestone,
            Tons::new(10_000),
            date(1),
            -1.0,
            12_000.0,
            "Fujairah",
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::NegativeValue(_)));
    }

    #[test]
    fn test_negative_demurrage_rejected() {
        let err = Vessel::new(
            vid(1),
            "MV Odd",
            Material::Limestone,
            Tons::new(10_000),
            date(1),
            1.0,
            -5.0,
            "Fujairah",
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::NegativeValue(_)));
    }

    #[test]
    fn test_container_insert_get_remove() {
        let mut c = VesselContainer::new();
        assert!(c.is_empty());
        c.insert(vessel(1, 50_000));
        c.insert(vessel(2, 60_000));
        assert_eq!(c.len(), 2);
        assert!(c.contains_id(vid(1)));
        assert_eq!(c.get(vid(2)).unwrap().capacity(), Tons::new(60_000));
        assert!(c.remove(vid(1)).is_some());
        assert!(!c.contains_id(vid(1)));
    }

    #[test]
    fn test_container_insert_same_id_replaces() {
        let mut c = VesselContainer::new();
        c.insert(vessel(1, 50_000));
        let old = c.insert(vessel(1, 80_000));
        assert_eq!(old.unwrap().capacity(), Tons::new(50_000));
        assert_eq!(c.len(), 1);
        assert_eq!(c.get(vid(1)).unwrap().capacity(), Tons::new(80_000));
    }

    #[test]
    fn test_container_from_iterator() {
        let c: VesselContainer = (1..=3).map(|n| vessel(n, 40_000)).collect();
        assert_eq!(c.len(), 3);
    }
}
