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
    common::{Identifier, IdentifierMarkerName},
    problem::err::{NegativeTonnageError, NegativeValueError, NonPositiveTonnageError, RecordError},
};
use std::collections::HashMap;
use vessel_alloc_core::prelude::{Money, Tons};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortIdentifierMarker;

impl IdentifierMarkerName for PortIdentifierMarker {
    const NAME: &'static str = "PortId";
}

pub type PortIdentifier = Identifier<u32, PortIdentifierMarker>;

/// A discharge port with stockyard capacity and per-ton cost rates.
///
/// `handling_cost` is charged per ton discharged, `storage_cost` per ton
/// and day of dwell. `discharge_rate` caps how many tons leave a vessel
/// per day and therefore determines the dwell time of a shipment.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    id: PortIdentifier,
    name: String,
    max_capacity: Tons,
    current_stock: Tons,
    handling_cost: Money,
    storage_cost: Money,
    discharge_rate: Tons,
}

impl Port {
    pub fn new(
        id: PortIdentifier,
        name: impl Into<String>,
        max_capacity: Tons,
        current_stock: Tons,
        handling_cost: Money,
        storage_cost: Money,
        discharge_rate: Tons,
    ) -> Result<Self, RecordError> {
        if !max_capacity.is_positive() {
            return Err(NonPositiveTonnageError::new("port capacity", max_capacity).into());
        }
        if current_stock < Tons::zero() {
            return Err(NegativeTonnageError::new("port stock", current_stock).into());
        }
        if !discharge_rate.is_positive() {
            return Err(NonPositiveTonnageError::new("port discharge rate", discharge_rate).into());
        }
        if !handling_cost.is_finite() || handling_cost < 0.0 {
            return Err(NegativeValueError::new("port handling cost", handling_cost).into());
        }
        if !storage_cost.is_finite() || storage_cost < 0.0 {
            return Err(NegativeValueError::new("port storage cost", storage_cost).into());
        }
        Ok(Self {
            id,
            name: name.into(),
            max_capacity,
            current_stock,
            handling_cost,
            storage_cost,
            discharge_rate,
        })
    }

    #[inline]
    pub fn id(&self) -> PortIdentifier {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn max_capacity(&self) -> Tons {
        self.max_capacity
    }

    #[inline]
    pub fn current_stock(&self) -> Tons {
        self.current_stock
    }

    #[inline]
    pub fn handling_cost(&self) -> Money {
        self.handling_cost
    }

    #[inline]
    pub fn storage_cost(&self) -> Money {
        self.storage_cost
    }

    #[inline]
    pub fn discharge_rate(&self) -> Tons {
        self.discharge_rate
    }

    /// Free stockyard tonnage before new shipments are considered.
    #[inline]
    pub fn headroom(&self) -> Tons {
        self.max_capacity.saturating_sub(self.current_stock)
    }

    /// Fraction of the stockyard already occupied, in `0.0..=1.0`.
    #[inline]
    pub fn utilization(&self) -> f64 {
        (self.current_stock.to_f64() / self.max_capacity.to_f64()).clamp(0.0, 1.0)
    }

    /// Days a shipment of `quantity` occupies the berth, at least one.
    #[inline]
    pub fn dwell_days_for(&self, quantity: Tons) -> u32 {
        // Both operands are non-negative (rate validated positive), so the
        // stable unsigned `div_ceil` is exact; signed `div_ceil` is unstable.
        (quantity.value().max(0) as u64)
            .div_ceil(self.discharge_rate.value() as u64)
            .max(1) as u32
    }
}

#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct PortContainer(HashMap<PortIdentifier, Port>);

impl Default for PortContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl PortContainer {
    #[inline]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self(HashMap::with_capacity(cap))
    }

    #[inline]
    pub fn insert(&mut self, port: Port) -> Option<Port> {
        self.0.insert(port.id(), port)
    }

    #[inline]
    pub fn remove(&mut self, id: PortIdentifier) -> Option<Port> {
        self.0.remove(&id)
    }

    #[inline]
    pub fn contains_id(&self, id: PortIdentifier) -> bool {
        self.0.contains_key(&id)
    }

    #[inline]
    pub fn get(&self, id: PortIdentifier) -> Option<&Port> {
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
    pub fn iter(&self) -> impl Iterator<Item = &Port> {
        self.0.values()
    }
}

impl FromIterator<Port> for PortContainer {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Port>>(iter: I) -> Self {
        let mut c = Self::new();
        for p in iter {
            c.insert(p);
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn pid(n: u32) -> PortIdentifier {
        PortIdentifier::new(n)
    }

    #[inline]
    fn port(n: u32, max: i64, stock: i64, rate: i64) -> Port {
        Port::new(
            pid(n),
            format!("Port {n}"),
            Tons::new(max),
            Tons::new(stock),
            5.0,
            0.5,
            Tons::new(rate),
        )
        .unwrap()
    }

    #[test]
    fn test_new_valid_port() {
        let p = port(1, 120_000, 30_000, 25_000);
        assert_eq!(p.id(), pid(1));
        assert_eq!(p.headroom(), Tons::new(90_000));
        assert_eq!(p.utilization(), 0.25);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Port::new(
            pid(1),
            "Bad",
            Tons::new(0),
            Tons::new(0),
            1.0,
            1.0,
            Tons::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::NonPositiveTonnage(_)));
    }

    #[test]
    fn test_negative_stock_rejected() {
        let err = Port::new(
            pid(1),
            "Bad",
            Tons::new(10),
            Tons::new(-1),
            1.0,
            1.0,
            Tons::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::NegativeTonnage(_)));
    }

    #[test]
    fn test_negative_rate_rejected() {
        let err = Port::new(
            pid(1),
            "Bad",
            Tons::new(10),
            Tons::new(0),
            -1.0,
            1.0,
            Tons::new(1),
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::NegativeValue(_)));
    }

    #[test]
    fn test_headroom_saturates_at_zero() {
        let p = port(1, 50_000, 50_000, 10_000);
        assert_eq!(p.headroom(), Tons::new(0));
    }

    #[test]
    fn test_dwell_days_rounds_up() {
        let p = port(1, 120_000, 0, 25_000);
        assert_eq!(p.dwell_days_for(Tons::new(25_000)), 1);
        assert_eq!(p.dwell_days_for(Tons::new(25_001)), 2);
        assert_eq!(p.dwell_days_for(Tons::new(75_000)), 3);
    }

    #[test]
    fn test_dwell_days_is_at_least_one() {
        let p = port(1, 120_000, 0, 25_000);
        assert_eq!(p.dwell_days_for(Tons::new(1)), 1);
    }

    #[test]
    fn test_container_roundtrip() {
        let mut c = PortContainer::new();
        c.insert(port(1, 100_000, 0, 20_000));
        c.insert(port(2, 80_000, 10_000, 15_000));
        assert_eq!(c.len(), 2);
        assert!(c.contains_id(pid(2)));
        assert!(c.remove(pid(1)).is_some());
        assert_eq!(c.len(), 1);
    }
}
