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

use crate::problem::{
    err::{NegativeValueError, RecordError},
    port::PortIdentifier,
};
use chrono::NaiveDate;
use vessel_alloc_core::prelude::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CostType {
    OceanFreight,
    Handling,
    Storage,
    Other,
}

impl std::fmt::Display for CostType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CostType::OceanFreight => write!(f, "OceanFreight"),
            CostType::Handling => write!(f, "Handling"),
            CostType::Storage => write!(f, "Storage"),
            CostType::Other => write!(f, "Other"),
        }
    }
}

/// Where a tariff entry applies.
///
/// Port-scoped entries shadow global ones when both match a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateScope {
    Global,
    Port(PortIdentifier),
}

impl std::fmt::Display for RateScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateScope::Global => write!(f, "Global"),
            RateScope::Port(p) => write!(f, "{}", p),
        }
    }
}

/// A single tariff line: a per-ton rate of one cost type, valid from its
/// effective date.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEntry {
    cost_type: CostType,
    scope: RateScope,
    value: Money,
    currency: String,
    effective: NaiveDate,
}

impl CostEntry {
    pub fn new(
        cost_type: CostType,
        scope: RateScope,
        value: Money,
        currency: impl Into<String>,
        effective: NaiveDate,
    ) -> Result<Self, RecordError> {
        if !value.is_finite() || value < 0.0 {
            return Err(NegativeValueError::new("tariff rate", value).into());
        }
        Ok(Self {
            cost_type,
            scope,
            value,
            currency: currency.into(),
            effective,
        })
    }

    #[inline]
    pub fn cost_type(&self) -> CostType {
        self.cost_type
    }

    #[inline]
    pub fn scope(&self) -> RateScope {
        self.scope
    }

    #[inline]
    pub fn value(&self) -> Money {
        self.value
    }

    #[inline]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    #[inline]
    pub fn effective(&self) -> NaiveDate {
        self.effective
    }

    #[inline]
    pub fn applies_to(&self, port: PortIdentifier) -> bool {
        match self.scope {
            RateScope::Global => true,
            RateScope::Port(p) => p == port,
        }
    }
}

/// The tariff entries of a scenario, queried by cost type and port.
#[repr(transparent)]
#[derive(Debug, Clone, Default)]
pub struct TariffBook(Vec<CostEntry>);

impl TariffBook {
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn push(&mut self, entry: CostEntry) {
        self.0.push(entry);
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
    pub fn iter(&self) -> impl Iterator<Item = &CostEntry> {
        self.0.iter()
    }

    /// Resolves the applicable rate for `cost_type` at `port`.
    ///
    /// Port-scoped entries take precedence over global ones; within a
    /// scope the entry with the latest effective date wins.
    pub fn resolve(&self, cost_type: CostType, port: PortIdentifier) -> Option<Money> {
        let latest = |scoped: bool| {
            self.0
                .iter()
                .filter(|e| e.cost_type() == cost_type)
                .filter(|e| match e.scope() {
                    RateScope::Port(p) => scoped && p == port,
                    RateScope::Global => !scoped,
                })
                .max_by_key(|e| e.effective())
                .map(|e| e.value())
        };
        latest(true).or_else(|| latest(false))
    }

    /// Shorthand for the ocean freight base rate at `port`.
    #[inline]
    pub fn ocean_rate_for(&self, port: PortIdentifier) -> Option<Money> {
        self.resolve(CostType::OceanFreight, port)
    }
}

impl FromIterator<CostEntry> for TariffBook {
    #[inline]
    fn from_iter<I: IntoIterator<Item = CostEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
