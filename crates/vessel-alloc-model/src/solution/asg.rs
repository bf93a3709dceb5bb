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
    problem::{
        plant::PlantIdentifier, port::PortIdentifier, route::Route, route::RouteIdentifier,
        vessel::Vessel, vessel::VesselIdentifier,
    },
    solution::err::{
        AssignmentError, NonPositiveQuantityError, RouteOverloadError, VesselOverloadError,
    },
};
use vessel_alloc_core::prelude::{Money, Tons};

/// Per-component cost of one shipment.
///
/// `total` is fixed at construction as the sum of the five components,
/// and the fields are immutable afterwards, so the two can never drift
/// apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    ocean: Money,
    handling: Money,
    storage: Money,
    rail: Money,
    demurrage: Money,
    total: Money,
}

impl CostBreakdown {
    #[inline]
    pub const fn new(
        ocean: Money,
        handling: Money,
        storage: Money,
        rail: Money,
        demurrage: Money,
    ) -> Self {
        Self {
            ocean,
            handling,
            storage,
            rail,
            demurrage,
            total: ocean + handling + storage + rail + demurrage,
        }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn ocean(&self) -> Money {
        self.ocean
    }

    #[inline]
    pub fn handling(&self) -> Money {
        self.handling
    }

    #[inline]
    pub fn storage(&self) -> Money {
        self.storage
    }

    #[inline]
    pub fn rail(&self) -> Money {
        self.rail
    }

    #[inline]
    pub fn demurrage(&self) -> Money {
        self.demurrage
    }

    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }
}

/// One planned shipment: a vessel discharges `quantity` at a port and the
/// cargo moves by rail to a plant.
///
/// Only identifiers are stored, so copies stay cheap while search
/// algorithms clone solutions freely. The cost breakdown is derived data
/// attached for reporting; it never participates in equality.
#[derive(Debug, Clone)]
pub struct Assignment {
    vessel: VesselIdentifier,
    route: RouteIdentifier,
    port: PortIdentifier,
    plant: PlantIdentifier,
    quantity: Tons,
    dwell_days: u32,
    predicted_delay_days: f64,
    breakdown: Option<CostBreakdown>,
}

impl Assignment {
    /// Builds a shipment of `quantity` for `vessel` over `route`.
    ///
    /// The quantity must be positive and neither exceed the vessel's
    /// capacity nor the route's shipment cap.
    pub fn new(
        vessel: &Vessel,
        route: &Route,
        quantity: Tons,
        dwell_days: u32,
        predicted_delay_days: f64,
    ) -> Result<Self, AssignmentError> {
        if !quantity.is_positive() {
            return Err(NonPositiveQuantityError::new(vessel.id(), quantity).into());
        }
        if quantity > vessel.capacity() {
            return Err(VesselOverloadError::new(vessel.id(), quantity, vessel.capacity()).into());
        }
        if quantity > route.max_shipment() {
            return Err(
                RouteOverloadError::new(route.id(), quantity, route.max_shipment()).into(),
            );
        }
        Ok(Self {
            vessel: vessel.id(),
            route: route.id(),
            port: route.port(),
            plant: route.plant(),
            quantity,
            dwell_days,
            predicted_delay_days,
            breakdown: None,
        })
    }

    #[inline]
    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }

    #[inline]
    pub fn route(&self) -> RouteIdentifier {
        self.route
    }

    #[inline]
    pub fn port(&self) -> PortIdentifier {
        self.port
    }

    #[inline]
    pub fn plant(&self) -> PlantIdentifier {
        self.plant
    }

    #[inline]
    pub fn quantity(&self) -> Tons {
        self.quantity
    }

    #[inline]
    pub fn dwell_days(&self) -> u32 {
        self.dwell_days
    }

    #[inline]
    pub fn predicted_delay_days(&self) -> f64 {
        self.predicted_delay_days
    }

    #[inline]
    pub fn breakdown(&self) -> Option<CostBreakdown> {
        self.breakdown
    }

    #[inline]
    pub fn with_breakdown(mut self, breakdown: CostBreakdown) -> Self {
        self.breakdown = Some(breakdown);
        self
    }
}

impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        self.vessel == other.vessel
            && self.route == other.route
            && self.quantity == other.quantity
            && self.dwell_days == other.dwell_days
            && self.predicted_delay_days == other.predicted_delay_days
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} -> {} ({})",
            self.vessel, self.port, self.plant, self.quantity
        )
    }
}
