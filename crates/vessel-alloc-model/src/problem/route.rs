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
    problem::{
        err::{NegativeValueError, NonPositiveTonnageError, RecordError},
        plant::PlantIdentifier,
        port::PortIdentifier,
    },
};
use std::collections::HashMap;
use vessel_alloc_core::prelude::{Money, Tons};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteIdentifierMarker;

impl IdentifierMarkerName for RouteIdentifierMarker {
    const NAME: &'static str = "RouteId";
}

pub type RouteIdentifier = Identifier<u32, RouteIdentifierMarker>;

/// A rail corridor from a discharge port to a consuming plant.
///
/// `max_shipment` caps the tonnage a single shipment may move over this
/// corridor, independent of vessel size.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    id: RouteIdentifier,
    port: PortIdentifier,
    plant: PlantIdentifier,
    rail_cost: Money,
    travel_days: u32,
    max_shipment: Tons,
}

impl Route {
    pub fn new(
        id: RouteIdentifier,
        port: PortIdentifier,
        plant: PlantIdentifier,
        rail_cost: Money,
        travel_days: u32,
        max_shipment: Tons,
    ) -> Result<Self, RecordError> {
        if !rail_cost.is_finite() || rail_cost < 0.0 {
            return Err(NegativeValueError::new("route rail cost", rail_cost).into());
        }
        if !max_shipment.is_positive() {
            return Err(NonPositiveTonnageError::new("route shipment cap", max_shipment).into());
        }
        Ok(Self {
            id,
            port,
            plant,
            rail_cost,
            travel_days,
            max_shipment,
        })
    }

    #[inline]
    pub fn id(&self) -> RouteIdentifier {
        self.id
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
    pub fn rail_cost(&self) -> Money {
        self.rail_cost
    }

    #[inline]
    pub fn travel_days(&self) -> u32 {
        self.travel_days
    }

    #[inline]
    pub fn max_shipment(&self) -> Tons {
        self.max_shipment
    }

    #[inline]
    pub fn connects(&self, port: PortIdentifier, plant: PlantIdentifier) -> bool {
        self.port == port && self.plant == plant
    }
}

#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct RouteContainer(HashMap<RouteIdentifier, Route>);

impl Default for RouteContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteContainer {
    #[inline]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self(HashMap::with_capacity(cap))
    }

    #[inline]
    pub fn insert(&mut self, route: Route) -> Option<Route> {
        self.0.insert(route.id(), route)
    }

    #[inline]
    pub fn remove(&mut self, id: RouteIdentifier) -> Option<Route> {
        self.0.remove(&id)
    }

    #[inline]
    pub fn contains_id(&self, id: RouteIdentifier) -> bool {
        self.0.contains_key(&id)
    }

    #[inline]
    pub fn get(&self, id: RouteIdentifier) -> Option<&Route> {
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
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.0.values()
    }

    #[inline]
    pub fn find_connecting(
        &self,
        port: PortIdentifier,
        plant: PlantIdentifier,
    ) -> Option<&Route> {
        self.iter().find(|r| r.connects(port, plant))
    }
}

impl FromIterator<Route> for RouteContainer {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        let mut c = Self::new();
        for r in iter {
            c.insert(r);
        }
        c
    }
}
