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
    err::{ProblemError, RoutePlantNotFoundError, RoutePortNotFoundError},
    history::DelayHistory,
    plant::PlantContainer,
    port::PortContainer,
    route::RouteContainer,
    tariff::TariffBook,
    vessel::VesselContainer,
};
use vessel_alloc_core::prelude::Tons;

/// An immutable allocation scenario.
///
/// Construction guarantees that every route endpoint resolves to a known
/// port and plant. Tariff entries and delay records are deliberately not
/// cross-checked here: a stale reference in those feeds must only void
/// the record itself, which the consumers handle locally.
#[derive(Debug, Clone)]
pub struct Problem {
    vessels: VesselContainer,
    ports: PortContainer,
    plants: PlantContainer,
    routes: RouteContainer,
    tariffs: TariffBook,
    history: DelayHistory,
}

impl Problem {
    pub fn new(
        vessels: VesselContainer,
        ports: PortContainer,
        plants: PlantContainer,
        routes: RouteContainer,
        tariffs: TariffBook,
        history: DelayHistory,
    ) -> Result<Self, ProblemError> {
        for route in routes.iter() {
            if !ports.contains_id(route.port()) {
                return Err(RoutePortNotFoundError::new(route.id(), route.port()).into());
            }
            if !plants.contains_id(route.plant()) {
                return Err(RoutePlantNotFoundError::new(route.id(), route.plant()).into());
            }
        }
        Ok(Self {
            vessels,
            ports,
            plants,
            routes,
            tariffs,
            history,
        })
    }

    #[inline]
    pub fn vessels(&self) -> &VesselContainer {
        &self.vessels
    }

    #[inline]
    pub fn ports(&self) -> &PortContainer {
        &self.ports
    }

    #[inline]
    pub fn plants(&self) -> &PlantContainer {
        &self.plants
    }

    #[inline]
    pub fn routes(&self) -> &RouteContainer {
        &self.routes
    }

    #[inline]
    pub fn tariffs(&self) -> &TariffBook {
        &self.tariffs
    }

    #[inline]
    pub fn history(&self) -> &DelayHistory {
        &self.history
    }

    /// Combined stockyard capacity over all ports.
    #[inline]
    pub fn total_port_capacity(&self) -> Tons {
        self.ports.iter().map(|p| p.max_capacity()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::Material,
        problem::{
            plant::{Plant, PlantIdentifier},
            port::{Port, PortIdentifier},
            route::{Route, RouteIdentifier},
        },
    };

    #[inline]
    fn port(n: u32) -> Port {
        Port::new(
            PortIdentifier::new(n),
            format!("Port {n}"),
            Tons::new(100_000),
            Tons::new(10_000),
            5.0,
            0.5,
            Tons::new(20_000),
        )
        .unwrap()
    }

    #[inline]
    fn plant(n: u32) -> Plant {
        Plant::new(
            PlantIdentifier::new(n),
            format!("Plant {n}"),
            Material::IronOre,
            Tons::new(150_000),
            Tons::new(20_000),
            true,
        )
        .unwrap()
    }

    #[inline]
    fn route(n: u32, port: u32, plant: u32) -> Route {
        Route::new(
            RouteIdentifier::new(n),
            PortIdentifier::new(port),
            PlantIdentifier::new(plant),
            3.0,
            2,
            Tons::new(80_000),
        )
        .unwrap()
    }

    #[test]
    fn test_new_accepts_consistent_routes() {
        let problem = Problem::new(
            VesselContainer::new(),
            vec![port(1), port(2)].into_iter().collect(),
            vec![plant(1)].into_iter().collect(),
            vec![route(1, 1, 1), route(2, 2, 1)].into_iter().collect(),
            TariffBook::new(),
            DelayHistory::new(),
        );
        assert!(problem.is_ok());
    }

    #[test]
    fn test_new_rejects_route_with_unknown_port() {
        let err = Problem::new(
            VesselContainer::new(),
            vec![port(1)].into_iter().collect(),
            vec![plant(1)].into_iter().collect(),
            vec![route(1, 9, 1)].into_iter().collect(),
            TariffBook::new(),
            DelayHistory::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ProblemError::RoutePortNotFound(_)));
    }

    #[test]
    fn test_new_rejects_route_with_unknown_plant() {
        let err = Problem::new(
            VesselContainer::new(),
            vec![port(1)].into_iter().collect(),
            vec![plant(1)].into_iter().collect(),
            vec![route(1, 1, 9)].into_iter().collect(),
            TariffBook::new(),
            DelayHistory::new(),
        )
        .unwrap_err();
        assert!(matches!(err, ProblemError::RoutePlantNotFound(_)));
    }

    #[test]
    fn test_total_port_capacity_sums_all_ports() {
        let problem = Problem::new(
            VesselContainer::new(),
            vec![port(1), port(2)].into_iter().collect(),
            PlantContainer::new(),
            RouteContainer::new(),
            TariffBook::new(),
            DelayHistory::new(),
        )
        .unwrap();
        assert_eq!(problem.total_port_capacity(), Tons::new(200_000));
    }
}
