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
    common::Material,
    problem::{
        plant::PlantIdentifier, port::PortIdentifier, prob::Problem, route::Route,
        route::RouteIdentifier, vessel::Vessel, vessel::VesselIdentifier,
    },
    solution::asg::Assignment,
};
use std::collections::BTreeMap;
use vessel_alloc_core::prelude::Tons;

/// The tonnage a shipment of `vessel` over `route` would move: the whole
/// cargo, capped by the route's shipment limit.
#[inline]
pub fn planned_quantity(vessel: &Vessel, route: &Route) -> Tons {
    vessel.capacity().min(route.max_shipment())
}

/// A broken allocation constraint, attributable to one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeasibilityViolation {
    UnknownVessel(VesselIdentifier),
    UnknownPort(PortIdentifier),
    UnknownPlant(PlantIdentifier),
    UnknownRoute(RouteIdentifier),
    MaterialMismatch {
        plant: PlantIdentifier,
        required: Material,
        offered: Material,
    },
    PlantNotRailConnected {
        plant: PlantIdentifier,
    },
    VesselOverCapacity {
        vessel: VesselIdentifier,
        quantity: Tons,
        capacity: Tons,
    },
    RouteOverCapacity {
        route: RouteIdentifier,
        quantity: Tons,
        max_shipment: Tons,
    },
    PortOverCapacity {
        port: PortIdentifier,
        load: Tons,
        headroom: Tons,
    },
    PlantOverCapacity {
        plant: PlantIdentifier,
        load: Tons,
        headroom: Tons,
    },
}

impl std::fmt::Display for FeasibilityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeasibilityViolation::UnknownVessel(id) => write!(f, "Unknown vessel {}", id),
            FeasibilityViolation::UnknownPort(id) => write!(f, "Unknown port {}", id),
            FeasibilityViolation::UnknownPlant(id) => write!(f, "Unknown plant {}", id),
            FeasibilityViolation::UnknownRoute(id) => write!(f, "Unknown route {}", id),
            FeasibilityViolation::MaterialMismatch {
                plant,
                required,
                offered,
            } => write!(
                f,
                "Plant {} requires {}, but {} was offered",
                plant, required, offered
            ),
            FeasibilityViolation::PlantNotRailConnected { plant } => {
                write!(f, "Plant {} has no rail connection", plant)
            }
            FeasibilityViolation::VesselOverCapacity {
                vessel,
                quantity,
                capacity,
            } => write!(
                f,
                "Vessel {} ships {} beyond its capacity {}",
                vessel, quantity, capacity
            ),
            FeasibilityViolation::RouteOverCapacity {
                route,
                quantity,
                max_shipment,
            } => write!(
                f,
                "Route {} moves {} beyond its cap {}",
                route, quantity, max_shipment
            ),
            FeasibilityViolation::PortOverCapacity {
                port,
                load,
                headroom,
            } => write!(
                f,
                "Port {} receives {} with only {} of headroom",
                port, load, headroom
            ),
            FeasibilityViolation::PlantOverCapacity {
                plant,
                load,
                headroom,
            } => write!(
                f,
                "Plant {} receives {} with only {} of headroom",
                plant, load, headroom
            ),
        }
    }
}

/// Checks vessel/route pairings and whole plans against a problem.
///
/// This is the single authority on feasibility. The search layers derive
/// both their candidate index and their penalty terms from the same
/// rules enforced here.
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityChecker<'p> {
    problem: &'p Problem,
}

impl<'p> FeasibilityChecker<'p> {
    #[inline]
    pub fn new(problem: &'p Problem) -> Self {
        Self { problem }
    }

    #[inline]
    pub fn problem(&self) -> &'p Problem {
        self.problem
    }

    /// Checks whether routing `vessel` over `route` is feasible on an
    /// otherwise empty plan. Returns the first broken constraint.
    pub fn check_pair(&self, vessel: &Vessel, route: &Route) -> Result<(), FeasibilityViolation> {
        let Some(port) = self.problem.ports().get(route.port()) else {
            return Err(FeasibilityViolation::UnknownPort(route.port()));
        };
        let Some(plant) = self.problem.plants().get(route.plant()) else {
            return Err(FeasibilityViolation::UnknownPlant(route.plant()));
        };
        if !plant.accepts(vessel.cargo()) {
            return Err(FeasibilityViolation::MaterialMismatch {
                plant: plant.id(),
                required: plant.required_material(),
                offered: vessel.cargo(),
            });
        }
        if !plant.rail_connected() {
            return Err(FeasibilityViolation::PlantNotRailConnected { plant: plant.id() });
        }
        let quantity = planned_quantity(vessel, route);
        if quantity > port.headroom() {
            return Err(FeasibilityViolation::PortOverCapacity {
                port: port.id(),
                load: quantity,
                headroom: port.headroom(),
            });
        }
        if quantity > plant.headroom() {
            return Err(FeasibilityViolation::PlantOverCapacity {
                plant: plant.id(),
                load: quantity,
                headroom: plant.headroom(),
            });
        }
        Ok(())
    }

    /// Sweeps a plan and reports every broken constraint.
    ///
    /// Per-shipment violations come first in plan order, followed by
    /// port and plant overloads in identifier order.
    pub fn violations(&self, assignments: &[Assignment]) -> Vec<FeasibilityViolation> {
        let mut out = Vec::new();
        let mut port_load: BTreeMap<PortIdentifier, Tons> = BTreeMap::new();
        let mut plant_load: BTreeMap<PlantIdentifier, Tons> = BTreeMap::new();

        for asg in assignments {
            let vessel = match self.problem.vessels().get(asg.vessel()) {
                Some(v) => v,
                None => {
                    out.push(FeasibilityViolation::UnknownVessel(asg.vessel()));
                    continue;
                }
            };
            match self.problem.routes().get(asg.route()) {
                Some(route) if asg.quantity() > route.max_shipment() => {
                    out.push(FeasibilityViolation::RouteOverCapacity {
                        route: route.id(),
                        quantity: asg.quantity(),
                        max_shipment: route.max_shipment(),
                    });
                }
                Some(_) => {}
                None => out.push(FeasibilityViolation::UnknownRoute(asg.route())),
            }
            if asg.quantity() > vessel.capacity() {
                out.push(FeasibilityViolation::VesselOverCapacity {
                    vessel: vessel.id(),
                    quantity: asg.quantity(),
                    capacity: vessel.capacity(),
                });
            }
            match self.problem.plants().get(asg.plant()) {
                Some(plant) => {
                    if !plant.accepts(vessel.cargo()) {
                        out.push(FeasibilityViolation::MaterialMismatch {
                            plant: plant.id(),
                            required: plant.required_material(),
                            offered: vessel.cargo(),
                        });
                    }
                    if !plant.rail_connected() {
                        out.push(FeasibilityViolation::PlantNotRailConnected {
                            plant: plant.id(),
                        });
                    }
                    *plant_load.entry(plant.id()).or_insert_with(Tons::zero) += asg.quantity();
                }
                None => out.push(FeasibilityViolation::UnknownPlant(asg.plant())),
            }
            if self.problem.ports().contains_id(asg.port()) {
                *port_load.entry(asg.port()).or_insert_with(Tons::zero) += asg.quantity();
            } else {
                out.push(FeasibilityViolation::UnknownPort(asg.port()));
            }
        }

        for (port_id, load) in port_load {
            // Lookup is infallible here, unknown ports never enter the map.
            if let Some(port) = self.problem.ports().get(port_id) {
                if load > port.headroom() {
                    out.push(FeasibilityViolation::PortOverCapacity {
                        port: port_id,
                        load,
                        headroom: port.headroom(),
                    });
                }
            }
        }
        for (plant_id, load) in plant_load {
            if let Some(plant) = self.problem.plants().get(plant_id) {
                if load > plant.headroom() {
                    out.push(FeasibilityViolation::PlantOverCapacity {
                        plant: plant_id,
                        load,
                        headroom: plant.headroom(),
                    });
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{
        history::DelayHistory,
        plant::{Plant, PlantContainer},
        port::{Port, PortContainer},
        route::RouteContainer,
        tariff::TariffBook,
        vessel::VesselContainer,
    };
    use chrono::NaiveDate;

    #[inline]
    fn vessel(n: u32, material: Material, capacity: i64) -> Vessel {
        Vessel::new(
            VesselIdentifier::new(n),
            format!("MV {n}"),
            material,
            Tons::new(capacity),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            2.0,
            10_000.0,
            "Richards Bay",
        )
        .unwrap()
    }

    #[inline]
    fn port(n: u32, max: i64, stock: i64) -> Port {
        Port::new(
            PortIdentifier::new(n),
            format!("Port {n}"),
            Tons::new(max),
            Tons::new(stock),
            4.0,
            0.4,
            Tons::new(25_000),
        )
        .unwrap()
    }

    #[inline]
    fn plant(n: u32, material: Material, max: i64, rail: bool) -> Plant {
        Plant::new(
            PlantIdentifier::new(n),
            format!("Plant {n}"),
            material,
            Tons::new(max),
            Tons::new(0),
            rail,
        )
        .unwrap()
    }

    #[inline]
    fn route(n: u32, port: u32, plant: u32, cap: i64) -> Route {
        Route::new(
            RouteIdentifier::new(n),
            PortIdentifier::new(port),
            PlantIdentifier::new(plant),
            3.0,
            2,
            Tons::new(cap),
        )
        .unwrap()
    }

    fn problem() -> Problem {
        Problem::new(
            vec![vessel(1, Material::IronOre, 60_000)]
                .into_iter()
                .collect::<VesselContainer>(),
            vec![port(1, 100_000, 20_000), port(2, 50_000, 45_000)]
                .into_iter()
                .collect::<PortContainer>(),
            vec![
                plant(1, Material::IronOre, 150_000, true),
                plant(2, Material::CokingCoal, 150_000, true),
                plant(3, Material::IronOre, 150_000, false),
            ]
            .into_iter()
            .collect::<PlantContainer>(),
            vec![
                route(1, 1, 1, 80_000),
                route(2, 2, 1, 80_000),
                route(3, 1, 2, 80_000),
                route(4, 1, 3, 80_000),
            ]
            .into_iter()
            .collect::<RouteContainer>(),
            TariffBook::new(),
            DelayHistory::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_planned_quantity_is_capped_by_route() {
        let v = vessel(1, Material::IronOre, 60_000);
        let r = route(1, 1, 1, 40_000);
        assert_eq!(planned_quantity(&v, &r), Tons::new(40_000));
        let wide = route(2, 1, 1, 90_000);
        assert_eq!(planned_quantity(&v, &wide), Tons::new(60_000));
    }

    #[test]
    fn test_check_pair_accepts_compatible_pairing() {
        let p = problem();
        let checker = FeasibilityChecker::new(&p);
        let v = vessel(1, Material::IronOre, 60_000);
        assert!(checker.check_pair(&v, &route(1, 1, 1, 80_000)).is_ok());
    }

    #[test]
    fn test_check_pair_rejects_material_mismatch() {
        let p = problem();
        let checker = FeasibilityChecker::new(&p);
        let v = vessel(1, Material::IronOre, 60_000);
        let err = checker.check_pair(&v, &route(3, 1, 2, 80_000)).unwrap_err();
        assert!(matches!(err, FeasibilityViolation::MaterialMismatch { .. }));
    }

    #[test]
    fn test_check_pair_rejects_unconnected_plant() {
        let p = problem();
        let checker = FeasibilityChecker::new(&p);
        let v = vessel(1, Material::IronOre, 60_000);
        let err = checker.check_pair(&v, &route(4, 1, 3, 80_000)).unwrap_err();
        assert!(matches!(
            err,
            FeasibilityViolation::PlantNotRailConnected { .. }
        ));
    }

    #[test]
    fn test_check_pair_rejects_port_without_headroom() {
        let p = problem();
        let checker = FeasibilityChecker::new(&p);
        // Port 2 has 5k headroom, the shipment would be 60k.
        let v = vessel(1, Material::IronOre, 60_000);
        let err = checker.check_pair(&v, &route(2, 2, 1, 80_000)).unwrap_err();
        assert!(matches!(
            err,
            FeasibilityViolation::PortOverCapacity { .. }
        ));
    }

    #[test]
    fn test_violations_empty_plan_is_clean() {
        let p = problem();
        let checker = FeasibilityChecker::new(&p);
        assert!(checker.violations(&[]).is_empty());
    }

    #[test]
    fn test_violations_flags_aggregate_port_overload() {
        let p = problem();
        let checker = FeasibilityChecker::new(&p);
        let v = vessel(1, Material::IronOre, 60_000);
        let r = route(1, 1, 1, 80_000);
        // Two shipments of 50k against 80k headroom overload in aggregate
        // even though each alone would fit.
        let a1 = Assignment::new(&v, &r, Tons::new(50_000), 2, 0.0).unwrap();
        let a2 = Assignment::new(&v, &r, Tons::new(50_000), 2, 0.0).unwrap();
        let violations = checker.violations(&[a1, a2]);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0],
            FeasibilityViolation::PortOverCapacity { .. }
        ));
    }

    #[test]
    fn test_violations_reports_unknown_references() {
        let p = problem();
        let checker = FeasibilityChecker::new(&p);
        let ghost = vessel(99, Material::IronOre, 10_000);
        let r = route(1, 1, 1, 80_000);
        let a = Assignment::new(&ghost, &r, Tons::new(10_000), 1, 0.0).unwrap();
        let violations = checker.violations(&[a]);
        assert_eq!(
            violations,
            vec![FeasibilityViolation::UnknownVessel(VesselIdentifier::new(
                99
            ))]
        );
    }
}
