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

use chrono::NaiveDate;
use vessel_alloc_core::prelude::Tons;
use vessel_alloc_model::prelude::*;

#[inline]
fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).expect("valid calendar date")
}

/// Eastern India reference scenario.
///
/// Six inbound capesize/panamax vessels against the ports of Haldia,
/// Paradip and Visakhapatnam, feeding the Durgapur, Rourkela and Vizag
/// Steel plants. Every port reaches every plant by rail, Paradip carries
/// the heaviest congestion history, and Haldia has a discounted ocean
/// freight contract.
pub fn eastern_india() -> Problem {
    let vessels: VesselContainer = [
        Vessel::new(
            VesselIdentifier::new(1),
            "MV Eastern Glory",
            Material::CokingCoal,
            Tons::new(72_000),
            date(7, 2),
            4.0,
            11_000.0,
            "Gladstone",
        )
        .expect("vessel ok"),
        Vessel::new(
            VesselIdentifier::new(2),
            "MV Bay Pioneer",
            Material::IronOre,
            Tons::new(58_000),
            date(7, 4),
            3.0,
            9_500.0,
            "Port Hedland",
        )
        .expect("vessel ok"),
        Vessel::new(
            VesselIdentifier::new(3),
            "MV Coral Empress",
            Material::CokingCoal,
            Tons::new(80_000),
            date(7, 6),
            5.0,
            12_500.0,
            "Hay Point",
        )
        .expect("vessel ok"),
        Vessel::new(
            VesselIdentifier::new(4),
            "MV Godavari Spirit",
            Material::Limestone,
            Tons::new(45_000),
            date(7, 8),
            3.0,
            7_000.0,
            "Fujairah",
        )
        .expect("vessel ok"),
        Vessel::new(
            VesselIdentifier::new(5),
            "MV Monsoon Trader",
            Material::IronOre,
            Tons::new(66_000),
            date(7, 11),
            4.0,
            10_000.0,
            "Dampier",
        )
        .expect("vessel ok"),
        Vessel::new(
            VesselIdentifier::new(6),
            "MV Bengal Horizon",
            Material::CokingCoal,
            Tons::new(75_000),
            date(7, 13),
            4.5,
            11_500.0,
            "Newcastle",
        )
        .expect("vessel ok"),
    ]
    .into_iter()
    .collect();

    let ports: PortContainer = [
        Port::new(
            PortIdentifier::new(1),
            "Haldia",
            Tons::new(180_000),
            Tons::new(40_000),
            4.2,
            0.55,
            Tons::new(25_000),
        )
        .expect("port ok"),
        Port::new(
            PortIdentifier::new(2),
            "Paradip",
            Tons::new(260_000),
            Tons::new(60_000),
            3.8,
            0.50,
            Tons::new(30_000),
        )
        .expect("port ok"),
        Port::new(
            PortIdentifier::new(3),
            "Visakhapatnam",
            Tons::new(300_000),
            Tons::new(90_000),
            3.5,
            0.45,
            Tons::new(35_000),
        )
        .expect("port ok"),
    ]
    .into_iter()
    .collect();

    let plants: PlantContainer = [
        Plant::new(
            PlantIdentifier::new(1),
            "Durgapur",
            Material::CokingCoal,
            Tons::new(500_000),
            Tons::new(120_000),
            true,
        )
        .expect("plant ok"),
        Plant::new(
            PlantIdentifier::new(2),
            "Rourkela",
            Material::IronOre,
            Tons::new(600_000),
            Tons::new(150_000),
            true,
        )
        .expect("plant ok"),
        Plant::new(
            PlantIdentifier::new(3),
            "Vizag Steel",
            Material::Limestone,
            Tons::new(350_000),
            Tons::new(60_000),
            true,
        )
        .expect("plant ok"),
    ]
    .into_iter()
    .collect();

    // Rail costs roughly track distance: Haldia sits next to Durgapur,
    // Visakhapatnam next to Vizag Steel, Paradip in between.
    let routes: RouteContainer = [
        route(1, 1, 1, 1.2, 2),
        route(2, 1, 2, 2.1, 3),
        route(3, 1, 3, 3.4, 4),
        route(4, 2, 1, 1.9, 3),
        route(5, 2, 2, 1.4, 2),
        route(6, 2, 3, 2.6, 3),
        route(7, 3, 1, 3.2, 4),
        route(8, 3, 2, 2.4, 3),
        route(9, 3, 3, 0.8, 1),
    ]
    .into_iter()
    .collect();

    let tariffs: TariffBook = [
        CostEntry::new(
            CostType::OceanFreight,
            RateScope::Global,
            13.0,
            "USD",
            date(1, 1),
        )
        .expect("tariff ok"),
        CostEntry::new(
            CostType::OceanFreight,
            RateScope::Port(PortIdentifier::new(1)),
            11.5,
            "USD",
            date(3, 1),
        )
        .expect("tariff ok"),
        CostEntry::new(
            CostType::OceanFreight,
            RateScope::Port(PortIdentifier::new(3)),
            12.2,
            "USD",
            date(4, 1),
        )
        .expect("tariff ok"),
    ]
    .into_iter()
    .collect();

    let history: DelayHistory = [
        record(1, date(5, 2), date(5, 3), 0.3, 0.4),
        record(1, date(5, 18), date(5, 20), 0.4, 0.5),
        record(2, date(5, 5), date(5, 9), 0.5, 0.7),
        record(2, date(5, 14), date(5, 19), 0.6, 0.8),
        record(2, date(6, 1), date(6, 4), 0.4, 0.7),
        record(3, date(5, 25), date(5, 26), 0.2, 0.3),
    ]
    .into_iter()
    .collect();

    Problem::new(vessels, ports, plants, routes, tariffs, history)
        .expect("reference scenario is well formed")
}

#[inline]
fn route(id: u32, port: u32, plant: u32, rail_cost: f64, travel_days: u32) -> Route {
    Route::new(
        RouteIdentifier::new(id),
        PortIdentifier::new(port),
        PlantIdentifier::new(plant),
        rail_cost,
        travel_days,
        Tons::new(100_000),
    )
    .expect("route ok")
}

#[inline]
fn record(
    port: u32,
    eta: NaiveDate,
    arrival: NaiveDate,
    weather: f64,
    congestion: f64,
) -> DelayRecord {
    DelayRecord::new(PortIdentifier::new(port), eta, arrival, weather, congestion)
        .expect("record ok")
}

#[cfg(test)]
mod tests {
    use super::*;
    use vessel_alloc_solver::{
        config::PredictorConfig, context::SearchContext, delay::DelayPredictor,
        eval::ScenarioFactors,
    };

    #[test]
    fn test_scenario_counts() {
        let problem = eastern_india();
        assert_eq!(problem.vessels().len(), 6);
        assert_eq!(problem.ports().len(), 3);
        assert_eq!(problem.plants().len(), 3);
        assert_eq!(problem.routes().len(), 9);
        assert_eq!(problem.history().len(), 6);
    }

    #[test]
    fn test_every_vessel_is_assignable() {
        let problem = eastern_india();
        let predictor = DelayPredictor::fit(&problem, &PredictorConfig::default());
        let ctx =
            SearchContext::build(&problem, &predictor, ScenarioFactors::default(), Vec::new());
        assert_eq!(ctx.assignable().len(), 6);
        assert!(ctx.unassignable().is_empty());
    }

    #[test]
    fn test_paradip_carries_the_heaviest_history() {
        let problem = eastern_india();
        let paradip = PortIdentifier::new(2);
        assert_eq!(problem.history().for_port(paradip).count(), 3);
        let mean = problem.history().mean_delay_for(paradip).unwrap();
        assert!(mean >= 3.0);
    }
}
