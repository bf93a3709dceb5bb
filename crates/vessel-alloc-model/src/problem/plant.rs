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
    problem::err::{NegativeTonnageError, NonPositiveTonnageError, RecordError},
};
use std::collections::HashMap;
use vessel_alloc_core::prelude::Tons;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlantIdentifierMarker;

impl IdentifierMarkerName for PlantIdentifierMarker {
    const NAME: &'static str = "PlantId";
}

pub type PlantIdentifier = Identifier<u32, PlantIdentifierMarker>;

/// A consuming plant fed by rail from one or more ports.
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    id: PlantIdentifier,
    name: String,
    required_material: Material,
    max_capacity: Tons,
    current_stock: Tons,
    rail_connected: bool,
}

impl Plant {
    pub fn new(
        id: PlantIdentifier,
        name: impl Into<String>,
        required_material: Material,
        max_capacity: Tons,
        current_stock: Tons,
        rail_connected: bool,
    ) -> Result<Self, RecordError> {
        if !max_capacity.is_positive() {
            return Err(NonPositiveTonnageError::new("plant capacity", max_capacity).into());
        }
        if current_stock < Tons::zero() {
            return Err(NegativeTonnageError::new("plant stock", current_stock).into());
        }
        Ok(Self {
            id,
            name: name.into(),
            required_material,
            max_capacity,
            current_stock,
            rail_connected,
        })
    }

    #[inline]
    pub fn id(&self) -> PlantIdentifier {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn required_material(&self) -> Material {
        self.required_material
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
    pub fn rail_connected(&self) -> bool {
        self.rail_connected
    }

    #[inline]
    pub fn accepts(&self, material: Material) -> bool {
        self.required_material == material
    }

    /// Free storage tonnage before new shipments are considered.
    #[inline]
    pub fn headroom(&self) -> Tons {
        self.max_capacity.saturating_sub(self.current_stock)
    }

    /// Fraction of the storage already occupied, in `0.0..=1.0`.
    #[inline]
    pub fn utilization(&self) -> f64 {
        (self.current_stock.to_f64() / self.max_capacity.to_f64()).clamp(0.0, 1.0)
    }
}

#[repr(transparent)]
#[derive(Debug, Clone)]
pub struct PlantContainer(HashMap<PlantIdentifier, Plant>);

impl Default for PlantContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl PlantContainer {
    #[inline]
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        Self(HashMap::with_capacity(cap))
    }

    #[inline]
    pub fn insert(&mut self, plant: Plant) -> Option<Plant> {
        self.0.insert(plant.id(), plant)
    }

    #[inline]
    pub fn remove(&mut self, id: PlantIdentifier) -> Option<Plant> {
        self.0.remove(&id)
    }

    #[inline]
    pub fn contains_id(&self, id: PlantIdentifier) -> bool {
        self.0.contains_key(&id)
    }

    #[inline]
    pub fn get(&self, id: PlantIdentifier) -> Option<&Plant> {
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
    pub fn iter(&self) -> impl Iterator<Item = &Plant> {
        self.0.values()
    }
}

impl FromIterator<Plant> for PlantContainer {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Plant>>(iter: I) -> Self {
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
    fn plid(n: u32) -> PlantIdentifier {
        PlantIdentifier::new(n)
    }

    #[inline]
    fn plant(n: u32, material: Material, max: i64, stock: i64) -> Plant {
        Plant::new(
            plid(n),
            format!("Plant {n}"),
            material,
            Tons::new(max),
            Tons::new(stock),
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_new_valid_plant() {
        let p = plant(1, Material::IronOre, 200_000, 50_000);
        assert_eq!(p.id(), plid(1));
        assert!(p.rail_connected());
        assert_eq!(p.headroom(), Tons::new(150_000));
        assert_eq!(p.utilization(), 0.25);
    }

    #[test]
    fn test_accepts_matches_required_material() {
        let p = plant(1, Material::CokingCoal, 100_000, 0);
        assert!(p.accepts(Material::CokingCoal));
        assert!(!p.accepts(Material::IronOre));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = Plant::new(
            plid(1),
            "Bad",
            Material::IronOre,
            Tons::new(0),
            Tons::new(0),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::NonPositiveTonnage(_)));
    }

    #[test]
    fn test_negative_stock_rejected() {
        let err = Plant::new(
            plid(1),
            "Bad",
            Material::IronOre,
            Tons::new(100),
            Tons::new(-5),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, RecordError::NegativeTonnage(_)));
    }

    #[test]
    fn test_container_roundtrip() {
        let mut c = PlantContainer::new();
        c.insert(plant(1, Material::IronOre, 100_000, 0));
        c.insert(plant(2, Material::Limestone, 60_000, 0));
        assert_eq!(c.len(), 2);
        assert!(c.contains_id(plid(1)));
        assert_eq!(
            c.get(plid(2)).unwrap().required_material(),
            Material::Limestone
        );
    }
}
