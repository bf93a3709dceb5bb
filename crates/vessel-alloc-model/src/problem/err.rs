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

use crate::problem::{plant::PlantIdentifier, port::PortIdentifier, route::RouteIdentifier};
use vessel_alloc_core::prelude::Tons;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonPositiveTonnageError {
    what: &'static str,
    value: Tons,
}

impl NonPositiveTonnageError {
    pub fn new(what: &'static str, value: Tons) -> Self {
        Self { what, value }
    }

    pub fn what(&self) -> &'static str {
        self.what
    }

    pub fn value(&self) -> Tons {
        self.value
    }
}

impl std::fmt::Display for NonPositiveTonnageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must be positive, got {}", self.what, self.value)
    }
}

impl std::error::Error for NonPositiveTonnageError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NegativeTonnageError {
    what: &'static str,
    value: Tons,
}

impl NegativeTonnageError {
    pub fn new(what: &'static str, value: Tons) -> Self {
        Self { what, value }
    }

    pub fn what(&self) -> &'static str {
        self.what
    }

    pub fn value(&self) -> Tons {
        self.value
    }
}

impl std::fmt::Display for NegativeTonnageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must not be negative, got {}", self.what, self.value)
    }
}

impl std::error::Error for NegativeTonnageError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NegativeValueError {
    what: &'static str,
    value: f64,
}

impl NegativeValueError {
    pub fn new(what: &'static str, value: f64) -> Self {
        Self { what, value }
    }

    pub fn what(&self) -> &'static str {
        self.what
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for NegativeValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} must not be negative, got {}", self.what, self.value)
    }
}

impl std::error::Error for NegativeValueError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitIntervalError {
    what: &'static str,
    value: f64,
}

impl UnitIntervalError {
    pub fn new(what: &'static str, value: f64) -> Self {
        Self { what, value }
    }

    pub fn what(&self) -> &'static str {
        self.what
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for UnitIntervalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} must lie within 0.0..=1.0, got {}",
            self.what, self.value
        )
    }
}

impl std::error::Error for UnitIntervalError {}

/// Validation error raised by a record constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    NonPositiveTonnage(NonPositiveTonnageError),
    NegativeTonnage(NegativeTonnageError),
    NegativeValue(NegativeValueError),
    UnitInterval(UnitIntervalError),
}

impl std::fmt::Display for RecordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordError::NonPositiveTonnage(e) => write!(f, "{}", e),
            RecordError::NegativeTonnage(e) => write!(f, "{}", e),
            RecordError::NegativeValue(e) => write!(f, "{}", e),
            RecordError::UnitInterval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RecordError {}

impl From<NonPositiveTonnageError> for RecordError {
    fn from(err: NonPositiveTonnageError) -> Self {
        RecordError::NonPositiveTonnage(err)
    }
}

impl From<NegativeTonnageError> for RecordError {
    fn from(err: NegativeTonnageError) -> Self {
        RecordError::NegativeTonnage(err)
    }
}

impl From<NegativeValueError> for RecordError {
    fn from(err: NegativeValueError) -> Self {
        RecordError::NegativeValue(err)
    }
}

impl From<UnitIntervalError> for RecordError {
    fn from(err: UnitIntervalError) -> Self {
        RecordError::UnitInterval(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutePortNotFoundError {
    route: RouteIdentifier,
    port: PortIdentifier,
}

impl RoutePortNotFoundError {
    pub fn new(route: RouteIdentifier, port: PortIdentifier) -> Self {
        Self { route, port }
    }

    pub fn route(&self) -> RouteIdentifier {
        self.route
    }

    pub fn port(&self) -> PortIdentifier {
        self.port
    }
}

impl std::fmt::Display for RoutePortNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Route {} references unknown port {}",
            self.route, self.port
        )
    }
}

impl std::error::Error for RoutePortNotFoundError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutePlantNotFoundError {
    route: RouteIdentifier,
    plant: PlantIdentifier,
}

impl RoutePlantNotFoundError {
    pub fn new(route: RouteIdentifier, plant: PlantIdentifier) -> Self {
        Self { route, plant }
    }

    pub fn route(&self) -> RouteIdentifier {
        self.route
    }

    pub fn plant(&self) -> PlantIdentifier {
        self.plant
    }
}

impl std::fmt::Display for RoutePlantNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Route {} references unknown plant {}",
            self.route, self.plant
        )
    }
}

impl std::error::Error for RoutePlantNotFoundError {}

/// Cross-reference error raised when assembling a [`Problem`].
///
/// [`Problem`]: crate::problem::prob::Problem
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    RoutePortNotFound(RoutePortNotFoundError),
    RoutePlantNotFound(RoutePlantNotFoundError),
}

impl std::fmt::Display for ProblemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProblemError::RoutePortNotFound(e) => write!(f, "{}", e),
            ProblemError::RoutePlantNotFound(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProblemError {}

impl From<RoutePortNotFoundError> for ProblemError {
    fn from(err: RoutePortNotFoundError) -> Self {
        ProblemError::RoutePortNotFound(err)
    }
}

impl From<RoutePlantNotFoundError> for ProblemError {
    fn from(err: RoutePlantNotFoundError) -> Self {
        ProblemError::RoutePlantNotFound(err)
    }
}
