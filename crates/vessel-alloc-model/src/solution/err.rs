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

use crate::problem::{route::RouteIdentifier, vessel::VesselIdentifier};
use vessel_alloc_core::prelude::Tons;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NonPositiveQuantityError {
    vessel: VesselIdentifier,
    quantity: Tons,
}

impl NonPositiveQuantityError {
    pub fn new(vessel: VesselIdentifier, quantity: Tons) -> Self {
        Self { vessel, quantity }
    }

    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }

    pub fn quantity(&self) -> Tons {
        self.quantity
    }
}

impl std::fmt::Display for NonPositiveQuantityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Shipment for vessel {} must move a positive quantity, got {}",
            self.vessel, self.quantity
        )
    }
}

impl std::error::Error for NonPositiveQuantityError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VesselOverloadError {
    vessel: VesselIdentifier,
    quantity: Tons,
    capacity: Tons,
}

impl VesselOverloadError {
    pub fn new(vessel: VesselIdentifier, quantity: Tons, capacity: Tons) -> Self {
        Self {
            vessel,
            quantity,
            capacity,
        }
    }

    pub fn vessel(&self) -> VesselIdentifier {
        self.vessel
    }

    pub fn quantity(&self) -> Tons {
        self.quantity
    }

    pub fn capacity(&self) -> Tons {
        self.capacity
    }
}

impl std::fmt::Display for VesselOverloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Shipment of {} exceeds capacity {} of vessel {}",
            self.quantity, self.capacity, self.vessel
        )
    }
}

impl std::error::Error for VesselOverloadError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteOverloadError {
    route: RouteIdentifier,
    quantity: Tons,
    max_shipment: Tons,
}

impl RouteOverloadError {
    pub fn new(route: RouteIdentifier, quantity: Tons, max_shipment: Tons) -> Self {
        Self {
            route,
            quantity,
            max_shipment,
        }
    }

    pub fn route(&self) -> RouteIdentifier {
        self.route
    }

    pub fn quantity(&self) -> Tons {
        self.quantity
    }

    pub fn max_shipment(&self) -> Tons {
        self.max_shipment
    }
}

impl std::fmt::Display for RouteOverloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Shipment of {} exceeds cap {} of route {}",
            self.quantity, self.max_shipment, self.route
        )
    }
}

impl std::error::Error for RouteOverloadError {}

/// Validation error raised when constructing an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignmentError {
    NonPositiveQuantity(NonPositiveQuantityError),
    VesselOverload(VesselOverloadError),
    RouteOverload(RouteOverloadError),
}

impl std::fmt::Display for AssignmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentError::NonPositiveQuantity(e) => write!(f, "{}", e),
            AssignmentError::VesselOverload(e) => write!(f, "{}", e),
            AssignmentError::RouteOverload(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AssignmentError {}

impl From<NonPositiveQuantityError> for AssignmentError {
    fn from(err: NonPositiveQuantityError) -> Self {
        AssignmentError::NonPositiveQuantity(err)
    }
}

impl From<VesselOverloadError> for AssignmentError {
    fn from(err: VesselOverloadError) -> Self {
        AssignmentError::VesselOverload(err)
    }
}

impl From<RouteOverloadError> for AssignmentError {
    fn from(err: RouteOverloadError) -> Self {
        AssignmentError::RouteOverload(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vessel_overload_display() {
        let err = VesselOverloadError::new(
            VesselIdentifier::new(2),
            Tons::new(90_000),
            Tons::new(75_000),
        );
        assert_eq!(
            err.to_string(),
            "Shipment of Tons(90000) exceeds capacity Tons(75000) of vessel VesselId(2)"
        );
    }

    #[test]
    fn test_assignment_error_from_parts() {
        let err: AssignmentError =
            NonPositiveQuantityError::new(VesselIdentifier::new(1), Tons::new(0)).into();
        assert!(matches!(err, AssignmentError::NonPositiveQuantity(_)));
    }
}
