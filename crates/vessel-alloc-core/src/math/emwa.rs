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

use num_traits::Float;
use std::fmt::Debug;

/// An Exponentially Weighted Moving Average (EWMA) calculator.
///
/// Used to smooth noisy reward signals, e.g. the per-operator improvement
/// stream of an adaptive search. The average starts uninitialized and
/// adopts the first observation verbatim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ewma<F> {
    alpha: F,
    value: Option<F>,
}

/// Error type for an invalid alpha value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAlphaError<F> {
    value: F,
}

impl<F: Float + Debug> InvalidAlphaError<F> {
    pub fn new(value: F) -> Self {
        Self { value }
    }
    pub fn value(&self) -> F {
        self.value
    }
}

impl<F: Float + Debug> std::fmt::Display for InvalidAlphaError<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid alpha value {:?}. Allowed range is 0.0..=1.0.",
            self.value
        )
    }
}

impl<F: Float + Debug> std::error::Error for InvalidAlphaError<F> {}

impl<F: Float + Debug> Ewma<F> {
    /// Creates a new EWMA with a given smoothing factor `alpha`.
    #[inline]
    pub fn new(alpha: F) -> Result<Self, InvalidAlphaError<F>> {
        if !alpha.is_finite() || alpha <= F::zero() || alpha > F::one() {
            return Err(InvalidAlphaError::new(alpha));
        }
        Ok(Self { alpha, value: None })
    }

    #[inline]
    pub fn alpha(&self) -> F {
        self.alpha
    }

    #[inline]
    pub fn initialized(&self) -> bool {
        self.value.is_some()
    }

    #[inline]
    pub fn value(&self) -> Option<F> {
        self.value
    }

    #[inline]
    pub fn value_or_zero(&self) -> F {
        self.value.unwrap_or_else(F::zero)
    }

    #[inline]
    pub fn reset(&mut self) {
        self.value = None;
    }

    /// Observes a single value and updates the EWMA.
    pub fn observe(&mut self, x: F) -> F {
        let new_value = match self.value {
            None => x,
            Some(current) => x * self.alpha + current * (F::one() - self.alpha),
        };
        self.value = Some(new_value);
        new_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestEwma = Ewma<f64>;

    #[test]
    fn test_invalid_alpha_rejected() {
        assert!(TestEwma::new(0.0).is_err());
        assert!(TestEwma::new(1.1).is_err());
        assert!(TestEwma::new(f64::NAN).is_err());
        assert!(TestEwma::new(-0.1).is_err());
    }

    #[test]
    fn test_alpha_boundary_values() {
        assert!(TestEwma::new(1.0).is_ok());
        assert!(TestEwma::new(f64::EPSILON).is_ok());
    }

    #[test]
    fn test_first_observation_adopted() {
        let mut ew = TestEwma::new(0.5).unwrap();
        assert_eq!(ew.value(), None);
        assert_eq!(ew.observe(10.0), 10.0);
        assert!(ew.initialized());
    }

    #[test]
    fn test_basic_update() {
        let mut ew = TestEwma::new(0.5).unwrap();
        ew.observe(10.0);
        let next = ew.observe(12.0);
        assert!((next - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_value_or_zero_uninitialized() {
        let ew = TestEwma::new(0.2).unwrap();
        assert_eq!(ew.value_or_zero(), 0.0);
    }

    #[test]
    fn test_reset_functionality() {
        let mut ew = TestEwma::new(0.4).unwrap();
        ew.observe(15.0);
        assert!(ew.initialized());
        ew.reset();
        assert!(!ew.initialized());
        assert_eq!(ew.value(), None);
    }

    #[test]
    fn test_error_reports_offending_value() {
        let err = TestEwma::new(2.0).unwrap_err();
        assert_eq!(err.value(), 2.0);
        assert!(err.to_string().contains("2.0"));
    }
}
