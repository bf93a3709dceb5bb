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

use num_traits::{CheckedAdd, CheckedSub, SaturatingAdd, SaturatingSub, ToPrimitive, Zero};
use std::{
    fmt::Display,
    iter::Sum,
    marker::PhantomData,
    ops::{Add, AddAssign, Sub, SubAssign},
};

/// Names a measurement unit for display purposes.
pub trait UnitName {
    const NAME: &'static str;
}

/// A unit-tagged scalar quantity.
///
/// The marker type `U` exists only at compile time, so quantities of
/// different units cannot be mixed in arithmetic by accident.
#[repr(transparent)]
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[must_use]
pub struct Quantity<T, U>(T, PhantomData<U>);

// Manual impls so `U` (a phantom marker) carries no `Clone`/`Copy` bounds.
impl<T: Clone, U> Clone for Quantity<T, U> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T: Copy, U> Copy for Quantity<T, U> {}

impl<T, U> Quantity<T, U> {
    #[inline]
    pub const fn new(value: T) -> Self {
        Self(value, PhantomData)
    }
}

impl<T: Copy, U> Quantity<T, U> {
    #[inline]
    pub const fn value(self) -> T {
        self.0
    }
}

impl<T: Zero + Copy + PartialOrd, U> Quantity<T, U> {
    #[inline]
    pub fn zero() -> Self {
        Self::new(T::zero())
    }

    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > T::zero()
    }
}

impl<T: CheckedAdd + Copy, U> Quantity<T, U> {
    #[inline]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(&rhs.0).map(Self::new)
    }
}

impl<T: CheckedSub + Copy, U> Quantity<T, U> {
    #[inline]
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(&rhs.0).map(Self::new)
    }
}

impl<T: SaturatingAdd + Copy, U> Quantity<T, U> {
    #[inline]
    pub fn saturating_add(self, rhs: Self) -> Self {
        Self::new(self.0.saturating_add(&rhs.0))
    }
}

impl<T: SaturatingSub + Copy, U> Quantity<T, U> {
    #[inline]
    pub fn saturating_sub(self, rhs: Self) -> Self {
        Self::new(self.0.saturating_sub(&rhs.0))
    }
}

impl<T: ToPrimitive + Copy, U> Quantity<T, U> {
    /// Lossy view of the quantity as a float, for rate arithmetic.
    #[inline]
    #[must_use]
    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(f64::MAX)
    }
}

impl<T: Ord + Copy, U> Quantity<T, U> {
    #[inline]
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.0.min(rhs.0))
    }

    #[inline]
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.0.max(rhs.0))
    }
}

impl<T: CheckedAdd + Copy, U> Add for Quantity<T, U> {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the addition overflows the underlying representation.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs).expect("error in Quantity + Quantity")
    }
}

impl<T: CheckedSub + Copy, U> Sub for Quantity<T, U> {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if the subtraction overflows the underlying representation.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs).expect("error in Quantity - Quantity")
    }
}

impl<T: CheckedAdd + Copy, U> AddAssign for Quantity<T, U> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: CheckedSub + Copy, U> SubAssign for Quantity<T, U> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Zero + CheckedAdd + Copy + PartialOrd, U> Sum for Quantity<T, U> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, q| acc + q)
    }
}

impl<T: Display, U: UnitName> Display for Quantity<T, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME, self.0)
    }
}
