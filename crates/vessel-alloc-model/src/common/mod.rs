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

pub trait IdentifierMarkerName: Copy {
    const NAME: &'static str;
}

#[repr(transparent)]
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier<I, U>(I, core::marker::PhantomData<U>);

impl<I, U> Identifier<I, U> {
    #[inline]
    pub fn new(id: I) -> Self {
        Self(id, core::marker::PhantomData)
    }

    #[inline]
    pub fn value(&self) -> &I {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> I {
        self.0
    }
}

impl<I, U> std::fmt::Display for Identifier<I, U>
where
    I: std::fmt::Display,
    U: IdentifierMarkerName,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", U::NAME, self.0)
    }
}

/// Bulk cargo grades handled by the allocation model.
///
/// A plant consumes exactly one grade, so compatibility between a vessel's
/// cargo and a receiving plant is a plain equality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Material {
    IronOre,
    CokingCoal,
    Limestone,
    Dolomite,
}

impl Material {
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Material::IronOre => "Iron Ore",
            Material::CokingCoal => "Coking Coal",
            Material::Limestone => "Limestone",
            Material::Dolomite => "Dolomite",
        }
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    struct DummyMarker;

    impl IdentifierMarkerName for DummyMarker {
        const NAME: &'static str = "DummyId";
    }

    type DummyIdentifier = Identifier<u32, DummyMarker>;

    #[test]
    fn test_identifier_roundtrip() {
        let id = DummyIdentifier::new(7);
        assert_eq!(*id.value(), 7);
        assert_eq!(id.into_inner(), 7);
    }

    #[test]
    fn test_identifier_display_uses_marker_name() {
        let id = DummyIdentifier::new(3);
        assert_eq!(id.to_string(), "DummyId(3)");
    }

    #[test]
    fn test_identifier_ordering() {
        assert!(DummyIdentifier::new(1) < DummyIdentifier::new(2));
    }

    #[test]
    fn test_material_equality_is_compatibility() {
        assert_eq!(Material::IronOre, Material::IronOre);
        assert_ne!(Material::IronOre, Material::CokingCoal);
    }

    #[test]
    fn test_material_display() {
        assert_eq!(Material::CokingCoal.to_string(), "Coking Coal");
    }
}
