//! Region locations and cut rules.

/// Location of a point relative to a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionLocation {
    Inside,
    Outside,
    /// On the boundary. Only ever a classification result, never stored on
    /// a leaf.
    Boundary,
}

impl RegionLocation {
    /// Swaps inside and outside; boundary stays boundary.
    #[inline]
    pub fn complement(self) -> Self {
        match self {
            Self::Inside => Self::Outside,
            Self::Outside => Self::Inside,
            Self::Boundary => Self::Boundary,
        }
    }

    #[inline]
    pub fn is_inside(self) -> bool {
        self == Self::Inside
    }

    #[inline]
    pub fn is_outside(self) -> bool {
        self == Self::Outside
    }
}

/// How the two children created by cutting a leaf are initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutRule {
    /// Minus child inside, plus child outside
    #[default]
    MinusInside,
    /// Minus child outside, plus child inside
    PlusInside,
    /// Both children take the location the node had before the cut, leaving
    /// the region unchanged
    Inherit,
}

impl CutRule {
    /// Locations `(minus, plus)` of the children of a node cut with this rule.
    pub fn child_locations(self, parent: RegionLocation) -> (RegionLocation, RegionLocation) {
        match self {
            Self::MinusInside => (RegionLocation::Inside, RegionLocation::Outside),
            Self::PlusInside => (RegionLocation::Outside, RegionLocation::Inside),
            Self::Inherit => (parent, parent),
        }
    }
}
