//! Paths: externally meaningful runs of vertices.
//!
//! A reconstruction is traced as a set of paths. Every vertex may point back
//! to the path it was sampled from, which supplies the path's own order and
//! morphological type. The `path-order` persistence descriptor reads the
//! order from here.

use std::fmt;

/// Index of a path registered with a [`crate::TreeGraphBuilder`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PathId(pub(crate) usize);

impl PathId {
    /// Returns the raw index of this path.
    #[must_use]
    #[rustfmt::skip]
    pub const fn index(self) -> usize { self.0 }
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "path#{}", self.0)
    }
}

/// SWC compartment type of a path.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SwcType {
    /// Type 0.
    #[default]
    Undefined,
    /// Type 1.
    Soma,
    /// Type 2.
    Axon,
    /// Type 3.
    BasalDendrite,
    /// Type 4.
    ApicalDendrite,
    /// Any other SWC type code.
    Custom(u16),
}

impl SwcType {
    /// Maps an SWC type code to its compartment.
    ///
    /// # Examples
    /// ```
    /// use ramify_core::SwcType;
    ///
    /// assert_eq!(SwcType::from_code(2), SwcType::Axon);
    /// assert_eq!(SwcType::from_code(7), SwcType::Custom(7));
    /// assert_eq!(SwcType::Custom(7).code(), 7);
    /// ```
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Undefined,
            1 => Self::Soma,
            2 => Self::Axon,
            3 => Self::BasalDendrite,
            4 => Self::ApicalDendrite,
            other => Self::Custom(other),
        }
    }

    /// Returns the SWC type code.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Undefined => 0,
            Self::Soma => 1,
            Self::Axon => 2,
            Self::BasalDendrite => 3,
            Self::ApicalDendrite => 4,
            Self::Custom(code) => code,
        }
    }
}

/// Attributes of a traced path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathInfo {
    order: u32,
    swc_type: SwcType,
}

impl PathInfo {
    /// Creates path attributes with the given order and SWC type.
    #[must_use]
    pub const fn new(order: u32, swc_type: SwcType) -> Self {
        Self { order, swc_type }
    }

    /// Order of the path as assigned by the tracer (primary paths are 1).
    #[must_use]
    #[rustfmt::skip]
    pub const fn order(&self) -> u32 { self.order }

    /// Morphological type of the path.
    #[must_use]
    #[rustfmt::skip]
    pub const fn swc_type(&self) -> SwcType { self.swc_type }
}
