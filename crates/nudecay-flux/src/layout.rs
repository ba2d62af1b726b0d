//! Column layouts for flux tables.

use std::fmt;

use nudecay_core::{Flavor, Polarization};
use smallvec::SmallVec;

/// The (flavor, polarization) held by one value column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FluxColumn {
    /// Flavor of the column.
    pub flavor: Flavor,
    /// Polarization of the column.
    pub polarization: Polarization,
}

impl FluxColumn {
    /// Build a column descriptor.
    pub const fn new(flavor: Flavor, polarization: Polarization) -> Self {
        Self {
            flavor,
            polarization,
        }
    }
}

impl fmt::Display for FluxColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.polarization, self.flavor)
    }
}

/// Ordered value columns of a flux table (the energy column is implicit).
///
/// # Examples
///
/// ```
/// use nudecay_core::{Flavor, Polarization};
/// use nudecay_flux::ColumnLayout;
///
/// let layout = ColumnLayout::flavor_both(Flavor::Muon);
/// assert_eq!(layout.len(), 2);
/// assert_eq!(layout.header(), "# E nu_mu nubar_mu");
///
/// let all = ColumnLayout::all(4);
/// assert_eq!(all.len(), 8);
/// assert_eq!(all.columns()[4].polarization, Polarization::Antineutrino);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: SmallVec<[FluxColumn; 8]>,
}

impl ColumnLayout {
    /// A layout from explicit columns.
    pub fn new(columns: impl IntoIterator<Item = FluxColumn>) -> Self {
        Self {
            columns: columns.into_iter().collect(),
        }
    }

    /// Every flavor of an `num_neu`-state system: all neutrino columns,
    /// then all antineutrino columns.
    pub fn all(num_neu: usize) -> Self {
        Self::new(
            Polarization::BOTH
                .into_iter()
                .flat_map(|p| Flavor::all(num_neu).map(move |f| FluxColumn::new(f, p))),
        )
    }

    /// One flavor, neutrino then antineutrino.
    pub fn flavor_both(flavor: Flavor) -> Self {
        Self::new(Polarization::BOTH.map(|p| FluxColumn::new(flavor, p)))
    }

    /// The columns in order.
    pub fn columns(&self) -> &[FluxColumn] {
        &self.columns
    }

    /// Number of value columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the layout has no value columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// A `#`-prefixed header line naming every column.
    pub fn header(&self) -> String {
        let mut out = String::from("# E");
        for c in &self.columns {
            out.push(' ');
            out.push_str(&c.to_string());
        }
        out
    }
}
