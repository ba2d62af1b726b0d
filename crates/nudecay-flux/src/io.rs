//! Loading tables into flux states and tabulating evaluated flux.

use nudecay_core::{EnergyGrid, Flavor, FluxState, Polarization, QueryError};
use tracing::{debug, warn};

use crate::error::FluxError;
use crate::layout::ColumnLayout;
use crate::table::{FluxRow, FluxTable};

/// Relative tolerance when comparing table energies with grid nodes.
const ENERGY_MATCH_TOLERANCE: f64 = 1.0e-6;

/// Build an initial flux state from a table.
///
/// Rows are matched to grid nodes by index; the table's binning must
/// already match the grid. Value column `k` (after the energy column) is
/// written to `layout.columns()[k]`; every other slot stays zero. The
/// energy column, scaled by `energy_unit`, is only checked against the
/// grid and a mismatch is logged, not rejected.
///
/// # Examples
///
/// ```
/// use nudecay_core::{EnergyGrid, Flavor, Polarization};
/// use nudecay_flux::{load_initial_state, ColumnLayout, FluxTable};
///
/// let grid = EnergyGrid::linspace(1.0, 2.0, 2).unwrap();
/// let table = FluxTable::read_from("1 0.5 0.25\n2 0.4 0.2\n".as_bytes()).unwrap();
/// let layout = ColumnLayout::flavor_both(Flavor::Muon);
/// let state = load_initial_state(&table, &layout, &grid, 4, 1.0).unwrap();
/// assert_eq!(state.get(1, Polarization::Antineutrino, Flavor::Muon), 0.2);
/// assert_eq!(state.get(1, Polarization::Neutrino, Flavor::Electron), 0.0);
/// ```
pub fn load_initial_state(
    table: &FluxTable,
    layout: &ColumnLayout,
    grid: &EnergyGrid,
    num_neu: usize,
    energy_unit: f64,
) -> Result<FluxState, FluxError> {
    if table.is_empty() {
        return Err(FluxError::EmptyTable);
    }
    if table.len() != grid.len() {
        return Err(FluxError::RowCountMismatch {
            rows: table.len(),
            nodes: grid.len(),
        });
    }
    let value_columns = table.width().saturating_sub(1);
    if value_columns < layout.len() {
        return Err(FluxError::ColumnCountMismatch {
            expected: layout.len(),
            found: value_columns,
        });
    }
    if let Some(column) = layout
        .columns()
        .iter()
        .position(|c| c.flavor.index() >= num_neu)
    {
        return Err(FluxError::FlavorOutOfRange { column, num_neu });
    }

    let mut state = FluxState::zeros(grid.len(), num_neu);
    let mut mismatched = 0usize;
    for (node, (row, &energy)) in table.rows().iter().zip(grid.nodes()).enumerate() {
        if let Some(column) = row.iter().position(|v| !v.is_finite()) {
            return Err(FluxError::NonFinite { row: node, column });
        }
        let table_energy = row[0] * energy_unit;
        if ((table_energy - energy) / energy).abs() > ENERGY_MATCH_TOLERANCE {
            mismatched += 1;
        }
        for (k, col) in layout.columns().iter().enumerate() {
            state.set(node, col.polarization, col.flavor, row[k + 1]);
        }
    }
    if mismatched > 0 {
        warn!(
            mismatched,
            nodes = grid.len(),
            "flux table energies differ from grid nodes; rows matched by index"
        );
    }
    debug!(
        rows = table.len(),
        columns = layout.len(),
        num_neu,
        "initial flux state loaded"
    );
    Ok(state)
}

/// Tabulate `eval(flavor, energy, polarization)` at every grid node.
///
/// Each row is the node energy divided by `energy_unit`, followed by one
/// value per layout column in order. Values are passed through unchanged.
/// The first evaluation failure aborts the whole table.
pub fn store_table<F>(
    grid: &EnergyGrid,
    layout: &ColumnLayout,
    energy_unit: f64,
    mut eval: F,
) -> Result<FluxTable, FluxError>
where
    F: FnMut(Flavor, f64, Polarization) -> Result<f64, QueryError>,
{
    let mut table = FluxTable::new().with_header(layout.header());
    for &energy in grid.nodes() {
        let mut row = FluxRow::with_capacity(layout.len() + 1);
        row.push(energy / energy_unit);
        for col in layout.columns() {
            row.push(eval(col.flavor, energy, col.polarization)?);
        }
        table.push_row(row)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FluxColumn;

    fn grid() -> EnergyGrid {
        EnergyGrid::linspace(1.0, 3.0, 3).unwrap()
    }

    fn table() -> FluxTable {
        FluxTable::read_from("1 0.1 0.2\n2 0.3 0.4\n3 0.5 0.6\n".as_bytes()).unwrap()
    }

    #[test]
    fn row_count_must_match_grid() {
        let g = EnergyGrid::linspace(1.0, 4.0, 4).unwrap();
        let layout = ColumnLayout::flavor_both(Flavor::Muon);
        match load_initial_state(&table(), &layout, &g, 4, 1.0) {
            Err(FluxError::RowCountMismatch { rows: 3, nodes: 4 }) => {}
            other => panic!("expected RowCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn layout_wider_than_table_rejected() {
        let layout = ColumnLayout::all(2);
        match load_initial_state(&table(), &layout, &grid(), 2, 1.0) {
            Err(FluxError::ColumnCountMismatch {
                expected: 4,
                found: 2,
            }) => {}
            other => panic!("expected ColumnCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn flavor_beyond_system_rejected() {
        let layout = ColumnLayout::new([FluxColumn::new(Flavor::Sterile(0), Polarization::Neutrino)]);
        match load_initial_state(&table(), &layout, &grid(), 3, 1.0) {
            Err(FluxError::FlavorOutOfRange {
                column: 0,
                num_neu: 3,
            }) => {}
            other => panic!("expected FlavorOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn nan_rejected() {
        let t = FluxTable::read_from("1 0.1 0.2\n2 NaN 0.4\n3 0.5 0.6\n".as_bytes()).unwrap();
        let layout = ColumnLayout::flavor_both(Flavor::Muon);
        assert!(matches!(
            load_initial_state(&t, &layout, &grid(), 4, 1.0),
            Err(FluxError::NonFinite { row: 1, column: 1 })
        ));
    }

    #[test]
    fn unlisted_slots_are_zero() {
        let layout = ColumnLayout::flavor_both(Flavor::Muon);
        let s = load_initial_state(&table(), &layout, &grid(), 4, 1.0).unwrap();
        let nonzero = s.as_array().iter().filter(|v| **v != 0.0).count();
        assert_eq!(nonzero, 6);
        assert_eq!(s.get(2, Polarization::Neutrino, Flavor::Muon), 0.5);
    }

    #[test]
    fn store_aborts_on_first_failure() {
        let layout = ColumnLayout::flavor_both(Flavor::Muon);
        let mut calls = 0;
        let res = store_table(&grid(), &layout, 1.0, |_, _, _| {
            calls += 1;
            Err(QueryError::NotEvolved)
        });
        assert!(matches!(res, Err(FluxError::Query(QueryError::NotEvolved))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn store_scales_energy_column() {
        let layout = ColumnLayout::flavor_both(Flavor::Electron);
        let t = store_table(&grid(), &layout, 2.0, |_, e, _| Ok(e)).unwrap();
        assert_eq!(t.column(0).collect::<Vec<_>>(), vec![0.5, 1.0, 1.5]);
        assert_eq!(t.column(1).collect::<Vec<_>>(), vec![1.0, 2.0, 3.0]);
    }
}
