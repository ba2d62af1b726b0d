//! Loading a table and storing the unevolved state reproduces it exactly.

use nudecay_core::units::GEV;
use nudecay_core::{EnergyGrid, Flavor, Polarization, QueryError};
use nudecay_flux::{load_initial_state, store_table, ColumnLayout, FluxTable};

fn microboone_like_table(grid: &EnergyGrid) -> FluxTable {
    let mut text = String::from("# E[GeV] nu_mu nubar_mu\n");
    for (i, e) in grid.nodes().iter().enumerate() {
        let nu = 1.0e-3 / (1.0 + i as f64).powf(1.7);
        let nubar = 0.31 * nu;
        text.push_str(&format!("{} {nu:e} {nubar:e}\n", e / GEV));
    }
    FluxTable::read_from(text.as_bytes()).unwrap()
}

#[test]
fn load_then_store_reproduces_table() {
    let grid = EnergyGrid::linspace(0.025 * GEV, 9.975 * GEV, 200).unwrap();
    let table = microboone_like_table(&grid);
    let layout = ColumnLayout::flavor_both(Flavor::Muon);
    let state = load_initial_state(&table, &layout, &grid, 4, GEV).unwrap();

    let out = store_table(&grid, &layout, GEV, |flavor, energy, pol| {
        let node = grid.exact_node(energy).ok_or(QueryError::EnergyOutOfRange {
            energy,
            min: grid.min(),
            max: grid.max(),
        })?;
        Ok(state.get(node, pol, flavor))
    })
    .unwrap();

    assert_eq!(out.len(), table.len());
    for (a, b) in out.rows().iter().zip(table.rows()) {
        assert_eq!(&a[1..], &b[1..]);
        assert!((a[0] - b[0]).abs() <= 1e-12 * b[0]);
    }
    assert_eq!(
        state.get(17, Polarization::Neutrino, Flavor::Electron),
        0.0
    );
}
