//! Immutable energy grid on which flux states are tabulated.

use crate::error::GridError;

/// An ordered, immutable sequence of energy-bin centers (eV).
///
/// Fixed for the lifetime of an evolution driver. Arbitrary-energy
/// queries are answered by bracketing between neighbouring nodes.
///
/// # Examples
///
/// ```
/// use nudecay_core::EnergyGrid;
/// use nudecay_core::units::GEV;
///
/// let grid = EnergyGrid::linspace(0.025 * GEV, 9.975 * GEV, 200).unwrap();
/// assert_eq!(grid.len(), 200);
/// assert_eq!(grid.min(), 0.025 * GEV);
/// assert_eq!(grid.max(), 9.975 * GEV);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EnergyGrid {
    nodes: Vec<f64>,
}

impl EnergyGrid {
    /// Build a grid from explicit nodes.
    ///
    /// Nodes must be finite, positive and strictly increasing, and there
    /// must be at least two of them.
    pub fn from_nodes(nodes: Vec<f64>) -> Result<Self, GridError> {
        if nodes.len() < 2 {
            return Err(GridError::TooFewNodes { count: nodes.len() });
        }
        for (index, &value) in nodes.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(GridError::InvalidNode { index, value });
            }
        }
        if let Some(index) = nodes.windows(2).position(|w| w[1] <= w[0]) {
            return Err(GridError::NotIncreasing { index: index + 1 });
        }
        Ok(Self { nodes })
    }

    /// `n` evenly spaced nodes from `min` to `max` inclusive.
    pub fn linspace(min: f64, max: f64, n: usize) -> Result<Self, GridError> {
        if n < 2 {
            return Err(GridError::TooFewNodes { count: n });
        }
        let step = (max - min) / (n - 1) as f64;
        let mut nodes: Vec<f64> = (0..n).map(|i| min + step * i as f64).collect();
        nodes[n - 1] = max;
        Self::from_nodes(nodes)
    }

    /// `n` logarithmically spaced nodes from `min` to `max` inclusive.
    pub fn logspace(min: f64, max: f64, n: usize) -> Result<Self, GridError> {
        if n < 2 {
            return Err(GridError::TooFewNodes { count: n });
        }
        if min.is_nan() || min <= 0.0 {
            return Err(GridError::InvalidNode {
                index: 0,
                value: min,
            });
        }
        let (lo, hi) = (min.log10(), max.log10());
        let step = (hi - lo) / (n - 1) as f64;
        let mut nodes: Vec<f64> = (0..n).map(|i| 10f64.powf(lo + step * i as f64)).collect();
        nodes[0] = min;
        nodes[n - 1] = max;
        Self::from_nodes(nodes)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: construction rejects grids with fewer than two nodes.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All nodes in increasing order.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Node at `index`, if present.
    pub fn node(&self, index: usize) -> Option<f64> {
        self.nodes.get(index).copied()
    }

    /// Lowest node.
    pub fn min(&self) -> f64 {
        self.nodes[0]
    }

    /// Highest node.
    pub fn max(&self) -> f64 {
        self.nodes[self.nodes.len() - 1]
    }

    /// Whether `energy` lies within `[min, max]`.
    pub fn contains(&self, energy: f64) -> bool {
        energy >= self.min() && energy <= self.max()
    }

    /// Index of the node exactly equal to `energy`, if any.
    pub fn exact_node(&self, energy: f64) -> Option<usize> {
        self.nodes
            .binary_search_by(|n| n.total_cmp(&energy))
            .ok()
    }

    /// Bracket `energy` between two nodes.
    ///
    /// Returns `(i, t)` such that `energy = (1 - t) * nodes[i] + t * nodes[i + 1]`
    /// with `0 <= t <= 1`, or `None` if `energy` is outside the grid.
    pub fn bracket(&self, energy: f64) -> Option<(usize, f64)> {
        if !self.contains(energy) {
            return None;
        }
        let upper = self.nodes.partition_point(|&n| n <= energy);
        let i = upper.saturating_sub(1).min(self.nodes.len() - 2);
        let (lo, hi) = (self.nodes[i], self.nodes[i + 1]);
        Some((i, (energy - lo) / (hi - lo)))
    }

    /// Trapezoid quadrature weights for integrating a tabulated function
    /// over the grid.
    pub fn trapezoid_weights(&self) -> Vec<f64> {
        let n = self.nodes.len();
        let mut w = vec![0.0; n];
        for i in 0..n - 1 {
            let half = 0.5 * (self.nodes[i + 1] - self.nodes[i]);
            w[i] += half;
            w[i + 1] += half;
        }
        w
    }
}
