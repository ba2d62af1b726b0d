//! The decay model handed to the evolution engine.

use nalgebra::DMatrix;
use nudecay_core::{CouplingType, DecayError};
use tracing::debug;

use crate::coupling::rates_from_couplings;
use crate::lifetime::{check_dimension, LifetimeMatrix};
use crate::process::{Chirality, ProcessClass};
use crate::rate::{assemble_from_rates, build_rate_matrix, RateMatrix};

/// Chirality-preserving and chirality-violating generators for one
/// coupling type.
#[derive(Clone, Debug, PartialEq)]
pub struct RatePair {
    /// Chirality-preserving generator.
    pub cpp: RateMatrix,
    /// Chirality-violating generator.
    pub cvp: RateMatrix,
}

impl RatePair {
    /// Both generators zero.
    pub fn stable(n: usize) -> Self {
        Self {
            cpp: RateMatrix::zeros(n),
            cvp: RateMatrix::zeros(n),
        }
    }

    /// Generator for one chirality.
    pub fn get(&self, chirality: Chirality) -> &RateMatrix {
        match chirality {
            Chirality::Preserving => &self.cpp,
            Chirality::Violating => &self.cvp,
        }
    }

    /// Lab-frame total width of `state` at `energy`, summed over both
    /// chiralities.
    pub fn lab_width(&self, state: usize, energy: f64) -> f64 {
        self.cpp.lab_width(state, energy) + self.cvp.lab_width(state, energy)
    }

    fn dim(&self) -> usize {
        self.cpp.dim()
    }
}

#[derive(Clone, Debug, PartialEq)]
enum DecaySource {
    Unset,
    Explicit {
        scalar: Option<RatePair>,
        pseudoscalar: Option<RatePair>,
    },
    Couplings {
        g: DMatrix<f64>,
        coupling: CouplingType,
    },
}

/// Quantities derived from a [`DecayModel`], consumed by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct DecayTerms {
    masses: Vec<f64>,
    scalar: Option<RatePair>,
    pseudoscalar: Option<RatePair>,
    pinned: Option<CouplingType>,
}

impl DecayTerms {
    /// Mass of each eigenstate (eV).
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Number of mass states.
    pub fn num_states(&self) -> usize {
        self.masses.len()
    }

    /// Generators for a coupling type, if present.
    pub fn pair(&self, coupling: CouplingType) -> Option<&RatePair> {
        match coupling {
            CouplingType::Scalar => self.scalar.as_ref(),
            CouplingType::Pseudoscalar => self.pseudoscalar.as_ref(),
        }
    }

    /// Generators for a coupling type, or
    /// [`DecayError::MissingRateMatrices`].
    pub fn require_pair(&self, coupling: CouplingType) -> Result<&RatePair, DecayError> {
        self.pair(coupling)
            .ok_or(DecayError::MissingRateMatrices { coupling })
    }

    /// Generator for a single process class, if present.
    pub fn generator(&self, class: ProcessClass) -> Option<&RateMatrix> {
        self.pair(class.coupling).map(|p| p.get(class.chirality))
    }

    /// Coupling type fixed by the coupling-matrix path, if that path was
    /// used.
    pub fn pinned_coupling(&self) -> Option<CouplingType> {
        self.pinned
    }

    /// Whether the configuration implies Majorana neutrinos (the
    /// coupling-matrix path does).
    pub fn implies_majorana(&self) -> bool {
        self.pinned.is_some()
    }
}

/// Masses plus one of two mutually exclusive decay configurations.
///
/// Either explicit generator matrices are supplied per coupling type
/// ([`set_scalar_matrices`](Self::set_scalar_matrices),
/// [`set_pseudoscalar_matrices`](Self::set_pseudoscalar_matrices)), or a
/// lagrangian coupling matrix is supplied and all four generators are
/// derived from it ([`set_couplings`](Self::set_couplings)). Mixing the two
/// is a [`DecayError::ConflictingConfiguration`].
///
/// Every setter invalidates the derived terms;
/// [`compute_derived_terms`](Self::compute_derived_terms) must run again
/// before the model can be evolved.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use nudecay_core::{CouplingType, DecayError};
/// use nudecay_decay::DecayModel;
///
/// let mut g = DMatrix::zeros(4, 4);
/// g[(3, 2)] = 0.5;
/// let mut model = DecayModel::new(vec![0.0, 0.00875, 0.049, 1.0]).unwrap();
/// model.set_couplings(g, CouplingType::Scalar).unwrap();
/// assert_eq!(model.terms().unwrap_err(), DecayError::TermsNotComputed);
///
/// let terms = model.compute_derived_terms().unwrap();
/// assert!(terms.implies_majorana());
/// assert!(terms.pair(CouplingType::Scalar).unwrap().cpp.total_rate(3) > 0.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DecayModel {
    masses: Vec<f64>,
    source: DecaySource,
    terms: Option<DecayTerms>,
}

impl DecayModel {
    /// A model with the given masses (eV) and no decay configuration yet.
    ///
    /// Masses must be finite and non-negative, and at most one may be
    /// exactly zero.
    pub fn new(masses: Vec<f64>) -> Result<Self, DecayError> {
        check_dimension(masses.len())?;
        for (index, &value) in masses.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(DecayError::InvalidMass { index, value });
            }
        }
        if masses.iter().filter(|m| **m == 0.0).count() > 1 {
            return Err(DecayError::MultipleMasslessStates);
        }
        Ok(Self {
            masses,
            source: DecaySource::Unset,
            terms: None,
        })
    }

    /// A model in which nothing decays, for either coupling type.
    pub fn stable(masses: Vec<f64>) -> Result<Self, DecayError> {
        let n = masses.len();
        let mut model = Self::new(masses)?;
        model.set_scalar_matrices(RatePair::stable(n))?;
        model.set_pseudoscalar_matrices(RatePair::stable(n))?;
        Ok(model)
    }

    /// Build scalar and/or pseudoscalar generators from lifetimes.
    ///
    /// Convenience over [`build_rate_matrix`] followed by the explicit
    /// setters.
    pub fn from_lifetimes(
        masses: Vec<f64>,
        scalar: Option<(&LifetimeMatrix, &LifetimeMatrix)>,
        pseudoscalar: Option<(&LifetimeMatrix, &LifetimeMatrix)>,
    ) -> Result<Self, DecayError> {
        let mut model = Self::new(masses)?;
        if let Some((cpp, cvp)) = scalar {
            let pair = RatePair {
                cpp: build_rate_matrix(cpp, &model.masses)?,
                cvp: build_rate_matrix(cvp, &model.masses)?,
            };
            model.set_scalar_matrices(pair)?;
        }
        if let Some((cpp, cvp)) = pseudoscalar {
            let pair = RatePair {
                cpp: build_rate_matrix(cpp, &model.masses)?,
                cvp: build_rate_matrix(cvp, &model.masses)?,
            };
            model.set_pseudoscalar_matrices(pair)?;
        }
        Ok(model)
    }

    /// A model configured through the coupling-matrix path.
    pub fn from_couplings(
        masses: Vec<f64>,
        g: DMatrix<f64>,
        coupling: CouplingType,
    ) -> Result<Self, DecayError> {
        let mut model = Self::new(masses)?;
        model.set_couplings(g, coupling)?;
        Ok(model)
    }

    /// Mass of each eigenstate (eV).
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    /// Number of mass states.
    pub fn num_states(&self) -> usize {
        self.masses.len()
    }

    /// Set the scalar CPP/CVP generators.
    pub fn set_scalar_matrices(&mut self, pair: RatePair) -> Result<(), DecayError> {
        self.set_explicit(CouplingType::Scalar, pair)
    }

    /// Set the pseudoscalar CPP/CVP generators.
    pub fn set_pseudoscalar_matrices(&mut self, pair: RatePair) -> Result<(), DecayError> {
        self.set_explicit(CouplingType::Pseudoscalar, pair)
    }

    /// Set the lagrangian coupling matrix `g[parent][daughter]`.
    ///
    /// Only entries with `parent > daughter` may be nonzero. Selecting this
    /// path implies Majorana neutrinos and fixes the coupling type.
    pub fn set_couplings(
        &mut self,
        g: DMatrix<f64>,
        coupling: CouplingType,
    ) -> Result<(), DecayError> {
        if matches!(self.source, DecaySource::Explicit { .. }) {
            return Err(DecayError::ConflictingConfiguration);
        }
        let n = self.num_states();
        if g.nrows() != n || g.ncols() != n {
            return Err(DecayError::DimensionMismatch {
                expected: n,
                found: g.nrows().max(g.ncols()),
            });
        }
        for parent in 0..n {
            for daughter in parent..n {
                if g[(parent, daughter)] != 0.0 {
                    return Err(DecayError::InvalidTransition { parent, daughter });
                }
            }
        }
        self.source = DecaySource::Couplings { g, coupling };
        self.terms = None;
        Ok(())
    }

    fn set_explicit(&mut self, coupling: CouplingType, pair: RatePair) -> Result<(), DecayError> {
        if matches!(self.source, DecaySource::Couplings { .. }) {
            return Err(DecayError::ConflictingConfiguration);
        }
        let n = self.num_states();
        if pair.dim() != n || pair.cvp.dim() != n {
            return Err(DecayError::DimensionMismatch {
                expected: n,
                found: pair.dim().max(pair.cvp.dim()),
            });
        }
        if matches!(self.source, DecaySource::Unset) {
            self.source = DecaySource::Explicit {
                scalar: None,
                pseudoscalar: None,
            };
        }
        if let DecaySource::Explicit {
            scalar,
            pseudoscalar,
        } = &mut self.source
        {
            match coupling {
                CouplingType::Scalar => *scalar = Some(pair),
                CouplingType::Pseudoscalar => *pseudoscalar = Some(pair),
            }
        }
        self.terms = None;
        Ok(())
    }

    /// Recompute the derived terms from the current configuration.
    ///
    /// Must be called after the last setter and before evolution.
    pub fn compute_derived_terms(&mut self) -> Result<&DecayTerms, DecayError> {
        let terms = match &self.source {
            DecaySource::Unset => return Err(DecayError::NotConfigured),
            DecaySource::Explicit {
                scalar,
                pseudoscalar,
            } => DecayTerms {
                masses: self.masses.clone(),
                scalar: scalar.clone(),
                pseudoscalar: pseudoscalar.clone(),
                pinned: None,
            },
            DecaySource::Couplings { g, coupling } => {
                let derive = |c: CouplingType| {
                    let [cpp, cvp] = [Chirality::Preserving, Chirality::Violating].map(|ch| {
                        let rates = rates_from_couplings(g, &self.masses, ProcessClass::new(ch, c));
                        assemble_from_rates(&rates, &self.masses)
                    });
                    RatePair { cpp, cvp }
                };
                DecayTerms {
                    masses: self.masses.clone(),
                    scalar: Some(derive(CouplingType::Scalar)),
                    pseudoscalar: Some(derive(CouplingType::Pseudoscalar)),
                    pinned: Some(*coupling),
                }
            }
        };
        debug!(
            states = terms.num_states(),
            pinned = ?terms.pinned,
            "decay terms computed"
        );
        Ok(&*self.terms.insert(terms))
    }

    /// The derived terms, or [`DecayError::TermsNotComputed`] if a setter
    /// has run since they were last computed.
    pub fn terms(&self) -> Result<&DecayTerms, DecayError> {
        self.terms.as_ref().ok_or(DecayError::TermsNotComputed)
    }
}
