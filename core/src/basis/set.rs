use std::collections::HashMap;

use nalgebra::Vector3;

use crate::{atom::Atom, error::BasisError};

use super::Shell;

/// Basis set: for every element, the shells placed on each of its atoms.
#[derive(Debug, Clone, Default)]
pub struct BasisSet {
    atomic_mapping: HashMap<u32, Vec<ShellTemplate>>,
}

impl BasisSet {
    /// Create a new basis set given mappings from atomic number to the shells of that element
    pub fn new(atomic_mapping: HashMap<u32, Vec<ShellTemplate>>) -> Self {
        Self { atomic_mapping }
    }

    /// Returns the shell templates of a given element, if it exists.
    pub fn for_element(&self, atomic_number: u32) -> Option<&[ShellTemplate]> {
        self.atomic_mapping.get(&atomic_number).map(Vec::as_slice)
    }

    /// Instantiates the normalized shells of an element at `center`.
    ///
    /// With `pure`, shells of angular momentum 2 and higher use solid harmonics; s and p
    /// shells stay cartesian.
    pub fn shells_for(
        &self,
        atomic_number: u32,
        center: Vector3<f64>,
        pure: bool,
    ) -> Result<Vec<Shell>, BasisError> {
        let templates = self
            .for_element(atomic_number)
            .ok_or(BasisError::MissingElement(atomic_number))?;

        templates
            .iter()
            .map(|template| template.instantiate(center, pure))
            .collect()
    }

    /// All shells of all atoms, in atom order.
    pub fn shells_for_atoms<'a>(
        &self,
        atoms: impl IntoIterator<Item = &'a Atom>,
        pure: bool,
    ) -> Result<Vec<Shell>, BasisError> {
        let mut shells = Vec::new();
        for atom in atoms {
            shells.extend(self.shells_for(atom.atomic_number(), *atom.position(), pure)?);
        }
        Ok(shells)
    }
}

/// Center-independent description of a single-contraction shell.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellTemplate {
    pub l: usize,
    pub exponents: Vec<f64>,
    /// Raw contraction coefficients, before normalization
    pub coefficients: Vec<f64>,
    /// Forced basis type; `None` defers to the caller
    pub pure: Option<bool>,
}

impl ShellTemplate {
    fn instantiate(&self, center: Vector3<f64>, pure: bool) -> Result<Shell, BasisError> {
        let pure = self.pure.unwrap_or(pure && self.l >= 2);
        Shell::new(
            center,
            self.l,
            pure,
            self.exponents.clone(),
            self.coefficients.clone(),
        )
    }
}
