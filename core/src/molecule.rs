use crate::{
    atom::{Atom, PointCharge},
    basis::{BasisSet, Shell},
    error::BasisError,
};

/// Represents a molecule
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub(crate) atoms: Vec<Atom>,
}

impl Molecule {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// The nuclei of this molecule, as sources of the nuclear attraction operator.
    pub fn point_charges(&self) -> Vec<PointCharge> {
        self.atoms.iter().map(Atom::point_charge).collect()
    }

    /// The shells of `basis_set` placed on every atom.
    pub fn shells(&self, basis_set: &BasisSet, pure: bool) -> Result<Vec<Shell>, BasisError> {
        basis_set.shells_for_atoms(&self.atoms, pure)
    }
}
