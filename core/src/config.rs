use std::{fs::File, io::BufReader, path::Path};

pub use basis_set::ConfigBasisSet;
pub use molecule::ConfigMolecule;

use crate::{basis::BasisSet, error::BasisError, molecule::Molecule};

mod basis_set;
mod molecule;

/// Reads a basis set in the Basis Set Exchange JSON format.
pub fn load_basis_set(path: impl AsRef<Path>) -> Result<BasisSet, BasisError> {
    let config: ConfigBasisSet = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    BasisSet::try_from(config)
}

/// Reads a molecule given as a list of `{ "element": Z, "position": [x, y, z] }` records.
pub fn load_molecule(path: impl AsRef<Path>) -> Result<Molecule, BasisError> {
    let config: ConfigMolecule = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    Molecule::try_from(config)
}
