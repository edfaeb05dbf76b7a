use nalgebra::Vector3;
use serde::Deserialize;

use crate::{atom::Atom, error::BasisError, molecule::Molecule};

/// Represents a full molecule in a config file.
/// A molecule is just a list of positioned atoms.
#[derive(Deserialize)]
pub struct ConfigMolecule(Vec<ConfigAtom>);

#[derive(Deserialize)]
struct ConfigAtom {
    /// atomic number
    element: u32,
    position: Vec<f64>,
}

impl TryFrom<ConfigMolecule> for Molecule {
    type Error = BasisError;

    fn try_from(value: ConfigMolecule) -> Result<Self, Self::Error> {
        let ConfigMolecule(config_atoms) = value;

        let mut atoms = Vec::with_capacity(config_atoms.len());

        for (index, atom) in config_atoms.into_iter().enumerate() {
            let &[x, y, z] = atom.position.as_slice() else {
                return Err(BasisError::MalformedPosition {
                    index,
                    len: atom.position.len(),
                });
            };

            atoms.push(Atom::new(atom.element, Vector3::new(x, y, z)));
        }

        Ok(Self::new(atoms))
    }
}
