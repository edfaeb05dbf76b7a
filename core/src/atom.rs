use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Represents an atom in a molecule.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Atom {
    pub(crate) position: Vector3<f64>,
    pub(crate) atomic_number: u32,
}

impl Atom {
    pub fn new(atomic_number: u32, position: Vector3<f64>) -> Self {
        Self {
            position,
            atomic_number,
        }
    }

    /// Returns the charge of this nucleus
    pub fn nuclear_charge(&self) -> f64 {
        self.atomic_number as f64
    }

    pub fn atomic_number(&self) -> u32 {
        self.atomic_number
    }

    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    /// The nucleus of this atom as a point charge.
    pub fn point_charge(&self) -> PointCharge {
        PointCharge::new(self.nuclear_charge(), self.position)
    }
}

/// A classical point charge, the source of the nuclear attraction operator.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointCharge {
    pub charge: f64,
    pub position: Vector3<f64>,
}

impl PointCharge {
    pub fn new(charge: f64, position: Vector3<f64>) -> Self {
        Self { charge, position }
    }
}

impl From<(f64, [f64; 3])> for PointCharge {
    fn from((charge, [x, y, z]): (f64, [f64; 3])) -> Self {
        Self::new(charge, Vector3::new(x, y, z))
    }
}
