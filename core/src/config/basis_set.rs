use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    basis::{BasisSet, ShellTemplate},
    error::BasisError,
};

#[derive(Deserialize)]
pub struct ConfigBasisSet {
    elements: HashMap<u32, ConfigElectronicConfiguration>,
}

#[derive(Deserialize)]
struct ConfigElectronicConfiguration {
    electron_shells: Vec<ConfigElectronShell>,
}

#[derive(Deserialize)]
struct ConfigElectronShell {
    function_type: String,
    angular_momentum: Vec<usize>,
    exponents: Vec<String>,
    coefficients: Vec<Vec<String>>,
}

impl ConfigElectronShell {
    fn pure(&self) -> Option<bool> {
        match self.function_type.as_str() {
            "gto_spherical" => Some(true),
            "gto_cartesian" => Some(false),
            _ => None,
        }
    }
}

impl TryFrom<ConfigBasisSet> for BasisSet {
    type Error = BasisError;

    fn try_from(value: ConfigBasisSet) -> Result<Self, Self::Error> {
        let mut atomic_mapping = HashMap::with_capacity(value.elements.len());

        for (element, configuration) in value.elements {
            let mut templates = Vec::new();

            for electron_shell in &configuration.electron_shells {
                let exponents = electron_shell
                    .exponents
                    .iter()
                    .map(|exponent| exponent.trim().parse::<f64>())
                    .collect::<Result<Vec<_>, _>>()?;

                // an sp shell lists one contraction per angular momentum, while a
                // generally contracted shell lists several contractions of one momentum
                let angular_momenta = &electron_shell.angular_momentum;
                let contractions = &electron_shell.coefficients;
                if angular_momenta.len() != 1 && angular_momenta.len() != contractions.len() {
                    return Err(BasisError::MalformedShell {
                        angular_momenta: angular_momenta.len(),
                        contractions: contractions.len(),
                    });
                }

                for (index, coefficients) in contractions.iter().enumerate() {
                    let l = angular_momenta[index.min(angular_momenta.len() - 1)];
                    let coefficients = coefficients
                        .iter()
                        .map(|coefficient| coefficient.trim().parse::<f64>())
                        .collect::<Result<Vec<_>, _>>()?;

                    templates.push(ShellTemplate {
                        l,
                        exponents: exponents.clone(),
                        coefficients,
                        pure: electron_shell.pure(),
                    });
                }
            }

            atomic_mapping.insert(element, templates);
        }

        Ok(Self::new(atomic_mapping))
    }
}
