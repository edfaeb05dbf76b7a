use std::{path::PathBuf, time::Instant};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use shellint::{
    basis::Shell,
    config::{load_basis_set, load_molecule},
    matrix::{one_body_matrix, shell_offsets, ElectronTensor},
    EngineConfig, OneBodyEngine, OneBodyOperator, TwoBodyEngine, TwoBodyKernel,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble and print a one-body integral matrix
    #[command(name = "one-body")]
    OneBody {
        /// Basis set in the Basis Set Exchange JSON format
        #[arg(long, short)]
        basis: PathBuf,
        /// A path to the molecule, positions in bohr
        #[arg(long, short)]
        molecule: PathBuf,
        #[arg(long, short, value_enum, default_value_t = Operator::Overlap)]
        operator: Operator,
        /// Use solid harmonics for shells with l >= 2
        #[arg(long)]
        pure: bool,
    },
    /// Compute the electron repulsion integrals and print the unique ones
    #[command(name = "eri")]
    ElectronRepulsion {
        /// Basis set in the Basis Set Exchange JSON format
        #[arg(long, short)]
        basis: PathBuf,
        /// A path to the molecule, positions in bohr
        #[arg(long, short)]
        molecule: PathBuf,
        /// Use solid harmonics for shells with l >= 2
        #[arg(long)]
        pure: bool,
        /// Integrals with a smaller magnitude are not printed
        #[arg(long, default_value_t = 1e-10)]
        threshold: f64,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Operator {
    Overlap,
    Kinetic,
    Nuclear,
}

impl From<Operator> for OneBodyOperator {
    fn from(operator: Operator) -> Self {
        match operator {
            Operator::Overlap => OneBodyOperator::Overlap,
            Operator::Kinetic => OneBodyOperator::Kinetic,
            Operator::Nuclear => OneBodyOperator::Nuclear,
        }
    }
}

/// Largest primitive count and angular momentum over `shells`.
fn engine_limits(shells: &[Shell]) -> (usize, usize) {
    shells.iter().fold((1, 0), |(nprim, l), shell| {
        (nprim.max(shell.nprim()), l.max(shell.angular_momentum()))
    })
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::OneBody {
            basis,
            molecule,
            operator,
            pure,
        } => {
            let basis_set = load_basis_set(&basis)
                .with_context(|| format!("loading basis set {}", basis.display()))?;
            let molecule = load_molecule(&molecule)
                .with_context(|| format!("loading molecule {}", molecule.display()))?;
            let shells = molecule.shells(&basis_set, pure)?;
            log::info!(
                "{} shells on {} atoms",
                shells.len(),
                molecule.atoms().len()
            );

            let (max_primitives, max_l) = engine_limits(&shells);
            let start = Instant::now();

            let mut engine =
                OneBodyEngine::new(EngineConfig::new(operator.into(), max_primitives, max_l))?;
            engine.set_nuclear_charges(molecule.point_charges())?;

            let matrix = one_body_matrix(&shells, &mut engine)?;

            println!(
                "{operator:?} matrix over {} shells ({} functions) in {:0.2?}",
                shells.len(),
                matrix.nrows(),
                start.elapsed()
            );
            println!("{matrix:.6}");
        }

        Command::ElectronRepulsion {
            basis,
            molecule,
            pure,
            threshold,
        } => {
            let basis_set = load_basis_set(&basis)
                .with_context(|| format!("loading basis set {}", basis.display()))?;
            let molecule = load_molecule(&molecule)
                .with_context(|| format!("loading molecule {}", molecule.display()))?;
            let shells = molecule.shells(&basis_set, pure)?;
            log::info!(
                "{} shells on {} atoms",
                shells.len(),
                molecule.atoms().len()
            );

            let (max_primitives, max_l) = engine_limits(&shells);
            let start = Instant::now();

            let mut engine = TwoBodyEngine::new(EngineConfig::new(
                TwoBodyKernel::Coulomb,
                max_primitives,
                max_l,
            ))?;
            let tensor = ElectronTensor::from_shells(&shells, &mut engine)?;

            let n = shell_offsets(&shells)[shells.len()];
            println!(
                "electron repulsion integrals over {n} functions in {:0.2?}",
                start.elapsed()
            );

            for i in 0..n {
                for j in 0..=i {
                    for k in 0..=i {
                        let lmax = if k == i { j } else { k };
                        for l in 0..=lmax {
                            let value = tensor[(i, j, k, l)];
                            if value.abs() >= threshold {
                                println!("({i:>3} {j:>3}|{k:>3} {l:>3}) = {value:>16.10}");
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
