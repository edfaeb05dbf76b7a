pub use set::{BasisSet, ShellTemplate};
pub use shell::{Contraction, Shell};

pub(crate) use shell::double_factorial;

mod set;
mod shell;
