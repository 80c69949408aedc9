pub mod core;
mod effect_fn;
mod signal;

#[cfg(doctest)]
mod tests_readme;

pub use crate::core::EffectId;
pub use effect_fn::*;
pub use signal::*;
