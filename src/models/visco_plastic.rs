//! Elastic / visco-plastic / damage creep model metadata.
//!
//! The model combines Voce isotropic hardening (`s0`, `R`, `d`), a Perzyna
//! power-law flow rule (`n`, `eta`) and a modular creep damage law (`A`, `xi`,
//! `phi`). Integrating it is the simulator's business; the search only needs
//! the parameter names and the box it may sample from.

use crate::domain::ParameterSpace;
use crate::error::AppError;

pub const PARAM_NAMES: [&str; 8] = ["s0", "R", "d", "n", "eta", "A", "xi", "phi"];
pub const LOWER_BOUNDS: [f64; 8] = [0.0; 8];
pub const UPPER_BOUNDS: [f64; 8] = [1.0e2, 1.0e2, 1.0e1, 1.0e1, 1.0e4, 1.0e10, 1.0e1, 1.0e1];

pub fn parameter_space() -> Result<ParameterSpace, AppError> {
    ParameterSpace::new(
        PARAM_NAMES.iter().map(|s| s.to_string()).collect(),
        LOWER_BOUNDS.to_vec(),
        UPPER_BOUNDS.to_vec(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eight_bounded_parameters() {
        let space = parameter_space().unwrap();
        assert_eq!(space.dimension(), 8);
        assert_eq!(space.names[5], "A");
        assert!(space.contains(&space.midpoint()));
    }
}
