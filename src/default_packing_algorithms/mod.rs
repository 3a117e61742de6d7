pub mod first_fit_decreasing;
pub mod one_per_machine;
pub mod smallest_fit;
