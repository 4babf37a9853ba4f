//! Solver module tying screen capture to the model.

mod question_solver;

pub use question_solver::{
    capture_full_screen, freeze_screen, Answer, Solver, SolverConfig, SolverError,
};
