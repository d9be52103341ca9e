//! Generator matrices for digital nets, built row by row with an integer
//! programming solver.
//!
//! - [`field`] and [`matrix`]: prime-field arithmetic and square matrices
//! - [`compositions`]: the row splits a property has to check
//! - [`generators`]: equidistribution properties as model rows
//! - [`program`]: the text language describing a construction
//! - [`orchestrator`]: the backtracking construction loop

pub mod compositions;
pub mod field;
pub mod generators;
pub mod matrix;
pub mod orchestrator;
pub mod program;
mod subdet;
mod tiebreak;

pub use field::{FieldArithmetic, FieldElement, FieldError, GaloisField};
pub use generators::{Generator, GeneratorError, Modifier, RowContext};
pub use matrix::{GfMatrix, MatrixError, parse_matrices, same_size};
pub use orchestrator::{Construction, ConstructionError, Orchestrator, OrchestratorConfig, retreat};
pub use program::{GeneratorFactory, Program, ProgramError, Registry};
pub use tiebreak::TieBreakSampler;
