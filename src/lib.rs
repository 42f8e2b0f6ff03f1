//! Numeric core behind a set of slides explaining Private Information Retrieval: matrix
//! multiplication, Learning With Errors, Regev encryption and a worked SimplePIR round-trip.
#![allow(non_snake_case)]

pub mod error;
pub mod harness;
pub mod math;
pub mod pir;

pub use error::{Error, Result};
pub use math::matrix::{multiply, Matrix};
pub use pir::example::{build_example_scenario, ExampleScenario};
