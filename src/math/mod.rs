//! Mathematical utilities: least squares, polynomial fits, finite differences.

pub mod diff;
pub mod ols;
pub mod poly;

pub use diff::*;
pub use ols::*;
pub use poly::*;
