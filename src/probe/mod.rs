mod detection;
mod introspection;
mod runner;

pub use detection::*;
pub use introspection::*;
pub use runner::*;
