mod builder;
mod compiled;
mod error;
mod io;
mod spec;

pub use builder::ModelBuilder;
pub use compiled::CompiledModel;
pub use error::ModelError;
pub use io::{compile_yaml, load_yaml, save_yaml, solve_yaml};
pub use spec::{ModelSpec, OutcomeSpec, StateSpec, TransitionSpec};
