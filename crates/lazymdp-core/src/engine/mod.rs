pub mod domain;
pub mod episode;
pub mod error;
mod explorer;
pub mod ids;
pub mod mdp;
mod policy;
pub mod q_learning;
pub mod snapshot;
pub mod solver;
pub mod stats;
mod value_iteration;

#[cfg(test)]
mod tests;
