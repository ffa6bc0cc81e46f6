mod engine;

pub use engine::domain::{Domain, Operator, RewardFn, TransitionFn};
pub use engine::episode::EpisodeReport;
pub use engine::error::{Component, EngineError};
pub use engine::mdp::{Mdp, StepOutcome};
pub use engine::q_learning::LearningReport;
pub use engine::snapshot::{Policy, PolicyRow, QRow, QTable, ValueRow, ValueTable};
pub use engine::solver::{Solution, SolverConfig, SolverConfigError};
pub use engine::stats::QEntry;
