pub mod agent;
pub mod base;
pub mod random;

pub use agent::{Agent, AgentError, Decision, DecisionContext, DecisionKind, pick_role};
pub use base::BasePlayer;
pub use random::RandomPlayer;
