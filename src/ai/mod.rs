mod agent;
mod indicator;
mod random;
mod scripted;

pub use agent::{Agent, Transition};
pub use indicator::{IndicatorAgent, IndicatorAgentConfig};
pub use random::RandomAgent;
pub use scripted::ScriptedAgent;
