mod engine;
mod phase;
mod ticker;

pub use engine::PhaseTimer;
pub use phase::Phase;
pub use ticker::{IntervalTicker, ManualTicker, TickSource, TICK_PERIOD};
