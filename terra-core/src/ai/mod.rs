//! The AI task scheduler (§4.5).

pub mod scheduler;
pub mod task;

pub use scheduler::AiScheduler;
pub use task::{AiTask, MUTEX_JUMP, MUTEX_LOOK, MUTEX_MOVE};
