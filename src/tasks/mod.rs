//! Background Tasks Module
//!
//! Periodic maintenance tasks that run alongside the components.
//!
//! # Tasks
//! - TTL sweep: removes expired cache entries at a configured interval

mod sweeper;

pub use sweeper::spawn_sweep_task;
