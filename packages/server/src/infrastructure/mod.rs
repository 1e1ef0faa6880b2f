//! Infrastructure layer: concrete implementations of the domain traits.

pub mod dto;
pub mod repository;
pub mod task_queue;
pub mod transport;
