#![allow(clippy::uninlined_format_args)]

pub mod apis;
mod contract;
mod engine;
mod error;
mod gateway;
mod normalize;
mod orchestrator;
mod signers;
mod strategy;
mod wrapper;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use contract::*;
pub use engine::*;
pub use error::*;
pub use gateway::*;
pub use normalize::*;
pub use orchestrator::*;
pub use signers::*;
pub use strategy::*;
pub use wrapper::*;
