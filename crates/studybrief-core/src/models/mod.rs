//! Request-scoped records read from the five study tables

pub mod plan;
pub mod study;

pub use plan::PlanRow;
pub use study::{Mistake, Objective, PracticeTest, Resource};
