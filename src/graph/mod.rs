pub mod builder;
pub mod ir;
pub mod merge;
pub mod name;

pub use ir::{DependencyFact, DependencyGraph, Entity, EntityKind};
pub use merge::WeightPolicy;
