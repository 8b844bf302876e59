//! Deterministic simulation testing over random research graphs.
//!
//! A seeded generator writes a Turtle document; the simulator loads and
//! indexes it and runs the invariant checker:
//! - indexed entities equal distinct subjects
//! - listing pages are disjoint and cover the listing, for many page sizes
//! - listings are ordered by label then identifier
//! - empty searches return nothing, and labels can be searched for
//! - cross-references stay inside the graph
//! - rebuilding from the same document yields the same index
//!
//! Given the same seed, execution is identical.
//!
//! # Usage
//!
//! ```ignore
//! use simulation::{Simulator, SimulatorConfig};
//!
//! let result = Simulator::new(SimulatorConfig::new(12345)).run();
//! assert!(result.invariant_violations.is_empty());
//! ```

mod graph_gen;
mod invariants;

pub use graph_gen::{GeneratedGraph, GraphGenConfig, GraphGenerator};
pub use invariants::{InvariantChecker, InvariantViolation};
pub use simulator::{SimulationResult, Simulator, SimulatorConfig};
