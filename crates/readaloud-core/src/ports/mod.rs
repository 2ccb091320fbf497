//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces the orchestrator expects from the host
//! environment and the one surface it offers upward to UI adapters. They
//! contain no implementation details and no host-specific types.

pub mod engine;
pub mod extractor;
pub mod reader;
pub mod tabs;
