//! Junction Signal Simulation Library
//!
//! A live, in-memory model of traffic at a handful of signalled junctions.
//! The engine can be stepped directly, or shared between a periodic driver
//! and any number of query and control callers.

pub mod simulation;
