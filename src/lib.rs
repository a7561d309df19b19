//! Two-Lane Merge Traffic Simulation
//!
//! Simulates vehicle flow on a two-lane roadway with a merging on-ramp:
//! vehicles spawn at configurable rates, follow the traffic ahead, and
//! on-ramp vehicles execute a lane change into the through lane. The core
//! runs headless; renderers and report generators consume the read-only
//! query surface on [`simulation::SimWorld`].

pub mod simulation;
