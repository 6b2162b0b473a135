//! Demo world for the waypath crates: a lattice of waypoints and a swarm of
//! agents that route across it through a tick-driven request queue.

pub mod config;
pub mod lattice;
pub mod swarm;

pub use config::{SwarmConfig, SwarmConfigError};
pub use lattice::Lattice;
pub use swarm::{Agent, Swarm, SwarmStats};
