//! Cascade Simulation
//!
//! Drives a [`cascade_tree::Tree`] the way a relay server would: viewers join,
//! some offer to relay, some leave, and the children of departed relays are
//! placed again.
//!
//! # Usage
//!
//! ```rust
//! use cascade_sim::{Simulation, SimulationConfig};
//!
//! let mut sim = Simulation::new(SimulationConfig::default().with_participants(10))?;
//! let stats = sim.run()?;
//! assert_eq!(stats.joins + stats.rejections, 10);
//! # Ok::<(), cascade_sim::Error>(())
//! ```

mod concurrent;
mod error;
mod events;
mod simulation;

pub use concurrent::{join_concurrently, JoinOutcome};
pub use error::{Error, Result};
pub use events::{ParticipantId, TreeEvent};
pub use simulation::{SimTree, Simulation, SimulationConfig, SimulationStats};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulation_records_events() {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        sim.join().unwrap();
        sim.join().unwrap();

        let joined = sim
            .events()
            .iter()
            .filter(|e| matches!(e, TreeEvent::Joined { .. }))
            .count();
        assert_eq!(joined, 2);
    }
}
