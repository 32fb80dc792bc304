//! Seeded join/leave churn against a fan-out tree.

use std::sync::Arc;

use cascade_tree::{RelayNode, Tree, TreeConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::events::{ParticipantId, TreeEvent};

/// The tree type driven by the simulation.
pub type SimTree = Tree<RelayNode<ParticipantId>>;

/// Configuration for the simulation.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Seed for deterministic simulation
    pub seed: u64,
    /// Number of join attempts to perform
    pub participants: usize,
    /// Number of broadcaster heads registered up front
    pub heads: usize,
    /// Probability that a step is a departure instead of a join (0.0 - 1.0)
    pub leave_rate: f64,
    /// Probability that a joiner also offers to relay (0.0 - 1.0)
    pub relay_rate: f64,
    /// Tree configuration
    pub tree: TreeConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            participants: 64,
            heads: 1,
            leave_rate: 0.1,
            relay_rate: 0.75,
            tree: TreeConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of join attempts.
    #[must_use]
    pub fn with_participants(mut self, participants: usize) -> Self {
        self.participants = participants;
        self
    }

    /// Set the number of heads.
    #[must_use]
    pub fn with_heads(mut self, heads: usize) -> Self {
        self.heads = heads;
        self
    }

    /// Set the departure probability.
    #[must_use]
    pub fn with_leave_rate(mut self, leave_rate: f64) -> Self {
        self.leave_rate = leave_rate;
        self
    }

    /// Set the relay probability.
    #[must_use]
    pub fn with_relay_rate(mut self, relay_rate: f64) -> Self {
        self.relay_rate = relay_rate;
        self
    }

    /// Set the tree configuration.
    #[must_use]
    pub fn with_tree(mut self, tree: TreeConfig) -> Self {
        self.tree = tree;
        self
    }

    fn validate(&self) -> Result<()> {
        // A leave rate of 1.0 would never make progress on joins
        if !(0.0..1.0).contains(&self.leave_rate) {
            return Err(Error::InvalidConfig(format!(
                "leave rate {} outside [0, 1)",
                self.leave_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.relay_rate) {
            return Err(Error::InvalidConfig(format!(
                "relay rate {} outside [0, 1]",
                self.relay_rate
            )));
        }
        Ok(())
    }
}

/// Summary counters for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationStats {
    pub joins: usize,
    pub rejections: usize,
    pub leaves: usize,
    pub rehomed: usize,
    pub stranded: usize,
    /// Registered participants no head can currently reach
    pub orphans: usize,
    pub nodes: usize,
    pub depth: usize,
}

/// Drives a [`SimTree`] with seeded joins and departures and records events.
pub struct Simulation {
    config: SimulationConfig,
    tree: Arc<SimTree>,
    rng: StdRng,
    events: Vec<TreeEvent>,
    members: Vec<ParticipantId>,
    stranded: Vec<ParticipantId>,
    next_id: u64,
    frame: u64,
    stats: SimulationStats,
}

impl Simulation {
    /// Create a simulation and register its heads.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let tree = Tree::with_config(config.tree, RelayNode::fill)?;

        let mut sim = Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            tree: Arc::new(tree),
            events: Vec::new(),
            members: Vec::new(),
            stranded: Vec::new(),
            next_id: 0,
            frame: 0,
            stats: SimulationStats::default(),
        };

        for _ in 0..sim.config.heads {
            let id = sim.next_participant();
            sim.tree.insert(id);
            sim.tree.toggle_head(&id)?;
            sim.tree.toggle_connectable(&id)?;
            sim.events.push(TreeEvent::HeadAdded {
                participant: id,
                frame: sim.frame,
            });
        }

        Ok(sim)
    }

    fn next_participant(&mut self) -> ParticipantId {
        let id = ParticipantId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Shared handle to the underlying tree.
    pub fn tree(&self) -> Arc<SimTree> {
        Arc::clone(&self.tree)
    }

    /// Advance one frame: retry stranded children, then either a departure
    /// or a join.
    pub fn step(&mut self) -> Result<()> {
        self.retry_stranded()?;
        let leave = !self.members.is_empty() && self.rng.gen_bool(self.config.leave_rate);
        if leave {
            self.leave()?;
        } else {
            self.join()?;
        }
        self.frame += 1;
        Ok(())
    }

    /// Register a new participant and place it.
    pub fn join(&mut self) -> Result<ParticipantId> {
        let id = self.next_participant();
        let relay = self.rng.gen_bool(self.config.relay_rate);
        self.tree.insert(id);

        match self.tree.insert_child(&id, relay) {
            Ok(placement) => {
                self.members.push(id);
                self.stats.joins += 1;
                self.events.push(TreeEvent::Joined {
                    participant: id,
                    parent: placement.parent.id,
                    level: placement.level,
                    relay,
                    frame: self.frame,
                });
            }
            Err(err) if err.is_retryable() => {
                debug!(participant = %id, %err, "Join rejected");
                self.tree.delete(&id);
                self.stats.rejections += 1;
                self.events.push(TreeEvent::Rejected {
                    participant: id,
                    reason: err.to_string(),
                    frame: self.frame,
                });
            }
            Err(err) => return Err(err.into()),
        }
        Ok(id)
    }

    /// Remove a random non-head participant and re-place its children.
    fn leave(&mut self) -> Result<()> {
        let idx = self.rng.gen_range(0..self.members.len());
        let id = self.members[idx];
        self.depart(id)
    }

    fn depart(&mut self, id: ParticipantId) -> Result<()> {
        self.members.retain(|m| *m != id);
        self.stranded.retain(|s| *s != id);

        let children = self.tree.get(&id).map(|v| v.children).unwrap_or_default();
        self.tree.delete(&id);
        self.stats.leaves += 1;
        self.events.push(TreeEvent::Left {
            participant: id,
            children: children.len(),
            frame: self.frame,
        });

        for child in children {
            if !self.rehome(child)? {
                self.stats.stranded += 1;
                self.stranded.push(child);
                self.events.push(TreeEvent::Stranded {
                    participant: child,
                    frame: self.frame,
                });
            }
        }
        Ok(())
    }

    /// Try again to place children that found no slot when their relay left.
    fn retry_stranded(&mut self) -> Result<()> {
        for id in std::mem::take(&mut self.stranded) {
            if !self.rehome(id)? {
                self.stranded.push(id);
            }
        }
        Ok(())
    }

    /// Place `id` and its subtree again. Returns whether a slot was found.
    fn rehome(&mut self, id: ParticipantId) -> Result<bool> {
        match self.tree.insert_tree(&id) {
            Ok(placement) => {
                self.stats.rehomed += 1;
                self.events.push(TreeEvent::Rehomed {
                    participant: id,
                    parent: placement.parent.id,
                    level: placement.level,
                    frame: self.frame,
                });
                Ok(true)
            }
            Err(err) if err.is_retryable() => {
                debug!(participant = %id, %err, "Child stranded");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Step until the configured number of joins has been attempted.
    pub fn run(&mut self) -> Result<SimulationStats> {
        while self.stats.joins + self.stats.rejections < self.config.participants {
            self.step()?;
        }

        let stats = self.stats();
        info!(
            joins = stats.joins,
            rejections = stats.rejections,
            leaves = stats.leaves,
            orphans = stats.orphans,
            depth = stats.depth,
            "Simulation complete"
        );
        Ok(stats)
    }

    /// Current counters, including tree size and depth.
    pub fn stats(&self) -> SimulationStats {
        SimulationStats {
            orphans: self.stranded.len(),
            nodes: self.tree.len(),
            depth: self.tree.levels().len(),
            ..self.stats.clone()
        }
    }

    /// Get all recorded events.
    pub fn events(&self) -> &[TreeEvent] {
        &self.events
    }

    /// Render the event log as JSON.
    pub fn events_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }
}
