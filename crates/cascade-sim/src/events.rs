//! Tree events recorded during a simulation run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A simulated participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Events that occur while participants join and leave.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TreeEvent {
    /// A broadcaster was registered as a head
    HeadAdded {
        participant: ParticipantId,
        frame: u64,
    },

    /// A participant was placed under a relay
    Joined {
        participant: ParticipantId,
        parent: ParticipantId,
        level: u32,
        relay: bool,
        frame: u64,
    },

    /// No relay had room for the participant
    Rejected {
        participant: ParticipantId,
        reason: String,
        frame: u64,
    },

    /// A participant left the tree
    Left {
        participant: ParticipantId,
        children: usize,
        frame: u64,
    },

    /// A child of a departed relay was placed again
    Rehomed {
        participant: ParticipantId,
        parent: ParticipantId,
        level: u32,
        frame: u64,
    },

    /// A child of a departed relay could not be placed again
    Stranded {
        participant: ParticipantId,
        frame: u64,
    },
}

impl TreeEvent {
    /// Get the frame number for this event.
    pub fn frame(&self) -> u64 {
        match self {
            Self::HeadAdded { frame, .. }
            | Self::Joined { frame, .. }
            | Self::Rejected { frame, .. }
            | Self::Left { frame, .. }
            | Self::Rehomed { frame, .. }
            | Self::Stranded { frame, .. } => *frame,
        }
    }

    /// Get the participant this event is about.
    pub fn participant(&self) -> ParticipantId {
        match self {
            Self::HeadAdded { participant, .. }
            | Self::Joined { participant, .. }
            | Self::Rejected { participant, .. }
            | Self::Left { participant, .. }
            | Self::Rehomed { participant, .. }
            | Self::Stranded { participant, .. } => *participant,
        }
    }
}
