//! Concurrent joins from independent tasks.
//!
//! Each joiner runs as its own tokio task against a shared tree, the way a
//! connection handler in a relay server would. Placement is atomic inside the
//! tree, so no relay ends up over capacity however the tasks interleave.

use std::sync::Arc;

use cascade_tree::{Error as TreeError, Placement};
use tokio::task::JoinSet;
use tracing::trace;

use crate::error::Result;
use crate::events::ParticipantId;
use crate::simulation::SimTree;

/// Outcome of one concurrent join.
pub type JoinOutcome = (ParticipantId, std::result::Result<Placement<ParticipantId>, TreeError>);

/// Register and place every participant in `ids` from its own task.
///
/// Returns one outcome per participant, in completion order. Participants
/// that found no slot are removed from the tree again.
pub async fn join_concurrently<I>(tree: Arc<SimTree>, ids: I, relay: bool) -> Result<Vec<JoinOutcome>>
where
    I: IntoIterator<Item = ParticipantId>,
{
    let mut tasks = JoinSet::new();
    for id in ids {
        let tree = Arc::clone(&tree);
        tasks.spawn(async move {
            tree.insert(id);
            let outcome = tree.insert_child(&id, relay);
            if outcome.is_err() {
                tree.delete(&id);
            }
            trace!(participant = %id, placed = outcome.is_ok(), "Concurrent join finished");
            (id, outcome)
        });
    }

    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined?);
    }
    Ok(outcomes)
}
