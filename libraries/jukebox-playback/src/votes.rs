//! Skip-vote aggregation
//!
//! The current track's requester skips unilaterally. Anyone else adds one vote;
//! once the tally reaches the threshold a skip is forced. A voter stays on the
//! roll until the next track starts, so voting twice during the same play is
//! rejected even after the skip fired.

use jukebox_core::{JukeboxError, Result, UserId};
use std::collections::HashSet;

/// Result of a counted vote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// Skip the current track now
    Skip,

    /// Vote recorded, threshold not reached yet
    Counted {
        /// Votes so far for this track
        votes: usize,
        /// Votes needed to skip
        required: usize,
    },
}

/// Voters for the track currently playing
#[derive(Debug, Clone)]
pub struct SkipVotes {
    voters: HashSet<UserId>,
    threshold: usize,
}

impl SkipVotes {
    /// Create an empty roll; a threshold of 0 is treated as 1
    pub fn new(threshold: usize) -> Self {
        Self {
            voters: HashSet::new(),
            threshold: threshold.max(1),
        }
    }

    /// Record a vote from `voter` against a track queued by `requester`
    pub fn cast(&mut self, voter: UserId, requester: UserId) -> Result<VoteOutcome> {
        if voter == requester {
            return Ok(VoteOutcome::Skip);
        }

        if !self.voters.insert(voter) {
            return Err(JukeboxError::AlreadyVoted);
        }

        if self.voters.len() >= self.threshold {
            Ok(VoteOutcome::Skip)
        } else {
            Ok(VoteOutcome::Counted {
                votes: self.voters.len(),
                required: self.threshold,
            })
        }
    }

    /// Forget every vote (a new track started)
    pub fn reset(&mut self) {
        self.voters.clear();
    }

    /// Votes recorded for the current track
    pub fn count(&self) -> usize {
        self.voters.len()
    }

    /// Votes needed to force a skip
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}
