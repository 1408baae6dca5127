//! Room track queue
//!
//! FIFO for the playback loop, randomly mutable for commands:
//! ```text
//! append ──► [ t0 | t1 | t2 | ... ] ──► take_next (playback loop)
//!              ▲     ▲
//!        remove_at / shuffle / clear / peek_range (commands)
//! ```
//! Indices are 0-based into the current snapshot; no index survives a mutation.
//!
//! Exactly one waiter (the room's playback loop) is supported on `take_next`.
//! With several concurrent waiters, which one receives a given track is
//! unspecified.

use jukebox_core::{JukeboxError, Result, Track};
use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::VecDeque;
use tokio::sync::Notify;

/// Ordered queue of pending tracks for one room
#[derive(Debug, Default)]
pub struct TrackQueue {
    tracks: Mutex<VecDeque<Track>>,
    available: Notify,
}

impl TrackQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Add track to the tail and wake the waiting loop
    ///
    /// Returns the new queue length
    pub fn append(&self, track: Track) -> usize {
        let len = {
            let mut tracks = self.tracks.lock();
            tracks.push_back(track);
            tracks.len()
        };
        self.available.notify_one();
        len
    }

    /// Wait until at least one track is queued, then remove and return the head
    ///
    /// Cancel-safe: the head is removed in the same poll that returns it, so
    /// dropping this future never loses a track.
    pub async fn take_next(&self) -> Track {
        loop {
            let notified = self.available.notified();
            tokio::pin!(notified);
            // Register before checking so an append between the check and the
            // await still wakes us.
            notified.as_mut().enable();

            if let Some(track) = self.tracks.lock().pop_front() {
                return track;
            }

            notified.await;
        }
    }

    /// Remove the track at `index`, shifting later tracks forward
    pub fn remove_at(&self, index: usize) -> Result<Track> {
        let mut tracks = self.tracks.lock();
        let len = tracks.len();
        tracks
            .remove(index)
            .ok_or(JukeboxError::IndexOutOfRange { index, len })
    }

    /// Randomly permute the queued tracks (Fisher-Yates)
    pub fn shuffle(&self) {
        let mut rng = thread_rng();
        self.tracks.lock().make_contiguous().shuffle(&mut rng);
    }

    /// Drop every queued track
    ///
    /// A loop already waiting in `take_next` keeps waiting.
    /// Returns the number of tracks removed.
    pub fn clear(&self) -> usize {
        let mut tracks = self.tracks.lock();
        let removed = tracks.len();
        tracks.clear();
        removed
    }

    /// Snapshot of tracks in `[start, end)`, bounds clamped to the queue
    pub fn peek_range(&self, start: usize, end: usize) -> Vec<Track> {
        let tracks = self.tracks.lock();
        let end = end.min(tracks.len());
        let start = start.min(end);
        tracks.range(start..end).cloned().collect()
    }

    /// Total number of tracks in queue
    pub fn len(&self) -> usize {
        self.tracks.lock().len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebox_core::{StreamSource, UserId};
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    fn create_test_track(title: &str) -> Track {
        Track::new(
            title,
            format!("https://example.com/watch?v={}", title),
            StreamSource::new(format!("https://cdn.example.com/{}.webm", title)),
            UserId::new(1),
        )
    }

    fn titles(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn create_empty_queue() {
        let queue = TrackQueue::new();
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
        assert!(queue.peek_range(0, usize::MAX).is_empty());
    }

    #[test]
    fn append_reports_new_length() {
        let queue = TrackQueue::new();
        assert_eq!(queue.append(create_test_track("A")), 1);
        assert_eq!(queue.append(create_test_track("B")), 2);
        assert!(!queue.is_empty());
    }

    #[tokio::test]
    async fn take_next_is_fifo() {
        let queue = TrackQueue::new();
        for title in ["A", "B", "C"] {
            queue.append(create_test_track(title));
        }

        assert_eq!(queue.take_next().await.title, "A");
        assert_eq!(queue.take_next().await.title, "B");
        assert_eq!(queue.take_next().await.title, "C");
        assert!(queue.is_empty());
    }

    #[test]
    fn remove_at_shifts_remaining_tracks() {
        let queue = TrackQueue::new();
        for title in ["A", "B", "C"] {
            queue.append(create_test_track(title));
        }

        let removed = queue.remove_at(1).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(titles(&queue.peek_range(0, usize::MAX)), ["A", "C"]);
    }

    #[test]
    fn remove_at_out_of_range_leaves_queue_untouched() {
        let queue = TrackQueue::new();
        queue.append(create_test_track("A"));

        let err = queue.remove_at(1).unwrap_err();
        assert_eq!(err, JukeboxError::IndexOutOfRange { index: 1, len: 1 });
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn peek_range_clamps_bounds() {
        let queue = TrackQueue::new();
        for title in ["A", "B", "C"] {
            queue.append(create_test_track(title));
        }

        assert_eq!(titles(&queue.peek_range(1, 2)), ["B"]);
        assert_eq!(titles(&queue.peek_range(1, 100)), ["B", "C"]);
        assert!(queue.peek_range(5, 10).is_empty());
        assert!(queue.peek_range(2, 1).is_empty());
        // Listing never consumes
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn shuffle_keeps_every_track() {
        let queue = TrackQueue::new();
        for i in 0..20 {
            queue.append(create_test_track(&i.to_string()));
        }

        queue.shuffle();

        let mut after: Vec<String> = queue.peek_range(0, usize::MAX).into_iter().map(|t| t.title).collect();
        after.sort_by_key(|t| t.parse::<u32>().unwrap());
        let expected: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        assert_eq!(after, expected);
    }

    #[test]
    fn clear_reports_removed_count() {
        let queue = TrackQueue::new();
        queue.append(create_test_track("A"));
        queue.append(create_test_track("B"));

        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn take_next_waits_for_append() {
        let queue = Arc::new(TrackQueue::new());
        let waiter = tokio::spawn({
            let queue = Arc::clone(&queue);
            async move { queue.take_next().await }
        });

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        queue.append(create_test_track("late"));
        let track = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(track.title, "late");
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn clear_does_not_release_waiter() {
        let queue = Arc::new(TrackQueue::new());
        let waiter = tokio::spawn({
            let queue = Arc::clone(&queue);
            async move { queue.take_next().await }
        });

        tokio::task::yield_now().await;
        queue.clear();
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        queue.append(create_test_track("after-clear"));
        let track = waiter.await.unwrap();
        assert_eq!(track.title, "after-clear");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_are_each_taken_once() {
        const PRODUCERS: usize = 8;
        const PER_PRODUCER: usize = 50;
        let total = PRODUCERS * PER_PRODUCER;

        let queue = Arc::new(TrackQueue::new());
        let consumer = tokio::spawn({
            let queue = Arc::clone(&queue);
            async move {
                let mut taken = Vec::with_capacity(total);
                for _ in 0..total {
                    taken.push(queue.take_next().await.title);
                }
                taken
            }
        });

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let queue = Arc::clone(&queue);
                tokio::spawn(async move {
                    for n in 0..PER_PRODUCER {
                        queue.append(create_test_track(&format!("{p}-{n}")));
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.await.unwrap();
        }

        let taken = tokio::time::timeout(Duration::from_secs(10), consumer)
            .await
            .unwrap()
            .unwrap();
        let distinct: HashSet<&str> = taken.iter().map(String::as_str).collect();
        assert_eq!(taken.len(), total);
        assert_eq!(distinct.len(), total);
        assert!(queue.is_empty());

        // Each producer's tracks come out in the order it appended them
        for p in 0..PRODUCERS {
            let prefix = format!("{p}-");
            let order: Vec<usize> = taken
                .iter()
                .filter_map(|title| title.strip_prefix(&prefix))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(order, (0..PER_PRODUCER).collect::<Vec<_>>());
        }
    }
}
