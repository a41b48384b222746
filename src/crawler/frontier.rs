//! Crawl frontier: the FIFO of pending targets and the visited-set
//!
//! A target is keyed by its fragment-free URL string. Once a key has been
//! enqueued it is never enqueued again during the same run, so the queue
//! holds each URL at most once and draining it yields breadth-first order.

use crate::url::CrawlTarget;
use std::collections::{HashSet, VecDeque};

/// Pending and visited targets for one crawl run
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<CrawlTarget>,
    seen: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only `start`
    pub fn seeded(start: CrawlTarget) -> Self {
        let mut frontier = Self::new();
        frontier.enqueue(start);
        frontier
    }

    /// Appends `target` to the tail unless it was already queued or visited
    ///
    /// # Returns
    ///
    /// `true` if the target was added
    pub fn enqueue(&mut self, target: CrawlTarget) -> bool {
        if self.visited.contains(target.as_str()) || !self.seen.insert(target.as_str().to_string())
        {
            return false;
        }
        self.queue.push_back(target);
        true
    }

    /// Removes the earliest-enqueued target
    pub fn dequeue(&mut self) -> Option<CrawlTarget> {
        self.queue.pop_front()
    }

    /// Records `target` as processed
    ///
    /// # Returns
    ///
    /// `false` if it had already been visited
    pub fn mark_visited(&mut self, target: &CrawlTarget) -> bool {
        self.seen.insert(target.as_str().to_string());
        self.visited.insert(target.as_str().to_string())
    }

    pub fn is_visited(&self, target: &CrawlTarget) -> bool {
        self.visited.contains(target.as_str())
    }

    /// Number of pending targets
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
