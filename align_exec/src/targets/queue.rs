//! Operator target queue

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use std::collections::VecDeque;

// Internal
use super::{Target, TargetRegistry};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A FIFO queue of pending targets.
///
/// The operator appends targets to the back and the drive controller consumes
/// them from the front. Edits never reorder the remaining entries.
#[derive(Debug, Clone, Default)]
pub struct TargetQueue {
    queue: VecDeque<Target>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TargetQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Resolve a name through the registry and append the target.
    ///
    /// Unknown names are rejected with a warning, leaving the queue
    /// unchanged. Returns true if the target was queued.
    pub fn push_named(&mut self, registry: &TargetRegistry, name: &str) -> bool {
        match registry.resolve(name) {
            Some(target) => {
                info!("Queued target {}", target.name);
                self.queue.push_back(target);
                true
            }
            None => {
                warn!("Unknown target name \"{}\", not queued", name);
                false
            }
        }
    }

    /// Append an already-resolved target.
    pub fn push(&mut self, target: Target) {
        self.queue.push_back(target);
    }

    /// Remove and return the front target.
    pub fn pop_front(&mut self) -> Option<Target> {
        self.queue.pop_front()
    }

    /// Remove the front target, for operator queue edits.
    pub fn delete_front(&mut self) {
        if let Some(t) = self.queue.pop_front() {
            info!("Deleted front target {}", t.name);
        }
    }

    /// Remove the most recently queued target.
    pub fn delete_back(&mut self) {
        if let Some(t) = self.queue.pop_back() {
            info!("Deleted back target {}", t.name);
        }
    }

    /// Remove all queued targets.
    pub fn clear(&mut self) {
        if !self.queue.is_empty() {
            info!("Cleared {} queued targets", self.queue.len());
        }
        self.queue.clear();
    }

    /// The next target to be driven to, without consuming it.
    pub fn front(&self) -> Option<&Target> {
        self.queue.front()
    }

    pub fn has_queue(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Names of all queued targets, front first.
    pub fn names(&self) -> Vec<String> {
        self.queue.iter().map(|t| t.name.clone()).collect()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::targets::TargetParams;

    fn setup() -> (TargetRegistry, TargetQueue) {
        (
            TargetRegistry::new(TargetParams::default()),
            TargetQueue::new(),
        )
    }

    #[test]
    fn test_fifo_order() {
        let (reg, mut q) = setup();

        assert!(q.push_named(&reg, "C110"));
        assert!(q.push_named(&reg, "C230"));
        assert!(q.push_named(&reg, "SL"));

        assert_eq!(q.names(), vec!["C110", "C230", "SL"]);
        assert_eq!(q.pop_front().unwrap().name, "C110");
        assert_eq!(q.pop_front().unwrap().name, "C230");
        assert_eq!(q.pop_front().unwrap().name, "SL");
        assert!(q.pop_front().is_none());
    }

    #[test]
    fn test_unknown_name_leaves_queue_unchanged() {
        let (reg, mut q) = setup();

        q.push_named(&reg, "C110");
        assert!(!q.push_named(&reg, "C999"));
        assert_eq!(q.len(), 1);
        assert_eq!(q.names(), vec!["C110"]);
    }

    #[test]
    fn test_edits() {
        let (reg, mut q) = setup();

        q.push_named(&reg, "C110");
        q.push_named(&reg, "C230");
        q.push_named(&reg, "SR");

        q.delete_back();
        assert_eq!(q.names(), vec!["C110", "C230"]);

        q.delete_front();
        assert_eq!(q.names(), vec!["C230"]);

        q.clear();
        assert!(q.is_empty());
        assert!(!q.has_queue());

        // Edits on an empty queue are no-ops
        q.delete_front();
        q.delete_back();
        q.clear();
        assert!(q.is_empty());
    }
}
