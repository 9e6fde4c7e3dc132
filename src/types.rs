use std::fmt;
use std::num::NonZeroU64;

/// Handle of a task registered with a [`Scheduler`](crate::dag::Scheduler).
///
/// Handles are handed out in registration order starting at 1 and are never
/// reused by the same scheduler instance. There is no zero handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(NonZeroU64);

impl TaskId {
    /// The handle given to the first task a scheduler registers.
    pub const FIRST: TaskId = TaskId(NonZeroU64::MIN);

    /// Wrap a raw handle value. Returns `None` for 0.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(TaskId)
    }

    /// Raw handle value (always >= 1).
    pub fn get(self) -> u64 {
        self.0.get()
    }

    /// Zero-based position of this task in registration order.
    ///
    /// Saturates at `usize::MAX` where `u64` is wider than `usize`; no
    /// registry can hold that many tasks, so lookups miss instead of aliasing.
    pub(crate) fn index(self) -> usize {
        usize::try_from(self.0.get() - 1).unwrap_or(usize::MAX)
    }

    /// Inverse of [`index`](Self::index).
    pub(crate) fn from_index(index: usize) -> TaskId {
        TaskId(NonZeroU64::MIN.saturating_add(index as u64))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<TaskId> for u64 {
    fn from(id: TaskId) -> Self {
        id.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_from_index() {
        for index in [0, 1, 41, 1 << 20] {
            assert_eq!(TaskId::from_index(index).index(), index);
        }
        assert_eq!(TaskId::FIRST.index(), 0);
    }

    #[test]
    fn largest_id_maps_to_an_index_no_registry_holds() {
        let last = TaskId::new(u64::MAX).unwrap();
        let expected = usize::try_from(u64::MAX - 1).unwrap_or(usize::MAX);
        assert_eq!(last.index(), expected);
    }
}
