//! FIFO lookup of a performer's next song

use shared::{PerformerId, QueueEntry};

/// Earliest queued entry that includes `performer_id`
///
/// Entries created at the same instant keep their queue order.
pub fn select_entry<'a>(queue: &'a [QueueEntry], performer_id: &PerformerId) -> Option<&'a QueueEntry> {
    queue
        .iter()
        .filter(|entry| entry.is_queued() && entry.includes(performer_id))
        .fold(None, |best: Option<&QueueEntry>, entry| match best {
            Some(current) if current.created_at <= entry.created_at => Some(current),
            _ => Some(entry),
        })
}
