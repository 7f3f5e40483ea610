//! Fair rotation of performers
//!
//! The next performer is drawn at random, weighted by how many songs each
//! still has queued, while never repeating the previous performer unless they
//! are the only one left with songs. The random source is always injected.

use std::collections::HashMap;

use rand::Rng;
use shared::{PerformerId, QueueEntry};

/// Queued song count per performer, in order of first appearance in the queue
///
/// An entry shared by several performers counts once for each of them.
pub fn remaining_counts(queue: &[QueueEntry]) -> Vec<(PerformerId, usize)> {
    let mut counts: Vec<(PerformerId, usize)> = Vec::new();
    let mut index: HashMap<&PerformerId, usize> = HashMap::new();

    for entry in queue.iter().filter(|e| e.is_queued()) {
        for performer_id in &entry.performer_ids {
            match index.get(performer_id) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    index.insert(performer_id, counts.len());
                    counts.push((performer_id.clone(), 1));
                }
            }
        }
    }

    counts
}

/// Weight of a performer with `remaining` queued songs
pub fn weight(remaining: usize) -> f64 {
    1.0 + remaining as f64
}

/// Choose who sings next, or `None` when no queued songs remain
pub fn select_performer<R>(
    queue: &[QueueEntry],
    last_performer_id: Option<&PerformerId>,
    rng: &mut R,
) -> Option<PerformerId>
where
    R: Rng + ?Sized,
{
    let remaining: Vec<(PerformerId, usize)> = remaining_counts(queue)
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .collect();

    let eligible: Vec<(PerformerId, usize)> = remaining
        .iter()
        .filter(|(id, _)| Some(id) != last_performer_id)
        .cloned()
        .collect();

    // The last performer may repeat only when nobody else has songs left
    if eligible.is_empty() {
        return weighted_pick(&remaining, rng);
    }
    weighted_pick(&eligible, rng)
}

fn weighted_pick<R>(pool: &[(PerformerId, usize)], rng: &mut R) -> Option<PerformerId>
where
    R: Rng + ?Sized,
{
    let (last, _) = pool.last()?;
    let total: f64 = pool.iter().map(|(_, count)| weight(*count)).sum();
    let draw = rng.gen_range(0.0..total);

    let mut cumulative = 0.0;
    for (id, count) in pool {
        cumulative += weight(*count);
        if cumulative > draw {
            return Some(id.clone());
        }
    }

    Some(last.clone())
}
