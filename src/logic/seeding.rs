//! Seeding: deterministic order of participants before bracket construction.

use crate::models::Participant;
use std::cmp::Reverse;

/// Order participants by rating (descending), then rank tier (descending).
///
/// The sort is stable: ties on both keys keep their input order, so seeding an
/// already seeded list changes nothing.
pub fn seed_participants(participants: &[Participant]) -> Vec<&Participant> {
    let mut seeded: Vec<&Participant> = participants.iter().collect();
    seeded.sort_by_key(|p| (Reverse(p.rating), Reverse(p.rank)));
    seeded
}
