//! Books common to the loan histories of several members.

use super::ordering::insert_sorted_unique;
use crate::domain::{MemberRecord, SerialNumber};

/// Serials that every member in `members` has returned at least once.
///
/// Candidates come from the first member's history; the result is sorted by
/// serial and holds each serial once, even when a member borrowed the same
/// copy repeatedly. A single member yields their whole (deduplicated)
/// history. Callers are expected to pass distinct members.
pub fn common_history<'a>(members: &[&'a MemberRecord]) -> Vec<&'a SerialNumber> {
    let Some((first, others)) = members.split_first() else {
        return Vec::new();
    };

    let mut common = Vec::new();
    for serial in first.completed_loans() {
        if others.iter().all(|member| member.has_returned(serial)) {
            insert_sorted_unique(&mut common, serial, |s| s.sort_key());
        }
    }

    common
}
