//! Selection of the best candidate from a pooled result set.

use tracing::debug;

use super::language::labels_match;
use super::types::{Blacklist, SubtitleCandidate};

/// Pick the best candidate from a pool, or none.
///
/// Candidates whose locator appears in the blacklist are removed first.
/// The remaining candidates are ranked by the index of the first
/// preference their language label matches; candidates matching no
/// preference form the lowest-priority class but stay eligible, so a
/// pool with only unranked candidates still yields one (some subtitle
/// beats none). Ties within a rank class go to the earliest candidate in
/// pool order, which reflects source registration order.
pub fn select_best(
    pool: Vec<SubtitleCandidate>,
    preferred_languages: &[String],
    blacklist: &Blacklist,
) -> Option<SubtitleCandidate> {
    let unranked = preferred_languages.len();

    let mut best: Option<(usize, SubtitleCandidate)> = None;
    for candidate in pool {
        if blacklist.contains(&candidate.locator) {
            debug!(locator = %candidate.locator, "Skipping blacklisted candidate");
            continue;
        }

        let rank = preferred_languages
            .iter()
            .position(|pref| labels_match(&candidate.language, pref))
            .unwrap_or(unranked);

        // Strict comparison keeps the first candidate of a rank class.
        match &best {
            Some((best_rank, _)) if rank >= *best_rank => {}
            _ => best = Some((rank, candidate)),
        }

        if let Some((0, _)) = &best {
            break;
        }
    }

    best.map(|(rank, candidate)| {
        debug!(
            language = %candidate.language,
            rank = rank,
            locator = %candidate.locator,
            "Selected candidate"
        );
        candidate
    })
}
