//! Merging results from the three strategies into one ordered response

use std::collections::HashSet;

use crate::models::DecodedCode;

/// Concatenate results in priority order (whole-frame decode, region
/// decodes, structural classification) and drop later entries whose value
/// was already seen. The first occurrence always wins, so a code found both
/// directly and inside an overlapping region appears once, at its highest
/// priority.
pub(crate) fn aggregate(
    direct: Option<DecodedCode>,
    regions: Vec<DecodedCode>,
    heuristic: Option<DecodedCode>,
) -> Vec<DecodedCode> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for code in direct.into_iter().chain(regions).chain(heuristic) {
        if seen.insert(code.value.clone()) {
            merged.push(code);
        }
    }

    merged
}
