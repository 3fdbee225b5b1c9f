//! Rule resolver - picks the single applicable descriptor for a request.

use crate::domain::LimitDescriptor;

/// Resolve the descriptor applying to `method` from an ordered candidate
/// list.
///
/// Precedence: a candidate naming the method exactly always wins over a
/// wildcard (empty method list), regardless of position. Among exact
/// matches the last one wins; a wildcard only fills the slot while no
/// match has been found yet.
pub fn resolve<'a>(candidates: &'a [LimitDescriptor], method: &str) -> Option<&'a LimitDescriptor> {
    let mut best: Option<&LimitDescriptor> = None;
    for candidate in candidates {
        if candidate.methods.iter().any(|m| m == method) {
            best = Some(candidate);
        } else if candidate.methods.is_empty() && best.is_none() {
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn for_methods<const N: usize>(methods: [&str; N], limit: i64) -> LimitDescriptor {
        LimitDescriptor::new(limit, 60).with_methods(methods)
    }

    #[test]
    fn test_empty_candidates_resolve_to_none() {
        assert_eq!(resolve(&[], "GET"), None);
    }

    #[test]
    fn test_no_match_resolves_to_none() {
        let candidates = [for_methods(["POST"], 10), for_methods(["PUT"], 20)];
        assert_eq!(resolve(&candidates, "GET"), None);
    }

    #[test]
    fn test_exact_match() {
        let candidates = [for_methods(["POST"], 10), for_methods(["GET"], 20)];
        assert_eq!(resolve(&candidates, "GET"), Some(&candidates[1]));
    }

    #[test]
    fn test_last_exact_match_wins() {
        let candidates = [for_methods(["GET"], 10), for_methods(["GET", "POST"], 20)];
        assert_eq!(resolve(&candidates, "GET"), Some(&candidates[1]));
    }

    #[test]
    fn test_wildcard_fills_empty_slot_only() {
        let candidates = [for_methods([], 10), for_methods([], 20)];
        assert_eq!(resolve(&candidates, "GET"), Some(&candidates[0]));
    }

    #[test]
    fn test_exact_match_beats_earlier_wildcard() {
        let candidates = [for_methods([], 10), for_methods(["GET"], 20)];
        assert_eq!(resolve(&candidates, "GET"), Some(&candidates[1]));
    }

    #[test]
    fn test_exact_match_beats_later_wildcard() {
        let candidates = [for_methods(["GET"], 10), for_methods([], 20)];
        assert_eq!(resolve(&candidates, "GET"), Some(&candidates[0]));
    }

    #[test]
    fn test_method_comparison_is_case_sensitive() {
        let candidates = [for_methods(["get"], 10)];
        assert_eq!(resolve(&candidates, "GET"), None);
    }
}
