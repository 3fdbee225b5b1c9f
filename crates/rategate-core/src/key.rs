//! Key composer - derives the storage key identifying a quota bucket.

use std::sync::Arc;

use crate::domain::{LimitDescriptor, RequestContext};
use crate::ports::KeyGenerationHook;

const DELIMITER: &str = ".";

/// Compose the storage key for a resolved descriptor.
///
/// Segments: the descriptor's method list (sorted, dot-joined, empty list
/// giving an empty segment), then the request alias. When the rule came
/// from the path matcher, `path_alias` carries the matched path pattern
/// and replaces the route/handler alias. Each registered hook is invoked
/// exactly once with the segment list before the key is finalized.
pub fn compose(
    descriptor: &LimitDescriptor,
    request: &RequestContext,
    path_alias: Option<&str>,
    hooks: &[Arc<dyn KeyGenerationHook>],
) -> String {
    let alias = match path_alias {
        Some(path) => normalize_path(path),
        None => request.alias(),
    };

    let mut segments = vec![descriptor.method_segment(), alias];
    for hook in hooks {
        hook.augment(request, &mut segments);
    }
    segments.join(DELIMITER)
}

fn normalize_path(path: &str) -> String {
    path.trim_matches('/').replace('/', DELIMITER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HandlerId;

    fn get_users() -> RequestContext {
        RequestContext::new("GET", "/api/users")
    }

    #[test]
    fn test_key_from_route_name() {
        let descriptor = LimitDescriptor::new(10, 60).with_methods(["POST", "GET"]);
        let request = get_users().with_route_name("api_users");
        assert_eq!(compose(&descriptor, &request, None, &[]), "GET.POST.api_users");
    }

    #[test]
    fn test_key_from_handler_identity() {
        let descriptor = LimitDescriptor::new(10, 60);
        let request = get_users().with_handler(HandlerId::Method {
            class: "api::UserController".to_string(),
            method: "index".to_string(),
        });
        // Wildcard descriptor yields an empty leading segment.
        assert_eq!(
            compose(&descriptor, &request, None, &[]),
            ".api.UserController.index"
        );
    }

    #[test]
    fn test_key_from_matched_path() {
        let descriptor = LimitDescriptor::new(10, 60).with_methods(["GET"]);
        let request = get_users();
        assert_eq!(
            compose(&descriptor, &request, Some("/api/users/"), &[]),
            "GET.api.users"
        );
    }

    #[test]
    fn test_key_falls_back_to_other() {
        let descriptor = LimitDescriptor::new(10, 60).with_methods(["GET"]);
        assert_eq!(compose(&descriptor, &get_users(), None, &[]), "GET.other");
    }

    #[test]
    fn test_hooks_append_segments() {
        struct PerUser;
        impl KeyGenerationHook for PerUser {
            fn augment(&self, _request: &RequestContext, segments: &mut Vec<String>) {
                segments.push("user-42".to_string());
            }
        }

        let descriptor = LimitDescriptor::new(10, 60).with_methods(["GET"]);
        let request = get_users().with_route_name("api_users");
        let hooks: Vec<Arc<dyn KeyGenerationHook>> = vec![Arc::new(PerUser)];
        assert_eq!(
            compose(&descriptor, &request, None, &hooks),
            "GET.api_users.user-42"
        );
    }
}
