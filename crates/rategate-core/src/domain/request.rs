use super::QuotaRecord;

/// Identity of the handler the transport routed the request to.
///
/// Used as the quota bucket alias when the transport reports no route name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerId {
    /// A named handler, e.g. a controller class and method.
    Method { class: String, method: String },
    /// An anonymous handler.
    Closure,
    /// Anything the transport could not identify further.
    Other,
}

impl HandlerId {
    /// Normalized alias segment: `class.method` with path separators folded
    /// into dots, `closure`, or `other`.
    pub fn alias(&self) -> String {
        match self {
            HandlerId::Method { class, method } => {
                format!("{}.{}", class.replace("::", "."), method)
            }
            HandlerId::Closure => "closure".to_string(),
            HandlerId::Other => "other".to_string(),
        }
    }
}

/// What the transport layer reports about an inbound request, plus the
/// slot the engine annotates with the resulting quota record so downstream
/// consumers (response headers, logging) can read it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
    pub route_name: Option<String>,
    pub handler: Option<HandlerId>,
    /// Set by the engine after a decision; `None` until then or when no
    /// rule matched.
    pub rate_limit_info: Option<QuotaRecord>,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            route_name: None,
            handler: None,
            rate_limit_info: None,
        }
    }

    pub fn with_route_name(mut self, route_name: impl Into<String>) -> Self {
        self.route_name = Some(route_name.into());
        self
    }

    pub fn with_handler(mut self, handler: HandlerId) -> Self {
        self.handler = Some(handler);
        self
    }

    /// The bucket alias for this request: route name first, handler
    /// identity second, `other` as the last resort.
    pub fn alias(&self) -> String {
        if let Some(route_name) = &self.route_name {
            return route_name.clone();
        }
        match &self.handler {
            Some(handler) => handler.alias(),
            None => "other".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_name_wins_over_handler() {
        let context = RequestContext::new("GET", "/api/users")
            .with_route_name("api_users_list")
            .with_handler(HandlerId::Closure);
        assert_eq!(context.alias(), "api_users_list");
    }

    #[test]
    fn test_handler_aliases() {
        let handler = HandlerId::Method {
            class: "api::UserController".to_string(),
            method: "index".to_string(),
        };
        assert_eq!(handler.alias(), "api.UserController.index");
        assert_eq!(HandlerId::Closure.alias(), "closure");
        assert_eq!(HandlerId::Other.alias(), "other");
    }

    #[test]
    fn test_alias_falls_back_to_other() {
        let context = RequestContext::new("GET", "/api/users");
        assert_eq!(context.alias(), "other");
    }
}
