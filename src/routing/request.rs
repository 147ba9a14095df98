//! Request attribute views evaluated by the match engine.

use std::collections::HashMap;

/// Read-only request attributes the match engine evaluates.
///
/// Two shapes are supported out of the box: a plain header map, and
/// [`RouteRequest`] for callers that also carry a source service, method
/// or path.
pub trait RequestDescriptor {
    fn header(&self, name: &str) -> Option<&str>;

    /// The calling service's declared name, if known.
    fn source_service(&self) -> Option<&str> {
        None
    }

    fn method(&self) -> Option<&str> {
        None
    }

    fn api_path(&self) -> Option<&str> {
        None
    }
}

impl RequestDescriptor for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Request shape carrying the full set of matchable attributes.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    pub headers: HashMap<String, String>,
    pub source_service: Option<String>,
    pub method: Option<String>,
    pub api_path: Option<String>,
}

impl RequestDescriptor for RouteRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    fn source_service(&self) -> Option<&str> {
        self.source_service.as_deref()
    }

    fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    fn api_path(&self) -> Option<&str> {
        self.api_path.as_deref()
    }
}
