//! Instance view consumed by the router.

/// Read-only view of a live server instance.
///
/// The candidate list is supplied by the caller, typically sourced from a
/// service-registry client; the router only reads the owning service name,
/// the version attribute and the generic tag map.
pub trait RouteTarget {
    /// Name of the service this instance belongs to.
    fn service_name(&self) -> &str;

    /// The instance's version attribute.
    fn version(&self) -> &str;

    /// Generic tag lookup.
    fn tag(&self, key: &str) -> Option<&str>;
}
