//! Tenant resolution from request credentials.
//!
//! Every store operation is scoped to a tenant id. The transport layer
//! derives that id from the request's Authorization header through a
//! [`TenantResolver`], so the storage layer never inspects credentials
//! itself. Unauthenticated or unrecognized requests fall back to the
//! default tenant.

/// The tenant used when no credential selects one.
pub const DEFAULT_TENANT: &str = "";

/// Maps request credentials to a tenant id.
pub trait TenantResolver: Send + Sync {
    /// Resolve the tenant id for a request, given its Authorization header.
    fn resolve(&self, authorization: Option<&str>) -> String;
}

/// Resolver for bearer tokens carrying an inline tenant marker.
///
/// A token of the form `!acme` selects tenant `acme`; any other token, a
/// non-bearer credential, or a missing header resolves to
/// [`DEFAULT_TENANT`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BearerTenantResolver;

impl TenantResolver for BearerTenantResolver {
    fn resolve(&self, authorization: Option<&str>) -> String {
        authorization
            .and_then(|header| header.strip_prefix("Bearer "))
            .and_then(|token| token.strip_prefix('!'))
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_TENANT.to_string())
    }
}
