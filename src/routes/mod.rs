/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// so access control is applied explicitly at the module level (via Axum
/// layers) rather than per handler.

/// Routes accessible to all clients: the health check and login.
pub mod public;

/// Routes protected by the `AuthUser` extractor middleware.
/// Requires a valid bearer token.
pub mod authenticated;
