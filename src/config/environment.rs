//! Active environment resolution

use super::schema::Environment;

/// Primary environment variable naming the active environment
pub const ENV_VAR_PRIMARY: &str = "MCP_ENV";

/// Secondary environment variable consulted when [`ENV_VAR_PRIMARY`] is unset
pub const ENV_VAR_SECONDARY: &str = "APP_ENV";

/// Resolves the active environment
///
/// Resolution order: `explicit` → `MCP_ENV` → `APP_ENV` → `development`.
/// Unrecognised names are logged and replaced by `development`.
pub fn resolve_environment(explicit: Option<&str>) -> Environment {
    resolve_with(explicit, |name| std::env::var(name).ok())
}

/// Same as [`resolve_environment`] with an injectable variable lookup
pub fn resolve_with<F>(explicit: Option<&str>, lookup: F) -> Environment
where
    F: Fn(&str) -> Option<String>,
{
    let candidate = explicit
        .map(str::to_string)
        .or_else(|| lookup(ENV_VAR_PRIMARY))
        .or_else(|| lookup(ENV_VAR_SECONDARY))
        .filter(|value| !value.trim().is_empty());

    let Some(raw) = candidate else {
        return Environment::default();
    };

    match raw.parse::<Environment>() {
        Ok(env) => env,
        Err(_) => {
            tracing::warn!(
                environment = %raw,
                fallback = %Environment::default(),
                "Unrecognised environment, using default"
            );
            Environment::default()
        }
    }
}
