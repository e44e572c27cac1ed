/// How new staff accounts come into existence.
///
/// The default is admin-gated creation through `POST /users`; `Open`
/// additionally mounts an unauthenticated `POST /signup` that always
/// creates `sales` accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMode {
    Open,
    AdminOnly,
}

impl RegistrationMode {
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "open" => Some(Self::Open),
            "admin-only" => Some(Self::AdminOnly),
            _ => None,
        }
    }
}

impl Default for RegistrationMode {
    fn default() -> Self {
        Self::AdminOnly
    }
}

/// API service configuration loaded from environment variables.
#[derive(Debug)]
pub struct ApiConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing bearer tokens.
    pub jwt_secret: String,
    /// TCP port to listen on (default 3110). Env var: `API_PORT`.
    pub api_port: u16,
    /// `open` or `admin-only` (default). Env var: `REGISTRATION_MODE`.
    pub registration_mode: RegistrationMode,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            api_port: std::env::var("API_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3110),
            registration_mode: std::env::var("REGISTRATION_MODE")
                .ok()
                .map(|v| RegistrationMode::from_str_opt(&v).expect("invalid REGISTRATION_MODE"))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_registration_mode() {
        assert_eq!(
            RegistrationMode::from_str_opt("open"),
            Some(RegistrationMode::Open)
        );
        assert_eq!(
            RegistrationMode::from_str_opt("admin-only"),
            Some(RegistrationMode::AdminOnly)
        );
        assert_eq!(RegistrationMode::from_str_opt("invite"), None);
    }

    #[test]
    fn should_default_to_admin_only() {
        assert_eq!(RegistrationMode::default(), RegistrationMode::AdminOnly);
    }
}
