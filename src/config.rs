use std::env;

/// AppConfig
///
/// Holds the application's entire configuration state. Immutable once loaded,
/// ensuring consistency across all threads and services, and pulled into the
/// application state via FromRef.
#[derive(Clone)]
pub struct AppConfig {
    // Runtime environment marker. Controls log formatting and fail-fast rules.
    pub env: Env,
    // TCP port the HTTP server binds.
    pub port: u16,
    // Secret key used to sign and verify bearer tokens.
    pub jwt_secret: String,
    // The single configured identity that login credentials are checked against.
    pub login_email: String,
    pub login_password: String,
    // Which persistence backend serves the post collection.
    pub backend: StorageBackend,
    // Path of the JSON data file (file backend).
    pub data_file: String,
    // Path of the embedded database directory (sled backend).
    pub db_path: String,
}

/// Env
///
/// Defines the runtime context, used to switch between development conveniences
/// (pretty logs, secret fallbacks) and hardened production behavior
/// (JSON logs, mandatory secrets).
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// StorageBackend
///
/// The two interchangeable persistence backends. Both expose identical
/// external behavior through the repository trait; this only selects which
/// one the process constructs at startup.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum StorageBackend {
    File,
    Sled,
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for
    /// test setup, without needing environment variables.
    fn default() -> Self {
        Self {
            env: Env::Local,
            port: 3000,
            jwt_secret: "local-dev-secret-not-for-production".to_string(),
            login_email: "test@example.com".to_string(),
            login_password: "password".to_string(),
            backend: StorageBackend::File,
            data_file: "posts.json".to_string(),
            db_path: "./data/posts.sled".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// The canonical function for initializing the application configuration at
    /// startup. Reads all parameters from environment variables and fails fast.
    ///
    /// # Panics
    /// Panics if a secret required for the current runtime environment is not
    /// set (production demands `JWT_SECRET` and `LOGIN_PASSWORD` explicitly),
    /// or if `STORAGE_BACKEND` / `PORT` hold unrecognized values. This prevents
    /// the application from starting with an incomplete or insecure
    /// configuration.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        // Secret resolution: mandatory in production, dev fallbacks locally.
        let (jwt_secret, login_password) = match env {
            Env::Production => (
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production."),
                env::var("LOGIN_PASSWORD")
                    .expect("FATAL: LOGIN_PASSWORD must be set in production."),
            ),
            Env::Local => (
                env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "local-dev-secret-not-for-production".to_string()),
                env::var("LOGIN_PASSWORD").unwrap_or_else(|_| "password".to_string()),
            ),
        };

        let backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "file".to_string())
            .as_str()
        {
            "file" => StorageBackend::File,
            "sled" => StorageBackend::Sled,
            other => panic!("FATAL: unknown STORAGE_BACKEND '{other}' (expected 'file' or 'sled')"),
        };

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .expect("FATAL: PORT must be a valid TCP port number");

        Self {
            env,
            port,
            jwt_secret,
            login_email: env::var("LOGIN_EMAIL").unwrap_or_else(|_| "test@example.com".to_string()),
            login_password,
            backend,
            data_file: env::var("DATA_FILE").unwrap_or_else(|_| "posts.json".to_string()),
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "./data/posts.sled".to_string()),
        }
    }
}
