use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use relevar_core::AppError;
use tracing_subscriber::EnvFilter;

/// Startup mode chosen by the first command-line argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Serve,
    MigrateOnly,
    CreateSuperuser { username: String },
}

impl RunMode {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, AppError> {
        match args.next().as_deref() {
            None => Ok(Self::Serve),
            Some("migrate") => Ok(Self::MigrateOnly),
            Some("create-superuser") => {
                let username = args
                    .next()
                    .filter(|value| !value.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::Validation("usage: create-superuser <username>".to_owned())
                    })?;
                Ok(Self::CreateSuperuser { username })
            }
            Some(other) => Err(AppError::Validation(format!(
                "unknown command '{other}', expected 'migrate' or 'create-superuser'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub run_mode: RunMode,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let run_mode = RunMode::from_args(env::args().skip(1))?;

        let database_url = required_env("DATABASE_URL")?;
        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value.parse::<u32>().map_err(|error| {
                AppError::Validation(format!("invalid DATABASE_MAX_CONNECTIONS: {error}"))
            })?,
            Err(_) => 10,
        };
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        Ok(Self {
            run_mode,
            database_url,
            database_max_connections,
            frontend_url,
            api_host,
            api_port,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    let value =
        env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use relevar_core::AppError;

    use super::RunMode;

    fn parse(args: &[&str]) -> Result<RunMode, AppError> {
        RunMode::from_args(args.iter().map(|value| (*value).to_owned()))
    }

    #[test]
    fn run_mode_follows_first_argument() {
        assert!(matches!(parse(&[]), Ok(RunMode::Serve)));
        assert!(matches!(parse(&["migrate"]), Ok(RunMode::MigrateOnly)));
        assert!(matches!(
            parse(&["create-superuser", "root"]),
            Ok(RunMode::CreateSuperuser { ref username }) if username == "root"
        ));
    }

    #[test]
    fn create_superuser_requires_a_username() {
        assert!(matches!(
            parse(&["create-superuser"]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(parse(&["seed"]), Err(AppError::Validation(_))));
    }
}
