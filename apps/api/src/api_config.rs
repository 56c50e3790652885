use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use pagecraft_core::AppError;
use tracing_subscriber::EnvFilter;

/// Minimum accepted admin token length.
pub const ADMIN_TOKEN_MIN_LENGTH: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpRuntimeConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailProviderConfig {
    Console,
    Smtp(SmtpRuntimeConfig),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: Option<String>,
    pub frontend_url: String,
    pub admin_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub lead_webhook_max_attempts: u8,
    pub lead_webhook_backoff_ms: u64,
    pub lead_webhook_timeout_ms: u64,
    pub seed_templates: bool,
    pub email_provider: EmailProviderConfig,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");
        Self::from_lookup(migrate_only, |name| env::var(name).ok())
    }

    pub fn from_lookup<F>(migrate_only: bool, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url = optional("DATABASE_URL");
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let admin_token = optional("ADMIN_TOKEN")
            .ok_or_else(|| AppError::Validation("ADMIN_TOKEN is required".to_owned()))?;
        if admin_token.len() < ADMIN_TOKEN_MIN_LENGTH {
            return Err(AppError::Validation(format!(
                "ADMIN_TOKEN must be at least {ADMIN_TOKEN_MIN_LENGTH} characters"
            )));
        }

        let frontend_url =
            optional("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());
        let api_host = optional("API_HOST").unwrap_or_else(|| "127.0.0.1".to_owned());
        let api_port = parse_or("API_PORT", optional("API_PORT"), 3001_u16)?;
        let lead_webhook_max_attempts = parse_or(
            "LEAD_WEBHOOK_MAX_ATTEMPTS",
            optional("LEAD_WEBHOOK_MAX_ATTEMPTS"),
            3_u8,
        )?;
        let lead_webhook_backoff_ms = parse_or(
            "LEAD_WEBHOOK_BACKOFF_MS",
            optional("LEAD_WEBHOOK_BACKOFF_MS"),
            250_u64,
        )?;
        let lead_webhook_timeout_ms = parse_or(
            "LEAD_WEBHOOK_TIMEOUT_MS",
            optional("LEAD_WEBHOOK_TIMEOUT_MS"),
            10_000_u64,
        )?;
        if lead_webhook_timeout_ms == 0 {
            return Err(AppError::Validation(
                "LEAD_WEBHOOK_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }
        let seed_templates = optional("SEED_TEMPLATES")
            .is_some_and(|value| value.eq_ignore_ascii_case("true") || value == "1");

        let email_provider = match optional("EMAIL_PROVIDER")
            .unwrap_or_else(|| "console".to_owned())
            .as_str()
        {
            "console" => EmailProviderConfig::Console,
            "smtp" => {
                let required = |name: &str| {
                    optional(name)
                        .ok_or_else(|| AppError::Validation(format!("{name} must not be empty")))
                };
                let port = required("SMTP_PORT")?
                    .parse::<u16>()
                    .map_err(|error| AppError::Validation(format!("invalid SMTP_PORT: {error}")))?;
                EmailProviderConfig::Smtp(SmtpRuntimeConfig {
                    host: required("SMTP_HOST")?,
                    port,
                    username: required("SMTP_USERNAME")?,
                    password: required("SMTP_PASSWORD")?,
                    from_address: required("SMTP_FROM_ADDRESS")?,
                })
            }
            other => {
                return Err(AppError::Validation(format!(
                    "EMAIL_PROVIDER must be either 'console' or 'smtp', got '{other}'"
                )));
            }
        };

        Ok(Self {
            migrate_only,
            database_url,
            frontend_url,
            admin_token,
            api_host,
            api_port,
            lead_webhook_max_attempts,
            lead_webhook_backoff_ms,
            lead_webhook_timeout_ms,
            seed_templates,
            email_provider,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}")))
    })
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pagecraft_core::AppError;

    use super::{ApiConfig, EmailProviderConfig};

    fn load(pairs: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(false, |name| values.get(name).cloned())
    }

    #[test]
    fn defaults_apply_without_a_database() {
        let config = load(&[("ADMIN_TOKEN", "0123456789abcdef")]);
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| unreachable!());

        assert_eq!(config.database_url, None);
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.lead_webhook_max_attempts, 3);
        assert_eq!(config.lead_webhook_backoff_ms, 250);
        assert_eq!(config.lead_webhook_timeout_ms, 10_000);
        assert!(!config.seed_templates);
        assert_eq!(config.email_provider, EmailProviderConfig::Console);
        assert!(config.socket_address().is_ok());
    }

    #[test]
    fn admin_token_is_required_and_long_enough() {
        assert!(matches!(load(&[]), Err(AppError::Validation(_))));
        assert!(matches!(
            load(&[("ADMIN_TOKEN", "short")]),
            Err(AppError::Validation(message)) if message.contains("16")
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("ADMIN_TOKEN", "0123456789abcdef"),
            ("API_PORT", "8080"),
            ("SEED_TEMPLATES", "TRUE"),
            ("LEAD_WEBHOOK_MAX_ATTEMPTS", "5"),
            ("DATABASE_URL", "postgres://localhost/pagecraft"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.api_port, 8080);
        assert!(config.seed_templates);
        assert_eq!(config.lead_webhook_max_attempts, 5);
        assert!(config.database_url.is_some());

        assert!(load(&[("ADMIN_TOKEN", "0123456789abcdef"), ("API_PORT", "http")]).is_err());
        assert!(
            load(&[
                ("ADMIN_TOKEN", "0123456789abcdef"),
                ("LEAD_WEBHOOK_TIMEOUT_MS", "0")
            ])
            .is_err()
        );
    }

    #[test]
    fn smtp_provider_needs_its_settings() {
        let missing = load(&[
            ("ADMIN_TOKEN", "0123456789abcdef"),
            ("EMAIL_PROVIDER", "smtp"),
        ]);
        assert!(matches!(missing, Err(AppError::Validation(_))));

        let unknown = load(&[
            ("ADMIN_TOKEN", "0123456789abcdef"),
            ("EMAIL_PROVIDER", "carrier-pigeon"),
        ]);
        assert!(unknown.is_err());
    }

    #[test]
    fn migrate_requires_a_database() {
        let result = ApiConfig::from_lookup(true, |name| {
            (name == "ADMIN_TOKEN").then(|| "0123456789abcdef".to_owned())
        });
        assert!(result.is_err());
    }
}
