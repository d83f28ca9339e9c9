//! Endpoint configuration for the services under test.
//!
//! Defaults reproduce a local development stack (UI on port 4200, each
//! backend service on its own localhost port). Override via environment
//! variables or explicit construction for other environments.

use url::Url;

/// Default UI base URL.
pub const DEFAULT_UI_URL: &str = "http://localhost:4200";
/// Default scheme and host shared by the backend services.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default ports of the backend services.
pub const ORDER_SERVICE_PORT: u16 = 8082;
pub const USER_SERVICE_PORT: u16 = 9093;
pub const RESTAURANT_SERVICE_PORT: u16 = 8083;
pub const PAYMENT_SERVICE_PORT: u16 = 9095;
pub const FOOD_CATALOG_SERVICE_PORT: u16 = 8084;

/// Base URLs of every service of the system under test.
#[derive(Debug, Clone)]
pub struct ServiceEndpoints {
    /// Browser front end.
    pub ui_url: Url,
    /// Order service.
    pub order_url: Url,
    /// User (userinfo) service.
    pub user_url: Url,
    /// Restaurant listing service.
    pub restaurant_url: Url,
    /// Payment service.
    pub payment_url: Url,
    /// Food catalog service.
    pub catalog_url: Url,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ServiceEndpoints {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PIITAG_UI_URL` (default: `http://localhost:4200`)
    /// - `PIITAG_API_BASE_URL` (default: `http://localhost`), combined with
    ///   the default port of each service unless overridden below
    /// - `PIITAG_ORDER_URL`, `PIITAG_USER_URL`, `PIITAG_RESTAURANT_URL`,
    ///   `PIITAG_PAYMENT_URL`, `PIITAG_CATALOG_URL`
    /// - `PIITAG_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Configuration with every default applied and no environment lookup.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_lookup(|_| None)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = |var: &str, default: &str| -> Result<Url, ConfigError> {
            let raw = lookup(var).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
        };
        let api_base = lookup("PIITAG_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let api_base = api_base.trim_end_matches('/');
        let service_url = |var: &str, port: u16| url(var, &format!("{api_base}:{port}"));

        Ok(Self {
            ui_url: url("PIITAG_UI_URL", DEFAULT_UI_URL)?,
            order_url: service_url("PIITAG_ORDER_URL", ORDER_SERVICE_PORT)?,
            user_url: service_url("PIITAG_USER_URL", USER_SERVICE_PORT)?,
            restaurant_url: service_url("PIITAG_RESTAURANT_URL", RESTAURANT_SERVICE_PORT)?,
            payment_url: service_url("PIITAG_PAYMENT_URL", PAYMENT_SERVICE_PORT)?,
            catalog_url: service_url("PIITAG_CATALOG_URL", FOOD_CATALOG_SERVICE_PORT)?,
            timeout_secs: lookup("PIITAG_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Endpoints on consecutive localhost ports starting at `base_port`
    /// (user, order, restaurant, payment, catalog, UI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if a localhost URL cannot be
    /// parsed (only possible for ports past `u16::MAX`).
    pub fn local(base_port: u16) -> Result<Self, ConfigError> {
        let make_url = |offset: u16| -> Result<Url, ConfigError> {
            let port = base_port.checked_add(offset).ok_or_else(|| {
                ConfigError::InvalidUrl("localhost".into(), "port out of range".into())
            })?;
            Url::parse(&format!("http://127.0.0.1:{port}"))
                .map_err(|e| ConfigError::InvalidUrl("localhost".into(), e.to_string()))
        };
        Ok(Self {
            user_url: make_url(0)?,
            order_url: make_url(1)?,
            restaurant_url: make_url(2)?,
            payment_url: make_url(3)?,
            catalog_url: make_url(4)?,
            ui_url: make_url(5)?,
            timeout_secs: 5,
        })
    }

    /// Base URL of a service by its classification-schema name.
    ///
    /// Recognised names: `userinfo` (alias `user`), `order`, `restaurant`,
    /// `payment`, `foodcatalog` (alias `catalog`), plus `ui` for the front end.
    pub fn url_for(&self, service: &str) -> Option<&Url> {
        match service {
            "userinfo" | "user" => Some(&self.user_url),
            "order" => Some(&self.order_url),
            "restaurant" => Some(&self.restaurant_url),
            "payment" => Some(&self.payment_url),
            "foodcatalog" | "catalog" => Some(&self.catalog_url),
            "ui" => Some(&self.ui_url),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_builds_consecutive_ports() {
        let cfg = ServiceEndpoints::local(9000).unwrap();
        assert_eq!(cfg.user_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.order_url.as_str(), "http://127.0.0.1:9001/");
        assert_eq!(cfg.ui_url.as_str(), "http://127.0.0.1:9005/");
        assert_eq!(cfg.timeout_secs, 5);
    }

    #[test]
    fn local_rejects_port_overflow() {
        assert!(ServiceEndpoints::local(u16::MAX).is_err());
    }

    #[test]
    fn defaults_match_local_stack() {
        let cfg = ServiceEndpoints::defaults().unwrap();
        assert_eq!(cfg.user_url.as_str(), "http://localhost:9093/");
        assert_eq!(cfg.order_url.as_str(), "http://localhost:8082/");
        assert_eq!(cfg.restaurant_url.as_str(), "http://localhost:8083/");
        assert_eq!(cfg.payment_url.as_str(), "http://localhost:9095/");
        assert_eq!(cfg.catalog_url.as_str(), "http://localhost:8084/");
        assert_eq!(cfg.timeout_secs, 10);
    }

    #[test]
    fn url_for_schema_service_names() {
        let cfg = ServiceEndpoints::defaults().unwrap();
        assert_eq!(cfg.url_for("userinfo"), Some(&cfg.user_url));
        assert_eq!(cfg.url_for("foodcatalog"), Some(&cfg.catalog_url));
        assert_eq!(cfg.url_for("ui").map(Url::as_str), Some("http://localhost:4200/"));
        assert_eq!(cfg.url_for("inventory"), None);
    }

    #[test]
    fn lookup_overrides_single_service() {
        let cfg = ServiceEndpoints::from_lookup(|var| match var {
            "PIITAG_USER_URL" => Some("http://users.staging.internal:80".into()),
            "PIITAG_TIMEOUT_SECS" => Some("30".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.user_url.as_str(), "http://users.staging.internal/");
        assert_eq!(cfg.order_url.as_str(), "http://localhost:8082/");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn lookup_applies_api_base_to_every_service() {
        let cfg = ServiceEndpoints::from_lookup(|var| {
            (var == "PIITAG_API_BASE_URL").then(|| "http://10.0.0.5/".to_string())
        })
        .unwrap();
        assert_eq!(cfg.payment_url.as_str(), "http://10.0.0.5:9095/");
        assert_eq!(cfg.ui_url.as_str(), "http://localhost:4200/");
    }

    #[test]
    fn lookup_rejects_invalid_url() {
        let err = ServiceEndpoints::from_lookup(|var| {
            (var == "PIITAG_ORDER_URL").then(|| "not a url".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("PIITAG_ORDER_URL"));
    }

    #[test]
    fn unparseable_timeout_falls_back_to_default() {
        let cfg = ServiceEndpoints::from_lookup(|var| {
            (var == "PIITAG_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap();
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
