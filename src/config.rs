use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Base URL of the REST backend. `None` means "same origin as the page".
    pub api_url: Option<String>,
    pub environment: Environment,
    /// Envelope status code the backend uses for a missing session.
    pub not_logged_in_code: i32,
    pub comments: CommentSettings,
    pub page_size: u32,
    pub placeholder_avatar: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CommentSettings {
    /// Wait before re-fetching the tree after a confirmed submit.
    pub reload_delay: Duration,
    /// Lifetime of the inline error shown after a rolled back submit.
    pub notice_ttl: Duration,
    /// Show an inline notice when a delete fails instead of only logging it.
    pub surface_delete_errors: bool,
}

impl Default for CommentSettings {
    fn default() -> Self {
        Self {
            reload_delay: Duration::from_millis(1000),
            notice_ttl: Duration::from_millis(5000),
            surface_delete_errors: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            environment: Environment::Development,
            not_logged_in_code: 403_001,
            comments: CommentSettings::default(),
            page_size: 5,
            placeholder_avatar: "https://via.placeholder.com/32".into(),
        }
    }
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Runtime variable first, then the value baked in at build time.
fn setting(name: &str, baked: Option<&'static str>) -> Option<String> {
    std::env::var(name)
        .ok()
        .or_else(|| baked.map(ToString::to_string))
        .filter(|x| !x.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|x| x.trim().parse().ok()).unwrap_or(default)
}

impl Config {
    /// The initialised configuration, or the defaults when `init` never ran.
    pub fn global() -> &'static Config {
        CONFIG.get_or_init(Config::default)
    }

    pub fn init() -> Result<(), String> {
        CONFIG
            .set(Self::from_env())
            .map_err(|_| "Config already initialized".to_string())
    }

    pub fn from_env() -> Config {
        let default = Config::default();
        let comments = CommentSettings {
            reload_delay: Duration::from_millis(parse_or(
                setting(
                    "DEVSPACE_RELOAD_DELAY_MS",
                    option_env!("DEVSPACE_RELOAD_DELAY_MS"),
                ),
                1000,
            )),
            notice_ttl: Duration::from_millis(parse_or(
                setting("DEVSPACE_NOTICE_TTL_MS", option_env!("DEVSPACE_NOTICE_TTL_MS")),
                5000,
            )),
            surface_delete_errors: parse_or(
                setting(
                    "DEVSPACE_SURFACE_DELETE_ERRORS",
                    option_env!("DEVSPACE_SURFACE_DELETE_ERRORS"),
                ),
                false,
            ),
        };

        Config {
            api_url: setting("DEVSPACE_API_URL", option_env!("DEVSPACE_API_URL"))
                .map(|x| x.trim_end_matches('/').to_string()),
            environment: match setting("DEVSPACE_ENV", option_env!("DEVSPACE_ENV"))
                .unwrap_or_else(|| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            not_logged_in_code: parse_or(
                setting(
                    "DEVSPACE_NOT_LOGGED_IN_CODE",
                    option_env!("DEVSPACE_NOT_LOGGED_IN_CODE"),
                ),
                default.not_logged_in_code,
            ),
            comments,
            page_size: parse_or(
                setting("DEVSPACE_PAGE_SIZE", option_env!("DEVSPACE_PAGE_SIZE")),
                default.page_size,
            )
            .clamp(1, 100),
            placeholder_avatar: setting(
                "DEVSPACE_PLACEHOLDER_AVATAR",
                option_env!("DEVSPACE_PLACEHOLDER_AVATAR"),
            )
            .unwrap_or(default.placeholder_avatar),
        }
    }

    /// Base URL used to build request URLs.
    pub fn api_base(&self) -> String {
        if let Some(url) = &self.api_url {
            return url.clone();
        }
        #[cfg(feature = "hydrate")]
        {
            if let Ok(origin) = leptos::window().location().origin() {
                return origin;
            }
        }
        "http://localhost:8080".to_string()
    }
}
