//! Purpose: Process-wide adapter settings (allocation policy, log filter) and tracing setup.
//! Exports: `AllocPolicy`, `AdapterConfig`, `alloc_policy`, `set_alloc_policy`, `init_tracing`, `init`.
//! Role: Read once at module init (`inchi_web_init`); handlers only read the policy.
//! Invariants: Default policy is `Propagate` (encoder OOM -> NULL return, no abort).
//! Invariants: Tracing init is idempotent; a second subscriber install is ignored.
use std::sync::atomic::{AtomicU8, Ordering};

use tracing_subscriber::EnvFilter;

use crate::core::error::{Error, ErrorKind};

pub const ALLOC_POLICY_ENV: &str = "INCHI_WEB_ALLOC_POLICY";
pub const LOG_ENV: &str = "INCHI_WEB_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

static ALLOC_POLICY: AtomicU8 = AtomicU8::new(AllocPolicy::Propagate as u8);

/// What to do when the final envelope buffer cannot be allocated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AllocPolicy {
    /// Return NULL to the host.
    #[default]
    Propagate = 0,
    /// Abort the process, matching hosts built with aborting malloc.
    Abort = 1,
}

impl AllocPolicy {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(AllocPolicy::Propagate),
            1 => Some(AllocPolicy::Abort),
            _ => None,
        }
    }

    pub fn parse(input: &str) -> Result<Self, Error> {
        match input.trim().to_ascii_lowercase().as_str() {
            "propagate" => Ok(AllocPolicy::Propagate),
            "abort" => Ok(AllocPolicy::Abort),
            other => Err(Error::new(ErrorKind::Usage).with_message(format!(
                "{ALLOC_POLICY_ENV} must be `propagate` or `abort`, got `{other}`"
            ))),
        }
    }
}

pub fn alloc_policy() -> AllocPolicy {
    match ALLOC_POLICY.load(Ordering::Relaxed) {
        1 => AllocPolicy::Abort,
        _ => AllocPolicy::Propagate,
    }
}

pub fn set_alloc_policy(policy: AllocPolicy) {
    ALLOC_POLICY.store(policy as u8, Ordering::Relaxed);
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdapterConfig {
    pub alloc_policy: AllocPolicy,
    pub log_filter: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            alloc_policy: AllocPolicy::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AdapterConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = Self::default();
        if let Some(policy) = lookup(ALLOC_POLICY_ENV).filter(|value| !value.trim().is_empty()) {
            config.alloc_policy = AllocPolicy::parse(&policy)?;
        }
        if let Some(filter) = lookup(LOG_ENV).filter(|value| !value.trim().is_empty()) {
            config.log_filter = filter;
        }
        Ok(config)
    }
}

pub fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Loads config from the environment, applies the policy, and installs logging.
///
/// Logging is installed with the default filter even when the config is rejected.
pub fn init() -> Result<AdapterConfig, Error> {
    match AdapterConfig::from_env() {
        Ok(config) => {
            set_alloc_policy(config.alloc_policy);
            init_tracing(&config.log_filter);
            Ok(config)
        }
        Err(err) => {
            init_tracing(DEFAULT_LOG_FILTER);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AdapterConfig, AllocPolicy, ALLOC_POLICY_ENV, DEFAULT_LOG_FILTER, LOG_ENV};
    use crate::core::error::ErrorKind;

    #[test]
    fn defaults_apply_when_unset() {
        let config = AdapterConfig::from_lookup(|_| None).expect("config");
        assert_eq!(config, AdapterConfig::default());
        assert_eq!(config.alloc_policy, AllocPolicy::Propagate);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn env_values_override_defaults() {
        let config = AdapterConfig::from_lookup(|key| match key {
            ALLOC_POLICY_ENV => Some(" Abort ".to_string()),
            LOG_ENV => Some("inchi_web=debug".to_string()),
            _ => None,
        })
        .expect("config");
        assert_eq!(config.alloc_policy, AllocPolicy::Abort);
        assert_eq!(config.log_filter, "inchi_web=debug");
    }

    #[test]
    fn unknown_policy_is_usage_error() {
        let err = AdapterConfig::from_lookup(|key| {
            (key == ALLOC_POLICY_ENV).then(|| "sometimes".to_string())
        })
        .expect_err("should fail");
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert!(err.message().unwrap_or("").contains("sometimes"));
    }

    #[test]
    fn policy_codes_are_stable() {
        assert_eq!(AllocPolicy::from_code(0), Some(AllocPolicy::Propagate));
        assert_eq!(AllocPolicy::from_code(1), Some(AllocPolicy::Abort));
        assert_eq!(AllocPolicy::from_code(2), None);
    }
}
