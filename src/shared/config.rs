use std::{env, time::Duration};

use thiserror::Error;

const DEFAULT_HOST: &str = "127.0.0.1:3000";
const DEFAULT_USERS_TABLE: &str = "users";
const DEFAULT_BCRYPT_COST: u32 = 10;
const DEFAULT_REDIRECT_DELAY_MS: u64 = 2000;
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Missing required variable {0}")]
  Missing(&'static str),
  #[error("Invalid value for {name}: {value}")]
  Invalid { name: &'static str, value: String },
}

/// Process-wide settings, read once at startup and never mutated.
#[derive(Clone, Debug)]
pub struct Config {
  pub host: String,
  pub store_url: String,
  pub store_key: String,
  pub users_table: String,
  pub bcrypt_cost: u32,
  pub hash_workers: usize,
  pub redirect_delay: Duration,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|name| env::var(name).ok())
  }

  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
    let store_url = lookup("SUPABASE_URL")
      .filter(|value| !value.is_empty())
      .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
    let store_key = lookup("SUPABASE_KEY")
      .filter(|value| !value.is_empty())
      .ok_or(ConfigError::Missing("SUPABASE_KEY"))?;
    let users_table = lookup("USERS_TABLE")
      .unwrap_or_else(|| DEFAULT_USERS_TABLE.to_string());

    let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", DEFAULT_BCRYPT_COST)?;
    if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
      return Err(ConfigError::Invalid {
        name: "BCRYPT_COST",
        value: bcrypt_cost.to_string(),
      });
    }

    let hash_workers =
      parse_or(&lookup, "HASH_WORKERS", rayon::current_num_threads())?;
    if hash_workers == 0 {
      return Err(ConfigError::Invalid {
        name: "HASH_WORKERS",
        value: String::from("0"),
      });
    }

    let redirect_delay_ms =
      parse_or(&lookup, "REDIRECT_DELAY_MS", DEFAULT_REDIRECT_DELAY_MS)?;

    Ok(Self {
      host,
      store_url: store_url.trim_end_matches('/').to_string(),
      store_key,
      users_table,
      bcrypt_cost,
      hash_workers,
      redirect_delay: Duration::from_millis(redirect_delay_ms),
    })
  }
}

fn parse_or<F, T>(
  lookup: &F,
  name: &'static str,
  default: T,
) -> Result<T, ConfigError>
where
  F: Fn(&str) -> Option<String>,
  T: std::str::FromStr,
{
  match lookup(name) {
    Some(value) => value
      .trim()
      .parse()
      .map_err(|_| ConfigError::Invalid { name, value }),
    None => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  fn lookup_from(
    pairs: &[(&str, &str)],
  ) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
      .iter()
      .map(|(key, value)| (key.to_string(), value.to_string()))
      .collect();
    move |name| vars.get(name).cloned()
  }

  #[test]
  fn test_defaults_applied() {
    let config = Config::from_lookup(lookup_from(&[
      ("SUPABASE_URL", "https://project.supabase.co/"),
      ("SUPABASE_KEY", "anon-key"),
    ]))
    .unwrap();

    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.store_url, "https://project.supabase.co");
    assert_eq!(config.store_key, "anon-key");
    assert_eq!(config.users_table, "users");
    assert_eq!(config.bcrypt_cost, 10);
    assert!(config.hash_workers > 0);
    assert_eq!(config.redirect_delay, Duration::from_millis(2000));
  }

  #[test]
  fn test_overrides_applied() {
    let config = Config::from_lookup(lookup_from(&[
      ("HOST", "0.0.0.0:8080"),
      ("SUPABASE_URL", "http://localhost:54321"),
      ("SUPABASE_KEY", "service-key"),
      ("USERS_TABLE", "accounts"),
      ("BCRYPT_COST", "12"),
      ("HASH_WORKERS", "2"),
      ("REDIRECT_DELAY_MS", "0"),
    ]))
    .unwrap();

    assert_eq!(config.host, "0.0.0.0:8080");
    assert_eq!(config.users_table, "accounts");
    assert_eq!(config.bcrypt_cost, 12);
    assert_eq!(config.hash_workers, 2);
    assert_eq!(config.redirect_delay, Duration::ZERO);
  }

  #[test]
  fn test_missing_store_settings() {
    let error = Config::from_lookup(lookup_from(&[("SUPABASE_KEY", "key")]))
      .unwrap_err();
    assert_eq!(error, ConfigError::Missing("SUPABASE_URL"));

    let error = Config::from_lookup(lookup_from(&[
      ("SUPABASE_URL", "http://localhost"),
      ("SUPABASE_KEY", ""),
    ]))
    .unwrap_err();
    assert_eq!(error, ConfigError::Missing("SUPABASE_KEY"));
  }

  #[test]
  fn test_invalid_numbers_rejected() {
    let base = [("SUPABASE_URL", "http://localhost"), ("SUPABASE_KEY", "key")];

    let mut vars = base.to_vec();
    vars.push(("BCRYPT_COST", "ten"));
    assert!(matches!(
      Config::from_lookup(lookup_from(&vars)),
      Err(ConfigError::Invalid { name: "BCRYPT_COST", .. })
    ));

    let mut vars = base.to_vec();
    vars.push(("BCRYPT_COST", "3"));
    assert!(matches!(
      Config::from_lookup(lookup_from(&vars)),
      Err(ConfigError::Invalid { name: "BCRYPT_COST", .. })
    ));

    let mut vars = base.to_vec();
    vars.push(("HASH_WORKERS", "0"));
    assert!(matches!(
      Config::from_lookup(lookup_from(&vars)),
      Err(ConfigError::Invalid { name: "HASH_WORKERS", .. })
    ));
  }
}
