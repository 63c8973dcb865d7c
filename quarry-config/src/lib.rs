//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Configuration is the only collaborator that knows where secrets live.
//! The miners take credentials as plain values; nothing in this workspace
//! reads a config file implicitly at startup or import time. `${VAR}`
//! placeholders inside values are expanded from the environment so secret
//! material can stay out of the file itself.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

static GLOBAL: OnceLock<QuarryConfig> = OnceLock::new();

#[derive(Debug, Deserialize)]
pub struct QuarryConfig {
    #[serde(default)]
    pub social: Option<SocialConfig>,
    #[serde(default)]
    pub wiki: WikiConfig,
}

/// The four opaque OAuth1 strings plus where to point the timeline fetch.
#[derive(Debug, Deserialize)]
pub struct SocialConfig {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
    #[serde(default = "default_social_endpoint")]
    pub endpoint: String,
    /// Account handle the demo fetches.
    pub screen_name: String,
}

#[derive(Debug, Deserialize)]
pub struct WikiConfig {
    #[serde(default = "default_wiki_endpoint")]
    pub endpoint: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_wiki_endpoint(),
        }
    }
}

fn default_social_endpoint() -> String {
    "https://api.twitter.com".into()
}
fn default_wiki_endpoint() -> String {
    "https://en.wikipedia.org/w/api.php".into()
}

impl QuarryConfig {
    /// Opt-in process-wide singleton. The first call installs the value;
    /// later calls hand back whatever was installed first.
    pub fn set_global(self) -> &'static QuarryConfig {
        GLOBAL.get_or_init(|| self)
    }

    /// The installed singleton, if any caller opted in via [`Self::set_global`].
    pub fn global() -> Option<&'static QuarryConfig> {
        GLOBAL.get()
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct QuarryConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for QuarryConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl QuarryConfigLoader {
    /// Start with the defaults: `QUARRY_`-prefixed env overrides, files added
    /// explicitly.
    pub fn new() -> Self {
        let builder =
            Config::builder().add_source(Environment::with_prefix("QUARRY").separator("__"));
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Merge an inline YAML snippet (tests, ad-hoc runs).
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources.
    ///
    /// `${VAR}` placeholders are expanded (recursively, depth-capped) before
    /// the typed structs are materialized, so a file can say
    /// `consumer_secret: "${SOCIAL_CONSUMER_SECRET}"`.
    pub fn load(self) -> Result<QuarryConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: QuarryConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_simple_string() {
        temp_env::with_var("FOO", Some("bar"), || {
            let mut v = json!("prefix-${FOO}-suffix");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("prefix-bar-suffix"));
        });
    }

    #[test]
    fn expands_in_array_and_object() {
        temp_env::with_vars([("CK", Some("consumer")), ("AT", Some("access"))], || {
            let mut v = json!([
                "key-$CK",
                { "token": "${AT}-${CK}" },
                42,
                true,
                null
            ]);
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!(["key-consumer", { "token": "access-consumer" }, 42, true, null])
            );
        });
    }

    #[test]
    fn expands_recursively_across_env_values() {
        temp_env::with_vars(
            [
                ("BAZ", Some("qux")),
                ("BAR", Some("mid-${BAZ}")),
                ("FOO", Some("start-${BAR}-end")),
            ],
            || {
                let mut v = json!("X=${FOO}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("X=start-mid-qux-end"));
            },
        );
    }

    #[test]
    fn stops_on_cycles_and_leaves_value_reasonable() {
        temp_env::with_vars([("A", Some("${B}")), ("B", Some("${A}"))], || {
            let mut v = json!("x=${A}-y");
            // The depth cap guarantees termination; the cycle stays visible.
            expand_env_in_value(&mut v);
            let s = v.as_str().unwrap();
            assert!(s.starts_with("x=") && s.ends_with("-y"));
            assert!(s.contains("${"));
        });
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${DOES_NOT_EXIST}"));
    }
}
