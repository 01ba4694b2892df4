use crate::utils::error::{EtlError, Result};
use std::collections::HashMap;
use std::path::Path;

/// Flat mapping of named string settings.
///
/// Sources, lowest precedence first: an optional TOML file, then the process
/// environment (which already includes anything loaded from `.env`).
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut settings = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.merge(std::env::vars());
        Ok(settings)
    }

    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        let table: toml::Table =
            toml::from_str(&processed_content).map_err(|e| EtlError::ConfigError {
                message: format!("TOML parsing error: {}", e),
            })?;

        let mut values = HashMap::new();
        for (key, value) in table {
            let value = match value {
                toml::Value::String(text) => text,
                toml::Value::Integer(number) => number.to_string(),
                toml::Value::Float(number) => number.to_string(),
                toml::Value::Boolean(flag) => flag.to_string(),
                other => {
                    return Err(EtlError::InvalidConfigValueError {
                        field: key,
                        value: other.to_string(),
                        reason: "Settings must be strings, numbers or booleans".to_string(),
                    })
                }
            };
            values.insert(key, value);
        }
        Ok(Self { values })
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut settings = Self::default();
        settings.merge(pairs);
        settings
    }

    pub fn merge<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in pairs {
            self.values.insert(key.into(), value.into());
        }
    }

    /// Value of the first of `names` that is set to something non-blank.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| {
            self.values
                .get(*name)
                .map(String::as_str)
                .filter(|value| !value.trim().is_empty())
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.first_of(&[name])
    }

    pub fn reader(&self) -> SettingsReader<'_> {
        SettingsReader {
            settings: self,
            missing: Vec::new(),
        }
    }

    /// 替換環境變數 (例如 ${AWS_REGION})
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid pattern"));

        VAR.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }
}

/// Reads settings while collecting every missing required name, so a
/// misconfigured start reports all of them at once.
pub struct SettingsReader<'a> {
    settings: &'a Settings,
    missing: Vec<String>,
}

impl<'a> SettingsReader<'a> {
    /// `names[0]` is the canonical name, the rest are accepted aliases.
    pub fn required(&mut self, names: &[&str]) -> String {
        match self.settings.first_of(names) {
            Some(value) => value.to_string(),
            None => {
                self.missing.push(names[0].to_string());
                String::new()
            }
        }
    }

    pub fn optional(&self, names: &[&str]) -> Option<String> {
        self.settings.first_of(names).map(str::to_string)
    }

    pub fn or_default(&self, names: &[&str], default: &str) -> String {
        self.optional(names).unwrap_or_else(|| default.to_string())
    }

    pub fn parsed<T: std::str::FromStr>(&self, name: &str, default: T) -> Result<T> {
        match self.settings.get(name) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| EtlError::InvalidConfigValueError {
                    field: name.to_string(),
                    value: raw.to_string(),
                    reason: "Value has the wrong type".to_string(),
                }),
            None => Ok(default),
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(EtlError::MissingConfigError {
                fields: self.missing,
            })
        }
    }
}
