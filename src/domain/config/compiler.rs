// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::infrastructure::constants::*;
use crate::infrastructure::kubernetes::resources::MergerConfig;
use crate::shared::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Longest DNS label a generated name may have.
const MAX_DNS_LABEL_LEN: usize = 63;
const MAX_LABEL_NAME_LEN: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Label key written onto merged pod templates and mirrored into service selectors.
    pub correlation_label: String,
    pub merged_name_prefix: String,
    pub machine_name_annotation_prefix: String,
    /// Upper bound for a single recipe retrieval. Unbounded when unset.
    pub retrieval_timeout_secs: Option<u64>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            correlation_label: DEFAULT_CORRELATION_LABEL.to_string(),
            merged_name_prefix: DEFAULT_MERGED_NAME_PREFIX.to_string(),
            machine_name_annotation_prefix: DEFAULT_MACHINE_NAME_ANNOTATION_PREFIX.to_string(),
            retrieval_timeout_secs: None,
        }
    }
}

impl CompilerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::read(path.display().to_string(), e))?;
        Self::parse(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, "compiler config")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig =
            toml::from_str(content).map_err(|e| ConfigError::parse(origin, e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_label_key(&self.correlation_label) {
            return Err(ConfigError::invalid(format!(
                "Invalid correlation_label: '{}'",
                self.correlation_label
            )));
        }

        // prefix + '-' + hex suffix must still be a DNS label
        let max_prefix_len = MAX_DNS_LABEL_LEN - 1 - MERGED_NAME_HASH_BYTES * 2;
        if !is_valid_k8s_name(&self.merged_name_prefix)
            || self.merged_name_prefix.len() > max_prefix_len
        {
            return Err(ConfigError::invalid(format!(
                "Invalid merged_name_prefix (lowercase DNS label, max {} chars): '{}'",
                max_prefix_len, self.merged_name_prefix
            )));
        }

        if self.machine_name_annotation_prefix.is_empty() {
            return Err(ConfigError::invalid(
                "machine_name_annotation_prefix must not be empty",
            ));
        }

        if self.retrieval_timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                "retrieval_timeout_secs must be > 0",
            ));
        }

        Ok(())
    }

    pub fn merger_config(&self) -> MergerConfig {
        MergerConfig {
            correlation_label: self.correlation_label.clone(),
            merged_name_prefix: self.merged_name_prefix.clone(),
            machine_name_annotation_prefix: self.machine_name_annotation_prefix.clone(),
        }
    }

    pub fn retrieval_timeout(&self) -> Option<Duration> {
        self.retrieval_timeout_secs.map(Duration::from_secs)
    }
}

pub(crate) fn is_valid_k8s_name(name: &str) -> bool {
    if name.is_empty() || name.len() > 253 {
        return false;
    }

    if !name.chars().next().unwrap_or(' ').is_ascii_alphanumeric() {
        return false;
    }
    if !name.chars().last().unwrap_or(' ').is_ascii_alphanumeric() {
        return false;
    }

    name.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// `[prefix/]name`, where the prefix is a DNS subdomain.
pub(crate) fn is_valid_label_key(key: &str) -> bool {
    let (prefix, name) = match key.rsplit_once('/') {
        Some((prefix, name)) => (Some(prefix), name),
        None => (None, key),
    };

    if let Some(prefix) = prefix {
        if !prefix.split('.').all(is_valid_k8s_name) {
            return false;
        }
    }

    if name.is_empty() || name.len() > MAX_LABEL_NAME_LEN {
        return false;
    }
    let edges_ok = name.starts_with(|c: char| c.is_ascii_alphanumeric())
        && name.ends_with(|c: char| c.is_ascii_alphanumeric());

    edges_ok
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = CompilerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.correlation_label, "deployment-correlation");
        assert_eq!(config.retrieval_timeout(), None);
    }

    #[test]
    fn test_from_toml_overrides_selected_fields() {
        let config = CompilerConfig::from_toml_str(
            "correlation_label = \"example.com/merged\"\nretrieval_timeout_secs = 5\n",
        )
        .unwrap();
        assert_eq!(config.correlation_label, "example.com/merged");
        assert_eq!(config.merged_name_prefix, "workspace");
        assert_eq!(config.retrieval_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(CompilerConfig::from_toml_str("correlation_label = \"\"\n").is_err());
        assert!(CompilerConfig::from_toml_str("merged_name_prefix = \"Bad_Prefix\"\n").is_err());
        assert!(CompilerConfig::from_toml_str(&format!(
            "merged_name_prefix = \"{}\"\n",
            "a".repeat(50)
        ))
        .is_err());
        assert!(CompilerConfig::from_toml_str("retrieval_timeout_secs = 0\n").is_err());
        assert!(CompilerConfig::from_toml_str("correlation_label = [1]\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compiler.toml");
        std::fs::write(&path, "merged_name_prefix = \"ws\"\n").unwrap();
        assert_eq!(
            CompilerConfig::from_file(&path).unwrap().merged_name_prefix,
            "ws"
        );
        assert!(CompilerConfig::from_file(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_label_key_validation() {
        assert!(is_valid_label_key("deployment-correlation"));
        assert!(is_valid_label_key("app.kubernetes.io/instance"));
        assert!(!is_valid_label_key("-leading"));
        assert!(!is_valid_label_key("Bad_Prefix.io/name"));
        assert!(!is_valid_label_key(&"x".repeat(64)));
    }
}
