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

use crate::domain::config::compiler::CompilerConfig;
use crate::infrastructure::constants::*;
use crate::shared::error::ConfigError;
use std::collections::HashMap;

/// Parse `key=value` properties given with `-D`.
pub fn parse_dynamic_configs(configs: &[String]) -> Result<HashMap<String, String>, ConfigError> {
    let mut map = HashMap::new();

    for config in configs {
        let Some((key, value)) = config.split_once('=') else {
            return Err(ConfigError::invalid(format!(
                "Invalid config format: '{}'. Expected 'key=value'",
                config
            )));
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::invalid(format!(
                "Empty key in config: '{}'",
                config
            )));
        }

        map.insert(key.to_string(), value.trim().to_string());
    }

    Ok(map)
}

/// Apply dynamic properties on top of a loaded config.
///
/// `config` is only replaced once every override parsed and the result validated.
pub fn apply_to_compiler_config(
    configs: &HashMap<String, String>,
    config: &mut CompilerConfig,
) -> Result<(), ConfigError> {
    let mut updated = config.clone();

    if let Some(label) = configs.get(PROP_CORRELATION_LABEL) {
        updated.correlation_label = label.clone();
    }

    if let Some(prefix) = configs.get(PROP_MERGED_NAME_PREFIX) {
        updated.merged_name_prefix = prefix.clone();
    }

    if let Some(prefix) = configs.get(PROP_MACHINE_NAME_ANNOTATION_PREFIX) {
        updated.machine_name_annotation_prefix = prefix.clone();
    }

    if let Some(timeout) = configs.get(PROP_RETRIEVAL_TIMEOUT_SECS) {
        let secs = timeout.parse::<u64>().map_err(|e| {
            ConfigError::invalid(format!(
                "Invalid {}: '{}' ({})",
                PROP_RETRIEVAL_TIMEOUT_SECS, timeout, e
            ))
        })?;
        updated.retrieval_timeout_secs = Some(secs);
    }

    for key in configs.keys().filter(|k| !is_known_property(k)) {
        tracing::warn!(property = %key, "Ignoring unknown compiler property");
    }

    updated.validate()?;
    *config = updated;
    Ok(())
}

fn is_known_property(key: &str) -> bool {
    [
        PROP_CORRELATION_LABEL,
        PROP_MERGED_NAME_PREFIX,
        PROP_MACHINE_NAME_ANNOTATION_PREFIX,
        PROP_RETRIEVAL_TIMEOUT_SECS,
    ]
    .contains(&key)
}
