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

use crate::shared::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Machine configs keyed by `<workloadName>/<containerName>`.
pub type MachineConfigs = BTreeMap<String, MachineConfig>;

/// Per-container machine settings supplied by the caller. Read, never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub servers: BTreeMap<String, ServerConfig>,
    pub attributes: BTreeMap<String, String>,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `<port>[/<protocol>]`, e.g. `8080/tcp`.
    pub port: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl MachineConfig {
    pub fn with_server(mut self, name: impl Into<String>, server: ServerConfig) -> Self {
        self.servers.insert(name.into(), server);
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl ServerConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Default::default()
        }
    }
}

/// Reads machine configs from a TOML file whose top-level tables are machine names.
pub fn load_machine_configs(path: impl AsRef<Path>) -> Result<MachineConfigs, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::read(path.display().to_string(), e))?;
    toml::from_str(&content).map_err(|e| ConfigError::parse(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_machine_configs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("machines.toml");
        std::fs::write(
            &path,
            "[\"app/web\"]\nattributes = { memoryLimitBytes = \"536870912\" }\n\n[\"app/web\".servers.http]\nport = \"8080/tcp\"\nprotocol = \"http\"\n",
        )
        .unwrap();

        let machines = load_machine_configs(&path).unwrap();
        let web = &machines["app/web"];
        assert_eq!(web.attributes["memoryLimitBytes"], "536870912");
        assert_eq!(web.servers["http"].port, "8080/tcp");
        assert_eq!(web.servers["http"].protocol.as_deref(), Some("http"));
    }

    #[test]
    fn test_builder_helpers() {
        let machine = MachineConfig::default()
            .with_server("http", ServerConfig::new("8080/tcp"))
            .with_attribute("memoryLimitBytes", "1024");
        assert_eq!(machine.servers.len(), 1);
        assert_eq!(machine.attributes["memoryLimitBytes"], "1024");
    }
}
