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

use serde_yaml::{Mapping, Value};

/// A decoded but not yet classified recipe object.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObject {
    value: Value,
}

impl RawObject {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Value of the `kind` field. Empty strings count as absent.
    pub fn kind(&self) -> Option<&str> {
        non_empty_str(self.value.get("kind"))
    }

    /// Value of `metadata.name`. Empty strings count as absent.
    pub fn name(&self) -> Option<&str> {
        non_empty_str(self.value.get("metadata").and_then(|m| m.get("name")))
    }

    pub fn api_version(&self) -> Option<&str> {
        non_empty_str(self.value.get("apiVersion"))
    }

    /// Sets `apiVersion` when the object does not declare one.
    pub fn default_api_version(&mut self, api_version: &str) {
        if self.api_version().is_some() {
            return;
        }
        if let Value::Mapping(ref mut map) = self.value {
            map.insert(
                Value::String("apiVersion".to_string()),
                Value::String(api_version.to_string()),
            );
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}

impl From<Mapping> for RawObject {
    fn from(map: Mapping) -> Self {
        Self::new(Value::Mapping(map))
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(yaml: &str) -> RawObject {
        RawObject::new(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_reads_kind_and_name() {
        let obj = raw("kind: Pod\nmetadata:\n  name: app\n");
        assert_eq!(obj.kind(), Some("Pod"));
        assert_eq!(obj.name(), Some("app"));
        assert_eq!(obj.api_version(), None);
    }

    #[test]
    fn test_empty_values_are_absent() {
        let obj = raw("kind: ''\nmetadata:\n  name: ''\n");
        assert_eq!(obj.kind(), None);
        assert_eq!(obj.name(), None);
    }

    #[test]
    fn test_default_api_version_keeps_existing() {
        let mut obj = raw("apiVersion: apps/v1\nkind: Deployment\n");
        obj.default_api_version("v1");
        assert_eq!(obj.api_version(), Some("apps/v1"));

        let mut obj = raw("kind: Pod\n");
        obj.default_api_version("v1");
        assert_eq!(obj.api_version(), Some("v1"));
    }
}
