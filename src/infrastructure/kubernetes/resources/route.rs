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

//! OpenShift Route, which k8s-openapi does not ship

use crate::infrastructure::constants::KIND_SERVICE;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RouteSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default)]
    pub to: RouteTargetReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternate_backends: Vec<RouteTargetReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<RoutePort>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard_policy: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTargetReference {
    #[serde(default = "default_target_kind")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<i32>,
}

impl Default for RouteTargetReference {
    fn default() -> Self {
        Self {
            kind: default_target_kind(),
            name: String::new(),
            weight: None,
        }
    }
}

impl RouteTargetReference {
    pub fn is_service(&self) -> bool {
        self.kind == KIND_SERVICE
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    pub target_port: IntOrString,
}

fn default_target_kind() -> String {
    KIND_SERVICE.to_string()
}

impl Route {
    pub fn name(&self) -> &str {
        self.metadata.name.as_deref().unwrap_or_default()
    }

    /// Primary target followed by alternate backends.
    pub fn targets(&self) -> impl Iterator<Item = &RouteTargetReference> {
        std::iter::once(&self.spec.to).chain(self.spec.alternate_backends.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_kind_defaults_to_service() {
        let route: Route = serde_yaml::from_str(
            "apiVersion: route.openshift.io/v1\nkind: Route\nmetadata:\n  name: r\nspec:\n  to:\n    name: web\n",
        )
        .unwrap();
        assert_eq!(route.name(), "r");
        assert!(route.spec.to.is_service());
        assert_eq!(route.spec.to.name, "web");
    }

    #[test]
    fn test_targets_include_alternate_backends() {
        let route: Route = serde_yaml::from_str(
            "metadata:\n  name: r\nspec:\n  to:\n    kind: Service\n    name: a\n  alternateBackends:\n  - kind: Service\n    name: b\n    weight: 10\n  port:\n    targetPort: 8080\n",
        )
        .unwrap();
        let names: Vec<_> = route.targets().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(
            route.spec.port.unwrap().target_port,
            IntOrString::Int(8080)
        );
    }
}
