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

use crate::domain::environment::objects::{ObjectKind, Workload};
use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;

/// Pod template of a workload, detached from whether it came from a Pod or a Deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct PodData {
    name: String,
    kind: ObjectKind,
    labels: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
    spec: PodSpec,
    replicas: Option<i32>,
}

impl PodData {
    pub fn from_workload(workload: &Workload) -> Self {
        let metadata = workload.pod_metadata();
        Self {
            name: workload.name().to_string(),
            kind: workload.kind(),
            labels: metadata.and_then(|m| m.labels.clone()).unwrap_or_default(),
            annotations: metadata
                .and_then(|m| m.annotations.clone())
                .unwrap_or_default(),
            spec: workload.pod_spec().cloned().unwrap_or_default(),
            replicas: workload.replicas(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }

    pub fn annotations(&self) -> &BTreeMap<String, String> {
        &self.annotations
    }

    pub fn spec(&self) -> &PodSpec {
        &self.spec
    }

    pub fn replicas(&self) -> Option<i32> {
        self.replicas
    }

    /// `<kind>/<name>`, unique across a classified recipe.
    pub fn key(&self) -> String {
        format!("{}/{}", self.kind, self.name)
    }
}

impl PodData {
    pub fn builder() -> PodTemplateBuilder {
        PodTemplateBuilder::new()
    }
}

/// Assembles the merged pod template.
#[derive(Debug, Default)]
pub struct PodTemplateBuilder {
    labels: BTreeMap<String, String>,
    annotations: BTreeMap<String, String>,
    spec: PodSpec,
}

impl PodTemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_annotations(mut self, annotations: BTreeMap<String, String>) -> Self {
        self.annotations = annotations;
        self
    }

    pub fn with_spec(mut self, spec: PodSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn build(self) -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: Some(ObjectMeta {
                labels: non_empty(self.labels),
                annotations: non_empty(self.annotations),
                ..Default::default()
            }),
            spec: Some(self.spec),
        }
    }
}

fn non_empty(map: BTreeMap<String, String>) -> Option<BTreeMap<String, String>> {
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
    use k8s_openapi::api::core::v1::{Container, Pod};

    fn container(name: &str) -> Container {
        Container {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_pod_uses_pod_metadata() {
        let mut labels = BTreeMap::new();
        labels.insert("app".to_string(), "web".to_string());
        let pod = Workload::Pod(Pod {
            metadata: ObjectMeta {
                name: Some("web".to_string()),
                labels: Some(labels.clone()),
                ..Default::default()
            },
            spec: Some(PodSpec {
                containers: vec![container("a")],
                ..Default::default()
            }),
            ..Default::default()
        });

        let data = PodData::from_workload(&pod);
        assert_eq!(data.key(), "Pod/web");
        assert_eq!(data.labels(), &labels);
        assert_eq!(data.spec().containers.len(), 1);
        assert_eq!(data.replicas(), None);
    }

    #[test]
    fn test_from_deployment_uses_template() {
        let deployment = Workload::Deployment(Deployment {
            metadata: ObjectMeta {
                name: Some("api".to_string()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(2),
                template: PodTemplateSpec {
                    metadata: None,
                    spec: Some(PodSpec {
                        containers: vec![container("a"), container("b")],
                        ..Default::default()
                    }),
                },
                ..Default::default()
            }),
            ..Default::default()
        });

        let data = PodData::from_workload(&deployment);
        assert_eq!(data.key(), "Deployment/api");
        assert!(data.labels().is_empty());
        assert_eq!(data.spec().containers.len(), 2);
        assert_eq!(data.replicas(), Some(2));
    }

    #[test]
    fn test_builder_omits_empty_maps() {
        let template = PodData::builder().build();
        let metadata = template.metadata.unwrap();
        assert!(metadata.labels.is_none());
        assert!(metadata.annotations.is_none());
    }
}
