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
use crate::infrastructure::kubernetes::resources::route::Route;
use crate::shared::error::ValidationError;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{
    ConfigMap, Container, PersistentVolumeClaim, Pod, PodSpec, Secret, Service,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Pod,
    Deployment,
    Service,
    Route,
    PersistentVolumeClaim,
    Secret,
    ConfigMap,
    /// Recognized so it can be rejected with a precise error.
    DeploymentConfig,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Pod => KIND_POD,
            ObjectKind::Deployment => KIND_DEPLOYMENT,
            ObjectKind::Service => KIND_SERVICE,
            ObjectKind::Route => KIND_ROUTE,
            ObjectKind::PersistentVolumeClaim => KIND_PVC,
            ObjectKind::Secret => KIND_SECRET,
            ObjectKind::ConfigMap => KIND_CONFIG_MAP,
            ObjectKind::DeploymentConfig => KIND_DEPLOYMENT_CONFIG,
        }
    }

    pub fn default_api_version(&self) -> &'static str {
        match self {
            ObjectKind::Deployment => API_VERSION_APPS,
            ObjectKind::Route => API_VERSION_ROUTE,
            ObjectKind::DeploymentConfig => API_VERSION_OPENSHIFT_APPS,
            _ => API_VERSION_CORE,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ObjectKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            KIND_POD => Ok(ObjectKind::Pod),
            KIND_DEPLOYMENT => Ok(ObjectKind::Deployment),
            KIND_SERVICE => Ok(ObjectKind::Service),
            KIND_ROUTE => Ok(ObjectKind::Route),
            KIND_PVC => Ok(ObjectKind::PersistentVolumeClaim),
            KIND_SECRET => Ok(ObjectKind::Secret),
            KIND_CONFIG_MAP => Ok(ObjectKind::ConfigMap),
            KIND_DEPLOYMENT_CONFIG => Ok(ObjectKind::DeploymentConfig),
            _ => Err(ValidationError::UnknownKind(s.to_string())),
        }
    }
}

/// A Pod- or Deployment-shaped object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Workload {
    Pod(Pod),
    Deployment(Deployment),
}

impl Workload {
    pub fn name(&self) -> &str {
        self.metadata().name.as_deref().unwrap_or_default()
    }

    pub fn kind(&self) -> ObjectKind {
        match self {
            Workload::Pod(_) => ObjectKind::Pod,
            Workload::Deployment(_) => ObjectKind::Deployment,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            Workload::Pod(pod) => &pod.metadata,
            Workload::Deployment(deployment) => &deployment.metadata,
        }
    }

    /// Metadata of the pods this workload runs.
    pub fn pod_metadata(&self) -> Option<&ObjectMeta> {
        match self {
            Workload::Pod(pod) => Some(&pod.metadata),
            Workload::Deployment(deployment) => deployment
                .spec
                .as_ref()
                .and_then(|s| s.template.metadata.as_ref()),
        }
    }

    pub fn pod_spec(&self) -> Option<&PodSpec> {
        match self {
            Workload::Pod(pod) => pod.spec.as_ref(),
            Workload::Deployment(deployment) => deployment
                .spec
                .as_ref()
                .and_then(|s| s.template.spec.as_ref()),
        }
    }

    pub fn pod_labels(&self) -> Option<&BTreeMap<String, String>> {
        self.pod_metadata().and_then(|m| m.labels.as_ref())
    }

    pub fn containers(&self) -> &[Container] {
        self.pod_spec()
            .map(|s| s.containers.as_slice())
            .unwrap_or_default()
    }

    pub fn replicas(&self) -> Option<i32> {
        match self {
            Workload::Pod(_) => None,
            Workload::Deployment(deployment) => deployment.spec.as_ref().and_then(|s| s.replicas),
        }
    }

    /// Machine name of a container in this workload.
    ///
    /// Merged workloads carry the original `<workload>/<container>` name in a
    /// per-container annotation; everything else uses its own name.
    pub fn machine_name(&self, container: &str, annotation_prefix: &str) -> String {
        let key = machine_name_annotation(annotation_prefix, container);
        self.pod_metadata()
            .and_then(|m| m.annotations.as_ref())
            .and_then(|a| a.get(&key))
            .cloned()
            .unwrap_or_else(|| format!("{}/{}", self.name(), container))
    }

    pub fn machine_names(&self, annotation_prefix: &str) -> Vec<String> {
        self.containers()
            .iter()
            .map(|c| self.machine_name(&c.name, annotation_prefix))
            .collect()
    }
}

pub fn machine_name_annotation(prefix: &str, container: &str) -> String {
    format!("{}{}{}", prefix, container, MACHINE_NAME_ANNOTATION_SUFFIX)
}

/// Closed set of objects a recipe may contain.
#[derive(Debug, Clone, PartialEq)]
pub enum InfrastructureObject {
    Workload(Workload),
    Service(Service),
    Route(Route),
    PersistentVolumeClaim(PersistentVolumeClaim),
    Secret(Secret),
    ConfigMap(ConfigMap),
}

impl InfrastructureObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            InfrastructureObject::Workload(w) => w.kind(),
            InfrastructureObject::Service(_) => ObjectKind::Service,
            InfrastructureObject::Route(_) => ObjectKind::Route,
            InfrastructureObject::PersistentVolumeClaim(_) => ObjectKind::PersistentVolumeClaim,
            InfrastructureObject::Secret(_) => ObjectKind::Secret,
            InfrastructureObject::ConfigMap(_) => ObjectKind::ConfigMap,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            InfrastructureObject::Workload(w) => w.metadata(),
            InfrastructureObject::Service(s) => &s.metadata,
            InfrastructureObject::Route(r) => &r.metadata,
            InfrastructureObject::PersistentVolumeClaim(p) => &p.metadata,
            InfrastructureObject::Secret(s) => &s.metadata,
            InfrastructureObject::ConfigMap(c) => &c.metadata,
        }
    }

    pub fn name(&self) -> &str {
        self.metadata().name.as_deref().unwrap_or_default()
    }
}

/// Pods and Deployments, each kept in its own name-scoped map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkloadSet {
    pods: BTreeMap<String, Workload>,
    deployments: BTreeMap<String, Workload>,
}

impl WorkloadSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, workload: Workload) -> Result<(), ValidationError> {
        let kind = workload.kind();
        let name = workload.name().to_string();
        let map = match kind {
            ObjectKind::Pod => &mut self.pods,
            _ => &mut self.deployments,
        };
        insert_unique(map, kind, name, workload)
    }

    /// Pods first, then Deployments, each ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = &Workload> {
        self.pods.values().chain(self.deployments.values())
    }

    pub fn len(&self) -> usize {
        self.pods.len() + self.deployments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, kind: ObjectKind, name: &str) -> Option<&Workload> {
        match kind {
            ObjectKind::Pod => self.pods.get(name),
            ObjectKind::Deployment => self.deployments.get(name),
            _ => None,
        }
    }

    /// Flattens into a single name-keyed map.
    ///
    /// Callers rely on the merge step having left at most one workload, or on
    /// pods and deployments not sharing names.
    pub fn into_map(self) -> BTreeMap<String, Workload> {
        let mut map = self.pods;
        for (name, deployment) in self.deployments {
            map.entry(name).or_insert(deployment);
        }
        map
    }
}

pub(crate) fn insert_unique<T>(
    map: &mut BTreeMap<String, T>,
    kind: ObjectKind,
    name: String,
    value: T,
) -> Result<(), ValidationError> {
    if map.contains_key(&name) {
        return Err(ValidationError::duplicate_name(kind.as_str(), name));
    }
    map.insert(name, value);
    Ok(())
}
