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

use crate::domain::environment::objects::{
    insert_unique, InfrastructureObject, ObjectKind, Workload, WorkloadSet,
};
use crate::infrastructure::kubernetes::resources::route::Route;
use crate::infrastructure::recipe::RawObject;
use crate::shared::error::ValidationError;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Secret, Service};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// Recipe objects partitioned by kind. Names are unique within each kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedSet {
    pub workloads: WorkloadSet,
    pub services: BTreeMap<String, Service>,
    pub routes: BTreeMap<String, Route>,
    pub pvcs: BTreeMap<String, PersistentVolumeClaim>,
    pub secrets: BTreeMap<String, Secret>,
    pub config_maps: BTreeMap<String, ConfigMap>,
}

impl ClassifiedSet {
    pub fn insert(&mut self, object: InfrastructureObject) -> Result<(), ValidationError> {
        let kind = object.kind();
        let name = object.name().to_string();

        match object {
            InfrastructureObject::Workload(w) => self.workloads.insert(w),
            InfrastructureObject::Service(s) => insert_unique(&mut self.services, kind, name, s),
            InfrastructureObject::Route(r) => insert_unique(&mut self.routes, kind, name, r),
            InfrastructureObject::PersistentVolumeClaim(p) => {
                insert_unique(&mut self.pvcs, kind, name, p)
            }
            InfrastructureObject::Secret(s) => insert_unique(&mut self.secrets, kind, name, s),
            InfrastructureObject::ConfigMap(c) => {
                insert_unique(&mut self.config_maps, kind, name, c)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.workloads.len()
            + self.services.len()
            + self.routes.len()
            + self.pvcs.len()
            + self.secrets.len()
            + self.config_maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns raw recipe objects into a [`ClassifiedSet`]. All or nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectClassifier;

impl ObjectClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, raw_objects: Vec<RawObject>) -> Result<ClassifiedSet, ValidationError> {
        let mut classified = ClassifiedSet::default();
        for (index, raw) in raw_objects.into_iter().enumerate() {
            let object = self.classify_object(index, raw)?;
            classified.insert(object)?;
        }
        Ok(classified)
    }

    fn classify_object(
        &self,
        index: usize,
        mut raw: RawObject,
    ) -> Result<InfrastructureObject, ValidationError> {
        let kind: ObjectKind = raw
            .kind()
            .ok_or(ValidationError::MissingKind { index })?
            .parse()?;

        if kind == ObjectKind::DeploymentConfig {
            return Err(ValidationError::UnsupportedKind(kind.to_string()));
        }

        let name = raw
            .name()
            .ok_or_else(|| ValidationError::MissingName {
                kind: kind.to_string(),
                index,
            })?
            .to_string();

        raw.default_api_version(kind.default_api_version());
        if let Some(api_version) = raw
            .api_version()
            .filter(|v| *v != kind.default_api_version())
        {
            return Err(ValidationError::malformed(
                kind.as_str(),
                &name,
                format!(
                    "apiVersion '{}' does not serve {}, expected '{}'",
                    api_version,
                    kind,
                    kind.default_api_version()
                ),
            ));
        }

        let object = match kind {
            ObjectKind::Pod => {
                InfrastructureObject::Workload(Workload::Pod(decode(kind, &name, raw)?))
            }
            ObjectKind::Deployment => {
                InfrastructureObject::Workload(Workload::Deployment(decode(kind, &name, raw)?))
            }
            ObjectKind::Service => InfrastructureObject::Service(decode(kind, &name, raw)?),
            ObjectKind::Route => InfrastructureObject::Route(decode(kind, &name, raw)?),
            ObjectKind::PersistentVolumeClaim => {
                InfrastructureObject::PersistentVolumeClaim(decode(kind, &name, raw)?)
            }
            ObjectKind::Secret => InfrastructureObject::Secret(decode(kind, &name, raw)?),
            ObjectKind::ConfigMap => InfrastructureObject::ConfigMap(decode(kind, &name, raw)?),
            ObjectKind::DeploymentConfig => {
                return Err(ValidationError::UnsupportedKind(kind.to_string()))
            }
        };

        Ok(object)
    }
}

fn decode<T: DeserializeOwned>(
    kind: ObjectKind,
    name: &str,
    raw: RawObject,
) -> Result<T, ValidationError> {
    serde_yaml::from_value(raw.into_value())
        .map_err(|e| ValidationError::malformed(kind.as_str(), name, e.to_string()))
}
