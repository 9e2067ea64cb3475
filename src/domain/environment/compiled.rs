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

use crate::domain::config::machine::{MachineConfig, MachineConfigs};
use crate::domain::environment::classifier::ClassifiedSet;
use crate::domain::environment::objects::Workload;
use crate::domain::environment::recipe::Recipe;
use crate::domain::environment::warning::Warning;
use crate::infrastructure::kubernetes::resources::route::Route;
use k8s_openapi::api::core::v1::{ConfigMap, PersistentVolumeClaim, Secret, Service};
use serde::Serialize;
use std::collections::BTreeMap;

/// Validated, kind-partitioned object graph handed to the runtime layer.
///
/// Built once per workspace start and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledEnvironment {
    recipe: Recipe,
    workloads: BTreeMap<String, Workload>,
    services: BTreeMap<String, Service>,
    routes: BTreeMap<String, Route>,
    pvcs: BTreeMap<String, PersistentVolumeClaim>,
    secrets: BTreeMap<String, Secret>,
    config_maps: BTreeMap<String, ConfigMap>,
    machines: MachineConfigs,
    warnings: Vec<Warning>,
    #[serde(skip)]
    machine_name_annotation_prefix: String,
}

impl CompiledEnvironment {
    pub(crate) fn new(
        recipe: Recipe,
        objects: ClassifiedSet,
        machines: MachineConfigs,
        warnings: Vec<Warning>,
        machine_name_annotation_prefix: String,
    ) -> Self {
        Self {
            recipe,
            workloads: objects.workloads.into_map(),
            services: objects.services,
            routes: objects.routes,
            pvcs: objects.pvcs,
            secrets: objects.secrets,
            config_maps: objects.config_maps,
            machines,
            warnings,
            machine_name_annotation_prefix,
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn workloads(&self) -> &BTreeMap<String, Workload> {
        &self.workloads
    }

    pub fn services(&self) -> &BTreeMap<String, Service> {
        &self.services
    }

    pub fn routes(&self) -> &BTreeMap<String, Route> {
        &self.routes
    }

    pub fn pvcs(&self) -> &BTreeMap<String, PersistentVolumeClaim> {
        &self.pvcs
    }

    pub fn secrets(&self) -> &BTreeMap<String, Secret> {
        &self.secrets
    }

    pub fn config_maps(&self) -> &BTreeMap<String, ConfigMap> {
        &self.config_maps
    }

    pub fn machines(&self) -> &MachineConfigs {
        &self.machines
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Machine name of `container` in `workload`, stable across merges.
    pub fn machine_name(&self, workload: &str, container: &str) -> Option<String> {
        let workload = self.workloads.get(workload)?;
        workload
            .containers()
            .iter()
            .any(|c| c.name == container)
            .then(|| workload.machine_name(container, &self.machine_name_annotation_prefix))
    }

    /// Machine config for a container, resolved through its machine name.
    pub fn machine_config(&self, workload: &str, container: &str) -> Option<&MachineConfig> {
        let name = self.machine_name(workload, container)?;
        self.machines.get(&name)
    }
}
