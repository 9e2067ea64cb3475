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

use crate::domain::environment::objects::{machine_name_annotation, Workload, WorkloadSet};
use crate::domain::environment::warning::Warning;
use crate::infrastructure::constants::*;
use crate::infrastructure::kubernetes::resources::pod::template::PodData;
use crate::infrastructure::kubernetes::resources::service::{replace_selector, service_selects};
use crate::shared::error::ValidationError;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{Container, LocalObjectReference, PodSpec, Service, Volume};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Label namespace used by the merge. Passed in rather than read from globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergerConfig {
    pub correlation_label: String,
    pub merged_name_prefix: String,
    pub machine_name_annotation_prefix: String,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            correlation_label: DEFAULT_CORRELATION_LABEL.to_string(),
            merged_name_prefix: DEFAULT_MERGED_NAME_PREFIX.to_string(),
            machine_name_annotation_prefix: DEFAULT_MACHINE_NAME_ANNOTATION_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub workloads: WorkloadSet,
    pub services: BTreeMap<String, Service>,
    pub warnings: Vec<Warning>,
}

/// Collapses several workloads into one Deployment.
#[derive(Debug, Clone, Default)]
pub struct WorkloadMerger {
    config: MergerConfig,
}

impl WorkloadMerger {
    pub fn new(config: MergerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergerConfig {
        &self.config
    }

    /// Merges when more than one Pod or Deployment is present, otherwise returns the inputs untouched.
    pub fn maybe_merge(
        &self,
        workloads: WorkloadSet,
        services: BTreeMap<String, Service>,
    ) -> Result<MergeOutcome, ValidationError> {
        if workloads.len() <= 1 {
            return Ok(MergeOutcome {
                workloads,
                services,
                warnings: Vec::new(),
            });
        }

        let sources: Vec<PodData> = workloads.iter().map(PodData::from_workload).collect();
        let name = self.generated_name(&sources);

        let mut warnings = Vec::new();
        let template_spec = self.merge_pod_specs(&sources, &mut warnings)?;
        let labels = self.merge_labels(&sources, &name, &mut warnings);
        let annotations = self.merge_annotations(&sources, &mut warnings);

        let services = self.repoint_services(services, &sources, &name, &labels, &mut warnings);
        let deployment = self.build_deployment(&name, labels, annotations, template_spec);

        let mut merged = WorkloadSet::new();
        merged.insert(Workload::Deployment(deployment))?;

        tracing::info!(
            deployment = %name,
            sources = sources.len(),
            "Merged workloads into a single deployment"
        );

        Ok(MergeOutcome {
            workloads: merged,
            services,
            warnings,
        })
    }

    /// `<prefix>-<hex>` where the hex part is a SHA-256 prefix of the sorted source keys.
    pub fn generated_name(&self, sources: &[PodData]) -> String {
        let mut keys: Vec<String> = sources.iter().map(PodData::key).collect();
        keys.sort();

        let mut hasher = Sha256::new();
        for key in &keys {
            hasher.update(key.as_bytes());
            hasher.update(b"\n");
        }
        let digest = hasher.finalize();
        let suffix: String = digest
            .iter()
            .take(MERGED_NAME_HASH_BYTES)
            .map(|b| format!("{:02x}", b))
            .collect();

        format!("{}-{}", self.config.merged_name_prefix, suffix)
    }

    fn merge_pod_specs(
        &self,
        sources: &[PodData],
        warnings: &mut Vec<Warning>,
    ) -> Result<PodSpec, ValidationError> {
        let mut containers: Vec<Container> = Vec::new();
        let mut init_containers: Vec<Container> = Vec::new();
        let mut volumes: Vec<Volume> = Vec::new();
        let mut pull_secrets: Vec<LocalObjectReference> = Vec::new();
        let mut service_account: Option<String> = None;
        let mut grace_period: Option<i64> = None;
        let mut shared = PodSpec::default();

        for source in sources {
            let spec = source.spec();
            self.merge_shared_fields(&mut shared, source, warnings)?;

            union_by_name(&mut containers, &spec.containers, |c| &c.name, |n| {
                ValidationError::ConflictingContainerName(n)
            })?;

            if let Some(ref inits) = spec.init_containers {
                union_by_name(&mut init_containers, inits, |c| &c.name, |n| {
                    ValidationError::ConflictingContainerName(n)
                })?;
            }

            if let Some(ref source_volumes) = spec.volumes {
                union_by_name(&mut volumes, source_volumes, |v| &v.name, |n| {
                    ValidationError::ConflictingVolume(n)
                })?;
            }

            for secret in spec.image_pull_secrets.iter().flatten() {
                if !pull_secrets.contains(secret) {
                    pull_secrets.push(secret.clone());
                }
            }

            if let Some(account) = spec
                .service_account_name
                .as_deref()
                .filter(|a| !a.is_empty())
            {
                if let Some(existing) = service_account.as_deref().filter(|e| *e != account) {
                    return Err(ValidationError::conflicting_field(
                        "serviceAccountName",
                        existing,
                        account,
                    ));
                }
                service_account.get_or_insert_with(|| account.to_string());
            }

            if let Some(seconds) = spec.termination_grace_period_seconds {
                grace_period = Some(grace_period.map_or(seconds, |g| g.max(seconds)));
            }

            if let Some(policy) = spec
                .restart_policy
                .as_deref()
                .filter(|p| *p != RESTART_POLICY_ALWAYS)
            {
                self.warn(
                    warnings,
                    WARNING_RESTART_POLICY_IGNORED,
                    format!(
                        "Restart policy '{}' of {} is ignored, the merged deployment always restarts its pods",
                        policy,
                        source.key()
                    ),
                );
            }

            if let Some(replicas) = source.replicas().filter(|r| *r > 1) {
                self.warn(
                    warnings,
                    WARNING_REPLICAS_IGNORED,
                    format!(
                        "{} requests {} replicas, the merged deployment runs a single replica",
                        source.key(),
                        replicas
                    ),
                );
            }
        }

        if let Some(init) = init_containers
            .iter()
            .find(|i| containers.iter().any(|c| c.name == i.name))
        {
            return Err(ValidationError::ConflictingContainerName(init.name.clone()));
        }

        Ok(PodSpec {
            containers,
            init_containers: non_empty_vec(init_containers),
            volumes: non_empty_vec(volumes),
            image_pull_secrets: non_empty_vec(pull_secrets),
            service_account_name: service_account,
            termination_grace_period_seconds: grace_period,
            restart_policy: Some(RESTART_POLICY_ALWAYS.to_string()),
            ..shared
        })
    }

    /// Scheduling, security and DNS fields. Single values must agree across
    /// sources, node selectors merge per key, list fields are unioned.
    fn merge_shared_fields(
        &self,
        shared: &mut PodSpec,
        source: &PodData,
        warnings: &mut Vec<Warning>,
    ) -> Result<(), ValidationError> {
        let spec = source.spec();

        agree("securityContext", &mut shared.security_context, &spec.security_context)?;
        agree("affinity", &mut shared.affinity, &spec.affinity)?;
        agree("dnsPolicy", &mut shared.dns_policy, &spec.dns_policy)?;
        agree("dnsConfig", &mut shared.dns_config, &spec.dns_config)?;
        agree("priorityClassName", &mut shared.priority_class_name, &spec.priority_class_name)?;
        agree("preemptionPolicy", &mut shared.preemption_policy, &spec.preemption_policy)?;
        agree("schedulerName", &mut shared.scheduler_name, &spec.scheduler_name)?;
        agree("runtimeClassName", &mut shared.runtime_class_name, &spec.runtime_class_name)?;
        agree("nodeName", &mut shared.node_name, &spec.node_name)?;
        agree("os", &mut shared.os, &spec.os)?;
        agree("hostNetwork", &mut shared.host_network, &spec.host_network)?;
        agree("hostPID", &mut shared.host_pid, &spec.host_pid)?;
        agree("hostIPC", &mut shared.host_ipc, &spec.host_ipc)?;
        agree("hostUsers", &mut shared.host_users, &spec.host_users)?;
        agree("hostname", &mut shared.hostname, &spec.hostname)?;
        agree("subdomain", &mut shared.subdomain, &spec.subdomain)?;
        agree("setHostnameAsFQDN", &mut shared.set_hostname_as_fqdn, &spec.set_hostname_as_fqdn)?;
        agree(
            "shareProcessNamespace",
            &mut shared.share_process_namespace,
            &spec.share_process_namespace,
        )?;
        agree(
            "automountServiceAccountToken",
            &mut shared.automount_service_account_token,
            &spec.automount_service_account_token,
        )?;
        agree("enableServiceLinks", &mut shared.enable_service_links, &spec.enable_service_links)?;
        agree(
            "activeDeadlineSeconds",
            &mut shared.active_deadline_seconds,
            &spec.active_deadline_seconds,
        )?;
        agree("serviceAccount", &mut shared.service_account, &spec.service_account)?;

        for (key, value) in spec.node_selector.iter().flatten() {
            let selector = shared.node_selector.get_or_insert_with(BTreeMap::new);
            match selector.get(key) {
                Some(existing) if existing != value => {
                    return Err(ValidationError::conflicting_field(
                        format!("nodeSelector.{}", key),
                        existing.as_str(),
                        value.as_str(),
                    ));
                }
                Some(_) => {}
                None => {
                    selector.insert(key.clone(), value.clone());
                }
            }
        }

        union_list(&mut shared.tolerations, &spec.tolerations);
        union_list(&mut shared.host_aliases, &spec.host_aliases);
        union_list(&mut shared.topology_spread_constraints, &spec.topology_spread_constraints);
        union_list(&mut shared.readiness_gates, &spec.readiness_gates);

        let dropped: Vec<&str> = [
            ("ephemeralContainers", spec.ephemeral_containers.is_some()),
            ("overhead", spec.overhead.is_some()),
            ("priority", spec.priority.is_some()),
            ("resourceClaims", spec.resource_claims.is_some()),
            ("schedulingGates", spec.scheduling_gates.is_some()),
        ]
        .into_iter()
        .filter(|(_, present)| *present)
        .map(|(field, _)| field)
        .collect();

        if !dropped.is_empty() {
            self.warn(
                warnings,
                WARNING_POD_FIELD_DROPPED,
                format!(
                    "{} sets {} which the merged deployment does not carry",
                    source.key(),
                    dropped.join(", ")
                ),
            );
        }

        Ok(())
    }

    fn merge_labels(
        &self,
        sources: &[PodData],
        name: &str,
        warnings: &mut Vec<Warning>,
    ) -> BTreeMap<String, String> {
        let mut labels = BTreeMap::new();
        for source in sources {
            let source_labels = source
                .labels()
                .iter()
                .filter(|(k, _)| **k != self.config.correlation_label);
            self.union_metadata(
                &mut labels,
                source_labels,
                source,
                "label",
                WARNING_LABEL_CONFLICT,
                warnings,
            );
        }
        labels.insert(self.config.correlation_label.clone(), name.to_string());
        labels
    }

    fn merge_annotations(
        &self,
        sources: &[PodData],
        warnings: &mut Vec<Warning>,
    ) -> BTreeMap<String, String> {
        let prefix = &self.config.machine_name_annotation_prefix;
        let mut annotations = BTreeMap::new();
        let mut machine_names = BTreeMap::new();

        for source in sources {
            let source_annotations = source.annotations().iter().filter(|(k, _)| {
                !(k.starts_with(prefix.as_str()) && k.ends_with(MACHINE_NAME_ANNOTATION_SUFFIX))
            });
            self.union_metadata(
                &mut annotations,
                source_annotations,
                source,
                "annotation",
                WARNING_ANNOTATION_CONFLICT,
                warnings,
            );

            for container in &source.spec().containers {
                let key = machine_name_annotation(prefix, &container.name);
                let machine = source
                    .annotations()
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}/{}", source.name(), container.name));
                machine_names.entry(key).or_insert(machine);
            }
        }

        annotations.extend(machine_names);
        annotations
    }

    fn union_metadata<'a>(
        &self,
        target: &mut BTreeMap<String, String>,
        entries: impl Iterator<Item = (&'a String, &'a String)>,
        source: &PodData,
        what: &str,
        code: u32,
        warnings: &mut Vec<Warning>,
    ) {
        for (key, value) in entries {
            match target.get(key) {
                None => {
                    target.insert(key.clone(), value.clone());
                }
                Some(existing) if existing != value => {
                    self.warn(
                        warnings,
                        code,
                        format!(
                            "Pod {} '{}' of {} has value '{}' but '{}' is already used, keeping '{}'",
                            what,
                            key,
                            source.key(),
                            value,
                            existing,
                            existing
                        ),
                    );
                }
                Some(_) => {}
            }
        }
    }

    fn build_deployment(
        &self,
        name: &str,
        labels: BTreeMap<String, String>,
        annotations: BTreeMap<String, String>,
        spec: PodSpec,
    ) -> Deployment {
        let mut selector = BTreeMap::new();
        selector.insert(self.config.correlation_label.clone(), name.to_string());

        let template = PodData::builder()
            .with_labels(labels)
            .with_annotations(annotations)
            .with_spec(spec)
            .build();

        Deployment {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(selector.clone()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(1),
                selector: LabelSelector {
                    match_labels: Some(selector),
                    ..Default::default()
                },
                template,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn repoint_services(
        &self,
        mut services: BTreeMap<String, Service>,
        sources: &[PodData],
        name: &str,
        merged_labels: &BTreeMap<String, String>,
        warnings: &mut Vec<Warning>,
    ) -> BTreeMap<String, Service> {
        for (service_name, service) in services.iter_mut() {
            let targets_source = sources
                .iter()
                .any(|source| service_selects(service, Some(source.labels())));
            if !targets_source {
                if service_selects(service, Some(merged_labels)) {
                    self.warn(
                        warnings,
                        WARNING_SERVICE_SELECTS_COMBINED_LABELS,
                        format!(
                            "Service '{}' selected no source workload but matches the combined labels of deployment '{}'",
                            service_name, name
                        ),
                    );
                }
                continue;
            }

            let mut selector = BTreeMap::new();
            selector.insert(self.config.correlation_label.clone(), name.to_string());
            replace_selector(service, selector);
            tracing::debug!(service = %service_name, deployment = %name, "Repointed service selector");
        }
        services
    }

    fn warn(&self, warnings: &mut Vec<Warning>, code: u32, message: String) {
        tracing::warn!(code, "{}", message);
        warnings.push(Warning::new(code, message));
    }
}

/// Adds items whose name is new. Identical duplicates are dropped, differing ones are an error.
fn union_by_name<T: Clone + PartialEq>(
    target: &mut Vec<T>,
    items: &[T],
    name_of: impl Fn(&T) -> &String,
    conflict: impl Fn(String) -> ValidationError,
) -> Result<(), ValidationError> {
    for item in items {
        let name = name_of(item);
        match target.iter().find(|existing| name_of(*existing) == name) {
            Some(existing) if existing != item => return Err(conflict(name.clone())),
            Some(_) => {}
            None => target.push(item.clone()),
        }
    }
    Ok(())
}

/// Keeps the first value seen for a pod field; a later differing value is a conflict.
fn agree<T: Clone + PartialEq + Serialize>(
    field: &str,
    merged: &mut Option<T>,
    incoming: &Option<T>,
) -> Result<(), ValidationError> {
    let Some(incoming) = incoming else {
        return Ok(());
    };
    match merged {
        Some(existing) if existing != incoming => Err(ValidationError::conflicting_field(
            field,
            render(existing),
            render(incoming),
        )),
        Some(_) => Ok(()),
        None => {
            *merged = Some(incoming.clone());
            Ok(())
        }
    }
}

fn render<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<{}>", e))
}

fn union_list<T: Clone + PartialEq>(target: &mut Option<Vec<T>>, items: &Option<Vec<T>>) {
    for item in items.iter().flatten() {
        let merged = target.get_or_insert_with(Vec::new);
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
}

fn non_empty_vec<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{EmptyDirVolumeSource, Pod, PodTemplateSpec, ServiceSpec};

    fn container(name: &str, image: &str) -> Container {
        Container {
            name: name.to_string(),
            image: Some(image.to_string()),
            ..Default::default()
        }
    }

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn pod(name: &str, pod_labels: &[(&str, &str)], containers: Vec<Container>) -> Workload {
        Workload::Pod(Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                labels: Some(labels(pod_labels)),
                ..Default::default()
            },
            spec: Some(PodSpec {
                containers,
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn deployment(name: &str, pod_labels: &[(&str, &str)], spec: PodSpec) -> Workload {
        Workload::Deployment(Deployment {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(3),
                selector: LabelSelector {
                    match_labels: Some(labels(pod_labels)),
                    ..Default::default()
                },
                template: PodTemplateSpec {
                    metadata: Some(ObjectMeta {
                        labels: Some(labels(pod_labels)),
                        ..Default::default()
                    }),
                    spec: Some(spec),
                },
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn service(selector: &[(&str, &str)]) -> Service {
        Service {
            spec: Some(ServiceSpec {
                selector: Some(labels(selector)),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn set(workloads: Vec<Workload>) -> WorkloadSet {
        let mut set = WorkloadSet::new();
        for w in workloads {
            set.insert(w).unwrap();
        }
        set
    }

    fn merged(outcome: &MergeOutcome) -> &Workload {
        assert_eq!(outcome.workloads.len(), 1);
        outcome.workloads.iter().next().unwrap()
    }

    #[test]
    fn test_single_workload_is_untouched() {
        let workloads = set(vec![pod("app", &[("app", "a")], vec![container("a", "img")])]);
        let mut services = BTreeMap::new();
        services.insert("svc".to_string(), service(&[("app", "a")]));

        let outcome = WorkloadMerger::default()
            .maybe_merge(workloads.clone(), services.clone())
            .unwrap();
        assert_eq!(outcome.workloads, workloads);
        assert_eq!(outcome.services, services);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_containers_are_unioned() {
        let workloads = set(vec![
            pod("w1", &[("app", "one")], vec![container("a", "i"), container("b", "i")]),
            pod("w2", &[("app", "two")], vec![container("c", "i")]),
        ]);

        let outcome = WorkloadMerger::default()
            .maybe_merge(workloads, BTreeMap::new())
            .unwrap();
        let workload = merged(&outcome);
        assert_eq!(workload.kind(), crate::domain::environment::ObjectKind::Deployment);
        let names: Vec<_> = workload.containers().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_identical_containers_are_kept_once() {
        let workloads = set(vec![
            pod("w1", &[], vec![container("a", "i")]),
            pod("w2", &[], vec![container("a", "i")]),
        ]);
        let outcome = WorkloadMerger::default()
            .maybe_merge(workloads, BTreeMap::new())
            .unwrap();
        assert_eq!(merged(&outcome).containers().len(), 1);
    }

    #[test]
    fn test_conflicting_container_fails() {
        let workloads = set(vec![
            pod("w1", &[], vec![container("a", "one")]),
            pod("w2", &[], vec![container("a", "two")]),
        ]);
        let err = WorkloadMerger::default()
            .maybe_merge(workloads, BTreeMap::new())
            .unwrap_err();
        assert_eq!(err, ValidationError::ConflictingContainerName("a".to_string()));
    }

    #[test]
    fn test_conflicting_volume_fails() {
        let volume = |medium: &str| Volume {
            name: "data".to_string(),
            empty_dir: Some(EmptyDirVolumeSource {
                medium: Some(medium.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let spec = |c: &str, medium: &str| PodSpec {
            containers: vec![container(c, "i")],
            volumes: Some(vec![volume(medium)]),
            ..Default::default()
        };
        let workloads = set(vec![
            deployment("d1", &[("app", "d1")], spec("a", "Memory")),
            deployment("d2", &[("app", "d2")], spec("b", "")),
        ]);
        let err = WorkloadMerger::default()
            .maybe_merge(workloads, BTreeMap::new())
            .unwrap_err();
        assert_eq!(err, ValidationError::ConflictingVolume("data".to_string()));
    }

    #[test]
    fn test_services_are_repointed() {
        let workloads = set(vec![
            pod("w1", &[("app", "one")], vec![container("a", "i")]),
            pod("w2", &[("app", "two")], vec![container("b", "i")]),
        ]);
        let mut services = BTreeMap::new();
        services.insert("one".to_string(), service(&[("app", "one")]));
        services.insert("other".to_string(), service(&[("app", "elsewhere")]));

        let merger = WorkloadMerger::default();
        let outcome = merger.maybe_merge(workloads, services).unwrap();
        let name = merged(&outcome).name().to_string();

        assert_eq!(
            outcome.services["one"].spec.as_ref().unwrap().selector,
            Some(labels(&[(DEFAULT_CORRELATION_LABEL, name.as_str())]))
        );
        assert_eq!(
            outcome.services["other"].spec.as_ref().unwrap().selector,
            Some(labels(&[("app", "elsewhere")]))
        );

        let pod_labels = merged(&outcome).pod_labels().unwrap();
        assert_eq!(pod_labels.get(DEFAULT_CORRELATION_LABEL), Some(&name));
        assert_eq!(pod_labels.get("app"), Some(&"one".to_string()));
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code, WARNING_LABEL_CONFLICT);
    }

    #[test]
    fn test_generated_name_is_stable_and_order_independent() {
        let merger = WorkloadMerger::default();
        let a = PodData::from_workload(&pod("a", &[], vec![]));
        let b = PodData::from_workload(&pod("b", &[], vec![]));

        let first = merger.generated_name(&[a.clone(), b.clone()]);
        let second = merger.generated_name(&[b, a]);
        assert_eq!(first, second);
        assert!(first.starts_with("workspace-"));
        assert_eq!(first.len(), "workspace-".len() + MERGED_NAME_HASH_BYTES * 2);
    }

    #[test]
    fn test_pod_fields_policy() {
        let spec = |c: &str, account: &str, grace: i64, secret: &str| PodSpec {
            containers: vec![container(c, "i")],
            service_account_name: Some(account.to_string()),
            termination_grace_period_seconds: Some(grace),
            image_pull_secrets: Some(vec![
                serde_yaml::from_str::<LocalObjectReference>(&format!("name: {}", secret)).unwrap(),
            ]),
            restart_policy: Some("OnFailure".to_string()),
            ..Default::default()
        };

        let workloads = set(vec![
            deployment("d1", &[], spec("a", "sa", 10, "regcred")),
            deployment("d2", &[], spec("b", "sa", 30, "regcred")),
        ]);
        let outcome = WorkloadMerger::default()
            .maybe_merge(workloads, BTreeMap::new())
            .unwrap();
        let pod_spec = merged(&outcome).pod_spec().unwrap();
        assert_eq!(pod_spec.service_account_name.as_deref(), Some("sa"));
        assert_eq!(pod_spec.termination_grace_period_seconds, Some(30));
        assert_eq!(pod_spec.image_pull_secrets.as_ref().unwrap().len(), 1);
        assert_eq!(pod_spec.restart_policy.as_deref(), Some(RESTART_POLICY_ALWAYS));
        assert_eq!(merged(&outcome).replicas(), Some(1));

        let codes: Vec<_> = outcome.warnings.iter().map(|w| w.code).collect();
        assert_eq!(
            codes,
            vec![
                WARNING_RESTART_POLICY_IGNORED,
                WARNING_REPLICAS_IGNORED,
                WARNING_RESTART_POLICY_IGNORED,
                WARNING_REPLICAS_IGNORED
            ]
        );

        let workloads = set(vec![
            deployment("d1", &[], spec("a", "one", 10, "regcred")),
            deployment("d2", &[], spec("b", "two", 30, "regcred")),
        ]);
        let err = WorkloadMerger::default()
            .maybe_merge(workloads, BTreeMap::new())
            .unwrap_err();
        assert!(matches!(err, ValidationError::ConflictingPodField { .. }));
    }

    #[test]
    fn test_machine_names_survive_merge() {
        let workloads = set(vec![
            pod("frontend", &[], vec![container("web", "i")]),
            pod("backend", &[], vec![container("db", "i")]),
        ]);
        let outcome = WorkloadMerger::default()
            .maybe_merge(workloads, BTreeMap::new())
            .unwrap();
        let mut machines = merged(&outcome).machine_names(DEFAULT_MACHINE_NAME_ANNOTATION_PREFIX);
        machines.sort();
        assert_eq!(machines, vec!["backend/db", "frontend/web"]);
    }

    fn yaml_spec(yaml: &str) -> PodSpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_scheduling_and_security_fields_are_carried() {
        let first = yaml_spec(
            r#"
containers: [{name: a, image: i}]
nodeSelector: {disk: ssd}
securityContext: {runAsUser: 1000}
tolerations:
  - {key: dedicated, operator: Equal, value: ide, effect: NoSchedule}
dnsPolicy: ClusterFirst
"#,
        );
        let second = yaml_spec(
            r#"
containers: [{name: b, image: i}]
nodeSelector: {zone: a}
tolerations:
  - {key: dedicated, operator: Equal, value: ide, effect: NoSchedule}
  - {key: gpu, operator: Exists}
hostAliases:
  - {ip: 10.0.0.1, hostnames: [db.local]}
"#,
        );

        let workloads = set(vec![
            deployment("d1", &[], first),
            deployment("d2", &[], second),
        ]);
        let outcome = WorkloadMerger::default()
            .maybe_merge(workloads, BTreeMap::new())
            .unwrap();
        let pod_spec = merged(&outcome).pod_spec().unwrap();

        assert_eq!(
            pod_spec.node_selector,
            Some(labels(&[("disk", "ssd"), ("zone", "a")]))
        );
        assert_eq!(
            pod_spec.security_context.as_ref().and_then(|s| s.run_as_user),
            Some(1000)
        );
        assert_eq!(pod_spec.tolerations.as_ref().map(Vec::len), Some(2));
        assert_eq!(pod_spec.host_aliases.as_ref().map(Vec::len), Some(1));
        assert_eq!(pod_spec.dns_policy.as_deref(), Some("ClusterFirst"));
        assert!(outcome
            .warnings
            .iter()
            .all(|w| w.code == WARNING_REPLICAS_IGNORED));
    }

    #[test]
    fn test_disagreeing_pod_fields_fail() {
        let merge = |first: &str, second: &str| {
            WorkloadMerger::default().maybe_merge(
                set(vec![
                    deployment("d1", &[], yaml_spec(first)),
                    deployment("d2", &[], yaml_spec(second)),
                ]),
                BTreeMap::new(),
            )
        };

        let err = merge(
            "containers: [{name: a}]\nnodeSelector: {disk: ssd}\n",
            "containers: [{name: b}]\nnodeSelector: {disk: hdd}\n",
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::conflicting_field("nodeSelector.disk", "ssd", "hdd")
        );

        let err = merge(
            "containers: [{name: a}]\nsecurityContext: {runAsUser: 1000}\n",
            "containers: [{name: b}]\nsecurityContext: {runAsUser: 0}\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ConflictingPodField { ref field, .. } if field == "securityContext"
        ));
    }

    #[test]
    fn test_uncarried_pod_fields_warn() {
        let workloads = set(vec![
            pod("w1", &[], vec![container("a", "i")]),
            Workload::Pod(Pod {
                metadata: ObjectMeta {
                    name: Some("w2".to_string()),
                    ..Default::default()
                },
                spec: Some(yaml_spec(
                    "containers: [{name: b, image: i}]\npriority: 100\nschedulingGates: [{name: wait}]\n",
                )),
                ..Default::default()
            }),
        ]);
        let outcome = WorkloadMerger::default()
            .maybe_merge(workloads, BTreeMap::new())
            .unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].code, WARNING_POD_FIELD_DROPPED);
        assert!(outcome.warnings[0].message.contains("Pod/w2"));
        assert!(outcome.warnings[0].message.contains("priority, schedulingGates"));
    }

    #[test]
    fn test_service_matching_only_combined_labels_warns() {
        let workloads = set(vec![
            pod("w1", &[("app", "w1")], vec![container("a", "i")]),
            pod("w2", &[("tier", "backend")], vec![container("b", "i")]),
        ]);
        let mut services = BTreeMap::new();
        services.insert(
            "split".to_string(),
            service(&[("app", "w1"), ("tier", "backend")]),
        );

        let outcome = WorkloadMerger::default()
            .maybe_merge(workloads, services)
            .unwrap();

        assert_eq!(
            outcome.services["split"].spec.as_ref().unwrap().selector,
            Some(labels(&[("app", "w1"), ("tier", "backend")]))
        );
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(
            outcome.warnings[0].code,
            WARNING_SERVICE_SELECTS_COMBINED_LABELS
        );
        assert!(outcome.warnings[0].message.contains("'split'"));
    }
}
