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

use crate::domain::environment::classifier::ClassifiedSet;
use crate::shared::error::ValidationError;

/// Additional, platform-specific rule run after the reference checks.
pub trait EnvironmentCheck: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self, objects: &ClassifiedSet) -> Result<(), ValidationError>;
}

/// Rejects workloads that declare no containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerPresenceCheck;

impl EnvironmentCheck for ContainerPresenceCheck {
    fn name(&self) -> &str {
        "container-presence"
    }

    fn check(&self, objects: &ClassifiedSet) -> Result<(), ValidationError> {
        match objects.workloads.iter().find(|w| w.containers().is_empty()) {
            Some(workload) => Err(ValidationError::Check(format!(
                "{} '{}' does not declare any containers",
                workload.kind(),
                workload.name()
            ))),
            None => Ok(()),
        }
    }
}

/// Cross-object checks. Read-only.
#[derive(Default)]
pub struct ReferenceValidator {
    checks: Vec<Box<dyn EnvironmentCheck>>,
}

impl ReferenceValidator {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn with_check(mut self, check: impl EnvironmentCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn check_names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn validate(&self, objects: &ClassifiedSet) -> Result<(), ValidationError> {
        self.validate_route_targets(objects)?;

        for check in &self.checks {
            tracing::debug!(check = check.name(), "Running environment check");
            check.check(objects)?;
        }

        Ok(())
    }

    /// Every Service-kind route target must exist in the environment.
    fn validate_route_targets(&self, objects: &ClassifiedSet) -> Result<(), ValidationError> {
        for (route_name, route) in &objects.routes {
            if let Some(target) = route
                .targets()
                .filter(|t| t.is_service())
                .find(|t| !objects.services.contains_key(&t.name))
            {
                return Err(ValidationError::dangling_route(route_name, &target.name));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ReferenceValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceValidator")
            .field("checks", &self.check_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::environment::objects::Workload;
    use crate::infrastructure::kubernetes::resources::route::{
        Route, RouteSpec, RouteTargetReference,
    };
    use k8s_openapi::api::core::v1::{Pod, Service};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn route(name: &str, kind: &str, target: &str) -> Route {
        Route {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            spec: RouteSpec {
                to: RouteTargetReference {
                    kind: kind.to_string(),
                    name: target.to_string(),
                    weight: None,
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn objects_with_service(service: &str) -> ClassifiedSet {
        let mut objects = ClassifiedSet::default();
        objects
            .services
            .insert(service.to_string(), Service::default());
        objects
    }

    #[test]
    fn test_route_to_existing_service() {
        let mut objects = objects_with_service("web");
        objects
            .routes
            .insert("r".to_string(), route("r", "Service", "web"));
        assert!(ReferenceValidator::new().validate(&objects).is_ok());
    }

    #[test]
    fn test_dangling_route_names_route_and_service() {
        let mut objects = objects_with_service("web");
        objects
            .routes
            .insert("r".to_string(), route("r", "Service", "notweb"));
        let err = ReferenceValidator::new().validate(&objects).unwrap_err();
        assert_eq!(
            err,
            ValidationError::DanglingRouteTarget {
                route: "r".to_string(),
                service: "notweb".to_string()
            }
        );
        let message = err.to_string();
        assert!(message.contains("'r'"));
        assert!(message.contains("'notweb'"));
    }

    #[test]
    fn test_non_service_targets_are_ignored() {
        let mut objects = ClassifiedSet::default();
        objects
            .routes
            .insert("r".to_string(), route("r", "Ingress", "missing"));
        assert!(ReferenceValidator::new().validate(&objects).is_ok());
    }

    #[test]
    fn test_alternate_backends_are_checked() {
        let mut objects = objects_with_service("web");
        let mut r = route("r", "Service", "web");
        r.spec.alternate_backends.push(RouteTargetReference {
            kind: "Service".to_string(),
            name: "canary".to_string(),
            weight: Some(10),
        });
        objects.routes.insert("r".to_string(), r);
        assert!(ReferenceValidator::new().validate(&objects).is_err());
    }

    #[test]
    fn test_container_presence_check() {
        let mut objects = ClassifiedSet::default();
        objects
            .workloads
            .insert(Workload::Pod(Pod {
                metadata: ObjectMeta {
                    name: Some("empty".to_string()),
                    ..Default::default()
                },
                ..Default::default()
            }))
            .unwrap();

        assert!(ReferenceValidator::new().validate(&objects).is_ok());

        let validator = ReferenceValidator::new().with_check(ContainerPresenceCheck);
        assert_eq!(validator.check_names(), vec!["container-presence"]);
        let err = validator.validate(&objects).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Pod 'empty' does not declare any containers"
        );
    }
}
