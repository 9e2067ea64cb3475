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

use k8s_openapi::api::core::v1::{Service, ServiceSpec};
use std::collections::BTreeMap;

pub fn service_selector(service: &Service) -> Option<&BTreeMap<String, String>> {
    service
        .spec
        .as_ref()
        .and_then(|s| s.selector.as_ref())
        .filter(|s| !s.is_empty())
}

/// An empty selector never matches: such services are managed by hand.
pub fn selector_matches(
    selector: &BTreeMap<String, String>,
    labels: Option<&BTreeMap<String, String>>,
) -> bool {
    if selector.is_empty() {
        return false;
    }
    let Some(labels) = labels else {
        return false;
    };
    selector.iter().all(|(k, v)| labels.get(k) == Some(v))
}

pub fn service_selects(service: &Service, labels: Option<&BTreeMap<String, String>>) -> bool {
    service_selector(service).is_some_and(|selector| selector_matches(selector, labels))
}

pub fn replace_selector(service: &mut Service, selector: BTreeMap<String, String>) {
    service
        .spec
        .get_or_insert_with(ServiceSpec::default)
        .selector = Some(selector);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn service(selector: Option<BTreeMap<String, String>>) -> Service {
        Service {
            spec: Some(ServiceSpec {
                selector,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_selector_subset_matches() {
        let pod_labels = labels(&[("app", "web"), ("tier", "front")]);
        assert!(selector_matches(&labels(&[("app", "web")]), Some(&pod_labels)));
        assert!(!selector_matches(&labels(&[("app", "db")]), Some(&pod_labels)));
        assert!(!selector_matches(&labels(&[("app", "web")]), None));
    }

    #[test]
    fn test_empty_selector_never_matches() {
        let svc = service(Some(BTreeMap::new()));
        assert!(!service_selects(&svc, Some(&labels(&[("app", "web")]))));
        let svc = service(None);
        assert!(!service_selects(&svc, Some(&labels(&[("app", "web")]))));
    }

    #[test]
    fn test_replace_selector_creates_spec() {
        let mut svc = Service::default();
        replace_selector(&mut svc, labels(&[("x", "y")]));
        assert_eq!(service_selector(&svc), Some(&labels(&[("x", "y")])));
    }
}
