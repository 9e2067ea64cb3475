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

/// Recipe content types
pub const CONTENT_TYPE_APPLICATION_X_YAML: &str = "application/x-yaml";
pub const CONTENT_TYPE_TEXT_YAML: &str = "text/yaml";
pub const CONTENT_TYPE_TEXT_X_YAML: &str = "text/x-yaml";

/// Object kinds
pub const KIND_POD: &str = "Pod";
pub const KIND_DEPLOYMENT: &str = "Deployment";
pub const KIND_SERVICE: &str = "Service";
pub const KIND_ROUTE: &str = "Route";
pub const KIND_PVC: &str = "PersistentVolumeClaim";
pub const KIND_SECRET: &str = "Secret";
pub const KIND_CONFIG_MAP: &str = "ConfigMap";
pub const KIND_DEPLOYMENT_CONFIG: &str = "DeploymentConfig";
pub const KIND_LIST: &str = "List";

/// API versions used when an object omits apiVersion
pub const API_VERSION_CORE: &str = "v1";
pub const API_VERSION_APPS: &str = "apps/v1";
pub const API_VERSION_ROUTE: &str = "route.openshift.io/v1";
pub const API_VERSION_OPENSHIFT_APPS: &str = "apps.openshift.io/v1";

/// Merge defaults
pub const DEFAULT_CORRELATION_LABEL: &str = "deployment-correlation";
pub const DEFAULT_MERGED_NAME_PREFIX: &str = "workspace";
pub const DEFAULT_MACHINE_NAME_ANNOTATION_PREFIX: &str = "workspace.container.";
pub const MACHINE_NAME_ANNOTATION_SUFFIX: &str = ".machine-name";
pub const MERGED_NAME_HASH_BYTES: usize = 8;

/// Restart policy
pub const RESTART_POLICY_ALWAYS: &str = "Always";

/// Warning codes
pub const WARNING_LABEL_CONFLICT: u32 = 4100;
pub const WARNING_ANNOTATION_CONFLICT: u32 = 4101;
pub const WARNING_RESTART_POLICY_IGNORED: u32 = 4102;
pub const WARNING_REPLICAS_IGNORED: u32 = 4103;
pub const WARNING_MACHINE_WITHOUT_CONTAINER: u32 = 4104;
pub const WARNING_POD_FIELD_DROPPED: u32 = 4105;
pub const WARNING_SERVICE_SELECTS_COMBINED_LABELS: u32 = 4106;

/// Dynamic configuration keys
pub const PROP_CORRELATION_LABEL: &str = "compiler.correlation-label";
pub const PROP_MERGED_NAME_PREFIX: &str = "compiler.merged-name-prefix";
pub const PROP_MACHINE_NAME_ANNOTATION_PREFIX: &str = "compiler.machine-name-annotation-prefix";
pub const PROP_RETRIEVAL_TIMEOUT_SECS: &str = "compiler.retrieval-timeout-secs";

/// URL scheme handled by the file retriever
pub const FILE_URL_SCHEME: &str = "file://";
