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

//! Environment domain: recipe in, compiled environment out

pub mod builder;
pub mod classifier;
pub mod compiled;
pub mod objects;
pub mod recipe;
pub mod validator;
pub mod warning;

pub use self::builder::EnvironmentBuilder;
pub use self::classifier::{ClassifiedSet, ObjectClassifier};
pub use self::compiled::CompiledEnvironment;
pub use self::objects::{
    machine_name_annotation, InfrastructureObject, ObjectKind, Workload, WorkloadSet,
};
pub use self::recipe::{ContentType, Recipe};
pub use self::validator::{ContainerPresenceCheck, EnvironmentCheck, ReferenceValidator};
pub use self::warning::Warning;
