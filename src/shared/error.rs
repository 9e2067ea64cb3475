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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// The recipe or one of its objects is invalid. Always fixable by editing the recipe.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Environment can not contain two '{kind}' objects with the same name '{name}'")]
    DuplicateName { kind: String, name: String },

    #[error("Object #{index} in the recipe does not declare a kind")]
    MissingKind { index: usize },

    #[error("Object #{index} of kind '{kind}' in the recipe does not declare metadata.name")]
    MissingName { kind: String, index: usize },

    #[error("Objects of kind '{0}' are not supported in workspace recipes")]
    UnsupportedKind(String),

    #[error("Found unknown object kind '{0}' in the recipe")]
    UnknownKind(String),

    #[error("Invalid '{kind}' object '{name}': {reason}")]
    MalformedObject {
        kind: String,
        name: String,
        reason: String,
    },

    #[error("Recipe content type '{0}' is not supported. Supported types: application/x-yaml, text/yaml, text/x-yaml")]
    UnsupportedContentType(String),

    #[error("Route '{route}' refers to Service '{service}' which does not exist in the environment")]
    DanglingRouteTarget { route: String, service: String },

    #[error("Workloads can not be merged: container '{0}' is declared more than once with different content")]
    ConflictingContainerName(String),

    #[error("Workloads can not be merged: volume '{0}' is declared more than once with different content")]
    ConflictingVolume(String),

    #[error("Workloads can not be merged: conflicting values for '{field}': '{first}' and '{second}'")]
    ConflictingPodField {
        field: String,
        first: String,
        second: String,
    },

    #[error("{0}")]
    Check(String),
}

/// Compiler settings or machine configs supplied by the caller are unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse {origin}: {reason}")]
    Parse { origin: String, reason: String },

    #[error("Invalid compiler configuration: {0}")]
    Invalid(String),
}

/// The compiler could not even start working on the recipe.
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("Environment recipe is missing")]
    MissingRecipe,

    #[error("Environment recipe has neither content nor location")]
    MissingRecipeContent,

    #[error("Failed to retrieve recipe from '{location}': {source}")]
    Retrieval {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out after {seconds}s retrieving recipe from '{location}'")]
    RetrievalTimeout { location: String, seconds: u64 },

    #[error("Failed to decode recipe: {0}")]
    Decode(#[from] DecodeError),
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Document #{index} in the recipe is not an object")]
    NotAnObject { index: usize },
}

impl From<DecodeError> for CompileError {
    fn from(err: DecodeError) -> Self {
        CompileError::Infrastructure(InfrastructureError::Decode(err))
    }
}

impl ValidationError {
    pub fn duplicate_name(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind: kind.into(),
            name: name.into(),
        }
    }

    pub fn malformed(
        kind: impl Into<String>,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedObject {
            kind: kind.into(),
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn dangling_route(route: impl Into<String>, service: impl Into<String>) -> Self {
        Self::DanglingRouteTarget {
            route: route.into(),
            service: service.into(),
        }
    }

    pub fn conflicting_field(
        field: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::ConflictingPodField {
            field: field.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}

impl ConfigError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    pub fn read(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn parse(origin: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}

impl InfrastructureError {
    pub fn retrieval(location: impl Into<String>, source: std::io::Error) -> Self {
        Self::Retrieval {
            location: location.into(),
            source,
        }
    }
}

impl CompileError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CompileError::Validation(_))
    }

    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            CompileError::Validation(e) => Some(e),
            CompileError::Infrastructure(_) | CompileError::Config(_) => None,
        }
    }
}
