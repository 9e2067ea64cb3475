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

use crate::infrastructure::constants::{
    CONTENT_TYPE_APPLICATION_X_YAML, CONTENT_TYPE_TEXT_X_YAML, CONTENT_TYPE_TEXT_YAML,
};
use crate::shared::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Declarative description of a workspace environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Recipe {
    pub fn from_content(content: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            content_type: content_type.into(),
            location: None,
        }
    }

    pub fn from_location(location: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            content: None,
            content_type: content_type.into(),
            location: Some(location.into()),
        }
    }

    pub(crate) fn with_content(mut self, content: String) -> Self {
        self.content = Some(content);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    ApplicationXYaml,
    TextYaml,
    TextXYaml,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::ApplicationXYaml => CONTENT_TYPE_APPLICATION_X_YAML,
            ContentType::TextYaml => CONTENT_TYPE_TEXT_YAML,
            ContentType::TextXYaml => CONTENT_TYPE_TEXT_X_YAML,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            CONTENT_TYPE_APPLICATION_X_YAML => Ok(ContentType::ApplicationXYaml),
            CONTENT_TYPE_TEXT_YAML => Ok(ContentType::TextYaml),
            CONTENT_TYPE_TEXT_X_YAML => Ok(ContentType::TextXYaml),
            _ => Err(ValidationError::UnsupportedContentType(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_supported_content_types() {
        for value in ["application/x-yaml", "text/yaml", "text/x-yaml"] {
            assert_eq!(ContentType::from_str(value).unwrap().as_str(), value);
        }
    }

    #[test]
    fn test_unsupported_content_type() {
        assert_eq!(
            ContentType::from_str("application/json").unwrap_err(),
            ValidationError::UnsupportedContentType("application/json".to_string())
        );
        assert!(ContentType::from_str("").is_err());
    }
}
