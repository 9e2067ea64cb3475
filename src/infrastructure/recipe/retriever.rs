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

use crate::infrastructure::constants::FILE_URL_SCHEME;
use std::path::PathBuf;

/// Fetches recipe content by location. Retries and backoff belong to the implementation.
#[async_trait::async_trait]
pub trait RecipeRetriever: Send + Sync {
    async fn fetch(&self, location: &str) -> std::io::Result<String>;
}

/// Reads recipes from the local filesystem. Accepts plain paths and `file://` URLs.
#[derive(Debug, Clone, Default)]
pub struct FileRecipeRetriever {
    base_dir: Option<PathBuf>,
}

impl FileRecipeRetriever {
    pub fn new() -> Self {
        Self { base_dir: None }
    }

    /// Relative locations are resolved against `base_dir`.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let path = PathBuf::from(location.strip_prefix(FILE_URL_SCHEME).unwrap_or(location));

        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }
}

#[async_trait::async_trait]
impl RecipeRetriever for FileRecipeRetriever {
    async fn fetch(&self, location: &str) -> std::io::Result<String> {
        let path = self.resolve(location);
        tracing::debug!(path = %path.display(), "Reading recipe file");
        tokio::fs::read_to_string(&path).await
    }
}
