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

use crate::domain::config::compiler::CompilerConfig;
use crate::domain::config::machine::MachineConfigs;
use crate::domain::environment::classifier::{ClassifiedSet, ObjectClassifier};
use crate::domain::environment::compiled::CompiledEnvironment;
use crate::domain::environment::recipe::{ContentType, Recipe};
use crate::domain::environment::validator::{ContainerPresenceCheck, ReferenceValidator};
use crate::domain::environment::warning::Warning;
use crate::infrastructure::constants::WARNING_MACHINE_WITHOUT_CONTAINER;
use crate::infrastructure::kubernetes::resources::WorkloadMerger;
use crate::infrastructure::recipe::{Decoder, RecipeRetriever, YamlDecoder};
use crate::shared::error::{InfrastructureError, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Compiles recipes into [`CompiledEnvironment`]s.
///
/// Holds no per-request state; one builder can serve concurrent compilations.
pub struct EnvironmentBuilder {
    retriever: Arc<dyn RecipeRetriever>,
    decoder: Arc<dyn Decoder>,
    classifier: ObjectClassifier,
    merger: WorkloadMerger,
    validator: ReferenceValidator,
    config: CompilerConfig,
}

impl EnvironmentBuilder {
    pub fn new(retriever: Arc<dyn RecipeRetriever>) -> Self {
        let config = CompilerConfig::default();
        Self {
            retriever,
            decoder: Arc::new(YamlDecoder::new()),
            classifier: ObjectClassifier::new(),
            merger: WorkloadMerger::new(config.merger_config()),
            validator: ReferenceValidator::new().with_check(ContainerPresenceCheck),
            config,
        }
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Result<Self> {
        config.validate()?;
        self.merger = WorkloadMerger::new(config.merger_config());
        self.config = config;
        Ok(self)
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn Decoder>) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn with_validator(mut self, validator: ReferenceValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a recipe, fetching its content first when only a location is known.
    ///
    /// The first failing stage ends the compilation; nothing partial is returned.
    pub async fn build(
        &self,
        recipe: Option<Recipe>,
        machines: MachineConfigs,
        source_warnings: Vec<Warning>,
    ) -> Result<CompiledEnvironment> {
        let recipe = recipe.ok_or(InfrastructureError::MissingRecipe)?;

        let recipe = match recipe.content {
            Some(_) => recipe,
            None => {
                let location = recipe
                    .location
                    .clone()
                    .ok_or(InfrastructureError::MissingRecipeContent)?;
                let content = self.fetch(&location).await?;
                recipe.with_content(content)
            }
        };

        self.compile(recipe, machines, source_warnings)
    }

    /// Synchronous part of [`build`](Self::build) for recipes that already carry content.
    pub fn compile(
        &self,
        recipe: Recipe,
        machines: MachineConfigs,
        source_warnings: Vec<Warning>,
    ) -> Result<CompiledEnvironment> {
        let content = recipe
            .content
            .as_deref()
            .ok_or(InfrastructureError::MissingRecipeContent)?;
        let content_type: ContentType = recipe.content_type.parse()?;

        let raw_objects = self.decoder.decode(content, content_type)?;
        debug!(objects = raw_objects.len(), "Decoded recipe");

        let mut objects = self.classifier.classify(raw_objects)?;
        debug!(objects = objects.len(), "Classified recipe objects");

        let merged = self.merger.maybe_merge(
            std::mem::take(&mut objects.workloads),
            std::mem::take(&mut objects.services),
        )?;
        objects.workloads = merged.workloads;
        objects.services = merged.services;

        self.validator.validate(&objects)?;
        debug!("Validated environment references");

        let mut warnings = source_warnings;
        warnings.extend(merged.warnings);
        warnings.extend(self.machine_warnings(&objects, &machines));

        info!(
            workloads = objects.workloads.len(),
            services = objects.services.len(),
            warnings = warnings.len(),
            "Compiled environment"
        );

        Ok(CompiledEnvironment::new(
            recipe,
            objects,
            machines,
            warnings,
            self.config.machine_name_annotation_prefix.clone(),
        ))
    }

    async fn fetch(&self, location: &str) -> Result<String> {
        debug!(location, "Retrieving recipe content");
        let fetch = self.retriever.fetch(location);

        let content = match self.config.retrieval_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, fetch).await.map_err(|_| {
                InfrastructureError::RetrievalTimeout {
                    location: location.to_string(),
                    seconds: timeout.as_secs(),
                }
            })?,
            None => fetch.await,
        };

        Ok(content.map_err(|e| InfrastructureError::retrieval(location, e))?)
    }

    fn machine_warnings(&self, objects: &ClassifiedSet, machines: &MachineConfigs) -> Vec<Warning> {
        let prefix = &self.config.machine_name_annotation_prefix;
        let known: BTreeSet<String> = objects
            .workloads
            .iter()
            .flat_map(|w| w.machine_names(prefix))
            .collect();

        machines
            .keys()
            .filter(|name| !known.contains(*name))
            .map(|name| {
                warn!(machine = %name, "Machine config does not match any container");
                Warning::new(
                    WARNING_MACHINE_WITHOUT_CONTAINER,
                    format!(
                        "Machine config '{}' does not match any container in the recipe",
                        name
                    ),
                )
            })
            .collect()
    }
}

impl std::fmt::Debug for EnvironmentBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentBuilder")
            .field("validator", &self.validator)
            .field("config", &self.config)
            .finish()
    }
}
