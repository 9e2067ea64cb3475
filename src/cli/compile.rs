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

//! Recipe compilation command

use crate::cli::display::TableRenderer;
use crate::domain::config::{
    apply_to_compiler_config, load_machine_configs, parse_dynamic_configs, CompilerConfig,
    MachineConfigs,
};
use crate::domain::environment::{EnvironmentBuilder, Recipe};
use crate::infrastructure::constants::CONTENT_TYPE_TEXT_X_YAML;
use crate::infrastructure::recipe::FileRecipeRetriever;
use clap::{Parser, ValueEnum};
use std::sync::Arc;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Yaml,
    Json,
}

#[derive(Parser, Debug, Clone)]
pub struct CompileCommand {
    /// Recipe file path (or file:// URL)
    #[arg(long, short = 'r')]
    pub recipe: String,

    /// Recipe content type
    #[arg(long, default_value = CONTENT_TYPE_TEXT_X_YAML)]
    pub content_type: String,

    /// Machine configs TOML file, keyed by <workload>/<container>
    #[arg(long, value_name = "PATH")]
    pub machines: Option<String>,

    /// Compiler configuration file (TOML)
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Dynamic configuration properties (-D key=value)
    ///
    /// compiler.correlation-label, compiler.merged-name-prefix,
    /// compiler.machine-name-annotation-prefix, compiler.retrieval-timeout-secs
    ///
    /// Example: -Dcompiler.merged-name-prefix=ws
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    pub properties: Vec<String>,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value = "table")]
    pub output: OutputFormat,
}

impl CompileCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let mut config = match self.config {
            Some(ref path) => CompilerConfig::from_file(path)?,
            None => CompilerConfig::default(),
        };

        if !self.properties.is_empty() {
            let dynamic_configs = parse_dynamic_configs(&self.properties)
                .map_err(|e| anyhow::anyhow!("Failed to parse dynamic configs: {}", e))?;
            apply_to_compiler_config(&dynamic_configs, &mut config)?;
        }

        let machines = match self.machines {
            Some(ref path) => load_machine_configs(path)?,
            None => MachineConfigs::new(),
        };

        let builder =
            EnvironmentBuilder::new(Arc::new(FileRecipeRetriever::new())).with_config(config)?;
        let recipe = Recipe::from_location(self.recipe.clone(), self.content_type.clone());

        let env = builder
            .build(Some(recipe), machines, Vec::new())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to compile {}: {}", self.recipe, e))?;

        let output = match self.output {
            OutputFormat::Table => TableRenderer::new().render_environment(&env),
            OutputFormat::Yaml => serde_yaml::to_string(&env)?,
            OutputFormat::Json => serde_json::to_string_pretty(&env)?,
        };
        println!("{}", output);

        Ok(())
    }
}
