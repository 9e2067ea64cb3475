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

//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::environment::{CompiledEnvironment, ObjectKind};
use crate::domain::environment::Warning;
use crate::infrastructure::kubernetes::resources::service::service_selector;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use std::collections::BTreeMap;

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the compiled objects followed by any warnings
    pub fn render_environment(&self, env: &CompiledEnvironment) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("KIND").set_alignment(CellAlignment::Left),
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("DETAILS").set_alignment(CellAlignment::Left),
            ]);

        let mut rows = Vec::new();
        for (name, workload) in env.workloads() {
            let containers: Vec<&str> = workload.containers().iter().map(|c| c.name.as_str()).collect();
            rows.push((workload.kind(), name.as_str(), format!("containers: {}", containers.join(", "))));
        }
        for (name, service) in env.services() {
            let selector = service_selector(service).map(format_map).unwrap_or_default();
            rows.push((ObjectKind::Service, name.as_str(), format!("selector: {}", selector)));
        }
        for (name, route) in env.routes() {
            let targets: Vec<&str> = route.targets().map(|t| t.name.as_str()).collect();
            rows.push((ObjectKind::Route, name.as_str(), format!("to: {}", targets.join(", "))));
        }
        for name in env.pvcs().keys() {
            rows.push((ObjectKind::PersistentVolumeClaim, name.as_str(), String::new()));
        }
        for name in env.secrets().keys() {
            rows.push((ObjectKind::Secret, name.as_str(), String::new()));
        }
        for name in env.config_maps().keys() {
            rows.push((ObjectKind::ConfigMap, name.as_str(), String::new()));
        }

        let count = rows.len();
        for (kind, name, details) in rows {
            let color = self.theme.kind_color(kind);
            table.add_row(vec![
                Cell::new(kind.as_str()).fg(color),
                Cell::new(name),
                Cell::new(details),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Compiled Environment {} ─╮\n",
            format!("[{} objects]", count).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');

        if !env.warnings().is_empty() {
            output.push_str(&self.render_warnings(env.warnings()));
            output.push('\n');
        }

        let icon = StatusIcon::for_warnings(env.warnings().len());
        let summary = format!("{} {} warning(s)", icon, env.warnings().len());
        if env.warnings().is_empty() {
            output.push_str(&summary.green().to_string());
        } else {
            output.push_str(&summary.yellow().to_string());
        }
        output.push('\n');

        output
    }

    /// Render warnings in the order they were recorded
    pub fn render_warnings(&self, warnings: &[Warning]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("CODE").set_alignment(CellAlignment::Center),
                Cell::new("WARNING").set_alignment(CellAlignment::Left),
            ]);

        for warning in warnings {
            table.add_row(vec![
                Cell::new(warning.code).fg(self.theme.warning),
                Cell::new(&warning.message),
            ]);
        }

        table.to_string()
    }
}

fn format_map(map: &BTreeMap<String, String>) -> String {
    map.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::MachineConfigs;
    use crate::domain::environment::{EnvironmentBuilder, Recipe};
    use crate::infrastructure::recipe::FileRecipeRetriever;
    use std::sync::Arc;

    const RECIPE: &str = r#"
kind: Pod
metadata:
  name: app
  labels:
    app: web
spec:
  containers:
    - name: web
      image: nginx
---
kind: Service
metadata:
  name: web
spec:
  selector:
    app: web
"#;

    fn compile(warnings: Vec<Warning>) -> CompiledEnvironment {
        EnvironmentBuilder::new(Arc::new(FileRecipeRetriever::new()))
            .compile(Recipe::from_content(RECIPE, "text/yaml"), MachineConfigs::new(), warnings)
            .unwrap()
    }

    #[test]
    fn test_render_environment() {
        let output = TableRenderer::new().render_environment(&compile(vec![]));
        assert!(output.contains("[2 objects]"));
        assert!(output.contains("containers: web"));
        assert!(output.contains("selector: app=web"));
        assert!(output.contains("0 warning(s)"));
    }

    #[test]
    fn test_render_warnings() {
        let env = compile(vec![Warning::new(4000, "source says hi")]);
        let output = TableRenderer::new().render_environment(&env);
        assert!(output.contains("4000"));
        assert!(output.contains("source says hi"));
        assert!(output.contains("1 warning(s)"));
    }
}
