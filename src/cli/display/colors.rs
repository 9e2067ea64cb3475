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

//! Color theme for CLI output

use crate::domain::environment::ObjectKind;
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub workload: TableColor,
    pub network: TableColor,
    pub storage: TableColor,
    pub warning: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            workload: TableColor::Green,
            network: TableColor::Cyan,
            storage: TableColor::Magenta,
            warning: TableColor::Yellow,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for an object kind
    pub fn kind_color(&self, kind: ObjectKind) -> TableColor {
        match kind {
            ObjectKind::Pod | ObjectKind::Deployment | ObjectKind::DeploymentConfig => {
                self.workload
            }
            ObjectKind::Service | ObjectKind::Route => self.network,
            ObjectKind::PersistentVolumeClaim => self.storage,
            ObjectKind::Secret | ObjectKind::ConfigMap => self.muted,
        }
    }
}
