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

// CLI command definitions

use super::compile::CompileCommand;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "env-compiler",
    version,
    about = "Compile workspace environment recipes into Kubernetes object graphs",
    long_about = "A developer tool that runs the environment compiler on a local recipe and prints the compiled objects. It never contacts a cluster."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Compile a recipe file and print the result
    Compile(CompileCommand),
}
