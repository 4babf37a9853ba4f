// Copyright 2025 ModerRAS
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

//! # Coding Helper
//!
//! Screenshot a coding-interview question and let a vision-language model
//! solve it.
//!
//! The flow is deliberately short: grab the screen (or a region of it),
//! encode it as PNG in memory, send it with a fixed solving prompt to an
//! OpenAI-compatible chat completions endpoint and show the answer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use coding_helper::{AppSettings, Region, Solver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Reads OPENAI_API_KEY and friends from the environment
//!     let settings = AppSettings::load_with_env();
//!     let solver = Solver::from_settings(&settings);
//!
//!     let answer = solver
//!         .capture_region_and_solve(Region::new(100, 100, 800, 600))
//!         .await?;
//!
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod config;
pub mod gui;
pub mod model;
pub mod settings;
pub mod solver;

pub use capture::{CaptureError, CapturedImage, Region, Screenshot, Selection};
pub use model::{ModelClient, ModelConfig, ModelError, ModelResponse};
pub use settings::AppSettings;
pub use solver::{Answer, Solver, SolverConfig, SolverError};
