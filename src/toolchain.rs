//! @ai:module:intent Build selected matcher harnesses and probe the filter tool
//! @ai:module:layer infrastructure
//! @ai:module:public_api HarnessBuilder, ToolchainStatus
//! @ai:module:stateless true

use crate::config::QualityConfig;
use crate::error::{HarnessError, Result};
use crate::runner::process::truncate_chars;
use crate::selection::{Selection, Tool};
use std::path::Path;
use std::process::Command;

const BUILD_STDERR_CHARS: usize = 300;

/// @ai:intent Outcome of the build/probe phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainStatus {
    pub built: Vec<Tool>,
    /// Whether the filter binary answered `--version`
    pub filter_available: bool,
}

/// @ai:intent Builds selected tools and probes tools that are not built
pub struct HarnessBuilder<'a> {
    config: &'a QualityConfig,
}

impl<'a> HarnessBuilder<'a> {
    /// @ai:effects pure
    pub fn new(config: &'a QualityConfig) -> Self {
        Self { config }
    }

    /// @ai:intent Check if a command is available on the system
    /// @ai:effects io
    fn is_tool_available(tool: &Path, args: &[&str]) -> bool {
        Command::new(tool)
            .args(args)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// @ai:intent Run one tool's build command in its working directory
    /// @ai:post nonzero exit is an error
    /// @ai:effects io
    fn build_tool(&self, tool: Tool) -> Result<()> {
        let tool_config = self.config.tools.get(tool);
        let Some((program, args)) = tool_config.build.split_first() else {
            return Ok(());
        };
        let dir = tool_config.working_dir(&self.config.paths.harness_dir);

        tracing::info!("Building {} harness in {}...", tool, dir.display());

        let output = Command::new(program)
            .args(args)
            .current_dir(&dir)
            .output()
            .map_err(|source| HarnessError::BuildSpawn {
                tool: tool.to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HarnessError::BuildFailed {
                tool: tool.to_string(),
                status: output.status.to_string(),
                stderr: truncate_chars(stderr.trim(), BUILD_STDERR_CHARS).to_string(),
            });
        }

        tracing::info!("  done");
        Ok(())
    }

    /// @ai:intent Probe the filter tool; a missing tool degrades to empty results
    /// @ai:effects io
    pub fn probe_filter(&self) -> bool {
        let binary = self
            .config
            .tools
            .get(Tool::Fzf)
            .binary_path(&self.config.paths.harness_dir);

        let available = Self::is_tool_available(&binary, &["--version"]);
        if available {
            tracing::info!("{} found", binary.display());
        } else {
            tracing::warn!(
                "{} not found in PATH, its results will be empty",
                binary.display()
            );
        }
        available
    }

    /// @ai:intent Build every selected tool, then probe the filter if selected
    /// @ai:post any build failure aborts with an error
    /// @ai:effects io
    pub fn prepare(&self, selection: &Selection) -> Result<ToolchainStatus> {
        let mut built = Vec::new();

        if !selection.skip_build {
            for tool in selection.tools() {
                if tool == Tool::Fzf {
                    continue;
                }
                self.build_tool(tool)?;
                built.push(tool);
            }
        }

        let filter_available = selection.tools().contains(&Tool::Fzf) && self.probe_filter();

        Ok(ToolchainStatus {
            built,
            filter_available,
        })
    }
}
