//! @ai:module:intent Configuration structs for the quality harness
//! @ai:module:layer infrastructure
//! @ai:module:public_api QualityConfig, PathConfig, RunConfig, ToolsConfig, ToolConfig
//! @ai:module:stateless true

use crate::error::{HarnessError, Result};
use crate::selection::{MatcherId, Tool};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// @ai:intent Main configuration, computed once and passed to every stage
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default)]
    pub paths: PathConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// @ai:intent Input files and output locations
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_corpus_file")]
    pub corpus_file: PathBuf,
    #[serde(default = "default_queries_file")]
    pub queries_file: PathBuf,
    /// Directory holding the `quality-*-latest.json` snapshots
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
    /// Root under which each tool's working directory lives
    #[serde(default = "default_harness_dir")]
    pub harness_dir: PathBuf,
}

/// @ai:intent Invocation limits and layout settings
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Deadline for matchers flagged as slow
    #[serde(default = "default_slow_timeout_secs")]
    pub slow_timeout_secs: u64,
    /// Deadline for each per-query filter invocation
    #[serde(default = "default_filter_timeout_secs")]
    pub filter_timeout_secs: u64,
    #[serde(default = "default_filter_max_lines")]
    pub filter_max_lines: usize,
    #[serde(default = "default_column_width")]
    pub column_width: usize,
}

/// @ai:intent Location, build command and binary of one tool
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Working directory relative to `harness_dir`; empty for tools found on PATH
    #[serde(default)]
    pub dir: PathBuf,
    /// Build command; empty means the tool is probed rather than built
    #[serde(default)]
    pub build: Vec<String>,
    #[serde(default)]
    pub binary: PathBuf,
}

/// @ai:intent Per-tool configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub fuzzymatch: ToolConfig,
    pub nucleo: ToolConfig,
    pub rapidfuzz: ToolConfig,
    pub ifrit: ToolConfig,
    pub fzf: ToolConfig,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            corpus_file: default_corpus_file(),
            queries_file: default_queries_file(),
            scratch_dir: default_scratch_dir(),
            harness_dir: default_harness_dir(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            slow_timeout_secs: default_slow_timeout_secs(),
            filter_timeout_secs: default_filter_timeout_secs(),
            filter_max_lines: default_filter_max_lines(),
            column_width: default_column_width(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            fuzzymatch: ToolConfig::local(
                "quality-fuzzymatch",
                &["swift", "build", "-c", "release"],
                ".build/release/quality-fuzzymatch",
            ),
            nucleo: ToolConfig::local(
                "quality-nucleo",
                &["cargo", "build", "--release"],
                "target/release/quality-nucleo",
            ),
            rapidfuzz: ToolConfig::local("quality-rapidfuzz", &["make"], "quality-rapidfuzz"),
            ifrit: ToolConfig::local(
                "quality-ifrit",
                &["swift", "build", "-c", "release"],
                ".build/release/quality-ifrit",
            ),
            fzf: ToolConfig {
                dir: PathBuf::new(),
                build: vec![],
                binary: PathBuf::from("fzf"),
            },
        }
    }
}

fn default_corpus_file() -> PathBuf {
    PathBuf::from("Resources/instruments-export.tsv")
}

fn default_queries_file() -> PathBuf {
    PathBuf::from("Resources/queries.tsv")
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir()
}

fn default_harness_dir() -> PathBuf {
    PathBuf::from("Comparison")
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_slow_timeout_secs() -> u64 {
    600
}

fn default_filter_timeout_secs() -> u64 {
    30
}

fn default_filter_max_lines() -> usize {
    10
}

fn default_column_width() -> usize {
    34
}

impl ToolConfig {
    /// @ai:effects pure
    fn local(dir: &str, build: &[&str], binary: &str) -> Self {
        Self {
            dir: PathBuf::from(dir),
            build: build.iter().map(|s| s.to_string()).collect(),
            binary: PathBuf::from(binary),
        }
    }

    /// @ai:intent Directory the build command runs in
    /// @ai:effects pure
    pub fn working_dir(&self, harness_dir: &Path) -> PathBuf {
        harness_dir.join(&self.dir)
    }

    /// @ai:intent Binary to invoke; bare names without a dir are resolved via PATH
    /// @ai:effects pure
    pub fn binary_path(&self, harness_dir: &Path) -> PathBuf {
        if self.dir.as_os_str().is_empty() {
            self.binary.clone()
        } else {
            self.working_dir(harness_dir).join(&self.binary)
        }
    }
}

impl ToolsConfig {
    /// @ai:effects pure
    pub fn get(&self, tool: Tool) -> &ToolConfig {
        match tool {
            Tool::FuzzyMatch => &self.fuzzymatch,
            Tool::Nucleo => &self.nucleo,
            Tool::RapidFuzz => &self.rapidfuzz,
            Tool::Ifrit => &self.ifrit,
            Tool::Fzf => &self.fzf,
        }
    }
}

impl RunConfig {
    /// @ai:intent Deadline for a whole batch invocation of a matcher
    /// @ai:effects pure
    pub fn batch_deadline(&self, matcher: MatcherId) -> Duration {
        if matcher.is_slow() {
            Duration::from_secs(self.slow_timeout_secs)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    /// @ai:effects pure
    pub fn filter_deadline(&self) -> Duration {
        Duration::from_secs(self.filter_timeout_secs)
    }
}

impl QualityConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| HarnessError::Config(format!("{}: {}", path.display(), e)))
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| HarnessError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Resolved binary path for a matcher
    /// @ai:effects pure
    pub fn binary_for(&self, matcher: MatcherId) -> PathBuf {
        self.tools
            .get(matcher.tool())
            .binary_path(&self.paths.harness_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_binaries_resolve_under_harness_dir() {
        let config = QualityConfig::default();
        assert_eq!(
            config.binary_for(MatcherId::Nucleo),
            PathBuf::from("Comparison/quality-nucleo/target/release/quality-nucleo")
        );
        assert_eq!(
            config.binary_for(MatcherId::FmSw),
            config.binary_for(MatcherId::FuzzyMatcher)
        );
        assert_eq!(config.binary_for(MatcherId::Fzf), PathBuf::from("fzf"));
    }

    #[test]
    fn test_slow_matcher_gets_long_deadline() {
        let run = RunConfig::default();
        assert_eq!(run.batch_deadline(MatcherId::Ifrit), Duration::from_secs(600));
        assert_eq!(run.batch_deadline(MatcherId::Nucleo), Duration::from_secs(300));
        assert_eq!(run.filter_deadline(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: QualityConfig = toml::from_str(
            r#"
[paths]
corpus_file = "data/corpus.tsv"

[run]
timeout_secs = 60
"#,
        )
        .unwrap();

        assert_eq!(config.paths.corpus_file, PathBuf::from("data/corpus.tsv"));
        assert_eq!(config.paths.queries_file, PathBuf::from("Resources/queries.tsv"));
        assert_eq!(config.run.timeout_secs, 60);
        assert_eq!(config.run.filter_max_lines, 10);
        assert_eq!(config.tools.rapidfuzz.build, vec!["make".to_string()]);
    }

    #[test]
    fn test_single_tool_override_keeps_other_tools() {
        let config: QualityConfig = toml::from_str(
            r#"
[tools.fzf]
binary = "/opt/fzf"
"#,
        )
        .unwrap();

        assert_eq!(config.binary_for(MatcherId::Fzf), PathBuf::from("/opt/fzf"));
        assert_eq!(
            config.binary_for(MatcherId::Nucleo),
            PathBuf::from("Comparison/quality-nucleo/target/release/quality-nucleo")
        );
        assert_eq!(config.tools.fuzzymatch.build[0], "swift");
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fuzzy-quality.toml");

        let mut config = QualityConfig::default();
        config.run.column_width = 40;
        config.save(&path).unwrap();

        let loaded = QualityConfig::load(&path).unwrap();
        assert_eq!(loaded.run.column_width, 40);
        assert_eq!(loaded.tools.ifrit.dir, PathBuf::from("quality-ifrit"));
    }
}
