//! @ai:module:intent Matcher catalogue and per-run selection
//! @ai:module:layer domain
//! @ai:module:public_api MatcherId, Tool, Protocol, MatcherFlags, Selection, retain_recognized
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// @ai:intent How a matcher is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Whole query batch on stdin, one process per run
    Batch,
    /// One `--filter <query>` process per query, candidates on stdin
    Filter,
}

/// @ai:intent Build unit that provides one or more matchers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    FuzzyMatch,
    Nucleo,
    RapidFuzz,
    Ifrit,
    Fzf,
}

impl Tool {
    /// @ai:intent Convert tool to string representation
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::FuzzyMatch => "fuzzymatch",
            Tool::Nucleo => "nucleo",
            Tool::RapidFuzz => "rapidfuzz",
            Tool::Ifrit => "ifrit",
            Tool::Fzf => "fzf",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// @ai:intent A matcher configuration that appears as one column in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatcherId {
    FuzzyMatcher,
    FmSw,
    Nucleo,
    RfWratio,
    RfPartial,
    Ifrit,
    Fzf,
}

impl MatcherId {
    /// Canonical order used for selection, snapshots and report columns.
    pub const ALL: [MatcherId; 7] = [
        MatcherId::FuzzyMatcher,
        MatcherId::FmSw,
        MatcherId::Nucleo,
        MatcherId::RfWratio,
        MatcherId::RfPartial,
        MatcherId::Ifrit,
        MatcherId::Fzf,
    ];

    /// @ai:intent Display label used in report headers
    /// @ai:effects pure
    pub fn label(&self) -> &'static str {
        match self {
            MatcherId::FuzzyMatcher => "FuzzyMatcher",
            MatcherId::FmSw => "FM(SW)",
            MatcherId::Nucleo => "nucleo",
            MatcherId::RfWratio => "RF(WRatio)",
            MatcherId::RfPartial => "RF(Partial)",
            MatcherId::Ifrit => "Ifrit",
            MatcherId::Fzf => "fzf",
        }
    }

    /// @ai:intent File-name tag for the scratch snapshot
    /// @ai:effects pure
    pub fn tag(&self) -> &'static str {
        match self {
            MatcherId::FuzzyMatcher => "fuzzymatch",
            MatcherId::FmSw => "fuzzymatch-sw",
            MatcherId::Nucleo => "nucleo",
            MatcherId::RfWratio => "rapidfuzz-wratio",
            MatcherId::RfPartial => "rapidfuzz-partial",
            MatcherId::Ifrit => "ifrit",
            MatcherId::Fzf => "fzf",
        }
    }

    /// @ai:intent Tool whose binary implements this matcher
    /// @ai:effects pure
    pub fn tool(&self) -> Tool {
        match self {
            MatcherId::FuzzyMatcher | MatcherId::FmSw => Tool::FuzzyMatch,
            MatcherId::Nucleo => Tool::Nucleo,
            MatcherId::RfWratio | MatcherId::RfPartial => Tool::RapidFuzz,
            MatcherId::Ifrit => Tool::Ifrit,
            MatcherId::Fzf => Tool::Fzf,
        }
    }

    /// @ai:effects pure
    pub fn protocol(&self) -> Protocol {
        match self {
            MatcherId::Fzf => Protocol::Filter,
            _ => Protocol::Batch,
        }
    }

    /// @ai:intent Matcher-specific flags appended after the corpus path
    /// @ai:effects pure
    pub fn extra_args(&self) -> &'static [&'static str] {
        match self {
            MatcherId::FmSw => &["--sw"],
            MatcherId::RfPartial => &["--scorer", "partial_ratio"],
            _ => &[],
        }
    }

    /// @ai:intent Whether the matcher needs the long deadline
    /// @ai:effects pure
    pub fn is_slow(&self) -> bool {
        matches!(self, MatcherId::Ifrit)
    }
}

impl std::fmt::Display for MatcherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// @ai:intent Raw matcher flags as given on the command line
#[derive(Debug, Clone, Copy, Default)]
pub struct MatcherFlags {
    pub fm: bool,
    pub fm_ed: bool,
    pub fm_sw: bool,
    pub nucleo: bool,
    pub rf: bool,
    pub rf_wratio: bool,
    pub rf_partial: bool,
    pub fzf: bool,
    pub ifrit: bool,
}

impl MatcherFlags {
    /// @ai:effects pure
    fn any(&self) -> bool {
        self.fm
            || self.fm_ed
            || self.fm_sw
            || self.nucleo
            || self.rf
            || self.rf_wratio
            || self.rf_partial
            || self.fzf
            || self.ifrit
    }

    /// @ai:intent Whether a matcher was asked for explicitly
    /// @ai:effects pure
    fn enables(&self, matcher: MatcherId) -> bool {
        match matcher {
            MatcherId::FuzzyMatcher => self.fm || self.fm_ed,
            MatcherId::FmSw => self.fm || self.fm_sw,
            MatcherId::Nucleo => self.nucleo,
            MatcherId::RfWratio => self.rf || self.rf_wratio,
            MatcherId::RfPartial => self.rf || self.rf_partial,
            MatcherId::Ifrit => self.ifrit,
            MatcherId::Fzf => self.fzf,
        }
    }
}

/// @ai:intent Matchers chosen for this run, computed once from the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub matchers: Vec<MatcherId>,
    pub skip_build: bool,
}

impl Selection {
    /// @ai:intent Resolve flags into an ordered matcher list
    /// @ai:post no flags selects every matcher except Ifrit
    /// @ai:effects pure
    pub fn from_flags(flags: &MatcherFlags, skip_build: bool) -> Self {
        let matchers = if flags.any() {
            MatcherId::ALL
                .into_iter()
                .filter(|m| flags.enables(*m))
                .collect()
        } else {
            MatcherId::ALL
                .into_iter()
                .filter(|m| !m.is_slow())
                .collect()
        };

        Self {
            matchers,
            skip_build,
        }
    }

    /// @ai:intent Distinct tools backing the selected matchers, in selection order
    /// @ai:effects pure
    pub fn tools(&self) -> Vec<Tool> {
        let mut seen = HashSet::new();
        self.matchers
            .iter()
            .map(|m| m.tool())
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// @ai:effects pure
    pub fn labels(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.label()).collect()
    }
}

/// @ai:intent Drop option-looking arguments that are not in the recognised set
/// @ai:pre first element is the program name
/// @ai:post positional arguments and recognised flags keep their order
/// @ai:effects pure
pub fn retain_recognized<I>(args: I, known: &HashSet<String>) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut iter = args.into_iter();
    let mut kept: Vec<String> = iter.next().into_iter().collect();
    let mut passthrough = false;

    for arg in iter {
        if passthrough || arg == "--" || !arg.starts_with('-') || arg == "-" {
            passthrough |= arg == "--";
            kept.push(arg);
            continue;
        }

        let name = arg.split_once('=').map(|(n, _)| n).unwrap_or(arg.as_str());

        if known.contains(name) {
            kept.push(arg);
        } else {
            tracing::debug!("Ignoring unrecognised argument {}", arg);
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_selection_excludes_ifrit() {
        let selection = Selection::from_flags(&MatcherFlags::default(), false);
        assert_eq!(
            selection.matchers,
            vec![
                MatcherId::FuzzyMatcher,
                MatcherId::FmSw,
                MatcherId::Nucleo,
                MatcherId::RfWratio,
                MatcherId::RfPartial,
                MatcherId::Fzf,
            ]
        );
    }

    #[test]
    fn test_fm_flag_enables_both_modes() {
        let flags = MatcherFlags {
            fm: true,
            ..Default::default()
        };
        let selection = Selection::from_flags(&flags, true);
        assert_eq!(
            selection.matchers,
            vec![MatcherId::FuzzyMatcher, MatcherId::FmSw]
        );
        assert!(selection.skip_build);
        assert_eq!(selection.tools(), vec![Tool::FuzzyMatch]);
    }

    #[test]
    fn test_individual_flags_keep_canonical_order() {
        let flags = MatcherFlags {
            fzf: true,
            ifrit: true,
            rf_partial: true,
            ..Default::default()
        };
        let selection = Selection::from_flags(&flags, false);
        assert_eq!(
            selection.matchers,
            vec![MatcherId::RfPartial, MatcherId::Ifrit, MatcherId::Fzf]
        );
        assert_eq!(selection.labels(), vec!["RF(Partial)", "Ifrit", "fzf"]);
    }

    #[test]
    fn test_extra_args_per_matcher() {
        assert_eq!(MatcherId::FmSw.extra_args(), &["--sw"]);
        assert_eq!(
            MatcherId::RfPartial.extra_args(),
            &["--scorer", "partial_ratio"]
        );
        assert!(MatcherId::Nucleo.extra_args().is_empty());
        assert_eq!(MatcherId::Fzf.protocol(), Protocol::Filter);
    }

    #[test]
    fn test_retain_recognized_drops_unknown_flags() {
        let known: HashSet<String> = ["--fm", "--config", "--skip-build"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let args = ["fuzzy-quality", "--fm", "--bogus", "--config=x.toml", "-q", "report"]
            .iter()
            .map(|s| s.to_string());

        let kept = retain_recognized(args, &known);
        assert_eq!(
            kept,
            vec!["fuzzy-quality", "--fm", "--config=x.toml", "report"]
        );
    }
}
