//! Command-line interface definitions

use crate::config::{CliOverrides, OutputFormat};
use crate::numeral::parse_arbitrary_sequence;
use crate::rules::{RuleDraft, RuleKind, RuleUpdate};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Canonical page label resolution for scanned books
#[derive(Parser, Debug)]
#[command(name = "canonical-pages", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Config file (defaults to ./canonical-pages.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Overrides for settings shared by every command
    pub fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides::new();
        overrides.format = self.format;
        overrides.log_level = match (self.quiet, self.verbose) {
            (true, _) => Some("error".to_string()),
            (false, 0) => None,
            (false, 1) => Some("info".to_string()),
            (false, 2) => Some("debug".to_string()),
            (false, _) => Some("trace".to_string()),
        };
        if let Commands::Rules(args) = &self.command {
            overrides.store_path = args.store.clone();
            if args.no_auto_join {
                overrides.auto_join = Some(false);
            }
        }
        overrides
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute canonical pages from a project snapshot
    Compute(SnapshotArgs),
    /// List pages where page-number regions disagree
    Conflicts(SnapshotArgs),
    /// Describe the page configuration of each region
    Regions(SnapshotArgs),
    /// Rewrite a physical page range in canonical labels
    Range(RangeArgs),
    /// Validate a page range string
    ValidateRange(ValidateRangeArgs),
    /// Generate a label sequence
    Sequence(SequenceArgs),
    /// Manage stored canonical page rules
    Rules(RulesArgs),
}

/// Project snapshot input (JSON)
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Snapshot file with document_page_count, regions, rules and readings
    pub snapshot: PathBuf,
}

#[derive(Args, Debug)]
pub struct RangeArgs {
    /// Snapshot file
    pub snapshot: PathBuf,
    /// Physical page range, e.g. "1-3, 5"
    pub range: String,
}

#[derive(Args, Debug)]
pub struct ValidateRangeArgs {
    /// Range string, e.g. "1-2,5-6,8"
    pub range: String,
    /// Highest valid page
    #[arg(long)]
    pub max_page: Option<u32>,
}

#[derive(Args, Debug)]
pub struct SequenceArgs {
    #[command(subcommand)]
    pub kind: SequenceKind,
}

#[derive(Subcommand, Debug)]
pub enum SequenceKind {
    /// Consecutive Arabic numerals
    Arabic {
        #[arg(long, allow_hyphen_values = true)]
        start: i64,
        #[arg(long, allow_hyphen_values = true)]
        count: i64,
    },
    /// Consecutive lowercase Roman numerals
    Roman {
        #[arg(long)]
        start: String,
        #[arg(long, allow_hyphen_values = true)]
        count: i64,
    },
    /// Split a comma-separated label list
    Arbitrary {
        input: String,
    },
}

#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Rule store file
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Do not join contiguous rules after changes
    #[arg(long)]
    pub no_auto_join: bool,

    #[command(subcommand)]
    pub action: RulesAction,
}

#[derive(Subcommand, Debug)]
pub enum RulesAction {
    /// List stored rules
    List {
        /// Include soft-deleted rules
        #[arg(long)]
        include_deleted: bool,
    },
    /// Add a rule
    Add(AddRuleArgs),
    /// Update a rule's range, numbering or label
    Update(UpdateRuleArgs),
    /// Soft-delete a rule
    Remove {
        id: String,
    },
    /// Join contiguous rules now
    Join,
}

/// Numbering options shared by add and update
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct NumberingArgs {
    /// Arabic numbering starting at this label
    #[arg(long)]
    pub arabic: Option<String>,
    /// Roman numbering starting at this label
    #[arg(long)]
    pub roman: Option<String>,
    /// Comma-separated literal labels, one per page
    #[arg(long)]
    pub arbitrary: Option<String>,
    /// Mark the pages as intentionally unindexed
    #[arg(long)]
    pub negative: bool,
}

impl NumberingArgs {
    pub fn to_kind(&self) -> Option<RuleKind> {
        if let Some(start) = &self.arabic {
            Some(RuleKind::arabic(start.clone()))
        } else if let Some(start) = &self.roman {
            Some(RuleKind::roman(start.clone()))
        } else if let Some(input) = &self.arbitrary {
            Some(RuleKind::arbitrary(parse_arbitrary_sequence(input)))
        } else if self.negative {
            Some(RuleKind::Negative)
        } else {
            None
        }
    }
}

#[derive(Args, Debug)]
pub struct AddRuleArgs {
    /// First physical page
    #[arg(long)]
    pub start: u32,
    /// Last physical page
    #[arg(long)]
    pub end: u32,
    #[command(flatten)]
    pub numbering: NumberingArgs,
    /// Human-readable label
    #[arg(long)]
    pub label: Option<String>,
    /// Reject ranges beyond this page count
    #[arg(long)]
    pub document_pages: Option<u32>,
}

impl AddRuleArgs {
    /// Build a draft; `None` when no numbering option was given
    pub fn to_draft(&self) -> Option<RuleDraft> {
        let kind = self.numbering.to_kind()?;
        let mut draft = RuleDraft::new(self.start, self.end, kind);
        draft.label = self.label.clone();
        Some(draft)
    }
}

#[derive(Args, Debug)]
pub struct UpdateRuleArgs {
    pub id: String,
    #[arg(long)]
    pub start: Option<u32>,
    #[arg(long)]
    pub end: Option<u32>,
    #[command(flatten)]
    pub numbering: NumberingArgs,
    #[arg(long)]
    pub label: Option<String>,
    #[arg(long)]
    pub document_pages: Option<u32>,
}

impl UpdateRuleArgs {
    pub fn to_update(&self) -> RuleUpdate {
        let mut update = RuleUpdate::new(self.id.clone());
        update.document_page_start = self.start;
        update.document_page_end = self.end;
        update.kind = self.numbering.to_kind();
        update.label = self.label.clone();
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compute() {
        let cli = Cli::parse_from(["canonical-pages", "compute", "snapshot.json", "--format", "json"]);
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Compute(_)));
    }

    #[test]
    fn test_verbosity_overrides() {
        let cli = Cli::parse_from(["canonical-pages", "-vv", "validate-range", "1-3"]);
        assert_eq!(cli.overrides().log_level.as_deref(), Some("debug"));

        let cli = Cli::parse_from(["canonical-pages", "-q", "validate-range", "1-3"]);
        assert_eq!(cli.overrides().log_level.as_deref(), Some("error"));
    }

    #[test]
    fn test_parse_rule_add() {
        let cli = Cli::parse_from([
            "canonical-pages",
            "rules",
            "--store",
            "rules.json",
            "--no-auto-join",
            "add",
            "--start",
            "1",
            "--end",
            "4",
            "--roman",
            "i",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.store_path, Some(PathBuf::from("rules.json")));
        assert_eq!(overrides.auto_join, Some(false));

        match cli.command {
            Commands::Rules(RulesArgs {
                action: RulesAction::Add(args),
                ..
            }) => {
                let draft = args.to_draft().unwrap();
                assert_eq!(draft.kind, RuleKind::roman("i"));
                assert_eq!(draft.document_page_end, 4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_numbering_options_exclusive() {
        let result = Cli::try_parse_from([
            "canonical-pages",
            "rules",
            "add",
            "--start",
            "1",
            "--end",
            "2",
            "--roman",
            "i",
            "--negative",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_arbitrary_labels_split() {
        let args = NumberingArgs {
            arbitrary: Some("10a, 10b".to_string()),
            ..Default::default()
        };
        assert_eq!(args.to_kind(), Some(RuleKind::arbitrary(["10a", "10b"])));
    }

    #[test]
    fn test_negative_count_parses() {
        let cli = Cli::parse_from([
            "canonical-pages",
            "sequence",
            "arabic",
            "--start",
            "1",
            "--count",
            "-1",
        ]);
        match cli.command {
            Commands::Sequence(SequenceArgs {
                kind: SequenceKind::Arabic { count, .. },
            }) => assert_eq!(count, -1),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
