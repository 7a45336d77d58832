//! canonical-pages - Canonical page label resolution for scanned books
//!
//! CLI entry point

use anyhow::Context;
use canonical_pages::{
    canonical_range_string, compute_canonical_pages, detect_page_number_conflicts, exit_codes,
    format_canonical_pages_display, format_canonical_pages_with_metadata,
    generate_arabic_numerals, generate_roman_numerals, page_config_summary,
    parse_arbitrary_sequence, validate_page_range, CanonicalPageRule, CanonicalPagesMap, Cli,
    Commands, Config, JsonRuleStore, OutputFormat, PageMapInput, Resolution, RuleService,
    RuleStore, Settings, StoreError, ValidationError,
};
use canonical_pages::cli::{
    RangeArgs, RulesAction, RulesArgs, SequenceArgs, SequenceKind, SnapshotArgs,
    ValidateRangeArgs,
};
use clap::Parser;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Load config file if specified, otherwise search the default locations
    let file_config = match &cli.config {
        Some(path) => match Config::load_from_path(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Warning: {}", e);
                Config::default()
            }
        },
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: {}", e);
            Config::default()
        }),
    };
    let settings = file_config.merge_with_cli(&cli.overrides());

    init_logging(&settings.log_level);

    let result = match &cli.command {
        Commands::Compute(args) => run_compute(args, &settings),
        Commands::Conflicts(args) => run_conflicts(args, &settings),
        Commands::Regions(args) => run_regions(args, &settings),
        Commands::Range(args) => run_range(args),
        Commands::ValidateRange(args) => run_validate_range(args),
        Commands::Sequence(args) => run_sequence(args, &settings),
        Commands::Rules(args) => run_rules(args, &settings),
    };

    std::process::exit(match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    });
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validation problems are the caller's fault; everything else is general
fn exit_code_for(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ValidationError>().is_some() {
        return exit_codes::INVALID_ARGS;
    }
    match error.downcast_ref::<StoreError>() {
        Some(StoreError::Invalid(_)) => exit_codes::INVALID_ARGS,
        Some(StoreError::Conflict(_)) => exit_codes::UNRESOLVED,
        Some(StoreError::NotFound(_)) => exit_codes::INPUT_NOT_FOUND,
        _ => exit_codes::GENERAL_ERROR,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============ Snapshot Commands ============

fn load_snapshot(path: &Path) -> anyhow::Result<Option<PageMapInput>> {
    if !path.exists() {
        eprintln!("Error: Snapshot not found: {}", path.display());
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let snapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(snapshot))
}

fn run_compute(args: &SnapshotArgs, settings: &Settings) -> anyhow::Result<i32> {
    let Some(input) = load_snapshot(&args.snapshot)? else {
        return Ok(exit_codes::INPUT_NOT_FOUND);
    };

    let resolution = compute_canonical_pages(&input)?;
    let map = match &resolution {
        Resolution::Resolved(map) => map,
        conflict => {
            print_conflict(conflict, settings.format)?;
            return Ok(exit_codes::UNRESOLVED);
        }
    };

    let segments = format_canonical_pages_with_metadata(map, &input.rules, &input.regions);
    let stats = map.statistics();

    match settings.format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "status": "resolved",
            "pages": map.to_label_map(),
            "segments": segments,
            "statistics": stats,
        }))?,
        OutputFormat::Text => {
            println!("{}", format_canonical_pages_display(map));
            println!();
            println!("Pages:");
            for (page, value) in map.iter() {
                match value.source_id() {
                    Some(id) => println!(
                        "  {:>5}  {:<12} {} {}",
                        page,
                        value.display_label(),
                        value.source(),
                        id
                    ),
                    None => println!("  {:>5}  {:<12} {}", page, value.display_label(), value.source()),
                }
            }
            println!();
            println!("Statistics:");
            println!("  Total pages:          {}", stats.total_pages);
            println!("  Unaccounted:          {}", stats.unaccounted_pages);
            println!("  Context-derived:      {}", stats.context_derived_pages);
            println!("  User-defined (pos.):  {}", stats.user_defined_positive_pages);
            println!("  User-defined (neg.):  {}", stats.user_defined_negative_pages);
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn print_conflict(resolution: &Resolution, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        return print_json(resolution);
    }

    match resolution {
        Resolution::RuleConflict(overlaps) => {
            println!("Unresolved: rules overlap");
            for overlap in overlaps {
                println!(
                    "  {} and {} share pages {}",
                    overlap.first_rule_id,
                    overlap.second_rule_id,
                    join_numbers(&overlap.pages)
                );
            }
        }
        Resolution::RegionConflict(conflicts) => {
            println!("Unresolved: page-number regions disagree");
            for conflict in conflicts {
                let names: Vec<&str> = conflict.regions.iter().map(|r| r.name.as_str()).collect();
                println!("  page {}: {}", conflict.page_number, names.join(", "));
            }
        }
        Resolution::Resolved(_) => {}
    }
    Ok(())
}

fn join_numbers(pages: &[u32]) -> String {
    pages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn run_conflicts(args: &SnapshotArgs, settings: &Settings) -> anyhow::Result<i32> {
    let Some(input) = load_snapshot(&args.snapshot)? else {
        return Ok(exit_codes::INPUT_NOT_FOUND);
    };

    let conflicts = detect_page_number_conflicts(
        &input.regions,
        input.document_page_count,
        &input.context_derived_page_numbers,
    )?;

    match settings.format {
        OutputFormat::Json => print_json(&conflicts)?,
        OutputFormat::Text if conflicts.is_empty() => println!("No conflicts"),
        OutputFormat::Text => print_conflict(&Resolution::RegionConflict(conflicts.clone()), settings.format)?,
    }

    Ok(if conflicts.is_empty() {
        exit_codes::SUCCESS
    } else {
        exit_codes::UNRESOLVED
    })
}

fn run_regions(args: &SnapshotArgs, settings: &Settings) -> anyhow::Result<i32> {
    let Some(input) = load_snapshot(&args.snapshot)? else {
        return Ok(exit_codes::INPUT_NOT_FOUND);
    };

    match settings.format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = input
                .regions
                .iter()
                .map(|region| {
                    serde_json::json!({
                        "id": region.id,
                        "name": region.name,
                        "region_type": region.region_type,
                        "summary": page_config_summary(&region.page_config),
                    })
                })
                .collect();
            print_json(&rows)?;
        }
        OutputFormat::Text => {
            for region in &input.regions {
                println!(
                    "{}  {} ({:?}): {}",
                    region.id,
                    region.name,
                    region.region_type,
                    page_config_summary(&region.page_config)
                );
            }
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn run_range(args: &RangeArgs) -> anyhow::Result<i32> {
    let Some(input) = load_snapshot(&args.snapshot)? else {
        return Ok(exit_codes::INPUT_NOT_FOUND);
    };

    let map: CanonicalPagesMap = compute_canonical_pages(&input)?.into_map();
    println!("{}", canonical_range_string(&args.range, &map));
    Ok(exit_codes::SUCCESS)
}

// ============ Pure Helpers ============

fn run_validate_range(args: &ValidateRangeArgs) -> anyhow::Result<i32> {
    match validate_page_range(&args.range, args.max_page) {
        None => {
            println!("valid");
            Ok(exit_codes::SUCCESS)
        }
        Some(message) => {
            println!("invalid: {}", message);
            Ok(exit_codes::INVALID_ARGS)
        }
    }
}

fn run_sequence(args: &SequenceArgs, settings: &Settings) -> anyhow::Result<i32> {
    let labels = match &args.kind {
        SequenceKind::Arabic { start, count } => generate_arabic_numerals(*start, *count)?,
        SequenceKind::Roman { start, count } => generate_roman_numerals(start, *count)?,
        SequenceKind::Arbitrary { input } => parse_arbitrary_sequence(input),
    };

    match settings.format {
        OutputFormat::Json => print_json(&labels)?,
        OutputFormat::Text => {
            for label in &labels {
                println!("{}", label);
            }
        }
    }
    Ok(exit_codes::SUCCESS)
}

// ============ Rules Command ============

fn run_rules(args: &RulesArgs, settings: &Settings) -> anyhow::Result<i32> {
    let store = Arc::new(JsonRuleStore::new(&settings.store_path)?);
    let mut service =
        RuleService::new(store.clone() as Arc<dyn RuleStore>).with_auto_join(settings.auto_join);

    match &args.action {
        RulesAction::List { include_deleted } => {
            let rules = service.list_rules(*include_deleted)?;
            match settings.format {
                OutputFormat::Json => print_json(&rules)?,
                OutputFormat::Text if rules.is_empty() => println!("No rules"),
                OutputFormat::Text => rules.iter().for_each(print_rule),
            }
            return Ok(exit_codes::SUCCESS);
        }
        RulesAction::Add(add) => {
            let Some(draft) = add.to_draft() else {
                eprintln!("Error: one of --arabic, --roman, --arbitrary or --negative is required");
                return Ok(exit_codes::INVALID_ARGS);
            };
            if let Some(count) = add.document_pages {
                service = service.with_document_page_count(count);
            }
            let rule = service.create_rule(draft)?;
            report_rule(&rule, settings.format)?;
        }
        RulesAction::Update(update) => {
            if let Some(count) = update.document_pages {
                service = service.with_document_page_count(count);
            }
            let rule = service.update_rule(update.to_update())?;
            report_rule(&rule, settings.format)?;
        }
        RulesAction::Remove { id } => {
            service.delete_rule(id)?;
            if settings.format == OutputFormat::Text {
                println!("Removed {}", id);
            }
        }
        RulesAction::Join => {
            let plans = service.auto_join_contiguous()?;
            if settings.format == OutputFormat::Text {
                println!("Joined {} rule pair(s)", plans.len());
            }
        }
    }

    store.flush()?;
    Ok(exit_codes::SUCCESS)
}

fn report_rule(rule: &CanonicalPageRule, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(rule),
        OutputFormat::Text => {
            print_rule(rule);
            Ok(())
        }
    }
}

fn print_rule(rule: &CanonicalPageRule) {
    let numbering = match rule.labels() {
        Ok(Some(labels)) => match (labels.first(), labels.last()) {
            (Some(first), Some(last)) if first != last => format!("{}-{}", first, last),
            (Some(first), _) => first.clone(),
            _ => String::new(),
        },
        Ok(None) => "(ignored)".to_string(),
        Err(e) => format!("(invalid: {})", e),
    };
    let deleted = if rule.is_active() { "" } else { " [deleted]" };
    println!(
        "{}  pages {}-{}  {} {}{}{}",
        rule.id,
        rule.document_page_start,
        rule.document_page_end,
        rule.kind.rule_type_name(),
        numbering,
        rule.label
            .as_deref()
            .map(|l| format!("  \"{}\"", l))
            .unwrap_or_default(),
        deleted
    );
}
