use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sitearchive::{ArchiveConfig, Pipeline, PipelineReport, RecordIndexer, SiteArchiveError, SiteLayout};
use sitearchive::audit::{ComplianceReport, ComplianceTableRow};
use sitearchive::index::{FolderTableRow, IndexReport, SkippedTableRow};
use sitearchive::prepare::{ActionTableRow, PassReport};
use sitearchive::routing::{RoutingReport, RoutingTableRow};
use sitearchive::scan::{EmptyScanReport, FlaggedPdfTableRow};
use tabled::{Table, Tabled, settings::Style};

#[derive(Parser)]
#[command(name = "sitearchive")]
#[command(about = "Spreadsheet-driven folder routing and compliance auditing for site PDF archives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Site root directory (its folder name is the site name)
    #[arg(short, long, env = "SITEARCHIVE_ROOT")]
    root: Option<PathBuf>,

    /// Spreadsheet holding the monument rows
    #[arg(short, long, env = "SITEARCHIVE_WORKBOOK")]
    workbook: Option<PathBuf>,

    /// YAML file overriding folder renames, expected suffixes and the audit directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format: table, yaml, json
    #[arg(short, long, default_value = "table")]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every step in order
    Run,

    /// Rename raw folder names to their canonical form
    RenameFolders,

    /// Append the parent folder name to each PDF
    RenamePdfs,

    /// Flatten raw trees into the routing roots
    Relocate,

    /// Create one folder per identifier group
    Index,

    /// Show the identifier groups the workbook yields, without touching disk
    Groups,

    /// Copy loose PDFs into the folders named by their identifiers
    Route,

    /// Audit the tree against the workbook and the expected document suffixes
    Verify,

    /// Move the general introduction into its own folder
    FileIntro,

    /// List PDFs with zero bytes or zero pages
    ScanEmpty,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Yaml,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("sitearchive=debug,info")
    } else {
        EnvFilter::new("sitearchive=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(e);
            ExitCode::FAILURE
        }
    }
}

fn print_error(err: Box<dyn std::error::Error>) {
    if let Some(SiteArchiveError::MissingColumn(column)) = err.downcast_ref::<SiteArchiveError>() {
        eprintln!("{} workbook has no '{}' column", "✗ Error:".red(), column);
        eprintln!("  The first row of the first sheet must name every column.");
        return;
    }

    eprintln!("{} {}", "✗ Error:".red(), err);
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let root = cli.root.ok_or_else(|| SiteArchiveError::Config(
        "site root not set (use --root or SITEARCHIVE_ROOT)".to_string(),
    ))?;
    let layout = SiteLayout::new(root)?;
    let config = ArchiveConfig::resolve(cli.config.as_deref())?;

    info!("Site '{}' at {}", layout.site_name(), layout.root().display());

    let mut pipeline = Pipeline::new(layout, config);
    if let Some(workbook) = cli.workbook {
        pipeline = pipeline.with_workbook(workbook);
    }

    let output = cli.output;
    let base = pipeline.layout().root().to_path_buf();

    match cli.command {
        Commands::Run => {
            let report = pipeline.run_all()?;
            print_pipeline(&report, &base, output)?;
        }
        Commands::RenameFolders => print_pass(&pipeline.rename_folders()?, &base, output)?,
        Commands::RenamePdfs => print_pass(&pipeline.rename_pdfs()?, &base, output)?,
        Commands::Relocate => print_pass(&pipeline.relocate()?, &base, output)?,
        Commands::Index => {
            let records = pipeline.load_records()?;
            print_index(&pipeline.index(&records)?, output)?;
        }
        Commands::Groups => {
            let records = pipeline.load_records()?;
            cmd_groups(&records, output)?;
        }
        Commands::Route => {
            let reports = pipeline.route()?;
            if reports.is_empty() {
                println!("○ No routing roots found under {}", base.display());
            }
            for report in &reports {
                print_routing(report, output)?;
            }
        }
        Commands::Verify => {
            let records = pipeline.load_records()?;
            print_compliance(&pipeline.verify(&records)?, output)?;
        }
        Commands::FileIntro => print_pass(&pipeline.file_intro()?, &base, output)?,
        Commands::ScanEmpty => print_empty_scan(&pipeline.scan_empty(), &base, output)?,
    }

    Ok(())
}

fn dump<T: Serialize>(value: &T, output: OutputFormat) -> Result<bool, Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(value)?);
            Ok(true)
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(true)
        }
        OutputFormat::Table => Ok(false),
    }
}

fn print_table<R: Tabled>(rows: Vec<R>) {
    let mut table = Table::new(rows);
    table.with(Style::markdown());
    println!("{}", table);
}

fn cmd_groups(records: &sitearchive::RecordSet, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let plan = RecordIndexer::plan(records);
    if dump(&plan, output)? {
        return Ok(());
    }

    if plan.folders.is_empty() {
        println!("No identifier groups derived from {} rows", records.len());
    } else {
        println!("\nIdentifier Groups\n");
        for planned in &plan.folders {
            println!("  {} {}  ({}, from {})", "✓".green(), planned.folder_name(), planned.intervention.as_str(), planned.base_id);
        }
    }

    if !plan.skipped.is_empty() {
        println!("\nSkipped Rows\n");
        print_table(plan.skipped.iter().map(SkippedTableRow::from).collect());
    }

    println!("\n{} groups, {} rows skipped", plan.folders.len(), plan.skipped.len());
    Ok(())
}

fn print_pass(report: &PassReport, base: &Path, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if dump(report, output)? {
        return Ok(());
    }

    println!("\n{}\n", report.pass);
    if report.actions.is_empty() {
        println!("○ Nothing to do");
    } else {
        print_table(report.actions.iter().map(|a| ActionTableRow::relative_to(a, base)).collect());
    }

    println!("\nSummary:");
    println!("  {} {} applied", "✓".green(), report.applied_count());
    if report.warning_count() > 0 {
        println!("  {} {} skipped", "⚠".yellow(), report.warning_count());
    }
    for root in &report.missing_roots {
        println!("  {} {} not found", "○".dimmed(), root.display());
    }
    Ok(())
}

fn print_index(report: &IndexReport, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if dump(report, output)? {
        return Ok(());
    }

    println!("\nIdentifier Folders\n");
    if report.folders.is_empty() {
        println!("○ No folders derived");
    } else {
        print_table(report.folders.iter().map(FolderTableRow::from).collect());
    }

    if !report.skipped.is_empty() {
        println!("\nSkipped Rows\n");
        print_table(report.skipped.iter().map(SkippedTableRow::from).collect());
    }

    println!("\nSummary:");
    println!("  {} {} created", "✓".green(), report.created_count());
    println!("  {} {} already present", "○".dimmed(), report.existing_count());
    if !report.warnings().is_empty() {
        println!("  {} {} rows with unknown intervention type", "⚠".yellow(), report.warnings().len());
    }
    Ok(())
}

fn print_routing(report: &RoutingReport, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if dump(report, output)? {
        return Ok(());
    }

    println!("\nRouting {}\n", report.root.display());
    if report.files.is_empty() {
        println!("○ No loose PDFs");
    } else {
        print_table(report.files.iter().map(RoutingTableRow::from).collect());
    }

    println!("\nSummary:");
    println!("  {} identifiers mapped to folders", report.mapped_identifiers);
    println!("  {} {} copies", "✓".green(), report.copied_count());
    println!("  {} {} originals removed", "✓".green(), report.removed_count());
    if !report.unrouted().is_empty() {
        println!("  {} {} files without identifiers", "⚠".yellow(), report.unrouted().len());
    }
    if report.warning_count() > 0 {
        println!("  {} {} warnings", "⚠".yellow(), report.warning_count());
    }
    Ok(())
}

fn print_compliance(report: &ComplianceReport, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if dump(report, output)? {
        return Ok(());
    }

    println!("\nCompliance Report\n");
    let issues = report.issues();
    if issues.is_empty() {
        println!("{} Archive matches the workbook and expected documents", "✓".green());
        return Ok(());
    }

    print_table(issues.iter().map(ComplianceTableRow::from).collect());

    println!("\nSummary:");
    println!("  {} {} issues", "⚠".yellow(), issues.len());
    println!("  {} {} incomplete folders", "⚠".yellow(), report.grouped.incomplete_folders().len());
    println!("  {} {} empty registry folders", "⚠".yellow(), report.registry.empty_folders().len());
    Ok(())
}

fn print_empty_scan(report: &EmptyScanReport, base: &Path, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if dump(report, output)? {
        return Ok(());
    }

    println!("\nEmpty PDF Scan\n");
    if report.flagged.is_empty() {
        println!("{} {} PDFs checked, none empty", "✓".green(), report.scanned);
        return Ok(());
    }

    print_table(report.flagged.iter().map(|f| FlaggedPdfTableRow::relative_to(f, base)).collect());

    println!("\nSummary:");
    println!("  {} PDFs checked", report.scanned);
    println!("  {} {} empty", "✗".red(), report.empty().len());
    if !report.unreadable().is_empty() {
        println!("  {} {} unreadable", "⚠".yellow(), report.unreadable().len());
    }
    Ok(())
}

fn print_pipeline(report: &PipelineReport, base: &Path, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    if dump(report, output)? {
        return Ok(());
    }

    for pass in [&report.folder_renames, &report.pdf_renames, &report.relocation].into_iter().flatten() {
        print_pass(pass, base, output)?;
    }
    if let Some(index) = &report.index {
        print_index(index, output)?;
    }
    for routing in &report.routing {
        print_routing(routing, output)?;
    }
    if let Some(compliance) = &report.compliance {
        print_compliance(compliance, output)?;
    }
    if let Some(intro) = &report.introduction {
        print_pass(intro, base, output)?;
    }
    if let Some(scan) = &report.empty_scan {
        print_empty_scan(scan, base, output)?;
    }

    println!();
    let warnings = report.warning_count();
    let elapsed = report.duration_secs().unwrap_or(0);
    if warnings > 0 {
        println!("{} '{}' finished {} steps with {} warnings in {}s", "⚠".yellow(), report.site_name, report.steps.len(), warnings, elapsed);
    } else {
        println!("{} '{}' finished {} steps in {}s", "✓".green(), report.site_name, report.steps.len(), elapsed);
    }
    Ok(())
}
