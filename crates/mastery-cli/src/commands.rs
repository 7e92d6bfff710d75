//! Subcommand handlers.
//!
//! Each handler returns a [`CommandOutput`] rather than printing, so the
//! rendering can be tested without capturing stdout.

use crate::cli::{ExportArgs, GraphArgs, ImportArgs, LearnerArgs, PathArgs, ValidateArgs};
use crate::config::MasteryConfig;
use crate::files;
use mastery_content::{
    BatchImportReport, ExportFormat, ImportOptions, ImportResult, ParsedLessonData,
    export_lesson, import_batch, import_lesson, validate_lesson,
};
use mastery_core::{Error, Result};
use mastery_graph::{
    Curriculum, GraphBuilder, LearningPathSegment, PrerequisiteResolver, ProgressRecord,
};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Rendered command output plus whether the command considers itself
/// successful (drives the process exit code).
#[derive(Clone, Debug, PartialEq)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// ============================================================================
// Lesson commands
// ============================================================================

/// A file that could not be read during batch import.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnreadableFile {
    pub path: String,
    pub error: String,
}

/// Batch report plus files that never reached the importer.
///
/// The report's `total_files` and `failed` counters include unreadable
/// files.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    #[serde(flatten)]
    pub report: BatchImportReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<UnreadableFile>,
}

impl ImportSummary {
    /// Whether every discovered file was read and imported.
    pub fn is_success(&self) -> bool {
        self.report.failed == 0
    }
}

/// Read and import every markdown file under the given paths.
pub async fn import_files(args: &ImportArgs, options: &ImportOptions) -> Result<ImportSummary> {
    let paths = files::discover_markdown(&args.paths)?;
    let mut documents = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();

    for path in &paths {
        match files::read_to_string(path).await {
            Ok(text) => documents.push((path.display().to_string(), text)),
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                unreadable.push(UnreadableFile {
                    path: path.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    let mut report = import_batch(documents, options);
    report.total_files += unreadable.len();
    report.failed += unreadable.len();
    Ok(ImportSummary { report, unreadable })
}

/// `import`: batch import with a per-file report.
pub async fn cmd_import(args: &ImportArgs, config: &MasteryConfig) -> Result<CommandOutput> {
    let summary = import_files(args, &config.import).await?;
    let text = if args.json {
        to_json(&summary)?
    } else {
        render_import_summary(&summary)
    };
    Ok(CommandOutput {
        text,
        success: summary.is_success(),
    })
}

/// `validate`: import one lesson and run the structural validator.
pub async fn cmd_validate(args: &ValidateArgs, config: &MasteryConfig) -> Result<CommandOutput> {
    let raw = files::read_to_string(&args.file).await?;
    let result = import_lesson(&raw, &config.import);

    let findings = result.data().map(validate_lesson);
    let success = result.is_success() && findings.as_ref().is_none_or(|d| d.is_ok());

    let text = if args.json {
        #[derive(Serialize)]
        struct ValidateReport<'a> {
            import: &'a ImportResult,
            #[serde(skip_serializing_if = "Option::is_none")]
            validation: Option<&'a mastery_content::Diagnostics>,
        }
        to_json(&ValidateReport {
            import: &result,
            validation: findings.as_ref(),
        })?
    } else {
        let mut out = String::new();
        render_result(&mut out, &args.file.display().to_string(), &result);
        if let Some(diags) = &findings {
            for error in &diags.errors {
                let _ = writeln!(out, "  invalid: {error}");
            }
            for warning in &diags.warnings {
                let _ = writeln!(out, "  note: {warning}");
            }
            if diags.is_clean() {
                let _ = writeln!(out, "  structure: ok");
            }
        }
        out
    };

    Ok(CommandOutput { text, success })
}

/// Load a lesson from JSON lesson data or by importing markdown.
pub async fn load_lesson(path: &Path, options: &ImportOptions) -> Result<ParsedLessonData> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        return files::load_json(path).await;
    }

    let raw = files::read_to_string(path).await?;
    let result = import_lesson(&raw, options);
    if let Some(first) = result.errors().first() {
        return Err(Error::parse(format!(
            "{} did not import: {first}",
            path.display()
        )));
    }
    result
        .into_data()
        .ok_or_else(|| Error::parse(format!("{} produced no lesson", path.display())))
}

/// `export`: render a lesson as markdown or JSON.
pub async fn cmd_export(args: &ExportArgs, config: &MasteryConfig) -> Result<CommandOutput> {
    let lesson = load_lesson(&args.input, &config.import).await?;

    let mut options = config.export.clone();
    if let Some(format) = args.format {
        options.format = format;
    }
    options.include_metadata &= !args.no_metadata;
    options.include_exercises &= !args.no_exercises;
    options.include_assessments &= !args.no_assessments;

    let rendered = export_lesson(&lesson, &options)?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, rendered.as_bytes())
                .await
                .map_err(|e| Error::io_with_path(e, path))?;
            let kind = match options.format {
                ExportFormat::Markdown => "markdown",
                ExportFormat::Json => "JSON",
            };
            Ok(CommandOutput::ok(format!(
                "Wrote {kind} for \"{}\" to {}\n",
                lesson.metadata.title,
                path.display()
            )))
        }
        None => Ok(CommandOutput::ok(rendered)),
    }
}

// ============================================================================
// Learner commands
// ============================================================================

/// Load the curriculum snapshot and, when given, the learner's progress.
pub async fn load_learner(args: &LearnerArgs) -> Result<(Curriculum, Vec<ProgressRecord>)> {
    let curriculum: Curriculum = files::load_json(&args.curriculum).await?;
    let progress: Vec<ProgressRecord> = match &args.progress {
        Some(path) => files::load_json(path).await?,
        None => Vec::new(),
    };
    log::debug!(
        "Loaded {} units, {} lessons, {} progress records",
        curriculum.units.len(),
        curriculum.lessons.len(),
        progress.len()
    );
    Ok((curriculum, progress))
}

/// `path`: the ordered learning path for one unit or all units.
pub async fn cmd_path(args: &PathArgs, config: &MasteryConfig) -> Result<CommandOutput> {
    let (curriculum, progress) = load_learner(&args.learner).await?;
    let resolver =
        PrerequisiteResolver::with_options(&curriculum, &progress, config.resolver.clone());
    let path = resolver.generate_learning_path(args.unit.as_deref())?;

    let text = if args.learner.json {
        to_json(&path)?
    } else {
        render_segments(&path)
    };
    Ok(CommandOutput::ok(text))
}

/// `next`: content the learner can work on now.
pub async fn cmd_next(args: &LearnerArgs, config: &MasteryConfig) -> Result<CommandOutput> {
    let (curriculum, progress) = load_learner(args).await?;
    let resolver =
        PrerequisiteResolver::with_options(&curriculum, &progress, config.resolver.clone());
    let next = resolver.next_available_content();

    let text = if args.json {
        to_json(&next)?
    } else if next.is_empty() {
        "Nothing available.\n".to_string()
    } else {
        render_segments(&next)
    };
    Ok(CommandOutput::ok(text))
}

/// `recommend`: remediation, enrichment, and next content.
pub async fn cmd_recommend(args: &LearnerArgs, config: &MasteryConfig) -> Result<CommandOutput> {
    let (curriculum, progress) = load_learner(args).await?;
    let resolver =
        PrerequisiteResolver::with_options(&curriculum, &progress, config.resolver.clone());
    let recs = resolver.recommended_content();

    if args.json {
        return Ok(CommandOutput::ok(to_json(&recs)?));
    }

    let mut out = String::new();
    for (heading, items) in [
        ("Remediation", &recs.remediation),
        ("Enrichment", &recs.enrichment),
        ("Next", &recs.next),
    ] {
        let _ = writeln!(out, "{heading}:");
        if items.is_empty() {
            let _ = writeln!(out, "  (none)");
        } else {
            out.push_str(&render_segments(items));
        }
    }
    Ok(CommandOutput::ok(out))
}

/// `progress`: curriculum-wide progress summary.
pub async fn cmd_progress(args: &LearnerArgs, config: &MasteryConfig) -> Result<CommandOutput> {
    let (curriculum, progress) = load_learner(args).await?;
    let resolver =
        PrerequisiteResolver::with_options(&curriculum, &progress, config.resolver.clone());
    let summary = resolver.analyze_progress();

    if args.json {
        return Ok(CommandOutput::ok(to_json(&summary)?));
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Units mastered:      {}/{}",
        summary.mastered_units, summary.total_units
    );
    let _ = writeln!(
        out,
        "Lessons completed:   {}/{} ({:.0}%)",
        summary.completed_lessons, summary.total_lessons, summary.lesson_completion_percent
    );
    let _ = writeln!(
        out,
        "Objectives mastered: {}/{} ({:.0}%)",
        summary.mastered_objectives, summary.total_objectives, summary.objective_mastery_percent
    );
    let _ = writeln!(
        out,
        "Exercises completed: {}/{}",
        summary.completed_exercises, summary.total_exercises
    );
    let _ = writeln!(
        out,
        "Assessments passed:  {}/{}",
        summary.completed_assessments, summary.total_assessments
    );
    if let Some(score) = summary.average_score {
        let _ = writeln!(out, "Average score:       {:.0}%", score * 100.0);
    }
    if let Some(at) = summary.last_activity {
        let _ = writeln!(out, "Last activity:       {}", at.to_rfc3339());
    }
    for unit in &summary.units {
        let _ = writeln!(
            out,
            "  {:<12} {:<24} {}/{} lessons ({:.0}%)",
            unit.status.as_str(),
            unit.title,
            unit.completed_lessons,
            unit.total_lessons,
            unit.percent_complete
        );
    }
    Ok(CommandOutput::ok(out))
}

// ============================================================================
// Graph command
// ============================================================================

/// `graph`: the dependency graph, dangling references, and cycle status.
pub async fn cmd_graph(args: &GraphArgs, config: &MasteryConfig) -> Result<CommandOutput> {
    let curriculum: Curriculum = files::load_json(&args.curriculum).await?;
    let (graph, stats) = GraphBuilder::new()
        .with_sequential_lessons(config.resolver.sequential_lessons)
        .build(&curriculum);
    let has_cycles = graph.has_cycles();
    // Dangling references are reported but do not fail the command.
    let success = !has_cycles;

    if args.json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct GraphReport<'a> {
            stats: &'a mastery_graph::BuildStats,
            has_cycles: bool,
            nodes: Vec<&'a mastery_graph::ContentNode>,
            dangling: &'a [mastery_graph::DanglingDependency],
        }
        let text = to_json(&GraphReport {
            stats: &stats,
            has_cycles,
            nodes: graph.iter_nodes().collect(),
            dangling: graph.dangling(),
        })?;
        return Ok(CommandOutput { text, success });
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    for node in graph.iter_nodes() {
        let _ = writeln!(
            out,
            "{:<10} {} ({})",
            node.content_type.as_str(),
            node.id,
            node.title
        );
        for dep in &node.dependencies {
            let _ = writeln!(out, "    {} <- {}", dep.kind.name(), dep.id);
        }
    }
    if !graph.dangling().is_empty() {
        let _ = writeln!(out, "Dangling references:");
        for d in graph.dangling() {
            let _ = writeln!(out, "  {} -> {} ({})", d.from, d.missing, d.kind.name());
        }
    }
    if !stats.duplicate_ids.is_empty() {
        let _ = writeln!(out, "Duplicate ids: {}", stats.duplicate_ids.join(", "));
    }
    if has_cycles {
        let _ = writeln!(out, "Prerequisite cycle detected");
    }
    Ok(CommandOutput { text: out, success })
}

// ============================================================================
// Rendering
// ============================================================================

fn render_result(out: &mut String, name: &str, result: &ImportResult) {
    let title = result
        .data()
        .map(|lesson| lesson.metadata.title.as_str())
        .unwrap_or("-");
    let status = if result.is_success() { "ok" } else { "FAILED" };
    let _ = writeln!(out, "{status:<6} {name} ({title})");
    for error in result.errors() {
        let _ = writeln!(out, "  error: {error}");
    }
    for warning in result.warnings() {
        let _ = writeln!(out, "  warning: {warning}");
    }
}

/// Text report for a batch import.
pub fn render_import_summary(summary: &ImportSummary) -> String {
    let mut out = String::new();
    for entry in &summary.report.entries {
        render_result(&mut out, &entry.name, &entry.result);
    }
    for file in &summary.unreadable {
        let _ = writeln!(out, "{:<6} {}", "FAILED", file.path);
        let _ = writeln!(out, "  error: {}", file.error);
    }
    let _ = writeln!(
        out,
        "{} files: {} imported, {} failed",
        summary.report.total_files,
        summary.report.successful,
        summary.report.failed
    );
    out
}

/// One line per segment: lock state, type, id, title, status.
pub fn render_segments(segments: &[LearningPathSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        let lock = if seg.is_unlocked { "open" } else { "locked" };
        let optional = if seg.is_required { "" } else { " [optional]" };
        let _ = write!(
            out,
            "  {lock:<6} {:<10} {:<16} {}{optional} - {}",
            seg.content_type.as_str(),
            seg.content_id,
            seg.title,
            seg.progress.as_str()
        );
        if let Some(minutes) = seg.estimated_minutes {
            let _ = write!(out, " ({minutes} min)");
        }
        out.push('\n');
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
