//! CLI output formatting

use crate::core::{
    ExecutionContext, FailurePolicy, Mode, ModeSettings, Pipeline, RunOutcome, RunStatus,
};
use crate::execution::{ExecutionEvent, Severity};
use console::Emoji;
use serde_json::json;
use std::io::{self, Write};

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "* ");

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            mode,
            total_steps,
        } => format!(
            "{} Starting {} environment ({} steps, {})",
            ROCKET,
            style(mode).bold(),
            total_steps,
            style(&execution_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::StepStarted {
            title,
            index,
            total,
            ..
        } => format!(
            "{} {} {}",
            SPINNER,
            style(format!("[{}/{}]", index, total)).dim(),
            style(title).cyan()
        ),
        ExecutionEvent::StepCompleted { step, detail } => match detail {
            Some(detail) => format!("{} {} {}", CHECK, style(step).green(), style(detail).dim()),
            None => format!("{} {}", CHECK, style(step).green()),
        },
        ExecutionEvent::StepFailed {
            step,
            policy,
            error,
            hint,
        } => {
            let mut line = match policy {
                FailurePolicy::Warn => format!(
                    "{} {}: {} {}",
                    WARN,
                    style(step).yellow(),
                    error,
                    style("(continuing)").dim()
                ),
                FailurePolicy::Fatal => {
                    format!("{} {}: {}", CROSS, style(step).red(), style(error).red())
                }
            };
            if let Some(hint) = hint {
                line.push_str(&format!("\n   {}", style(hint).dim()));
            }
            line
        }
        ExecutionEvent::PipelineInterrupted { step } => format!(
            "{} Interrupted during {}",
            WARN,
            style(step).yellow()
        ),
        ExecutionEvent::PipelineCompleted { status, .. } => match status {
            RunStatus::Completed => format!("{} All steps {}", INFO, style("finished").green()),
            RunStatus::AbortedAtStep(step) => {
                format!("{} Aborted at {}", CROSS, style(step).red().bold())
            }
            RunStatus::Interrupted(step) => {
                format!("{} Stopped at {}", INFO, style(step).yellow())
            }
        },
    }
}

/// Write an event line: warnings and errors to `err`, everything else to `out`
pub fn write_execution_event(
    event: &ExecutionEvent,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<()> {
    let line = format_execution_event(event);
    match event.severity() {
        Severity::Info => writeln!(out, "{}", line),
        Severity::Warn | Severity::Error => writeln!(err, "{}", line),
    }
}

/// Banner shown once the stack is coming up
pub fn format_banner(mode: Mode, settings: &ModeSettings, runtime: &str) -> String {
    let mut lines = vec![
        String::new(),
        format!(
            "{}{} environment started!",
            PARTY,
            style(match mode {
                Mode::Development => "Development",
                Mode::Production => "Production",
            })
            .bold()
        ),
        format!("   Application: {}", style(&settings.app_url).cyan()),
    ];

    if let Some(url) = &settings.database_url {
        lines.push(format!("   Database:    {}", style(url).cyan()));
    }
    if let Some(container) = &settings.container_name {
        lines.push(format!(
            "   Logs:        {}",
            style(format!("{} logs -f {}", runtime, container)).dim()
        ));
    }

    let down = format!("{} compose -f {} down", runtime, settings.compose_file);
    match mode {
        Mode::Development => lines.push(format!(
            "   Stop:        press Ctrl+C or run {}",
            style(down).dim()
        )),
        Mode::Production => lines.push(format!("   Stop:        {}", style(down).dim())),
    }
    lines.push(String::new());
    lines.join("\n")
}

/// One-line summary of a finished run
pub fn format_outcome(outcome: &RunOutcome) -> String {
    let warnings = outcome.warnings().count();
    let suffix = if warnings > 0 {
        format!(" ({} warning(s))", warnings)
    } else {
        String::new()
    };

    match &outcome.status {
        RunStatus::Completed => format!(
            "{} {} run completed {}{}",
            CHECK,
            style(outcome.mode).bold(),
            style("successfully").green(),
            suffix
        ),
        RunStatus::AbortedAtStep(step) => format!(
            "{} {} run {} at {}{}",
            CROSS,
            style(outcome.mode).bold(),
            style("failed").red(),
            style(step).bold(),
            suffix
        ),
        RunStatus::Interrupted(step) => format!(
            "{} {} run interrupted during {}",
            WARN,
            style(outcome.mode).bold(),
            style(step).yellow()
        ),
    }
}

/// Human-readable plan: steps, policies, and the resolved parameters
pub fn format_plan(pipeline: &Pipeline, ctx: &ExecutionContext) -> String {
    let mut lines = vec![format!(
        "{} {} plan (working dir {})",
        INFO,
        style(pipeline.mode).bold(),
        style(ctx.working_dir.display()).dim()
    )];

    for (index, step) in pipeline.steps().iter().enumerate() {
        lines.push(format!(
            "  {}. {} [{}] {}",
            index + 1,
            style(&step.name).cyan(),
            step.policy,
            style(step.action.describe(ctx)).dim()
        ));
    }

    lines.push(format!("  env_file = {}", ctx.env_file.display()));
    for (key, value) in ctx.params() {
        lines.push(format!("  {} = {}", key, value));
    }
    lines.join("\n")
}

/// Machine-readable plan
pub fn plan_json(pipeline: &Pipeline, ctx: &ExecutionContext) -> serde_json::Value {
    let steps: Vec<_> = pipeline
        .steps()
        .iter()
        .map(|step| {
            json!({
                "name": step.name,
                "title": step.title,
                "policy": step.policy,
                "action": step.action.describe(ctx),
            })
        })
        .collect();

    let params: serde_json::Map<String, serde_json::Value> = ctx
        .params()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect();

    json!({
        "mode": pipeline.mode,
        "env_file": ctx.env_file,
        "working_dir": ctx.working_dir,
        "steps": steps,
        "params": params,
    })
}
