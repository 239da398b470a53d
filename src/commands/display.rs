//! Display and formatting utilities for cleanup output.

use crate::cleanup::{CleanupPlan, CleanupResult, KeepReason};

/// Render the cleanup plan in a readable format.
pub fn render_plan(plan: &CleanupPlan) -> String {
    let mut lines = vec![format!("Default branch: {}", plan.default_branch)];

    if plan.needs_switch() {
        lines.push(format!(
            "Current branch: {} (will switch to {})",
            plan.current_branch, plan.default_branch
        ));
    } else {
        lines.push(format!("Current branch: {}", plan.current_branch));
    }

    let to_delete: Vec<&str> = plan.to_delete().collect();
    if to_delete.is_empty() {
        lines.push("No branches to delete.".to_string());
    } else {
        lines.push(format!("Branches to delete ({}):", to_delete.len()));
        lines.extend(bullets(&to_delete));
    }

    let to_keep: Vec<(&str, KeepReason)> = plan.to_keep().collect();
    if !to_keep.is_empty() {
        lines.push(format!("Branches kept ({}):", to_keep.len()));
        lines.extend(
            to_keep
                .iter()
                .map(|(branch, reason)| format!("  - {} ({})", branch, describe_reason(*reason))),
        );
    }

    finish(lines)
}

/// Render the outcome of a cleanup run.
pub fn render_result(result: &CleanupResult) -> String {
    let mut lines = vec![format!("Default branch: {}", result.default_branch)];

    if !result.deleted_branches.is_empty() {
        lines.push(format!("Deleted ({}):", result.deleted_branches.len()));
        lines.extend(bullets(&result.deleted_branches));
    } else if !result.was_dry_run {
        lines.push("No branches deleted.".to_string());
    }

    if !result.skipped_branches.is_empty() {
        lines.push(format!("Skipped ({}):", result.skipped_branches.len()));
        lines.extend(bullets(&result.skipped_branches));
    }

    if result.has_errors() {
        lines.push(format!("Errors ({}):", result.errors.len()));
        lines.extend(bullets(&result.errors));
    }

    if result.was_dry_run {
        lines.push("Dry run: nothing was changed.".to_string());
    }

    finish(lines)
}

fn bullets<T: std::fmt::Display>(items: &[T]) -> impl Iterator<Item = String> + '_ {
    items.iter().map(|item| format!("  - {}", item))
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn describe_reason(reason: KeepReason) -> &'static str {
    match reason {
        KeepReason::DefaultBranch => "default branch",
        KeepReason::Excluded => "excluded",
    }
}
