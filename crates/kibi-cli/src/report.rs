//! Plain text rendering of the wizard state

use std::fmt::Write;
use std::sync::Arc;

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use kibi_core::FieldSpec;
use kibi_services::{DerivedState, Draft, IndexPatternWizard};

pub fn render(wizard: &IndexPatternWizard) -> String {
    render_parts(wizard.draft(), wizard.derived(), &wizard.creation_blockers())
}

pub(crate) fn render_parts(draft: &Draft, derived: &DerivedState, blockers: &[String]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Index pattern: {}", draft.name);
    match (draft.is_time_based, draft.time_field_name()) {
        (true, Some(field)) => {
            let _ = writeln!(out, "Time field:    {}", field);
        }
        (true, None) => {
            let _ = writeln!(out, "Time field:    (none)");
        }
        (false, _) => {
            let _ = writeln!(out, "Time field:    not time-based");
        }
    }
    if let Some(interval) = draft.name_interval {
        let _ = writeln!(out, "Interval:      {}", interval.display());
    }

    if let Some(existing) = &derived.existing {
        let _ = writeln!(
            out,
            "\nExisting indices: {} ({} match the pattern)",
            existing.all.len(),
            existing.match_percent_label()
        );
        for name in &existing.failures {
            let _ = writeln!(out, "  not matching: {}", name);
        }
    }

    if let Some(samples) = &derived.samples {
        let _ = writeln!(out, "\nSample index names:");
        for name in samples {
            let _ = writeln!(out, "  {}", name);
        }
    }

    if !derived.pattern_errors.is_empty() {
        let _ = writeln!(out, "\nPattern errors:");
        for error in &derived.pattern_errors {
            let _ = writeln!(out, "  - {}", error);
        }
    }

    match (&derived.fields, &derived.fetch_fields_error) {
        (_, Some(error)) => {
            let _ = writeln!(out, "\nFields: {}", error);
        }
        (Some(fields), None) => {
            let _ = writeln!(out, "\nFields:\n{}", field_table(fields, draft.time_field_name()));
        }
        (None, None) => {}
    }

    if blockers.is_empty() {
        let _ = writeln!(out, "\nReady to create.");
    } else {
        let _ = writeln!(out, "\nNot ready to create:");
        for blocker in blockers {
            let _ = writeln!(out, "  - {}", blocker);
        }
    }

    out
}

fn field_table(fields: &[Arc<FieldSpec>], time_field: Option<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Field", "Type", ""]);
    for field in fields {
        let marker = if time_field == Some(field.name.as_str()) {
            "time field"
        } else {
            ""
        };
        table.add_row(vec![field.name.as_str(), field.field_type.as_str(), marker]);
    }
    table
}
