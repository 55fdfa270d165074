//! Terminal rendering of query outcomes

use crate::config::{DisplayConfig, LookupConfig};
use crate::lookup::{QueryOutcome, RecordView};

const RULE: &str = "────────────────────────────────────────";

/// Page header: logo (or its placeholder), title and subtitle
pub fn render_banner(config: &LookupConfig) -> String {
    let logo = match config.logo_path() {
        Some(path) => format!("🖼  {}", path.display()),
        None => config.display.logo_placeholder.clone(),
    };
    format!(
        "{}\n{}\n{}\n{}",
        logo, config.display.title, config.display.subtitle, RULE
    )
}

/// Render one outcome as text
pub fn render_text(outcome: &QueryOutcome, display: &DisplayConfig) -> String {
    match outcome {
        QueryOutcome::Found(view) => render_found(view, display),
        QueryOutcome::NotFound { query } => {
            format!("⚠️  لم يتم العثور على أي سجل برقم الهوية: {}", query)
        }
        QueryOutcome::LoadFailed { reason, .. } => {
            format!("❌ حدث خطأ أثناء تحميل ملف البيانات: {}", reason)
        }
    }
}

/// Render one outcome as pretty JSON
pub fn render_json(outcome: &QueryOutcome) -> serde_json::Result<String> {
    serde_json::to_string_pretty(outcome)
}

fn render_found(view: &RecordView, display: &DisplayConfig) -> String {
    let mut out = String::from("✅ تم العثور على السجل\n\n");

    let width = view
        .entries
        .iter()
        .map(|e| e.label.chars().count())
        .max()
        .unwrap_or(0);
    for entry in &view.entries {
        let pad = width - entry.label.chars().count();
        out.push_str(&format!(
            "  {}{}  │ {}\n",
            entry.label,
            " ".repeat(pad),
            entry.value
        ));
    }

    if view.is_complete() {
        out.push_str("\n✨ جميع البيانات الأساسية مكتملة لهذا السجل.");
    } else {
        out.push_str(&format!(
            "\n⚠️  تنبيه: بيانات ناقصة!\nيرجى استكمال البيانات التالية: {}\n{}\n{}",
            view.missing_fields.join("، "),
            RULE,
            display.contact_message
        ));
    }
    out
}
