use crate::model::RichTextRun;

/// Project rich text runs into inline Markdown.
///
/// Runs are concatenated without a separator. Within a run the markers nest in
/// a fixed order: code innermost, then bold, italic and strikethrough
/// outermost. Color and underline have no textual effect.
pub fn project(runs: &[RichTextRun]) -> String {
    runs.iter().map(project_run).collect()
}

pub fn project_run(run: &RichTextRun) -> String {
    if run.plain_text.is_empty() {
        return String::new();
    }

    let annotations = &run.annotations;
    let mut text = run.plain_text.clone();
    if annotations.code {
        text = wrap(&text, "`");
    }
    if annotations.bold {
        text = wrap(&text, "**");
    }
    if annotations.italic {
        text = wrap(&text, "_");
    }
    if annotations.strikethrough {
        text = wrap(&text, "~~");
    }
    text
}

fn wrap(text: &str, marker: &str) -> String {
    format!("{marker}{text}{marker}")
}
