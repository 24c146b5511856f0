use crate::types::{ExportMeta, LlmPackageJson};

fn format_export_line(name: &str, info: &ExportMeta) -> String {
    let mut line = format!("- {}", name);
    if info.hook {
        line.push_str(" (Hook)");
    }
    if !info.description.is_empty() {
        line.push_str(": ");
        line.push_str(&info.description);
    }
    if let Some(params) = info.params.as_deref().filter(|p| !p.is_empty()) {
        line.push_str(" — params: ");
        line.push_str(params);
    }
    if let Some(returns) = info.returns.as_deref().filter(|r| !r.is_empty()) {
        line.push_str(" — returns: ");
        line.push_str(returns);
    }
    if info.side_effect == Some(true) {
        line.push_str(" — side effect");
    }
    if let Some(example) = info.example.as_deref().filter(|e| !e.is_empty()) {
        line.push_str(" — e.g. ");
        line.push_str(example);
    }
    line
}

fn push_bullets(lines: &mut Vec<String>, title: &str, items: Option<&[String]>) {
    if let Some(items) = items.filter(|items| !items.is_empty()) {
        lines.push(format!("{}:", title));
        lines.extend(items.iter().map(|item| format!("- {}", item)));
        lines.push(String::new());
    }
}

fn push_joined(lines: &mut Vec<String>, title: &str, items: Option<&[String]>) {
    if let Some(items) = items.filter(|items| !items.is_empty()) {
        lines.push(format!("{}:", title));
        lines.push(items.join(", "));
        lines.push(String::new());
    }
}

fn push_paragraph(lines: &mut Vec<String>, title: &str, text: Option<&str>) {
    if let Some(text) = text.filter(|text| !text.is_empty()) {
        lines.push(format!("{}:", title));
        lines.push(text.to_string());
        lines.push(String::new());
    }
}

/// Renders `llm.package.txt`.
///
/// Sections appear in a fixed order and empty ones are skipped. Exports are
/// listed by name in lexicographic order.
pub fn build_txt_metadata(meta: &LlmPackageJson) -> String {
    let mut lines = vec![
        format!("Package: {}", meta.name),
        format!("Version: {}", meta.version),
        String::new(),
        "Description:".to_string(),
        if meta.description.is_empty() {
            "(none)".to_string()
        } else {
            meta.description.clone()
        },
        String::new(),
    ];

    push_paragraph(&mut lines, "Summary", meta.summary.as_deref());
    push_paragraph(&mut lines, "When to use", meta.when_to_use.as_deref());
    push_bullets(&mut lines, "Reason to use", meta.reason_to_use.as_deref());
    push_bullets(&mut lines, "Use cases", meta.use_cases.as_deref());
    push_bullets(&mut lines, "Side effects", meta.side_effects.as_deref());
    push_joined(&mut lines, "Keywords", meta.keywords.as_deref());
    push_paragraph(&mut lines, "Documentation", meta.documentation.as_deref());
    push_joined(&mut lines, "Related packages", meta.related_packages.as_deref());

    lines.push("Exports:".to_string());
    let mut names: Vec<&String> = meta.exports.keys().collect();
    names.sort();
    for name in names {
        lines.push(format_export_line(name, &meta.exports[name]));
    }

    if !meta.hooks.is_empty() {
        lines.push(String::new());
        lines.push("Hooks:".to_string());
        lines.extend(meta.hooks.iter().map(|hook| format!("- {}", hook)));
    }

    if !meta.frameworks.is_empty() {
        lines.push(String::new());
        lines.push("Frameworks:".to_string());
        lines.push(meta.frameworks.join(", "));
    }

    let mut text = lines.join("\n").trim_end().to_string();
    text.push('\n');
    text
}
