//! Static mode: scan the entry file for exported declarations, no API calls.
//!
//! This is a line-oriented scanner, not a parser. It recognises the export
//! forms that dominate real package entry files and attaches the JSDoc block
//! that immediately precedes each declaration.

use std::collections::HashMap;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::Result;
use crate::types::{ExportKind, ExportMeta, ExportsMap};

/// Naming prefix that marks a hook
pub const HOOK_PREFIX: &str = "use";

/// Declaration keyword plus the separator before the name; a generator star may touch either side
const DECL_KINDS: &str = r"(?P<what>(?:async\s+)?function(?:\s*\*\s*|\s+)|(?:(?:abstract\s+)?class|interface|type|(?:const\s+)?enum|const|let|var)\s+)";
const IDENT: &str = r"(?P<name>[A-Za-z_$][\w$]*)";

static EXPORTED_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*export\s+(?P<default>default\s+)?(?:declare\s+)?{}{}",
        DECL_KINDS, IDENT
    ))
    .expect("exported declaration regex")
});

static LOCAL_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?m)^[ \t]*(?:declare\s+)?{}{}", DECL_KINDS, IDENT))
        .expect("local declaration regex")
});

static ANONYMOUS_DEFAULT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*export\s+default\s+(?:(?P<function>(?:async\s+)?function\s*\*?\s*\()|(?:abstract\s+)?class\s*(?:\{|extends\b))",
    )
    .expect("anonymous default regex")
});

static EXPORT_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?m)^[ \t]*export\s+(?P<typeonly>type\s+)?\{(?P<list>[^}]*)\}(?P<from>\s*from\s*['"][^'"]+['"])?"#)
        .expect("export list regex")
});

static FUNCTION_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?::[^=]+)?=\s*(?:async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=]+)?=>|[A-Za-z_$][\w$]*\s*=>)")
        .expect("function value regex")
});

static JSDOC: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*\*(.*?)\*/").expect("jsdoc regex"));

/// True when `name` starts with the hook prefix and is longer than it
pub fn is_hook_name(name: &str) -> bool {
    name.len() > HOOK_PREFIX.len() && name.starts_with(HOOK_PREFIX)
}

/// Reads the entry file and extracts its exports
pub fn extract_static_exports(entry_path: &Path) -> Result<ExportsMap> {
    let source = std::fs::read_to_string(entry_path)?;
    let exports = extract_exports_from_source(&source);
    debug!("Found {} exports in {}", exports.len(), entry_path.display());
    Ok(exports)
}

/// Hook names from an exports map, sorted
pub fn hooks_from_exports(exports: &ExportsMap) -> Vec<String> {
    let mut hooks: Vec<String> = exports
        .iter()
        .filter(|(_, meta)| meta.hook)
        .map(|(name, _)| name.clone())
        .collect();
    hooks.sort();
    hooks
}

/// Extracts exports from entry source text. The first declaration of a name wins.
pub fn extract_exports_from_source(source: &str) -> ExportsMap {
    let docs: Vec<(usize, String)> = JSDOC
        .captures_iter(source)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((whole.end(), clean_jsdoc(caps.get(1)?.as_str())))
        })
        .collect();
    let doc_before = |start: usize| -> String {
        docs.iter()
            .rev()
            .find(|(end, _)| *end <= start)
            .filter(|(end, _)| source[*end..start].trim().is_empty())
            .map(|(_, text)| text.clone())
            .unwrap_or_default()
    };

    let mut found: Vec<(usize, String, ExportKind, String)> = Vec::new();

    for caps in EXPORTED_DECL.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        let kind = declaration_kind(&caps, &source[whole.end()..]);
        let name = if caps.name("default").is_some() {
            "default".to_string()
        } else {
            caps["name"].to_string()
        };
        found.push((whole.start(), name, kind, doc_before(whole.start())));
    }

    for caps in ANONYMOUS_DEFAULT.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        let kind = if caps.name("function").is_some() {
            ExportKind::Function
        } else {
            ExportKind::Class
        };
        found.push((whole.start(), "default".to_string(), kind, doc_before(whole.start())));
    }

    let mut locals: HashMap<String, (ExportKind, String)> = HashMap::new();
    for caps in LOCAL_DECL.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        let kind = declaration_kind(&caps, &source[whole.end()..]);
        locals
            .entry(caps["name"].to_string())
            .or_insert_with(|| (kind, doc_before(whole.start())));
    }

    for caps in EXPORT_LIST.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        let type_only = caps.name("typeonly").is_some();
        let reexport = caps.name("from").is_some();

        for item in caps["list"].split(',') {
            let item = item.trim();
            let (item_type_only, item) = match item.strip_prefix("type ") {
                Some(rest) => (true, rest.trim()),
                None => (false, item),
            };
            let (local, exported) = match item.split_once(" as ") {
                Some((local, exported)) => (local.trim(), exported.trim()),
                None => (item, item),
            };
            if exported.is_empty() || exported == "default" {
                continue;
            }

            let (kind, description) = if type_only || item_type_only {
                (ExportKind::Type, String::new())
            } else if let (false, Some((kind, doc))) = (reexport, locals.get(local)) {
                (*kind, doc.clone())
            } else {
                (guess_kind(exported), String::new())
            };
            found.push((whole.start(), exported.to_string(), kind, description));
        }
    }

    found.sort_by_key(|(position, ..)| *position);

    let mut exports = ExportsMap::new();
    for (_, name, kind, description) in found {
        let hook = kind == ExportKind::Function && is_hook_name(&name);
        exports
            .entry(name)
            .or_insert_with(|| ExportMeta::new(kind, description, hook));
    }
    exports
}

fn declaration_kind(caps: &Captures<'_>, rest: &str) -> ExportKind {
    let what = caps["what"].trim();
    if what.contains("function") {
        ExportKind::Function
    } else if what.contains("class") {
        ExportKind::Class
    } else if matches!(what, "const" | "let" | "var") && FUNCTION_VALUE.is_match(rest) {
        ExportKind::Function
    } else {
        ExportKind::Type
    }
}

/// Kind for names re-exported from another module, which are not resolved
fn guess_kind(name: &str) -> ExportKind {
    match name.chars().next() {
        Some(first) if first.is_lowercase() => ExportKind::Function,
        _ => ExportKind::Type,
    }
}

fn clean_jsdoc(body: &str) -> String {
    body.lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .take_while(|line| !line.starts_with('@'))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
