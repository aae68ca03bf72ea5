//! Shared output formatting for commands.

use std::fmt::Write;
use std::sync::Arc;

use tabled::{Table, Tabled, settings::Style};
use vaultdex_core::document::Document;
use vaultdex_core::index::{CacheConsistency, IndexStats};

/// Row for document tables.
#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Class")]
    file_class: String,
    #[tabled(rename = "Fields")]
    fields: String,
}

impl From<&Document> for DocumentRow {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id.to_string(),
            file_class: doc.file_class().to_string(),
            fields: doc.frontmatter.fields.keys().cloned().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Summary of one index or refresh run.
pub fn format_stats(action: &str, stats: &IndexStats, show_orphans: bool) -> String {
    let mut out = String::new();
    if stats.has_warnings() {
        let _ = writeln!(out, "{action} completed with warnings:");
    } else {
        let _ = writeln!(out, "{action} complete:");
    }
    let _ = writeln!(out, "  Scanned:             {}", stats.scanned_count);
    let _ = writeln!(out, "  Indexed:             {}", stats.indexed_count);
    let _ = writeln!(out, "  Cache failures:      {}", stats.cache_failures);
    let _ = writeln!(out, "  Validation failures: {}", stats.validation_failures);
    if show_orphans {
        let _ = writeln!(out, "  Orphans removed:     {}", stats.orphans_removed);
    }
    let _ = writeln!(out, "  Duration:            {}ms", stats.duration.as_millis());
    out
}

pub fn format_consistency(report: &CacheConsistency) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Vault documents: {}", report.vault_documents);
    let _ = writeln!(out, "Cache entries:   {}", report.cache_entries);

    let sections = [("Orphaned entries", &report.orphaned), ("Missing entries", &report.missing)];
    for (label, ids) in sections {
        if ids.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{label} ({}):", ids.len());
        for id in ids {
            let _ = writeln!(out, "  {id}");
        }
    }

    out.push('\n');
    if report.is_consistent() {
        out.push_str("Cache is consistent with the vault.\n");
    } else {
        out.push_str("Cache is inconsistent; run `vdx index` to rebuild it.\n");
    }
    out
}

/// One document, field by field.
pub fn format_document(doc: &Document) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id: {}", doc.id);
    let _ = writeln!(out, "path: {}", doc.path);
    if !doc.file_class().is_empty() {
        let _ = writeln!(out, "fileClass: {}", doc.file_class());
    }
    if !doc.frontmatter.fields.is_empty() {
        let _ = writeln!(out, "fields:");
        for (name, value) in &doc.frontmatter.fields {
            let _ = writeln!(out, "  {name}: {value}");
        }
    }
    out
}

pub fn print_document(doc: &Document, json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(doc).unwrap_or_default());
    } else {
        print!("{}", format_document(doc));
    }
}

pub fn print_documents(docs: &[Arc<Document>], json: bool) {
    if json {
        let docs: Vec<&Document> = docs.iter().map(|d| &**d).collect();
        println!("{}", serde_json::to_string_pretty(&docs).unwrap_or_default());
        return;
    }

    if docs.is_empty() {
        println!("(no documents found)");
        return;
    }

    let rows: Vec<DocumentRow> = docs.iter().map(|d| DocumentRow::from(d.as_ref())).collect();
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!("-- {} documents --", docs.len());
}
