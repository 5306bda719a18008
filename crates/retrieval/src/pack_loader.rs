//! Pack Loader (spec C7): ingests curated templates from a templates
//! directory and bulk dialogue documents from newline-delimited record
//! sources, then exposes them immutably once loaded.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::RetrievalError;
use crate::reputation::ReputationTier;
use crate::slot_fill::validate_placeholders;
use crate::template::{Document, Template};

#[derive(Debug, Clone, Copy, Default)]
pub struct PackStats {
    pub template_count: usize,
    pub document_count: usize,
}

/// Owns every loaded template and document. The template store is immutable
/// after `load_all_packs()` (spec §5 shared-resource policy); documents may
/// be loaded incrementally per source.
#[derive(Debug, Default)]
pub struct PackLoader {
    templates: Vec<Template>,
    documents: HashMap<String, Vec<Document>>,
    loaded: bool,
}

impl PackLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a loader directly from an in-memory template set, bypassing
    /// directory scanning. Useful for tests and for packs assembled
    /// programmatically rather than read from disk.
    pub fn from_templates(templates: Vec<Template>) -> Self {
        Self {
            templates,
            documents: HashMap::new(),
            loaded: true,
        }
    }

    /// Reads every `*.json` file in `templates_dir`, each holding one
    /// `Template`. Fails ingestion entirely if any template has an unclosed
    /// `{{...}}` placeholder.
    pub fn load_all_packs(&mut self, templates_dir: &Path) -> Result<(), RetrievalError> {
        let mut templates = Vec::new();
        let entries = fs::read_dir(templates_dir).map_err(|e| RetrievalError::Io(e.to_string()))?;
        let mut paths: Vec<_> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
            .collect();
        paths.sort();

        for path in paths {
            let raw = fs::read_to_string(&path).map_err(|e| RetrievalError::Io(e.to_string()))?;
            let template: Template =
                serde_json::from_str(&raw).map_err(|e| RetrievalError::Io(e.to_string()))?;
            validate_placeholders(&template.template_id, &template.content)?;
            templates.push(template);
        }

        self.templates = templates;
        self.loaded = true;
        Ok(())
    }

    /// Loads newline-delimited `Document` records from `path`, caching them
    /// under `source_id`. Calling again with the same `source_id` reloads.
    pub fn load_documents(&mut self, source_id: &str, path: &Path) -> Result<usize, RetrievalError> {
        let raw = fs::read_to_string(path).map_err(|e| RetrievalError::Io(e.to_string()))?;
        let mut docs = Vec::new();
        for line in raw.lines().filter(|l| !l.trim().is_empty()) {
            let doc: Document = serde_json::from_str(line).map_err(|e| RetrievalError::Io(e.to_string()))?;
            docs.push(doc);
        }
        let count = docs.len();
        self.documents.insert(source_id.to_string(), docs);
        Ok(count)
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn documents(&self, source_id: &str) -> &[Document] {
        self.documents.get(source_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_stats(&self) -> PackStats {
        PackStats {
            template_count: self.templates.len(),
            document_count: self.documents.values().map(Vec::len).sum(),
        }
    }

    /// Keyword-path template selection (spec §4.9 step 4): first template
    /// whose tags overlap `intent_tags` and whose reputation whitelist (if
    /// any) contains `tier`, tie-broken by insertion order.
    pub fn find_by_intent(&self, intent_tags: &[&str], tier: ReputationTier) -> Option<&Template> {
        self.templates.iter().find(|t| {
            t.allows_tier(tier) && intent_tags.iter().any(|tag| t.tags.contains(*tag))
        })
    }

    /// Every template whose tags overlap `intent_tags` and whose reputation
    /// whitelist (if any) allows `tier`, in insertion order. Used to fall
    /// back to the next candidate when the top match's slots can't be filled
    /// (spec §4.9 step 5).
    pub fn find_all_by_intent(&self, intent_tags: &[&str], tier: ReputationTier) -> Vec<&Template> {
        self.templates
            .iter()
            .filter(|t| t.allows_tier(tier) && intent_tags.iter().any(|tag| t.tags.contains(*tag)))
            .collect()
    }

    pub fn find_by_id(&self, template_id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.template_id == template_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_all_packs_reads_every_json_file_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for (id, content) in [("a", "hi {{name}}"), ("b", "bye {{name}}")] {
            let template = Template::new(id, content);
            let path = dir.path().join(format!("{id}.json"));
            fs::write(path, serde_json::to_string(&template).unwrap()).unwrap();
        }

        let mut loader = PackLoader::new();
        loader.load_all_packs(dir.path()).unwrap();
        assert_eq!(loader.get_stats().template_count, 2);
    }

    #[test]
    fn load_all_packs_rejects_malformed_templates() {
        let dir = tempfile::tempdir().unwrap();
        let template = Template::new("broken", "hi {{name");
        fs::write(dir.path().join("broken.json"), serde_json::to_string(&template).unwrap()).unwrap();

        let mut loader = PackLoader::new();
        assert!(loader.load_all_packs(dir.path()).is_err());
    }

    #[test]
    fn load_documents_parses_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.jsonl");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, r#"{{"id":"d1","content":"first"}}"#).unwrap();
        writeln!(file, r#"{{"id":"d2","content":"second","tags":["lore"]}}"#).unwrap();

        let mut loader = PackLoader::new();
        let count = loader.load_documents("lore_pack", &path).unwrap();
        assert_eq!(count, 2);
        assert_eq!(loader.documents("lore_pack").len(), 2);
    }

    #[test]
    fn find_by_intent_respects_reputation_whitelist_and_insertion_order() {
        let mut loader = PackLoader::new();
        loader.templates = vec![
            Template::new("t_neutral", "hi").with_tags(["greeting".into()]).with_reputation_tiers([ReputationTier::Neutral]),
            Template::new("t_any", "hi there").with_tags(["greeting".into()]),
        ];

        let found = loader.find_by_intent(&["greeting"], ReputationTier::Hostile).unwrap();
        assert_eq!(found.template_id, "t_any");

        let found = loader.find_by_intent(&["greeting"], ReputationTier::Neutral).unwrap();
        assert_eq!(found.template_id, "t_neutral");
    }
}
