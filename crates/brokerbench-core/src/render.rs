//! Driver template rendering.
//!
//! All tokens are replaced in one scan of the template: text inserted for one
//! token is never scanned again, so a value that happens to contain another
//! token's key comes through verbatim. Where two keys match at the same
//! position the longer key wins.

use crate::error::{BenchError, Result};
use crate::types::{DriverTemplate, OverrideMap};
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    overrides: OverrideMap,
    // None when there is nothing to substitute.
    pattern: Option<Regex>,
}

impl TemplateRenderer {
    pub fn new(overrides: OverrideMap) -> Result<Self> {
        if overrides.keys().any(|k| k.is_empty()) {
            return Err(BenchError::InvalidToken("empty token key".into()));
        }

        let mut keys: Vec<&str> = overrides.keys().map(String::as_str).collect();
        // Regex alternation is leftmost-first; longest keys go first.
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let pattern = if keys.is_empty() {
            None
        } else {
            let alternation = keys
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            let re = Regex::new(&alternation)
                .map_err(|e| BenchError::InvalidToken(e.to_string()))?;
            Some(re)
        };

        Ok(Self { overrides, pattern })
    }

    pub fn overrides(&self) -> &OverrideMap {
        &self.overrides
    }

    /// Substitute every token occurrence in `content`.
    pub fn substitute(&self, content: &str) -> String {
        match &self.pattern {
            Some(re) => re
                .replace_all(content, |caps: &Captures| {
                    // Every match is one of the keys the pattern was built from.
                    self.overrides
                        .get(&caps[0])
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            None => content.to_string(),
        }
    }

    /// Render each template into `target_dir`, keeping its file name.
    ///
    /// Returns the rendered file paths in template order.
    pub fn render(&self, templates: &[DriverTemplate], target_dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(target_dir).map_err(|e| BenchError::render(target_dir, e))?;

        let mut rendered = Vec::with_capacity(templates.len());
        for tmpl in templates {
            let content =
                fs::read_to_string(&tmpl.path).map_err(|e| BenchError::render(&tmpl.path, e))?;
            let out_path = target_dir.join(&tmpl.name);
            fs::write(&out_path, self.substitute(&content))
                .map_err(|e| BenchError::render(&out_path, e))?;
            debug!(template = %tmpl.name, path = %out_path.display(), "rendered driver");
            rendered.push(out_path);
        }
        Ok(rendered)
    }
}
