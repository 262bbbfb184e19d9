//! Per-job file list and the user's inclusion choices.

use serde::{Deserialize, Serialize};

use crate::backend::FileDescriptor;
use crate::job::Job;

/// A translatable-file candidate discovered in the mod directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobFile {
    pub path: String,
    pub translatable: bool,
    pub auto_selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_hint: Option<String>,
    pub selected: bool,
}

impl JobFile {
    fn from_descriptor(descriptor: FileDescriptor, selected: bool) -> Self {
        Self {
            path: descriptor.path,
            translatable: descriptor.translatable,
            auto_selected: descriptor.auto_selected,
            language_hint: descriptor.language_hint.filter(|h| !h.trim().is_empty()),
            selected,
        }
    }
}

/// Picks the source language from the hints of the selected files.
///
/// The first language of `priority` present among the hints wins. Without a
/// priority match the first hint encountered is used, and without any hint
/// `fallback` is returned.
pub fn guess_source_language<'a, I>(hints: I, priority: &[String], fallback: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let hints: Vec<&str> = hints.into_iter().collect();

    for lang in priority {
        if hints.iter().any(|h| h.eq_ignore_ascii_case(lang)) {
            return lang.clone();
        }
    }

    hints
        .first()
        .map(|h| h.to_string())
        .unwrap_or_else(|| fallback.to_string())
}

impl Job {
    /// Installs a freshly listed set of files.
    ///
    /// A non-empty previous selection is kept (restricted to paths that still
    /// exist); otherwise files that are both translatable and auto-selected are
    /// chosen.
    pub(crate) fn apply_file_list(
        &mut self,
        descriptors: Vec<FileDescriptor>,
        priority: &[String],
        fallback: &str,
    ) {
        let keep: Vec<&String> = self
            .selected_files
            .iter()
            .filter(|p| descriptors.iter().any(|d| &d.path == *p))
            .collect();
        let preserve = !keep.is_empty();

        let files: Vec<JobFile> = descriptors
            .into_iter()
            .map(|d| {
                let selected = if preserve {
                    self.selected_files.contains(&d.path)
                } else {
                    d.translatable && d.auto_selected
                };
                JobFile::from_descriptor(d, selected)
            })
            .collect();

        self.files = Some(files);
        self.refresh_selection(priority, fallback);
    }

    /// Flips the selection flag of one file. Returns false when the path is unknown.
    pub(crate) fn toggle_file(&mut self, path: &str, priority: &[String], fallback: &str) -> bool {
        let Some(files) = self.files.as_mut() else {
            return false;
        };
        let Some(file) = files.iter_mut().find(|f| f.path == path) else {
            return false;
        };
        file.selected = !file.selected;
        self.refresh_selection(priority, fallback);
        true
    }

    fn refresh_selection(&mut self, priority: &[String], fallback: &str) {
        let Some(files) = self.files.as_ref() else {
            return;
        };
        let selected: Vec<&JobFile> = files.iter().filter(|f| f.selected).collect();

        self.source_language = guess_source_language(
            selected.iter().filter_map(|f| f.language_hint.as_deref()),
            priority,
            fallback,
        );
        self.selected_files = selected.into_iter().map(|f| f.path.clone()).collect();
    }
}
