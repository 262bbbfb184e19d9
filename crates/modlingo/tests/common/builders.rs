//! Builder patterns for creating test data programmatically.

#![allow(dead_code)]

use modlingo::backend::FileDescriptor;
use modlingo::queue::SubmitRequest;

/// Builder for creating `SubmitRequest` instances.
pub struct SubmitRequestBuilder {
    request: SubmitRequest,
}

impl SubmitRequestBuilder {
    /// A request for `mod_id` installed under `/mods/<mod_id>`.
    pub fn new(mod_id: &str) -> Self {
        let mut request = SubmitRequest::new(mod_id, &format!("/mods/{}", mod_id));
        request.game_name = "RimWorld".to_string();
        Self { request }
    }

    pub fn install_path(mut self, path: &str) -> Self {
        self.request.install_path = path.to_string();
        self
    }

    pub fn output_path(mut self, path: &str) -> Self {
        self.request.output_path = Some(path.to_string());
        self
    }

    pub fn target_language(mut self, lang: &str) -> Self {
        self.request.target_language = Some(lang.to_string());
        self
    }

    pub fn workshop_id(mut self, id: &str) -> Self {
        self.request.workshop_id = Some(id.to_string());
        self
    }

    pub fn build(self) -> SubmitRequest {
        self.request
    }
}

/// A translatable, auto-selected file.
pub fn auto_file(path: &str, language_hint: Option<&str>) -> FileDescriptor {
    FileDescriptor {
        path: path.to_string(),
        translatable: true,
        auto_selected: true,
        language_hint: language_hint.map(str::to_string),
    }
}

/// A translatable file that is not selected by default.
pub fn optional_file(path: &str, language_hint: Option<&str>) -> FileDescriptor {
    FileDescriptor {
        auto_selected: false,
        ..auto_file(path, language_hint)
    }
}

/// A file the backend cannot translate.
pub fn skipped_file(path: &str) -> FileDescriptor {
    FileDescriptor {
        path: path.to_string(),
        translatable: false,
        auto_selected: false,
        language_hint: None,
    }
}
