//! Server and client generation report.

use std::path::PathBuf;

use ramlgen_codegen::{PreviewFile, Target};

use super::output::{Output, Report};

/// Report data from code generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// API title
    pub title: String,
    /// Language identifier of the generator
    pub language: &'static str,
    pub target: Target,
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    pub output_dir: PathBuf,
    pub written: Vec<String>,
    /// Files kept because they already existed
    pub skipped: Vec<String>,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(files) => self.render_preview(out, files),
        }
    }
}

impl GenerateReport {
    fn target_name(&self) -> &'static str {
        match self.target {
            Target::Server => "server",
            Target::Client => "client",
        }
    }

    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        out.preformatted(&format!(
            "{} ({} {})",
            self.title,
            self.language,
            self.target_name()
        ));
        out.key_value("Generated", &written.output_dir.display().to_string());

        if !written.written.is_empty() {
            out.newline();
            out.section(&format!("Written ({})", written.written.len()));
            for path in &written.written {
                out.added_item(path);
            }
        }

        if !written.skipped.is_empty() {
            out.newline();
            out.section("Kept existing files");
            for path in &written.skipped {
                out.list_item(path);
            }
        }
    }

    fn render_preview(&self, out: &mut dyn Output, files: &[PreviewFile]) {
        for file in files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", files.len()));
    }
}
