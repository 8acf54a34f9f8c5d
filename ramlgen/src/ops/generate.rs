//! Generate operation - server or client code from a resolved API.

use eyre::{Context, Result};
use ramlgen_raml::ResolvedApi;
use tracing::info;

use crate::{
    config::Settings,
    language::LanguageSupport,
    reports::{GenerateReport, GenerationResult, WrittenResult},
};

/// Run the generator of the configured language on `api`.
///
/// With `dry_run` the planned files are returned instead of written.
pub fn generate(api: &ResolvedApi, settings: &Settings, dry_run: bool) -> Result<GenerateReport> {
    let generator = LanguageSupport::get(settings.language).generator(api, &settings.options);

    let result = if dry_run {
        let files = generator.preview().wrap_err("Failed to generate code")?;
        GenerationResult::Preview(files)
    } else {
        let result = generator
            .generate(&settings.dir)
            .wrap_err("Failed to generate code")?;
        info!(
            written = result.written.len(),
            skipped = result.skipped.len(),
            dir = %settings.dir.display(),
            "generation finished"
        );
        GenerationResult::Written(WrittenResult {
            output_dir: settings.dir.clone(),
            written: result.written,
            skipped: result.skipped,
        })
    };

    Ok(GenerateReport {
        title: api.title.clone(),
        language: generator.language(),
        target: settings.options.target,
        result,
    })
}

#[cfg(test)]
mod tests {
    use ramlgen_codegen::Target;
    use ramlgen_raml::resolve_file;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        config::{Config, Overrides},
        language::Language,
    };

    const API: &str = "#%RAML 1.0\ntitle: Pets\n/pets:\n  get:\n";

    fn setup(target: Target, language: Language) -> (TempDir, ResolvedApi, Settings) {
        let temp = TempDir::new().unwrap();
        let ramlfile = temp.path().join("api.raml");
        std::fs::write(&ramlfile, API).unwrap();
        let api = resolve_file(&ramlfile).unwrap();
        let flags = Overrides {
            language: Some(language),
            dir: Some(temp.path().join("out")),
            ..Default::default()
        };
        let settings = Settings::resolve(target, Config::default(), flags);
        (temp, api, settings)
    }

    #[test]
    fn test_generate_writes_server() {
        let (_temp, api, settings) = setup(Target::Server, Language::Go);
        let report = generate(&api, &settings, false).unwrap();

        assert_eq!(report.title, "Pets");
        assert_eq!(report.language, "go");
        let GenerationResult::Written(written) = report.result else {
            panic!("expected written result");
        };
        assert!(written.written.contains(&"main.go".to_string()));
        assert!(written.skipped.is_empty());
        assert!(settings.dir.join("pets_if.go").exists());
    }

    #[test]
    fn test_second_run_keeps_user_files() {
        let (_temp, api, settings) = setup(Target::Server, Language::Python);
        generate(&api, &settings, false).unwrap();
        let report = generate(&api, &settings, false).unwrap();

        let GenerationResult::Written(written) = report.result else {
            panic!("expected written result");
        };
        assert!(written.skipped.contains(&"app.py".to_string()));
        assert!(written.written.contains(&"pets_if.py".to_string()));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let (_temp, api, settings) = setup(Target::Client, Language::Python);
        let report = generate(&api, &settings, true).unwrap();

        let GenerationResult::Preview(files) = report.result else {
            panic!("expected preview");
        };
        assert!(files.iter().any(|f| f.path == "client.py"));
        assert!(!settings.dir.exists());
    }
}
