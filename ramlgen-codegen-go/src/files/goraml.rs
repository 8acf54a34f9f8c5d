//! The `goraml` support package with the RAML date and time types.

use std::path::{Path, PathBuf};

use ramlgen_codegen::CodeBuilder;
use ramlgen_core::{FileRules, GeneratedFile};

use super::GENERATED_HEADER;
use crate::type_mapper::SUPPORT_PACKAGE;

/// Go type, layout and RAML name of each support type.
const DATE_TYPES: &[(&str, &str, &str)] = &[
    ("DateTime", "time.RFC1123", "datetime"),
    ("Date", "\"2006-01-02\"", "date-only"),
    ("TimeOnly", "\"15:04:05.99\"", "time-only"),
    ("DatetimeOnly", "\"2006-01-02T15:04:05.99\"", "datetime-only"),
];

/// `goraml/datetime.go`
pub struct DateTimeGo;

impl GeneratedFile for DateTimeGo {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(SUPPORT_PACKAGE).join("datetime.go")
    }

    fn rules(&self) -> FileRules {
        FileRules::generated(GENERATED_HEADER)
    }

    fn render(&self) -> String {
        let builder = CodeBuilder::go()
            .line(&format!("package {SUPPORT_PACKAGE}"))
            .blank()
            .block_with_close("import (", ")", |b| b.line("\"time\""))
            .blank();
        DATE_TYPES
            .iter()
            .fold(builder, |b, (name, layout, raml)| {
                let b = b
                    .line(&format!("// {name} represents the RAML {raml} type"))
                    .line(&format!("type {name} time.Time"))
                    .blank()
                    .line(&format!("// MarshalJSON formats {name} as a quoted string"))
                    .block_with_close(
                        &format!("func (t {name}) MarshalJSON() ([]byte, error) {{"),
                        "}",
                        |b| b.line(&format!("return []byte(`\"` + time.Time(t).Format({layout}) + `\"`), nil")),
                    )
                    .blank()
                    .line(&format!("// UnmarshalJSON parses a quoted {name}"))
                    .block_with_close(
                        &format!("func (t *{name}) UnmarshalJSON(data []byte) error {{"),
                        "}",
                        |b| {
                            b.line("s := string(data)")
                                .block_with_close("if len(s) >= 2 {", "}", |b| b.line("s = s[1 : len(s)-1]"))
                                .line(&format!("parsed, err := time.Parse({layout}, s)"))
                                .block_with_close("if err != nil {", "}", |b| b.line("return err"))
                                .line(&format!("*t = {name}(parsed)"))
                                .line("return nil")
                        },
                    );
                b.blank()
            })
            .build()
    }
}
