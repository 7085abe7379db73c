//! Import TypeScript ambient declaration files as Scala.js facade types.
//!
//! The pipeline is [`parse`] → [`import_document`] → [`emit`]; [`translate`]
//! runs all three.
//!
//! ```
//! use ts_importer::{translate, EmitOptions};
//!
//! let out = translate("declare var answer: number;", "facades", &EmitOptions::default()).unwrap();
//! assert!(out.code.contains("var answer: Double = js.native"));
//! ```

pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod emitter;
pub mod importer;
pub mod lexer;
pub mod model;
pub mod parser;

pub use ast::{Document, ParseWarning};
pub use config::{ConfigError, ImporterConfig};
pub use emitter::{emit, EmitOptions};
pub use importer::{import_document, Importer, Warning, WarningKind};
pub use model::PackageSymbol;
pub use parser::{parse, ParseError};

/// The result of [`translate`].
#[derive(Debug, Clone)]
pub struct Translation {
    /// Scala source.
    pub code: String,
    /// Constructs the importer degraded or dropped.
    pub warnings: Vec<Warning>,
    /// Recoverable problems found while parsing.
    pub parse_warnings: Vec<ParseWarning>,
}

/// Parse `text`, import it under the dotted package `output_path` and emit Scala.
pub fn translate(
    text: &str,
    output_path: &str,
    options: &EmitOptions,
) -> Result<Translation, ParseError> {
    let document = parse(text)?;
    tracing::debug!(declarations = document.declarations.len(), "parsed document");

    let mut importer = Importer::new();
    let root = importer.import(&document, output_path);
    let code = emit(&root, options);

    Ok(Translation {
        code,
        warnings: importer.into_warnings(),
        parse_warnings: document.warnings,
    })
}
