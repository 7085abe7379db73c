//! Rich error reporting using codespan-reporting.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use std::ops::Range;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::ast::ParseWarning;
use crate::importer::Warning;
use crate::parser::ParseError;

/// A source file database for codespan-reporting.
pub struct SourceDb {
    files: SimpleFiles<String, String>,
    file_id: usize,
    len: usize,
}

impl SourceDb {
    /// Create a new source database with a single file.
    pub fn new(name: String, source: String) -> Self {
        let len = source.len();
        let mut files = SimpleFiles::new();
        let file_id = files.add(name, source);
        Self {
            files,
            file_id,
            len,
        }
    }

    /// One character at `pos`, or an empty span at end of input.
    fn span_at(&self, pos: usize) -> Range<usize> {
        let start = pos.min(self.len);
        start..(start + 1).min(self.len)
    }

    pub fn parse_error(&self, error: &ParseError) -> Diagnostic<usize> {
        Diagnostic::error()
            .with_message(&error.message)
            .with_labels(vec![
                Label::primary(self.file_id, self.span_at(error.pos)).with_message("error occurs here")
            ])
    }

    pub fn parse_warning(&self, warning: &ParseWarning) -> Diagnostic<usize> {
        Diagnostic::warning()
            .with_message(&warning.message)
            .with_labels(vec![Label::primary(self.file_id, self.span_at(warning.pos))])
    }

    /// Importer warnings carry no position; they render as a bare message.
    pub fn import_warning(&self, warning: &Warning) -> Diagnostic<usize> {
        Diagnostic::warning().with_message(warning.to_string())
    }

    /// Report a parse error with source context.
    pub fn report_parse_error(&self, error: &ParseError) {
        self.emit_diagnostic(&self.parse_error(error));
    }

    /// Report a recoverable parse problem with source context.
    pub fn report_parse_warning(&self, warning: &ParseWarning) {
        self.emit_diagnostic(&self.parse_warning(warning));
    }

    pub fn report_import_warning(&self, warning: &Warning) {
        self.emit_diagnostic(&self.import_warning(warning));
    }

    /// Render `diagnostic` into `writer`.
    pub fn render(
        &self,
        writer: &mut dyn WriteColor,
        diagnostic: &Diagnostic<usize>,
    ) -> Result<(), codespan_reporting::files::Error> {
        term::emit(writer, &term::Config::default(), &self.files, diagnostic)
    }

    fn emit_diagnostic(&self, diagnostic: &Diagnostic<usize>) {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        if let Err(err) = self.render(&mut writer.lock(), diagnostic) {
            tracing::debug!(%err, "failed to render diagnostic");
        };
    }
}
