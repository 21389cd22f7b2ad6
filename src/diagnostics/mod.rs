use crate::span::Span;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenError {
    #[error("Snapshot error: {msg}")]
    Snapshot { msg: String, span: Option<Span> },

    #[error("Type reference error in `{text}`: {msg}")]
    TypeRef { msg: String, text: String, span: Span },

    #[error("Config error: {msg}")]
    Config { msg: String, path: PathBuf, span: Option<Span> },

    #[error("Generation error: {msg}")]
    Generation { msg: String },

    #[error("I/O error: {msg}")]
    Io { msg: String, path: PathBuf },
}

impl GenError {
    pub fn snapshot(msg: impl Into<String>, span: Option<Span>) -> Self {
        Self::Snapshot { msg: msg.into(), span }
    }

    pub fn type_ref(msg: impl Into<String>, text: impl Into<String>, span: Span) -> Self {
        Self::TypeRef { msg: msg.into(), text: text.into(), span }
    }

    pub fn config(msg: impl Into<String>, path: PathBuf, span: Option<Span>) -> Self {
        Self::Config { msg: msg.into(), path, span }
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation { msg: msg.into() }
    }

    pub fn io(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Io { msg: msg.into(), path }
    }

    /// Lift a serde_json failure into a spanned snapshot error.
    pub fn from_json(err: &serde_json::Error, source: &str) -> Self {
        let span = Span::at_line_col(source, err.line(), err.column());
        Self::snapshot(err.to_string(), Some(span))
    }
}

/// Render a GenError with ariadne for nice terminal output.
///
/// `source` is the text the error's span points into: the snapshot document for
/// `Snapshot`, the config file for `Config`. `TypeRef` carries its own text.
pub fn render_error(source: &str, err: &GenError) {
    use ariadne::{Label, Report, ReportKind, Source};

    let (kind_str, msg, span, text) = match err {
        GenError::Snapshot { msg, span: Some(span) } => ("snapshot", msg, *span, source),
        GenError::Config { msg, span: Some(span), .. } => ("config", msg, *span, source),
        GenError::TypeRef { msg, text, span } => ("type reference", msg, *span, text.as_str()),
        GenError::Snapshot { msg, span: None } => {
            eprintln!("error[snapshot]: {msg}");
            return;
        }
        GenError::Config { msg, path, span: None } => {
            eprintln!("error[config]: {msg}");
            eprintln!("  --> {}", path.display());
            return;
        }
        GenError::Generation { msg } => {
            eprintln!("error: {msg}");
            return;
        }
        GenError::Io { msg, path } => {
            eprintln!("error[io]: {msg}");
            eprintln!("  --> {}", path.display());
            return;
        }
    };

    let _ = Report::build(ReportKind::Error, (), span.start)
        .with_message(format!("{kind_str} error"))
        .with_label(Label::new(span.range()).with_message(msg))
        .finish()
        .eprint(Source::from(text));
}
