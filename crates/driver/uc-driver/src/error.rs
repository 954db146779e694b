//! Compilation failures and their diagnostics

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{self, SimpleFiles};
use codespan_reporting::term;
use uc_ir_lower::LowerError;
use uc_resolve::ResolveError;
use uc_span::Span;
use uc_ty::TypeError;

use crate::DiagnosticsConfig;

/// Exit status for programs rejected by a semantic phase
pub const EXIT_USER_ERROR: i32 = 1;
/// Exit status for compiler defects
pub const EXIT_INTERNAL_ERROR: i32 = 101;

/// Why a compilation run stopped
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Identifier resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Type checking failed
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Lowering failed
    #[error(transparent)]
    Lower(#[from] LowerError),
}

impl CompileError {
    /// Whether the failure is a compiler defect rather than a problem with
    /// the program
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Resolve(_) => false,
            Self::Type(err) => matches!(err, TypeError::Unresolved { .. }),
            Self::Lower(err) => err.is_internal(),
        }
    }

    /// Process exit status for this failure
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        if self.is_internal() {
            EXIT_INTERNAL_ERROR
        } else {
            EXIT_USER_ERROR
        }
    }

    /// Position the failure is reported at
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Resolve(err) => Some(err.span()),
            Self::Type(err) => Some(err.span()),
            Self::Lower(err) => err.span(),
        }
    }

    /// Converts to a codespan diagnostic for rustc-style output
    #[must_use]
    pub fn to_diagnostic<FileId: Copy>(&self, file_id: FileId) -> Diagnostic<FileId> {
        let diagnostic = Diagnostic::error().with_message(self.to_string());
        let label = |span: Span, message: &str| {
            Label::primary(file_id, span.range()).with_message(message.to_string())
        };

        let diagnostic = match self {
            Self::Resolve(ResolveError::Undeclared {
                span, suggestions, ..
            }) => diagnostic
                .with_labels(vec![label(*span, "not found in this scope")])
                .with_notes(
                    suggestions
                        .iter()
                        .map(|name| format!("help: a similar name exists: `{name}`"))
                        .collect(),
                ),
            Self::Resolve(ResolveError::Redeclaration { first, second, .. }) => {
                let mut labels = vec![label(*second, "redeclared here")];
                if !first.is_builtin() {
                    labels.push(
                        Label::secondary(file_id, first.range())
                            .with_message("previous declaration here"),
                    );
                }
                diagnostic.with_labels(labels)
            }
            Self::Type(err) => {
                let message = match err {
                    TypeError::TypeMismatch { expected, .. } => format!("expected `{expected}`"),
                    TypeError::NotAssignable { .. } => "cannot be assigned to".to_string(),
                    TypeError::NotCallable { .. } => "call expression".to_string(),
                    TypeError::NotIndexable { .. } => "index expression".to_string(),
                    TypeError::ArgumentCount { expected, .. } => {
                        format!("expected {expected} argument(s)")
                    }
                    TypeError::LiteralOutOfRange { .. } => "out of range for `int`".to_string(),
                    TypeError::MissingReturn { .. } => "missing `return`".to_string(),
                    TypeError::NotAType { .. } => "not a type".to_string(),
                    TypeError::NotAValue { .. } => "not a value".to_string(),
                    TypeError::InvalidObjectType { .. } => "invalid type".to_string(),
                    TypeError::Unresolved { .. } | TypeError::Unsupported { .. } => String::new(),
                };
                diagnostic.with_labels(vec![label(err.span(), &message)])
            }
            Self::Lower(err) => match err.span() {
                Some(span) if !span.is_builtin() => diagnostic.with_labels(vec![label(span, "")]),
                _ => diagnostic,
            },
        };

        if self.is_internal() {
            diagnostic.with_notes(vec![
                "this is a bug in the compiler, not in the program".to_string(),
            ])
        } else {
            diagnostic
        }
    }

    /// Renders the diagnostic against the source text it was produced from
    ///
    /// # Errors
    ///
    /// Fails if a label lies outside `source`.
    pub fn render(
        &self,
        name: &str,
        source: &str,
        config: &DiagnosticsConfig,
    ) -> Result<String, files::Error> {
        let mut files = SimpleFiles::new();
        let file_id = files.add(name.to_string(), source.to_string());
        let diagnostic = self.to_diagnostic(file_id);

        let mut buffer = Vec::new();
        #[allow(deprecated, reason = "codespan-reporting keeps `emit` for non-termcolor writers")]
        term::emit(&mut buffer, &config.term_config(), &files, &diagnostic)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticStyle;
    use pretty_assertions::assert_eq;
    use uc_ir::IrError;

    fn undeclared() -> CompileError {
        CompileError::Resolve(ResolveError::Undeclared {
            name: "cout".to_string(),
            span: Span::new(32, 36),
            suggestions: vec!["count".to_string()],
        })
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(undeclared().exit_code(), EXIT_USER_ERROR);

        let internal = CompileError::Lower(LowerError::Ir(IrError::NoCurrentBlock {
            function: "main".to_string(),
        }));
        assert!(internal.is_internal());
        assert_eq!(internal.exit_code(), EXIT_INTERNAL_ERROR);
        assert!(internal.to_string().starts_with("internal compiler error"));

        let unresolved = CompileError::Type(TypeError::Unresolved {
            span: Span::new(0, 1),
        });
        assert_eq!(unresolved.exit_code(), EXIT_INTERNAL_ERROR);
    }

    #[test]
    fn test_render_undeclared_with_suggestion() {
        let source = "int count;\nint f(void) { return cout; }\n";
        let config = DiagnosticsConfig::default();
        let output = undeclared().render("prog.uc", source, &config).unwrap();

        assert!(output.contains("error: undeclared identifier `cout`"));
        assert!(output.contains("prog.uc:2:22"));
        assert!(output.contains("not found in this scope"));
        assert!(output.contains("help: a similar name exists: `count`"));
    }

    #[test]
    fn test_render_short_style() {
        let source = "int count;\nint f(void) { return cout; }\n";
        let config = DiagnosticsConfig {
            style: DiagnosticStyle::Short,
            tab_width: 4,
        };
        let output = undeclared().render("prog.uc", source, &config).unwrap();

        assert_eq!(output.lines().count(), 1);
        assert!(output.starts_with("prog.uc:2:22: error"));
    }

    #[test]
    fn test_redeclaration_has_two_labels() {
        let err = CompileError::Resolve(ResolveError::Redeclaration {
            name: "x".to_string(),
            first: Span::new(4, 5),
            second: Span::new(11, 12),
        });
        let diagnostic = err.to_diagnostic(0usize);
        assert_eq!(diagnostic.labels.len(), 2);
        assert_eq!(diagnostic.labels[0].range, 11..12);
        assert_eq!(diagnostic.labels[1].range, 4..5);
    }
}
