//! Error types for identifier resolution

use uc_span::Span;

/// Errors that abort identifier resolution
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No visible scope declares the name
    #[error("undeclared identifier `{name}`")]
    Undeclared {
        /// The name that was not found
        name: String,
        /// Location of the identifier use
        span: Span,
        /// Visible names spelled similarly, closest first
        suggestions: Vec<String>,
    },

    /// The name is already defined in the same scope
    #[error("redeclaration of `{name}`")]
    Redeclaration {
        /// The redeclared name
        name: String,
        /// Location of the earlier declaration
        first: Span,
        /// Location of the conflicting declaration
        second: Span,
    },
}

impl ResolveError {
    /// Primary location of the error
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Undeclared { span, .. } => *span,
            Self::Redeclaration { second, .. } => *second,
        }
    }
}

/// Names among `candidates` within a small edit distance of `target`
///
/// At most three suggestions are returned, nearest first; ties keep the
/// order of `candidates`.
pub(crate) fn suggest<'name>(
    target: &str,
    candidates: impl IntoIterator<Item = &'name str>,
) -> Vec<String> {
    const MAX_DISTANCE: usize = 2;
    const MAX_SUGGESTIONS: usize = 3;

    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter(|candidate| *candidate != target)
        .map(|candidate| (edit_distance(target, candidate), candidate))
        .filter(|(distance, _)| *distance <= MAX_DISTANCE)
        .collect();
    scored.sort_by_key(|(distance, _)| *distance);
    scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Levenshtein distance over characters, keeping a single row
fn edit_distance(source: &str, target: &str) -> usize {
    let target: Vec<char> = target.chars().collect();
    let mut row: Vec<usize> = (0..=target.len()).collect();

    for (idx, source_char) in source.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = idx + 1;
        for (jdx, target_char) in target.iter().enumerate() {
            let substitute = diagonal + usize::from(source_char != *target_char);
            diagonal = row[jdx + 1];
            row[jdx + 1] = substitute.min(row[jdx] + 1).min(diagonal + 1);
        }
    }

    row[target.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("main", "main"), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("count", "conut"), 2);
    }

    #[test]
    fn test_suggest_orders_by_distance() {
        let found = suggest("lenght", ["length", "len", "width", "lenght"]);
        assert_eq!(found, vec!["length".to_string()]);

        let found = suggest("xs", ["x", "ys", "total"]);
        assert_eq!(found, vec!["x".to_string(), "ys".to_string()]);
    }
}
