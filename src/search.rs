//! Search-expression collaborator for index rules.
//!
//! Rules on the default index region match whole messages, not rendered
//! text, so they compile through the mail reader's boolean
//! search-expression language instead of a plain regex. This module is
//! the seam to that language: a [`SearchCompiler`] normalizes and
//! compiles the pattern, and the resulting [`SearchProgram`] is stored on
//! the rule and evaluated elsewhere.
//!
//! [`SimpleSearch`] is the default collaborator. It performs the
//! bare-pattern rewrite (keyword shortcuts, then substitution into the
//! configured template) but deliberately implements none of the
//! expression grammar; applications with a real search engine inject
//! their own compiler.

use std::fmt;

/// A compiled search expression, opaque to the rule engine.
///
/// Evaluation happens in the message search engine; the rule engine only
/// keeps the program next to its style.
pub trait SearchProgram: fmt::Debug {
    /// The expression source the program was compiled from.
    fn source(&self) -> &str;
}

/// Compiler seam for the boolean search-expression language.
pub trait SearchCompiler {
    /// Rewrite a bare pattern into expression syntax.
    ///
    /// Patterns that already contain expression operators pass through
    /// unchanged.
    fn normalize(&self, pattern: &str) -> String;

    /// Compile an expression. On failure, returns the expression
    /// engine's human-readable diagnostic.
    fn compile(&self, source: &str) -> Result<Box<dyn SearchProgram>, String>;
}

/// Shorthand keywords accepted in place of a full expression.
const KEYWORDS: [(&str, &str); 11] = [
    ("all", "~A"),
    (".", "~A"),
    ("^", "~A"),
    ("del", "~D"),
    ("flag", "~F"),
    ("new", "~N"),
    ("old", "~O"),
    ("repl", "~Q"),
    ("read", "~R"),
    ("tag", "~T"),
    ("unread", "~U"),
];

/// Default search collaborator.
///
/// Carries the configured `simple_search` template: a bare pattern (one
/// with no expression operators) is substituted into each `%s` of the
/// template, so `wiz` becomes `~f wiz | ~s wiz` under the default.
#[derive(Clone, Debug)]
pub struct SimpleSearch {
    template: String,
}

impl SimpleSearch {
    /// Collaborator using the given `simple_search` template.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The configured template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for SimpleSearch {
    fn default() -> Self {
        Self::new("~f %s | ~s %s")
    }
}

impl SearchCompiler for SimpleSearch {
    fn normalize(&self, pattern: &str) -> String {
        let trimmed = pattern.trim();
        if trimmed.chars().any(|c| matches!(c, '~' | '=' | '%')) {
            return pattern.to_string();
        }
        for (keyword, expression) in KEYWORDS {
            if trimmed.eq_ignore_ascii_case(keyword) {
                return expression.to_string();
            }
        }
        self.template.replace("%s", trimmed)
    }

    fn compile(&self, source: &str) -> Result<Box<dyn SearchProgram>, String> {
        if source.trim().is_empty() {
            return Err("empty search expression".to_string());
        }
        Ok(Box::new(SimpleProgram {
            source: source.to_string(),
        }))
    }
}

/// Program produced by [`SimpleSearch`]: the normalized source, wrapped.
#[derive(Debug)]
struct SimpleProgram {
    source: String,
}

impl SearchProgram for SimpleProgram {
    fn source(&self) -> &str {
        &self.source
    }
}
