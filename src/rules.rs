//! Styled pattern rules and the per-region ordered rule list.
//!
//! A [`StyledPattern`] pairs one source pattern with a compiled matcher
//! and the style to apply to whatever the matcher selects. A
//! [`PatternRuleSet`] holds the rules of one display region in insertion
//! order; that order is load-bearing, because renderers stop at the first
//! rule that matches.

use std::slice;

use regex::Regex;

use crate::palette::{ColorId, StyleHandle};
use crate::search::SearchProgram;
use crate::style::AttrFlags;

/// Compiled matcher of a rule.
///
/// Most regions match rendered text with a plain regex; the default index
/// region matches whole messages through a compiled search-expression
/// program. Exactly one form exists per rule, by construction.
#[derive(Debug)]
pub enum Matcher {
    /// Plain regular expression, with the sensitivity it was compiled
    /// under.
    Regex {
        regex: Regex,
        case_insensitive: bool,
    },
    /// Search-expression program, evaluated by the message search engine.
    Search(Box<dyn SearchProgram>),
}

impl Matcher {
    /// Whether this is the search-expression form.
    #[must_use]
    pub const fn is_search(&self) -> bool {
        matches!(self, Self::Search(_))
    }

    /// The search program, for the search-expression form.
    #[must_use]
    pub fn as_search(&self) -> Option<&dyn SearchProgram> {
        match self {
            Self::Regex { .. } => None,
            Self::Search(program) => Some(program.as_ref()),
        }
    }
}

/// One style rule: a pattern, its compiled matcher, and the owned style.
///
/// Rules are created only by the engine's upsert and destroyed only when
/// their region is cleared. Dropping a rule drops its [`StyleHandle`],
/// which releases the palette pair.
#[derive(Debug)]
pub struct StyledPattern {
    pattern: String,
    matcher: Matcher,
    submatch: usize,
    stop_matching: bool,
    style: StyleHandle,
    attrs: AttrFlags,
}

impl StyledPattern {
    pub(crate) fn new(
        pattern: String,
        matcher: Matcher,
        submatch: usize,
        style: StyleHandle,
        attrs: AttrFlags,
    ) -> Self {
        Self {
            pattern,
            matcher,
            submatch,
            stop_matching: false,
            style,
            attrs,
        }
    }

    /// The rule's source pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The compiled matcher.
    #[must_use]
    pub const fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Which capture group receives the style (`0` = whole match).
    #[must_use]
    pub const fn submatch(&self) -> usize {
        self.submatch
    }

    /// Whether a renderer reaching this rule must stop evaluating the
    /// rest of the list for the current text segment.
    #[must_use]
    pub const fn stop_matching(&self) -> bool {
        self.stop_matching
    }

    /// Mark or unmark this rule as a stop point. Set by the pager at
    /// render time; never touched by upsert.
    pub fn set_stop_matching(&mut self, stop: bool) {
        self.stop_matching = stop;
    }

    /// The owned style handle.
    #[must_use]
    pub const fn style(&self) -> &StyleHandle {
        &self.style
    }

    /// Foreground color of the rule's style.
    #[must_use]
    pub const fn fg(&self) -> ColorId {
        self.style.fg()
    }

    /// Background color of the rule's style.
    #[must_use]
    pub const fn bg(&self) -> ColorId {
        self.style.bg()
    }

    /// Attribute mask of the rule's style.
    #[must_use]
    pub const fn attrs(&self) -> AttrFlags {
        self.attrs
    }

    pub(crate) fn set_style(&mut self, style: StyleHandle) {
        self.style = style;
    }

    pub(crate) fn set_attrs(&mut self, attrs: AttrFlags) {
        self.attrs = attrs;
    }

    /// Byte span this rule styles in `text`, resolved through the rule's
    /// submatch group.
    ///
    /// Search-expression rules match messages, not text; they always
    /// return `None` here.
    #[must_use]
    pub fn find_span(&self, text: &str) -> Option<(usize, usize)> {
        match &self.matcher {
            Matcher::Regex { regex, .. } => {
                if self.submatch == 0 {
                    regex.find(text).map(|m| (m.start(), m.end()))
                } else {
                    regex
                        .captures(text)
                        .and_then(|caps| caps.get(self.submatch))
                        .map(|m| (m.start(), m.end()))
                }
            }
            Matcher::Search(_) => None,
        }
    }

    /// Dedup comparison against a candidate pattern, keyed by the
    /// *call's* sensitivity rather than anything stored on the rule.
    pub(crate) fn pattern_matches(&self, pattern: &str, sensitive: bool) -> bool {
        if sensitive {
            self.pattern == pattern
        } else {
            self.pattern.eq_ignore_ascii_case(pattern)
        }
    }
}

/// A resolved match: the winning rule and the byte span it styles.
#[derive(Debug)]
pub struct RuleMatch<'a> {
    pub rule: &'a StyledPattern,
    pub start: usize,
    pub end: usize,
}

/// Ordered rule list of one display region.
///
/// Insertion is always at the tail, so precedence is
/// first-inserted-wins. The list never reorders.
#[derive(Debug, Default)]
pub struct PatternRuleSet {
    rules: Vec<StyledPattern>,
}

impl PatternRuleSet {
    /// Empty rule list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the list holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate the rules in insertion order.
    pub fn iter(&self) -> slice::Iter<'_, StyledPattern> {
        self.rules.iter()
    }

    /// Iterate the rules mutably, e.g. for the pager's stop-matching
    /// bookkeeping.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, StyledPattern> {
        self.rules.iter_mut()
    }

    /// Drop every rule. Each dropped rule releases its matcher state and
    /// its style handle; the list itself stays usable.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    pub(crate) fn push(&mut self, rule: StyledPattern) {
        self.rules.push(rule);
    }

    pub(crate) fn find_mut(
        &mut self,
        pattern: &str,
        sensitive: bool,
    ) -> Option<&mut StyledPattern> {
        self.rules
            .iter_mut()
            .find(|rule| rule.pattern_matches(pattern, sensitive))
    }

    /// First rule whose matcher hits `text`, with the styled span.
    ///
    /// Walks in insertion order. A rule flagged stop-matching ends the
    /// walk when reached without a match. Search-expression rules never
    /// match here; their evaluation is external.
    #[must_use]
    pub fn first_match<'a>(&'a self, text: &str) -> Option<RuleMatch<'a>> {
        for rule in &self.rules {
            if let Some((start, end)) = rule.find_span(text) {
                return Some(RuleMatch { rule, start, end });
            }
            if rule.stop_matching {
                return None;
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a PatternRuleSet {
    type Item = &'a StyledPattern;
    type IntoIter = slice::Iter<'a, StyledPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
