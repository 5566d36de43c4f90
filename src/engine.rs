//! The rule engine: upsert, per-region dispatch, and change notification.
//!
//! [`RuleEngine`] is the surface the command layer calls. It owns the
//! [`RegionRegistry`], a [`Palette`] view, the search-expression
//! collaborator, and the change [`Notifier`]; everything else in the
//! crate is reached through it.
//!
//! # Examples
//!
//! ```
//! use regstyle::{AttrFlags, ColorId, Region, RuleEngine};
//!
//! let mut engine = RuleEngine::new();
//! engine.set_region_rule(Region::Body, r"^-- $", ColorId(4), ColorId(0), AttrFlags::BOLD)?;
//!
//! let rules = engine.rules(Region::Body).unwrap();
//! let hit = rules.first_match("-- ").unwrap();
//! assert_eq!(hit.rule.fg(), ColorId(4));
//! # Ok::<(), regstyle::Error>(())
//! ```

use regex::RegexBuilder;

use crate::error::{Error, Result};
use crate::event::{LogLevel, Notifier, StyleEvent, emit_log};
use crate::palette::{ColorId, Palette};
use crate::region::Region;
use crate::registry::RegionRegistry;
use crate::rules::{Matcher, PatternRuleSet, StyledPattern};
use crate::search::{SearchCompiler, SimpleSearch};
use crate::style::AttrFlags;

/// The historical fold gate: a case-sensitive pattern still folds when it
/// contains no uppercase characters at all.
fn is_all_lowercase(s: &str) -> bool {
    !s.chars().any(char::is_uppercase)
}

/// Regex-to-style association engine for the display regions.
///
/// Construct one per process (or per test), populate it from the command
/// layer, and hand renderers read access through [`RuleEngine::rules`].
pub struct RuleEngine {
    registry: RegionRegistry,
    palette: Palette,
    search: Box<dyn SearchCompiler>,
    notifier: Notifier,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    /// Engine with a fresh palette and the default search collaborator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_search(Box::new(SimpleSearch::default()))
    }

    /// Engine using the given search-expression compiler for index rules.
    #[must_use]
    pub fn with_search(search: Box<dyn SearchCompiler>) -> Self {
        emit_log(LogLevel::Debug, "init region rule lists");
        Self {
            registry: RegionRegistry::new(),
            palette: Palette::new(),
            search,
            notifier: Notifier::new(),
        }
    }

    /// Shared view of the engine's palette.
    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palette.clone()
    }

    /// Rule list for `region`, if it carries one.
    #[must_use]
    pub fn rules(&self, region: Region) -> Option<&PatternRuleSet> {
        self.registry.rules(region)
    }

    /// Mutable rule list for `region`, e.g. for the pager's
    /// stop-matching bookkeeping.
    pub fn rules_mut(&mut self, region: Region) -> Option<&mut PatternRuleSet> {
        self.registry.rules_mut(region)
    }

    /// Register an observer for rule-set change events.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&StyleEvent) + 'static,
    {
        self.notifier.subscribe(callback);
    }

    /// Empty every region's rule list, releasing all matchers and style
    /// handles. Safe to call at teardown even if nothing was ever added.
    pub fn clear_all(&mut self) {
        emit_log(LogLevel::Debug, "clear region rule lists");
        self.registry.clear_all();
    }

    /// Add a rule to `region`, or restyle the existing rule with the same
    /// pattern.
    ///
    /// Deduplication compares this call's `pattern` against stored rules
    /// under this call's `sensitive` flag. A hit is a style-only update:
    /// the color pair is reacquired only if (fg, bg) changed, the
    /// attribute mask is overwritten unconditionally, and the matcher,
    /// submatch, and stop flag stay untouched. A miss compiles a new
    /// matcher and appends at the tail.
    ///
    /// With `search_kind` set, the pattern is normalized and compiled by
    /// the search-expression collaborator instead of the regex engine.
    /// Otherwise the regex is folded to case-insensitive when the call is
    /// insensitive, or when a sensitive call's pattern contains no
    /// uppercase characters.
    ///
    /// Any change to an index-family region publishes one
    /// `StyleSetChanged` event after the mutation lands.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownRegion`] if `region` carries no rule list;
    /// [`Error::RegexCompile`] / [`Error::SearchCompile`] if a new rule's
    /// pattern does not compile. On error the rule list is unchanged and
    /// nothing stays allocated.
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    pub fn upsert(
        &mut self,
        region: Region,
        pattern: &str,
        sensitive: bool,
        fg: ColorId,
        bg: ColorId,
        attrs: AttrFlags,
        search_kind: bool,
        submatch: usize,
    ) -> Result<()> {
        let rules = self
            .registry
            .rules_mut(region)
            .ok_or(Error::UnknownRegion(region))?;

        if let Some(rule) = rules.find_mut(pattern, sensitive) {
            if rule.style().pair() != (fg, bg) {
                rule.set_style(self.palette.acquire(fg, bg));
            }
            rule.set_attrs(attrs);
        } else {
            let matcher = if search_kind {
                let source = self.search.normalize(pattern);
                let program =
                    self.search
                        .compile(&source)
                        .map_err(|message| Error::SearchCompile {
                            pattern: pattern.to_string(),
                            message,
                        })?;
                Matcher::Search(program)
            } else {
                let fold = if sensitive {
                    is_all_lowercase(pattern)
                } else {
                    true
                };
                let regex = RegexBuilder::new(pattern)
                    .case_insensitive(fold)
                    .build()
                    .map_err(|e| Error::RegexCompile {
                        pattern: pattern.to_string(),
                        message: e.to_string(),
                    })?;
                Matcher::Regex {
                    regex,
                    case_insensitive: fold,
                }
            };
            let style = self.palette.acquire(fg, bg);
            rules.push(StyledPattern::new(
                pattern.to_string(),
                matcher,
                submatch,
                style,
                attrs,
            ));
        }

        if region.is_index_family() {
            self.notifier.send(&StyleEvent::style_set_changed(region));
        }
        Ok(())
    }

    /// Upsert a rule into one of the pattern-bearing regions other than
    /// the status bar.
    ///
    /// Sensitivity and compilation kind are fixed per region: header
    /// matching is case-insensitive, everything else sensitive, and only
    /// the default index region compiles through the search-expression
    /// language. On success the full rule table is re-dumped to the debug
    /// log.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownRegion`] for the status bar and for regions that
    /// carry no rule list; otherwise as [`RuleEngine::upsert`].
    pub fn set_region_rule(
        &mut self,
        region: Region,
        pattern: &str,
        fg: ColorId,
        bg: ColorId,
        attrs: AttrFlags,
    ) -> Result<()> {
        let sensitive = match region {
            Region::Header => false,
            Region::AttachHeaders
            | Region::Body
            | Region::Index
            | Region::IndexAuthor
            | Region::IndexFlags
            | Region::IndexSubject
            | Region::IndexTag => true,
            _ => return Err(Error::UnknownRegion(region)),
        };
        self.upsert(
            region,
            pattern,
            sensitive,
            fg,
            bg,
            attrs,
            region.uses_search_expression(),
            0,
        )?;
        self.dump_all();
        Ok(())
    }

    /// Upsert a status-bar rule, selecting which capture group receives
    /// the style.
    ///
    /// Returns `0` on success, `-1` if `region` is not the status bar or
    /// if the pattern does not compile; on compile failure the diagnostic
    /// is written into `err`. The numeric shape feeds a command parser
    /// that speaks status codes rather than results.
    #[allow(clippy::too_many_arguments)]
    pub fn set_status_rule(
        &mut self,
        region: Region,
        pattern: &str,
        fg: ColorId,
        bg: ColorId,
        attrs: AttrFlags,
        submatch: usize,
        err: &mut String,
    ) -> i32 {
        if region != Region::Status {
            return -1;
        }
        match self.upsert(Region::Status, pattern, true, fg, bg, attrs, false, submatch) {
            Ok(()) => {
                self.dump_all();
                0
            }
            Err(e) => {
                err.clear();
                err.push_str(&e.to_string());
                -1
            }
        }
    }

    /// Emit the entire rule table through the debug log callback.
    pub fn dump_all(&self) {
        emit_log(LogLevel::Debug, "rule table dump");
        for region in Region::PATTERN_REGIONS {
            let Some(rules) = self.registry.rules(region) else {
                continue;
            };
            emit_log(
                LogLevel::Debug,
                &format!("{region}: {} rule(s)", rules.len()),
            );
            for rule in rules {
                emit_log(
                    LogLevel::Debug,
                    &format!(
                        "  '{}' fg={} bg={} attrs={:?} submatch={}",
                        rule.pattern(),
                        rule.fg(),
                        rule.bg(),
                        rule.attrs(),
                        rule.submatch()
                    ),
                );
            }
        }
    }
}
