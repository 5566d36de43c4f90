//! Display regions of the mail reader.
//!
//! A [`Region`] names one area of the terminal display. The set is closed:
//! nine regions carry an ordered list of pattern rules (see
//! [`PatternRuleSet`](crate::rules::PatternRuleSet)), the rest are styled
//! directly and carry none.

use std::fmt;

/// A named area of the terminal display.
///
/// Regions in [`Region::PATTERN_REGIONS`] own a rule list in the
/// [`RegionRegistry`](crate::registry::RegionRegistry); the remaining
/// variants exist so that lookups have a real "no list here" case.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Region {
    /// Attachment headers shown in the pager.
    AttachHeaders,
    /// Body of the message.
    Body,
    /// Message headers shown in the pager.
    Header,
    /// Default style of an index line.
    Index,
    /// Author column of the index.
    IndexAuthor,
    /// Flags column of the index.
    IndexFlags,
    /// Subject column of the index.
    IndexSubject,
    /// Tags column of the index.
    IndexTag,
    /// Status bar.
    Status,
    /// Plain text with no dedicated styling.
    Normal,
    /// Command prompt line.
    Prompt,
    /// Message signature.
    Signature,
    /// Thread tree drawn in the index.
    Tree,
}

impl Region {
    /// The regions that carry a pattern rule list, in registry order.
    pub const PATTERN_REGIONS: [Self; 9] = [
        Self::AttachHeaders,
        Self::Body,
        Self::Header,
        Self::Index,
        Self::IndexAuthor,
        Self::IndexFlags,
        Self::IndexSubject,
        Self::IndexTag,
        Self::Status,
    ];

    /// Whether this region carries a pattern rule list.
    #[must_use]
    pub const fn has_rule_set(self) -> bool {
        matches!(
            self,
            Self::AttachHeaders
                | Self::Body
                | Self::Header
                | Self::Index
                | Self::IndexAuthor
                | Self::IndexFlags
                | Self::IndexSubject
                | Self::IndexTag
                | Self::Status
        )
    }

    /// Whether this region belongs to the message index family.
    ///
    /// Index renderers cache resolved line styles, so changes to any of
    /// these regions are announced through a
    /// [`StyleEvent`](crate::event::StyleEvent).
    #[must_use]
    pub const fn is_index_family(self) -> bool {
        matches!(
            self,
            Self::Index
                | Self::IndexAuthor
                | Self::IndexFlags
                | Self::IndexSubject
                | Self::IndexTag
        )
    }

    /// Whether rules for this region compile through the search-expression
    /// language instead of a plain regex.
    ///
    /// Only the default index region matches whole messages; the other
    /// index columns match rendered text.
    #[must_use]
    pub const fn uses_search_expression(self) -> bool {
        matches!(self, Self::Index)
    }

    /// Stable name used in debug dumps and diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::AttachHeaders => "attach_headers",
            Self::Body => "body",
            Self::Header => "header",
            Self::Index => "index",
            Self::IndexAuthor => "index_author",
            Self::IndexFlags => "index_flags",
            Self::IndexSubject => "index_subject",
            Self::IndexTag => "index_tag",
            Self::Status => "status",
            Self::Normal => "normal",
            Self::Prompt => "prompt",
            Self::Signature => "signature",
            Self::Tree => "tree",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
