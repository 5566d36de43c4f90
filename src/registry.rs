//! Region-to-rule-list registry.

use crate::region::Region;
use crate::rules::PatternRuleSet;

/// Owns one ordered rule list per pattern-bearing region.
///
/// Created with every list empty. On reset the lists are emptied, not
/// dropped, so the registry stays valid and reusable for the life of the
/// engine; clearing a registry that was never populated is a no-op.
#[derive(Debug, Default)]
pub struct RegionRegistry {
    attach_headers: PatternRuleSet,
    body: PatternRuleSet,
    header: PatternRuleSet,
    index: PatternRuleSet,
    index_author: PatternRuleSet,
    index_flags: PatternRuleSet,
    index_subject: PatternRuleSet,
    index_tag: PatternRuleSet,
    status: PatternRuleSet,
}

impl RegionRegistry {
    /// Registry with all rule lists empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rule list for `region`, or `None` for regions that carry none.
    #[must_use]
    pub fn rules(&self, region: Region) -> Option<&PatternRuleSet> {
        match region {
            Region::AttachHeaders => Some(&self.attach_headers),
            Region::Body => Some(&self.body),
            Region::Header => Some(&self.header),
            Region::Index => Some(&self.index),
            Region::IndexAuthor => Some(&self.index_author),
            Region::IndexFlags => Some(&self.index_flags),
            Region::IndexSubject => Some(&self.index_subject),
            Region::IndexTag => Some(&self.index_tag),
            Region::Status => Some(&self.status),
            _ => None,
        }
    }

    /// Mutable rule list for `region`, or `None` for regions that carry
    /// none.
    pub fn rules_mut(&mut self, region: Region) -> Option<&mut PatternRuleSet> {
        match region {
            Region::AttachHeaders => Some(&mut self.attach_headers),
            Region::Body => Some(&mut self.body),
            Region::Header => Some(&mut self.header),
            Region::Index => Some(&mut self.index),
            Region::IndexAuthor => Some(&mut self.index_author),
            Region::IndexFlags => Some(&mut self.index_flags),
            Region::IndexSubject => Some(&mut self.index_subject),
            Region::IndexTag => Some(&mut self.index_tag),
            Region::Status => Some(&mut self.status),
            _ => None,
        }
    }

    /// Empty every rule list.
    pub fn clear_all(&mut self) {
        for region in Region::PATTERN_REGIONS {
            if let Some(rules) = self.rules_mut(region) {
                rules.clear();
            }
        }
    }

    /// Total rules across all regions.
    #[must_use]
    pub fn total_rules(&self) -> usize {
        Region::PATTERN_REGIONS
            .iter()
            .filter_map(|&region| self.rules(region))
            .map(PatternRuleSet::len)
            .sum()
    }
}
