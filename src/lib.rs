//! Regex-to-style association for terminal mail display regions.
//!
//! Each display [`Region`] of the reader (message body, headers, the
//! index columns, the status bar) carries an ordered list of
//! pattern-matched style rules. This crate maintains those lists:
//! it deduplicates and restyles rules in place, compiles plain regexes
//! for most regions and search expressions for the default index region,
//! and announces changes so that cached index renderings can be
//! invalidated. Rendering itself lives elsewhere and only walks the lists
//! this crate resolves.
//!
//! ```
//! use regstyle::{AttrFlags, ColorId, Region, RuleEngine};
//!
//! let mut engine = RuleEngine::new();
//!
//! // "color body green default ^>.*" from the command layer.
//! engine.set_region_rule(Region::Body, "^>.*", ColorId(2), ColorId(0), AttrFlags::empty())?;
//!
//! let rules = engine.rules(Region::Body).unwrap();
//! assert_eq!(rules.len(), 1);
//! assert!(rules.first_match("> quoted text").is_some());
//! # Ok::<(), regstyle::Error>(())
//! ```

// Crate-level lint configuration
#![allow(clippy::module_name_repetitions)] // Allow Region::PATTERN_REGIONS etc
#![allow(clippy::missing_errors_doc)] // Error conditions documented where non-obvious
#![allow(clippy::must_use_candidate)] // Accessors are obviously pure
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference

pub mod engine;
pub mod error;
pub mod event;
pub mod palette;
pub mod region;
pub mod registry;
pub mod rules;
pub mod search;
pub mod style;

// Re-export core types at crate root
pub use engine::RuleEngine;
pub use error::{Error, Result};
pub use event::{LogLevel, Notifier, StyleEvent, StyleEventKind, emit_log, set_log_callback};
pub use palette::{ColorId, Palette, StyleHandle};
pub use region::Region;
pub use registry::RegionRegistry;
pub use rules::{Matcher, PatternRuleSet, RuleMatch, StyledPattern};
pub use search::{SearchCompiler, SearchProgram, SimpleSearch};
pub use style::AttrFlags;
