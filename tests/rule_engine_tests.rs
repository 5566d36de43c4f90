//! Integration tests for the rule engine.
//!
//! Covers the upsert algorithm (dedup, style-only updates, the case-fold
//! asymmetry, rollback), the dispatch front-ends, change notification,
//! palette release bookkeeping, and teardown.

use std::cell::RefCell;
use std::rc::Rc;

use regstyle::{
    AttrFlags, ColorId, Error, Matcher, Region, RuleEngine, SearchCompiler, SearchProgram,
    StyleEvent,
};

const FG1: ColorId = ColorId(1);
const FG2: ColorId = ColorId(2);
const BG: ColorId = ColorId(0);

fn upsert_plain(engine: &mut RuleEngine, region: Region, pattern: &str, sensitive: bool, fg: ColorId) {
    engine
        .upsert(region, pattern, sensitive, fg, BG, AttrFlags::empty(), false, 0)
        .unwrap();
}

// =============================================================================
// Style-only updates
// =============================================================================

#[test]
fn test_second_upsert_with_same_pattern_is_a_style_update() {
    let mut engine = RuleEngine::new();
    let palette = engine.palette();

    upsert_plain(&mut engine, Region::Body, "quoted", true, FG1);
    assert!(palette.is_active(FG1, BG));

    engine
        .upsert(Region::Body, "quoted", true, FG2, BG, AttrFlags::BOLD, false, 0)
        .unwrap();

    let rules = engine.rules(Region::Body).unwrap();
    assert_eq!(rules.len(), 1);
    let rule = rules.iter().next().unwrap();
    assert_eq!(rule.fg(), FG2);
    assert_eq!(rule.attrs(), AttrFlags::BOLD);

    // The first call's pair was fully released.
    assert!(!palette.is_active(FG1, BG));
    assert!(palette.is_active(FG2, BG));
}

#[test]
fn test_update_with_same_colors_overwrites_attrs_only() {
    let mut engine = RuleEngine::new();
    upsert_plain(&mut engine, Region::Body, "sig", true, FG1);

    engine
        .upsert(Region::Body, "sig", true, FG1, BG, AttrFlags::UNDERLINE, false, 0)
        .unwrap();

    let rules = engine.rules(Region::Body).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules.iter().next().unwrap().attrs(), AttrFlags::UNDERLINE);
}

#[test]
fn test_update_leaves_matcher_submatch_and_stop_flag_alone() {
    let mut engine = RuleEngine::new();
    let mut err = String::new();
    let rc = engine.set_status_rule(
        Region::Status,
        r"(\w+) (\d+)",
        FG1,
        BG,
        AttrFlags::empty(),
        2,
        &mut err,
    );
    assert_eq!(rc, 0);

    engine
        .rules_mut(Region::Status)
        .unwrap()
        .iter_mut()
        .next()
        .unwrap()
        .set_stop_matching(true);

    // Restyle through the plain upsert path; submatch argument differs on
    // purpose and must be ignored for an existing rule.
    engine
        .upsert(Region::Status, r"(\w+) (\d+)", true, FG2, BG, AttrFlags::BOLD, false, 0)
        .unwrap();

    let rules = engine.rules(Region::Status).unwrap();
    assert_eq!(rules.len(), 1);
    let rule = rules.iter().next().unwrap();
    assert_eq!(rule.fg(), FG2);
    assert_eq!(rule.submatch(), 2);
    assert!(rule.stop_matching());
    assert!(matches!(rule.matcher(), Matcher::Regex { .. }));
}

// =============================================================================
// Order preservation
// =============================================================================

#[test]
fn test_insertion_order_survives_interleaved_updates() {
    let mut engine = RuleEngine::new();
    upsert_plain(&mut engine, Region::Body, "p1", true, FG1);
    upsert_plain(&mut engine, Region::Body, "p2", true, FG1);
    upsert_plain(&mut engine, Region::Body, "p1", true, FG2);
    upsert_plain(&mut engine, Region::Body, "p3", true, FG1);
    upsert_plain(&mut engine, Region::Body, "p2", true, FG2);

    let rules = engine.rules(Region::Body).unwrap();
    let order: Vec<&str> = rules.iter().map(regstyle::StyledPattern::pattern).collect();
    assert_eq!(order, vec!["p1", "p2", "p3"]);
}

#[test]
fn test_first_inserted_rule_wins_at_match_time() {
    let mut engine = RuleEngine::new();
    upsert_plain(&mut engine, Region::Body, "alpha", true, FG1);
    upsert_plain(&mut engine, Region::Body, "alph", true, FG2);

    let rules = engine.rules(Region::Body).unwrap();
    let hit = rules.first_match("alphabet").unwrap();
    assert_eq!(hit.rule.pattern(), "alpha");
    assert_eq!((hit.start, hit.end), (0, 5));
}

// =============================================================================
// Dedup keyed by the call's sensitivity
// =============================================================================

#[test]
fn test_sensitive_call_treats_differently_cased_patterns_as_distinct() {
    let mut engine = RuleEngine::new();
    upsert_plain(&mut engine, Region::Body, "foo", false, FG1);
    // Sensitive compare: "FOO" != "foo", so this is a fresh entry.
    upsert_plain(&mut engine, Region::Body, "FOO", true, FG2);

    assert_eq!(engine.rules(Region::Body).unwrap().len(), 2);
}

#[test]
fn test_insensitive_call_matches_loosely_across_existing_entries() {
    let mut engine = RuleEngine::new();
    upsert_plain(&mut engine, Region::Body, "foo", false, FG1);
    upsert_plain(&mut engine, Region::Body, "FOO", true, FG2);

    // Loose compare hits the first entry in walk order; no third entry.
    engine
        .upsert(Region::Body, "FOO", false, ColorId(5), BG, AttrFlags::empty(), false, 0)
        .unwrap();

    let rules = engine.rules(Region::Body).unwrap();
    assert_eq!(rules.len(), 2);
    let first = rules.iter().next().unwrap();
    assert_eq!(first.pattern(), "foo");
    assert_eq!(first.fg(), ColorId(5));
}

#[test]
fn test_inserting_twice_insensitively_produces_one_entry() {
    let mut engine = RuleEngine::new();
    upsert_plain(&mut engine, Region::Body, "foo", false, FG1);
    upsert_plain(&mut engine, Region::Body, "foo", false, FG2);

    assert_eq!(engine.rules(Region::Body).unwrap().len(), 1);
}

#[test]
fn test_header_region_dedups_insensitively() {
    let mut engine = RuleEngine::new();
    engine
        .set_region_rule(Region::Header, "Subject:", FG1, BG, AttrFlags::empty())
        .unwrap();
    engine
        .set_region_rule(Region::Header, "subject:", FG2, BG, AttrFlags::empty())
        .unwrap();

    let rules = engine.rules(Region::Header).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules.iter().next().unwrap().fg(), FG2);
}

// =============================================================================
// Case-fold asymmetry
// =============================================================================

#[test]
fn test_all_lowercase_sensitive_pattern_folds_to_insensitive() {
    let mut engine = RuleEngine::new();
    upsert_plain(&mut engine, Region::Body, "abc", true, FG1);

    let rules = engine.rules(Region::Body).unwrap();
    let rule = rules.iter().next().unwrap();
    match rule.matcher() {
        Matcher::Regex { case_insensitive, .. } => assert!(*case_insensitive),
        Matcher::Search(_) => panic!("expected a plain regex matcher"),
    }
    assert!(rule.find_span("xxABCxx").is_some());
}

#[test]
fn test_mixed_case_sensitive_pattern_stays_sensitive() {
    let mut engine = RuleEngine::new();
    upsert_plain(&mut engine, Region::Body, "Abc", true, FG1);

    let rules = engine.rules(Region::Body).unwrap();
    let rule = rules.iter().next().unwrap();
    match rule.matcher() {
        Matcher::Regex { case_insensitive, .. } => assert!(!*case_insensitive),
        Matcher::Search(_) => panic!("expected a plain regex matcher"),
    }
    assert!(rule.find_span("Abc").is_some());
    assert!(rule.find_span("abc").is_none());
}

#[test]
fn test_insensitive_call_always_folds() {
    let mut engine = RuleEngine::new();
    upsert_plain(&mut engine, Region::Body, "MiXeD", false, FG1);

    let rule_set = engine.rules(Region::Body).unwrap();
    assert!(rule_set.first_match("mixed").is_some());
}

// =============================================================================
// Rollback on compile failure
// =============================================================================

#[test]
fn test_invalid_regex_rolls_back_cleanly() {
    let mut engine = RuleEngine::new();
    let palette = engine.palette();
    upsert_plain(&mut engine, Region::Body, "good", true, FG1);
    let pairs_before = palette.active_pairs();

    let result = engine.upsert(
        Region::Body,
        "(",
        true,
        FG2,
        BG,
        AttrFlags::empty(),
        false,
        0,
    );

    match result {
        Err(Error::RegexCompile { pattern, message }) => {
            assert_eq!(pattern, "(");
            assert!(!message.is_empty());
        }
        other => panic!("expected RegexCompile, got {other:?}"),
    }
    assert_eq!(engine.rules(Region::Body).unwrap().len(), 1);
    assert_eq!(palette.active_pairs(), pairs_before);
}

#[test]
fn test_failed_search_compile_rolls_back_and_stays_silent() {
    struct RejectAll;
    impl SearchCompiler for RejectAll {
        fn normalize(&self, pattern: &str) -> String {
            pattern.to_string()
        }
        fn compile(&self, _source: &str) -> Result<Box<dyn SearchProgram>, String> {
            Err("syntax error near '~'".to_string())
        }
    }

    let mut engine = RuleEngine::with_search(Box::new(RejectAll));
    let palette = engine.palette();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |event: &StyleEvent| sink.borrow_mut().push(*event));

    let result = engine.upsert(
        Region::Index,
        "~b broken",
        true,
        FG1,
        BG,
        AttrFlags::empty(),
        true,
        0,
    );

    match result {
        Err(Error::SearchCompile { message, .. }) => {
            assert!(message.contains("syntax error"));
        }
        other => panic!("expected SearchCompile, got {other:?}"),
    }
    assert!(engine.rules(Region::Index).unwrap().is_empty());
    assert_eq!(palette.active_pairs(), 0);
    assert!(events.borrow().is_empty());
}

// =============================================================================
// Change notification
// =============================================================================

#[test]
fn test_index_family_upsert_publishes_one_event() {
    let mut engine = RuleEngine::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |event: &StyleEvent| sink.borrow_mut().push(*event));

    engine
        .set_region_rule(Region::IndexAuthor, "mailing-list", FG1, BG, AttrFlags::empty())
        .unwrap();

    let seen = events.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], StyleEvent::style_set_changed(Region::IndexAuthor));
}

#[test]
fn test_body_upsert_publishes_nothing() {
    let mut engine = RuleEngine::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |event: &StyleEvent| sink.borrow_mut().push(*event));

    engine
        .set_region_rule(Region::Body, "quoted", FG1, BG, AttrFlags::empty())
        .unwrap();

    assert!(events.borrow().is_empty());
}

#[test]
fn test_style_only_update_still_notifies_index_regions() {
    let mut engine = RuleEngine::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    engine.subscribe(move |event: &StyleEvent| sink.borrow_mut().push(*event));

    upsert_plain(&mut engine, Region::IndexSubject, "urgent", true, FG1);
    upsert_plain(&mut engine, Region::IndexSubject, "urgent", true, FG2);

    assert_eq!(events.borrow().len(), 2);
}

// =============================================================================
// Index rules go through the search collaborator
// =============================================================================

#[test]
fn test_index_rule_compiles_as_a_search_expression() {
    let mut engine = RuleEngine::new();
    engine
        .set_region_rule(Region::Index, "wiz", FG1, BG, AttrFlags::BOLD)
        .unwrap();

    let rules = engine.rules(Region::Index).unwrap();
    assert_eq!(rules.len(), 1);
    let rule = rules.iter().next().unwrap();
    let program = rule.matcher().as_search().expect("index rules use search programs");
    assert_eq!(program.source(), "~f wiz | ~s wiz");

    // Search rules are resolved against messages, never against text.
    assert!(rules.first_match("wiz").is_none());
}

#[test]
fn test_other_index_columns_compile_as_plain_regexes() {
    let mut engine = RuleEngine::new();
    engine
        .set_region_rule(Region::IndexAuthor, "lists", FG1, BG, AttrFlags::empty())
        .unwrap();

    let rules = engine.rules(Region::IndexAuthor).unwrap();
    assert!(matches!(
        rules.iter().next().unwrap().matcher(),
        Matcher::Regex { .. }
    ));
}

// =============================================================================
// Status front-end
// =============================================================================

#[test]
fn test_status_front_end_rejects_other_regions() {
    let mut engine = RuleEngine::new();
    let mut err = String::new();
    let rc = engine.set_status_rule(Region::Body, "x", FG1, BG, AttrFlags::empty(), 0, &mut err);
    assert_eq!(rc, -1);
    assert!(engine.rules(Region::Body).unwrap().is_empty());
}

#[test]
fn test_status_rule_styles_the_selected_submatch() {
    let mut engine = RuleEngine::new();
    let mut err = String::new();
    let rc = engine.set_status_rule(
        Region::Status,
        r"-\((\d+)\)-",
        FG1,
        BG,
        AttrFlags::REVERSE,
        1,
        &mut err,
    );
    assert_eq!(rc, 0);
    assert!(err.is_empty());

    let rules = engine.rules(Region::Status).unwrap();
    let hit = rules.first_match("mailbox -(42)- all").unwrap();
    assert_eq!(&"mailbox -(42)- all"[hit.start..hit.end], "42");
}

#[test]
fn test_status_front_end_reports_compile_failures_in_the_buffer() {
    let mut engine = RuleEngine::new();
    let mut err = String::new();
    let rc = engine.set_status_rule(Region::Status, "(", FG1, BG, AttrFlags::empty(), 0, &mut err);
    assert_eq!(rc, -1);
    assert!(err.contains("invalid regex"));
    assert!(engine.rules(Region::Status).unwrap().is_empty());
}

// =============================================================================
// Region dispatch
// =============================================================================

#[test]
fn test_list_front_end_rejects_regions_without_lists() {
    let mut engine = RuleEngine::new();
    for region in [Region::Normal, Region::Prompt, Region::Signature, Region::Tree] {
        let result = engine.set_region_rule(region, "x", FG1, BG, AttrFlags::empty());
        assert!(matches!(result, Err(Error::UnknownRegion(r)) if r == region));
    }
}

// =============================================================================
// Teardown
// =============================================================================

#[test]
fn test_clear_all_empties_every_region_and_releases_the_palette() {
    let mut engine = RuleEngine::new();
    let palette = engine.palette();
    let mut err = String::new();

    engine
        .set_region_rule(Region::Body, "quoted", FG1, BG, AttrFlags::empty())
        .unwrap();
    engine
        .set_region_rule(Region::Header, "From:", FG2, BG, AttrFlags::BOLD)
        .unwrap();
    engine
        .set_region_rule(Region::Index, "old", ColorId(3), BG, AttrFlags::empty())
        .unwrap();
    engine.set_status_rule(Region::Status, "ok", ColorId(4), BG, AttrFlags::empty(), 0, &mut err);
    assert!(palette.active_pairs() > 0);

    engine.clear_all();

    for region in Region::PATTERN_REGIONS {
        assert!(engine.rules(region).unwrap().is_empty(), "{region} not empty");
    }
    assert_eq!(palette.active_pairs(), 0);

    // The engine is immediately reusable.
    engine
        .set_region_rule(Region::Body, "fresh", FG1, BG, AttrFlags::empty())
        .unwrap();
    assert_eq!(engine.rules(Region::Body).unwrap().len(), 1);
}

#[test]
fn test_clear_all_before_any_upsert_is_safe() {
    let mut engine = RuleEngine::new();
    engine.clear_all();
    engine.clear_all();
    assert!(engine.rules(Region::Body).unwrap().is_empty());
}

// =============================================================================
// Palette sharing
// =============================================================================

#[test]
fn test_rules_with_identical_colors_share_one_pair() {
    let mut engine = RuleEngine::new();
    let palette = engine.palette();

    upsert_plain(&mut engine, Region::Body, "one", true, FG1);
    upsert_plain(&mut engine, Region::Header, "two", false, FG1);

    assert_eq!(palette.active_pairs(), 1);
    assert_eq!(palette.ref_count(FG1, BG), 2);
}
