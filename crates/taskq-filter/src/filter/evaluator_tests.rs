//! Tests for evaluating parsed filters against records.

use chrono::NaiveDate;

use super::*;

#[derive(Debug, Default)]
struct Item {
    name: String,
    tags: Vec<String>,
    deadline: Option<NaiveDate>,
    priority: Option<i64>,
}

impl Record for Item {
    fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        match field {
            "name" => Some(FieldValue::Text(&self.name)),
            "tag" => Some(FieldValue::TextSet(&self.tags)),
            "deadline" => self.deadline.map(FieldValue::Date),
            "priority" => self.priority.map(FieldValue::Number),
            _ => None,
        }
    }
}

fn schema() -> Schema {
    Schema::new()
        .with_field(FieldSpec::new("name", FieldKind::Text).set_filterable(true))
        .with_field(FieldSpec::new("tag", FieldKind::TextSet).set_filterable(true))
        .with_field(
            FieldSpec::new("deadline", FieldKind::Date).with_convenience(FilterOperator::Equal),
        )
        .with_field(FieldSpec::new("priority", FieldKind::Number))
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2026, 10, 16)
}

fn make_item(name: &str) -> Item {
    Item {
        name: name.to_string(),
        ..Default::default()
    }
}

fn tagged(tags: &[&str]) -> Item {
    Item {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

fn matches(query: &str, item: &Item) -> bool {
    let schema = schema();
    let predicate = FilterParser::with_reference_date(&schema, today())
        .parse(query)
        .unwrap_or_else(|e| panic!("{query:?} failed: {e}"));
    predicate.evaluate(item)
}

// ==================== Text Operator Tests ====================

#[test]
fn test_tag_greater_matches_when_phrase_contains_value() {
    assert!(matches("tag>ab", &tagged(&["a"])));
}

#[test]
fn test_tag_greater_matches_when_value_contains_phrase() {
    assert!(matches("tag>wo", &tagged(&["world"])));
    assert!(!matches("tag>wo", &tagged(&["hi"])));
}

#[test]
fn test_tag_less_is_substring_of_value() {
    assert!(matches("tag<ab", &tagged(&["abcd"])));
    assert!(!matches("tag<ab", &tagged(&["xy"])));
    assert!(!matches("tag<ab", &tagged(&["a"])));
}

#[test]
fn test_tag_equal_is_exact_case_insensitive() {
    assert!(matches("tag=ab", &tagged(&["AB"])));
    assert!(matches("tag=AB", &tagged(&["ab"])));
    assert!(!matches("tag=ab", &tagged(&["abc"])));
    assert!(!matches("tag=ab", &tagged(&["a"])));
}

#[test]
fn test_tag_set_matches_any_element() {
    let item = tagged(&["home", "Errands"]);
    assert!(matches("tag=errands", &item));
    assert!(!matches("tag=work", &item));
    assert!(!matches("tag>x", &tagged(&[])));
}

#[test]
fn test_name_convenience_is_loose_match() {
    assert!(matches("name milk", &make_item("Buy milk")));
    assert!(matches("name 'buy milk today'", &make_item("Buy milk")));
    assert!(!matches("name bread", &make_item("Buy milk")));
}

#[test]
fn test_empty_value_never_loosely_matches() {
    assert!(!matches("name>x", &make_item("")));
    assert!(!matches("name<x", &make_item("")));
}

// ==================== Ordered Field Tests ====================

#[test]
fn test_priority_comparisons() {
    let item = Item {
        priority: Some(3),
        ..Default::default()
    };
    assert!(matches("priority=3", &item));
    assert!(matches("priority<5", &item));
    assert!(!matches("priority<3", &item));
    assert!(matches("priority>2", &item));
    assert!(!matches("priority>3", &item));
    assert!(matches("priority>-1", &item));
}

#[test]
fn test_deadline_comparisons() {
    let item = Item {
        deadline: Some(date(2026, 10, 17)),
        ..Default::default()
    };
    assert!(matches("deadline tomorrow", &item));
    assert!(matches("deadline=2026-10-17", &item));
    assert!(!matches("deadline today", &item));
    assert!(matches("deadline>today", &item));
    assert!(matches("deadline<+3d", &item));
    assert!(!matches("deadline<yesterday", &item));
}

#[test]
fn test_missing_value_never_matches() {
    let item = make_item("no deadline");
    assert!(!matches("deadline today", &item));
    assert!(!matches("deadline<+100d", &item));
    assert!(!matches("priority>0", &item));
    assert!(matches("!deadline today", &item));
}

#[test]
fn test_kind_mismatch_is_false() {
    struct Odd;
    impl Record for Odd {
        fn field_value(&self, _field: &str) -> Option<FieldValue<'_>> {
            Some(FieldValue::Text("3"))
        }
    }

    let schema = schema();
    let predicate = FilterParser::with_reference_date(&schema, today())
        .parse("priority=3")
        .unwrap();
    assert!(!predicate.evaluate(&Odd));
}

// ==================== Phrase Set Tests ====================

#[test]
fn test_phrase_set_matches_any_phrase() {
    assert!(matches("tag=[home work]", &tagged(&["Work"])));
    assert!(!matches("tag=[home work]", &tagged(&["play"])));
    assert!(matches("tag [ho wo]", &tagged(&["world"])));
    assert!(matches(
        r#"name=["buy milk" "call mom"]"#,
        &make_item("Call Mom")
    ));
}

// ==================== Boolean Tests ====================

#[test]
fn test_and_or_not() {
    let item = Item {
        name: "Report".to_string(),
        tags: vec!["work".to_string()],
        priority: Some(1),
        deadline: None,
    };
    assert!(matches("tag=work && priority=1", &item));
    assert!(!matches("tag=work && priority=2", &item));
    assert!(matches("tag=home || priority=1", &item));
    assert!(!matches("tag=home || priority=2", &item));
    assert!(matches("!tag=home", &item));
    assert!(!matches("!(tag=work || tag=home)", &item));
    assert!(matches("!!tag=work", &item));
}

#[test]
fn test_precedence_affects_result() {
    let item = Item {
        name: "x".to_string(),
        priority: Some(5),
        ..Default::default()
    };
    // (false && false) || true
    assert!(matches("name=a && name=b || priority=5", &item));
    // false && (false || true)
    assert!(!matches("name=a && (name=b || priority=5)", &item));
}

#[test]
fn test_tag_and_priority_scenario() {
    let world = Item {
        tags: vec!["world".to_string()],
        priority: Some(3),
        ..Default::default()
    };
    let hi = Item {
        tags: vec!["hi".to_string()],
        priority: Some(3),
        ..Default::default()
    };
    assert!(matches("tag>wo && priority<5", &world));
    assert!(!matches("tag>wo && priority<5", &hi));
}

#[test]
fn test_evaluation_is_idempotent() {
    let schema = schema();
    let predicate = FilterParser::with_reference_date(&schema, today())
        .parse("tag>wo && priority<5 || !name=x")
        .unwrap();
    let item = Item {
        tags: vec!["world".to_string()],
        priority: Some(3),
        ..Default::default()
    };
    let first = predicate.evaluate(&item);
    for _ in 0..3 {
        assert_eq!(predicate.evaluate(&item), first);
    }
}

// ==================== FilterEvaluator Tests ====================

#[test]
fn test_filter_records_and_count() {
    let schema = schema();
    let predicate = FilterParser::with_reference_date(&schema, today())
        .parse("name<milk")
        .unwrap();
    let items = vec![
        make_item("Buy milk"),
        make_item("Call mom"),
        make_item("Milk the cow"),
    ];

    let evaluator = FilterEvaluator::new(&predicate);
    let found = evaluator.filter_records(&items);
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].name, "Buy milk");
    assert_eq!(found[1].name, "Milk the cow");
    assert_eq!(evaluator.count(&items), 2);
    assert!(evaluator.matches(&items[0]));
}

#[test]
fn test_evaluate_through_trait_object() {
    let schema = schema();
    let predicate = FilterParser::with_reference_date(&schema, today())
        .parse("name=x")
        .unwrap();
    let item = make_item("X");
    let record: &dyn Record = &item;
    assert!(predicate.evaluate(record));
    assert!(FilterEvaluator::new(&predicate).matches(record));
}

#[test]
fn test_evaluate_longest_chains() {
    let item = make_item("a");

    let all = vec!["name=a"; MAX_FIELD_TESTS].join("&&");
    assert!(matches(&all, &item));

    let mut any = vec!["name=b"; MAX_FIELD_TESTS - 1];
    any.push("name=a");
    assert!(matches(&any.join("||"), &item));

    let schema = schema();
    let predicate = FilterParser::with_reference_date(&schema, today())
        .parse(&all)
        .unwrap();
    assert!(predicate.to_string().starts_with("((("));
    assert!(!predicate.describe().is_empty());
}
