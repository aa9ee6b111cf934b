//! Tests for the filter parser.

use chrono::NaiveDate;

use super::*;

fn is_tag(phrase: &str) -> bool {
    !phrase.is_empty()
        && phrase
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
}

fn schema() -> Schema {
    Schema::new()
        .with_field(
            FieldSpec::new("name", FieldKind::Text)
                .with_alias("title")
                .set_filterable(true),
        )
        .with_field(
            FieldSpec::new("tag", FieldKind::TextSet)
                .with_alias("t")
                .set_filterable(true)
                .with_validator(is_tag, "letters, digits, '-' or '_'"),
        )
        .with_field(
            FieldSpec::new("deadline", FieldKind::Date).with_convenience(FilterOperator::Equal),
        )
        .with_field(FieldSpec::new("priority", FieldKind::Number))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn parse_ok(query: &str) -> Predicate {
    let schema = schema();
    FilterParser::with_reference_date(&schema, today())
        .parse(query)
        .unwrap_or_else(|e| panic!("{query:?} failed: {e}"))
}

fn parse_err(query: &str) -> FilterError {
    let schema = schema();
    match FilterParser::with_reference_date(&schema, today()).parse(query) {
        Ok(predicate) => panic!("{query:?} parsed as {predicate}"),
        Err(e) => e,
    }
}

fn leaf(predicate: &Predicate) -> &FieldPredicate {
    match predicate {
        Predicate::Field(leaf) => leaf,
        other => panic!("expected a field test, got {other}"),
    }
}

// ==================== Field Test Tests ====================

#[test]
fn test_parse_field_with_each_operator() {
    let cases = [
        ("name=milk", FilterOperator::Equal),
        ("name<milk", FilterOperator::Less),
        ("name>milk", FilterOperator::Greater),
        ("name milk", FilterOperator::Convenience),
    ];
    for (query, operator) in cases {
        let predicate = parse_ok(query);
        let test = leaf(&predicate);
        assert_eq!(test.field(), "name");
        assert_eq!(test.operator(), operator, "{query}");
        assert_eq!(test.phrases(), &["milk".to_string()]);
    }
}

#[test]
fn test_parse_field_aliases_and_case() {
    assert_eq!(leaf(&parse_ok("t>wo")).field(), "tag");
    assert_eq!(leaf(&parse_ok("TAG>wo")).field(), "tag");
    assert_eq!(leaf(&parse_ok("Title=x")).field(), "name");
}

#[test]
fn test_parse_quoted_phrase() {
    let predicate = parse_ok(r#"name="buy milk""#);
    assert_eq!(leaf(&predicate).phrases(), &["buy milk".to_string()]);

    let predicate = parse_ok("name 'a (b) && c'");
    assert_eq!(leaf(&predicate).phrases(), &["a (b) && c".to_string()]);
}

#[test]
fn test_parse_whitespace_tolerance() {
    assert_eq!(
        parse_ok("  tag>wo&&priority<5  "),
        parse_ok("tag>wo && priority<5")
    );
    assert_eq!(parse_ok("tag = wo"), parse_ok("tag=wo"));
    assert_eq!(parse_ok("(tag>wo)"), parse_ok("tag>wo"));
}

#[test]
fn test_parse_date_phrases() {
    let predicate = parse_ok("deadline today");
    let test = leaf(&predicate);
    assert_eq!(test.operator(), FilterOperator::Convenience);
    assert_eq!(test.effective_operator(), FilterOperator::Equal);
    assert_eq!(test.values(), &[TestValue::Date(today())]);

    let predicate = parse_ok("deadline<+7d");
    assert_eq!(
        leaf(&predicate).values(),
        &[TestValue::Date(NaiveDate::from_ymd_opt(2026, 10, 23).unwrap())]
    );
}

// ==================== Boolean Structure Tests ====================

#[test]
fn test_parse_and() {
    let predicate = parse_ok("tag>wo && priority<5");
    assert!(matches!(predicate, Predicate::And(_, _)));
}

#[test]
fn test_parse_or() {
    let predicate = parse_ok("tag>wo || priority<5");
    assert!(matches!(predicate, Predicate::Or(_, _)));
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        parse_ok("name=a && name=b || name=c"),
        parse_ok("(name=a && name=b) || name=c")
    );
    assert_eq!(
        parse_ok("name=a || name=b && name=c"),
        parse_ok("name=a || (name=b && name=c)")
    );
}

#[test]
fn test_not_binds_tighter_than_and() {
    let predicate = parse_ok("!name=a && name=b");
    assert_eq!(predicate, parse_ok("(!name=a) && name=b"));
    match predicate {
        Predicate::And(left, _) => assert!(matches!(*left, Predicate::Not(_))),
        other => panic!("expected And, got {other}"),
    }
}

#[test]
fn test_binary_operators_are_left_associative() {
    let predicate = parse_ok("name=a && name=b && name=c");
    match predicate {
        Predicate::And(left, right) => {
            assert!(matches!(*left, Predicate::And(_, _)));
            assert!(matches!(*right, Predicate::Field(_)));
        }
        other => panic!("expected And, got {other}"),
    }
}

#[test]
fn test_double_negation() {
    let predicate = parse_ok("!!name=a");
    match predicate {
        Predicate::Not(inner) => assert!(matches!(*inner, Predicate::Not(_))),
        other => panic!("expected Not, got {other}"),
    }
}

#[test]
fn test_parentheses_override_precedence() {
    let predicate = parse_ok("(name=a || name=b) && name=c");
    match predicate {
        Predicate::And(left, _) => assert!(matches!(*left, Predicate::Or(_, _))),
        other => panic!("expected And, got {other}"),
    }
}

#[test]
fn test_phrase_stops_before_parenthesis() {
    let predicate = parse_ok("(tag>wo)&&(priority<5)");
    assert_eq!(predicate.to_string(), "(tag>wo && priority<5)");
}

#[test]
fn test_nesting_limit() {
    let ok = format!("{}name=a", "!".repeat(MAX_NESTING_DEPTH));
    parse_ok(&ok);

    let err = parse_err(&format!("{}name=a", "!".repeat(MAX_NESTING_DEPTH + 1)));
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert!(err.to_string().contains("nested too deeply"));

    let deep = format!(
        "{}name=a{}",
        "(".repeat(MAX_NESTING_DEPTH + 1),
        ")".repeat(MAX_NESTING_DEPTH + 1)
    );
    assert_eq!(parse_err(&deep).kind(), FilterErrorKind::BooleanExpression);
}

#[test]
fn test_field_test_limit() {
    let longest = vec!["name=a"; MAX_FIELD_TESTS].join("&&");
    let predicate = parse_ok(&longest);
    assert_eq!(predicate.leaves().len(), MAX_FIELD_TESTS);

    let mixed = vec!["name=a"; MAX_FIELD_TESTS].join(" || ");
    assert_eq!(parse_ok(&mixed).leaves().len(), MAX_FIELD_TESTS);

    let too_long = vec!["name=a"; MAX_FIELD_TESTS + 1].join("&&");
    let err = parse_err(&too_long);
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(err.position(), 8 * MAX_FIELD_TESTS);
    assert!(err.to_string().starts_with("Too many field tests"));

    let huge = vec!["name=a"; 30_000].join("&&");
    assert_eq!(parse_err(&huge).kind(), FilterErrorKind::BooleanExpression);
}

// ==================== Phrase Set Tests ====================

#[test]
fn test_parse_phrase_set() {
    let predicate = parse_ok(r#"name=[milk "oat bread"]"#);
    let test = leaf(&predicate);
    assert!(test.is_set());
    assert_eq!(
        test.phrases(),
        &["milk".to_string(), "oat bread".to_string()]
    );

    let predicate = parse_ok("tag [home work]");
    assert_eq!(leaf(&predicate).operator(), FilterOperator::Convenience);
}

#[test]
fn test_phrase_set_inside_group() {
    let predicate = parse_ok("(tag=[home work]) || name=x");
    assert!(matches!(predicate, Predicate::Or(_, _)));
}

#[test]
fn test_phrase_set_errors() {
    assert_eq!(parse_err("tag>[a b]").kind(), FilterErrorKind::InvalidSetOperator);
    assert_eq!(parse_err("priority=[1 2]").kind(), FilterErrorKind::InvalidSetKey);

    let err = parse_err("tag=[]");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(err.to_string(), "Empty phrase set for field tag at position 4");

    let err = parse_err("tag=[a b");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert!(err.to_string().starts_with("Missing ']' at position 8"));
}

// ==================== Error Tests ====================

#[test]
fn test_unknown_field() {
    let err = parse_err("unknownfield=foo");
    assert_eq!(err.kind(), FilterErrorKind::InvalidKey);
    assert_eq!(err.position(), 0);
    assert_eq!(err.to_string(), "Unknown field unknownfield at position 0");
}

#[test]
fn test_unknown_field_inside_expression() {
    let err = parse_err("tag>wo && priorty<5");
    assert_eq!(err.kind(), FilterErrorKind::InvalidKey);
    assert_eq!(err.position(), 10);
    assert_eq!(
        err.to_string(),
        "Unknown field priorty at position 10. Did you mean priority?"
    );
}

#[test]
fn test_unknown_operator() {
    let err = parse_err("name=>x");
    assert_eq!(err.kind(), FilterErrorKind::InvalidOperator);
    assert_eq!(err.position(), 4);
}

#[test]
fn test_field_without_convenience_needs_operator() {
    let err = parse_err("priority 3");
    assert_eq!(err.kind(), FilterErrorKind::InvalidOperator);
    assert_eq!(
        err.to_string(),
        "Field priority needs an operator at position 9. Supported: =, <, >."
    );
}

#[test]
fn test_invalid_phrases() {
    let err = parse_err("deadline=soon");
    assert_eq!(err.kind(), FilterErrorKind::InvalidTestPhrase);
    assert_eq!(err.position(), 9);

    let err = parse_err("priority<high");
    assert_eq!(err.kind(), FilterErrorKind::InvalidTestPhrase);

    let err = parse_err("tag='two words'");
    assert_eq!(err.kind(), FilterErrorKind::InvalidTestPhrase);
    assert_eq!(err.position(), 4);
}

#[test]
fn test_empty_expression() {
    for query in ["", "   "] {
        let err = parse_err(query);
        assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
        assert!(err.to_string().starts_with("Empty filter expression"));
    }
}

#[test]
fn test_missing_phrase() {
    let err = parse_err("name=");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(err.position(), 5);
    assert_eq!(err.cause().map(FilterError::kind), Some(FilterErrorKind::EndOfString));

    let err = parse_err("name= && tag=a");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(
        err.cause().map(FilterError::kind),
        Some(FilterErrorKind::NoMatchableCharacter)
    );
    assert_eq!(err.to_string(), "Missing phrase for field name at position 6");
}

#[test]
fn test_unterminated_quote() {
    let err = parse_err(r#"name="buy milk"#);
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(err.to_string(), "Unterminated quote at position 5");
    assert_eq!(err.cause().map(FilterError::kind), Some(FilterErrorKind::EndOfString));
}

#[test]
fn test_missing_field() {
    let err = parse_err("&& name=a");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(
        err.to_string(),
        "Expected a field name at position 0, found '&&'"
    );
    assert_eq!(
        err.cause().map(FilterError::kind),
        Some(FilterErrorKind::NoMatchableCharacter)
    );

    let err = parse_err("name=a &&");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(err.position(), 9);
    assert_eq!(
        err.to_string(),
        "Expected a field name at position 9, found end of input"
    );

    let err = parse_err("name=a || (\"quoted\" tag=b)");
    assert_eq!(
        err.to_string(),
        "Expected a field name at position 11, found 'quoted'"
    );
}

#[test]
fn test_unbalanced_parentheses() {
    let err = parse_err("(name=a && tag=b");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(err.position(), 16);
    assert!(err.to_string().starts_with("Missing ')' at position 16"));

    let err = parse_err("name=a)");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(
        err.to_string(),
        "Unmatched ')' at position 6. Join tests with && or ||."
    );

    assert_eq!(parse_err("()").kind(), FilterErrorKind::BooleanExpression);
}

#[test]
fn test_trailing_input() {
    let err = parse_err("name=a extra");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(err.position(), 7);
    assert_eq!(
        err.to_string(),
        "Unexpected 'extra' at position 7. Join tests with && or ||."
    );

    let err = parse_err("name=a tag=b");
    assert_eq!(err.position(), 7);
    assert!(err.to_string().starts_with("Unexpected 'tag=b' at position 7"));

    let err = parse_err("name=a | tag=b");
    assert_eq!(err.kind(), FilterErrorKind::BooleanExpression);
    assert_eq!(err.position(), 7);
    assert!(err.to_string().starts_with("Unexpected '|' at position 7"));
}

#[test]
fn test_leaf_errors_are_not_wrapped() {
    let err = parse_err("(name=a || (unknownfield=b))");
    assert_eq!(err.kind(), FilterErrorKind::InvalidKey);
    assert!(err.cause().is_none());
}

// ==================== Rendering Tests ====================

#[test]
fn test_display_round_trip() {
    let queries = [
        "tag>wo && priority<5",
        "!name=a && name=b || name=c",
        "name=a || (name=b && !(tag=c || tag<d))",
        r#"name="say \"hi\"" && name 'a|b'"#,
        r#"name=[milk "oat bread"] || tag [home work]"#,
        "deadline today || deadline>+3d",
        "name='>5'",
    ];
    for query in queries {
        let predicate = parse_ok(query);
        let rendered = predicate.to_string();
        assert_eq!(parse_ok(&rendered), predicate, "{query} -> {rendered}");
    }
}

#[test]
fn test_display_canonical_form() {
    assert_eq!(parse_ok("t>wo").to_string(), "tag>wo");
    assert_eq!(
        parse_ok("!name=a && name b").to_string(),
        "(!name=a && name b)"
    );
    assert_eq!(
        parse_ok("name='buy milk'").to_string(),
        r#"name="buy milk""#
    );
}

#[test]
fn test_describe() {
    let message = parse_ok("tag>wo && priority<5").describe();
    assert_eq!(
        message.to_plain_text(),
        "tag loosely matches 'wo' and priority is less than '5'"
    );
    assert!(message
        .segments()
        .iter()
        .any(|s| s.style() == Style::Field && s.text() == "tag"));

    assert_eq!(
        parse_ok("(name=a || name=b) && !deadline today")
            .describe()
            .to_plain_text(),
        "(name equals 'a' or name equals 'b') and not (deadline is on 'today')"
    );

    assert_eq!(
        parse_ok("tag=[home work]").describe().to_plain_text(),
        "tag equals any of 'home', 'work'"
    );
}

#[test]
fn test_leaves() {
    let predicate = parse_ok("(name=a || !tag=b) && priority>1");
    let fields: Vec<&str> = predicate.leaves().iter().map(|l| l.field()).collect();
    assert_eq!(fields, vec!["name", "tag", "priority"]);
}

#[test]
fn test_predicate_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Predicate>();
    assert_send_sync::<FilterError>();
    assert_send_sync::<Schema>();
}

#[test]
fn test_free_parse_function() {
    let schema = schema();
    assert!(parse("name=a", &schema).is_ok());
    assert_eq!(
        parse("nme=a", &schema).unwrap_err().kind(),
        FilterErrorKind::InvalidKey
    );
}
