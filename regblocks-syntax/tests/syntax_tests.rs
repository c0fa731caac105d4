//! Integration tests for the syntax engine
//!
//! These tests drive the public parser API across the grammar and check the
//! diagnostics a JavaScript engine would give for the same input.

use regblocks_syntax::{
    Ast, BackrefTarget, ClassItem, GroupKind, Parser, RepetitionKind, Span, SyntaxErrorKind, parse,
};

fn error_kind(input: &str, unicode: bool) -> SyntaxErrorKind {
    Parser::new(input).unicode(unicode).parse().unwrap_err().kind
}

#[test]
fn test_real_world_patterns_parse() {
    let patterns = [
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$",
        r"^(?:\d{1,3}\.){3}\d{1,3}$",
        r"(?<year>\d{4})-(?<month>0[1-9]|1[0-2])-(?<day>\d\d)",
        r"^https?:\/\/[^\s/$.?#].[^\s]*$",
        r"(?<!\\)(['])(?:(?!\1).)*\1",
        r"\bcolou?r\b",
        "",
    ];

    for input in patterns {
        assert!(parse(input).is_ok(), "Failed for input: {}", input);
    }
}

#[test]
fn test_group_numbering_and_names() {
    let pattern = parse(r"(a)(?:b)(?<c>c)((d))").unwrap();
    assert_eq!(pattern.capture_count, 4);
    assert_eq!(pattern.group_names, vec!["c"]);

    let Ast::Concat(concat) = &pattern.ast else {
        panic!("expected concat");
    };
    let indices: Vec<_> = concat
        .asts
        .iter()
        .filter_map(|ast| match ast {
            Ast::Group(g) => Some(g.kind.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        indices,
        vec![
            GroupKind::Capturing { index: 1, name: None },
            GroupKind::NonCapturing,
            GroupKind::Capturing {
                index: 2,
                name: Some("c".to_string())
            },
            GroupKind::Capturing { index: 3, name: None },
        ]
    );
}

#[test]
fn test_decimal_escape_depends_on_group_count() {
    // a backreference when the group exists, even if it comes later
    let Ast::Concat(concat) = parse(r"\1(a)").unwrap().ast else {
        panic!("expected concat");
    };
    assert!(matches!(
        &concat.asts[0],
        Ast::Backref(b) if b.target == BackrefTarget::Index(1)
    ));

    // otherwise a legacy octal escape
    let Ast::Char(c) = parse(r"\1").unwrap().ast else {
        panic!("expected char");
    };
    assert_eq!(c.value, '\u{1}');
    assert!(c.escaped);

    assert_eq!(error_kind(r"\1", true), SyntaxErrorKind::InvalidDecimalEscape);
}

#[test]
fn test_class_raw_body_is_verbatim() {
    let Ast::Class(class) = parse(r"[^\]a-c\d]").unwrap().ast else {
        panic!("expected class");
    };
    assert!(class.negated);
    assert_eq!(class.raw, r"\]a-c\d");
    assert_eq!(class.items.len(), 3);
    assert_eq!(class.items[1], ClassItem::Range('a', 'c'));
}

#[test]
fn test_lazy_quantifier_bounds() {
    let Ast::Repetition(rep) = parse("a{2,5}?").unwrap().ast else {
        panic!("expected repetition");
    };
    assert!(!rep.greedy);
    assert_eq!(rep.kind, RepetitionKind::Range { from: 2, to: Some(5) });
    assert_eq!(rep.span, Span::new(0, 7));
}

#[test]
fn test_annex_b_leniency() {
    for input in ["]", "}", "a{", "a{,5}", r"\c", r"\x4", r"\u12", r"\z", "(?=a)*"] {
        assert!(parse(input).is_ok(), "Failed for input: {}", input);
        assert!(
            Parser::new(input).unicode(true).parse().is_err(),
            "Unicode mode accepted: {}",
            input
        );
    }
}

#[test]
fn test_error_positions() {
    let err = parse("ab(cd").unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::UnterminatedGroup);
    assert_eq!(err.position(), 2);

    let err = parse("abc)").unwrap_err();
    assert_eq!(err.kind, SyntaxErrorKind::UnmatchedParen);
    assert_eq!(err.position(), 3);
}

#[test]
fn test_diagnostic_wording() {
    let cases = [
        ("*", "Nothing to repeat"),
        ("(?x)", "Invalid group"),
        ("[z-a]", "Range out of order in character class"),
        ("(?<1>a)", "Invalid capture group name"),
        ("[a", "Unterminated character class"),
    ];
    for (input, message) in cases {
        assert_eq!(parse(input).unwrap_err().to_string(), message);
    }
}

#[test]
fn test_deep_nesting() {
    let input = "(".repeat(100) + "a" + &")".repeat(100);
    let pattern = parse(&input).unwrap();
    assert_eq!(pattern.capture_count, 100);
}
