#[cfg(test)]
mod tests {
    use crate::check::*;
    use crate::diag::{Finding, FindingKind, Span};
    use crate::text::MaskedText;

    fn code(text: &str) -> String {
        MaskedText::new(text).code().to_string()
    }

    fn run(f: impl Fn(&str, &mut Vec<Finding>), text: &str) -> Vec<Finding> {
        let mut out = Vec::new();
        f(&code(text), &mut out);
        out
    }

    fn kinds(findings: &[Finding]) -> Vec<FindingKind> {
        findings.iter().map(|f| f.kind).collect()
    }

    #[test]
    fn balanced_brackets_are_clean() {
        assert!(find_bracket_issues("func$ f(a) { let$ b = [1, (2)]; }").is_empty());
        assert!(find_bracket_issues("").is_empty());
    }

    #[test]
    fn mismatch_consumes_the_open_bracket() {
        let found = find_bracket_issues("(]");
        assert_eq!(kinds(&found), vec![FindingKind::MismatchedBracket]);
        assert_eq!(found[0].span, Span::new(1, 2));
        assert_eq!(found[0].message, "Mismatched bracket: found ']' but expected ')'");
    }

    #[test]
    fn unclosed_brackets_left_to_right() {
        let found = find_bracket_issues("{ (");
        assert_eq!(kinds(&found), vec![FindingKind::UnclosedBracket, FindingKind::UnclosedBracket]);
        assert_eq!(found[0].span.start, 0);
        assert_eq!(found[0].message, "Unclosed '{': missing '}'");
        assert_eq!(found[1].span.start, 2);
    }

    #[test]
    fn close_without_open() {
        let found = find_bracket_issues("a)");
        assert_eq!(kinds(&found), vec![FindingKind::UnexpectedClose]);
        assert_eq!(found[0].message, "Mismatched bracket: found ')' with no open bracket");
    }

    #[test]
    fn brackets_in_strings_ignored_on_code_view() {
        assert!(find_bracket_issues(&code(r#"::print("(");"#)).is_empty());
        assert_eq!(find_bracket_issues(r#"::print("(");"#).len(), 1);
    }

    #[test]
    fn keyword_without_marker() {
        let found = run(find_missing_markers, "if condition {");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Span::new(0, 2));
        assert_eq!(found[0].message, "Keyword 'if' should be followed by $ (use 'if$')");

        assert!(run(find_missing_markers, "if$ condition {").is_empty());
        assert!(run(find_missing_markers, "} else {").is_empty());
        assert!(run(find_missing_markers, r#"::print("if you can");"#).is_empty());
    }

    #[test]
    fn escaped_quote_is_one_string() {
        assert!(find_unterminated_strings(r#"let$ s = "a\"b";"#).is_empty());
    }

    #[test]
    fn unterminated_string_stops_at_newline() {
        let found = find_unterminated_strings("let$ s = \"abc\nlet$ t = 1;");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Span::new(9, 13));
        assert_eq!(found[0].message, "Unclosed string literal");
    }

    #[test]
    fn unprefixed_builtin_call() {
        let found = run(find_unprefixed_builtins, r#"print("hi");"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Span::new(0, 5));
        assert_eq!(
            found[0].message,
            "Built-in function 'print' should be prefixed with :: (use '::print')"
        );
    }

    #[test]
    fn builtin_boundaries() {
        assert!(run(find_unprefixed_builtins, r#"::print("hi");"#).is_empty());
        assert!(run(find_unprefixed_builtins, "myprint(x);").is_empty());
        assert!(run(find_unprefixed_builtins, "let$ print_count = 2;").is_empty());
        assert!(run(find_unprefixed_builtins, "let$ n = len;").is_empty());
        assert!(run(find_unprefixed_builtins, "# print(x)").is_empty());
    }

    #[test]
    fn builtin_names_as_members_and_definitions() {
        assert!(run(find_unprefixed_builtins, "items.push(3);").is_empty());
        assert!(run(find_unprefixed_builtins, "func$ get(key) {").is_empty());
        assert!(run(find_unprefixed_builtins, "func$get(key) {").is_empty());
        assert_eq!(run(find_unprefixed_builtins, "funky$ get(key);").len(), 1);
    }

    #[test]
    fn undeclared_reported_once() {
        let found = run(find_undeclared, "let$ x = 1;\n::print(y);\n::print(y + x);");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Variable 'y' is used but not defined");
        assert_eq!(found[0].span, Span::new(20, 21));
    }

    #[test]
    fn declarations_are_not_uses() {
        let text = "func$ area(w, h) {\n    let$ a := w * h;\n    ::print(a, self);\n}\nclass$ Shape {\n}\nlet$ s = Shape();";
        assert!(run(find_undeclared, text).is_empty());
    }

    #[test]
    fn strings_comments_and_members_are_not_uses() {
        let text = "let$ list = 1;\n::print(\"hello world\"); # greet everyone\nlist.size;";
        assert!(run(find_undeclared, text).is_empty());
    }

    #[test]
    fn seeded_names() {
        let names = DeclaredNameSet::seeded("let$ a = 1; func$ f(b, c) { } class$ K { }");
        for name in ["a", "b", "c", "f", "K", "self", "args", "result"] {
            assert!(names.contains(name), "{}", name);
        }
        assert!(!names.contains("d"));
    }

    #[test]
    fn container_tags() {
        assert!(run(find_type_tag_issues, "let$ s = <stack>;").is_empty());

        let found = run(find_type_tag_issues, "let$ s = < stack >;");
        assert_eq!(kinds(&found), vec![FindingKind::MalformedTypeTag]);
        assert_eq!(found[0].message, "Malformed data type. Should be <stack> without spaces");
        assert_eq!(found[0].span, Span::new(9, 18));

        let found = run(find_type_tag_issues, "let$ s = <>;");
        assert_eq!(kinds(&found), vec![FindingKind::EmptyTypeTag]);
        assert_eq!(
            found[0].message,
            "Empty data type brackets. Should be <stack>, <queue>, <linked>, or <regex>"
        );

        let found = run(find_type_tag_issues, "let$ s = <heap>;");
        assert_eq!(kinds(&found), vec![FindingKind::InvalidTypeTag]);
        assert_eq!(
            found[0].message,
            "Invalid data type <heap>. Valid types are <stack>, <queue>, <linked>, and <regex>"
        );
    }

    #[test]
    fn closed_dictionary() {
        assert!(run(find_dictionary_issues, "let$ d = dict{a: 1};").is_empty());
        assert!(run(find_dictionary_issues, "let$ d = dict {\n  a: 1\n};").is_empty());
    }

    #[test]
    fn unclosed_dictionary() {
        let found = run(find_dictionary_issues, "let$ d = dict{a: 1");
        assert_eq!(kinds(&found), vec![FindingKind::UnclosedDict]);
        assert_eq!(found[0].message, "Unclosed dictionary. Missing closing }");
        assert_eq!(found[0].span, Span::new(9, 14));
    }

    #[test]
    fn dictionary_without_brace() {
        let found = run(find_dictionary_issues, "let$ d = dict;");
        assert_eq!(kinds(&found), vec![FindingKind::DictMissingBrace]);
        assert!(run(find_dictionary_issues, "let$ dictionary = 1;").is_empty());
    }

    #[test]
    fn function_without_body() {
        let mut out = Vec::new();
        find_incomplete_constructs("func$ foo()\nlet$ a = 1;\nlet$ b = 2;\nlet$ c = 3;\n", 3, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message, "Incomplete function definition for 'foo'. Missing { } body");
        assert_eq!(out[0].span, Span::new(0, 11));
    }

    #[test]
    fn body_on_the_next_line() {
        let mut out = Vec::new();
        find_incomplete_constructs("func$ foo()\n{\n}", 3, &mut out);
        find_incomplete_constructs("class$ Point\n\n  {\n}", 3, &mut out);
        find_incomplete_constructs("if$ ready {\n} else {\n}", 3, &mut out);
        assert!(out.is_empty(), "{:?}", out);
    }

    #[test]
    fn lookahead_window_is_bounded() {
        let text = "while$ running\n\n\n\n{\n}";
        let mut out = Vec::new();
        find_incomplete_constructs(text, 3, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].message, "Incomplete while$ statement. Missing { } body");

        out.clear();
        find_incomplete_constructs(text, 4, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn huge_lookahead_stops_at_the_last_line() {
        let mut out = Vec::new();
        find_incomplete_constructs("while$ running\n\n{\n}", usize::MAX, &mut out);
        assert!(out.is_empty());
        find_incomplete_constructs("while$ running\n", usize::MAX, &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn class_and_else_without_body() {
        let mut out = Vec::new();
        find_incomplete_constructs("class$ Point\nlet$ a = 1;", 3, &mut out);
        find_incomplete_constructs("} else\n::print(1);", 3, &mut out);
        let messages: Vec<_> = out.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Incomplete class definition for 'Point'. Missing { } body",
                "Incomplete else statement. Missing { } body",
            ]
        );
    }

    #[test]
    fn statement_without_terminator() {
        let found = run(find_missing_terminators, "let$ x = 1");
        assert_eq!(kinds(&found), vec![FindingKind::MissingTerminator]);
        assert_eq!(found[0].span, Span::at(10));
        assert_eq!(found[0].message, "Missing semicolon at end of statement");

        assert!(run(find_missing_terminators, "let$ x = 1;").is_empty());
    }

    #[test]
    fn terminator_at_end_of_line_before_comment_and_cr() {
        let found = run(find_missing_terminators, "::print(x) # show\r\nlet$ y = 2;");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].span, Span::at(17));
    }

    #[test]
    fn headers_and_continuations_need_no_terminator() {
        let text = "if$ a == b {\n}\nfunc$ f(x)\n{\n}\nlet$ total = a +\\\n    b;\nlet$ n = items\n    .size();\nlet$ ok = a == 1\n    and b == 2;";
        assert!(run(find_missing_terminators, text).is_empty());
    }

    #[test]
    fn plain_words_need_no_terminator() {
        assert!(run(find_missing_terminators, "return\nx").is_empty());
    }

    #[test]
    fn check_names_are_unique() {
        let names = check_names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(names.len(), sorted.len());
        assert_eq!(names.first(), Some(&"brackets"));
        assert_eq!(names.last(), Some(&"terminators"));
    }
}
