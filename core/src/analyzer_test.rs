#[cfg(test)]
mod tests {
    use crate::analyzer::{Analyzer, analyze};
    use crate::config::LintConfig;
    use crate::diag::{FindingKind, Severity};

    const CLEAN: &str = r#"# Shapes
let$ items = <stack>;
let$ table = dict{"name": "box"};
func$ area(width, height) {
    let$ total = width * height;
    ::print("area", total);
}
class$ Box {
    func$ volume(depth) {
        let$ v = area(2, 3) * depth;
    }
}
if$ items {
    ::push(items, 1);
} elseif$ table {
    ::print("table");
} else {
    ::print("empty");
}
"#;

    const MESSY: &str = "if ready {\nprint(\"hi\")\n";

    #[test]
    fn clean_program_has_no_findings() {
        assert_eq!(analyze(CLEAN), vec![]);
        assert!(analyze("").is_empty());
    }

    #[test]
    fn findings_follow_check_order() {
        let kinds: Vec<_> = analyze(MESSY).into_iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FindingKind::UnclosedBracket,
                FindingKind::MissingKeywordMarker,
                FindingKind::UnprefixedBuiltin,
                FindingKind::UndeclaredVariable,
                FindingKind::MissingTerminator,
            ]
        );
    }

    #[test]
    fn analysis_is_idempotent() {
        let analyzer = Analyzer::new();
        assert_eq!(analyzer.analyze(MESSY).findings, analyzer.analyze(MESSY).findings);
    }

    #[test]
    fn disabled_checks_do_not_run() {
        let config = LintConfig::from_toml_str("disabled = [\"terminators\", \"undeclared\"]").unwrap();
        let analyzer = Analyzer::with_config(config);
        assert!(!analyzer.check_names().contains(&"terminators"));
        let kinds: Vec<_> = analyzer.analyze(MESSY).findings.into_iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FindingKind::UnclosedBracket,
                FindingKind::MissingKeywordMarker,
                FindingKind::UnprefixedBuiltin,
            ]
        );
    }

    #[test]
    fn severity_overrides_ignore_the_publish_cap() {
        let config = LintConfig::from_toml_str("max-findings = 2\n[severity]\nunclosed-bracket = \"warning\"").unwrap();
        let analysis = Analyzer::with_config(config).analyze(MESSY);
        assert_eq!(analysis.findings.len(), 5);
        assert_eq!(analysis.findings[0].severity, Severity::Warning);
        assert_eq!(analysis.findings[1].severity, Severity::Error);
        assert_eq!(analysis.error_count(), 2);
        assert_eq!(analysis.warning_count(), 3);
        assert!(analysis.has_errors());
    }

    #[test]
    fn json_carries_positions() {
        let analysis = Analyzer::new().analyze("let$ x = 1");
        let json = analysis.to_json();
        assert_eq!(json["errors"], 0);
        assert_eq!(json["warnings"], 1);
        let finding = &json["findings"][0];
        assert_eq!(finding["code"], "missing-terminator");
        assert_eq!(finding["line"], 0);
        assert_eq!(finding["column"], 10);
        assert_eq!(finding["severity"], "warning");
    }

    #[test]
    fn located_findings() {
        let analysis = Analyzer::new().analyze(MESSY);
        let positions: Vec<String> = analysis.located().map(|(pos, _)| pos.to_string()).collect();
        assert_eq!(positions, vec!["1:10", "1:1", "2:1", "1:4", "2:12"]);
    }
}
