#[cfg(test)]
mod tests {
    use crate::*;
    use tess_core::analyze;

    #[test]
    fn test_sanitize_path_allows_simple_relative() {
        let p = sanitize_path("scripts/main.tess").expect("relative path should be allowed");
        assert_eq!(p, PathBuf::from("scripts/main.tess"));
    }

    #[test]
    fn test_sanitize_path_rejects_parent_dir() {
        let err = sanitize_path("scripts/../main.tess").unwrap_err();
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[cfg(unix)]
    #[test]
    fn test_sanitize_path_allows_absolute_unix() {
        let p = sanitize_path("/tmp/main.tess").expect("absolute path should be allowed");
        assert_eq!(p, PathBuf::from("/tmp/main.tess"));
    }

    #[test]
    fn test_cli_args_rejects_parent_dir_in_check() {
        let err = CliArgs::try_parse_from(["tess", "check", "a/../b.tess"]).unwrap_err();
        assert!(err.to_string().contains("Parent directory components"));
    }

    #[test]
    fn test_cli_args_check_defaults() {
        let args = CliArgs::try_parse_from(["tess", "check", "a.tess", "b.tess"]).expect("should parse");
        match args.command {
            Commands::Check {
                files,
                format,
                errors_only,
                config,
            } => {
                assert_eq!(files, vec![PathBuf::from("a.tess"), PathBuf::from("b.tess")]);
                assert_eq!(format, OutputFormat::Text);
                assert!(!errors_only);
                assert!(config.is_none());
            }
            other => panic!("expected check command, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_args_check_requires_file() {
        assert!(CliArgs::try_parse_from(["tess", "check"]).is_err());
    }

    #[test]
    fn test_env_toggle() {
        assert!(env_toggle_enabled("1"));
        assert!(env_toggle_enabled("tess_core=trace"));
        assert!(!env_toggle_enabled(" off "));
        assert!(!env_toggle_enabled(""));
        assert_eq!(filter_expr_from("true"), None);
        assert_eq!(filter_expr_from("tess_core=trace").as_deref(), Some("tess_core=trace"));
    }

    #[test]
    fn test_render_text_lines() {
        let analysis = tess_core::Analyzer::new().analyze("let$ x = 1\nif ready {\n}");
        let lines = render_text(Path::new("main.tess"), &analysis, false);
        assert_eq!(
            lines,
            vec![
                "main.tess:2:1: error[missing-keyword-marker]: Keyword 'if' should be followed by $ (use 'if$')",
                "main.tess:2:4: warning[undeclared-variable]: Variable 'ready' is used but not defined",
                "main.tess:1:11: warning[missing-terminator]: Missing semicolon at end of statement",
            ]
        );
        let errors = render_text(Path::new("main.tess"), &analysis, true);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_render_json_filters_warnings() {
        let analysis = tess_core::Analyzer::new().analyze("let$ x = 1");
        assert_eq!(analyze("let$ x = 1").len(), 1);
        let value = render_json(Path::new("main.tess"), &analysis, true);
        assert_eq!(value["path"], "main.tess");
        assert_eq!(value["findings"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["warnings"], 1);
    }
}
