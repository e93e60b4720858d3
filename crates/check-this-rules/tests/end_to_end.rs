//! Integration test: built-in rules through the full engine pipeline.
//!
//! Fixtures under `tests/fixtures/` hold one instance of each pattern next
//! to a compliant variant, so counts here pin both detection and precision.

use check_this_core::{AnalyzeRequest, Config, Output, Severity};
use check_this_rules::default_engine;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    std::fs::read_to_string(path).expect("fixture should exist")
}

fn analyze(language: &str, source: &str, config: Config) -> Output {
    let request = AnalyzeRequest::new(language, source)
        .with_config(config)
        .validate()
        .expect("request should validate");
    default_engine().analyze(&request)
}

fn summary(output: &Output) -> Vec<String> {
    output
        .diagnostics
        .iter()
        .map(|d| {
            format!(
                "{} {} {}",
                d.rule_id,
                d.severity.map_or_else(|| "-".to_string(), |s| s.to_string()),
                d.range.start.line
            )
        })
        .collect()
}

// ── Scenarios ──

#[test]
fn swallowed_exception_is_reported() {
    let output = analyze(
        "python",
        "try:\n    risky()\nexcept Exception:\n    pass\n",
        Config::default(),
    );
    assert_eq!(output.diagnostics.len(), 1);
    let diag = &output.diagnostics[0];
    assert_eq!(diag.rule_id, "errors.swallowed");
    assert_eq!(diag.severity, Some(Severity::Warning));
    assert_eq!(diag.tags, vec!["reliability", "errors"]);
    assert_eq!(output.stats.rules_run, 4);
}

#[test]
fn file_wide_marker_suppresses_rule() {
    let source =
        "# check-this: disable=errors.swallowed\ntry:\n    risky()\nexcept Exception:\n    pass\n";
    let output = analyze("python", source, Config::default());
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.stats.rules_run, 4);
}

#[test]
fn config_severity_override_applies() {
    let config =
        Config::parse_json(r#"{"rules": {"net.no_timeout": {"severity": "error"}}}"#).unwrap();
    let output = analyze("javascript", "fetch(\"/api/data\");\n", config);
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].rule_id, "net.no_timeout");
    assert_eq!(output.diagnostics[0].severity, Some(Severity::Error));
    assert!(output.has_errors());
}

#[test]
fn timeout_keyword_clears_network_finding() {
    let flagged = analyze("python", "requests.get(\"https://service\")\n", Config::default());
    assert_eq!(summary(&flagged), vec!["net.no_timeout warning 0"]);

    let clean = analyze(
        "python",
        "requests.get(\"https://service\", timeout=5)\n",
        Config::default(),
    );
    assert!(clean.diagnostics.is_empty());
}

#[test]
fn disabled_rule_does_not_run() {
    let config =
        Config::parse_json(r#"{"rules": {"errors.swallowed": {"enabled": false}}}"#).unwrap();
    let output = analyze(
        "python",
        "try:\n    risky()\nexcept Exception:\n    pass\n",
        config,
    );
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.stats.rules_run, 3);
}

// ── Fixtures ──

#[test]
fn python_fixture_findings() {
    let output = analyze("python", &fixture("worker.py"), Config::default());
    insta::assert_debug_snapshot!(summary(&output), @r###"
    [
        "errors.swallowed warning 11",
        "net.no_timeout warning 10",
        "retry.unbounded warning 20",
        "state.global_mutable info 4",
    ]
    "###);
}

#[test]
fn typescript_fixture_findings() {
    let output = analyze("typescript", &fixture("client.ts"), Config::default());
    insta::assert_debug_snapshot!(summary(&output), @r###"
    [
        "errors.swallowed warning 7",
        "net.no_timeout info 6",
        "retry.unbounded warning 16",
        "state.global_mutable info 2",
    ]
    "###);
}

#[test]
fn line_marker_silences_single_finding() {
    let source = "\
requests.get(\"https://a\")  # check-this: disable-line=net.no_timeout
requests.get(\"https://b\")
";
    let output = analyze("python", source, Config::default());
    assert_eq!(summary(&output), vec!["net.no_timeout warning 1"]);
}

// ── Envelope ──

#[test]
fn json_envelope_shape() {
    let request = AnalyzeRequest::new("python", "CACHE = []\n")
        .with_path("svc/cache.py")
        .validate()
        .unwrap();
    let output = default_engine().analyze(&request);
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["version"], "1.0");
    assert_eq!(json["path"], "svc/cache.py");
    assert_eq!(json["language"], "python");
    assert_eq!(json["stats"]["rules_run"], 4);
    assert!(json["stats"]["parse_ms"].is_u64());
    assert!(json["stats"]["analyze_ms"].is_u64());

    let diag = &json["diagnostics"][0];
    assert_eq!(diag["rule_id"], "state.global_mutable");
    assert_eq!(diag["severity"], "info");
    assert_eq!(diag["range"]["start"], serde_json::json!({"line": 0, "col": 0}));
    assert_eq!(diag["range"]["end"], serde_json::json!({"line": 0, "col": 10}));
    assert_eq!(diag["tags"], serde_json::json!(["state"]));
    assert_eq!(
        diag["docs_url"],
        "https://github.com/barthollomew/check-this/blob/main/docs/rules.md#stateglobal_mutable"
    );
}

#[test]
fn every_builtin_rule_links_its_docs() {
    let engine = default_engine();
    for rule in engine.rules() {
        let url = rule.meta().docs_url.expect("built-in rules carry a docs link");
        let anchor = rule.id().replace('.', "");
        assert!(url.ends_with(&format!("docs/rules.md#{anchor}")), "{url}");
    }
}

#[test]
fn empty_source_runs_nothing() {
    let output = analyze("typescript", "  \n", Config::default());
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.stats.rules_run, 0);
}
