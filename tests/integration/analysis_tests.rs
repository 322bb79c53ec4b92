//! Integration tests over Python fixture files
//!
//! These run the full pipeline (parse, build, collect, resolve) against
//! realistic sources and check the resulting classifications.

use pysweep::{
    AnalyzerOptions, BindingKind, FileAnalyzer, FileReport, Severity, UsageStatus,
};
use std::path::PathBuf;

/// Get the path to the test fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Route pipeline tracing through the test writer; RUST_LOG selects levels
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Analyze one fixture with default options
fn analyze_fixture(name: &str) -> FileReport {
    analyze_fixture_with(name, AnalyzerOptions::default())
}

fn analyze_fixture_with(name: &str, options: AnalyzerOptions) -> FileReport {
    init_tracing();
    let path = fixtures_path().join("python").join(name);
    if !path.exists() {
        panic!("Fixture not found: {:?}", path);
    }
    let source = std::fs::read_to_string(&path).expect("failed to read fixture");
    let mut analyzer = FileAnalyzer::with_options(options).expect("failed to build analyzer");
    analyzer.analyze(&path, &source).expect("analysis failed")
}

fn unused_import_names(report: &FileReport) -> Vec<String> {
    report
        .unused_imports()
        .map(|c| c.name.clone())
        .collect()
}

// ============================================================================
// Main Module Fixture
// ============================================================================

mod main_module_tests {
    use super::*;

    #[test]
    fn test_only_guarded_import_is_unused() {
        let report = analyze_fixture("main_module.py");
        assert_eq!(unused_import_names(&report), vec!["maybe_missing"]);
    }

    #[test]
    fn test_alias_is_used_under_its_alias_name() {
        let report = analyze_fixture("main_module.py");
        let alias = report
            .classifications
            .iter()
            .find(|c| c.name == "used_alias")
            .expect("alias binding missing");

        assert_eq!(alias.kind, BindingKind::AliasedImport);
        assert_eq!(alias.status, UsageStatus::Used);
        assert_eq!(alias.alias_of.as_deref(), Some("unused_function"));
    }

    #[test]
    fn test_attribute_roots_mark_module_imports_used() {
        let report = analyze_fixture("main_module.py");
        for name in ["os", "path"] {
            let entry = report
                .classifications
                .iter()
                .find(|c| c.name == name)
                .unwrap_or_else(|| panic!("binding '{}' missing", name));
            assert_eq!(entry.status, UsageStatus::Used, "'{}' should be used", name);
            assert!(entry.evidence.is_some());
        }
    }

    #[test]
    fn test_unused_locals_are_reported_separately() {
        let report = analyze_fixture("main_module.py");
        let unused_locals: Vec<_> = report
            .unused()
            .filter(|c| !c.kind.is_import())
            .map(|c| c.name.clone())
            .collect();

        assert_eq!(unused_locals, vec!["unused_var", "local_func", "LocalClass"]);
        for entry in report.unused().filter(|c| !c.kind.is_import()) {
            assert_eq!(entry.severity, Severity::Info);
        }
    }

    #[test]
    fn test_unused_imports_carry_warning_severity() {
        let report = analyze_fixture("main_module.py");
        for entry in report.unused_imports() {
            assert_eq!(entry.severity, Severity::Warning);
        }
    }

    #[test]
    fn test_classifications_in_declaration_order() {
        let report = analyze_fixture("main_module.py");
        let module_level_lines: Vec<usize> = report
            .classifications
            .iter()
            .map(|c| c.location.line)
            .collect();
        let mut sorted = module_level_lines.clone();
        sorted.sort_unstable();
        assert_eq!(module_level_lines, sorted);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let first = analyze_fixture("main_module.py");
        let second = analyze_fixture("main_module.py");

        let summary = |r: &FileReport| {
            r.classifications
                .iter()
                .map(|c| (c.name.clone(), c.status))
                .collect::<Vec<_>>()
        };
        assert_eq!(summary(&first), summary(&second));
    }

    #[test]
    fn test_local_definitions_can_be_suppressed() {
        let report = analyze_fixture_with(
            "main_module.py",
            AnalyzerOptions::default().with_local_definitions(false),
        );
        assert!(report.classifications.iter().all(|c| c.kind.is_import()));
    }
}

// ============================================================================
// Multi-Name Imports
// ============================================================================

mod feature_tests {
    use super::*;

    #[test]
    fn test_multi_name_import_classified_independently() {
        let report = analyze_fixture("feature.py");

        let statuses: Vec<_> = report
            .classifications
            .iter()
            .filter(|c| c.kind == BindingKind::FromImport)
            .map(|c| (c.name.as_str(), c.status))
            .collect();

        assert_eq!(
            statuses,
            vec![
                ("used_function", UsageStatus::Used),
                ("unused_function", UsageStatus::Unused),
                ("UNUSED_CONST", UsageStatus::Unused),
                ("UsedClass", UsageStatus::Used),
            ]
        );
    }

    #[test]
    fn test_reference_inside_method_reaches_module_import() {
        let report = analyze_fixture("feature.py");
        let used = report
            .classifications
            .iter()
            .find(|c| c.name == "used_function")
            .unwrap();
        // the only call site sits inside Feature.__init__
        assert_eq!(used.status, UsageStatus::Used);
        assert_eq!(used.evidence.map(|l| l.line), Some(7));
    }

    #[test]
    fn test_class_members_never_reported() {
        let report = analyze_fixture("feature.py");
        assert!(report.classifications.iter().all(|c| c.name != "process"));
        assert!(report.classifications.iter().all(|c| c.name != "__init__"));
    }
}

// ============================================================================
// Wildcard Imports
// ============================================================================

mod wildcard_tests {
    use super::*;

    #[test]
    fn test_wildcard_import_warns_instead_of_classifying() {
        let report = analyze_fixture("wildcard.py");

        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].reason.contains("wildcard"));
        assert_eq!(report.warnings[0].location.line, 1);

        // the wildcard statement contributes no bindings; sys still does
        let import_names: Vec<_> = report
            .classifications
            .iter()
            .filter(|c| c.kind.is_import())
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(import_names, vec!["sys"]);
    }

    #[test]
    fn test_remaining_imports_still_classified() {
        let report = analyze_fixture("wildcard.py");
        let sys = report
            .classifications
            .iter()
            .find(|c| c.name == "sys")
            .unwrap();
        assert_eq!(sys.status, UsageStatus::Used);
    }
}

// ============================================================================
// Optional-Import Guards
// ============================================================================

mod guarded_tests {
    use super::*;

    #[test]
    fn test_unreferenced_guarded_import_is_unused() {
        let report = analyze_fixture("guarded.py");
        let entry = report
            .classifications
            .iter()
            .find(|c| c.name == "maybe_missing")
            .unwrap();
        assert_eq!(entry.status, UsageStatus::Unused);
    }

    #[test]
    fn test_guard_only_reference_is_strict_by_default() {
        let report = analyze_fixture("guarded.py");
        let entry = report
            .classifications
            .iter()
            .find(|c| c.name == "optional_dep")
            .unwrap();
        assert_eq!(entry.status, UsageStatus::Unused);
    }

    #[test]
    fn test_guard_only_reference_tolerated_when_configured() {
        let report = analyze_fixture_with(
            "guarded.py",
            AnalyzerOptions::default().with_guarded_tolerance(true),
        );
        let entry = report
            .classifications
            .iter()
            .find(|c| c.name == "optional_dep")
            .unwrap();
        assert_eq!(entry.status, UsageStatus::Used);

        // tolerance does not invent usage for the untouched import
        let missing = report
            .classifications
            .iter()
            .find(|c| c.name == "maybe_missing")
            .unwrap();
        assert_eq!(missing.status, UsageStatus::Unused);
    }

    #[test]
    fn test_import_outside_guard_unaffected() {
        let report = analyze_fixture("guarded.py");
        let json = report
            .classifications
            .iter()
            .find(|c| c.name == "json")
            .unwrap();
        assert_eq!(json.status, UsageStatus::Used);
    }
}

// ============================================================================
// Shadowing
// ============================================================================

mod shadowing_tests {
    use super::*;

    #[test]
    fn test_module_reference_resolves_to_from_import() {
        let report = analyze_fixture("shadowing.py");
        let path = report
            .classifications
            .iter()
            .find(|c| c.name == "path")
            .unwrap();
        assert_eq!(path.kind, BindingKind::FromImport);
        assert_eq!(path.status, UsageStatus::Used);
        assert_eq!(path.evidence.map(|l| l.line), Some(9));
    }

    #[test]
    fn test_shadowed_reference_does_not_leak_to_import() {
        // the `path` use inside resolve() belongs to the parameter, and
        // `os` is never referenced at all
        let report = analyze_fixture("shadowing.py");
        let os = report
            .classifications
            .iter()
            .find(|c| c.name == "os")
            .unwrap();
        assert_eq!(os.status, UsageStatus::Unused);
    }

    #[test]
    fn test_parameters_reported_only_on_request() {
        let silent = analyze_fixture("shadowing.py");
        assert!(silent
            .classifications
            .iter()
            .all(|c| c.kind != BindingKind::Parameter));

        let verbose = analyze_fixture_with(
            "shadowing.py",
            AnalyzerOptions::default().with_parameters(true),
        );
        let param = verbose
            .classifications
            .iter()
            .find(|c| c.kind == BindingKind::Parameter)
            .expect("parameter binding missing");
        assert_eq!(param.name, "path");
        assert_eq!(param.status, UsageStatus::Used);
    }
}
