//! Integration tests for scoping, shadowing, and the run-wide report

use pysweep::{
    analyze_files, AnalyzerOptions, BindingKind, FileAnalyzer, FileReport, SourceFile,
    UsageStatus,
};
use std::path::{Path, PathBuf};

fn analyze_source(source: &str) -> FileReport {
    analyze_source_with(source, AnalyzerOptions::default())
}

fn analyze_source_with(source: &str, options: AnalyzerOptions) -> FileReport {
    let mut analyzer = FileAnalyzer::with_options(options).expect("failed to build analyzer");
    analyzer
        .analyze(Path::new("inline.py"), source)
        .expect("analysis failed")
}

fn status_of(report: &FileReport, name: &str) -> UsageStatus {
    report
        .classifications
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("binding '{}' missing", name))
        .status
}

// ============================================================================
// Shadowing and Declaration Order
// ============================================================================

mod shadowing_tests {
    use super::*;

    #[test]
    fn test_reimport_shadows_earlier_binding() {
        let source = "import json\nimport simplejson as json\n\nprint(json.dumps({}))\n";
        let report = analyze_source(source);

        let entries: Vec<_> = report
            .classifications
            .iter()
            .map(|c| (c.kind, c.status))
            .collect();
        assert_eq!(
            entries,
            vec![
                (BindingKind::ModuleImport, UsageStatus::Unused),
                (BindingKind::AliasedImport, UsageStatus::Used),
            ]
        );
    }

    #[test]
    fn test_local_variable_shadows_import_inside_function() {
        let source = "import config\n\n\ndef load():\n    config = read()\n    return config\n";
        let report = analyze_source(source);
        // both reads of `config` inside load() hit the local variable
        assert_eq!(status_of(&report, "config"), UsageStatus::Unused);
    }

    #[test]
    fn test_forward_reference_from_function_body() {
        let source = "def first():\n    return second()\n\n\ndef second():\n    return 1\n\n\nprint(first())\n";
        let report = analyze_source(source);
        assert_eq!(status_of(&report, "first"), UsageStatus::Used);
        assert_eq!(status_of(&report, "second"), UsageStatus::Used);
    }

    #[test]
    fn test_original_name_of_alias_is_never_searched() {
        let source = "from utils import unused_function as used_alias\n\nunused_function()\n";
        let report = analyze_source(source);
        // the call refers to an unrelated (undefined) name, not the alias
        assert_eq!(status_of(&report, "used_alias"), UsageStatus::Unused);
    }

    #[test]
    fn test_unused_function_scope_variable() {
        let source = "def f():\n    temp = 1\n    return 2\n";
        let report = analyze_source(source);
        assert_eq!(status_of(&report, "temp"), UsageStatus::Unused);
    }
}

// ============================================================================
// Report Serialization
// ============================================================================

mod serialization_tests {
    use super::*;

    #[test]
    fn test_file_report_serializes_for_external_formatters() {
        let report = analyze_source("import os\nfrom sys import argv\n\nprint(argv)\n");
        let json = serde_json::to_value(&report).expect("report must serialize");

        let classifications = json["classifications"].as_array().unwrap();
        assert_eq!(classifications.len(), 2);

        let os_entry = &classifications[0];
        assert_eq!(os_entry["name"], "os");
        assert_eq!(os_entry["kind"], "module_import");
        assert_eq!(os_entry["status"], "unused");
        assert_eq!(os_entry["severity"], "warning");
        assert_eq!(os_entry["location"]["line"], 1);

        let argv_entry = &classifications[1];
        assert_eq!(argv_entry["status"], "used");
        assert_eq!(argv_entry["evidence"]["line"], 4);
    }

    #[test]
    fn test_warnings_serialize_beside_classifications() {
        let report = analyze_source("from os import *\n");
        let json = serde_json::to_value(&report).unwrap();

        assert!(json["classifications"].as_array().unwrap().is_empty());
        let warnings = json["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0]["reason"].as_str().unwrap().contains("wildcard"));
    }
}

// ============================================================================
// Multi-File Runs
// ============================================================================

mod batch_tests {
    use super::*;

    #[test]
    fn test_files_keyed_and_ordered_by_path() {
        let files = vec![
            SourceFile::new("pkg/zebra.py", "import os\n"),
            SourceFile::new("pkg/alpha.py", "import sys\nprint(sys.path)\n"),
        ];
        let report = analyze_files(&files, &AnalyzerOptions::default());

        let paths: Vec<_> = report.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("pkg/alpha.py"), PathBuf::from("pkg/zebra.py")]
        );
    }

    #[test]
    fn test_stats_aggregate_across_files() {
        let files = vec![
            SourceFile::new("a.py", "import os\n"),
            SourceFile::new("b.py", "from sys import argv\n\nprint(argv)\n"),
            SourceFile::new("c.py", "unused_var = 1\n"),
        ];
        let report = analyze_files(&files, &AnalyzerOptions::default());

        assert_eq!(report.stats.files_analyzed, 3);
        assert_eq!(report.stats.files_affected, 2);
        assert_eq!(report.stats.unused_imports, 1);
        assert_eq!(report.stats.unused_locals, 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_lookup_by_path() {
        let files = vec![SourceFile::new("only.py", "import os\n")];
        let report = analyze_files(&files, &AnalyzerOptions::default());

        let file = report.file(Path::new("only.py")).expect("file missing");
        assert_eq!(file.unused_imports().count(), 1);
        assert!(report.file(Path::new("other.py")).is_none());
    }

    #[test]
    fn test_each_file_classified_against_itself_only() {
        // `helper` is defined in one file and called in another; whole-file
        // analysis must not let the call count across files
        let files = vec![
            SourceFile::new("def.py", "def helper():\n    return 1\n"),
            SourceFile::new("use.py", "helper()\n"),
        ];
        let report = analyze_files(&files, &AnalyzerOptions::default());

        let def_file = report.file(Path::new("def.py")).unwrap();
        assert_eq!(
            def_file.classifications[0].status,
            UsageStatus::Unused
        );
    }
}
