use std::{fs, path::PathBuf};

use tempfile::tempdir;

use kmb_cli::{Args, run};

/// Collects all .toml documents from a directory
fn collect_documents(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos live at the workspace root, not in the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &PathBuf, output: &PathBuf) -> Args {
    let name = input.file_stem().unwrap().to_string_lossy().to_string();
    Args {
        output: output.to_string_lossy().to_string(),
        name: Some(name),
        log_level: "off".to_string(),
        ..Args::new(input.to_string_lossy())
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().to_path_buf();

    let valid_demos = collect_documents(demos_path());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        match run(&args_for(demo_path, &output)) {
            Ok(report) => {
                let code = fs::read_to_string(report.path()).expect("Module was not written");
                assert!(code.contains("def build(self):"));
                assert!(report.warnings().is_empty(), "{}", demo_path.display());
            }
            Err(e) => failed_demos.push((demo_path.clone(), e)),
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().to_path_buf();

    let error_demos = collect_documents(demos_path().join("errors"));
    assert!(!error_demos.is_empty(), "No error demos found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        if run(&args_for(demo_path, &output)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    // Nothing may be written for a failed document
    let written = fs::read_dir(&output).unwrap().count();
    assert_eq!(written, 0);

    println!(
        "✅ All {} error demos failed as expected",
        error_demos.len()
    );
}

#[test]
fn e2e_overwrite_is_reported() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().to_path_buf();
    let input = demos_path().join("mlp.toml");

    let args = Args {
        author: Some("ada".to_string()),
        comment: Some("Overwritten on purpose.".to_string()),
        ..args_for(&input, &output)
    };

    let first = run(&args).expect("First run failed");
    assert!(first.warnings().is_empty());

    let second = run(&args).expect("Second run failed");
    assert_eq!(second.path(), &output.join("mlp.py"));
    assert_eq!(second.warnings().len(), 1);

    let code = fs::read_to_string(second.path()).unwrap();
    assert!(code.contains("# Created by Ada on "));
    assert!(code.contains("\"\"\"Overwritten on purpose.\"\"\""));
}
