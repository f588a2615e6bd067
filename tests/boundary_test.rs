use release_drafter::boundary::BoundaryWarning;
use release_drafter::ui;

// ============================================================================
// BoundaryWarning Display Tests
// ============================================================================

#[test]
fn test_boundary_warning_bad_replacer_display() {
    let warning = BoundaryWarning::BadReplacer {
        search: "/[a-/g".to_string(),
        reason: "unclosed character class".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("Bad replacer"),
        "Message should contain 'Bad replacer', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("/[a-/g"),
        "Message should contain the search, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("unclosed character class"),
        "Message should contain the reason, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_bad_autolabel_pattern_display() {
    let warning = BoundaryWarning::BadAutolabelPattern {
        label: "bug".to_string(),
        search: "/(fix/".to_string(),
        reason: "unclosed group".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("'bug'"),
        "Message should name the label, got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("/(fix/"),
        "Message should contain the search, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_unparsable_version_display() {
    let warning = BoundaryWarning::UnparsableVersion {
        input: "nightly-2024".to_string(),
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("Cannot parse a version"),
        "Message should contain 'Cannot parse a version', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("nightly-2024"),
        "Message should contain the input, got: {}",
        display_msg
    );
}

#[test]
fn test_boundary_warning_no_commits_since_release_display() {
    let warning = BoundaryWarning::NoCommitsSinceRelease {
        paths: vec!["packages/core".to_string()],
    };

    let display_msg = warning.to_string();
    assert!(
        display_msg.contains("No commits found"),
        "Message should contain 'No commits found', got: {}",
        display_msg
    );
    assert!(
        display_msg.contains("packages/core"),
        "Message should list the paths, got: {}",
        display_msg
    );
}

// ============================================================================
// Display through the UI
// ============================================================================

#[test]
fn test_display_boundary_warnings() {
    let warnings = vec![
        BoundaryWarning::BadReplacer {
            search: "(".to_string(),
            reason: "x".to_string(),
        },
        BoundaryWarning::UnparsableVersion {
            input: "latest".to_string(),
        },
    ];

    // Visual verification - output is printed to stderr
    for warning in &warnings {
        ui::display_boundary_warning(warning);
    }
}

#[test]
fn test_boundary_warnings_are_comparable() {
    let a = BoundaryWarning::UnparsableVersion {
        input: "x".to_string(),
    };
    assert_eq!(a.clone(), a);
    assert_ne!(
        a,
        BoundaryWarning::UnparsableVersion {
            input: "y".to_string()
        }
    );
}
