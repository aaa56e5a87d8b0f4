use super::*;
use crate::commands::migrate::execute_to;
use crate::cli::{ConfirmArgs, ToArgs};
use crate::commands::test_project::{global, project, SECOND};

fn registry(global_args: &GlobalArgs) -> Registry {
    RuntimeContext::new(global_args).unwrap().registry
}

#[test]
fn test_render_tree_marks_null_on_fresh_database() {
    let tmp = project();
    let lines = render_tree(&registry(&global(tmp.path())), &Version::None);
    assert_eq!(
        lines,
        vec![
            "-> (null)".to_string(),
            "   000000T000000 (init)".to_string(),
            format!("   {SECOND} profiles (parts: 1, 2)"),
        ]
    );
}

#[test]
fn test_render_tree_marks_current_version() {
    let tmp = project();
    let lines = render_tree(&registry(&global(tmp.path())), &Version::Init);
    assert_eq!(lines[0], "   (null)");
    assert_eq!(lines[1], "-> 000000T000000 (init)");
}

#[test]
fn test_report_lists_parts() {
    let tmp = project();
    let report = build_report(&registry(&global(tmp.path())), &Version::Init);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["current"], "000000T000000");
    assert_eq!(json["migrations"][0]["current"], true);
    assert_eq!(json["migrations"][1]["parts"], serde_json::json!([1, 2]));
}

#[test]
fn test_execute_after_migration() {
    let tmp = project();
    let global = global(tmp.path());
    execute_to(
        &ToArgs {
            version: Version::Init,
            confirm: ConfirmArgs { yes: true },
        },
        &global,
    )
    .unwrap();
    execute(&StatusArgs { json: false }, &global).unwrap();
    execute(&StatusArgs { json: true }, &global).unwrap();
}
