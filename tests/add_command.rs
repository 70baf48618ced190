#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
//! Integration tests for the `add` command.

mod common;

use std::path::PathBuf;

use common::{TestContextBuilder, logger, tree_hashes};
use greeble_cli::cli::AddOpts;
use greeble_cli::commands;
use greeble_cli::error::{GreebleError, ScaffoldError};

fn button() -> common::IntegrationTestContext {
    TestContextBuilder::new()
        .with_component(
            "button",
            &[
                ("templates/greeble/button.html", "<button>Go</button>\n"),
                ("static/greeble/button.css", ".greeble-button {}\n"),
                ("docs/button.md", "# Button\n"),
            ],
        )
        .build()
}

fn opts(ctx: &common::IntegrationTestContext, key: &str) -> AddOpts {
    AddOpts {
        component: key.to_string(),
        layout: ctx.layout(),
        force: false,
        dry_run: false,
    }
}

fn scaffold_error(err: &anyhow::Error) -> &ScaffoldError {
    match err.downcast_ref::<GreebleError>() {
        Some(GreebleError::Scaffold(inner)) => inner,
        other => panic!("expected scaffold error, got {other:?}"),
    }
}

#[test]
fn add_copies_templates_and_static() {
    let ctx = button();
    commands::add::run(&ctx.global(), &opts(&ctx, "button"), &logger()).unwrap();

    assert_eq!(ctx.read("templates/greeble/button.html"), "<button>Go</button>\n");
    assert_eq!(ctx.read("static/greeble/button.css"), ".greeble-button {}\n");
    assert!(!ctx.project_file("docs/button.md").exists());
}

#[test]
fn add_with_docs_copies_documentation() {
    let ctx = button();
    let mut add = opts(&ctx, "button");
    add.layout.include_docs = true;
    commands::add::run(&ctx.global(), &add, &logger()).unwrap();

    assert_eq!(ctx.read("docs/button.md"), "# Button\n");
}

#[test]
fn add_honours_custom_layout() {
    let ctx = button();
    let mut add = opts(&ctx, "button");
    add.layout.templates = PathBuf::from("app/templates");
    add.layout.static_dir = PathBuf::from("app/assets");
    commands::add::run(&ctx.global(), &add, &logger()).unwrap();

    assert!(ctx.project_file("app/templates/greeble/button.html").is_file());
    assert!(ctx.project_file("app/assets/greeble/button.css").is_file());
}

#[test]
fn second_add_without_force_fails_and_keeps_edits() {
    let ctx = button();
    let log = logger();
    commands::add::run(&ctx.global(), &opts(&ctx, "button"), &log).unwrap();
    std::fs::write(ctx.project_file("templates/greeble/button.html"), "edited").unwrap();

    let err = commands::add::run(&ctx.global(), &opts(&ctx, "button"), &log).unwrap_err();
    assert!(matches!(
        scaffold_error(&err),
        ScaffoldError::AlreadyExists { .. }
    ));
    assert_eq!(ctx.read("templates/greeble/button.html"), "edited");
}

#[test]
fn force_overwrites_existing_files() {
    let ctx = button();
    let log = logger();
    commands::add::run(&ctx.global(), &opts(&ctx, "button"), &log).unwrap();
    std::fs::write(ctx.project_file("templates/greeble/button.html"), "edited").unwrap();

    let mut add = opts(&ctx, "button");
    add.force = true;
    commands::add::run(&ctx.global(), &add, &log).unwrap();
    assert_eq!(ctx.read("templates/greeble/button.html"), "<button>Go</button>\n");
}

#[test]
fn dry_run_leaves_project_untouched() {
    let ctx = button();
    std::fs::create_dir_all(ctx.project_file("templates")).unwrap();
    std::fs::write(ctx.project_file("templates/base.html"), "base").unwrap();
    let before = tree_hashes(&ctx.project);

    let mut add = opts(&ctx, "button");
    add.dry_run = true;
    commands::add::run(&ctx.global(), &add, &logger()).unwrap();

    assert_eq!(tree_hashes(&ctx.project), before);
}

#[test]
fn unknown_component_lists_available_keys() {
    let ctx = button();
    let err = commands::add::run(&ctx.global(), &opts(&ctx, "carousel"), &logger())
        .unwrap_err();
    let ScaffoldError::UnknownComponent { key, available } = scaffold_error(&err) else {
        panic!("expected unknown component, got {err}");
    };
    assert_eq!(key, "carousel");
    assert_eq!(available, "button");
}

#[test]
fn missing_project_root_is_rejected() {
    let ctx = TestContextBuilder::new()
        .with_component("button", &[("templates/button.html", "<button/>")])
        .without_project()
        .build();
    let err = commands::add::run(&ctx.global(), &opts(&ctx, "button"), &logger())
        .unwrap_err();
    assert!(matches!(
        scaffold_error(&err),
        ScaffoldError::ProjectRootMissing { .. }
    ));
    assert!(!ctx.project.exists());
}

#[test]
fn layout_escaping_project_is_refused() {
    let ctx = button();
    let mut add = opts(&ctx, "button");
    add.layout.templates = PathBuf::from("../outside");
    let err = commands::add::run(&ctx.global(), &add, &logger()).unwrap_err();

    assert!(matches!(
        scaffold_error(&err),
        ScaffoldError::OutsideProject { .. }
    ));
    assert!(!ctx.dir.path().join("outside").exists());
    assert!(!ctx.project_file("static").exists(), "nothing is written");
}

#[test]
fn missing_source_aborts_before_copying() {
    let ctx = button();
    std::fs::remove_file(ctx.source("button", "static/greeble/button.css")).unwrap();
    let err = commands::add::run(&ctx.global(), &opts(&ctx, "button"), &logger())
        .unwrap_err();

    assert!(matches!(
        scaffold_error(&err),
        ScaffoldError::SourceMissing { .. }
    ));
    assert!(!ctx.project_file("templates").exists());
}

#[test]
fn manifest_with_traversal_entry_is_rejected() {
    let ctx = button();
    std::fs::write(
        ctx.library.join("greeble.manifest.yaml"),
        "version: 1\ncomponents:\n  - key: evil\n    files: [templates/../../escape.html]\n",
    )
    .unwrap();
    let err = commands::add::run(&ctx.global(), &opts(&ctx, "evil"), &logger())
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<GreebleError>(),
        Some(GreebleError::Manifest(_))
    ));
    assert!(!ctx.dir.path().join("escape.html").exists());
}

#[cfg(unix)]
#[test]
fn dangling_symlink_destination_is_refused() {
    let ctx = button();
    let outside = ctx.dir.path().join("outside/pwned.html");
    std::fs::create_dir_all(ctx.project_file("templates/greeble")).unwrap();
    std::os::unix::fs::symlink(&outside, ctx.project_file("templates/greeble/button.html"))
        .unwrap();

    for force in [false, true] {
        let mut add = opts(&ctx, "button");
        add.force = force;
        let err = commands::add::run(&ctx.global(), &add, &logger()).unwrap_err();
        assert!(matches!(
            scaffold_error(&err),
            ScaffoldError::OutsideProject { .. }
        ));
    }
    assert!(!outside.exists());
    assert!(!ctx.project_file("static").exists());
}
