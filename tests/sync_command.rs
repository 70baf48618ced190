#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for the `sync` command.

mod common;

use common::{TestContextBuilder, logger, tree_hashes};
use greeble_cli::cli::{AddOpts, SyncOpts};
use greeble_cli::commands;

fn setup() -> common::IntegrationTestContext {
    let ctx = TestContextBuilder::new()
        .with_component(
            "modal",
            &[
                ("templates/greeble/modal.html", "<dialog>v2</dialog>"),
                ("static/greeble/modal.css", ".modal {}"),
            ],
        )
        .build();
    let add = AddOpts {
        component: "modal".to_string(),
        layout: ctx.layout(),
        force: false,
        dry_run: false,
    };
    commands::add::run(&ctx.global(), &add, &logger()).unwrap();
    std::fs::write(ctx.project_file("templates/greeble/modal.html"), "local edit").unwrap();
    ctx
}

fn opts(ctx: &common::IntegrationTestContext, backup: bool) -> SyncOpts {
    SyncOpts {
        component: "modal".to_string(),
        layout: ctx.layout(),
        backup,
        dry_run: false,
    }
}

#[test]
fn sync_overwrites_without_force() {
    let ctx = setup();
    commands::sync::run(&ctx.global(), &opts(&ctx, false), &logger()).unwrap();

    assert_eq!(ctx.read("templates/greeble/modal.html"), "<dialog>v2</dialog>");
    assert!(!ctx.project_file("templates/greeble/modal.html.bak").exists());
}

#[test]
fn sync_with_backup_keeps_previous_contents() {
    let ctx = setup();
    commands::sync::run(&ctx.global(), &opts(&ctx, true), &logger()).unwrap();

    assert_eq!(ctx.read("templates/greeble/modal.html"), "<dialog>v2</dialog>");
    assert_eq!(ctx.read("templates/greeble/modal.html.bak"), "local edit");
    assert_eq!(ctx.read("static/greeble/modal.css.bak"), ".modal {}");
}

#[test]
fn repeated_backups_never_overwrite_each_other() {
    let ctx = setup();
    let log = logger();
    commands::sync::run(&ctx.global(), &opts(&ctx, true), &log).unwrap();
    std::fs::write(ctx.project_file("templates/greeble/modal.html"), "second edit").unwrap();
    commands::sync::run(&ctx.global(), &opts(&ctx, true), &log).unwrap();

    assert_eq!(ctx.read("templates/greeble/modal.html.bak"), "local edit");
    assert_eq!(ctx.read("templates/greeble/modal.html.bak1"), "second edit");
}

#[test]
fn sync_creates_missing_files() {
    let ctx = setup();
    std::fs::remove_file(ctx.project_file("static/greeble/modal.css")).unwrap();
    commands::sync::run(&ctx.global(), &opts(&ctx, true), &logger()).unwrap();

    assert_eq!(ctx.read("static/greeble/modal.css"), ".modal {}");
    assert!(!ctx.project_file("static/greeble/modal.css.bak").exists());
}

#[test]
fn dry_run_changes_nothing() {
    let ctx = setup();
    let before = tree_hashes(&ctx.project);
    let mut sync = opts(&ctx, true);
    sync.dry_run = true;
    commands::sync::run(&ctx.global(), &sync, &logger()).unwrap();

    assert_eq!(tree_hashes(&ctx.project), before);
}

#[cfg(unix)]
#[test]
fn dangling_backup_symlink_is_skipped() {
    let ctx = setup();
    let outside = ctx.dir.path().join("outside/bak.html");
    std::os::unix::fs::symlink(&outside, ctx.project_file("templates/greeble/modal.html.bak"))
        .unwrap();
    commands::sync::run(&ctx.global(), &opts(&ctx, true), &logger()).unwrap();

    assert!(!outside.exists());
    assert_eq!(ctx.read("templates/greeble/modal.html.bak1"), "local edit");
    assert_eq!(ctx.read("templates/greeble/modal.html"), "<dialog>v2</dialog>");
}
