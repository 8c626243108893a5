//! JSON scenarios and configuration files

use std::fs;
use std::path::PathBuf;

use atelier_site::{run_loaded_scenario, run_scenario, ReportStatus, SiteConfig, SiteScenario};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("atelier-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

const TOUR: &str = r#"{
    "steps": [
        { "type": "assert_active_index", "index": 0 },
        { "type": "wait", "ms": 3200 },
        { "type": "assert_active_index", "index": 1 },

        { "type": "toggle_menu", "orb": 2 },
        { "type": "assert_menu_open", "open": true },
        { "type": "hover_nav", "index": 1 },
        { "type": "assert_hovered", "index": 1 },
        { "type": "select_nav", "index": 1 },
        { "type": "assert_route", "path": "/gallery" },
        { "type": "assert_menu_open", "open": false },
        { "type": "assert_hovered", "index": null },

        { "type": "assert_visible_count", "count": 18 },
        { "type": "set_category", "category": "portrait" },
        { "type": "assert_visible_count", "count": 8 },
        { "type": "open_item", "id": 2 },
        { "type": "assert_selected", "id": null },
        { "type": "open_item", "id": 3 },
        { "type": "tick", "frames": 10 },
        { "type": "click_lightbox", "target": "content" },
        { "type": "assert_selected", "id": 3 },
        { "type": "click_lightbox", "target": "close" },
        { "type": "assert_selected", "id": null },
        { "type": "assert_visible_count", "count": 8 }
    ]
}"#;

#[test]
fn test_site_tour_passes() {
    let outcome = run_scenario(TOUR).unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());

    let report = outcome.report();
    assert_eq!(report.status, ReportStatus::Passed);
    assert_eq!(report.frames, 210);
    assert_eq!(report.elapsed_ms, 3200 + 160);
}

#[test]
fn test_close_menu_step_drops_hover() {
    let outcome = run_scenario(
        r#"{ "steps": [
            { "type": "toggle_menu" },
            { "type": "hover_nav", "index": 2 },
            { "type": "assert_hovered", "index": 2 },
            { "type": "close_menu" },
            { "type": "assert_menu_open", "open": false },
            { "type": "assert_hovered", "index": null },
            { "type": "select_nav", "index": 2 },
            { "type": "assert_route", "path": "/" }
        ] }"#,
    )
    .unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());
}

#[test]
fn test_unknown_route_fails_the_step() {
    let outcome = run_scenario(
        r#"{ "steps": [
            { "type": "navigate", "path": "/process" },
            { "type": "navigate", "path": "/journal" },
            { "type": "assert_route", "path": "/process" }
        ] }"#,
    )
    .unwrap();

    assert!(outcome.is_failed());
    let report = outcome.report();
    let failure = report.failure.as_ref().unwrap();
    assert_eq!(failure.index, 1);
    assert_eq!(failure.step, "navigate");
    assert!(failure.message.contains("/journal"));
}

#[test]
fn test_scenario_from_file_with_start_route() {
    let dir = scratch_dir("scenario");
    let path = dir.join("connect.json");
    fs::write(
        &path,
        r#"{ "route": "/connect", "steps": [
            { "type": "pointer_move", "x": 200, "y": 100 },
            { "type": "tick", "frames": 2 },
            { "type": "assert_route", "path": "/connect" },
            { "type": "assert_active_index", "index": 0 }
        ] }"#,
    )
    .unwrap();

    let scenario = SiteScenario::from_path(&path).unwrap();
    let outcome = run_loaded_scenario(&scenario, &SiteConfig::default()).unwrap();
    let report = outcome.report();
    assert_eq!(report.failed_step(), Some(3));

    let mut json = Vec::new();
    report.write_json(&mut json).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["status"], "failed");
    assert_eq!(value["failure"]["step"], "assert_active_index");
    assert_eq!(value["frames"], 2);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_config_directory_load() {
    let dir = scratch_dir("config");
    fs::write(
        dir.join("atelier.toml"),
        r#"
[motion]
breakpoint_px = 900.0

[slideshow]
interval_ms = 1500

[runtime]
tick_ms = 20
"#,
    )
    .unwrap();

    let config = SiteConfig::load(&dir).unwrap();
    assert_eq!(config.motion.breakpoint_px, 900.0);
    assert_eq!(config.slideshow.interval_ms, 1500);
    assert_eq!(config.runtime.tick_ms, 20);
    assert_eq!(config.runtime.width, 1280.0);

    let reloaded = SiteConfig::from_toml_str(&config.to_toml().unwrap()).unwrap();
    assert_eq!(reloaded, config);

    let outcome = run_loaded_scenario(
        &SiteScenario::from_json(
            r#"{ "steps": [
                { "type": "wait", "ms": 1600 },
                { "type": "assert_active_index", "index": 1 }
            ] }"#,
        )
        .unwrap(),
        &config,
    )
    .unwrap();
    assert!(!outcome.is_failed(), "{:?}", outcome.report());
    assert_eq!(outcome.report().frames, 80);

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_missing_config_names_the_file() {
    let dir = scratch_dir("missing");
    let err = SiteConfig::load(&dir.join("nowhere.toml")).unwrap_err();
    assert!(format!("{err:#}").contains("nowhere.toml"));
    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_invalid_config_is_rejected() {
    let err = SiteConfig::from_toml_str("[runtime]\ntick_ms = 0\n").unwrap_err();
    assert!(format!("{err:#}").contains("tick_ms"));
}
