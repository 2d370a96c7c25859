//! Plot session integration tests
//!
//! Drive a session over CSV files on disk through loads, view transforms,
//! resets and clock advances.

mod common;

use common::fixtures::{results_dir, session, session_with, write_results};
use scorebox_core::{PlotConfig, PlotEvent, PrimitiveKind, Shape, ViewTransform};

// === Dataset loading ===

#[test]
fn test_scores_normalised_by_player_count() {
    let dir = results_dir();
    let mut session = session(&dir);
    session.load_dataset("all_results").unwrap();

    let a = session.player("A").unwrap();
    assert_eq!(a.sample, vec![0.0025, 0.005, 0.0075, 0.25]);
    let b = session.player("B").unwrap();
    assert_eq!(b.sample, vec![0.0125, 0.015, 0.0175, 0.02]);
    let c = session.player("C").unwrap();
    assert_eq!(c.sample, vec![0.005, 0.01, 0.015, 0.02]);

    assert_eq!(session.scales().y.domain(), [0.0025, 0.25]);
    assert_eq!(
        session.scales().x.domain(),
        &["A".to_string(), "B".to_string(), "C".to_string()]
    );
}

#[test]
fn test_cheaters_use_alternate_stroke() {
    let dir = results_dir();
    let mut session = session(&dir);
    session.load_dataset("all_results").unwrap();

    let stroke = |player: &str| {
        session
            .scene()
            .group(player)
            .and_then(|g| g.of_kind(PrimitiveKind::Quartiles).next())
            .map(|p| p.style.stroke.clone())
            .unwrap()
    };
    assert_eq!(stroke("A"), "blue");
    assert_eq!(stroke("C"), "green");
}

#[test]
fn test_outlier_drawn_for_extreme_score() {
    let dir = results_dir();
    let mut session = session(&dir);
    session.load_dataset("all_results").unwrap();

    // A = [0.0025, 0.005, 0.0075, 0.25]: q3 + 1.5 * iqr is well below 0.25
    let a = session.scene().group("A").unwrap();
    assert_eq!(a.of_kind(PrimitiveKind::Outlier).count(), 1);
    assert_eq!(session.player("A").unwrap().stats.high_outliers, vec![0.25]);
}

#[test]
fn test_lenient_load_reports_skipped_rows() {
    let dir = results_dir();
    let mut session = session(&dir);
    let report = session.load_dataset("messy").unwrap();

    assert_eq!(report.players, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].player, "E");
}

#[test]
fn test_strict_load_failure_keeps_previous_state() {
    let dir = results_dir();
    let mut config = PlotConfig::default();
    config.data.strict = true;
    let mut session = session_with(&dir, config);
    session.load_dataset("all_results").unwrap();
    let players = session.players().to_vec();
    let groups = session.scene().groups().to_vec();

    assert!(session.load_dataset("messy").is_err());
    assert_eq!(session.selected(), Some("all_results"));
    assert_eq!(session.players(), players.as_slice());
    assert_eq!(session.scene().groups(), groups.as_slice());
}

// === Dataset switching ===

#[test]
fn test_switch_removes_stale_groups_after_transition() {
    let dir = results_dir();
    let mut session = session(&dir);
    session.handle(PlotEvent::LoadDataset("all_results".into())).unwrap();
    session.handle(PlotEvent::Advance(1000.0)).unwrap();

    let report = session.load_dataset("switched").unwrap();
    assert_eq!(report.join.entered, 1);
    assert_eq!(report.join.updated, 1);
    assert_eq!(report.join.exited, 2);

    // Mid-transition the old groups are still fading out
    session.advance_to(1500.0).unwrap();
    assert_eq!(session.scene().groups().len(), 4);
    let a = session.scene().group("A").unwrap();
    assert!(a.exiting);
    assert!(a.primitives.iter().all(|p| p.opacity_at(1500.0) < 1.0));

    session.advance_to(2000.0).unwrap();
    let mut players: Vec<&str> = session
        .scene()
        .groups()
        .iter()
        .map(|g| g.player.as_str())
        .collect();
    players.sort();
    assert_eq!(players, vec!["B", "D"]);
    assert!(session.scene().is_settled(2000.0));
}

#[test]
fn test_switch_recomputes_domains() {
    let dir = results_dir();
    let mut session = session(&dir);
    session.load_dataset("all_results").unwrap();
    session.load_dataset("switched").unwrap();

    // Two rows: divisor 200 * (2 - 1) = 200
    assert_eq!(session.scales().y.domain(), [0.025, 0.2]);
    assert_eq!(
        session.scales().x.domain(),
        &["B".to_string(), "D".to_string()]
    );
    assert_eq!(
        session.scene().x_axis().unwrap().labels(),
        vec!["B", "D"]
    );
}

// === View transforms ===

#[test]
fn test_transform_leaves_statistics_unchanged() {
    let dir = results_dir();
    let mut session = session(&dir);
    session.load_dataset("all_results").unwrap();
    let players = session.players().to_vec();
    let y_domain = session.scales().y.domain();
    let groups = session.scene().groups().to_vec();

    for transform in [
        ViewTransform::new([-120.0, 0.0], 2.5),
        ViewTransform::new([35.0, 80.0], 0.5),
        ViewTransform::identity(),
    ] {
        session.handle(PlotEvent::Transform(transform)).unwrap();
        assert_eq!(session.players(), players.as_slice());
        assert_eq!(session.scales().y.domain(), y_domain);
        assert_eq!(session.scene().groups(), groups.as_slice());
    }
}

#[test]
fn test_transform_redraws_both_axes() {
    let dir = results_dir();
    let mut session = session(&dir);
    session.load_dataset("all_results").unwrap();
    let y_ticks = session.scene().y_axis().unwrap().ticks.clone();

    session
        .apply_transform(ViewTransform::new([-90.0, 0.0], 2.0))
        .unwrap();
    assert_eq!(session.scene().axis_redraws(), (2, 2));
    assert_eq!(session.scene().y_axis().unwrap().ticks, y_ticks);

    let x_axis = session.scene().x_axis().unwrap();
    assert_eq!(x_axis.range, [90.0, 1750.0]);
}

#[test]
fn test_zoomed_axis_ticks_stay_under_their_boxes() {
    let dir = results_dir();
    let csv: String = std::iter::once("player,scores\n".to_string())
        .chain((0..40).map(|i| format!("P{:02},\"[{},{},{}]\"\n", i, i, i + 1, i + 2)))
        .collect();
    write_results(dir.path(), "crowded", &csv);
    let mut session = session(&dir);
    session.load_dataset("crowded").unwrap();

    for transform in [
        ViewTransform::new([-800.0, 0.0], 10.0),
        ViewTransform::new([35.0, 0.0], 1.7),
    ] {
        session.apply_transform(transform).unwrap();
        let scene = session.scene();
        let container = *scene.container();
        let x_axis = scene.x_axis().unwrap();
        assert_eq!(x_axis.ticks.len(), 40);

        for tick in &x_axis.ticks {
            let rect = scene
                .group(&tick.label)
                .and_then(|g| g.of_kind(PrimitiveKind::Quartiles).next())
                .unwrap();
            let Shape::Rect { x, width, .. } = rect.shape else {
                panic!("expected rect for {}", tick.label);
            };
            let centre = container.apply_x(x + width / 2.0);
            assert!(
                (tick.position - centre).abs() < 1e-9,
                "{}: tick at {} but box centre at {}",
                tick.label,
                tick.position,
                centre
            );
        }
    }
}

// === Reset ===

#[test]
fn test_reset_reloads_selected_dataset() {
    let dir = results_dir();
    let mut session = session(&dir);
    session.load_dataset("switched").unwrap();
    session
        .apply_transform(ViewTransform::new([200.0, 0.0], 4.0))
        .unwrap();

    session.handle(PlotEvent::Reset).unwrap();
    assert!(session.transform().is_identity());
    assert_eq!(session.selected(), Some("switched"));
    assert_eq!(session.scene().groups().len(), 2);

    // Rebuilt groups fade in from transparent
    let now = session.clock();
    let b = session.scene().group("B").unwrap();
    assert!(b.primitives.iter().all(|p| p.opacity_at(now) == 0.0));
}

#[test]
fn test_reset_without_load_uses_default_dataset() {
    let dir = results_dir();
    let mut session = session(&dir);
    let report = session.reset().unwrap();
    assert_eq!(report.dataset, "all_results");
    assert_eq!(report.players, 3);
}
