use bundle::app::actions::{ActionDispatcher, HostRequest, LogHost};
use bundle::app::surface::BundleSurface;
use bundle::domain::errors::ActionError;
use bundle::domain::model::{ScriptPolicy, Slot, Span};
use bundle::infra::config::Config;
use bundle::{PlacementGrid, TextKind, classify};

#[test]
fn classifier_reference_cases() {
    assert_eq!(classify(""), TextKind::Unknown);
    assert_eq!(classify("import os\nprint(1)"), TextKind::PythonScript);
    assert_eq!(classify("C:\\Users\\x\\file.txt"), TextKind::FilePaths);
    assert_eq!(
        classify("D:\\a\\file.txt\nD:\\b\\file2.txt"),
        TextKind::FilePaths
    );
    assert_eq!(classify("|group1|pSphere1"), TextKind::MayaDagPath);
    assert_eq!(classify("ns:grp|ns:meshShape1"), TextKind::MayaDagPath);
    assert_eq!(classify("not a path and not code !!"), TextKind::Unknown);
}

#[test]
fn grid_fills_columns_then_rows() {
    let mut grid: PlacementGrid<bundle::domain::model::BundleButton> = PlacementGrid::new();
    assert_eq!(grid.last_filled_row(), None);
    assert_eq!(grid.next_free_column(0), 0);

    let button = bundle::app::factory::ButtonFactory::new()
        .build("/tmp/a")
        .expect("path button");
    for col in 0..3 {
        assert_eq!(
            grid.add_to_next_column(button.clone()).unwrap(),
            Slot::new(0, col)
        );
    }
    assert_eq!(grid.add_to_next_row(button.clone()).unwrap(), Slot::new(1, 0));
    assert_eq!(grid.add_to_next_row(button).unwrap(), Slot::new(2, 0));
    assert!(Span::new(0, 1).is_err());
}

#[test]
fn default_surface_wraps_after_ten_columns() {
    let mut surface = BundleSurface::from_config(&Config::default());
    let mut last = Slot::new(0, 0);
    for i in 0..11 {
        last = surface
            .drop_text(&format!("/shots/sh{i:03}/comp.nk"))
            .unwrap()
            .expect("path drop")
            .slot;
    }
    assert_eq!(last, Slot::new(1, 0));
    assert_eq!(surface.buttons().count(), 11);
}

#[test]
fn script_buttons_respect_policy_end_to_end() {
    let mut surface = BundleSurface::default();
    let placement = surface
        .drop_text("for node in nodes:\n    print(node)\n")
        .unwrap()
        .expect("script drop");
    assert_eq!(placement.kind, TextKind::PythonScript);

    let mut host = LogHost::new().confirming(true);
    let err = surface
        .press(placement.slot, &ActionDispatcher::new(ScriptPolicy::Deny), &mut host)
        .unwrap_err();
    assert!(matches!(err, ActionError::ScriptDenied));
    assert!(host.requests().is_empty());

    surface
        .press(placement.slot, &ActionDispatcher::new(ScriptPolicy::Allow), &mut host)
        .unwrap();
    assert!(matches!(host.requests(), [HostRequest::RunScript(_)]));
}
