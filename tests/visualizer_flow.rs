use jewelry_visualizer::calibration::reference_height_px;
use jewelry_visualizer::config::{
    CALIBRATION_STORAGE_KEY, CENTER_STONE_CATALOG, SIDE_STONE_CATALOG, STONE_IMAGE_TABLE,
};
use jewelry_visualizer::images::ImageRegistry;
use jewelry_visualizer::slider::{SliderInput, SliderPhase};
use jewelry_visualizer::storage::{KeyValueStore, MemoryStore};
use jewelry_visualizer::{
    parse_catalog, CalibrationStore, StepDirection, StoneCategory, VisualizerAction,
    VisualizerState,
};

fn sample_state(store: MemoryStore) -> VisualizerState<MemoryStore> {
    let registry = ImageRegistry::from_json(STONE_IMAGE_TABLE).unwrap();
    VisualizerState::new(
        parse_catalog(CENTER_STONE_CATALOG, StoneCategory::Center).resolve_images(&registry),
        parse_catalog(SIDE_STONE_CATALOG, StoneCategory::Side).resolve_images(&registry),
        vec![8.0, 8.0, 12.0, 20.0],
        CalibrationStore::load(store),
    )
}

#[test]
fn sample_center_catalog_loads_in_source_order() {
    let load = parse_catalog(CENTER_STONE_CATALOG, StoneCategory::Center);
    let titles: Vec<_> = load.stones.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["Round", "Emerald", "Oval", "Diamond cut", "Diamond", "Hexa"]);
    assert!(load.skipped.is_empty());
    assert!(load.stones.iter().all(|s| s.aspect_ratio > 0.0 && s.aspect_ratio.is_finite()));
}

#[test]
fn sample_catalog_lines_round_trip() {
    for (text, category) in [
        (CENTER_STONE_CATALOG, StoneCategory::Center),
        (SIDE_STONE_CATALOG, StoneCategory::Side),
    ] {
        let lines: Vec<_> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        let load = parse_catalog(text, category);
        let rendered: Vec<_> = load.stones.iter().map(|s| s.to_catalog_line()).collect();
        assert_eq!(rendered, lines);
    }
}

#[test]
fn shared_titles_keep_category_images() {
    let state = sample_state(MemoryStore::new());
    let center_hexa = state.center_stones().iter().find(|s| s.title == "Hexa").unwrap();
    let side_hexa = state.side_stones().iter().find(|s| s.title == "Hexa").unwrap();
    assert_eq!(center_hexa.image_reference.as_deref(), Some("./assets/center-stones/Hexa.png"));
    assert_eq!(side_hexa.image_reference.as_deref(), Some("./assets/side-stones/Hexa.png"));
}

#[test]
fn selecting_and_dragging_a_center_stone() {
    let mut state = sample_state(MemoryStore::new());
    state.apply(VisualizerAction::SelectCenterStone(1));
    state.apply(VisualizerAction::SelectCenterSize(5.3));

    let geometries = state.geometries();
    assert_eq!(geometries.len(), 4);
    assert_eq!(geometries[0].title, "Moon");
    assert_eq!(geometries[0].dots.len(), 10);
    assert_eq!(geometries[0].dots[0].offset_px, 105.0);

    // Click the third Moon dot, let the snap finish, then drag away from every dot.
    state.apply(VisualizerAction::Slider { slider: 0, input: SliderInput::DotClick { dot: 2 } });
    assert_eq!(state.sliders()[0].phase(), SliderPhase::Snapping { dot: 2 });
    state.apply(VisualizerAction::Slider { slider: 0, input: SliderInput::SnapSettled });
    assert_eq!(state.sliders()[0].phase(), SliderPhase::Idle);

    let top = state.sliders()[0].top();
    state.apply(VisualizerAction::Slider { slider: 0, input: SliderInput::Press { y: 500.0 } });
    state.apply(VisualizerAction::PointerMove { y: 552.5 });
    state.apply(VisualizerAction::PointerRelease);
    assert_eq!(state.sliders()[0].phase(), SliderPhase::Idle);
    assert_eq!(state.sliders()[0].top(), top + 52.5);
    assert!(!state.has_active_drag());
}

#[test]
fn calibration_survives_a_new_session() {
    let store = MemoryStore::new();
    let mut state = sample_state(store.clone());
    state.apply(VisualizerAction::StepCalibration(StepDirection::Up));
    state.apply(VisualizerAction::CardPress { y: 0.0 });
    let card_height = reference_height_px(state.calibration_ratio());
    state.apply(VisualizerAction::PointerMove { y: card_height * 0.25 });
    state.apply(VisualizerAction::PointerRelease);
    let ratio = state.calibration_ratio();

    assert_eq!(store.get(CALIBRATION_STORAGE_KEY), Some(ratio.to_string()));
    let next_session = sample_state(store);
    assert_eq!(next_session.calibration_ratio(), ratio);
}
