use scopegraph::render::backend::Axis;
use scopegraph::render::drag::DragState;
use scopegraph::render::scene::Scene;
use scopegraph::state::markers::{MarkerId, MarkerPair};
use scopegraph::{Dataset, GraphConfig, GraphState, LineWidth, MemoryStore, PlotType, Sample};

fn mk_dataset(label: &str, plot_type: PlotType, points: &[(f64, f64)]) -> Dataset {
    let samples = points.iter().map(|&(x, y)| Sample::new(x, y)).collect();
    Dataset::new(label, plot_type, samples)
}

fn mk_graph(config: &GraphConfig) -> GraphState<MemoryStore, Scene> {
    GraphState::new(MemoryStore::new(), Scene::new(), config)
}

fn canvas() -> egui::Rect {
    egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(200.0, 100.0))
}

fn assert_bijection(graph: &GraphState<MemoryStore, Scene>) {
    let registry = graph.registry();
    assert!(registry.is_consistent());
    assert_eq!(registry.len(), graph.backend().line_count());
    for (index, uid) in registry.lookup_table().iter().enumerate() {
        let line = registry.line(*uid).expect("lookup entry without a line");
        assert_eq!(registry.uid_for_handle(line.handle), Some(*uid));
        assert_eq!(graph.backend().curves()[index].handle, line.handle);
    }
}

#[test]
fn register_two_then_remove_first() {
    let mut graph = mk_graph(&GraphConfig::default());
    let a = graph
        .store_mut()
        .insert(mk_dataset("A", PlotType::Time, &[(0.0, 0.0), (1.0, 1.0)]));
    let b = graph
        .store_mut()
        .insert(mk_dataset("B", PlotType::Time, &[(2.0, 4.0), (3.0, 9.0)]));

    graph.display_item(0);
    graph.display_item(1);
    assert_eq!(graph.registry().lookup_table(), &[a, b]);
    assert_bijection(&graph);

    graph.remove_item(0);
    assert_eq!(graph.registry().lookup_table(), &[b]);
    assert_eq!(graph.backend().line_count(), 1);
    assert_bijection(&graph);
}

#[test]
fn add_then_remove_restores_previous_state() {
    let mut graph = mk_graph(&GraphConfig::default());
    graph
        .store_mut()
        .insert(mk_dataset("A", PlotType::Time, &[(0.0, 0.0), (1.0, 1.0)]));
    let b = graph
        .store_mut()
        .insert(mk_dataset("B", PlotType::Time, &[(5.0, 5.0)]));
    graph.display_item(0);
    let before = graph.registry().lookup_table().to_vec();

    graph.display_item(1);
    graph.remove_dataset(b);
    assert_eq!(graph.registry().lookup_table(), before.as_slice());
    assert!(!graph.registry().contains(b));
    assert_bijection(&graph);
}

#[test]
fn rescale_covers_union_of_lines() {
    let mut graph = mk_graph(&GraphConfig::default());
    graph
        .store_mut()
        .insert(mk_dataset("a", PlotType::Time, &[(0.0, 1.0), (10.0, 2.0)]));
    graph
        .store_mut()
        .insert(mk_dataset("b", PlotType::Time, &[(5.0, -3.0), (20.0, 0.0)]));
    graph.display_item(0);
    graph.display_item(1);

    let (x_low, x_high) = graph.backend().axis_range(Axis::X);
    assert!(x_low <= 0.0 && x_high >= 20.0);
    assert_eq!(graph.backend().axis_range(Axis::Y), (-3.0, 2.0));
}

#[test]
fn rescale_without_lines_keeps_axes() {
    let config = GraphConfig {
        initial_x_range: [-4.0, 4.0],
        initial_y_range: [0.0, 2.0],
        ..Default::default()
    };
    let mut graph = mk_graph(&config);
    graph.rescale_to_fit();
    assert_eq!(graph.backend().axis_range(Axis::X), (-4.0, 4.0));
    assert_eq!(graph.backend().axis_range(Axis::Y), (0.0, 2.0));
}

#[test]
fn single_point_rescale_is_not_degenerate() {
    let mut graph = mk_graph(&GraphConfig::default());
    graph
        .store_mut()
        .insert(mk_dataset("p", PlotType::Time, &[(3.0, 7.0)]));
    graph.display_item(0);
    assert_eq!(graph.backend().axis_range(Axis::X), (2.5, 3.5));
    assert_eq!(graph.backend().axis_range(Axis::Y), (6.5, 7.5));
}

#[test]
fn missing_dataset_is_a_logged_no_op() {
    let mut graph = mk_graph(&GraphConfig::default());
    let ghost = mk_dataset("ghost", PlotType::Time, &[(0.0, 0.0)]);
    graph.display_data_set(&ghost, false);
    assert!(graph.registry().is_empty());
    assert_eq!(graph.backend().line_count(), 0);
}

#[test]
fn drag_upper_x_marker() {
    let config = GraphConfig {
        initial_x_range: [2.0, 5.0],
        initial_y_range: [1.0, 8.0],
        ..Default::default()
    };
    let mut graph = mk_graph(&config);
    graph
        .store_mut()
        .insert(mk_dataset("frame", PlotType::Time, &[(0.0, 0.0), (10.0, 10.0)]));
    graph.display_item(0);
    let rect = canvas();
    let lookup_before = graph.registry().lookup_table().to_vec();

    let press = graph.view().data_to_screen(5.0, 4.0, rect) + egui::vec2(3.0, 0.0);
    assert!(graph.handle_mouse_press(press, rect));
    assert_eq!(graph.drag_state(), DragState::DraggingHorizontal(MarkerId::XHigh));

    // Off-axis motion: only the x coordinate of the grabbed marker follows.
    let target = graph.view().data_to_screen(7.0, 9.0, rect);
    assert!(graph.handle_mouse_move(target, rect));
    let (x1, x2) = graph.markers().range(MarkerPair::X);
    assert_eq!(x1, 2.0);
    assert!((x2 - 7.0).abs() < 1e-6);
    assert_eq!(graph.markers().range(MarkerPair::Y), (1.0, 8.0));
    assert_eq!(graph.registry().lookup_table(), lookup_before.as_slice());

    let handle = graph.markers().handle(MarkerId::XHigh);
    assert!((graph.backend().straight_line(handle).unwrap().value - 7.0).abs() < 1e-6);
    assert!(graph.backend().labels()[0].text.starts_with("\u{0394}x = 5"));

    graph.handle_mouse_release();
    assert_eq!(graph.drag_state(), DragState::NoDrag);
    assert!(!graph.handle_mouse_move(target, rect));

    // The old marker position no longer hits anything.
    let stale = graph.view().data_to_screen(5.0, 4.0, rect) + egui::vec2(3.0, 0.0);
    assert!(!graph.handle_mouse_press(stale, rect));
    assert_eq!(graph.drag_state(), DragState::NoDrag);
}

#[test]
fn external_range_changes_refresh_label() {
    let mut graph = mk_graph(&GraphConfig::default());
    graph.set_x_range(1.0, 4.0);
    graph.set_y_range(-2.0, 2.0);
    assert_eq!(graph.markers().delta(MarkerPair::X), 3.0);
    assert_eq!(graph.markers().delta(MarkerPair::Y), 4.0);
    assert_eq!(graph.backend().labels()[0].text, "\u{0394}x = 3\n\u{0394}y = 4");
    assert_eq!(graph.backend().labels()[0].anchor, Sample::new(2.5, 0.0));
}

#[test]
fn line_width_reaches_every_line_kind() {
    let mut graph = mk_graph(&GraphConfig::default());
    let uid = graph
        .store_mut()
        .insert(mk_dataset("s", PlotType::FftAmplitude, &[(0.0, 1.0), (1.0, 2.0)]));
    graph.display_item(0);
    assert!(graph.set_calibration_line(uid, 0.5));

    graph.change_line_width(LineWidth::Larger);
    assert!(graph.backend().curves().iter().all(|c| c.width == 3.0));
    assert!(graph.backend().straight_lines().iter().all(|l| l.width == 3.0));
    assert_eq!(graph.backend().straight_lines().len(), 5);

    // New lines pick up the active width.
    graph
        .store_mut()
        .insert(mk_dataset("t", PlotType::FftAmplitude, &[(0.0, 0.0)]));
    graph.display_item(1);
    assert_eq!(graph.backend().curves()[1].width, 3.0);
}

#[test]
fn plot_type_switch_redraws_with_unwrapping() {
    let mut graph = mk_graph(&GraphConfig::default());
    graph.store_mut().insert(mk_dataset(
        "phase",
        PlotType::FftPhase,
        &[(0.0, 3.0), (1.0, -3.0), (2.0, 3.1)],
    ));
    graph.display_item(0);
    assert_eq!(graph.plot_type(), PlotType::FftPhase);
    assert_eq!(graph.backend().curves()[0].samples[1].y, -3.0);

    graph.set_plot_type(PlotType::FftPhaseUnwrapped);
    assert_eq!(graph.backend().axis_label(Axis::Y), "Phase (rad, unwrapped)");
    let ys: Vec<f64> = graph.backend().curves()[0].samples.iter().map(|s| s.y).collect();
    assert_eq!(ys[0], 3.0);
    assert!((ys[1] - (2.0 * std::f64::consts::PI - 3.0)).abs() < 1e-12);
    assert!(ys.windows(2).all(|w| (w[1] - w[0]).abs() < std::f64::consts::PI));
}

#[test]
fn live_ticks_update_in_place_and_rescale() {
    let mut graph = mk_graph(&GraphConfig::default());
    let mut live = mk_dataset("live", PlotType::Time, &[(0.0, 0.0), (1.0, 1.0)]);
    graph.display_data_set(&live, true);
    assert_eq!(graph.live_uid(), Some(live.uid));

    for tick in 1..=3 {
        let n = tick as f64;
        live.set_samples(vec![Sample::new(n, -n), Sample::new(n + 1.0, n)]);
        graph.update_live(&live);
    }
    assert_eq!(graph.registry().len(), 1);
    assert_eq!(graph.backend().axis_range(Axis::X), (3.0, 4.0));
    assert_eq!(graph.backend().axis_range(Axis::Y), (-3.0, 3.0));
    assert_bijection(&graph);
}

#[test]
fn amplitude_is_independent_of_lines() {
    let mut graph = mk_graph(&GraphConfig::default());
    graph.set_amplitude(0.25);
    graph.set_amplitude(0.75);
    assert_eq!(graph.amplitude().value(), Some(0.75));
    assert_eq!(graph.amplitude().range(), Some((0.25, 0.75)));
    assert!(graph.registry().is_empty());
}
