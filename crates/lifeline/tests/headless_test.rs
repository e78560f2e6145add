use lifeline::assemble::build_canonical;
use lifeline::geom::point;
use lifeline::render::{
    LayoutOptions, SvgRenderOptions, SvgSurface, render_svg, render_svg_sync, sanitize_svg_id,
};
use lifeline::view::{DiagnosticData, NetworkGraphView};
use lifeline::{DiagramConfig, PointerOutcome, ShapeType};

#[test]
fn async_and_sync_renders_agree() {
    let d = build_canonical(&DiagramConfig::default()).expect("assemble");
    let layout = LayoutOptions::default();
    let svg_options = SvgRenderOptions {
        diagram_id: Some(sanitize_svg_id("network graph #1")),
        ..SvgRenderOptions::default()
    };
    let sync = render_svg_sync(&d.graph, 800.0, 600.0, &layout, &svg_options).expect("sync");
    let via_async =
        futures::executor::block_on(render_svg(&d.graph, 800.0, 600.0, &layout, &svg_options))
            .expect("async");
    assert_eq!(sync, via_async);

    let doc = roxmltree::Document::parse(&sync).expect("svg parses");
    assert_eq!(doc.root_element().attribute("id"), Some("network-graph-1"));
}

#[test]
fn svg_ids_are_sanitized() {
    assert_eq!(sanitize_svg_id("  "), "sd-untitled");
    assert_eq!(sanitize_svg_id("1st"), "sd-1st");
    assert_eq!(sanitize_svg_id("a  b"), "a-b");
    assert_eq!(sanitize_svg_id("ok_id"), "ok_id");
}

#[test]
fn canonical_svg_lists_every_shape_once() {
    let mut view = NetworkGraphView::new(SvgSurface::new(), 800.0, 600.0);
    view.process_data(&DiagnosticData::default()).expect("process");
    let svg = view.surface().svg().expect("painted").to_string();
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");

    let count = |t: ShapeType| {
        doc.descendants()
            .filter(|n| n.attribute("data-type") == Some(t.name()))
            .count()
    };
    assert_eq!(count(ShapeType::RoleGroup), 1);
    assert_eq!(count(ShapeType::Role), 3);
    assert_eq!(count(ShapeType::Lifeline), 3);
    assert_eq!(count(ShapeType::Message), 4);
    assert_eq!(count(ShapeType::LifeSpan), 1);
}

#[test]
fn dragging_a_backend_role_refits_the_group() {
    let mut view = NetworkGraphView::new(SvgSurface::new(), 800.0, 600.0);
    view.process_data(&DiagnosticData::default()).expect("process");
    let d = view.diagram().expect("diagram");
    let (role, backend) = (d.roles[2], d.backend);

    // Grab the role 10px inside its origin and push it far right.
    view.pointer_down(role, point(610.0, 30.0)).expect("down");
    let mut last = PointerOutcome::Idle;
    for _ in 0..8 {
        last = view.pointer_move(point(2000.0, 500.0)).expect("move");
    }
    let PointerOutcome::ElementMoved { position, .. } = last else {
        panic!("expected the role to move, got {last:?}");
    };
    // Embedded band: x in [20, 780 - 100]; y locked.
    assert_eq!((position.x, position.y), (680.0, 20.0));

    let graph = &view.diagram().expect("diagram").graph;
    let group = graph.bbox(backend).expect("group bbox");
    let moved = graph.bbox(role).expect("role bbox");
    assert!(group.min_x() <= moved.min_x() - 10.0);
    assert!(group.max_x() >= moved.max_x() + 10.0);
}

#[test]
fn diagnostic_data_deserializes_from_host_json() {
    let data: DiagnosticData = serde_json::from_str(
        r#"{ "table": { "rows": [] }, "renderingProperties": { "type": 21 } }"#,
    )
    .expect("json");
    assert_eq!(data.rendering_properties["type"], 21);
}
