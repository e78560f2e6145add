use lifeline_core::shape::{LifeSpan, Lifeline, Message, Role, RoleGroup};
use lifeline_core::{Graph, PaperConfig, ShapeId};
use lifeline_render::model::LayoutGeometry;
use lifeline_render::paper::{Paper, SvgSurface};
use lifeline_render::svg::{SvgRenderOptions, render_svg};
use lifeline_render::text::DeterministicTextMeasurer;
use lifeline_render::{LayoutOptions, layout_graph, layout_graph_json};

struct Scene {
    graph: Graph,
    messages: Vec<ShapeId>,
}

fn scene() -> Scene {
    let mut graph = Graph::new();
    let group = graph.add(RoleGroup::new());
    let mut lines = Vec::new();
    for (name, x) in [("Browser", 100.0), ("Web Server", 400.0), ("Database Server", 600.0)] {
        let mut role = Role::at(x, 20.0);
        role.set_name(name);
        let role = graph.add(role);
        if x > 100.0 {
            graph.embed(group, role).expect("embed");
        }
        let line = graph.add(Lifeline::new());
        graph.attach_to_role(line, role, 600.0).expect("attach");
        lines.push(line);
    }
    graph.fit_roles(group).expect("fit");

    let mut messages = Vec::new();
    for (from, to, start, text) in [
        (0, 1, 50.0, "HTTP GET Request"),
        (1, 2, 150.0, "SQL Command"),
        (2, 1, 250.0, "Result Set"),
        (1, 0, 350.0, "HTTP Response"),
    ] {
        let mut m = Message::new();
        m.set_from_to(lines[from], lines[to]);
        m.set_start(start);
        m.set_description(text);
        messages.push(graph.add(m));
    }
    graph
        .message_mut(messages[0])
        .expect("message")
        .set_color("red");
    let mut span = LifeSpan::new();
    span.attach_to_messages(messages[1], messages[2]);
    graph.add(span);
    Scene { graph, messages }
}

fn svg_of(graph: &Graph) -> String {
    let layout = layout_graph(graph, 800.0, 600.0, &DeterministicTextMeasurer::default())
        .expect("layout ok");
    render_svg(&layout, &SvgRenderOptions::default())
}

fn attr_f64(node: roxmltree::Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or_else(|| panic!("missing numeric attribute {name}"))
}

#[test]
fn svg_is_well_formed_and_sized_to_the_paper() {
    let svg = svg_of(&scene().graph);
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "svg");
    assert_eq!(root.attribute("width"), Some("800"));
    assert_eq!(root.attribute("height"), Some("600"));
    assert_eq!(root.attribute("style"), Some("border: 1px solid #E5E5E5"));

    let background = root
        .children()
        .find(|n| n.attribute("class") == Some("background"))
        .expect("background rect");
    assert_eq!(background.attribute("fill"), Some("#F3F7F6"));
}

#[test]
fn cells_are_emitted_in_stacking_order() {
    let svg = svg_of(&scene().graph);
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let types: Vec<&str> = doc
        .descendants()
        .filter(|n| n.attribute("class") == Some("cell"))
        .filter_map(|n| n.attribute("data-type"))
        .collect();
    let rank = |t: &str| match t {
        "sd.RoleGroup" => 1,
        "sd.Role" => 2,
        "sd.Lifeline" => 3,
        "sd.LifeSpan" => 4,
        "sd.Message" => 5,
        other => panic!("unexpected cell type {other}"),
    };
    assert_eq!(types.len(), 12);
    assert!(types.windows(2).all(|w| rank(w[0]) <= rank(w[1])));
}

#[test]
fn messages_are_emitted_in_source_order() {
    let s = scene();
    let svg = svg_of(&s.graph);
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let ids: Vec<String> = doc
        .descendants()
        .filter(|n| n.attribute("data-type") == Some("sd.Message"))
        .filter_map(|n| n.attribute("data-id"))
        .map(str::to_string)
        .collect();
    let expected: Vec<String> = s.messages.iter().map(ToString::to_string).collect();
    assert_eq!(ids, expected);
}

#[test]
fn group_rect_wraps_backend_roles() {
    let svg = svg_of(&scene().graph);
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");
    let group = doc
        .descendants()
        .find(|n| n.attribute("data-type") == Some("sd.RoleGroup"))
        .expect("group cell");
    let rect = group
        .children()
        .find(|n| n.has_tag_name("rect"))
        .expect("group rect");
    assert_eq!(attr_f64(rect, "x"), 390.0);
    assert_eq!(attr_f64(rect, "y"), 10.0);
    assert_eq!(attr_f64(rect, "width"), 320.0);
    assert_eq!(attr_f64(rect, "height"), 100.0);
}

#[test]
fn message_lines_and_label_colors() {
    let s = scene();
    let svg = svg_of(&s.graph);
    let doc = roxmltree::Document::parse(&svg).expect("svg parses");

    let first = doc
        .descendants()
        .find(|n| n.attribute("data-id") == Some(s.messages[0].to_string().as_str()))
        .expect("first message");
    let line = first
        .descendants()
        .find(|n| n.attribute("class") == Some("line"))
        .expect("line path");
    assert_eq!(line.attribute("d"), Some("M 150 150 L 450 150"));
    assert_eq!(line.attribute("stroke"), Some("red"));
    let body = first
        .descendants()
        .find(|n| n.has_tag_name("rect"))
        .expect("label body");
    assert_eq!(body.attribute("fill"), Some("red"));

    let last = doc
        .descendants()
        .find(|n| n.attribute("data-id") == Some(s.messages[3].to_string().as_str()))
        .expect("last message");
    let text: String = last
        .descendants()
        .filter(|n| n.has_tag_name("tspan"))
        .filter_map(|n| n.text())
        .collect();
    assert_eq!(text, "HTTP Response");
    let line = last
        .descendants()
        .find(|n| n.attribute("class") == Some("line"))
        .expect("line path");
    assert_eq!(line.attribute("d"), Some("M 450 450 L 150 450"));
    assert_eq!(line.attribute("stroke"), Some("#4666E5"));
}

#[test]
fn lifespan_icon_is_centered_between_messages() {
    let s = scene();
    let layout = layout_graph(&s.graph, 800.0, 600.0, &DeterministicTextMeasurer::default())
        .expect("layout ok");
    let span = layout
        .shapes
        .iter()
        .find_map(|shape| match &shape.geometry {
            LayoutGeometry::LifeSpan {
                source,
                target,
                icon,
                ..
            } => Some((*source, *target, *icon)),
            _ => None,
        })
        .expect("lifespan");
    assert_eq!((span.0.x, span.0.y), (650.0, 250.0));
    assert_eq!((span.1.x, span.1.y), (650.0, 350.0));
    assert_eq!((span.2.x, span.2.y), (650.0, 300.0));
}

#[test]
fn markup_in_names_is_escaped() {
    let mut graph = Graph::new();
    let mut role = Role::at(10.0, 10.0);
    role.set_name("<b>&</b>");
    graph.add(role);
    let svg = svg_of(&graph);
    assert!(svg.contains("&lt;b&gt;&amp;&lt;/b&gt;"));
    roxmltree::Document::parse(&svg).expect("svg parses");
}

#[test]
fn layout_json_round_trips_through_serde() {
    let s = scene();
    let json = layout_graph_json(&s.graph, 800.0, 600.0, &LayoutOptions::default(), false)
        .expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["width"], 800.0);
    assert_eq!(value["shapes"].as_array().map(Vec::len), Some(12));
    assert_eq!(value["shapes"][0]["geometry"]["kind"], "roleGroup");
}

#[test]
fn paper_paints_the_same_document() {
    let s = scene();
    let mut paper = Paper::new(SvgSurface::new(), &PaperConfig::default());
    paper.freeze();
    paper.update(&s.graph).expect("update");
    paper.unfreeze(&s.graph).expect("unfreeze");
    assert_eq!(paper.surface().svg(), Some(svg_of(&s.graph).as_str()));
}
