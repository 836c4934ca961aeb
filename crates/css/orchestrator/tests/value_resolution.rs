#![cfg(test)]

use css_orchestrator::{
    BoxSize, DocumentMetrics, GeometryProvider, Rect, ResolveRequest, ResolvedValue,
    ResolverConfig, Rgba, Specificity, StyleProvider, Unresolved, ValueResolver, score_specificity,
};
use std::collections::HashMap;

const ROOT: usize = 0;
const CONTAINER: usize = 1;
const WRAPPER: usize = 2;
const ABSOLUTE: usize = 3;
const FIXED: usize = 4;
const DETACHED: usize = 5;
const CODE: usize = 6;

#[derive(Default)]
struct Node {
    parent: Option<usize>,
    computed: HashMap<&'static str, &'static str>,
    custom: HashMap<&'static str, &'static str>,
    content: Option<BoxSize>,
    rect: Option<Rect>,
    out_of_flow: bool,
}

/// A small fixed tree standing in for a laid-out document.
struct Document {
    nodes: Vec<Node>,
}

impl Document {
    fn node(&self, element: usize) -> Option<&Node> {
        self.nodes.get(element)
    }
}

impl StyleProvider for Document {
    type Handle = usize;

    fn computed_value(&self, element: usize, property: &str) -> String {
        self.node(element)
            .and_then(|node| node.computed.get(property))
            .map(|value| (*value).to_owned())
            .unwrap_or_default()
    }

    fn custom_property(&self, element: usize, name: &str) -> String {
        self.node(element)
            .and_then(|node| node.custom.get(name))
            .map(|value| (*value).to_owned())
            .unwrap_or_default()
    }
}

impl GeometryProvider for Document {
    type Handle = usize;

    fn content_box(&self, element: usize) -> Option<BoxSize> {
        self.node(element).and_then(|node| node.content)
    }

    fn bounding_rect(&self, element: usize) -> Option<Rect> {
        self.node(element).and_then(|node| node.rect)
    }

    fn parent_of(&self, element: usize) -> Option<usize> {
        self.node(element).and_then(|node| node.parent)
    }

    fn is_out_of_flow(&self, element: usize) -> bool {
        self.node(element).is_some_and(|node| node.out_of_flow)
    }
}

fn document() -> Document {
    let root = Node {
        computed: HashMap::from([("font-size", "16px"), ("position", "static")]),
        content: Some(BoxSize::new(1000.0, 800.0)),
        ..Node::default()
    };
    let container = Node {
        parent: Some(ROOT),
        computed: HashMap::from([("font-size", "20px"), ("position", "relative")]),
        custom: HashMap::from([
            ("--gap", "8px"),
            ("--loop-a", "var(--loop-b)"),
            ("--loop-b", "var(--loop-a)"),
        ]),
        content: Some(BoxSize::new(400.0, 300.0)),
        ..Node::default()
    };
    let wrapper = Node {
        parent: Some(CONTAINER),
        computed: HashMap::from([("font-size", "20px"), ("position", "static")]),
        content: Some(BoxSize::new(200.0, 100.0)),
        ..Node::default()
    };
    let absolute = Node {
        parent: Some(WRAPPER),
        computed: HashMap::from([("font-size", "10px"), ("position", "absolute")]),
        rect: Some(Rect {
            top: 5.0,
            left: 5.0,
            width: 50.0,
            height: 40.0,
        }),
        out_of_flow: true,
        ..Node::default()
    };
    let fixed = Node {
        parent: Some(WRAPPER),
        computed: HashMap::from([("font-size", "10px"), ("position", "fixed")]),
        out_of_flow: true,
        ..Node::default()
    };
    let detached = Node::default();
    let code = Node {
        parent: Some(CONTAINER),
        computed: HashMap::from([
            ("font-size", "13px"),
            ("font-family", "Menlo, monospace"),
        ]),
        ..Node::default()
    };
    Document {
        nodes: vec![root, container, wrapper, absolute, fixed, detached, code],
    }
}

fn resolve(property: &str, raw: &str, element: usize) -> Result<String, Unresolved> {
    let doc = document();
    let resolver = ValueResolver::new(&doc, &doc, &ResolverConfig::default());
    resolver
        .resolve_value(property, raw, element, None)
        .map(|value| value.to_string())
}

#[test]
fn canonical_values_are_idempotent() {
    let doc = document();
    let resolver = ValueResolver::new(&doc, &doc, &ResolverConfig::default());
    let first = resolver.resolve_value("width", "10px", WRAPPER, None);
    assert_eq!(first, Ok(ResolvedValue::Length(10.0)));
    let again = first.and_then(|value| {
        resolver.resolve_value("width", &value.to_string(), WRAPPER, None)
    });
    assert_eq!(again, Ok(ResolvedValue::Length(10.0)));
}

#[test]
fn nested_math_resolves_and_mixed_types_fail() {
    assert_eq!(
        resolve("width", "calc(calc(2px * 2) + 2px)", WRAPPER),
        Ok("6px".to_owned())
    );
    assert_eq!(
        resolve("width", "calc(1px + 2)", WRAPPER),
        Err(Unresolved::TypeMismatch)
    );
    assert_eq!(resolve("width", "-4px", WRAPPER), Err(Unresolved::OutOfRange));
    assert_eq!(resolve("width", "   ", WRAPPER), Err(Unresolved::Malformed));
}

#[test]
fn percentages_use_the_parent_content_box() {
    assert_eq!(resolve("width", "50%", WRAPPER), Ok("200px".to_owned()));
    assert_eq!(resolve("height", "50%", WRAPPER), Ok("150px".to_owned()));
    assert_eq!(
        resolve("width", "50%", DETACHED),
        Err(Unresolved::MissingPercentageBasis)
    );
}

#[test]
fn out_of_flow_elements_skip_static_ancestors() {
    assert_eq!(resolve("width", "50%", ABSOLUTE), Ok("200px".to_owned()));
    assert_eq!(
        resolve("width", "calc(100% - 10px)", ABSOLUTE),
        Ok("390px".to_owned())
    );
}

#[test]
fn fixed_elements_use_the_positioned_ancestor() {
    assert_eq!(resolve("width", "10%", FIXED), Ok("40px".to_owned()));
    assert_eq!(resolve("height", "10%", FIXED), Ok("30px".to_owned()));
}

#[test]
fn explicit_bounding_box_wins() {
    let doc = document();
    let resolver = ValueResolver::new(&doc, &doc, &ResolverConfig::default());
    assert_eq!(
        resolver.resolve_value("width", "25%", DETACHED, Some(BoxSize::new(80.0, 10.0))),
        Ok(ResolvedValue::Length(20.0))
    );
}

#[test]
fn shorthand_sides_cycle_axes() {
    assert_eq!(
        resolve("inset", "10% 10% auto", WRAPPER),
        Ok("30px 40px auto".to_owned())
    );
    assert_eq!(
        resolve("margin", "0 auto 1em", WRAPPER),
        Ok("0px auto 20px".to_owned())
    );
}

#[test]
fn font_sizes_resolve_against_the_parent() {
    assert_eq!(resolve("font-size", "2em", WRAPPER), Ok("40px".to_owned()));
    assert_eq!(resolve("font-size", "50%", WRAPPER), Ok("10px".to_owned()));
    assert_eq!(resolve("font-size", "2em", ROOT), Ok("32px".to_owned()));
    assert_eq!(resolve("line-height", "1.5", CONTAINER), Ok("1.5".to_owned()));
    assert_eq!(resolve("line-height", "150%", CONTAINER), Ok("30px".to_owned()));
}

#[test]
fn monospace_text_uses_the_fixed_root_size() {
    assert_eq!(resolve("width", "1rem", CODE), Ok("13px".to_owned()));
    assert_eq!(resolve("width", "1rem", CONTAINER), Ok("16px".to_owned()));
}

#[test]
fn var_references_substitute_before_evaluation() {
    assert_eq!(
        resolve("margin-left", "var(--gap)", CONTAINER),
        Ok("8px".to_owned())
    );
    assert_eq!(
        resolve("margin-left", "calc(var(--gap) * 2)", CONTAINER),
        Ok("16px".to_owned())
    );
    assert_eq!(
        resolve("margin-left", "var(--missing, 3px)", CONTAINER),
        Ok("3px".to_owned())
    );
    assert!(matches!(
        resolve("margin-left", "var(--missing)", CONTAINER),
        Err(Unresolved::UndefinedCustomProperty(_))
    ));
    assert!(matches!(
        resolve("margin-left", "var(--loop-a)", CONTAINER),
        Err(Unresolved::CyclicReference(_))
    ));
}

#[test]
fn color_channels_may_use_math() {
    let doc = document();
    let resolver = ValueResolver::new(&doc, &doc, &ResolverConfig::default());
    let resolved = resolver.resolve_value("color", "rgb(calc(1 + 2), 0, 0)", ROOT, None);
    assert!(matches!(
        resolved,
        Ok(ResolvedValue::Color(color)) if color.rgba == Rgba::new(3, 0, 0, 255)
    ));
    assert_eq!(
        resolve("background-color", "rgba(0, 0, 0, 50%)", ROOT),
        Ok("rgba(0, 0, 0, 0.502)".to_owned())
    );
}

#[test]
fn transforms_measure_the_own_border_box() {
    assert_eq!(
        resolve("transform", "translate(50%, 50%) rotate(0.5turn)", ABSOLUTE),
        Ok("translate(25px, 20px) rotate(180deg)".to_owned())
    );
    assert_eq!(resolve("transform", "none", ABSOLUTE), Ok("none".to_owned()));
}

#[test]
fn timing_lists_normalize_to_milliseconds() {
    assert_eq!(
        resolve("transition-duration", "1s, 250ms", ROOT),
        Ok("1000ms, 250ms".to_owned())
    );
    assert_eq!(
        resolve("animation-duration", "-1s", ROOT),
        Err(Unresolved::OutOfRange)
    );
}

#[test]
fn bounded_numbers_fail_outside_their_range() {
    assert_eq!(resolve("opacity", "calc(0.25 * 2)", ROOT), Ok("0.5".to_owned()));
    assert_eq!(resolve("opacity", "1.5", ROOT), Err(Unresolved::OutOfRange));
    assert_eq!(resolve("z-index", "calc(7 / 2)", ROOT), Ok("4".to_owned()));
}

#[test]
fn unknown_properties_use_the_heuristic() {
    assert_eq!(
        resolve("-x-custom-shadow", "2px 1em #f00 solid", CONTAINER),
        Ok("2px 20px #ff0000 solid".to_owned())
    );
    assert_eq!(
        resolve("box-shadow", "0 0 5px rgba(0, 0, 0, 0.5), inset 1px 1px blue", CONTAINER),
        Ok("0px 0px 5px rgba(0, 0, 0, 0.502), inset 1px 1px #0000ff".to_owned())
    );
}

#[test]
fn declaration_blocks_see_their_own_custom_properties() {
    let doc = document();
    let resolver = ValueResolver::new(&doc, &doc, &ResolverConfig::default());
    let resolved: Vec<(String, Result<String, Unresolved>)> = resolver
        .resolve_declarations(
            "--pad: 4px; padding: var(--pad) 2em; color: blue !important",
            CONTAINER,
        )
        .into_iter()
        .map(|(declaration, value)| (declaration.name, value.map(|found| found.to_string())))
        .collect();
    assert_eq!(
        resolved,
        vec![
            ("padding".to_owned(), Ok("4px 40px".to_owned())),
            ("color".to_owned(), Ok("#0000ff".to_owned())),
        ]
    );
}

#[test]
fn batches_keep_request_order() {
    let doc = document();
    let resolver = ValueResolver::new(&doc, &doc, &ResolverConfig::default());
    let requests = vec![
        ResolveRequest::new("width", "50%", WRAPPER),
        ResolveRequest::new("width", "50%", DETACHED),
        ResolveRequest::new("transition-delay", "0.5s", ROOT),
        ResolveRequest {
            bounding_box: Some(BoxSize::new(10.0, 10.0)),
            ..ResolveRequest::new("height", "100%", DETACHED)
        },
    ];
    assert_eq!(
        resolver.resolve_batch(&requests),
        vec![
            Ok(ResolvedValue::Length(200.0)),
            Err(Unresolved::MissingPercentageBasis),
            Ok(ResolvedValue::Time(500.0)),
            Ok(ResolvedValue::Length(10.0)),
        ]
    );
}

#[test]
fn facades_cover_specificity_and_units() {
    assert_eq!(score_specificity("#nav .item > a"), Specificity(1, 1, 1));
    assert_eq!(score_specificity("a, :where(#x) b, .c"), Specificity(0, 1, 0));

    let doc = document();
    let resolver = ValueResolver::new(&doc, &doc, &ResolverConfig::default());
    let inches = resolver.convert_unit("96px", "in", ROOT);
    assert!(inches.is_ok_and(|value| (value - 1.0).abs() < 1e-9));
    let ems = resolver.convert_unit("40px", "em", CONTAINER);
    assert!(ems.is_ok_and(|value| (value - 2.0).abs() < 1e-9));
}

#[test]
fn viewport_units_follow_the_configuration() {
    let doc = document();
    let metrics = DocumentMetrics {
        viewport: BoxSize::new(500.0, 400.0),
        ..DocumentMetrics::default()
    };
    let resolver = ValueResolver::with_metrics(&doc, &doc, metrics);
    assert_eq!(
        resolver.resolve_value("width", "10vw", ROOT, None),
        Ok(ResolvedValue::Length(50.0))
    );
    assert_eq!(
        resolver.resolve_value("height", "calc(50vmin + 10vh)", ROOT, None),
        Ok(ResolvedValue::Length(240.0))
    );
}
