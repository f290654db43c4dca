//! End-to-end reconciliation through an [`Engine`] and a [`MemoryHost`].

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::{engine, expected_container};
use spark_fiber::{
    create_element, text, Child, EffectTag, Element, Engine, EngineConfig, HostCall, Listener,
    MemoryHost, PropChanges, PropValue, Props,
};

fn li(id: &str, label: &str) -> Element {
    create_element("li", Props::new().with("id", id), [label])
}

fn ul(items: Vec<Element>) -> Element {
    create_element("ul", Props::new(), items)
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn test_first_render_matches_element_tree() {
    let (mut engine, container) = engine();
    let tree = create_element(
        "div",
        Props::new().with("class", "app").with("tabindex", 0),
        [
            Child::from(create_element("h1", Props::new(), ["Title"])),
            Child::from(ul(vec![li("a", "one"), li("b", "two")])),
            Child::from("footer"),
        ],
    );

    engine.render(tree.clone(), container);
    engine.flush().unwrap();

    assert_eq!(engine.host().to_markup(container), expected_container(&tree));
    assert_eq!(engine.commit_count(), 1);
}

#[test]
fn test_primitive_children_become_text() {
    let (mut engine, container) = engine();
    let tree = create_element(
        "p",
        Props::new(),
        [Child::from(1), Child::from(true), Child::from(2.5), Child::from("!")],
    );
    engine.render(tree, container);
    engine.flush().unwrap();

    assert_eq!(engine.host().to_markup(container), "<root><p>1true2.5!</p></root>");
}

#[test]
fn test_identical_rerender_is_a_noop() {
    let (mut engine, container) = engine();
    let tree = ul(vec![li("a", "A"), li("b", "B")]);
    engine.render(tree.clone(), container);
    engine.flush().unwrap();
    engine.host_mut().clear_calls();

    engine.render(tree.clone(), container);
    engine.flush().unwrap();

    let report = engine.last_commit().unwrap();
    assert_eq!(report.placements(), 0);
    assert_eq!(report.deletions(), 0);
    assert!(report.effects.iter().all(|e| e.changes == PropChanges::NONE));
    assert_eq!(report.changed_updates().count(), 0);
    assert!(engine.host().calls().is_empty());
    assert_eq!(engine.host().to_markup(container), expected_container(&tree));
}

#[test]
fn test_single_attribute_change_touches_one_node() {
    let (mut engine, container) = engine();
    engine.render(ul(vec![li("a", "A"), li("b", "B"), li("c", "C")]), container);
    engine.flush().unwrap();

    let list = engine.host().children(container)[0];
    let b_node = engine.host().children(list)[1];
    engine.host_mut().clear_calls();

    let b = create_element("li", Props::new().with("id", "b").with("class", "active"), ["B"]);
    engine.render(ul(vec![li("a", "A"), b, li("c", "C")]), container);
    engine.flush().unwrap();

    let report = engine.last_commit().unwrap();
    let changed: Vec<_> = report.changed_updates().collect();
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].node_type.name(), "li");
    assert_eq!(changed[0].changes, PropChanges::ATTRS_SET);

    assert_eq!(
        engine.host().calls(),
        &[HostCall::SetAttribute { node: b_node, key: "class".into() }]
    );
    assert_eq!(engine.host().attribute(b_node, "class"), Some(&PropValue::from("active")));
}

#[test]
fn test_removed_attribute_is_cleared() {
    let (mut engine, container) = engine();
    let titled = create_element("a", Props::new().with("href", "/").with("title", "t"), ["x"]);
    engine.render(titled, container);
    engine.flush().unwrap();
    engine.host_mut().clear_calls();

    engine.render(create_element("a", Props::new().with("href", "/"), ["x"]), container);
    engine.flush().unwrap();

    let link = engine.host().children(container)[0];
    assert!(engine.host().attribute(link, "title").is_none());
    assert_eq!(
        engine.host().calls(),
        &[HostCall::RemoveAttribute { node: link, key: "title".into() }]
    );
    assert_eq!(
        engine.last_commit().unwrap().changed_updates().next().unwrap().changes,
        PropChanges::ATTRS_REMOVED
    );
}

// =============================================================================
// Positional matching
// =============================================================================

#[test]
fn test_removing_middle_item_reuses_host_nodes() {
    let (mut engine, container) = engine();
    engine.render(ul(vec![li("a", "a"), li("b", "b"), li("c", "c")]), container);
    engine.flush().unwrap();

    let list = engine.host().children(container)[0];
    let old_items = engine.host().children(list).to_vec();

    let next = ul(vec![li("a", "a"), li("c", "c")]);
    engine.render(next.clone(), container);
    engine.flush().unwrap();

    let report = engine.last_commit().unwrap();
    assert_eq!(report.deletions(), 1);
    assert_eq!(report.placements(), 0);

    // Position 1 keeps b's node and is rewritten to c; c's old node goes away
    assert_eq!(engine.host().children(list), &old_items[..2]);
    assert!(engine.host().parent(old_items[2]).is_none());
    assert_eq!(engine.host().to_markup(container), expected_container(&next));
}

#[test]
fn test_swap_without_keys_replaces_both() {
    let (mut engine, container) = engine();
    let p = || create_element("p", Props::new(), Vec::<Child>::new());
    let span = || create_element("span", Props::new(), Vec::<Child>::new());

    engine.render(ul(vec![p(), span()]), container);
    engine.flush().unwrap();

    let next = ul(vec![span(), p()]);
    engine.render(next.clone(), container);
    engine.flush().unwrap();

    let report = engine.last_commit().unwrap();
    assert_eq!(report.deletions(), 2);
    assert_eq!(report.placements(), 2);
    // Only the list itself matched
    assert_eq!(report.updates(), 1);
    assert_eq!(engine.host().to_markup(container), expected_container(&next));
}

#[test]
fn test_replacement_keeps_position_before_reused_sibling() {
    let (mut engine, container) = engine();
    engine.render(ul(vec![create_element("p", Props::new(), ["x"]), li("b", "b")]), container);
    engine.flush().unwrap();

    let list = engine.host().children(container)[0];
    let kept = engine.host().children(list)[1];

    let next = ul(vec![create_element("div", Props::new(), ["y"]), li("b", "b")]);
    engine.render(next.clone(), container);
    engine.flush().unwrap();

    let children = engine.host().children(list);
    assert_eq!(children.len(), 2);
    assert_eq!(children[1], kept);
    assert_eq!(engine.host().tag(children[0]), Some("div"));
    assert!(engine
        .host()
        .calls()
        .iter()
        .any(|call| matches!(call, HostCall::InsertBefore { before, .. } if *before == kept)));
    assert_eq!(engine.host().to_markup(container), expected_container(&next));
}

#[test]
fn test_type_change_at_root_replaces_tree() {
    let (mut engine, container) = engine();
    engine.render(ul(vec![li("a", "a")]), container);
    engine.flush().unwrap();

    let next = create_element("ol", Props::new(), [li("a", "a")]);
    engine.render(next.clone(), container);
    engine.flush().unwrap();

    let report = engine.last_commit().unwrap();
    assert_eq!(report.deletions(), 1);
    // ol, li, text
    assert_eq!(report.placements(), 3);
    assert_eq!(engine.host().children(container).len(), 1);
    assert_eq!(engine.host().to_markup(container), expected_container(&next));
}

#[test]
fn test_effect_order_is_preorder() {
    let (mut engine, container) = engine();
    engine.render(ul(vec![li("a", "x"), li("b", "y")]), container);
    engine.flush().unwrap();

    let tags: Vec<_> = engine
        .last_commit()
        .unwrap()
        .effects
        .iter()
        .map(|e| (e.node_type.name().to_string(), e.tag))
        .collect();
    assert_eq!(
        tags,
        vec![
            ("ul".to_string(), EffectTag::Placement),
            ("li".to_string(), EffectTag::Placement),
            ("TEXT".to_string(), EffectTag::Placement),
            ("li".to_string(), EffectTag::Placement),
            ("TEXT".to_string(), EffectTag::Placement),
        ]
    );
}

// =============================================================================
// Listeners
// =============================================================================

fn counter() -> (Rc<Cell<u32>>, Listener) {
    let hits = Rc::new(Cell::new(0));
    let inner = hits.clone();
    (hits, Listener::new(move |_| inner.set(inner.get() + 1)))
}

fn button(handler: Option<Listener>) -> Element {
    let mut props = Props::new().with("type", "button");
    if let Some(handler) = handler {
        props.insert("onClick", handler);
    }
    create_element("button", props, ["go"])
}

#[test]
fn test_listener_bound_and_dispatched() {
    let (mut engine, container) = engine();
    let (hits, handler) = counter();
    engine.render(button(Some(handler)), container);
    engine.flush().unwrap();

    let node = engine.host().children(container)[0];
    assert_eq!(engine.host().dispatch(node, "click", &()), 1);
    assert_eq!(hits.get(), 1);
    // Listeners never show up as attributes
    assert_eq!(
        engine.host().to_markup(container),
        r#"<root><button type="button">go</button></root>"#
    );
}

#[test]
fn test_replaced_listener_is_rebound() {
    let (mut engine, container) = engine();
    let (old_hits, old) = counter();
    let (new_hits, new) = counter();

    engine.render(button(Some(old)), container);
    engine.flush().unwrap();
    engine.render(button(Some(new)), container);
    engine.flush().unwrap();

    let node = engine.host().children(container)[0];
    assert_eq!(engine.host().listener_count(node, "click"), 1);
    engine.host().dispatch(node, "click", &());
    assert_eq!(old_hits.get(), 0);
    assert_eq!(new_hits.get(), 1);

    let changes = engine.last_commit().unwrap().changed_updates().next().unwrap().changes;
    assert_eq!(changes, PropChanges::LISTENERS_BOUND | PropChanges::LISTENERS_UNBOUND);
}

#[test]
fn test_same_listener_is_left_alone() {
    let (mut engine, container) = engine();
    let (hits, handler) = counter();

    engine.render(button(Some(handler.clone())), container);
    engine.flush().unwrap();
    engine.host_mut().clear_calls();
    engine.render(button(Some(handler)), container);
    engine.flush().unwrap();

    assert!(engine.host().calls().is_empty());
    let node = engine.host().children(container)[0];
    engine.host().dispatch(node, "click", &());
    assert_eq!(hits.get(), 1);
}

#[test]
fn test_removed_listener_is_unbound() {
    let (mut engine, container) = engine();
    let (hits, handler) = counter();
    engine.render(button(Some(handler)), container);
    engine.flush().unwrap();
    engine.render(button(None), container);
    engine.flush().unwrap();

    let node = engine.host().children(container)[0];
    assert_eq!(engine.host().dispatch(node, "click", &()), 0);
    assert_eq!(hits.get(), 0);
}

#[test]
fn test_listener_receives_payload() {
    let (mut engine, container) = engine();
    let seen = Rc::new(Cell::new(0i64));
    let sink = seen.clone();
    let handler = Listener::new(move |event| {
        if let Some(value) = event.downcast_ref::<i64>() {
            sink.set(*value);
        }
    });
    let input = create_element("input", Props::new().with("onInput", handler), Vec::<Child>::new());
    engine.render(input, container);
    engine.flush().unwrap();

    let node = engine.host().children(container)[0];
    engine.host().dispatch(node, "input", &42i64);
    assert_eq!(seen.get(), 42);
}

#[test]
fn test_empty_listener_prefix_treats_everything_as_attribute() {
    let config = EngineConfig::default().with_listener_prefix("");
    let mut host = MemoryHost::new();
    let container = host.create_container("root");
    let mut engine = Engine::with_config(host, config);

    let link = create_element("a", Props::new().with("onClick", "track()"), Vec::<Child>::new());
    engine.render(link, container);
    engine.flush().unwrap();

    assert_eq!(
        engine.host().to_markup(container),
        r#"<root><a onClick="track()"></a></root>"#
    );
}

#[test]
fn test_malformed_listener_is_rejected_before_host_mutation() {
    let (mut engine, container) = engine();
    let link = create_element("a", Props::new().with("onClick", "track()"), Vec::<Child>::new());
    engine.render(link, container);

    assert!(engine.flush().is_err());
    assert_eq!(engine.host().attached_mutations(), 0);
    assert_eq!(engine.commit_count(), 0);
}

#[test]
fn test_text_helper_wraps_values() {
    let (mut engine, container) = engine();
    engine.render(create_element("span", Props::new(), [text(7), text("px")]), container);
    engine.flush().unwrap();

    assert_eq!(engine.host().to_markup(container), "<root><span>7px</span></root>");
}
