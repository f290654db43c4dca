//! Reconciler - Positional diff of one fiber's children.
//!
//! Walks the new element sequence and the alternate's child/sibling chain in
//! lockstep, one position at a time:
//!
//! | new element | old fiber | same type | result                                  |
//! |-------------|-----------|-----------|-----------------------------------------|
//! | yes         | yes       | yes       | Update, reuses old host node            |
//! | yes         | yes       | no        | Placement + old fiber queued as Deletion |
//! | yes         | no        | -         | Placement                               |
//! | no          | yes       | -         | old fiber queued as Deletion            |
//!
//! There are no keys: moving an element to another position shows up as a
//! Deletion + Placement pair wherever the types no longer line up.

use tracing::trace;

use crate::error::{ensure, Result};
use crate::primitives::Element;
use crate::types::{classify_prop, EffectTag, NodeType, PropKind, NODE_VALUE};
use super::fiber::{Fiber, FiberId};
use super::registry::FiberArena;

/// Check a child sequence before any fiber is built from it.
///
/// Runs ahead of [`reconcile_children`] so that a malformed element aborts
/// the unit of work with nothing allocated.
pub fn validate_children(elements: &[Element], listener_prefix: &str) -> Result<()> {
    for element in elements {
        validate_element(element, listener_prefix)?;
    }
    Ok(())
}

fn validate_element(element: &Element, listener_prefix: &str) -> Result<()> {
    match element.node_type() {
        // Only reachable through crate-internal constructors
        NodeType::Root => ensure(false, || "root type is reserved for render containers".into())?,
        NodeType::Tag(tag) => ensure(!tag.is_empty(), || "element type must not be empty".into())?,
        NodeType::Text => ensure(element.props().contains_key(NODE_VALUE), || {
            "text element without nodeValue".into()
        })?,
    }

    for (key, value) in element.props().iter() {
        match classify_prop(key, listener_prefix) {
            PropKind::Listener => ensure(value.is_listener(), || {
                format!("listener prop `{key}` on <{}> must hold a handler", element.node_type())
            })?,
            PropKind::Attribute => ensure(!value.is_listener(), || {
                format!("attribute prop `{key}` on <{}> holds a handler", element.node_type())
            })?,
        }
    }
    Ok(())
}

/// Build the next generation of `wip`'s children from `elements`.
///
/// The new chain replaces `wip.child`, in element order. Old fibers without a
/// counterpart are tagged [`EffectTag::Deletion`] and pushed onto `deletions`.
pub fn reconcile_children<N: Clone>(
    arena: &mut FiberArena<N>,
    wip: FiberId,
    elements: Vec<Element>,
    deletions: &mut Vec<FiberId>,
) {
    let mut old_fiber = arena[wip].alternate.and_then(|alternate| arena[alternate].child);
    let mut prev_sibling: Option<FiberId> = None;
    let mut elements = elements.into_iter();

    arena[wip].child = None;

    loop {
        let element = elements.next();

        let new_fiber = match (element, old_fiber) {
            (None, None) => break,

            (Some(element), Some(old)) if *element.node_type() == arena[old].node_type => {
                let (node_type, props, children) = element.into_parts();
                let mut fiber = Fiber::new(node_type, props, children);
                fiber.host_node = arena[old].host_node.clone();
                fiber.alternate = Some(old);
                fiber.effect_tag = EffectTag::Update;
                Some(fiber)
            }

            (Some(element), old) => {
                if let Some(old) = old {
                    mark_deletion(arena, old, deletions);
                }
                let (node_type, props, children) = element.into_parts();
                let mut fiber = Fiber::new(node_type, props, children);
                fiber.effect_tag = EffectTag::Placement;
                Some(fiber)
            }

            (None, Some(old)) => {
                mark_deletion(arena, old, deletions);
                None
            }
        };

        if let Some(old) = old_fiber {
            old_fiber = arena[old].sibling;
        }

        if let Some(mut fiber) = new_fiber {
            fiber.parent = Some(wip);
            let id = arena.allocate(fiber);
            match prev_sibling {
                None => arena[wip].child = Some(id),
                Some(prev) => arena[prev].sibling = Some(id),
            }
            prev_sibling = Some(id);
        }
    }
}

fn mark_deletion<N>(arena: &mut FiberArena<N>, old: FiberId, deletions: &mut Vec<FiberId>) {
    trace!(fiber = %old, node_type = %arena[old].node_type, "queued for deletion");
    arena[old].effect_tag = EffectTag::Deletion;
    deletions.push(old);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{create_element, text, Child};
    use crate::types::{Listener, Props, LISTENER_PREFIX};

    /// Committed parent with one committed child per tag, host nodes 100, 101, ...
    fn committed_parent(arena: &mut FiberArena<u32>, tags: &[&str]) -> FiberId {
        let parent = arena.allocate(Fiber::new(NodeType::tag("ul"), Props::new(), Vec::new()));
        let mut prev: Option<FiberId> = None;
        for (i, tag) in tags.iter().enumerate() {
            let mut fiber = Fiber::new(NodeType::tag(tag), Props::new(), Vec::new());
            fiber.host_node = Some(100 + i as u32);
            fiber.parent = Some(parent);
            let id = arena.allocate(fiber);
            match prev {
                None => arena[parent].child = Some(id),
                Some(p) => arena[p].sibling = Some(id),
            }
            prev = Some(id);
        }
        parent
    }

    fn wip_for(arena: &mut FiberArena<u32>, alternate: Option<FiberId>) -> FiberId {
        let mut fiber = Fiber::new(NodeType::tag("ul"), Props::new(), Vec::new());
        fiber.alternate = alternate;
        arena.allocate(fiber)
    }

    fn children_of(arena: &FiberArena<u32>, id: FiberId) -> Vec<FiberId> {
        let mut out = Vec::new();
        let mut cursor = arena[id].child;
        while let Some(c) = cursor {
            out.push(c);
            cursor = arena[c].sibling;
        }
        out
    }

    fn elements(tags: &[&str]) -> Vec<Element> {
        tags.iter()
            .map(|tag| create_element(tag, Props::new(), Vec::<Child>::new()))
            .collect()
    }

    #[test]
    fn test_first_render_places_everything() {
        let mut arena = FiberArena::new();
        let wip = wip_for(&mut arena, None);
        let mut deletions = Vec::new();

        reconcile_children(&mut arena, wip, elements(&["li", "li", "p"]), &mut deletions);

        let kids = children_of(&arena, wip);
        assert_eq!(kids.len(), 3);
        assert!(deletions.is_empty());
        for id in &kids {
            assert_eq!(arena[*id].effect_tag(), EffectTag::Placement);
            assert_eq!(arena[*id].parent(), Some(wip));
            assert!(arena[*id].host_node().is_none());
            assert!(arena[*id].alternate().is_none());
        }
        assert_eq!(arena[kids[2]].node_type().name(), "p");
    }

    #[test]
    fn test_same_type_updates_and_reuses_host_node() {
        let mut arena = FiberArena::new();
        let old = committed_parent(&mut arena, &["li", "li"]);
        let old_kids = children_of(&arena, old);
        let wip = wip_for(&mut arena, Some(old));
        let mut deletions = Vec::new();

        reconcile_children(&mut arena, wip, elements(&["li", "li"]), &mut deletions);

        let kids = children_of(&arena, wip);
        assert!(deletions.is_empty());
        for (new, old) in kids.iter().zip(&old_kids) {
            assert_eq!(arena[*new].effect_tag(), EffectTag::Update);
            assert_eq!(arena[*new].alternate(), Some(*old));
            assert_eq!(arena[*new].host_node(), arena[*old].host_node());
        }
    }

    #[test]
    fn test_type_mismatch_places_and_deletes() {
        let mut arena = FiberArena::new();
        let old = committed_parent(&mut arena, &["li"]);
        let old_li = children_of(&arena, old)[0];
        let wip = wip_for(&mut arena, Some(old));
        let mut deletions = Vec::new();

        reconcile_children(&mut arena, wip, elements(&["p"]), &mut deletions);

        let kids = children_of(&arena, wip);
        assert_eq!(kids.len(), 1);
        assert_eq!(arena[kids[0]].effect_tag(), EffectTag::Placement);
        assert_eq!(deletions, vec![old_li]);
        assert_eq!(arena[old_li].effect_tag(), EffectTag::Deletion);
    }

    #[test]
    fn test_shorter_list_deletes_tail() {
        let mut arena = FiberArena::new();
        let old = committed_parent(&mut arena, &["li", "li", "li"]);
        let old_kids = children_of(&arena, old);
        let wip = wip_for(&mut arena, Some(old));
        let mut deletions = Vec::new();

        reconcile_children(&mut arena, wip, elements(&["li", "li"]), &mut deletions);

        assert_eq!(children_of(&arena, wip).len(), 2);
        assert_eq!(deletions, vec![old_kids[2]]);
    }

    #[test]
    fn test_empty_elements_delete_all() {
        let mut arena = FiberArena::new();
        let old = committed_parent(&mut arena, &["li", "p"]);
        let wip = wip_for(&mut arena, Some(old));
        let mut deletions = Vec::new();

        reconcile_children(&mut arena, wip, Vec::new(), &mut deletions);

        assert!(arena[wip].child().is_none());
        assert_eq!(deletions.len(), 2);
    }

    #[test]
    fn test_swap_without_keys_is_not_a_move() {
        let mut arena = FiberArena::new();
        let old = committed_parent(&mut arena, &["a", "b"]);
        let wip = wip_for(&mut arena, Some(old));
        let mut deletions = Vec::new();

        reconcile_children(&mut arena, wip, elements(&["b", "a"]), &mut deletions);

        let kids = children_of(&arena, wip);
        assert!(kids.iter().all(|id| arena[*id].effect_tag() == EffectTag::Placement));
        assert_eq!(deletions.len(), 2);
    }

    #[test]
    fn test_children_stay_pending_on_new_fibers() {
        let mut arena = FiberArena::new();
        let wip = wip_for(&mut arena, None);
        let mut deletions = Vec::new();
        let list = vec![create_element("li", Props::new(), ["x"])];

        reconcile_children(&mut arena, wip, list, &mut deletions);

        let li = children_of(&arena, wip)[0];
        assert!(arena[li].has_pending_children());
    }

    #[test]
    fn test_validate_rejects_malformed() {
        let empty_tag = create_element("", Props::new(), Vec::<Child>::new());
        assert!(validate_children(&[empty_tag], LISTENER_PREFIX).is_err());

        let bad_listener =
            create_element("a", Props::new().with("onClick", "nope"), Vec::<Child>::new());
        assert!(validate_children(&[bad_listener], LISTENER_PREFIX).is_err());

        let handler_as_attr = create_element(
            "a",
            Props::new().with("href", Listener::new(|_| {})),
            Vec::<Child>::new(),
        );
        assert!(validate_children(&[handler_as_attr], LISTENER_PREFIX).is_err());

        let root = Element::from_parts(NodeType::Root, Props::new(), Vec::new());
        assert!(validate_children(&[root], LISTENER_PREFIX).is_err());

        let fine = create_element(
            "a",
            Props::new().with("href", "/").with("onClick", Listener::new(|_| {})),
            [text("go")],
        );
        assert!(validate_children(&[fine], LISTENER_PREFIX).is_ok());
    }
}
