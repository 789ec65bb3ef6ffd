//! Locating nodes and fabricating the objects an address needs.
use jsonmorph_context::{ExecutionContext, LogCategory};
use jsonmorph_document::{Document, NodeId};
use jsonmorph_jpath::{SplitPath, render_elements};
use serde_json::{Map, Value};

/// Runs `query` through the context's backend. A malformed query is reported
/// as a command warning and matches nothing.
pub fn select(
    document: &Document,
    origin: NodeId,
    query: &str,
    ctx: &ExecutionContext<'_>,
) -> Vec<NodeId> {
    let nodes = ctx.select(document, origin, query, LogCategory::Command);
    log::trace!("'{}' matched {} node(s)", query, nodes.len());
    nodes
}

/// Creates the missing intermediate objects of `path` below every node its
/// selection prefix matches. The final element is left to the caller.
///
/// A same-named non-object value stops construction on that branch with a
/// warning. Returns the number of objects created; a second call with the same
/// arguments creates nothing.
pub fn ensure_path(
    document: &mut Document,
    origin: NodeId,
    path: &SplitPath,
    ctx: &ExecutionContext<'_>,
) -> usize {
    let suffix = path.construction_suffix();
    if suffix.len() < 2 {
        return 0;
    }
    let intermediate = &suffix[..suffix.len() - 1];
    let prefix = render_elements(path.selection_prefix());

    let mut created = 0;
    for start in select(document, origin, &prefix, ctx) {
        if !document.is_object(start) {
            continue;
        }
        let mut current = start;
        for element in intermediate {
            match document.property(current, element.name()) {
                Some(child) if document.is_object(child) => current = child,
                Some(child) => {
                    ctx.commands().warn(format!(
                        "Cannot create '{}' below '{}': it already holds a {} value",
                        element.name(),
                        document.describe(current),
                        document.node_type(child)
                    ));
                    break;
                }
                None => match document.set_property(current, element.name(), Value::Object(Map::new())) {
                    Ok(child) => {
                        ctx.commands()
                            .info(format!("Created '{}'", document.describe(child)));
                        created += 1;
                        current = child;
                    }
                    Err(e) => {
                        ctx.commands().warn(e.to_string());
                        break;
                    }
                },
            }
        }
    }
    created
}
