use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::SanitizeReport;
use crate::parser::{NodeExt, NodeRef};

/// Elements the tree builder never nests inside themselves when it reads
/// markup, but may leave nested after error recovery (the form pointer for
/// `form`, the adoption agency for `a`).
const SELF_EXCLUSIVE_ELEMENTS: &[&str] = &["form", "a"];

/// Unwrap every HTML `form` inside a `form` and every `a` inside an `a`,
/// keeping their children.  Written out as-is, such a tree would be split
/// differently by the next parse.
pub fn unwrap_nested(root: &NodeRef, report: &mut SanitizeReport, logger: &PerfLogger) {
    start_span!(logger, UNWRAP_NESTED);
    let nested = root
        .descendants()
        .filter(|n| {
            n.is_html_element()
                && n.element_name()
                    .map(|name| {
                        SELF_EXCLUSIVE_ELEMENTS.contains(&name) && n.has_ancestor_tag(&[name])
                    })
                    .unwrap_or(false)
        })
        .collect::<Vec<_>>();
    for n in nested.iter() {
        n.unwrap_children();
    }
    report.nested_elements_unwrapped += nested.len();
    annotate_span!(logger, UNWRAP_NESTED, format!("unwrapped: {}", nested.len()));
    end_span!(logger, UNWRAP_NESTED);
}
