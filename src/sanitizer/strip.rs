use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::SanitizeReport;
use crate::parser::{NodeExt, NodeRef};
use crate::utils::*;

/// Remove `script`, `style` and the other raw-text elements with all of
/// their content, in every namespace, then remove comments.  Elements whose
/// tag name could not be written back as-is are unwrapped, keeping their
/// children.
///
/// An unclosed `<script>` has already swallowed the rest of the fragment
/// during parsing, so it goes with everything after it.
pub fn strip_raw_text(root: &NodeRef, report: &mut SanitizeReport, logger: &PerfLogger) {
    start_span!(logger, STRIP_RAW_TEXT);
    let doomed = root
        .descendants()
        .filter(|n| {
            n.element_name()
                .map(|name| RAW_TEXT_ELEMENTS.contains(name))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();
    for n in doomed.iter() {
        n.detach();
    }
    report.raw_text_elements_removed += doomed.len();
    add_point_to_span_str!(logger, STRIP_RAW_TEXT, "raw_text_elements_removed");

    let malformed = root
        .descendants()
        .filter(|n| {
            n.element_name()
                .map(|name| !is_writable_element_name(name))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();
    for n in malformed.iter() {
        n.unwrap_children();
    }
    add_point_to_span_str!(logger, STRIP_RAW_TEXT, "malformed_elements_unwrapped");

    report.comments_removed += remove_comment_nodes(root);
    annotate_span!(
        logger,
        STRIP_RAW_TEXT,
        format!("elements: {}, comments: {}", doomed.len(), report.comments_removed)
    );
    end_span!(logger, STRIP_RAW_TEXT);
}

/// Drop every attribute whose whole name is `on` followed by word
/// characters.  `one-thing` or `data-onclick` are left alone.  Attributes
/// with names that would not survive serialization go too.
pub fn strip_event_handlers(root: &NodeRef, report: &mut SanitizeReport, logger: &PerfLogger) {
    start_span!(logger, STRIP_EVENT_HANDLERS);
    let mut handlers = 0;
    let mut malformed = 0;
    for node in root.descendants() {
        if let Some(e) = node.as_element() {
            e.attributes.borrow_mut().map.retain(|name, _| {
                if !is_writable_attr_name(&name.local) {
                    malformed += 1;
                    false
                } else if is_event_handler_attr(&name.local) {
                    handlers += 1;
                    false
                } else {
                    true
                }
            });
        }
    }
    report.event_handlers_removed += handlers;
    report.malformed_attributes_removed += malformed;
    annotate_span!(
        logger,
        STRIP_EVENT_HANDLERS,
        format!("handlers: {}, malformed: {}", handlers, malformed)
    );
    end_span!(logger, STRIP_EVENT_HANDLERS);
}

/// Remove `<link>` elements whose `rel` lists `preload`.  Any other element
/// carrying such a `rel` (`<a rel="preload">`) only loses the attribute.
pub fn remove_preload_links(root: &NodeRef, report: &mut SanitizeReport, logger: &PerfLogger) {
    start_span!(logger, REMOVE_PRELOAD_LINKS);
    let hinted = root
        .descendants()
        .filter(|n| {
            n.attr_value("rel")
                .map(|rel| is_preload_rel(&rel))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>();
    let (links, others): (Vec<_>, Vec<_>) = hinted
        .into_iter()
        .partition(|n| n.element_name() == Some("link"));
    for link in links.iter() {
        link.detach();
    }
    for node in others.iter() {
        if let Some(e) = node.as_element() {
            e.attributes
                .borrow_mut()
                .map
                .retain(|name, _| &*name.local != "rel");
        }
    }
    report.preload_links_removed += links.len();
    annotate_span!(logger, REMOVE_PRELOAD_LINKS, format!("removed: {}", links.len()));
    end_span!(logger, REMOVE_PRELOAD_LINKS);
}
