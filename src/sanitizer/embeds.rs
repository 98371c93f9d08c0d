use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::{IframeDescriptor, SanitizeOptions, SanitizeReport};
use crate::parser::{NodeExt, NodeRef};
use crate::utils::*;

/// Read the link target out of an `<iframe>`.  A missing, blank or
/// script `src` yields no target.
pub fn iframe_descriptor(iframe: &NodeRef) -> IframeDescriptor {
    let src = iframe
        .attr_value("src")
        .map(|src| src.trim().to_string())
        .filter(|src| !src.is_empty() && !is_script_url(src));
    IframeDescriptor { src }
}

/// Replace each `<iframe>` by a paragraph holding a link to its `src`, or
/// drop it when there is no `src`.
///
/// Inside a `<p>` only the link is inserted, since a nested paragraph
/// would be split apart the next time the output is parsed.  Inside an
/// `<a>` (links do not nest) or inside SVG/MathML (an HTML paragraph would
/// break out of it) the iframe is dropped.
pub fn replace_iframes(
    root: &NodeRef,
    options: &SanitizeOptions,
    report: &mut SanitizeReport,
    logger: &PerfLogger,
) {
    start_span!(logger, REPLACE_IFRAMES);
    for iframe in descendants_named(root, "iframe") {
        let descriptor = iframe_descriptor(&iframe);
        let src = match descriptor.src {
            Some(src) if iframe.is_html_element() && !iframe.has_ancestor_tag(&["a"]) => src,
            _ => {
                iframe.detach();
                report.iframes_dropped += 1;
                continue;
            }
        };

        let link = match iframe.new_sibling_element(
            "a",
            &[
                ("href", src.as_str()),
                ("target", "_blank"),
                ("rel", "noopener noreferrer"),
            ],
        ) {
            Some(link) => link,
            None => continue,
        };
        link.append(NodeRef::new_text(options.embed_label.as_str()));

        let replacement = if iframe.has_ancestor_tag(&["p"]) {
            link
        } else {
            match iframe.new_sibling_element("p", &[]) {
                Some(p) => {
                    p.append(link);
                    p
                }
                None => continue,
            }
        };
        iframe.replace_with(replacement);
        report.iframes_replaced += 1;
    }
    annotate_span!(
        logger,
        REPLACE_IFRAMES,
        format!(
            "replaced: {}, dropped: {}",
            report.iframes_replaced, report.iframes_dropped
        )
    );
    end_span!(logger, REPLACE_IFRAMES);
}

/// Remove every `href` (plain or `xlink:href`) of `node` that points at a
/// script URL.  Returns whether anything was removed.
fn strip_script_hrefs(node: &NodeRef) -> bool {
    match node.as_element() {
        Some(e) => {
            let mut attributes = e.attributes.borrow_mut();
            let before = attributes.map.len();
            attributes
                .map
                .retain(|name, attr| &*name.local != "href" || !is_script_url(&attr.value));
            before != attributes.map.len()
        }
        None => false,
    }
}

/// Turn `<a href="javascript:…">` into a `<span>` that keeps the link's
/// content and its `id`/`name` anchors, and strip script targets from
/// `<area>` and from SVG links.
pub fn neutralize_script_links(root: &NodeRef, report: &mut SanitizeReport, logger: &PerfLogger) {
    start_span!(logger, NEUTRALIZE_SCRIPT_LINKS);
    let mut neutralized = 0;
    for link in descendants_named(root, "a") {
        if !link.is_html_element() {
            if strip_script_hrefs(&link) {
                neutralized += 1;
            }
            continue;
        }
        let is_script = link
            .attr_value("href")
            .map(|href| is_script_url(&href))
            .unwrap_or(false);
        if is_script {
            link.rename_keeping("span", &["id", "name"]);
            neutralized += 1;
        }
    }
    for area in descendants_named(root, "area") {
        if strip_script_hrefs(&area) {
            neutralized += 1;
        }
    }
    report.script_links_neutralized += neutralized;
    annotate_span!(
        logger,
        NEUTRALIZE_SCRIPT_LINKS,
        format!("neutralized: {}", neutralized)
    );
    end_span!(logger, NEUTRALIZE_SCRIPT_LINKS);
}
