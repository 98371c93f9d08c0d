use crate::parser::NodeRef;
use crate::utils::{VOID_ELEMENTS, escape_html};
use kuchikikiki::iter::NodeEdge;
use kuchikikiki::{ElementData, NodeData};

/// Serialise the *children* of `node` to an HTML string (the node's own
/// open/close tags are not included).
///
/// Text is always escaped (quotes included), so the output never depends
/// on the raw-text rules of the element it sits in; the sanitizer removes every element
/// whose content the parser would keep raw.  Comments, doctypes and
/// processing instructions are not written.  The walk is iterative, so
/// arbitrarily deep trees are fine.
pub fn serialize_children(node: &NodeRef) -> String {
    let mut out = String::new();
    for edge in node.traverse() {
        match edge {
            NodeEdge::Start(n) => match n.data() {
                NodeData::Element(e) => {
                    write_start_tag(e, &mut out);
                    if starts_with_swallowed_newline(&n, e) {
                        out.push('\n');
                    }
                }
                NodeData::Text(text) => out.push_str(&escape_html(&text.borrow())),
                _ => {}
            },
            NodeEdge::End(n) => {
                if let Some(e) = n.as_element() {
                    write_end_tag(e, &mut out);
                }
            }
        }
    }
    out
}

fn is_void(e: &ElementData) -> bool {
    &*e.name.ns == crate::node_utils::HTML_NAMESPACE && VOID_ELEMENTS.contains(&*e.name.local)
}

/// The parser drops one newline right after `<pre>`, `<listing>` and
/// `<textarea>`; a text child that starts with a newline needs an extra one
/// to survive the next parse.
fn starts_with_swallowed_newline(node: &NodeRef, e: &ElementData) -> bool {
    &*e.name.ns == crate::node_utils::HTML_NAMESPACE
        && matches!(&*e.name.local, "pre" | "listing" | "textarea")
        && node
            .first_child()
            .and_then(|c| c.as_text().map(|t| t.borrow().starts_with('\n')))
            .unwrap_or(false)
}

fn write_start_tag(e: &ElementData, out: &mut String) {
    out.push('<');
    out.push_str(&e.name.local);
    for (name, attr) in e.attributes.borrow().map.iter() {
        out.push(' ');
        if let Some(prefix) = &attr.prefix {
            out.push_str(prefix);
            out.push(':');
        }
        out.push_str(&name.local);
        out.push_str("=\"");
        out.push_str(&escape_html(&attr.value));
        out.push('"');
    }
    out.push('>');
}

fn write_end_tag(e: &ElementData, out: &mut String) {
    if is_void(e) {
        return;
    }
    out.push_str("</");
    out.push_str(&e.name.local);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_fragment;

    #[test]
    fn writes_children_only() {
        let body = parse_fragment("<p class=\"lead\">Hello <b>world</b></p>");
        assert_eq!(
            serialize_children(&body),
            "<p class=\"lead\">Hello <b>world</b></p>"
        );
    }

    #[test]
    fn void_elements_have_no_end_tag() {
        let body = parse_fragment("a<br/>b<hr><img src=\"x.png\">");
        assert_eq!(serialize_children(&body), "a<br>b<hr><img src=\"x.png\">");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let body = parse_fragment("<p title='say \"hi\" &lt;now&gt;'>1 &lt; 2 &amp;&amp; 3 &gt; 2</p>");
        assert_eq!(
            serialize_children(&body),
            "<p title=\"say &quot;hi&quot; &lt;now&gt;\">1 &lt; 2 &amp;&amp; 3 &gt; 2</p>"
        );
    }

    #[test]
    fn quotes_in_text_are_escaped() {
        let body = parse_fragment("<p>rel=\"preload\" is a hint</p>");
        let out = serialize_children(&body);
        assert_eq!(out, "<p>rel=&quot;preload&quot; is a hint</p>");
        assert_eq!(serialize_children(&parse_fragment(&out)), out);
    }

    #[test]
    fn single_quotes_in_text_are_escaped() {
        let body = parse_fragment("<p>rel='preload'</p>");
        assert_eq!(serialize_children(&body), "<p>rel=&#39;preload&#39;</p>");
    }

    #[test]
    fn comments_are_not_written() {
        let body = parse_fragment("<p>a<!-- hidden -->b</p>");
        assert_eq!(serialize_children(&body), "<p>ab</p>");
    }

    #[test]
    fn namespaced_attributes_keep_their_prefix() {
        let body = parse_fragment("<svg><use xlink:href=\"#icon\"></use></svg>");
        assert_eq!(
            serialize_children(&body),
            "<svg><use xlink:href=\"#icon\"></use></svg>"
        );
    }

    #[test]
    fn leading_newline_in_pre_survives_reparse() {
        let body = parse_fragment("<pre>\n\ncode</pre>");
        let once = serialize_children(&body);
        assert_eq!(once, "<pre>\n\ncode</pre>");
        let twice = serialize_children(&parse_fragment(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn deep_nesting_does_not_overflow() {
        let depth = 5_000;
        let html = format!("{}x{}", "<span>".repeat(depth), "</span>".repeat(depth));
        let body = parse_fragment(&html);
        let out = serialize_children(&body);
        assert!(out.contains('x'));
    }
}
