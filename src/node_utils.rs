use crate::parser::NodeRef;
use kuchikikiki::{Attribute, ExpandedName};

/// Namespace URL of ordinary HTML elements.  SVG and MathML content parsed
/// out of a fragment carries a different one.
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// DOM-navigation and element-manipulation helpers implemented on [`NodeRef`].
///
/// This trait is automatically in scope when you import from
/// [`crate::parser`].
pub trait NodeExt {
    /// Return the local tag name of this node if it is an element (e.g.
    /// `"div"`, `"p"`), or `None` for text / comment / document nodes.
    fn element_name(&self) -> Option<&str>;

    /// Look up an attribute by name and return its value, or `None` if the
    /// attribute is absent or this is not an element node.
    fn attr_value(&self, name: &str) -> Option<String>;

    /// Set (or overwrite) an attribute.  No-op on non-element nodes.
    fn set_attr(&self, name: &str, value: String);

    /// Whether this is an element in the HTML namespace, as opposed to a
    /// non-element node or an element inside `<svg>` / `<math>`.
    fn is_html_element(&self) -> bool;

    /// Whether any ancestor is an HTML element named one of `tag_names`.
    fn has_ancestor_tag(&self, tag_names: &[&str]) -> bool;

    /// Create a detached element with the same namespace as `self`, the
    /// given tag name and attributes (in order) and no children.  Returns
    /// `None` when `self` is not an element.
    fn new_sibling_element(&self, tag_name: &str, attributes: &[(&str, &str)]) -> Option<NodeRef>;

    /// Put `replacement` where `self` is and detach `self`.
    fn replace_with(&self, replacement: NodeRef);

    /// Move the children of `self` in front of it, then detach `self`.
    fn unwrap_children(&self);

    /// Create an element named `tag_name` carrying the attributes of `self`
    /// listed in `keep_attrs`, move all children of `self` into it, and
    /// splice it into the tree in place of `self`.  Returns the new node,
    /// or `self` unchanged when it is not an element.
    fn rename_keeping(self, tag_name: &str, keep_attrs: &[&str]) -> NodeRef;
}

impl NodeExt for NodeRef {
    fn element_name(&self) -> Option<&str> {
        self.as_element().map(|e| &*e.name.local)
    }

    fn attr_value(&self, name: &str) -> Option<String> {
        self.as_element()
            .and_then(|e| e.attributes.borrow().get(name).map(|v| v.to_string()))
    }

    fn set_attr(&self, name: &str, value: String) {
        if let Some(e) = self.as_element() {
            e.attributes.borrow_mut().insert(name, value);
        }
    }

    fn is_html_element(&self) -> bool {
        self.as_element()
            .map(|e| &*e.name.ns == HTML_NAMESPACE)
            .unwrap_or(false)
    }

    fn has_ancestor_tag(&self, tag_names: &[&str]) -> bool {
        self.ancestors().any(|a| {
            a.is_html_element()
                && a.element_name()
                    .map(|name| tag_names.contains(&name))
                    .unwrap_or(false)
        })
    }

    fn new_sibling_element(&self, tag_name: &str, attributes: &[(&str, &str)]) -> Option<NodeRef> {
        let e = self.as_element()?;
        let mut name = e.name.clone();
        name.prefix = None;
        name.local = tag_name.into();
        let attributes = attributes.iter().map(|(attr_name, value)| {
            (
                ExpandedName::new("", *attr_name),
                Attribute {
                    prefix: None,
                    value: value.to_string(),
                },
            )
        });
        Some(NodeRef::new_element(name, attributes))
    }

    fn replace_with(&self, replacement: NodeRef) {
        self.insert_before(replacement);
        self.detach();
    }

    fn unwrap_children(&self) {
        while let Some(child) = self.first_child() {
            self.insert_before(child);
        }
        self.detach();
    }

    fn rename_keeping(self, tag_name: &str, keep_attrs: &[&str]) -> NodeRef {
        let kept = keep_attrs
            .iter()
            .filter_map(|name| self.attr_value(name).map(|value| (*name, value)))
            .collect::<Vec<_>>();
        let kept = kept
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .collect::<Vec<_>>();
        let new_node = match self.new_sibling_element(tag_name, &kept) {
            Some(node) => node,
            None => return self,
        };
        while let Some(child) = self.first_child() {
            new_node.append(child);
        }
        self.replace_with(new_node.clone());
        new_node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_fragment;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[test]
    fn rename_keeping_non_element_does_not_panic() {
        let body = parse_fragment("<div>text</div>");
        let div = body.select_first("div").unwrap();
        let text_node = div.as_node().first_child().unwrap();
        let res = catch_unwind(AssertUnwindSafe(|| {
            let _ = text_node.clone().rename_keeping("span", &[]);
        }));
        assert!(res.is_ok());
    }

    #[test]
    fn rename_keeping_moves_children_and_listed_attributes() {
        let body = parse_fragment(r#"<a id="x" href="/y" class="c">one <b>two</b></a>"#);
        let a = body.select_first("a").unwrap().as_node().clone();
        let span = a.rename_keeping("span", &["id", "name"]);
        assert_eq!(span.element_name(), Some("span"));
        assert_eq!(span.attr_value("id").as_deref(), Some("x"));
        assert_eq!(span.attr_value("href"), None);
        assert_eq!(span.attr_value("class"), None);
        assert_eq!(span.text_contents(), "one two");
        assert!(body.select_first("a").is_err());
    }

    #[test]
    fn unwrap_children_keeps_content_in_place() {
        let body = parse_fragment("<p>a<font color=\"red\">b<i>c</i></font>d</p>");
        let font = body.select_first("font").unwrap().as_node().clone();
        font.unwrap_children();
        let p = body.select_first("p").unwrap().as_node().clone();
        assert_eq!(p.children().count(), 4);
        assert_eq!(p.text_contents(), "abcd");
        assert!(body.select_first("font").is_err());
    }

    #[test]
    fn svg_children_are_not_html_elements() {
        let body = parse_fragment("<p>x</p><svg><circle r=\"1\"></circle></svg>");
        let p = body.select_first("p").unwrap().as_node().clone();
        let circle = body.select_first("circle").unwrap().as_node().clone();
        assert!(p.is_html_element());
        assert!(!circle.is_html_element());
        assert!(!circle.has_ancestor_tag(&["p"]));
    }

    #[test]
    fn has_ancestor_tag_walks_all_the_way_up() {
        let body = parse_fragment("<p><em><strong><img src=\"/a.jpg\"></strong></em></p>");
        let img = body.select_first("img").unwrap().as_node().clone();
        assert!(img.has_ancestor_tag(&["p"]));
        assert!(!img.has_ancestor_tag(&["a", "li"]));
    }
}
