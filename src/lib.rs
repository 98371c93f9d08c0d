//! Turn CMS article HTML into markup that is valid inside an
//! [AMP](https://amp.dev) page.
//!
//! ## Quick start
//!
//! ```rust
//! let html = r#"<p onclick="track()">Hello<img src="/uploads/a.jpg"></p><script>x()</script>"#;
//! let amp = ampify_rs::sanitize(html, "https://example.com");
//!
//! assert_eq!(
//!     amp,
//!     r#"<p>Hello<amp-img src="https://example.com/uploads/a.jpg" alt="" width="800" height="450" layout="responsive"></amp-img></p>"#
//! );
//! ```
//!
//! ## Module layout
//!
//! * **Top level** – [`sanitize`] and [`sanitize_with_options`] are the
//!   entry-points for fragments, [`render_amp_document`] wraps a sanitized
//!   body in a complete AMP page.  [`SanitizeOptions`], [`SanitizedFragment`]
//!   and [`SanitizeReport`] are the main public types.
//! * [`parser`] – thin wrappers around the underlying HTML parser ([`parser::NodeRef`],
//!   [`parser::parse_fragment`]).
//! * [`NodeExt`] – element helpers the sanitizer stages are written against.
//!
//! Every operation is total: malformed markup is repaired by the parser
//! the way a browser would repair it, and the result is always a string.

#[macro_use]
mod logging;

mod document;
mod models;
mod node_utils;
mod sanitizer;
mod serializer;
mod utils;

pub use document::{render_amp_document, FEATURED_IMAGE_HEIGHT, FEATURED_IMAGE_WIDTH};
pub use logging::logger::{Listener, PerfListener, SpanFilter};
pub use logging::PerfConsoleListener;
pub use models::{
    AmpArticle, FeaturedImage, IframeDescriptor, ImageDescriptor, SanitizeOptions,
    SanitizeReport, SanitizedFragment, EMBED_LABEL, FALLBACK_HEIGHT, FALLBACK_WIDTH,
    IMAGE_LAYOUT,
};
pub use node_utils::NodeExt;
pub use sanitizer::{iframe_descriptor, image_descriptor};
pub use serializer::serialize_children;

/// Thin wrappers around the underlying HTML parser.
///
/// [`NodeRef`] is the reference-counted DOM node type used throughout the crate.
/// [`parse_fragment`] parses a body fragment into a [`NodeRef`] tree.
pub mod parser {
    use kuchikikiki::traits::TendrilSink;
    pub use kuchikikiki::{Attributes, NodeRef};
    pub use crate::node_utils::NodeExt;

    const FRAGMENT_PREFIX: &str = "<!DOCTYPE html><html><head></head><body>";

    /// Parse an HTML fragment as the content of a `<body>` and return that
    /// `<body>` element.
    ///
    /// Parsing follows the HTML5 tree-construction rules, so stray end tags,
    /// unclosed elements and misnested markup come out the way a browser
    /// would build them.  Elements that normally live in `<head>` (`link`,
    /// `meta`, `style`, `script`) stay in the returned body.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ampify_rs::parser::parse_fragment;
    ///
    /// let body = parse_fragment("<p>one<p>two");
    /// assert_eq!(body.select("p").unwrap().count(), 2);
    /// ```
    pub fn parse_fragment(html: &str) -> NodeRef {
        let mut source = String::with_capacity(FRAGMENT_PREFIX.len() + html.len());
        source.push_str(FRAGMENT_PREFIX);
        source.push_str(html);
        let document = kuchikikiki::parse_html().one(source);
        match document.select_first("body") {
            Ok(body) => body.as_node().clone(),
            Err(_) => NodeRef::new_document(),
        }
    }
}

/// Sanitize an HTML fragment for AMP with default options.
///
/// `base_url` is prepended verbatim to image URLs that start with a single
/// `/`; pass it without a trailing slash.
///
/// The pipeline removes `script`, `style` and other raw-text elements with
/// their content, drops comments and `on*` event-handler attributes,
/// replaces `<iframe>` with a link to its source, rewrites `<img>` to
/// `<amp-img>` with explicit dimensions, removes `<link rel="preload">` and
/// defuses `javascript:` links.  Running it on its own output changes
/// nothing.
///
/// # Examples
///
/// ```rust
/// let out = ampify_rs::sanitize(
///     r#"<iframe src="https://www.youtube.com/embed/xyz"></iframe>"#,
///     "https://example.com",
/// );
/// assert_eq!(
///     out,
///     r#"<p><a href="https://www.youtube.com/embed/xyz" target="_blank" rel="noopener noreferrer">View embedded content</a></p>"#
/// );
/// assert_eq!(ampify_rs::sanitize("", "https://example.com"), "");
/// ```
pub fn sanitize(html: &str, base_url: &str) -> String {
    sanitize_with_options(html, &SanitizeOptions::new(base_url)).html
}

/// Sanitize an HTML fragment and report what was changed.
///
/// # Examples
///
/// ```rust
/// use ampify_rs::{sanitize_with_options, SanitizeOptions};
///
/// let mut options = SanitizeOptions::new("https://example.com");
/// options.fallback_width = 1200;
/// options.fallback_height = 675;
///
/// let out = sanitize_with_options(r#"<img src="/a.jpg" alt="A"><img>"#, &options);
/// assert!(out.html.contains(r#"width="1200" height="675""#));
/// assert_eq!(out.report.images_rewritten, 1);
/// assert_eq!(out.report.images_dropped, 1);
/// ```
pub fn sanitize_with_options(html: &str, options: &SanitizeOptions) -> SanitizedFragment {
    sanitizer::Sanitizer::new(options).sanitize(html)
}
