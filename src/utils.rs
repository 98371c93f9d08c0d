use crate::parser::{NodeExt, NodeRef};

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Elements removed together with everything inside them.  Besides
/// `script` and `style` these are the elements whose content the parser
/// keeps as unescaped raw text, which would otherwise be written back as
/// live markup.
pub static RAW_TEXT_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "script", "style", "noscript", "template", "xmp", "noembed", "noframes", "plaintext",
    ])
});

/// Void HTML elements: they have no end tag and therefore no children.
pub static VOID_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img",
        "input", "keygen", "link", "meta", "param", "source", "track", "wbr",
    ])
});

/// `rel` tokens that make a `<link>` a resource hint the AMP runtime rejects.
pub const PRELOAD_REL_TOKENS: &[&str] = &["preload", "modulepreload"];

/// URL schemes that execute code when followed.
pub const SCRIPT_URL_SCHEMES: &[&str] = &["javascript", "vbscript"];

/// Attribute names that are inline event handlers: `on` followed by one or
/// more word characters and nothing else.
pub static EVENT_HANDLER_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^on\w+$").unwrap());

/// Element names that serialize back to the same start tag.  The tokenizer
/// accepts almost anything up to whitespace, `/` or `>` as a tag name, so
/// `<scr<script>` is a single element named `scr<script`.
pub static WRITABLE_ELEMENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.:-]*$").unwrap());

/// Same for attribute names, which may also start with `_` or `:`.
pub static WRITABLE_ATTR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_:][A-Za-z0-9_.:-]*$").unwrap());

pub static HTML_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:(quot|amp|apos|lt|gt|nbsp|hellip|ndash|mdash|lsquo|rsquo|ldquo|rdquo)|#(?:[xX]([0-9a-fA-F]{1,8})|([0-9]{1,10})));").unwrap()
});

/// All element descendants of `node` whose local name is `tag_name`, in
/// document order.  Unlike a CSS selector this also finds elements inside
/// `<svg>` and `<math>`, whatever their namespace.
pub fn descendants_named(node: &NodeRef, tag_name: &str) -> Vec<NodeRef> {
    node.descendants()
        .filter(|n| n.element_name() == Some(tag_name))
        .collect()
}

/// Remove all HTML comment nodes (`<!-- … -->`) from the subtree rooted at
/// `node`.  Returns how many were removed.
pub fn remove_comment_nodes(node: &NodeRef) -> usize {
    let comments: Vec<_> = node
        .descendants()
        .filter(|n| n.as_comment().is_some())
        .collect();
    for n in comments.iter() {
        n.detach();
    }
    comments.len()
}

pub fn is_event_handler_attr(name: &str) -> bool {
    EVENT_HANDLER_ATTR.is_match(name)
}

pub fn is_writable_element_name(name: &str) -> bool {
    WRITABLE_ELEMENT_NAME.is_match(name)
}

pub fn is_writable_attr_name(name: &str) -> bool {
    WRITABLE_ATTR_NAME.is_match(name)
}

/// Whether `url` would run script when used as a link or image target.
///
/// Parsing goes through the URL standard, so leading spaces, embedded tabs
/// and newlines, and letter case in the scheme (`" Java\tScript:"`) are all
/// seen through the same way a browser sees through them.
pub fn is_script_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => SCRIPT_URL_SCHEMES.contains(&parsed.scheme()),
        Err(_) => false,
    }
}

/// Whether a `rel` attribute value lists a preload hint.
pub fn is_preload_rel(rel: &str) -> bool {
    rel.split_ascii_whitespace().any(|token| {
        PRELOAD_REL_TOKENS
            .iter()
            .any(|preload| token.eq_ignore_ascii_case(preload))
    })
}

/// Parse an image dimension.  Anything that is not a positive base-10
/// integer (after trimming) yields `fallback`.
pub fn parse_dimension(value: Option<&str>, fallback: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(fallback)
}

/// Prefix a root-relative URL (`/uploads/a.jpg`) with `base_url`.
///
/// Absolute URLs, protocol-relative URLs (`//cdn/a.jpg`) and bare relative
/// paths (`a.jpg`) come back unchanged.
pub fn resolve_root_relative(src: &str, base_url: &str) -> String {
    if src.starts_with('/') && !src.starts_with("//") {
        format!("{}{}", base_url, src)
    } else {
        src.to_string()
    }
}

/// Escape text content or a double-quoted attribute value.  Both quote
/// characters are escaped in text as well, so no markup-like string such as
/// `rel="x"` survives verbatim anywhere in the output.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decode the named references CMS titles commonly carry and all numeric
/// character references (`&#…;` / `&#x…;`) in `value`, in a single pass so
/// `&amp;lt;` becomes `&lt;` and not `<`.  Invalid code points are replaced
/// with U+FFFD.
pub fn unescape_html_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let replaced = HTML_ENTITY.replace_all(value, |caps: &regex::Captures| {
        if let Some(named) = caps.get(1) {
            return match named.as_str() {
                "quot" => "\"",
                "amp" => "&",
                "apos" => "'",
                "lt" => "<",
                "gt" => ">",
                "nbsp" => "\u{00A0}",
                "hellip" => "\u{2026}",
                "ndash" => "\u{2013}",
                "mdash" => "\u{2014}",
                "lsquo" => "\u{2018}",
                "rsquo" => "\u{2019}",
                "ldquo" => "\u{201C}",
                "rdquo" => "\u{201D}",
                _ => "",
            }
            .to_string();
        }
        let num = if let Some(hex) = caps.get(2) {
            u32::from_str_radix(hex.as_str(), 16).unwrap_or(0)
        } else if let Some(dec) = caps.get(3) {
            dec.as_str().parse::<u32>().unwrap_or(0)
        } else {
            0
        };

        let num = if num == 0 || num > 0x10FFFF || (0xD800..=0xDFFF).contains(&num) {
            0xFFFD
        } else {
            num
        };
        std::char::from_u32(num).unwrap_or('\u{FFFD}').to_string()
    });

    replaced.into_owned()
}
