use crate::logging::logger::Listener;

/// Width substituted when an `<img>` has no usable `width`.
pub const FALLBACK_WIDTH: u32 = 800;
/// Height substituted when an `<img>` has no usable `height`.
pub const FALLBACK_HEIGHT: u32 = 450;
/// Text of the link that stands in for an embedded `<iframe>`.
pub const EMBED_LABEL: &str = "View embedded content";
/// `layout` given to every rewritten image.
pub const IMAGE_LAYOUT: &str = "responsive";

/// The attributes kept from an `<img>` once it has been validated.
///
/// Built by [`crate::sanitizer`] from the raw element; an image without a
/// usable `src` never gets a descriptor and is dropped from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDescriptor {
    /// Image URL, root-relative paths already prefixed with the base URL.
    pub src: String,
    /// Alternative text, unescaped.  Empty when the source had none.
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

/// What an `<iframe>` contributes to the output: a link target, or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IframeDescriptor {
    pub src: Option<String>,
}

/// Counters collected while sanitizing one fragment.
///
/// Logging is left to the caller; these numbers are what a caller would
/// want to log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// `script`/`style` and other raw-text elements removed with their content.
    pub raw_text_elements_removed: usize,
    pub comments_removed: usize,
    pub event_handlers_removed: usize,
    /// Attributes whose names could not be written back (`x<iframe`).
    pub malformed_attributes_removed: usize,
    pub iframes_replaced: usize,
    pub iframes_dropped: usize,
    pub images_rewritten: usize,
    pub images_dropped: usize,
    pub preload_links_removed: usize,
    pub script_links_neutralized: usize,
    /// `form`s inside a `form` and `a`s inside an `a`, unwrapped because
    /// the parser would not rebuild them from the output.
    pub nested_elements_unwrapped: usize,
}

/// The output of [`crate::sanitize_with_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedFragment {
    /// The AMP-safe HTML fragment.
    pub html: String,
    pub report: SanitizeReport,
}

/// Knobs for the sanitizer.
///
/// All fields have sensible defaults via [`Default`], except `base_url`
/// which is empty there; [`SanitizeOptions::new`] is the usual starting
/// point.
///
/// # Examples
///
/// ```rust
/// use ampify_rs::SanitizeOptions;
///
/// let mut opts = SanitizeOptions::new("https://example.com");
/// opts.embed_label = String::from("Watch the video");
/// assert_eq!(opts.fallback_width, 800);
/// ```
#[derive(Debug, Clone)]
pub struct SanitizeOptions {
    /// Absolute origin, no trailing slash, prepended verbatim to image URLs
    /// that start with a single `/`.
    pub base_url: String,
    /// Substituted for a missing or non-numeric `width`.
    pub fallback_width: u32,
    /// Substituted for a missing or non-numeric `height`.
    pub fallback_height: u32,
    /// Text of the link that replaces an `<iframe>`.
    pub embed_label: String,
    /// Value of the `layout` attribute on rewritten images.
    pub image_layout: String,
    /// Performance listeners; empty means nothing is reported.
    pub listeners: Vec<Listener>,
}

impl SanitizeOptions {
    pub fn new(base_url: &str) -> SanitizeOptions {
        SanitizeOptions {
            base_url: base_url.to_string(),
            ..SanitizeOptions::default()
        }
    }
}

impl Default for SanitizeOptions {
    fn default() -> SanitizeOptions {
        SanitizeOptions {
            base_url: String::new(),
            fallback_width: FALLBACK_WIDTH,
            fallback_height: FALLBACK_HEIGHT,
            embed_label: String::from(EMBED_LABEL),
            image_layout: String::from(IMAGE_LAYOUT),
            listeners: vec![],
        }
    }
}

/// The lead image of an article, as the CMS reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedImage {
    pub src: String,
    /// Falls back to the article title when empty.
    pub alt: String,
}

/// Everything [`crate::render_amp_document`] needs to build a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmpArticle {
    /// Title as rendered by the CMS; may contain character references.
    pub title: String,
    /// Raw article body, sanitized while rendering.
    pub content_html: String,
    /// URL of the regular (non-AMP) article page.
    pub canonical_url: String,
    /// Meta description, usually the SEO plugin's summary.  The title is
    /// used when this is `None` or blank.
    pub description: Option<String>,
    pub featured_image: Option<FeaturedImage>,
    /// Value of `<html lang>`.
    pub lang: String,
}
