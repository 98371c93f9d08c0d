//! Assembly of a complete AMP page around a sanitized article body.

use crate::models::{AmpArticle, SanitizeOptions};
use crate::sanitize_with_options;
use crate::utils::{escape_html, resolve_root_relative, unescape_html_entities};

/// Size of the featured image at the top of the article.
pub const FEATURED_IMAGE_WIDTH: u32 = 1200;
pub const FEATURED_IMAGE_HEIGHT: u32 = 675;

const ROBOTS: &str = "index,follow";

const AMP_RUNTIME: &str = "https://cdn.ampproject.org/v0.js";
const AMP_IMG_COMPONENT: &str = "https://cdn.ampproject.org/v0/amp-img-0.1.js";

const AMP_BOILERPLATE: &str = "<style amp-boilerplate>body{-webkit-animation:-amp-start 8s steps(1,end) 0s 1 normal both;-moz-animation:-amp-start 8s steps(1,end) 0s 1 normal both;-ms-animation:-amp-start 8s steps(1,end) 0s 1 normal both;animation:-amp-start 8s steps(1,end) 0s 1 normal both}@-webkit-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@-moz-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@-ms-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@-o-keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}@keyframes -amp-start{from{visibility:hidden}to{visibility:visible}}</style><noscript><style amp-boilerplate>body{-webkit-animation:none;-moz-animation:none;-ms-animation:none;animation:none}</style></noscript>";

const AMP_CUSTOM_STYLE: &str = "<style amp-custom>\
body{font-family:Arial,sans-serif;padding:16px;line-height:1.8;background:#fff;color:#000}\
article{background:#fff;padding:16px;border-radius:10px}\
h1{font-size:32px;font-weight:800;line-height:2.9rem;margin:20px 0}\
h2{font-size:24px;font-weight:700;margin:20px 0 10px}\
p{font-size:18px;margin-bottom:16px}\
ul,ol{margin-left:20px;margin-bottom:20px}\
li{margin-bottom:10px;font-size:18px}\
.featured-img{margin-bottom:20px;border-radius:10px}\
</style>";

/// Render `article` as a standalone AMP HTML document.
///
/// The title and description arrive as CMS-rendered text, so their
/// character references are decoded once before being escaped for the page.
/// A missing or blank description falls back to the title.  The body goes
/// through [`sanitize_with_options`]; the featured image follows the same
/// `src` rules as body images and is emitted at a fixed 1200×675.
///
/// ```rust
/// use ampify_rs::{render_amp_document, AmpArticle, SanitizeOptions};
///
/// let article = AmpArticle {
///     title: String::from("Rain &amp; wind"),
///     content_html: String::from("<p>Storm ahead.</p><script>track()</script>"),
///     canonical_url: String::from("https://example.com/weather/rain-and-wind-42"),
///     description: None,
///     featured_image: None,
///     lang: String::from("en"),
/// };
/// let page = render_amp_document(&article, &SanitizeOptions::new("https://example.com"));
/// assert!(page.contains("<title>Rain &amp; wind</title>"));
/// assert!(page.contains(r#"<meta name="description" content="Rain &amp; wind">"#));
/// assert!(!page.contains("track()"));
/// ```
pub fn render_amp_document(article: &AmpArticle, options: &SanitizeOptions) -> String {
    let title = escape_html(&unescape_html_entities(&article.title));
    let description = article
        .description
        .as_deref()
        .filter(|description| !description.trim().is_empty())
        .map(|description| escape_html(&unescape_html_entities(description)))
        .unwrap_or_else(|| title.clone());
    let body = sanitize_with_options(&article.content_html, options).html;

    let featured = article
        .featured_image
        .as_ref()
        .map(|image| image.src.trim())
        .filter(|src| !src.is_empty())
        .map(|src| {
            let alt = article
                .featured_image
                .as_ref()
                .map(|image| unescape_html_entities(&image.alt))
                .filter(|alt| !alt.trim().is_empty())
                .map(|alt| escape_html(&alt))
                .unwrap_or_else(|| title.clone());
            format!(
                "<amp-img class=\"featured-img\" src=\"{}\" width=\"{}\" height=\"{}\" layout=\"responsive\" alt=\"{}\"></amp-img>\n",
                escape_html(&resolve_root_relative(src, &options.base_url)),
                FEATURED_IMAGE_WIDTH,
                FEATURED_IMAGE_HEIGHT,
                alt
            )
        })
        .unwrap_or_default();

    let mut page = String::with_capacity(body.len() + 4096);
    page.push_str("<!doctype html>\n");
    page.push_str(&format!(
        "<html \u{26A1} lang=\"{}\">\n",
        escape_html(&article.lang)
    ));
    page.push_str("<head>\n");
    page.push_str("<meta charset=\"utf-8\">\n");
    page.push_str(
        "<meta name=\"viewport\" content=\"width=device-width,minimum-scale=1,initial-scale=1\">\n",
    );
    page.push_str(&format!("<title>{}</title>\n", title));
    page.push_str(&format!(
        "<meta name=\"description\" content=\"{}\">\n",
        description
    ));
    page.push_str(&format!("<meta name=\"robots\" content=\"{}\">\n", ROBOTS));
    page.push_str(&format!(
        "<link rel=\"canonical\" href=\"{}\">\n",
        escape_html(&article.canonical_url)
    ));
    page.push_str(&format!("<script async src=\"{}\"></script>\n", AMP_RUNTIME));
    page.push_str(&format!(
        "<script async custom-element=\"amp-img\" src=\"{}\"></script>\n",
        AMP_IMG_COMPONENT
    ));
    page.push_str(AMP_BOILERPLATE);
    page.push('\n');
    page.push_str(AMP_CUSTOM_STYLE);
    page.push_str("\n</head>\n<body>\n<article>\n");
    page.push_str(&featured);
    page.push_str(&format!("<h1>{}</h1>\n", title));
    page.push_str("<div class=\"content\">\n");
    page.push_str(&body);
    page.push_str("\n</div>\n</article>\n</body>\n</html>\n");
    page
}
