use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::{ImageDescriptor, SanitizeOptions, SanitizeReport};
use crate::parser::{NodeExt, NodeRef};
use crate::utils::*;

/// Collect what an `<img>` contributes to its `amp-img` replacement, or
/// `None` when it has no usable `src` (missing, blank or a script URL).
pub fn image_descriptor(img: &NodeRef, options: &SanitizeOptions) -> Option<ImageDescriptor> {
    let src = img
        .attr_value("src")
        .map(|src| src.trim().to_string())
        .filter(|src| !src.is_empty() && !is_script_url(src))?;
    Some(ImageDescriptor {
        src: resolve_root_relative(&src, &options.base_url),
        alt: img.attr_value("alt").unwrap_or_default(),
        width: parse_dimension(img.attr_value("width").as_deref(), options.fallback_width),
        height: parse_dimension(img.attr_value("height").as_deref(), options.fallback_height),
    })
}

/// Replace every HTML `<img>` with an `<amp-img>` that carries only `src`,
/// `alt`, `width`, `height` and `layout`, dropping images without a source.
///
/// `amp-img` elements already present in the fragment keep their
/// attributes but get the same dimension fallback, so every image in the
/// output has numeric `width` and `height`.
pub fn rewrite_images(
    root: &NodeRef,
    options: &SanitizeOptions,
    report: &mut SanitizeReport,
    logger: &PerfLogger,
) {
    start_span!(logger, REWRITE_IMAGES);
    for amp_img in descendants_named(root, "amp-img") {
        let width = parse_dimension(amp_img.attr_value("width").as_deref(), options.fallback_width);
        let height = parse_dimension(
            amp_img.attr_value("height").as_deref(),
            options.fallback_height,
        );
        amp_img.set_attr("width", width.to_string());
        amp_img.set_attr("height", height.to_string());
    }
    add_point_to_span_str!(logger, REWRITE_IMAGES, "existing_amp_images_checked");

    let mut rewritten = 0;
    let mut dropped = 0;
    for img in descendants_named(root, "img") {
        if !img.is_html_element() {
            continue;
        }
        let descriptor = match image_descriptor(&img, options) {
            Some(descriptor) => descriptor,
            None => {
                img.detach();
                dropped += 1;
                continue;
            }
        };
        let width = descriptor.width.to_string();
        let height = descriptor.height.to_string();
        let amp_img = img.new_sibling_element(
            "amp-img",
            &[
                ("src", descriptor.src.as_str()),
                ("alt", descriptor.alt.as_str()),
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("layout", options.image_layout.as_str()),
            ],
        );
        if let Some(amp_img) = amp_img {
            img.replace_with(amp_img);
            rewritten += 1;
        }
    }
    report.images_rewritten += rewritten;
    report.images_dropped += dropped;
    annotate_span!(
        logger,
        REWRITE_IMAGES,
        format!("rewritten: {}, dropped: {}", rewritten, dropped)
    );
    end_span!(logger, REWRITE_IMAGES);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_fragment;
    use crate::serializer::serialize_children;

    fn images(html: &str) -> (String, SanitizeReport) {
        let root = parse_fragment(html);
        let mut report = SanitizeReport::default();
        let logger = PerfLogger::new(vec![]);
        let options = SanitizeOptions::new("https://site.com");
        rewrite_images(&root, &options, &mut report, &logger);
        (serialize_children(&root), report)
    }

    #[test]
    fn root_relative_image_gets_base_and_fallback_size() {
        let (out, report) = images(r#"<img src="/u/a.jpg">"#);
        assert_eq!(
            out,
            r#"<amp-img src="https://site.com/u/a.jpg" alt="" width="800" height="450" layout="responsive"></amp-img>"#
        );
        assert_eq!(report.images_rewritten, 1);
    }

    #[test]
    fn absolute_image_keeps_src_and_size() {
        let (out, _) = images(
            r#"<img width="10" class="wp-image" src="https://cdn.example.com/a.jpg" height="20" style="float:left" srcset="a.jpg 1x">"#,
        );
        assert_eq!(
            out,
            r#"<amp-img src="https://cdn.example.com/a.jpg" alt="" width="10" height="20" layout="responsive"></amp-img>"#
        );
    }

    #[test]
    fn dimensions_fall_back_one_at_a_time() {
        let (out, _) = images(r#"<img src="a.jpg" width="640" height="auto">"#);
        assert!(out.contains(r#"width="640" height="450""#));
        let (out, _) = images(r#"<img src="a.jpg" width="50%" height="360">"#);
        assert!(out.contains(r#"width="800" height="360""#));
    }

    #[test]
    fn relative_and_protocol_relative_src_are_left_alone() {
        let (out, _) = images(r#"<img src="uploads/a.jpg"><img src="//cdn.example.com/b.jpg">"#);
        assert!(out.contains(r#"src="uploads/a.jpg""#));
        assert!(out.contains(r#"src="//cdn.example.com/b.jpg""#));
    }

    #[test]
    fn image_without_src_is_dropped() {
        let (out, report) = images(r#"<p>x<img alt="x"><img src=""><img src="javascript:alert(1)"></p>"#);
        assert_eq!(out, "<p>x</p>");
        assert_eq!(report.images_dropped, 3);
    }

    #[test]
    fn alt_is_escaped_once() {
        let (out, _) = images(r#"<img src="/a.jpg" alt='5 &gt; 3 "quoted" &amp; more'>"#);
        assert!(out.contains(r#"alt="5 &gt; 3 &quot;quoted&quot; &amp; more""#));
        let (again, _) = images(&out);
        assert_eq!(out, again);
    }

    #[test]
    fn existing_amp_img_gets_dimensions() {
        let (out, report) = images(r#"<amp-img src="/a.jpg" layout="fixed" width="x"></amp-img>"#);
        assert_eq!(
            out,
            r#"<amp-img src="/a.jpg" layout="fixed" width="800" height="450"></amp-img>"#
        );
        assert_eq!(report.images_rewritten, 0);
    }

    #[test]
    fn descriptor_reads_all_fields() {
        let body = parse_fragment(r#"<img src=" /x.png " alt="A cat" width="300" height="200">"#);
        let img = body.select_first("img").unwrap().as_node().clone();
        let options = SanitizeOptions::new("https://site.com");
        assert_eq!(
            image_descriptor(&img, &options),
            Some(ImageDescriptor {
                src: String::from("https://site.com/x.png"),
                alt: String::from("A cat"),
                width: 300,
                height: 200,
            })
        );
    }
}
