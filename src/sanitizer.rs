mod embeds;
mod images;
mod nesting;
mod strip;

use crate::logging::logger::*;
use crate::logging::logging_defs::*;
use crate::models::{SanitizeOptions, SanitizeReport, SanitizedFragment};
use crate::parser::parse_fragment;
use crate::serializer::serialize_children;

pub use embeds::iframe_descriptor;
pub use images::image_descriptor;

/// Upper bound on parse/serialize round trips while waiting for the output
/// to stop changing.
const MAX_SETTLE_PASSES: usize = 3;

fn create_perf_logger(options: &SanitizeOptions) -> PerfLogger {
    PerfLogger::new(options.listeners.clone())
}

/// One sanitizer run.  Owns the perf logger for that run, so a
/// `Sanitizer` is cheap to build and is dropped once the fragment is out.
pub struct Sanitizer<'a> {
    options: &'a SanitizeOptions,
    logger: PerfLogger,
}

impl<'a> Sanitizer<'a> {
    pub fn new(options: &'a SanitizeOptions) -> Sanitizer<'a> {
        Sanitizer {
            options,
            logger: create_perf_logger(options),
        }
    }

    /// Parse `html`, run every stage over the tree in order, and serialize
    /// what is left.  Each stage works on the output of the previous one:
    ///
    /// 1. raw-text elements (`script`, `style`, ...) and comments go,
    /// 2. `on*` attributes go,
    /// 3. iframes become links or disappear,
    /// 4. images become `amp-img` or disappear,
    /// 5. preload links go,
    /// 6. `javascript:` links lose their target,
    /// 7. forms nested in forms and links nested in links are unwrapped.
    ///
    /// The serialized result is then parsed again and rewritten until it
    /// reads back unchanged, so the output is a fixed point of the pipeline.
    pub fn sanitize(self, html: &str) -> SanitizedFragment {
        let logger = &self.logger;
        start_span!(logger, SANITIZE);
        if html.is_empty() {
            end_span!(logger, SANITIZE);
            return SanitizedFragment::default();
        }

        start_span!(logger, PARSE_FRAGMENT);
        let root = parse_fragment(html);
        end_span!(logger, PARSE_FRAGMENT);
        add_point_to_span_str!(logger, SANITIZE, "parse_fragment_done");

        let mut report = SanitizeReport::default();
        strip::strip_raw_text(&root, &mut report, logger);
        add_point_to_span_str!(logger, SANITIZE, "strip_raw_text_done");
        strip::strip_event_handlers(&root, &mut report, logger);
        add_point_to_span_str!(logger, SANITIZE, "strip_event_handlers_done");
        embeds::replace_iframes(&root, self.options, &mut report, logger);
        add_point_to_span_str!(logger, SANITIZE, "replace_iframes_done");
        images::rewrite_images(&root, self.options, &mut report, logger);
        add_point_to_span_str!(logger, SANITIZE, "rewrite_images_done");
        strip::remove_preload_links(&root, &mut report, logger);
        add_point_to_span_str!(logger, SANITIZE, "remove_preload_links_done");
        embeds::neutralize_script_links(&root, &mut report, logger);
        add_point_to_span_str!(logger, SANITIZE, "neutralize_script_links_done");
        nesting::unwrap_nested(&root, &mut report, logger);
        add_point_to_span_str!(logger, SANITIZE, "unwrap_nested_done");

        start_span!(logger, SERIALIZE);
        let mut html = serialize_children(&root);
        for _ in 0..MAX_SETTLE_PASSES {
            let reparsed = parse_fragment(&html);
            nesting::unwrap_nested(&reparsed, &mut report, logger);
            let settled = serialize_children(&reparsed);
            if settled == html {
                break;
            }
            html = settled;
        }
        end_span!(logger, SERIALIZE);

        annotate_span!(logger, SANITIZE, format!("{:?}", report));
        end_span!(logger, SANITIZE);
        SanitizedFragment { html, report }
    }
}
