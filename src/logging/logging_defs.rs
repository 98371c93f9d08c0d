/// Span IDs for performance-logging events.  Each ID doubles as the bit
/// index in [`super::logger::SpanFilter`], so keep them below 32.
pub const SANITIZE: u64 = 1;
pub const PARSE_FRAGMENT: u64 = 2;
pub const STRIP_RAW_TEXT: u64 = 3;
pub const STRIP_EVENT_HANDLERS: u64 = 4;
pub const REPLACE_IFRAMES: u64 = 5;
pub const REWRITE_IMAGES: u64 = 6;
pub const REMOVE_PRELOAD_LINKS: u64 = 7;
pub const NEUTRALIZE_SCRIPT_LINKS: u64 = 8;
pub const SERIALIZE: u64 = 9;
pub const UNWRAP_NESTED: u64 = 10;

pub fn name(span_id: u64) -> &'static str {
    match span_id {
        SANITIZE => "SANITIZE",
        PARSE_FRAGMENT => "PARSE_FRAGMENT",
        STRIP_RAW_TEXT => "STRIP_RAW_TEXT",
        STRIP_EVENT_HANDLERS => "STRIP_EVENT_HANDLERS",
        REPLACE_IFRAMES => "REPLACE_IFRAMES",
        REWRITE_IMAGES => "REWRITE_IMAGES",
        REMOVE_PRELOAD_LINKS => "REMOVE_PRELOAD_LINKS",
        NEUTRALIZE_SCRIPT_LINKS => "NEUTRALIZE_SCRIPT_LINKS",
        SERIALIZE => "SERIALIZE",
        UNWRAP_NESTED => "UNWRAP_NESTED",
        _ => "UNKNOWN",
    }
}
