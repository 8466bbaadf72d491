//! HTTP Range header parsing
//!
//! Handles single `bytes=` ranges as sent by media elements when seeking.
//! Anything this parser does not understand degrades to a full response
//! instead of failing the request.

/// Inclusive byte span of a file, already clamped to its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset
    pub start: u64,
    /// Last byte offset, inclusive
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes in the span, never zero.
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a file of `size` bytes.
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{size}", self.start, self.end)
    }
}

/// What to do with a request's `Range` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOutcome {
    /// Serve this span with 206
    Satisfiable(ByteRange),
    /// Start is past the end of the file, answer 416
    Unsatisfiable,
    /// Header is malformed or unsupported, serve the full file
    Ignored,
}

/// Parses a `Range` header value against a file of `size` bytes.
///
/// Supports `bytes=start-end`, `bytes=start-` and suffix ranges
/// `bytes=-n`. An end beyond the file is clamped to `size - 1`.
///
/// # Examples
/// ```
/// use streamshare_web::handlers::range::{ByteRange, RangeOutcome, parse_range_header};
///
/// assert_eq!(
///     parse_range_header("bytes=0-999999", 10),
///     RangeOutcome::Satisfiable(ByteRange { start: 0, end: 9 })
/// );
/// assert_eq!(parse_range_header("bytes=abc-", 10), RangeOutcome::Ignored);
/// ```
pub fn parse_range_header(header: &str, size: u64) -> RangeOutcome {
    let Some(spec) = header.trim().strip_prefix("bytes=") else {
        return RangeOutcome::Ignored;
    };

    // Multi-range responses are not produced; serve the whole file.
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }

    let Some((start_str, end_str)) = spec.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        return parse_suffix_range(end_str, size);
    }

    let Ok(start) = start_str.parse::<u64>() else {
        return RangeOutcome::Ignored;
    };

    let requested_end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<u64>() {
            Ok(end) if end >= start => Some(end),
            _ => return RangeOutcome::Ignored,
        }
    };

    if start >= size {
        return RangeOutcome::Unsatisfiable;
    }

    let last = size - 1;
    let end = requested_end.map_or(last, |end| end.min(last));
    RangeOutcome::Satisfiable(ByteRange { start, end })
}

fn parse_suffix_range(suffix: &str, size: u64) -> RangeOutcome {
    match suffix.parse::<u64>() {
        Ok(0) => RangeOutcome::Unsatisfiable,
        Ok(_) if size == 0 => RangeOutcome::Unsatisfiable,
        Ok(length) => RangeOutcome::Satisfiable(ByteRange {
            start: size.saturating_sub(length),
            end: size - 1,
        }),
        Err(_) => RangeOutcome::Ignored,
    }
}
