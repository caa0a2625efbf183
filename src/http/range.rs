//! HTTP Range request parsing module
//!
//! Single byte-range support for image and asset downloads (RFC 7233).

/// Inclusive byte span resolved against a concrete body length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: usize,
    pub end: usize,
}

impl ByteRange {
    #[inline]
    pub const fn content_length(self) -> usize {
        self.end - self.start + 1
    }
}

/// Range header parse result
#[derive(Debug, PartialEq, Eq)]
pub enum RangeParseResult {
    /// Satisfiable range, already clamped to the body
    Valid(ByteRange),
    /// Well-formed but outside the body, answer 416
    NotSatisfiable,
    /// No header, another unit, multi-range or garbage: serve the full body
    None,
}

/// Parse HTTP Range header (single range only, bytes unit)
///
/// Accepts `bytes=start-end`, `bytes=start-` and `bytes=-suffix`.
pub fn parse_range_header(range_header: Option<&str>, body_len: usize) -> RangeParseResult {
    let Some(spec) = range_header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeParseResult::None;
    };
    let Some((first, last)) = spec.split_once('-') else {
        return RangeParseResult::None;
    };
    if last.contains('-') || spec.contains(',') {
        return RangeParseResult::None;
    }

    let (first, last) = (first.trim(), last.trim());
    match (first.parse::<usize>(), last.parse::<usize>()) {
        // bytes=-N
        (Err(_), Ok(suffix)) if first.is_empty() => {
            if suffix == 0 || body_len == 0 {
                return RangeParseResult::NotSatisfiable;
            }
            RangeParseResult::Valid(ByteRange {
                start: body_len.saturating_sub(suffix),
                end: body_len - 1,
            })
        }
        // bytes=N-
        (Ok(start), Err(_)) if last.is_empty() => resolve(start, usize::MAX, body_len),
        // bytes=N-M
        (Ok(start), Ok(end)) => {
            if start > end {
                return RangeParseResult::NotSatisfiable;
            }
            resolve(start, end, body_len)
        }
        _ => RangeParseResult::None,
    }
}

fn resolve(start: usize, end: usize, body_len: usize) -> RangeParseResult {
    if start >= body_len {
        return RangeParseResult::NotSatisfiable;
    }
    RangeParseResult::Valid(ByteRange {
        start,
        end: end.min(body_len - 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_range() {
        assert_eq!(parse_range_header(None, 100), RangeParseResult::None);
        assert_eq!(
            parse_range_header(Some("items=0-9"), 100),
            RangeParseResult::None
        );
    }

    #[test]
    fn test_standard_range() {
        assert_eq!(
            parse_range_header(Some("bytes=0-9"), 100),
            RangeParseResult::Valid(ByteRange { start: 0, end: 9 })
        );
        if let RangeParseResult::Valid(r) = parse_range_header(Some("bytes=0-9"), 100) {
            assert_eq!(r.content_length(), 10);
        }
    }

    #[test]
    fn test_end_clamped() {
        assert_eq!(
            parse_range_header(Some("bytes=90-500"), 100),
            RangeParseResult::Valid(ByteRange { start: 90, end: 99 })
        );
    }

    #[test]
    fn test_open_range() {
        assert_eq!(
            parse_range_header(Some("bytes=50-"), 100),
            RangeParseResult::Valid(ByteRange { start: 50, end: 99 })
        );
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(
            parse_range_header(Some("bytes=-20"), 100),
            RangeParseResult::Valid(ByteRange { start: 80, end: 99 })
        );
        assert_eq!(
            parse_range_header(Some("bytes=-500"), 100),
            RangeParseResult::Valid(ByteRange { start: 0, end: 99 })
        );
    }

    #[test]
    fn test_not_satisfiable() {
        assert_eq!(
            parse_range_header(Some("bytes=200-"), 100),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=9-3"), 100),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=-0"), 100),
            RangeParseResult::NotSatisfiable
        );
        assert_eq!(
            parse_range_header(Some("bytes=-5"), 0),
            RangeParseResult::NotSatisfiable
        );
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(
            parse_range_header(Some("bytes=a-b"), 100),
            RangeParseResult::None
        );
        assert_eq!(
            parse_range_header(Some("bytes=0-9,20-29"), 100),
            RangeParseResult::None
        );
        assert_eq!(
            parse_range_header(Some("bytes=-"), 100),
            RangeParseResult::None
        );
    }
}
