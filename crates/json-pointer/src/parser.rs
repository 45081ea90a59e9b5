use std::borrow::Cow;

use crate::ParseJsonPointerError;

/// Final reference token addressing the slot past the last array element.
pub const APPEND_SEGMENT: &str = "-";

pub(crate) struct JsonPointerParser<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> JsonPointerParser<'a> {
    #[inline]
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }
}

impl<'a> Iterator for JsonPointerParser<'a> {
    type Item = Result<String, ParseJsonPointerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.input.is_empty() {
            return None;
        }

        if self.input.as_bytes()[0] != b'/' {
            self.input = "";
            return Some(Err(ParseJsonPointerError::MissingLeadingSlash));
        }
        let rest = &self.input[1..];
        let start = self.offset + 1;

        let (segment, remaining) = match memchr::memchr(b'/', rest.as_bytes()) {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        self.input = remaining;
        self.offset = start + segment.len();

        match unescape_segment(segment, start) {
            Ok(segment) => Some(Ok(segment.into_owned())),
            Err(err) => {
                self.input = "";
                Some(Err(err))
            }
        }
    }
}

fn unescape_segment(value: &str, offset: usize) -> Result<Cow<'_, str>, ParseJsonPointerError> {
    let bytes = value.as_bytes();
    let mut idx = match memchr::memchr(b'~', bytes) {
        Some(idx) => idx,
        None => return Ok(value.into()),
    };

    let mut s = String::with_capacity(value.len());
    let mut start = 0;
    loop {
        s.push_str(&value[start..idx]);
        match bytes.get(idx + 1) {
            Some(b'0') => s.push('~'),
            Some(b'1') => s.push('/'),
            _ => {
                return Err(ParseJsonPointerError::InvalidEscape {
                    offset: offset + idx,
                })
            }
        }
        start = idx + 2;
        match memchr::memchr(b'~', &bytes[start..]) {
            Some(next) => idx = start + next,
            None => break,
        }
    }
    s.push_str(&value[start..]);

    Ok(s.into())
}

/// Escapes a single reference token, `~` as `~0` and `/` as `~1`.
pub fn escape_segment(segment: &str) -> Cow<'_, str> {
    if memchr::memchr2(b'~', b'/', segment.as_bytes()).is_none() {
        return segment.into();
    }

    let mut s = String::with_capacity(segment.len() + 2);
    for ch in segment.chars() {
        match ch {
            '~' => s.push_str("~0"),
            '/' => s.push_str("~1"),
            ch => s.push(ch),
        }
    }
    s.into()
}

/// Parses an array index token: `0`, or a decimal number without a leading zero.
pub fn parse_array_index(segment: &str) -> Option<usize> {
    match segment.as_bytes() {
        [] => None,
        [b'0'] => Some(0),
        [b'0', ..] => None,
        bytes if bytes.iter().all(u8::is_ascii_digit) => segment.parse().ok(),
        _ => None,
    }
}

pub(crate) fn parse_json_pointer(input: &str) -> Result<Vec<String>, ParseJsonPointerError> {
    let parser = JsonPointerParser::new(input);
    let mut segments = Vec::new();

    for res in parser {
        let segment = res?;
        segments.push(segment);
    }

    Ok(segments)
}
