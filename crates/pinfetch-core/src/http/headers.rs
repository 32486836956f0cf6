//! Parse HTTP response header lines as libcurl hands them over.

/// Headers of the final response on a handle. A new status line resets the
/// state so interim responses (`100 Continue`) do not leak into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub status: Option<u32>,
    pub content_length: Option<u64>,
    pub location: Option<String>,
}

impl ResponseHeaders {
    /// Feed one raw header line (CRLF included or not).
    pub fn push_line(&mut self, raw: &[u8]) {
        let Ok(line) = std::str::from_utf8(raw) else {
            return;
        };
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            *self = ResponseHeaders {
                status: parse_status_line(line),
                ..Default::default()
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                self.content_length = value.parse::<u64>().ok();
            }
            if name.eq_ignore_ascii_case("location") && !value.is_empty() {
                self.location = Some(value.to_string());
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }
}

fn parse_status_line(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse().ok()
}
