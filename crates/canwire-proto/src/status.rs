use crate::query;

/// Status code meaning success.
pub const CODE_OK: i32 = 200;

/// Out-of-band success/error result carried next to the message body.
///
/// Encodes as a query string (`code=200&msg=ok`) on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: i32,
    msg: String,
}

impl Status {
    pub fn new(code: i32, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
        }
    }

    /// A successful status.
    pub fn ok() -> Self {
        Self::new(CODE_OK, "ok")
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub fn is_ok(&self) -> bool {
        self.code == CODE_OK
    }

    /// Encode as query-string bytes. An all-default status encodes empty.
    pub fn encode_query(&self) -> Vec<u8> {
        if *self == Status::default() {
            return Vec::new();
        }
        let code = self.code.to_string();
        query::encode_pairs([("code", code.as_str()), ("msg", self.msg.as_str())].into_iter())
            .into_bytes()
    }

    /// Decode from query-string bytes. Unknown keys are ignored; a missing
    /// or malformed code decodes as 0.
    pub fn decode_query(data: &[u8]) -> Self {
        let mut status = Status::default();
        for (key, value) in query::decode_pairs(data) {
            match key.as_str() {
                "code" => status.code = value.parse().unwrap_or(0),
                "msg" => status.msg = value,
                _ => {}
            }
        }
        status
    }
}

impl Default for Status {
    fn default() -> Self {
        Self {
            code: 0,
            msg: String::new(),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_round_trips() {
        let encoded = Status::ok().encode_query();
        assert_eq!(encoded, b"code=200&msg=ok");
        assert_eq!(Status::decode_query(&encoded), Status::ok());
    }

    #[test]
    fn default_encodes_empty_and_back() {
        assert!(Status::default().encode_query().is_empty());
        assert_eq!(Status::decode_query(b""), Status::default());
    }

    #[test]
    fn error_with_reserved_chars_round_trips() {
        let status = Status::new(500, "bad arg: a=b&c");
        let encoded = status.encode_query();
        assert_eq!(Status::decode_query(&encoded), status);
        assert!(!Status::decode_query(&encoded).is_ok());
    }
}
