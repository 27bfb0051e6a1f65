//! Predefined header tables used to seed a fresh encoding context.
//!
//! The seed table depends on the direction of the stream: requests and
//! responses start from different sets of common headers. Seeding preserves
//! table order, so predefined position `i` is header table index `i` in a
//! freshly constructed context.

/// Which side of the exchange a context compresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Client to server. Uses the request seed table and codebook.
    #[default]
    Request,
    /// Server to client. Uses the response seed table and codebook.
    Response,
}

impl Direction {
    /// The predefined seed table for this direction.
    pub fn predefined_table(self) -> &'static [(&'static [u8], &'static [u8])] {
        match self {
            Direction::Request => REQUEST_TABLE,
            Direction::Response => RESPONSE_TABLE,
        }
    }
}

/// Request seed entries: (name, value).
pub const REQUEST_TABLE: &[(&[u8], &[u8])] = &[
    (b":scheme", b"http"),             // 0
    (b":scheme", b"https"),            // 1
    (b":host", b""),                   // 2
    (b":path", b"/"),                  // 3
    (b":method", b"GET"),              // 4
    (b"accept", b""),                  // 5
    (b"accept-charset", b""),          // 6
    (b"accept-encoding", b""),         // 7
    (b"accept-language", b""),         // 8
    (b"cookie", b""),                  // 9
    (b"if-modified-since", b""),       // 10
    (b"user-agent", b""),              // 11
    (b"referer", b""),                 // 12
    (b"authorization", b""),           // 13
    (b"allow", b""),                   // 14
    (b"cache-control", b""),           // 15
    (b"connection", b""),              // 16
    (b"content-length", b""),          // 17
    (b"content-type", b""),            // 18
    (b"date", b""),                    // 19
    (b"expect", b""),                  // 20
    (b"from", b""),                    // 21
    (b"if-match", b""),                // 22
    (b"if-none-match", b""),           // 23
    (b"if-range", b""),                // 24
    (b"if-unmodified-since", b""),     // 25
    (b"max-forwards", b""),            // 26
    (b"proxy-authorization", b""),     // 27
    (b"range", b""),                   // 28
    (b"via", b""),                     // 29
];

/// Response seed entries: (name, value).
pub const RESPONSE_TABLE: &[(&[u8], &[u8])] = &[
    (b":status", b"200"),                    // 0
    (b"age", b""),                           // 1
    (b"cache-control", b""),                 // 2
    (b"content-length", b""),                // 3
    (b"content-type", b""),                  // 4
    (b"date", b""),                          // 5
    (b"etag", b""),                          // 6
    (b"expires", b""),                       // 7
    (b"last-modified", b""),                 // 8
    (b"server", b""),                        // 9
    (b"set-cookie", b""),                    // 10
    (b"vary", b""),                          // 11
    (b"via", b""),                           // 12
    (b"access-control-allow-origin", b""),   // 13
    (b"accept-ranges", b""),                 // 14
    (b"allow", b""),                         // 15
    (b"connection", b""),                    // 16
    (b"content-disposition", b""),           // 17
    (b"content-encoding", b""),              // 18
    (b"content-language", b""),              // 19
    (b"content-location", b""),              // 20
    (b"content-range", b""),                 // 21
    (b"link", b""),                          // 22
    (b"location", b""),                      // 23
    (b"proxy-authenticate", b""),            // 24
    (b"refresh", b""),                       // 25
    (b"retry-after", b""),                   // 26
    (b"strict-transport-security", b""),     // 27
    (b"transfer-encoding", b""),             // 28
    (b"www-authenticate", b""),              // 29
];
