//! # Escritura de Respuestas HTTP/1.1
//! src/http/response.rs
//!
//! `Response` se escribe directo sobre la conexión. La primera llamada a
//! `write` fija el status, serializa la sección de headers y envía el
//! payload en una sola escritura; las siguientes solo agregan bytes al body.
//!
//! ## Formato en el cable
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: application/json\r\n
//! Date: Mon, 05 Oct 2026 10:00:00 GMT\r\n
//! \r\n
//! {"ok": true}
//! ```
//!
//! No hay `Content-Length` ni chunked: el body termina cuando la conexión
//! se cierra.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use http11_server::http::Response;
//!
//! let mut wire = Vec::new();
//! let mut response = Response::new(&mut wire);
//! response.write_status(404);
//! response.write(b"Not found").unwrap();
//! response.write(b"!").unwrap();
//!
//! let text = String::from_utf8(wire).unwrap();
//! assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
//! assert!(text.ends_with("\r\n\r\nNot found!"));
//! ```

use super::{Header, StatusCode};
use std::io::{self, Write};

/// Respuesta en curso sobre una conexión
pub struct Response<'conn> {
    /// Headers a enviar con la primera escritura
    headers: Header,

    /// Status pendiente; `None` significa 200 OK
    status: Option<StatusCode>,

    /// Ya se envió la status line con sus headers
    header_sent: bool,

    /// Conexión, en uso exclusivo durante el request
    conn: &'conn mut dyn Write,
}

impl<'conn> Response<'conn> {
    pub fn new(conn: &'conn mut dyn Write) -> Self {
        Self {
            headers: Header::new(),
            status: None,
            header_sent: false,
            conn,
        }
    }

    pub fn headers(&self) -> &Header {
        &self.headers
    }

    /// Headers mutables; los cambios posteriores a la primera `write` se ignoran
    pub fn headers_mut(&mut self) -> &mut Header {
        &mut self.headers
    }

    /// Marca el status que saldrá con la primera escritura
    ///
    /// El código pasa por el registro de status, así que un código
    /// desconocido queda como 200 OK. No hace nada si los headers ya se
    /// enviaron.
    pub fn write_status(&mut self, code: u16) {
        if self.header_sent {
            return;
        }
        self.status = Some(StatusCode::from_u16(code));
    }

    /// Status efectivo (el pendiente, o 200 OK si nunca se fijó)
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or_default()
    }

    pub fn header_sent(&self) -> bool {
        self.header_sent
    }

    /// Escribe bytes del body
    ///
    /// En la primera llamada envía status line, headers, línea vacía y
    /// payload como una sola escritura. La respuesta queda marcada como
    /// iniciada aunque la escritura falle, porque parte de los bytes pudo
    /// haber salido.
    pub fn write(&mut self, payload: &[u8]) -> io::Result<()> {
        if self.header_sent {
            self.conn.write_all(payload)?;
            return self.conn.flush();
        }

        let status = self.status();
        self.status = Some(status);
        if !self.headers.contains("Date") {
            self.headers.set("Date", http_date());
        }

        let mut frame = self.head(status);
        frame.extend_from_slice(payload);

        self.header_sent = true;
        self.conn.write_all(&frame)?;
        self.conn.flush()
    }

    /// Status line + headers + línea vacía
    fn head(&self, status: StatusCode) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {}\r\n", status);
        for (name, value) in self.headers.iter() {
            head.push_str(name);
            head.push_str(": ");
            head.push_str(value);
            head.push_str("\r\n");
        }
        head.push_str("\r\n");
        head.into_bytes()
    }
}

impl std::fmt::Debug for Response<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("headers", &self.headers)
            .field("status", &self.status)
            .field("header_sent", &self.header_sent)
            .finish_non_exhaustive()
    }
}

/// Fecha en formato IMF-fixdate (RFC 9110)
fn http_date() -> String {
    chrono::Utc::now()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(wire: Vec<u8>) -> String {
        String::from_utf8(wire).unwrap()
    }

    #[test]
    fn test_write_defaults_to_200() {
        let mut wire = Vec::new();
        let mut response = Response::new(&mut wire);
        response.write(b"Hello world").unwrap();
        assert!(response.header_sent());

        let text = text(wire);
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.ends_with("\r\n\r\nHello world"));
    }

    #[test]
    fn test_write_status_then_write() {
        let mut wire = Vec::new();
        let mut response = Response::new(&mut wire);
        response.write_status(404);
        assert_eq!(response.status(), StatusCode::NotFound);
        response.write(b"missing").unwrap();

        let text = text(wire);
        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        let (_, body) = text.split_once("\r\n\r\n").unwrap();
        assert_eq!(body, "missing");
    }

    #[test]
    fn test_unknown_status_falls_back_to_200() {
        let mut wire = Vec::new();
        let mut response = Response::new(&mut wire);
        response.write_status(999);
        response.write(b"x").unwrap();

        let text = text(wire);
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(!text.contains("999"));
    }

    #[test]
    fn test_second_write_appends_without_framing() {
        let mut wire = Vec::new();
        let mut response = Response::new(&mut wire);
        response.write(b"first,").unwrap();
        response.write(b"second").unwrap();

        let text = text(wire);
        assert_eq!(text.matches("HTTP/1.1").count(), 1);
        assert_eq!(text.matches("\r\n\r\n").count(), 1);
        assert!(text.ends_with("\r\n\r\nfirst,second"));
    }

    #[test]
    fn test_status_and_headers_after_first_write_are_ignored() {
        let mut wire = Vec::new();
        let mut response = Response::new(&mut wire);
        response.write(b"a").unwrap();
        response.write_status(500);
        response.headers_mut().set("X-Late", "1");
        response.write(b"b").unwrap();
        assert_eq!(response.status(), StatusCode::Ok);

        let text = text(wire);
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(!text.contains("X-Late"));
    }

    #[test]
    fn test_headers_are_serialized() {
        let mut wire = Vec::new();
        let mut response = Response::new(&mut wire);
        response.headers_mut().set("Content-Type", "text/plain");
        response.write(b"").unwrap();

        let text = text(wire);
        assert!(text.contains("\r\nContent-Type: text/plain\r\n"));
        assert!(text.contains("\r\nDate: "));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_explicit_date_is_kept() {
        let mut wire = Vec::new();
        let mut response = Response::new(&mut wire);
        response.headers_mut().set("Date", "fixed");
        response.write(b"").unwrap();

        assert!(text(wire).contains("\r\nDate: fixed\r\n"));
    }

    #[test]
    fn test_failed_write_still_marks_header_sent() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut conn = Broken;
        let mut response = Response::new(&mut conn);
        assert!(response.write(b"x").is_err());
        assert!(response.header_sent());
    }

    #[test]
    fn test_http_date_shape() {
        let date = http_date();
        assert!(date.ends_with(" GMT"));
        assert_eq!(date.len(), "Mon, 05 Oct 2026 10:00:00 GMT".len());
    }
}
