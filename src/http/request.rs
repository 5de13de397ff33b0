//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser HTTP/1.1 desde cero, sobre cualquier `BufRead`.
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /path?param1=value1&param2=value2 HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! User-Agent: curl/8.0.0\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD target [PROTOCOL]`
//! 2. **Headers**: Pares `Name: Value` hasta una línea vacía o EOF
//! 3. **Body**: nunca se lee. Una conexión atiende exactamente un request.

use super::Header;
use crate::error::ParseError;
use crate::server::Context;
use std::collections::HashMap;
use std::io::{BufRead, Read};

/// Tamaño máximo de una línea (request line o header)
pub const MAX_LINE_BYTES: usize = 8 * 1024;

/// Tamaño máximo de la cabecera completa (request line + headers)
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Método HTTP, siempre en mayúsculas
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    CONNECT,
    OPTIONS,
    TRACE,
    PATCH,
    /// Cualquier otro token, ya convertido a mayúsculas
    Extension(String),
}

impl Method {
    /// Interpreta un token de la request line
    ///
    /// La comparación ignora mayúsculas: `get` es `GET`.
    ///
    /// # Ejemplo
    /// ```
    /// use http11_server::http::Method;
    /// assert_eq!(Method::from_token("get"), Method::GET);
    /// assert_eq!(Method::from_token("purge").as_str(), "PURGE");
    /// ```
    pub fn from_token(token: &str) -> Self {
        let upper = token.to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "CONNECT" => Method::CONNECT,
            "OPTIONS" => Method::OPTIONS,
            "TRACE" => Method::TRACE,
            "PATCH" => Method::PATCH,
            _ => Method::Extension(upper),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::CONNECT => "CONNECT",
            Method::OPTIONS => "OPTIONS",
            Method::TRACE => "TRACE",
            Method::PATCH => "PATCH",
            Method::Extension(other) => other,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target del request: path más query string opcional
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    path: String,
    query: Option<String>,
}

impl RequestTarget {
    /// Interpreta el segundo token de la request line
    ///
    /// Acepta origin-form (`/a/b?x=1`), absolute-form (`http://h/a`) y `*`.
    /// El path de origin-form se conserva tal cual: sin normalizar ni
    /// decodificar, porque el router compara strings exactos.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let invalid = || ParseError::InvalidTarget(raw.to_string());

        if raw.is_empty() || raw.chars().any(char::is_control) || !has_valid_escapes(raw) {
            return Err(invalid());
        }

        if raw == "*" {
            return Ok(Self {
                path: raw.to_string(),
                query: None,
            });
        }

        if raw.starts_with('/') {
            // El fragmento nunca viaja al servidor, pero si llega se descarta
            let without_fragment = raw.split('#').next().unwrap_or_default();
            let (path, query) = match without_fragment.split_once('?') {
                Some((path, query)) => (path, Some(query.to_string())),
                None => (without_fragment, None),
            };
            return Ok(Self {
                path: path.to_string(),
                query,
            });
        }

        let absolute = url::Url::parse(raw).map_err(|_| invalid())?;
        Ok(Self {
            path: absolute.path().to_string(),
            query: absolute.query().map(str::to_string),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query string cruda, sin el `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

/// Cada `%` debe ir seguido de dos dígitos hexadecimales
fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape_ok = i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !escape_ok {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP en mayúsculas
    method: Method,

    /// Path y query del target
    url: RequestTarget,

    /// Tercer token de la request line (ej: "HTTP/1.1"), solo informativo
    protocol: Option<String>,

    /// Copia del header `host`, si vino
    host: Option<String>,

    /// Headers con nombres en minúsculas
    headers: Header,

    /// Contexto derivado del servidor, sin cancelación
    context: Context,
}

impl Request {
    /// Lee y parsea un request desde un lector con buffer
    ///
    /// Solo consume la request line y los headers; el body queda sin leer.
    ///
    /// # Errores
    ///
    /// * `ParseError::EmptyRequest` - EOF antes de la request line
    /// * `ParseError::MalformedRequestLine` - menos de dos tokens
    /// * `ParseError::InvalidTarget` - target ilegible
    /// * `ParseError::HeadTooLarge` - la cabecera supera `MAX_HEAD_BYTES`
    /// * `ParseError::Io` - falla del socket
    pub fn read_from<R: BufRead>(mut reader: R, context: Context) -> Result<Self, ParseError> {
        let mut line = Vec::with_capacity(256);

        // 1. Request line
        let mut head_bytes = read_line(&mut reader, &mut line)?;
        if head_bytes == 0 {
            return Err(ParseError::EmptyRequest);
        }
        let request_line = std::str::from_utf8(&line).map_err(|_| ParseError::InvalidEncoding)?;
        let (method, url, protocol) = Self::parse_request_line(request_line)?;

        // 2. Headers hasta línea vacía o EOF
        let mut headers = Header::new();
        loop {
            let consumed = read_line(&mut reader, &mut line)?;
            if consumed == 0 || line.is_empty() {
                break;
            }
            head_bytes += consumed;
            if head_bytes > MAX_HEAD_BYTES {
                return Err(ParseError::HeadTooLarge(MAX_HEAD_BYTES));
            }
            let header_line = std::str::from_utf8(&line).map_err(|_| ParseError::InvalidEncoding)?;
            let (name, value) = header_line.split_once(':').unwrap_or((header_line, ""));
            headers.set(name.trim().to_ascii_lowercase(), value.trim());
        }

        let host = headers.get("host").map(str::to_string);

        Ok(Request {
            method,
            url,
            protocol,
            host,
            headers,
            context,
        })
    }

    /// Parsea un request completo desde bytes en memoria
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use http11_server::http::{Method, Request};
    ///
    /// let raw = b"get /people?page=2 HTTP/1.1\r\nHost: x\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), &Method::GET);
    /// assert_eq!(request.path(), "/people");
    /// assert_eq!(request.query_param("page").as_deref(), Some("2"));
    /// assert_eq!(request.host(), Some("x"));
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        Self::read_from(buffer, Context::background())
    }

    /// Formato: `METHOD target [PROTOCOL]`
    ///
    /// Lo que venga después del tercer token se ignora.
    fn parse_request_line(
        line: &str,
    ) -> Result<(Method, RequestTarget, Option<String>), ParseError> {
        let mut parts = line.split(' ');

        let (method, target) = match (parts.next(), parts.next()) {
            (Some(method), Some(target)) if !method.is_empty() => (method, target),
            _ => return Err(ParseError::MalformedRequestLine(line.to_string())),
        };

        let protocol = parts
            .next()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok((Method::from_token(method), RequestTarget::parse(target)?, protocol))
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn url(&self) -> &RequestTarget {
        &self.url
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    /// Obtiene un query parameter ya decodificado
    ///
    /// Si el parámetro se repite, gana la primera aparición.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.url.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Todos los query parameters decodificados (la última aparición gana)
    pub fn query_params(&self) -> HashMap<String, String> {
        self.url
            .query()
            .map(|query| url::form_urlencoded::parse(query.as_bytes()).into_owned().collect())
            .unwrap_or_default()
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn headers(&self) -> &Header {
        &self.headers
    }

    /// Obtiene un header; el nombre se busca en minúsculas
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase())
    }

    pub fn context(&self) -> &Context {
        &self.context
    }
}

/// Lee una línea acotada a `MAX_LINE_BYTES` y le quita el CRLF final
///
/// Retorna la cantidad de bytes consumidos del lector (0 = EOF).
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<usize, ParseError> {
    buf.clear();
    let consumed = reader
        .by_ref()
        .take(MAX_LINE_BYTES as u64)
        .read_until(b'\n', buf)?;

    if consumed == MAX_LINE_BYTES && buf.last() != Some(&b'\n') {
        return Err(ParseError::LineTooLong(MAX_LINE_BYTES));
    }

    while matches!(buf.last(), Some(b'\n') | Some(b'\r')) {
        buf.pop();
    }
    Ok(consumed)
}
