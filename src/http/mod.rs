//! # Módulo HTTP
//!
//! Este módulo implementa el protocolo HTTP/1.1 desde cero, sin usar
//! librerías de alto nivel. Incluye:
//!
//! - Contenedor de headers compartido por request y response
//! - Registro de status codes
//! - Parsing de requests (request line + headers)
//! - Escritura de responses sobre la conexión
//!
//! ## Alcance
//!
//! - Un request por conexión: no hay keep-alive
//! - No se lee el body del request
//! - No hay chunked transfer encoding ni `Content-Length` automático
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! \r\n
//! Hello World
//! ```

pub mod header;
pub mod request;
pub mod response;
pub mod status;

// Re-exportamos los tipos principales para facilitar su uso
pub use header::Header;
pub use request::{Method, Request, RequestTarget};
pub use response::Response;
pub use status::StatusCode;
