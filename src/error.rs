//! # Errores del motor
//! src/error.rs
//!
//! Taxonomía:
//! - `ParseError`: request ilegible. Se responde 400 cuando todavía es posible.
//! - `ServerError`: fallas de ciclo de vida (bind, reinicio).
//! - `BoxError`: error opaco que retorna un handler.

use std::io;
use thiserror::Error;

/// Error opaco devuelto por los handlers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Resultado de un handler
pub type HandlerResult = Result<(), BoxError>;

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Error)]
pub enum ParseError {
    /// El peer cerró sin mandar una request line
    #[error("Empty request")]
    EmptyRequest,

    /// Menos de dos tokens en la request line
    #[error("Malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// Target imposible de interpretar como URL
    #[error("Invalid request target: {0:?}")]
    InvalidTarget(String),

    /// Bytes que no son UTF-8 en la request line o en un header
    #[error("Request is not valid UTF-8")]
    InvalidEncoding,

    /// Línea más larga que el límite del buffer
    #[error("Line exceeds {0} bytes")]
    LineTooLong(usize),

    /// Request line más headers superan el tope total
    #[error("Request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    /// Falla leyendo del socket
    #[error("I/O error while reading request: {0}")]
    Io(#[from] io::Error),
}

impl ParseError {
    /// Indica si el error amerita una respuesta 400
    ///
    /// `EmptyRequest` e `Io` cierran la conexión sin responder.
    pub fn is_bad_request(&self) -> bool {
        !matches!(self, ParseError::EmptyRequest | ParseError::Io(_))
    }
}

/// Errores del ciclo de vida del servidor
#[derive(Debug, Error)]
pub enum ServerError {
    /// No se pudo enlazar el listener (fatal)
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// `start` llamado mientras el accept loop ya corre
    #[error("server is already running")]
    AlreadyRunning,

    /// `start` llamado después de `shutdown`
    #[error("server is closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_classification() {
        assert!(ParseError::MalformedRequestLine("GET".into()).is_bad_request());
        assert!(ParseError::InvalidTarget("%zz".into()).is_bad_request());
        assert!(ParseError::InvalidEncoding.is_bad_request());
        assert!(ParseError::LineTooLong(8192).is_bad_request());
        assert!(ParseError::HeadTooLarge(65536).is_bad_request());
        assert!(!ParseError::EmptyRequest.is_bad_request());

        let io = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert!(!ParseError::from(io).is_bad_request());
    }

    #[test]
    fn test_bind_error_message() {
        let err = ServerError::Bind {
            address: "127.0.0.1:80".into(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(err.to_string().starts_with("failed to bind 127.0.0.1:80"));
    }
}
