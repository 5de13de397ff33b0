//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! Registro cerrado de códigos de estado que el motor sabe nombrar:
//!
//! - **2xx**: Éxito (200 OK, 202 Accepted)
//! - **4xx**: Error del cliente (400, 404)
//! - **5xx**: Error del servidor (500)
//!
//! Cualquier código numérico fuera de la tabla se resuelve a `200 OK`.
//! Es un comportamiento observable (los tests dependen de él), así que
//! `WriteStatus(999)` produce `HTTP/1.1 200 OK` y no `999 ...`.

/// Códigos de estado HTTP conocidos por el registro
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    #[default]
    Ok = 200,

    /// 202 Accepted - Aceptada para procesarse más tarde
    Accepted = 202,

    /// 400 Bad Request - Request line o target malformados
    BadRequest = 400,

    /// 404 Not Found - No hay handler para (método, path)
    NotFound = 404,

    /// 500 Internal Server Error - El handler falló antes de escribir
    InternalServerError = 500,
}

impl StatusCode {
    /// Resuelve un código numérico contra el registro
    ///
    /// Los códigos desconocidos caen a `StatusCode::Ok`.
    ///
    /// # Ejemplo
    /// ```
    /// use http11_server::http::StatusCode;
    /// assert_eq!(StatusCode::from_u16(404), StatusCode::NotFound);
    /// assert_eq!(StatusCode::from_u16(999), StatusCode::Ok);
    /// ```
    pub fn from_u16(code: u16) -> Self {
        match code {
            // 2xx
            200 => StatusCode::Ok,
            202 => StatusCode::Accepted,
            // 4xx
            400 => StatusCode::BadRequest,
            404 => StatusCode::NotFound,
            // 5xx
            500 => StatusCode::InternalServerError,
            _ => StatusCode::Ok,
        }
    }

    /// Convierte el código a su valor numérico
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Texto de razón (reason phrase) canónico del código
    ///
    /// # Ejemplo
    /// ```
    /// use http11_server::http::StatusCode;
    /// assert_eq!(StatusCode::Accepted.reason_phrase(), "Accepted");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::Accepted => "Accepted",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del cliente (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.as_u16())
    }

    /// Verifica si el código indica error del servidor (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.as_u16())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode::from_u16(code)
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
