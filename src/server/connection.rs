//! # Manejo de una conexión
//! src/server/connection.rs
//!
//! Une parser, router y response para una sola conexión:
//!
//! 1. Parsear el request (falla → 400, o cierre silencioso si no hubo datos
//!    o el socket falló)
//! 2. Despachar al router
//! 3. Si el handler falló y no se escribió nada → 500 genérico; si ya se
//!    había escrito algo, solo se registra el error
//! 4. Cerrar la conexión, siempre exactamente una vez
//!
//! No hay keep-alive: cada conexión atiende un único request.

use super::Context;
use crate::error::ParseError;
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Body genérico cuando el handler falla antes de escribir
pub const INTERNAL_ERROR_BODY: &[u8] = b"Internal Server Error";

/// Resultado de atender una conexión
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Se respondió con este status
    Responded(StatusCode),

    /// El handler falló después de iniciar la respuesta
    Aborted(StatusCode),

    /// No se envió nada (peer vacío o falla de lectura/escritura)
    Dropped,
}

/// Atiende una conexión TCP aceptada y la cierra
pub(crate) fn serve(stream: TcpStream, peer: SocketAddr, router: &Router, context: Context) {
    let start = Instant::now();

    let outcome = {
        let reader = BufReader::new(&stream);
        let mut writer = &stream;
        handle(reader, &mut writer, router, context)
    };

    debug!(
        %peer,
        ?outcome,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "conexión atendida"
    );

    close(stream, peer);
}

/// Ciclo parse → route → escritura sobre cualquier par lector/escritor
pub fn handle<R: BufRead>(
    reader: R,
    writer: &mut dyn Write,
    router: &Router,
    context: Context,
) -> Outcome {
    let request = match Request::read_from(reader, context) {
        Ok(request) => request,
        Err(ParseError::EmptyRequest) => {
            debug!("el peer cerró sin enviar un request");
            return Outcome::Dropped;
        }
        Err(ParseError::Io(e)) => {
            warn!(error = %e, "no se pudo leer el request");
            return Outcome::Dropped;
        }
        Err(e) => {
            warn!(error = %e, "request inválido");
            return respond_bad_request(writer, &e);
        }
    };

    debug!(method = %request.method(), path = request.path(), "request recibido");

    let mut response = Response::new(writer);
    response.headers_mut().set("Connection", "close");

    match router.route(&request, &mut response) {
        Ok(()) => Outcome::Responded(response.status()),
        Err(e) if !response.header_sent() => {
            error!(
                method = %request.method(),
                path = request.path(),
                error = %e,
                "el handler falló antes de escribir"
            );
            response.write_status(StatusCode::InternalServerError.as_u16());
            match response.write(INTERNAL_ERROR_BODY) {
                Ok(()) => Outcome::Responded(StatusCode::InternalServerError),
                Err(e) => {
                    warn!(error = %e, "no se pudo enviar el 500");
                    Outcome::Dropped
                }
            }
        }
        Err(e) => {
            error!(
                method = %request.method(),
                path = request.path(),
                error = %e,
                "el handler falló con la respuesta ya iniciada"
            );
            Outcome::Aborted(response.status())
        }
    }
}

fn respond_bad_request(writer: &mut dyn Write, err: &ParseError) -> Outcome {
    let mut response = Response::new(writer);
    response.headers_mut().set("Connection", "close");
    response.write_status(StatusCode::BadRequest.as_u16());

    match response.write(format!("Bad Request: {}", err).as_bytes()) {
        Ok(()) => Outcome::Responded(StatusCode::BadRequest),
        Err(e) => {
            warn!(error = %e, "no se pudo enviar el 400");
            Outcome::Dropped
        }
    }
}

fn close(stream: TcpStream, peer: SocketAddr) {
    if let Err(e) = stream.shutdown(Shutdown::Both) {
        // NotConnected es normal si el peer ya cerró
        if e.kind() != std::io::ErrorKind::NotConnected {
            warn!(%peer, error = %e, "no se pudo cerrar la conexión");
        }
    }
}
