//! # HTTP/1.1 Server
//! src/lib.rs
//!
//! Motor HTTP/1.1 implementado desde cero sobre TCP: acepta conexiones,
//! parsea el request, lo despacha por un router exacto y serializa la
//! respuesta directamente sobre el socket.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: headers, status codes, parsing de requests y escritura de responses
//! - `router`: tabla exacta (método, path) → handler
//! - `server`: accept loop, manejo de cada conexión y apagado
//! - `config`: CLI y variables de entorno del binario
//! - `logging`: inicialización de `tracing`
//! - `demo`: handlers de ejemplo del binario
//!
//! ## Contrato
//!
//! - Un request por conexión; luego se cierra (sin keep-alive)
//! - Concurrencia sin límite: un thread por conexión, sin timeouts
//! - `shutdown` detiene el accept loop sin esperar conexiones en vuelo
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use http11_server::router::Router;
//! use http11_server::server::Server;
//!
//! let router = Router::new();
//! router.get("/people", |_req, res| {
//!     res.write(b"Hello World")?;
//!     Ok(())
//! });
//!
//! let server = Server::new(router);
//! server.start("127.0.0.1:8080").expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod demo;
pub mod error;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;

pub use error::{BoxError, HandlerResult, ParseError, ServerError};
