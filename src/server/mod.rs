//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en una dirección
//! 2. Acepta conexiones entrantes, un thread por conexión
//! 3. Lee y parsea un único request por conexión
//! 4. Despacha al router, escribe la respuesta y cierra
//! 5. Se apaga una sola vez, aunque `shutdown` se llame varias veces

pub mod connection;
pub mod context;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::Outcome;
pub use context::{CancelHandle, Context};
pub use tcp::{Server, Stopped};
