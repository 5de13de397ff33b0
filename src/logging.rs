//! # Logging
//! src/logging.rs
//!
//! Inicializa `tracing` con salida legible por consola. `RUST_LOG` tiene
//! prioridad sobre el nivel configurado.

use tracing_subscriber::EnvFilter;

/// Instala el subscriber global
///
/// Si ya había uno instalado (por ejemplo en tests) no hace nada.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(false)
        .try_init();
}
