//! # HTTP/1.1 Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de ejemplo: lee la configuración, arma el
//! router, y apaga el servidor con Ctrl-C.

use http11_server::config::Config;
use http11_server::router::Router;
use http11_server::server::Server;
use http11_server::{demo, logging};
use std::sync::Arc;
use tracing::{error, info, warn};

fn main() {
    let config = Config::new();
    if let Err(e) = config.validate() {
        eprintln!("Configuración inválida: {}", e);
        std::process::exit(2);
    }

    logging::init(&config.log_level);

    let router = Router::new();
    demo::register(&router);
    info!(routes = router.len(), "router listo");

    let server = Arc::new(Server::new(router));

    let on_signal = Arc::clone(&server);
    if let Err(e) = ctrlc::set_handler(move || {
        info!("señal recibida, apagando");
        on_signal.shutdown();
    }) {
        warn!(error = %e, "no se pudo instalar el manejador de Ctrl-C");
    }

    match server.start(&config.address()) {
        Ok(stopped) => info!(reason = ?stopped, "servidor detenido"),
        Err(e) => {
            error!(error = %e, "error fatal");
            std::process::exit(1);
        }
    }
}
