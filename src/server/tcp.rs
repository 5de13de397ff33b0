//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementacion del servidor TCP: un accept loop que lanza un thread por
//! conexion, sin pool ni limite de concurrencia, y un apagado que se puede
//! llamar desde cualquier thread.
//!
//! ## Ciclo de vida
//!
//! ```text
//! Idle ──start()──▶ Listening(addr) ──shutdown() / cancelación──▶ Closed
//!   └──────────────────shutdown()──────────────────────────────────▲
//! ```
//!
//! `shutdown()` no espera a las conexiones en vuelo: solo detiene el accept
//! loop y cierra el listener. Un servidor cerrado no se puede reiniciar.

use super::{connection, Context};
use crate::error::ServerError;
use crate::router::Router;
use parking_lot::{Condvar, Mutex};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Tiempo máximo de cada intento de despertar al accept loop
const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Espera entre intentos fallidos de despertar al accept loop
const WAKE_RETRY: Duration = Duration::from_millis(100);

/// Motivo por el que terminó el accept loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopped {
    /// Se llamó a `Server::shutdown`
    Shutdown,

    /// Se canceló el `Context` externo
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Listening(SocketAddr),
    Closed,
}

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    router: Arc<Router>,
    context: Context,
    running: AtomicBool,
    state: Mutex<State>,
    state_changed: Condvar,
}

impl Server {
    /// Crea un servidor dueño de `router`, sin cancelación externa
    pub fn new(router: Router) -> Self {
        Self::with_context(router, Context::background())
    }

    /// Crea un servidor cuyo accept loop además observa `context`
    pub fn with_context(router: Router, context: Context) -> Self {
        Self {
            router: Arc::new(router),
            context,
            running: AtomicBool::new(false),
            state: Mutex::new(State::Idle),
            state_changed: Condvar::new(),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Dirección real del listener mientras el servidor escucha
    pub fn local_addr(&self) -> Option<SocketAddr> {
        match *self.state.lock() {
            State::Listening(addr) => Some(addr),
            _ => None,
        }
    }

    /// Espera hasta que el listener esté enlazado (útil con el puerto 0)
    ///
    /// Retorna `None` si se agota el tiempo o si el servidor ya cerró.
    pub fn wait_for_listener(&self, timeout: Duration) -> Option<SocketAddr> {
        let mut state = self.state.lock();
        self.state_changed
            .wait_while_for(&mut state, |s| *s == State::Idle, timeout);
        match *state {
            State::Listening(addr) => Some(addr),
            _ => None,
        }
    }

    /// Enlaza `address` y bloquea el thread actual en el accept loop
    ///
    /// Retorna cuando se llama a `shutdown` o cuando se cancela el contexto
    /// externo. Un error de bind es fatal y se propaga.
    ///
    /// # Ejemplo
    /// ```no_run
    /// use http11_server::router::Router;
    /// use http11_server::server::Server;
    ///
    /// let router = Router::new();
    /// router.get("/", |_req, res| {
    ///     res.write(b"Hello world")?;
    ///     Ok(())
    /// });
    ///
    /// let server = Server::new(router);
    /// server.start("127.0.0.1:8080").expect("Error al iniciar servidor");
    /// ```
    pub fn start(&self, address: &str) -> Result<Stopped, ServerError> {
        let listener = {
            let mut state = self.state.lock();
            match *state {
                State::Idle => {}
                State::Listening(_) => return Err(ServerError::AlreadyRunning),
                State::Closed => return Err(ServerError::Closed),
            }

            let listener = TcpListener::bind(address).map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })?;
            let local = listener.local_addr().map_err(|source| ServerError::Bind {
                address: address.to_string(),
                source,
            })?;

            *state = State::Listening(local);
            self.running.store(true, Ordering::Release);
            self.state_changed.notify_all();

            info!(address = %local, "servidor escuchando (un thread por conexión)");
            listener
        };

        let stopped = self.accept_loop(&listener);

        // El listener se cierra antes de publicar el estado Closed
        drop(listener);
        {
            let mut state = self.state.lock();
            *state = State::Closed;
            self.running.store(false, Ordering::Release);
            self.state_changed.notify_all();
        }

        info!(reason = ?stopped, "accept loop detenido");
        Ok(stopped)
    }

    fn accept_loop(&self, listener: &TcpListener) -> Stopped {
        loop {
            if !self.is_running() {
                return Stopped::Shutdown;
            }
            // No es atómico con accept(): tras cancelar puede entrar una conexión más
            if self.context.is_cancelled() {
                return Stopped::Cancelled;
            }

            match listener.accept() {
                Ok((stream, peer)) => {
                    if !self.is_running() {
                        debug!(%peer, "conexión recibida durante el apagado, se descarta");
                        return Stopped::Shutdown;
                    }
                    self.spawn_connection(stream, peer);
                }
                Err(e) => {
                    if !self.is_running() {
                        return Stopped::Shutdown;
                    }
                    warn!(error = %e, "error al aceptar conexión");
                }
            }
        }
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let router = Arc::clone(&self.router);
        let context = self.context.without_cancel();

        debug!(%peer, "nueva conexión (spawning thread)");

        let spawned = thread::Builder::new()
            .name(format!("conn-{}", peer))
            .spawn(move || connection::serve(stream, peer, &router, context));

        if let Err(e) = spawned {
            error!(%peer, error = %e, "no se pudo lanzar el thread de la conexión");
        }
    }

    /// Detiene el accept loop y cierra el listener
    ///
    /// Idempotente: solo la primera llamada hace la transición. Cuando
    /// retorna (en cualquier llamada), el listener ya está cerrado y una
    /// conexión nueva es rechazada. Las conexiones en vuelo siguen hasta
    /// terminar.
    pub fn shutdown(&self) {
        let mut state = self.state.lock();
        let addr = match *state {
            State::Idle => {
                *state = State::Closed;
                self.state_changed.notify_all();
                return;
            }
            State::Closed => return,
            State::Listening(addr) => addr,
        };

        let won = self
            .running
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !won {
            // Otra llamada ya está apagando: esperar a que cierre el listener
            self.state_changed
                .wait_while(&mut state, |s| *s != State::Closed);
            return;
        }
        drop(state);
        info!(address = %addr, "apagando servidor");

        // accept() no se desbloquea solo: una conexión propia lo despierta
        let target = wake_address(addr);
        self.wake_until_closed(|| TcpStream::connect_timeout(&target, WAKE_TIMEOUT).map(drop));
    }

    /// Reintenta `wake` hasta que `start` publique `State::Closed`
    ///
    /// Con `running` en false el accept loop termina en cuanto `accept()`
    /// retorne, así que basta con que un intento llegue al listener.
    fn wake_until_closed<F>(&self, mut wake: F)
    where
        F: FnMut() -> io::Result<()>,
    {
        for attempt in 1u32.. {
            let patience = match wake() {
                Ok(()) => WAKE_TIMEOUT,
                Err(e) => {
                    warn!(attempt, error = %e, "no se pudo despertar al accept loop, reintentando");
                    WAKE_RETRY
                }
            };

            let mut state = self.state.lock();
            self.state_changed
                .wait_while_for(&mut state, |s| *s != State::Closed, patience);
            if *state == State::Closed {
                return;
            }
        }
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("state", &*self.state.lock())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

/// Un listener en 0.0.0.0 / :: se alcanza por loopback
fn wake_address(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V4(ip) if ip.is_unspecified() => SocketAddr::new(Ipv4Addr::LOCALHOST.into(), addr.port()),
        IpAddr::V6(ip) if ip.is_unspecified() => SocketAddr::new(Ipv6Addr::LOCALHOST.into(), addr.port()),
        _ => addr,
    }
}
