//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Tabla exacta (método, path) → handler.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! - El path se compara como string exacto: sin normalizar, sin
//!   parámetros, sin comodines.
//! - Registrar dos veces el mismo (método, path) reemplaza el handler.
//! - Si no hay handler se responde 404 con un body fijo; eso no es un error
//!   del router.
//!
//! Cada servidor es dueño de su propio `Router` (no hay estado global), y
//! lo comparte entre conexiones a través de un `Arc`.

use crate::error::HandlerResult;
use crate::http::{Method, Request, Response, StatusCode};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler registrado
///
/// Recibe el request y escribe sobre la response. Un `Err` llega a la capa
/// de conexión, que decide si todavía puede responder 500.
pub type Handler = Arc<dyn Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync>;

/// Body fijo para rutas inexistentes
pub const NOT_FOUND_BODY: &[u8] = b"Not found";

type RoutePaths = HashMap<String, Handler>;

/// Router que mapea (método, path) a handlers
#[derive(Default)]
pub struct Router {
    paths: RwLock<HashMap<Method, RoutePaths>>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un handler para (método, path)
    ///
    /// # Ejemplo
    /// ```
    /// use http11_server::http::Method;
    /// use http11_server::router::Router;
    ///
    /// let router = Router::new();
    /// router.handle(Method::GET, "/hello", |_req, res| {
    ///     res.write(b"Hello")?;
    ///     Ok(())
    /// });
    /// assert_eq!(router.len(), 1);
    /// ```
    pub fn handle<F>(&self, method: Method, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.paths
            .write()
            .entry(method)
            .or_default()
            .insert(path.to_string(), Arc::new(handler));
    }

    pub fn get<F>(&self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::GET, path, handler);
    }

    pub fn post<F>(&self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::POST, path, handler);
    }

    pub fn put<F>(&self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::PUT, path, handler);
    }

    pub fn delete<F>(&self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::DELETE, path, handler);
    }

    pub fn patch<F>(&self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::PATCH, path, handler);
    }

    pub fn head<F>(&self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::HEAD, path, handler);
    }

    pub fn options<F>(&self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::OPTIONS, path, handler);
    }

    pub fn connect<F>(&self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::CONNECT, path, handler);
    }

    pub fn trace<F>(&self, path: &str, handler: F)
    where
        F: Fn(&Request, &mut Response<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handle(Method::TRACE, path, handler);
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// Sin handler responde 404 y retorna el resultado de esa escritura.
    /// Con handler retorna exactamente lo que el handler retorne.
    pub fn route(&self, request: &Request, response: &mut Response<'_>) -> HandlerResult {
        // Se clona el Arc para no ejecutar el handler con el lock tomado
        let handler = self
            .paths
            .read()
            .get(request.method())
            .and_then(|routes| routes.get(request.path()))
            .cloned();

        match handler {
            Some(handler) => handler(request, response),
            None => {
                response.write_status(StatusCode::NotFound.as_u16());
                response.write(NOT_FOUND_BODY)?;
                Ok(())
            }
        }
    }

    /// Cantidad de rutas registradas entre todos los métodos
    pub fn len(&self) -> usize {
        self.paths.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let paths = self.paths.read();
        let mut routes: Vec<String> = paths
            .iter()
            .flat_map(|(method, routes)| routes.keys().map(move |path| format!("{} {}", method, path)))
            .collect();
        routes.sort();
        f.debug_struct("Router").field("routes", &routes).finish()
    }
}
