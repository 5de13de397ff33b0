//! # Contexto de ejecución
//! src/server/context.rs
//!
//! Señal de cancelación opcional que el dueño del proceso le pasa al
//! servidor. El accept loop la consulta al inicio de cada iteración.
//!
//! Cada request recibe una copia derivada con `without_cancel()`: la
//! cancelación externa detiene el accept loop pero nunca aborta una
//! conexión que ya fue aceptada.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Contexto con una señal de cancelación opcional
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Option<Arc<AtomicBool>>,
}

/// Extremo que dispara la cancelación de un `Context`
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl Context {
    /// Contexto que nunca se cancela
    pub fn background() -> Self {
        Self::default()
    }

    /// Crea un contexto cancelable junto con su handle
    ///
    /// # Ejemplo
    /// ```
    /// use http11_server::server::Context;
    ///
    /// let (ctx, cancel) = Context::with_cancel();
    /// assert!(!ctx.is_cancelled());
    /// cancel.cancel();
    /// assert!(ctx.is_cancelled());
    /// ```
    pub fn with_cancel() -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = Self {
            cancelled: Some(Arc::clone(&flag)),
        };
        (ctx, CancelHandle { flag })
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire))
    }

    /// Copia derivada que no propaga la cancelación del padre
    pub fn without_cancel(&self) -> Self {
        Self { cancelled: None }
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }
}
