//! # Headers HTTP
//! src/http/header.rs
//!
//! Contenedor nombre → valor compartido por `Request` y `Response`.
//! Un solo valor por nombre: la última escritura gana. El orden de
//! inserción no se conserva.

use std::collections::HashMap;

/// Mapa de headers con un único valor por nombre
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    entries: HashMap<String, String>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asigna un header, sobrescribiendo el valor anterior si existía
    ///
    /// # Ejemplo
    /// ```
    /// use http11_server::http::Header;
    ///
    /// let mut headers = Header::new();
    /// headers.set("Content-Type", "text/plain");
    /// headers.set("Content-Type", "application/json");
    /// assert_eq!(headers.get("Content-Type"), Some("application/json"));
    /// ```
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(name.into(), value.into());
    }

    /// Obtiene el valor de un header (comparación exacta del nombre)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Elimina un header y retorna su valor previo
    pub fn del(&mut self, name: &str) -> Option<String> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Itera los pares (nombre, valor) en orden arbitrario
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
