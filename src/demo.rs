//! # Handlers de ejemplo
//! src/demo.rs
//!
//! Rutas que monta el binario:
//! - `GET /`       → HTML "Hello world"
//! - `GET /people` → lista JSON de personas

use crate::error::HandlerResult;
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use serde::Serialize;

/// Cantidad de personas que devuelve `/people`
pub const PEOPLE_COUNT: usize = 100;

const FIRST_NAMES: [&str; 8] = [
    "Ana", "Bruno", "Carla", "Diego", "Elena", "Fabián", "Gabriela", "Hugo",
];
const LAST_NAMES: [&str; 6] = ["Rojas", "Mora", "Vargas", "Jiménez", "Solís", "Araya"];

#[derive(Debug, Clone, Serialize)]
pub struct Person {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Registra las rutas de ejemplo
pub fn register(router: &Router) {
    router.get("/", hello_handler);
    router.get("/people", people_handler);
}

pub fn hello_handler(_req: &Request, res: &mut Response<'_>) -> HandlerResult {
    res.headers_mut().set("Content-Type", "text/html; charset=UTF-8");
    res.write(b"Hello world")?;
    Ok(())
}

pub fn people_handler(_req: &Request, res: &mut Response<'_>) -> HandlerResult {
    let payload = match serde_json::to_vec(&people(PEOPLE_COUNT)) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(error = %e, "no se pudo serializar /people");
            res.write_status(StatusCode::InternalServerError.as_u16());
            res.write(b"Internal Server Error")?;
            return Ok(());
        }
    };

    res.headers_mut().set("Content-Type", "application/json; charset=UTF-8");
    res.write(&payload)?;
    Ok(())
}

/// Genera `count` personas deterministas
pub fn people(count: usize) -> Vec<Person> {
    (0..count)
        .map(|i| {
            let first = FIRST_NAMES[i % FIRST_NAMES.len()];
            let last = LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()];
            Person {
                id: format!("{:08x}-0000-4000-8000-{:012x}", i, i),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{}.{}{}@example.com", first, last, i).to_lowercase(),
            }
        })
        .collect()
}
