//! Tests de integración para el servidor HTTP
//! tests/integration_test.rs
//!
//! Cada test levanta su propio `Server` en un puerto efímero y le habla por
//! TCP, así que no hace falta tener el binario corriendo.

use http11_server::demo;
use http11_server::router::Router;
use http11_server::server::{Server, Stopped};
use http11_server::ServerError;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Servidor corriendo en un thread aparte
struct Running {
    server: Arc<Server>,
    addr: SocketAddr,
    handle: thread::JoinHandle<Result<Stopped, ServerError>>,
}

impl Running {
    fn start(router: Router) -> Self {
        let server = Arc::new(Server::new(router));
        let handle = thread::spawn({
            let server = Arc::clone(&server);
            move || server.start("127.0.0.1:0")
        });
        let addr = server
            .wait_for_listener(Duration::from_secs(5))
            .expect("el servidor no llegó a escuchar");
        Self { server, addr, handle }
    }

    fn stop(self) -> Stopped {
        self.server.shutdown();
        self.handle.join().unwrap().unwrap()
    }
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_raw(addr: SocketAddr, raw: &[u8]) -> Result<String, Box<dyn std::error::Error>> {
    let mut stream = TcpStream::connect(addr)?;

    // Configurar timeouts
    stream.set_read_timeout(Some(Duration::from_secs(5)))?;
    stream.set_write_timeout(Some(Duration::from_secs(5)))?;

    stream.write_all(raw)?;
    stream.flush()?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;
    Ok(String::from_utf8(response)?)
}

fn send_request(addr: SocketAddr, method: &str, path: &str) -> String {
    let request = format!("{} {} HTTP/1.1\r\nHost: localhost\r\n\r\n", method, path);
    send_raw(addr, request.as_bytes()).expect("Failed to send request")
}

/// Helper: extrae el body de una response HTTP
fn extract_body(response: &str) -> &str {
    match response.find("\r\n\r\n") {
        Some(pos) => &response[pos + 4..],
        None => "",
    }
}

fn hello_router() -> Router {
    let router = Router::new();
    router.get("/people", |_req, res| {
        res.write(b"Hello World")?;
        Ok(())
    });
    router
}

#[test]
fn test_people_scenario() {
    let running = Running::start(hello_router());

    let response = send_raw(running.addr, b"GET /people HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", response);
    assert_eq!(extract_body(&response), "Hello World");
    assert_eq!(running.stop(), Stopped::Shutdown);
}

#[test]
fn test_not_found() {
    let running = Running::start(hello_router());

    let response = send_request(running.addr, "GET", "/nonexistent");
    assert!(response.starts_with("HTTP/1.1 404 Not Found"));
    assert!(!extract_body(&response).is_empty());

    let response = send_request(running.addr, "POST", "/people");
    assert!(response.starts_with("HTTP/1.1 404 Not Found"));

    running.stop();
}

#[test]
fn test_lowercase_method_is_routed() {
    let running = Running::start(hello_router());

    let response = send_request(running.addr, "get", "/people");
    assert!(response.starts_with("HTTP/1.1 200 OK"));

    running.stop();
}

#[test]
fn test_bad_request() {
    let running = Running::start(hello_router());

    let response = send_raw(running.addr, b"NONSENSE\r\n\r\n").unwrap();
    assert!(response.starts_with("HTTP/1.1 400 Bad Request"));

    running.stop();
}

#[test]
fn test_status_code_fallback_over_the_wire() {
    let router = Router::new();
    router.get("/weird", |_req, res| {
        res.write_status(999);
        res.write(b"x")?;
        Ok(())
    });
    let running = Running::start(router);

    let response = send_request(running.addr, "GET", "/weird");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert_eq!(extract_body(&response), "x");

    running.stop();
}

#[test]
fn test_multiple_writes_single_status_line() {
    let router = Router::new();
    router.get("/stream", |_req, res| {
        res.write_status(202);
        for chunk in ["uno,", "dos,", "tres"] {
            res.write(chunk.as_bytes())?;
        }
        Ok(())
    });
    let running = Running::start(router);

    let response = send_request(running.addr, "GET", "/stream");
    assert!(response.starts_with("HTTP/1.1 202 Accepted\r\n"));
    assert_eq!(response.matches("HTTP/1.1").count(), 1);
    assert_eq!(extract_body(&response), "uno,dos,tres");

    running.stop();
}

#[test]
fn test_handler_error_becomes_500() {
    let router = Router::new();
    router.get("/boom", |_req, _res| Err("boom".into()));
    let running = Running::start(router);

    let response = send_request(running.addr, "GET", "/boom");
    assert!(response.starts_with("HTTP/1.1 500 Internal Server Error"));

    running.stop();
}

#[test]
fn test_request_headers_reach_handler() {
    let router = Router::new();
    router.get("/echo", |req, res| {
        let body = format!(
            "{}|{}|{}",
            req.host().unwrap_or("-"),
            req.header("X-Token").unwrap_or("-"),
            req.query_param("name").unwrap_or_default()
        );
        res.write(body.as_bytes())?;
        Ok(())
    });
    let running = Running::start(router);

    let response = send_raw(
        running.addr,
        b"GET /echo?name=Ana%20Mora HTTP/1.1\r\nHost: api.local\r\nX-Token: abc\r\n\r\n",
    )
    .unwrap();
    assert_eq!(extract_body(&response), "api.local|abc|Ana Mora");

    running.stop();
}

#[test]
fn test_concurrent_clients() {
    let router = Router::new();
    router.get("/slow", |_req, res| {
        thread::sleep(Duration::from_millis(100));
        res.write(b"done")?;
        Ok(())
    });
    let running = Running::start(router);
    let addr = running.addr;

    let clients: Vec<_> = (0..8)
        .map(|_| thread::spawn(move || send_request(addr, "GET", "/slow")))
        .collect();

    for client in clients {
        let response = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.1 200 OK"));
        assert_eq!(extract_body(&response), "done");
    }

    running.stop();
}

#[test]
fn test_connection_refused_after_shutdown() {
    let running = Running::start(hello_router());
    let addr = running.addr;

    assert!(send_request(addr, "GET", "/people").contains("Hello World"));
    running.stop();

    assert!(
        TcpStream::connect(addr).is_err(),
        "no request shall be handled after shutdown"
    );
}

#[test]
fn test_demo_routes() {
    let router = Router::new();
    demo::register(&router);
    let running = Running::start(router);

    let response = send_request(running.addr, "GET", "/");
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert_eq!(extract_body(&response), "Hello world");

    let response = send_request(running.addr, "GET", "/people");
    assert!(response.contains("Content-Type: application/json"));
    let people: serde_json::Value = serde_json::from_str(extract_body(&response)).unwrap();
    assert_eq!(people.as_array().unwrap().len(), demo::PEOPLE_COUNT);

    running.stop();
}
