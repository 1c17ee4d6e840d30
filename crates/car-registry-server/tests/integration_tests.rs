//! Integration tests for the car-registry-server binary.
//!
//! Each test spawns a fresh server on an auto-assigned port, so every test
//! starts from the three seed records.

use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;

const PORT_PREFIX: &str = "CAR_REGISTRY_PORT=";

struct ServerProcess {
    child: tokio::process::Child,
    base: String,
    client: reqwest::Client,
    stdout_drain: Option<tokio::task::JoinHandle<()>>,
}

impl ServerProcess {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed");
        into_parts(response).await
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("POST failed");
        into_parts(response).await
    }

    async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .expect("PUT failed");
        into_parts(response).await
    }

    async fn delete(&self, path: &str) -> (u16, Value) {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE failed");
        into_parts(response).await
    }

    async fn car_count(&self) -> usize {
        let (_, cars) = self.get("/cars").await;
        cars.as_array().expect("car list").len()
    }

    async fn stop(mut self) {
        if let Some(drain) = self.stdout_drain.take() {
            drain.abort();
        }
        let _ = self.child.kill().await;
        let _ = self.child.wait().await;
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        if let Some(drain) = self.stdout_drain.take() {
            drain.abort();
        }
        let _ = self.child.start_kill();
    }
}

async fn into_parts(response: reqwest::Response) -> (u16, Value) {
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

fn server_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_car-registry-server"))
}

/// Poll `/health` until the server answers.
async fn wait_for_server(client: &reqwest::Client, base: &str, timeout_secs: u64) -> bool {
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_secs(timeout_secs) {
        if let Ok(response) = client
            .get(format!("{}/health", base))
            .timeout(Duration::from_secs(2))
            .send()
            .await
        {
            if let Ok(json) = response.json::<Value>().await {
                if json.get("status").and_then(|v| v.as_str()) == Some("ok") {
                    return true;
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    false
}

/// Start the server binary and wait until `/health` is ready.
async fn start_server() -> ServerProcess {
    let mut child = tokio::process::Command::new(server_binary())
        .arg("--host")
        .arg("127.0.0.1")
        .arg("--port")
        .arg("0")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("failed to spawn car-registry-server");

    let stdout = child.stdout.take().expect("failed to capture stdout");
    let mut lines = tokio::io::BufReader::new(stdout).lines();

    let mut port: Option<u16> = None;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(20);
    while tokio::time::Instant::now() < deadline {
        match tokio::time::timeout(Duration::from_millis(250), lines.next_line()).await {
            Ok(Ok(Some(line))) => {
                if let Some(value) = line.strip_prefix(PORT_PREFIX) {
                    port = Some(value.trim().parse().expect("invalid port line"));
                    break;
                }
            }
            Ok(Ok(None)) => break,
            Ok(Err(err)) => panic!("failed to read server stdout: {err}"),
            Err(_) => continue,
        }
    }

    let port = port.expect("port line not emitted by car-registry-server");
    let base = format!("http://127.0.0.1:{}", port);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build client");
    assert!(
        wait_for_server(&client, &base, 15).await,
        "server failed health check on port {port}"
    );

    let stdout_drain =
        tokio::spawn(async move { while let Ok(Some(_)) = lines.next_line().await {} });

    ServerProcess {
        child,
        base,
        client,
        stdout_drain: Some(stdout_drain),
    }
}

fn tesla() -> Value {
    json!({"make": "Tesla", "model": "Model3", "year": 2022, "color": "White", "price": 40000})
}

#[tokio::test]
async fn test_root_welcome() {
    let server = start_server().await;
    let response = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.text().await.unwrap(),
        "Welcome to the Car Dealership API!"
    );
    server.stop().await;
}

#[tokio::test]
async fn test_list_seeded_cars() {
    let server = start_server().await;
    let (status, cars) = server.get("/cars").await;
    assert_eq!(status, 200);
    assert_eq!(
        cars,
        json!([
            {"id": 1, "make": "Toyota", "model": "Camry", "year": 2020, "color": "Blue", "price": 25000},
            {"id": 2, "make": "Honda", "model": "Civic", "year": 2019, "color": "Red", "price": 22000},
            {"id": 3, "make": "Ford", "model": "Mustang", "year": 2021, "color": "Black", "price": 35000}
        ])
    );
    server.stop().await;
}

#[tokio::test]
async fn test_get_by_id() {
    let server = start_server().await;

    let (status, car) = server.get("/cars/2").await;
    assert_eq!(status, 200);
    assert_eq!(car["make"], "Honda");
    assert_eq!(car["model"], "Civic");

    let (status, body) = server.get("/cars/99").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Car not found"}));

    server.stop().await;
}

#[tokio::test]
async fn test_create_car() {
    let server = start_server().await;

    let (status, car) = server.post("/cars", tesla()).await;
    assert_eq!(status, 201);
    assert_eq!(car["id"], 4);
    assert_eq!(car["make"], "Tesla");

    let (_, cars) = server.get("/cars").await;
    assert_eq!(cars.as_array().unwrap().len(), 4);
    assert_eq!(cars[3], car);

    server.stop().await;
}

#[tokio::test]
async fn test_create_missing_field() {
    let server = start_server().await;

    let mut body = tesla();
    body.as_object_mut().unwrap().remove("price");
    let (status, error) = server.post("/cars", body).await;
    assert_eq!(status, 400);
    assert_eq!(
        error,
        json!({"error": "All fields required: make, model, year, color, price"})
    );
    assert_eq!(server.car_count().await, 3);

    let response = server.client.post(server.url("/cars")).send().await.unwrap();
    assert_eq!(response.status(), 400);

    server.stop().await;
}

#[tokio::test]
async fn test_update_price_only() {
    let server = start_server().await;

    let (status, car) = server.put("/cars/1", json!({"price": 26000})).await;
    assert_eq!(status, 200);
    assert_eq!(
        car,
        json!({"id": 1, "make": "Toyota", "model": "Camry", "year": 2020, "color": "Blue", "price": 26000})
    );

    let (_, stored) = server.get("/cars/1").await;
    assert_eq!(stored, car);

    server.stop().await;
}

#[tokio::test]
async fn test_update_errors() {
    let server = start_server().await;

    let (status, body) = server.put("/cars/99", json!({"price": 1})).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"error": "Car not found"}));

    let (status, body) = server.put("/cars/1", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({"error": "No data provided"}));

    server.stop().await;
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let server = start_server().await;

    let (status, body) = server.delete("/cars/1").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Car deleted successfully"}));
    assert_eq!(server.car_count().await, 2);

    let (status, body) = server.delete("/cars/1").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Car deleted successfully"}));
    assert_eq!(server.car_count().await, 2);

    server.stop().await;
}

#[tokio::test]
async fn test_search() {
    let server = start_server().await;

    let (status, cars) = server.get("/cars/search?make=honda").await;
    assert_eq!(status, 200);
    assert_eq!(cars.as_array().unwrap().len(), 1);
    assert_eq!(cars[0]["model"], "Civic");

    let (_, cars) = server.get("/cars/search?min_price=0").await;
    assert_eq!(cars.as_array().unwrap().len(), 3);

    let (_, cars) = server.get("/cars/search?min_price=23000&max_price=40000").await;
    let ids: Vec<i64> = cars
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 3]);

    let (status, cars) = server.get("/cars/search?make=lada").await;
    assert_eq!(status, 200);
    assert_eq!(cars, json!([]));

    server.stop().await;
}

#[tokio::test]
async fn test_search_repeated_key() {
    let server = start_server().await;

    let (status, cars) = server.get("/cars/search?make=honda&make=ford").await;
    assert_eq!(status, 200);
    assert_eq!(cars.as_array().unwrap().len(), 1);
    assert_eq!(cars[0]["model"], "Civic");

    server.stop().await;
}

#[tokio::test]
async fn test_delete_out_of_range_id() {
    let server = start_server().await;

    let (status, body) = server.delete("/cars/99999999999999999999999").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"message": "Car deleted successfully"}));
    assert_eq!(server.car_count().await, 3);

    server.stop().await;
}

#[tokio::test]
async fn test_count_based_ids_collide_after_delete() {
    let server = start_server().await;

    server.delete("/cars/2").await;
    let (status, car) = server.post("/cars", tesla()).await;
    assert_eq!(status, 201);
    assert_eq!(car["id"], 3);

    let (_, cars) = server.get("/cars").await;
    let threes: Vec<&str> = cars
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["id"] == 3)
        .map(|c| c["make"].as_str().unwrap())
        .collect();
    assert_eq!(threes, vec!["Ford", "Tesla"]);

    let (_, first) = server.get("/cars/3").await;
    assert_eq!(first["make"], "Ford");

    server.stop().await;
}
