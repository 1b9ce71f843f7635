//! # HTTP Surface Tests
//!
//! Runs the gateway on a real socket and talks to it with a real HTTP client,
//! the way the browser page and other deployments do.

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use cd_01_state_store::{DocumentStore, MemoryDocumentStore, StateStoreClient};
    use cd_02_draw_engine::test_utils::ContendedStore;
    use cd_02_draw_engine::{DrawEngine, ResetOperation, RetryPolicy};
    use cd_03_api_gateway::{ApiGatewayService, AppState, GatewayConfig, LotteryMetrics};
    use serde_json::{json, Value};
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    const SECRET: &str = "12345678";

    struct Running {
        base: String,
        stop: oneshot::Sender<()>,
        server: JoinHandle<()>,
    }

    impl Running {
        async fn shutdown(self) {
            let _ = self.stop.send(());
            self.server.await.unwrap();
        }
    }

    async fn start(store: Arc<dyn DocumentStore>, policy: RetryPolicy) -> Running {
        let client = StateStoreClient::with_default_keys(store);
        let engine = DrawEngine::new(client.clone(), policy).with_seed(21);
        let reset = ResetOperation::new(client.clone(), SECRET);
        let state = AppState::new(client, engine, reset, Arc::new(LotteryMetrics::new()));
        let service = ApiGatewayService::new(GatewayConfig::default(), state).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();

        let server = tokio::spawn(async move {
            service
                .serve_on(listener, async move {
                    let _ = stopped.await;
                })
                .await
                .unwrap();
        });

        Running {
            base: format!("http://{}", addr),
            stop,
            server,
        }
    }

    #[tokio::test]
    async fn test_browser_client_round_trip() {
        let running = start(Arc::new(MemoryDocumentStore::new()), RetryPolicy::immediate(3)).await;
        let http = reqwest::Client::new();
        let functions = format!("{}/.netlify/functions", running.base);

        let response = http
            .post(format!("{}/config", functions))
            .json(&json!({ "totalNumbers": "12" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let response = http
            .post(format!("{}/draw", functions))
            .json(&json!({ "classNumber": "5B" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let drawn: Value = response.json().await.unwrap();
        assert_eq!(drawn["success"], true);
        assert_eq!(drawn["totalNumbers"], 12);

        let state: Value = http
            .get(format!("{}/state", functions))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(state["state"]["drawnNumbers"], json!([drawn["number"]]));
        assert_eq!(state["state"]["participants"][0]["classIdentifier"], "5B");
        assert_eq!(state["config"]["isLocked"], true);

        let response = http
            .post(format!("{}/reset", functions))
            .json(&json!({ "password": SECRET }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);

        let state: Value = http
            .get(format!("{}/api/state", running.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(state["state"]["drawnNumbers"], json!([]));
        assert_eq!(state["config"]["isLocked"], false);

        running.shutdown().await;
    }

    #[tokio::test]
    async fn test_wrong_method_and_preflight() {
        let running = start(Arc::new(MemoryDocumentStore::new()), RetryPolicy::immediate(3)).await;
        let http = reqwest::Client::new();

        let response = http
            .get(format!("{}/api/draw", running.base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 405);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Method not allowed");

        let response = http
            .request(reqwest::Method::OPTIONS, format!("{}/api/draw", running.base))
            .header("origin", "https://classroom.example")
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type")
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );

        running.shutdown().await;
    }

    #[tokio::test]
    async fn test_contention_surfaces_as_service_unavailable() {
        let contended = Arc::new(ContendedStore::new(true));
        contended.rival_after_every_read();
        let running = start(contended.clone(), RetryPolicy::immediate(2)).await;
        let http = reqwest::Client::new();

        let response = http
            .post(format!("{}/api/draw", running.base))
            .json(&json!({ "classIdentifier": "8D" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 503);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "MAX_RETRIES_EXCEEDED");
        assert_eq!(contended.writes(), 0);

        let metrics: Value = http
            .get(format!("{}/metrics", running.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(metrics["draws"]["contention_exhausted"], 1);

        running.shutdown().await;
    }

    #[tokio::test]
    async fn test_parallel_http_draws_are_unique() {
        let running = start(Arc::new(MemoryDocumentStore::new()), RetryPolicy::immediate(10)).await;
        let http = reqwest::Client::new();

        let requests = (0..10).map(|i| {
            let http = http.clone();
            let url = format!("{}/api/draw", running.base);
            async move {
                let body: Value = http
                    .post(url)
                    .json(&json!({ "classIdentifier": format!("c{}", i) }))
                    .send()
                    .await
                    .unwrap()
                    .json()
                    .await
                    .unwrap();
                body["number"].as_u64().unwrap()
            }
        });

        let mut numbers = futures::future::join_all(requests).await;
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), 10);

        running.shutdown().await;
    }
}
