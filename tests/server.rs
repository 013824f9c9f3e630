mod common;

use std::sync::Arc;

use tokio::net::TcpListener;

use rsc_router::config::TimeoutConfig;
use rsc_router::handler::Handler;
use rsc_router::{RscServer, Shutdown};

use common::{server_config, site_loader, site_router};

#[tokio::test]
async fn test_live_server_dispatch() {
    let handler = Handler::<()>::builder(&server_config(false), site_router(site_loader()))
        .build()
        .unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = RscServer::new(Arc::new(handler), &TimeoutConfig::default());
    let task = tokio::spawn(server.run(listener, shutdown.clone()));

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let res = client.get(format!("{base}/RSC/index.txt")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "text/x-component");
    assert!(res.headers().contains_key("x-request-id"));
    let body = res.text().await.unwrap();
    assert_eq!(body.lines().count(), 3);

    let res = client
        .get(format!("{base}/RSC/index.txt"))
        .header("x-request-id", "fixed-id")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "fixed-id");

    let res = client.get(format!("{base}/favicon.ico")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = client.put(format!("{base}/RSC/index.txt")).send().await.unwrap();
    assert_eq!(res.status(), 405);

    let res = client.get(format!("{base}/RSC/INPUT123")).send().await.unwrap();
    assert_eq!(res.status(), 400);

    shutdown.trigger();
    task.await.unwrap().unwrap();
}
