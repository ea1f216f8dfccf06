//! Crate-level test helpers and end-to-end pipeline tests.

use axum::Router;
use tokio::net::TcpListener;


/// Serve `app` on an ephemeral local port and return its base URL.
pub(crate) async fn spawn_mock(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
