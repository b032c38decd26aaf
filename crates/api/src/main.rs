#[tokio::main]
async fn main() {
    shelfcast_observability::init();

    let registry = shelfcast_api::stores::StoreRegistry::from_env();
    let app = shelfcast_api::app::build_app(registry);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
