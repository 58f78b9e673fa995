use blocklist_server::{
    config::Config, domain::blocklist::BlocklistService, server::Server, telemetry,
};

// Helper function to spawn a test server on a random port
pub async fn spawn_server() -> String {
    telemetry::init_tracing();

    let config = {
        let mut config = Config::load().unwrap();
        config.server.host = "localhost".to_string();
        // Use a random OS port
        config.server.port = 0;
        config
    };

    let server = Server::new(BlocklistService::in_memory(), &config.server)
        .await
        .unwrap();

    let port = server.port();
    tokio::spawn(async move {
        server.run().await.expect("failed to run server");
    });

    format!("http://{}:{}", config.server.host, port)
}
