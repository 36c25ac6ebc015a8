mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod transaction;

use actix_web::{App, HttpServer, web};
use clap::Parser;
use dotenvy::dotenv;
use log::info;

use api::AppState;
use blockchain::Ledger;
use config::Config;
use network::PeerClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config = Config::parse();
    let node_id = config.node_id();

    info!(
        "⛓️ Starting ledger node {node_id} at http://{}:{}",
        config.host, config.port
    );

    let state = web::Data::new(AppState::new(
        Ledger::default(),
        node_id,
        PeerClient::new(config.peer_timeout()),
    ));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
