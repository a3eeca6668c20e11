// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::sync::Arc;

use anyhow::Result;
use tokio::signal;

use rag_nlp_node::{
    api,
    config::NodeConfig,
    pipeline::NlpPipeline,
    providers::{HttpCompletionClient, HttpEmbeddingClient, HttpRerankClient},
    vector::StoreHandle,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    dotenv::dotenv().ok();
    let config = NodeConfig::from_env();

    tracing::info!(
        dim = config.embedding_dim,
        data_dir = %config.data_dir.display(),
        "starting RAG NLP node"
    );

    let store = StoreHandle::initialize(config.embedding_dim, &config.data_dir);

    let pipeline = Arc::new(NlpPipeline::new(
        store.clone(),
        Arc::new(HttpEmbeddingClient::new(&config.providers)),
        Arc::new(HttpRerankClient::new(&config.providers)),
        Arc::new(HttpCompletionClient::new(&config.providers)),
    ));

    let shutdown = async {
        let _ = signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
    };

    api::start_server(config.bind_addr, pipeline, shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    // Final persist before exit
    store.save().await?;
    tracing::info!("vector store saved, exiting");

    Ok(())
}
