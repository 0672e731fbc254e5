//! The shared repository contracts, run against `PostgresStore` on a
//! disposable container. Needs a local Docker daemon.

use std::sync::Arc;
use std::time::Duration;

use integration_tests::contracts;
use storage_adapters::PostgresStore;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;

/// A migrated store; the container lives as long as the returned handle.
async fn store() -> (PostgresStore, ContainerAsync<Postgres>) {
    let container = Postgres::default().start().await.expect("postgres container starts");
    let host = container.get_host().await.expect("container host");
    let port = container.get_host_port_ipv4(5432).await.expect("mapped port");
    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let store = PostgresStore::connect(&url, 5, Duration::from_secs(10))
        .await
        .expect("connects to the container");
    store.migrate().await.expect("migrations apply");
    (store, container)
}

#[tokio::test]
async fn postgres_accounts_honour_the_contract() {
    let (store, _container) = store().await;
    contracts::account_contract(Arc::new(store.clone())).await;
    contracts::account_insert_matches_read(Arc::new(store)).await;
}

#[tokio::test]
async fn postgres_opportunities_honour_the_contract() {
    let (store, _container) = store().await;
    contracts::opportunity_contract(Arc::new(store)).await;
}

#[tokio::test]
async fn postgres_opportunity_insert_matches_read() {
    let (store, _container) = store().await;
    contracts::opportunity_insert_matches_read(Arc::new(store)).await;
}

#[tokio::test]
async fn postgres_applications_honour_the_contract() {
    let (store, _container) = store().await;
    contracts::application_contract(Arc::new(store.clone())).await;
    contracts::application_insert_matches_read(Arc::new(store)).await;
}
