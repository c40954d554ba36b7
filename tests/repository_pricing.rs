mod common;

use sqlx::PgPool;
use std::sync::Arc;
use domain_search::domain::repositories::{ExchangeRateRepository, PricingRepository};
use domain_search::infrastructure::persistence::{PgExchangeRateRepository, PgPricingRepository};

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_offers_ordered_by_display_order(pool: PgPool) {
    let second = common::create_registrar(&pool, "Second", 20, true).await;
    let first = common::create_registrar(&pool, "First", 10, true).await;
    common::create_price(&pool, second, ".io", 25.0, "USD", true).await;
    common::create_price(&pool, first, ".io", 30.0, "EUR", true).await;

    let repo = PgPricingRepository::new(Arc::new(pool));
    let offers = repo.list_active_offers_by_zone(".io").await.unwrap();

    assert_eq!(offers.len(), 2);
    assert_eq!(offers[0].name, "First");
    assert_eq!(offers[0].currency, "EUR");
    assert_eq!(
        offers[0].register_url("coffee.io").as_deref(),
        Some("https://first.example/buy?d=coffee.io")
    );
    assert_eq!(offers[1].name, "Second");
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_inactive_offers_and_registrars_are_excluded(pool: PgPool) {
    let active = common::create_registrar(&pool, "Active", 1, true).await;
    let retired = common::create_registrar(&pool, "Retired", 2, false).await;
    common::create_price(&pool, active, ".com", 10.0, "USD", true).await;
    common::create_price(&pool, active, ".com", 8.0, "USD", false).await;
    common::create_price(&pool, retired, ".com", 5.0, "USD", true).await;
    common::create_price(&pool, active, ".net", 12.0, "USD", true).await;

    let repo = PgPricingRepository::new(Arc::new(pool));
    let offers = repo.list_active_offers_by_zone(".com").await.unwrap();

    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].registrar_id, active);
    assert_eq!(offers[0].price, 10.0);

    assert_eq!(repo.count_active_registrars().await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_unknown_zone_has_no_offers(pool: PgPool) {
    let repo = PgPricingRepository::new(Arc::new(pool));

    let offers = repo.list_active_offers_by_zone(".nowhere").await.unwrap();

    assert!(offers.is_empty());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_exchange_rates_for_base(pool: PgPool) {
    sqlx::query(
        "INSERT INTO exchange_rates (currency, base_currency, rate) VALUES
         ('EUR', 'USD', 1.1), ('RUB', 'USD', 0.011), ('USD', 'EUR', 0.9)",
    )
    .execute(&pool)
    .await
    .unwrap();

    let repo = PgExchangeRateRepository::new(Arc::new(pool));
    let rates = repo.list_rates("usd").await.unwrap();

    assert_eq!(rates.len(), 2);
    assert_eq!(rates[0].currency, "EUR");
    assert_eq!(rates[0].rate, 1.1);
    assert_eq!(rates[1].currency, "RUB");
}
