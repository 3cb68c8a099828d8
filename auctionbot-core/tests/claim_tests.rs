// File: auctionbot-core/tests/claim_tests.rs

use std::sync::Arc;

use auctionbot_common::models::{ClaimOutcome, SettingKey};
use auctionbot_common::traits::repository_traits::{
    CatalogRepository, ClaimRepository, PointsLedger, ReOfferRepository, UserRepository,
};
use auctionbot_core::db::Database;
use auctionbot_core::repositories::{
    SqliteCatalogRepository, SqliteClaimRepository, SqliteSettingsRepository, SqliteUserRepository,
};
use auctionbot_core::services::AuctionService;
use auctionbot_core::test_utils::helpers::*;
use auctionbot_core::Error;
use chrono::{Duration, Utc};

#[tokio::test]
async fn test_second_claim_is_already_claimed_and_pays_once() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let user = app.user(1).await?;
    let item = app.catalog.add_item("a.jpg", None).await?;

    assert_eq!(app.claims.attempt_claim(user, item.item_id, 10).await?, ClaimOutcome::Won { reward: 10 });
    assert_eq!(app.claims.attempt_claim(user, item.item_id, 10).await?, ClaimOutcome::AlreadyClaimed);
    assert_eq!(app.points.balance(user).await?, 10);
    assert_eq!(app.claims.claim_count(item.item_id).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_claim_by_unknown_user_leaves_nothing_behind() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let item = app.catalog.add_item("a.jpg", None).await?;

    let result = app.claims.attempt_claim(404, item.item_id, 10).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
    assert_eq!(app.claims.claim_count(item.item_id).await?, 0);
    Ok(())
}

/// Items [A, B], cap 3, reward 10.
#[tokio::test]
async fn test_primary_round_scenario() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let a = app.catalog.add_item("a.jpg", None).await?;
    app.catalog.add_item("b.jpg", None).await?;
    let admin = app.admin_user(99).await?;
    for id in 1..=4 {
        app.user(id).await?;
    }

    assert_eq!(app.auction.claim(1, a.item_id).await?, ClaimOutcome::Won { reward: 10 });
    assert_eq!(app.points.balance(1).await?, 10);

    assert_eq!(app.auction.claim(1, a.item_id).await?, ClaimOutcome::AlreadyClaimed);
    assert_eq!(app.points.balance(1).await?, 10);

    assert_eq!(app.auction.claim(2, a.item_id).await?, ClaimOutcome::Won { reward: 10 });
    assert_eq!(app.auction.claim(3, a.item_id).await?, ClaimOutcome::Won { reward: 10 });
    assert_eq!(app.auction.claim(4, a.item_id).await?, ClaimOutcome::CapReached);
    assert_eq!(app.points.balance(4).await?, 0);

    // Cap wins over duplicate once the item is full.
    assert_eq!(app.auction.claim(1, a.item_id).await?, ClaimOutcome::CapReached);

    assert!(app.re_offers.open(admin, a.item_id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_claim_on_missing_item_is_not_found() -> Result<(), Error> {
    let app = TestApp::new().await?;
    app.user(1).await?;
    assert!(matches!(app.auction.claim(1, 12345).await, Err(Error::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn test_cap_follows_current_setting() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let item = app.catalog.add_item("a.jpg", None).await?;
    app.set(SettingKey::WinnersPerItem, 1).await?;
    app.set(SettingKey::RewardPerWin, 25).await?;
    app.user(1).await?;
    app.user(2).await?;

    assert_eq!(app.auction.claim(1, item.item_id).await?, ClaimOutcome::Won { reward: 25 });
    assert_eq!(app.auction.claim(2, item.item_id).await?, ClaimOutcome::CapReached);
    assert_eq!(app.points.balance(1).await?, 25);
    Ok(())
}

#[tokio::test]
async fn test_claimed_images_join() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let admin = app.admin_user(99).await?;
    let user = app.user(1).await?;
    let a = app.catalog.add_item("a.jpg", None).await?;
    let b = app.catalog.add_item("b.jpg", None).await?;
    app.catalog.add_item("c.jpg", None).await?;

    app.auction.claim(user, a.item_id).await?;
    app.auction.claim(user, b.item_id).await?;

    let mut images = app.claims.claimed_images_for(user).await?;
    images.sort();
    assert_eq!(images, vec!["a.jpg".to_string(), "b.jpg".to_string()]);

    let claims = app.claims.claims_for_item(a.item_id).await?;
    assert_eq!(claims.len(), 1);
    assert_eq!(claims[0].user_id, user);

    // A re-offer win shows up under the same image name.
    let ro = app
        .re_offer_repo
        .open(b.item_id, 3, 0, Duration::minutes(5), Utc::now())
        .await?
        .expect("b has one claim");
    assert!(app.re_offers.open(admin, 12345).await.is_err());
    app.re_offer_repo.enter(user, ro.item_id, 10, Utc::now()).await?;
    assert_eq!(app.claims.claimed_images_for(user).await?.len(), 3);
    Ok(())
}

/// Many users racing on one item over a real file database never exceed the cap.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_claims_respect_cap() -> Result<(), Error> {
    let dir = tempfile::tempdir()?;
    let db = Database::new(&dir.path().join("race.db").to_string_lossy()).await?;
    db.migrate().await?;

    let pool = db.pool().clone();
    let users = SqliteUserRepository::new(pool.clone());
    let catalog = Arc::new(SqliteCatalogRepository::new(pool.clone()));
    let claims = Arc::new(SqliteClaimRepository::new(pool.clone()));
    let settings = Arc::new(SqliteSettingsRepository::new(pool.clone()));
    let auction = Arc::new(AuctionService::new(settings, catalog.clone(), claims.clone()));

    let item = catalog.add_item("hot.jpg", None).await?;
    for id in 1..=24 {
        users.register(id, None).await?;
    }

    let mut handles = Vec::new();
    for id in 1..=24 {
        let auction = auction.clone();
        let item_id = item.item_id;
        handles.push(tokio::spawn(async move { auction.claim(id, item_id).await }));
    }

    let mut won = 0;
    for h in handles {
        match h.await?? {
            ClaimOutcome::Won { .. } => won += 1,
            ClaimOutcome::CapReached => {}
            ClaimOutcome::AlreadyClaimed => panic!("every user claims once"),
        }
    }

    assert_eq!(won, 3);
    assert_eq!(claims.claim_count(item.item_id).await?, 3);
    Ok(())
}
