// File: auctionbot-core/tests/broadcast_tests.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use tokio::sync::watch;

use auctionbot_common::models::{ActionToken, DrawOutcome, SettingKey};
use auctionbot_common::traits::delivery_traits::Obscurer;
use auctionbot_common::traits::repository_traits::{CatalogRepository, ClaimRepository};
use auctionbot_core::tasks::{spawn_broadcast_task, BroadcastCycle};
use auctionbot_core::test_utils::helpers::*;
use auctionbot_core::Error;

mock! {
    pub Renderer {}

    #[async_trait]
    impl Obscurer for Renderer {
        async fn obscure(&self, image: &str) -> Result<PathBuf, Error>;
    }
}

fn hidden(image: &str) -> PathBuf {
    PathBuf::from("hidden_img").join(image)
}

fn renderer() -> MockRenderer {
    let mut mock = MockRenderer::new();
    mock.expect_obscure().returning(|image| Ok(hidden(image)));
    mock
}

fn cycle_with(app: &TestApp, obscurer: MockRenderer) -> BroadcastCycle {
    BroadcastCycle::new(
        app.settings.clone(),
        app.catalog.clone(),
        app.claims.clone(),
        app.users_repo.clone(),
        Arc::new(obscurer),
        app.distributor.clone(),
    )
}

#[tokio::test]
async fn test_tick_marks_obscures_and_broadcasts() -> Result<(), Error> {
    let app = TestApp::new().await?;
    for id in 1..=3 {
        app.user(id).await?;
    }
    let item = app.catalog.add_item("cat.jpg", None).await?;

    let mut obscurer = MockRenderer::new();
    obscurer
        .expect_obscure()
        .withf(|image| image == "cat.jpg")
        .times(1)
        .returning(|image| Ok(hidden(image)));
    let cycle = cycle_with(&app, obscurer);

    let outcome = cycle.run_once().await?;
    let DrawOutcome::Drawn { live, delivered, failed } = outcome else {
        panic!("expected a draw");
    };
    assert_eq!(live.item.item_id, item.item_id);
    assert_eq!(live.obscured, hidden("cat.jpg"));
    assert_eq!((delivered, failed), (3, 0));

    assert!(app.catalog.get_item(item.item_id).await?.expect("exists").consumed);
    assert_eq!(cycle.live_item().await, Some(live));

    let sent = app.distributor.take();
    assert_eq!(sent.len(), 3);
    for d in &sent {
        assert_eq!(d.action().map(|a| a.token), Some(ActionToken::Claim(item.item_id)));
        assert!(d.body().contains("first 3"));
    }
    Ok(())
}

#[tokio::test]
async fn test_exhausted_catalog_is_recycled() -> Result<(), Error> {
    let app = TestApp::new().await?;
    app.user(1).await?;
    let only = app.catalog.add_item("only.jpg", None).await?;
    app.catalog.mark_consumed(only.item_id).await?;
    // Fully claimed items come back too.
    app.auction.claim(1, only.item_id).await?;

    let cycle = cycle_with(&app, renderer());
    match cycle.run_once().await? {
        DrawOutcome::Drawn { live, .. } => assert_eq!(live.item.item_id, only.item_id),
        other => panic!("expected recycle, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_empty_catalog_has_no_side_effects() -> Result<(), Error> {
    let app = TestApp::new().await?;
    app.user(1).await?;

    let mut obscurer = MockRenderer::new();
    obscurer.expect_obscure().never();
    let cycle = cycle_with(&app, obscurer);

    assert_eq!(cycle.run_once().await?, DrawOutcome::CatalogExhausted);
    assert!(cycle.live_item().await.is_none());
    assert!(app.distributor.take().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failed_recipient_does_not_stop_broadcast() -> Result<(), Error> {
    let app = TestApp::new().await?;
    for id in 1..=3 {
        app.user(id).await?;
    }
    app.distributor.fail_for(2);
    app.catalog.add_item("cat.jpg", None).await?;

    let cycle = cycle_with(&app, renderer());
    let DrawOutcome::Drawn { delivered, failed, .. } = cycle.run_once().await? else {
        panic!("expected a draw");
    };
    assert_eq!((delivered, failed), (2, 1));

    let recipients: Vec<i64> = app.distributor.take().iter().map(|d| d.recipient()).collect();
    assert_eq!(recipients, vec![1, 3]);
    Ok(())
}

#[tokio::test]
async fn test_obscurer_failure_keeps_previous_live_item() -> Result<(), Error> {
    let app = TestApp::new().await?;
    app.user(1).await?;
    app.catalog.add_item("broken.jpg", None).await?;

    let mut obscurer = MockRenderer::new();
    obscurer
        .expect_obscure()
        .returning(|_| Err(Error::Image("corrupt file".into())));
    let cycle = cycle_with(&app, obscurer);

    assert!(matches!(cycle.run_once().await, Err(Error::Image(_))));
    assert!(cycle.live_item().await.is_none());
    assert!(app.distributor.take().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_late_joiner_only_gets_open_item() -> Result<(), Error> {
    let app = TestApp::new().await?;
    app.set(SettingKey::WinnersPerItem, 1).await?;
    app.user(1).await?;
    let item = app.catalog.add_item("cat.jpg", None).await?;

    let cycle = cycle_with(&app, renderer());
    assert!(!cycle.offer_live_item_to(5).await?, "nothing on air yet");

    cycle.run_once().await?;
    app.distributor.take();

    app.user(5).await?;
    assert!(cycle.offer_live_item_to(5).await?);
    let sent = app.distributor.sent_to(5);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].action().map(|a| a.token), Some(ActionToken::Claim(item.item_id)));

    app.auction.claim(1, item.item_id).await?;
    assert_eq!(app.claims.claim_count(item.item_id).await?, 1);
    app.user(6).await?;
    assert!(!cycle.offer_live_item_to(6).await?);
    assert!(app.distributor.sent_to(6).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_deleted_live_item_is_not_offered() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let item = app.catalog.add_item("cat.jpg", None).await?;

    let cycle = cycle_with(&app, renderer());
    cycle.run_once().await?;
    assert!(cycle.live_item().await.is_some());

    assert!(app.catalog.delete_item(item.item_id).await?);
    app.user(5).await?;
    assert!(!cycle.offer_live_item_to(5).await?);
    assert!(app.distributor.sent_to(5).is_empty());
    assert!(cycle.live_item().await.is_none());
    Ok(())
}

#[tokio::test]
async fn test_background_task_ticks_and_stops_on_shutdown() -> Result<(), Error> {
    let app = TestApp::new().await?;
    app.user(1).await?;
    app.catalog.add_item("cat.jpg", None).await?;

    let cycle = Arc::new(cycle_with(&app, renderer()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = spawn_broadcast_task(cycle.clone(), Duration::from_millis(10), shutdown_rx);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while cycle.live_item().await.is_none() {
        assert!(tokio::time::Instant::now() < deadline, "first tick never happened");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(app.distributor.sent_to(1).len(), 1);

    shutdown_tx.send(true).expect("task is listening");
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("task stops promptly")?;
    Ok(())
}
