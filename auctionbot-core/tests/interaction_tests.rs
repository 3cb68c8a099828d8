// File: auctionbot-core/tests/interaction_tests.rs

use auctionbot_common::models::{ActionToken, AdminCommand, Intent, SettingKey};
use auctionbot_common::traits::repository_traits::{
    CatalogRepository, PointsLedger, SettingsRepository, UserRepository,
};
use auctionbot_core::services::AdminResponse;
use auctionbot_core::test_utils::helpers::*;
use auctionbot_core::Error;

fn last_text(app: &TestApp, user_id: i64) -> String {
    app.distributor
        .sent_to(user_id)
        .last()
        .map(|d| d.body().to_string())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_start_registers_and_greets_once() -> Result<(), Error> {
    let app = TestApp::new().await?;

    app.interaction.handle(1, Intent::Start { name: Some("Alice".into()) }).await?;
    assert!(last_text(&app, 1).starts_with("Welcome"));
    assert_eq!(
        app.users_repo.get(1).await?.and_then(|u| u.user_name).as_deref(),
        Some("Alice")
    );

    app.interaction.handle_text(1, "/start").await?;
    assert_eq!(last_text(&app, 1), "You are already registered.");
    Ok(())
}

#[tokio::test]
async fn test_new_user_sees_live_item() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let item = app.catalog.add_item("cat.jpg", None).await?;
    app.broadcast.run_once().await?;

    app.interaction.handle(7, Intent::Start { name: None }).await?;
    let sent = app.distributor.sent_to(7);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].action().map(|a| a.token), Some(ActionToken::Claim(item.item_id)));
    Ok(())
}

#[tokio::test]
async fn test_claim_replies_for_each_outcome() -> Result<(), Error> {
    let app = TestApp::new().await?;
    app.set(SettingKey::WinnersPerItem, 2).await?;
    let item = app.catalog.add_item("cat.jpg", None).await?;
    for id in 1..=3 {
        app.user(id).await?;
    }

    app.interaction.handle_text(1, &item.item_id.to_string()).await?;
    let won = app.distributor.sent_to(1);
    match won.last() {
        Some(Delivery::Photo { photo, caption, .. }) => {
            assert_eq!(photo, &app.library.original_path("cat.jpg"));
            assert!(caption.contains("+10 points"));
        }
        other => panic!("expected the revealed photo, got {:?}", other),
    }

    app.interaction.handle(1, Intent::Action(ActionToken::Claim(item.item_id))).await?;
    assert_eq!(last_text(&app, 1), "You have already claimed this prize.");

    app.interaction.handle(2, Intent::Action(ActionToken::Claim(item.item_id))).await?;
    assert_eq!(app.points.balance(2).await?, 10);

    // Late claimer is offered the re-offer button.
    app.interaction.handle(3, Intent::Action(ActionToken::Claim(item.item_id))).await?;
    let late = app.distributor.sent_to(3);
    assert_eq!(
        late.last().and_then(|d| d.action()).map(|a| a.token),
        Some(ActionToken::RequestReOffer(item.item_id))
    );
    Ok(())
}

#[tokio::test]
async fn test_re_offer_request_requires_admin_and_broadcasts() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let item = app.catalog.add_item("cat.jpg", None).await?;
    app.user(1).await?;
    app.user(2).await?;
    app.admin_user(9).await?;

    app.interaction.handle(1, Intent::Action(ActionToken::RequestReOffer(item.item_id))).await?;
    assert_eq!(last_text(&app, 1), "This command is for admins only.");
    assert!(app.re_offers.list_active().await?.is_empty());

    app.distributor.take();
    app.interaction.handle(9, Intent::Action(ActionToken::RequestReOffer(item.item_id))).await?;
    let active = app.re_offers.list_active().await?;
    assert_eq!(active.len(), 1);
    let ro = &active[0];

    for user in [1, 2] {
        let sent = app.distributor.sent_to(user);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].action().map(|a| a.token), Some(ActionToken::ReOfferEntry(ro.item_id)));
        assert!(sent[0].body().contains("50 points"));
    }
    assert!(last_text(&app, 9).starts_with(&format!("Re-offer #{} opened", ro.item_id)));
    Ok(())
}

#[tokio::test]
async fn test_re_offer_entry_replies() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let item = app.catalog.add_item("cat.jpg", None).await?;
    app.user(1).await?;
    app.user(2).await?;
    let admin = app.admin_user(9).await?;
    let ro = app.re_offers.open(admin, item.item_id).await?.expect("opened");

    app.interaction.handle_text(1, &format!("re_{}", ro.item_id)).await?;
    assert_eq!(last_text(&app, 1), "You need 50 points to enter; you have 0.");

    app.points.credit(2, 50).await?;
    app.interaction.handle_text(2, &format!("re_{}", ro.item_id)).await?;
    assert!(last_text(&app, 2).contains("Spent 50 points, earned 10"));
    assert_eq!(app.points.balance(2).await?, 10);

    app.points.credit(1, 50).await?;
    app.interaction.handle_text(1, &format!("re_{}", ro.item_id)).await?;
    assert_eq!(last_text(&app, 1), "Someone else already won this re-offer.");
    Ok(())
}

#[tokio::test]
async fn test_user_queries() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let a = app.catalog.add_item("a.jpg", None).await?;
    app.catalog.add_item("b.jpg", None).await?;
    app.user(1).await?;
    app.auction.claim(1, a.item_id).await?;

    app.interaction.handle_text(1, "/bonus").await?;
    assert_eq!(last_text(&app, 1), "Your balance: 10 points.");

    app.interaction.handle_text(1, "/rating").await?;
    assert_eq!(last_text(&app, 1), "Top collectors:\n1. user1: 1 prizes, 10 points");

    app.interaction.handle_text(1, "/re_auctions").await?;
    assert_eq!(last_text(&app, 1), "No active re-offers.");

    app.interaction.handle_text(1, "/get_my_score").await?;
    assert_eq!(last_text(&app, 1), "You have collected 1 of 2 prizes. Balance: 10 points.");
    let tiles = app.composer.tiles.lock().unwrap().clone();
    assert_eq!(
        tiles,
        vec![app.library.original_path("a.jpg"), app.library.hidden_path("b.jpg")]
    );

    app.interaction.handle_text(1, "/dance").await?;
    assert_eq!(last_text(&app, 1), "unknown command '/dance'");
    app.interaction.handle_text(1, "banana").await?;
    assert_eq!(last_text(&app, 1), "Unknown action token 'banana'");
    Ok(())
}

#[tokio::test]
async fn test_collection_with_empty_catalog() -> Result<(), Error> {
    let app = TestApp::new().await?;
    app.user(1).await?;
    app.interaction.handle(1, Intent::Collection).await?;
    assert_eq!(last_text(&app, 1), "There are no prizes yet.");
    Ok(())
}

#[tokio::test]
async fn test_admin_commands() -> Result<(), Error> {
    let app = TestApp::new().await?;
    let admin = app.admin_user(9).await?;
    app.user(1).await?;

    assert!(matches!(
        app.admin.execute(1, AdminCommand::ShowSettings).await,
        Err(Error::Unauthorized(_))
    ));
    app.interaction.handle_text(1, "/admin_interval 5").await?;
    assert_eq!(last_text(&app, 1), "This command is for admins only.");

    app.interaction.handle_text(admin, "/admin_interval 5").await?;
    assert_eq!(last_text(&app, admin), "message_interval set to 5");
    assert_eq!(app.settings.get(SettingKey::BroadcastInterval).await?.as_deref(), Some("5"));

    app.interaction.handle_text(admin, "/admin_winners 0").await?;
    assert!(last_text(&app, admin).contains("at least 1"));
    assert_eq!(app.settings.snapshot().await?.winners_per_item, 3);

    // Hand-built commands are range-checked too.
    assert!(matches!(
        app.admin.execute(admin, AdminCommand::SetReOfferDuration(0)).await,
        Err(Error::InvalidCommand(_))
    ));

    let added = app
        .admin
        .execute(admin, AdminCommand::AddItem { image: "prize_1.jpg".into() })
        .await?;
    let AdminResponse::ItemAdded(item) = added else {
        panic!("expected ItemAdded");
    };
    assert_eq!(item.added_by, Some(admin));

    app.interaction.handle_text(admin, "/admin_prizes").await?;
    assert!(last_text(&app, admin).contains("prize_1.jpg"));

    app.interaction
        .handle_text(admin, &format!("/admin_delete_prize {}", item.item_id))
        .await?;
    assert_eq!(last_text(&app, admin), format!("Prize #{} deleted", item.item_id));
    app.interaction
        .handle_text(admin, &format!("/admin_delete_prize {}", item.item_id))
        .await?;
    assert!(last_text(&app, admin).starts_with("Not found"));

    app.interaction.handle_text(admin, "/admin_set_admin 1").await?;
    assert!(app.users_repo.is_admin(1).await?);

    app.interaction.handle_text(admin, "/admin_settings").await?;
    assert!(last_text(&app, admin).contains("Broadcast interval: 5 min"));
    Ok(())
}
