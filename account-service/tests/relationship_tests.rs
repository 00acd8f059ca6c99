mod common;

use account_service::domain::account::ports::AccountServicePort;
use account_service::domain::errors::AccountError;
use account_service::domain::errors::ErrorKind;
use account_service::domain::user::models::UserId;
use common::TestApp;

#[tokio::test]
async fn test_owner_and_relative_views() {
    let app = TestApp::spawn().await;

    let alice = app.register_owner("alice@x.com").await.user;
    let bob = app.register_relative("bob@x.com").await.user;

    let edge = app.service.add_relative(&alice.id, &bob.id).await.unwrap();
    assert_eq!(edge.owner_id, alice.id);
    assert_eq!(edge.relative_id, bob.id);

    let stored: chrono::DateTime<chrono::Utc> =
        sqlx::query_scalar("SELECT created_at FROM user_relationships WHERE id = $1")
            .bind(edge.id.0)
            .fetch_one(&app.db.pool)
            .await
            .unwrap();
    assert_eq!(stored, edge.created_at);

    let view = app.service.get_owner_with_relatives(&alice.id).await.unwrap();
    assert_eq!(view.owner.user.id, alice.id);
    assert_eq!(view.relatives.len(), 1);
    assert_eq!(view.relatives[0].id, bob.id);
    assert_eq!(view.relatives[0].email.as_str(), "bob@x.com");

    let owners = app.service.get_owners_for_relative(&bob.id).await.unwrap();
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].id, alice.id);
    assert_eq!(owners[0].car_name.as_ref().unwrap().as_str(), "Tesla");

    let err = app
        .service
        .add_relative(&alice.id, &bob.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::RelationshipAlreadyExists { .. }));
    assert_eq!(err.kind(), ErrorKind::Duplicate);
}

#[tokio::test]
async fn test_relatives_listed_in_link_order() {
    let app = TestApp::spawn().await;

    let alice = app.register_owner("alice@x.com").await.user;
    let bob = app.register_relative("bob@x.com").await.user;
    let dave = app.register_relative("dave@x.com").await.user;

    app.service.add_relative(&alice.id, &dave.id).await.unwrap();
    app.service.add_relative(&alice.id, &bob.id).await.unwrap();

    let view = app.service.get_owner_with_relatives(&alice.id).await.unwrap();
    let ids: Vec<UserId> = view.relatives.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![dave.id, bob.id]);
}

#[tokio::test]
async fn test_add_relative_role_checks() {
    let app = TestApp::spawn().await;

    let alice = app.register_owner("alice@x.com").await.user;
    let carol = app.register_owner("carol@x.com").await.user;
    let bob = app.register_relative("bob@x.com").await.user;

    let err = app.service.add_relative(&bob.id, &alice.id).await.unwrap_err();
    assert!(matches!(err, AccountError::NotCarOwner(id) if id == bob.id));

    let err = app
        .service
        .add_relative(&alice.id, &carol.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::NotRelative(id) if id == carol.id));

    let err = app
        .service
        .get_owner_with_relatives(&bob.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Role);

    let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_relationships")
        .fetch_one(&app.db.pool)
        .await
        .unwrap();
    assert_eq!(edges, 0);
}

#[tokio::test]
async fn test_add_relative_unknown_user() {
    let app = TestApp::spawn().await;

    let alice = app.register_owner("alice@x.com").await.user;
    let missing = UserId::new();

    let err = app
        .service
        .add_relative(&alice.id, &missing)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::NotFound(id) if id == missing));
}

#[tokio::test]
async fn test_concurrent_duplicate_links() {
    let app = TestApp::spawn().await;

    let alice = app.register_owner("alice@x.com").await.user;
    let bob = app.register_relative("bob@x.com").await.user;

    let (first, second) = tokio::join!(
        app.service.add_relative(&alice.id, &bob.id),
        app.service.add_relative(&alice.id, &bob.id)
    );

    assert_eq!([&first, &second].iter().filter(|r| r.is_ok()).count(), 1);

    let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_relationships")
        .fetch_one(&app.db.pool)
        .await
        .unwrap();
    assert_eq!(edges, 1);
}

#[tokio::test]
async fn test_remove_relative() {
    let app = TestApp::spawn().await;

    let alice = app.register_owner("alice@x.com").await.user;
    let bob = app.register_relative("bob@x.com").await.user;

    app.service.add_relative(&alice.id, &bob.id).await.unwrap();
    app.service.remove_relative(&alice.id, &bob.id).await.unwrap();

    let view = app.service.get_owner_with_relatives(&alice.id).await.unwrap();
    assert!(view.relatives.is_empty());

    let err = app
        .service
        .remove_relative(&alice.id, &bob.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::RelationshipNotFound { .. }));
}

#[tokio::test]
async fn test_delete_account_cascades_edges() {
    let app = TestApp::spawn().await;

    let alice = app.register_owner("alice@x.com").await.user;
    let bob = app.register_relative("bob@x.com").await.user;

    app.service.add_relative(&alice.id, &bob.id).await.unwrap();
    app.service.delete_account(&bob.id).await.unwrap();

    let view = app.service.get_owner_with_relatives(&alice.id).await.unwrap();
    assert!(view.relatives.is_empty());

    let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_relationships")
        .fetch_one(&app.db.pool)
        .await
        .unwrap();
    assert_eq!(edges, 0);
}
