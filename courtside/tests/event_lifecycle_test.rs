//! Event lifecycle integration tests.
//!
//! Drives the fully wired services end to end over the mock providers:
//! accounts register, events get created and joined, comments accumulate,
//! and an account deletion cascades across the event collection.
//!
//! Run with: `cargo test --test event_lifecycle_test`

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use courtside::error::Error;
use courtside::mocks::{SentEmail, TestEnvironment};
use courtside::providers::UserRepository as _;
use courtside::services::AuthenticatedUser;
use courtside::state::{ListScope, NewEvent};

/// Register an account through the real service, deriving the email from
/// the username.
async fn register(t: &TestEnvironment, username: &str) -> AuthenticatedUser {
    t.env
        .accounts
        .register(username, &format!("{username}@example.com"), "volley99")
        .await
        .unwrap()
}

/// A date comfortably ahead of the fixed test clock (2025-01-01).
fn upcoming_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 18, 0, 0).single().unwrap()
}

fn spec(address: &str, date: DateTime<Utc>) -> NewEvent {
    NewEvent {
        date,
        time: "18:30".to_string(),
        event_type: None,
        is_public: None,
        fees: None,
        is_indoor: None,
        address: address.to_string(),
        weather: None,
    }
}

#[tokio::test]
async fn full_event_lifecycle() {
    let t = TestEnvironment::new();

    // Step 1: two players register
    let ana = register(&t, "ana").await;
    let ben = register(&t, "ben").await;

    // Step 2: Ana creates a public event and is joined from the start
    let event = t
        .env
        .events
        .create(ana.user_id, spec("Riverside Court", upcoming_date()))
        .await
        .unwrap();
    assert_eq!(event.joined_players, vec![ana.user_id]);

    // Step 3: Ben joins
    let after_join = t.env.membership.join(ben.user_id, event.id).await.unwrap();
    assert!(after_join.joined_players.contains(&ben.user_id));

    // Step 4: Ben comments; reposting the same text is rejected
    let after_comment = t
        .env
        .comments
        .add_comment(ben.user_id, event.id, "bringing spare paddles")
        .await
        .unwrap();
    assert_eq!(after_comment.comments[0].username, "ben");
    assert_eq!(
        t.env
            .comments
            .add_comment(ben.user_id, event.id, "bringing spare paddles")
            .await,
        Err(Error::DuplicateComment)
    );

    // Step 5: Ben leaves; the comment stays on the event
    let after_leave = t.env.membership.leave(ben.user_id, event.id).await.unwrap();
    assert!(!after_leave.joined_players.contains(&ben.user_id));
    assert_eq!(after_leave.comments.len(), 1);

    // Step 6: Ana's account deletion takes the event with it
    let outcome = t
        .env
        .cascade
        .delete_user(ana.user_id, ana.user_id, false)
        .await
        .unwrap();
    assert_eq!(outcome.events_deleted, 1);
    assert_eq!(t.env.events.get(event.id).await, Err(Error::EventNotFound));

    // Step 7: a second deletion reports the account as already gone
    assert_eq!(
        t.env
            .cascade
            .delete_user(ana.user_id, ana.user_id, false)
            .await,
        Err(Error::UserNotFound)
    );

    // Ben's account is untouched
    assert!(t.users.find_by_id(ben.user_id).await.unwrap().is_some());
}

#[tokio::test]
async fn private_event_requires_invitation() {
    let t = TestEnvironment::new();
    let cleo = register(&t, "cleo").await;
    let dot = register(&t, "dot").await;

    let mut private_spec = spec("Hillside Court", upcoming_date());
    private_spec.is_public = Some(false);
    let event = t
        .env
        .events
        .create(cleo.user_id, private_spec)
        .await
        .unwrap();

    // Uninvited join is rejected
    assert!(matches!(
        t.env.membership.join(dot.user_id, event.id).await,
        Err(Error::Forbidden { .. })
    ));

    // Only the creator can invite
    assert!(matches!(
        t.env
            .membership
            .invite(dot.user_id, event.id, "cleo")
            .await,
        Err(Error::Forbidden { .. })
    ));

    // Cleo invites Dot by username and the notification is recorded
    let invited = t
        .env
        .membership
        .invite(cleo.user_id, event.id, "dot")
        .await
        .unwrap();
    assert!(invited.invited_players.contains(&dot.user_id));
    assert_eq!(
        t.email.sent().unwrap(),
        vec![SentEmail::Invitation {
            to: "dot@example.com".to_string(),
            inviter_username: "cleo".to_string(),
        }]
    );

    // Now the join goes through
    let joined = t.env.membership.join(dot.user_id, event.id).await.unwrap();
    assert!(joined.joined_players.contains(&dot.user_id));

    // Inviting an unknown username fails
    assert_eq!(
        t.env
            .membership
            .invite(cleo.user_id, event.id, "nobody")
            .await,
        Err(Error::UserNotFound)
    );
}

#[tokio::test]
async fn creator_stays_joined_until_delete() {
    let t = TestEnvironment::new();
    let eve = register(&t, "eve").await;
    let event = t
        .env
        .events
        .create(eve.user_id, spec("Court 5", upcoming_date()))
        .await
        .unwrap();

    assert!(matches!(
        t.env.membership.leave(eve.user_id, event.id).await,
        Err(Error::Forbidden { .. })
    ));

    // Removing the event is the creator's way out
    t.env.events.delete(eve.user_id, event.id).await.unwrap();
    assert_eq!(t.env.events.get(event.id).await, Err(Error::EventNotFound));
}

#[tokio::test]
async fn listings_track_membership_across_users() {
    let t = TestEnvironment::new();
    let fay = register(&t, "fay").await;
    let gus = register(&t, "gus").await;

    let fays = t
        .env
        .events
        .create(fay.user_id, spec("Court A", upcoming_date()))
        .await
        .unwrap();
    let guses = t
        .env
        .events
        .create(gus.user_id, spec("Court B", upcoming_date() + Duration::days(1)))
        .await
        .unwrap();

    t.env.membership.join(fay.user_id, guses.id).await.unwrap();

    // Upcoming from Fay's point of view: both public events, soonest first
    let upcoming = t
        .env
        .events
        .list(fay.user_id, ListScope::Upcoming)
        .await
        .unwrap();
    assert_eq!(
        upcoming.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![fays.id, guses.id]
    );

    // Mine: only the one Fay created
    let mine = t.env.events.list(fay.user_id, ListScope::Mine).await.unwrap();
    assert_eq!(mine.iter().map(|e| e.id).collect::<Vec<_>>(), vec![fays.id]);

    // Joined: Fay's own (creators auto-join) plus the one joined later
    let joined = t
        .env
        .events
        .list(fay.user_id, ListScope::Joined)
        .await
        .unwrap();
    assert_eq!(
        joined.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![fays.id, guses.id]
    );

    // Gus never joined Fay's event
    let gus_joined = t
        .env
        .events
        .list(gus.user_id, ListScope::Joined)
        .await
        .unwrap();
    assert_eq!(
        gus_joined.iter().map(|e| e.id).collect::<Vec<_>>(),
        vec![guses.id]
    );
}
