//! Integration tests for the ticket repository layer against a real
//! database: reference allocation, thread sequencing, write-once flags,
//! and load accounting.

use helpdesk_db::models::ticket::CreateTicket;
use helpdesk_db::models::user::CreateUser;
use helpdesk_db::repositories::{
    NoteRepo, ReminderRepo, ResponseRepo, StaffRepo, TicketRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_ticket(title: &str) -> CreateTicket {
    CreateTicket {
        title: title.to_string(),
        description: "something is broken".to_string(),
        department: "IT Support".to_string(),
        priority: "medium".to_string(),
        created_by: "student@campus.example".to_string(),
        tags: vec!["broken".to_string()],
        sla_response_hours: 8,
        sla_resolution_hours: 48,
        attachments: vec![],
        source: "web".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Reference allocation
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn references_are_sequential_and_unique(pool: PgPool) {
    let first = TicketRepo::create(&pool, &new_ticket("first")).await.unwrap();
    let second = TicketRepo::create(&pool, &new_ticket("second")).await.unwrap();

    let first_seq = helpdesk_core::ticket::parse_reference(&first.reference).unwrap();
    let second_seq = helpdesk_core::ticket::parse_reference(&second.reference).unwrap();

    assert!(first_seq > 1000);
    assert_eq!(second_seq, first_seq + 1);
}

#[sqlx::test]
async fn new_tickets_start_open_with_fresh_sla(pool: PgPool) {
    let ticket = TicketRepo::create(&pool, &new_ticket("fresh")).await.unwrap();

    assert_eq!(ticket.status, "open");
    assert!(!ticket.sla_breached);
    assert!(ticket.assigned_to.is_none());
    assert!(ticket.resolved_at.is_none());
    assert!(ticket.last_updated >= ticket.created_at);

    let found = TicketRepo::find_by_reference(&pool, &ticket.reference)
        .await
        .unwrap()
        .expect("ticket should be findable by reference");
    assert_eq!(found.id, ticket.id);

    assert!(TicketRepo::find_by_reference(&pool, "TICKET-1")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Thread sequencing
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn responses_are_sequenced_per_ticket(pool: PgPool) {
    let a = TicketRepo::create(&pool, &new_ticket("a")).await.unwrap();
    let b = TicketRepo::create(&pool, &new_ticket("b")).await.unwrap();

    let r1 = ResponseRepo::append(&pool, a.id, "x@campus.example", "one", false, &[], None)
        .await
        .unwrap();
    let r2 = ResponseRepo::append(&pool, a.id, "x@campus.example", "two", false, &[], None)
        .await
        .unwrap();
    let other = ResponseRepo::append(&pool, b.id, "x@campus.example", "one", false, &[], None)
        .await
        .unwrap();

    assert_eq!(r1.seq, 1);
    assert_eq!(r2.seq, 2);
    assert_eq!(other.seq, 1, "sequence numbers are per ticket");

    let thread = ResponseRepo::list_for_ticket(&pool, a.id).await.unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].message, "one");
    assert_eq!(thread[1].message, "two");
}

#[sqlx::test]
async fn appending_a_response_touches_the_ticket(pool: PgPool) {
    let ticket = TicketRepo::create(&pool, &new_ticket("touch")).await.unwrap();

    ResponseRepo::append(
        &pool,
        ticket.id,
        "staff@campus.example",
        "on it",
        false,
        &[],
        Some("in-progress"),
    )
    .await
    .unwrap();

    let updated = TicketRepo::find_by_id(&pool, ticket.id).await.unwrap().unwrap();
    assert_eq!(updated.status, "in-progress");
    assert!(updated.last_updated >= ticket.last_updated);
}

#[sqlx::test]
async fn notes_are_sequenced_and_do_not_touch_the_ticket(pool: PgPool) {
    let ticket = TicketRepo::create(&pool, &new_ticket("notes")).await.unwrap();

    let n1 = NoteRepo::append(&pool, ticket.id, "System", "first note").await.unwrap();
    let n2 = NoteRepo::append(&pool, ticket.id, "System", "second note").await.unwrap();
    assert_eq!((n1.seq, n2.seq), (1, 2));

    let after = TicketRepo::find_by_id(&pool, ticket.id).await.unwrap().unwrap();
    assert_eq!(after.last_updated, ticket.last_updated);
}

// ---------------------------------------------------------------------------
// Write-once flags
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn breach_flag_flips_exactly_once(pool: PgPool) {
    let ticket = TicketRepo::create(&pool, &new_ticket("breach")).await.unwrap();

    assert!(TicketRepo::mark_breached(&pool, ticket.id).await.unwrap());
    assert!(
        !TicketRepo::mark_breached(&pool, ticket.id).await.unwrap(),
        "second flip must report no change"
    );

    let after = TicketRepo::find_by_id(&pool, ticket.id).await.unwrap().unwrap();
    assert!(after.sla_breached);
}

#[sqlx::test]
async fn reminders_are_pending_until_sent_once(pool: PgPool) {
    let ticket = TicketRepo::create(&pool, &new_ticket("remind")).await.unwrap();
    let now = chrono::Utc::now();
    let due = now + chrono::Duration::hours(24);

    assert!(!ReminderRepo::has_pending(&pool, ticket.id, now).await.unwrap());

    let reminder = ReminderRepo::create(
        &pool,
        ticket.id,
        "staff@campus.example",
        "needs attention",
        due,
    )
    .await
    .unwrap();
    assert!(!reminder.sent);

    assert!(ReminderRepo::has_pending(&pool, ticket.id, now).await.unwrap());
    // A reminder past its due time no longer suppresses a new one.
    assert!(!ReminderRepo::has_pending(&pool, ticket.id, due + chrono::Duration::hours(1))
        .await
        .unwrap());

    assert!(ReminderRepo::mark_sent(&pool, reminder.id).await.unwrap());
    assert!(!ReminderRepo::mark_sent(&pool, reminder.id).await.unwrap());
    assert!(!ReminderRepo::has_pending(&pool, ticket.id, now).await.unwrap());

    let unsent = ReminderRepo::list_unsent(&pool).await.unwrap();
    assert!(unsent.is_empty());
}

// ---------------------------------------------------------------------------
// Serialization round-trip
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn ticket_rows_round_trip_through_json(pool: PgPool) {
    let mut input = new_ticket("round trip");
    input.tags = vec!["password".to_string(), "login".to_string()];
    input.attachments = vec![helpdesk_db::models::ticket::Attachment {
        id: "att-1".to_string(),
        filename: "screenshot.png".to_string(),
        size: 2048,
        content_type: "image/png".to_string(),
        url: "/uploads/att-1".to_string(),
    }];
    let ticket = TicketRepo::create(&pool, &input).await.unwrap();

    let json = serde_json::to_value(&ticket).unwrap();
    let reloaded: helpdesk_db::models::ticket::Ticket =
        serde_json::from_value(json.clone()).unwrap();

    // Field-for-field identical after a full serialize/deserialize cycle.
    assert_eq!(serde_json::to_value(&reloaded).unwrap(), json);
    assert_eq!(reloaded.reference, ticket.reference);
    assert_eq!(reloaded.tags, ticket.tags);
    assert_eq!(reloaded.attachments.0, ticket.attachments.0);
}

// ---------------------------------------------------------------------------
// Staff load accounting
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn load_adjustments_clamp_at_zero(pool: PgPool) {
    let email = "amos.kibet@staff.campus.example";

    StaffRepo::adjust_load(&pool, email, 1).await.unwrap();
    StaffRepo::adjust_load(&pool, email, 1).await.unwrap();
    let staff = StaffRepo::find_by_email(&pool, email).await.unwrap().unwrap();
    assert_eq!(staff.current_load, 2);

    StaffRepo::adjust_load(&pool, email, -5).await.unwrap();
    let staff = StaffRepo::find_by_email(&pool, email).await.unwrap().unwrap();
    assert_eq!(staff.current_load, 0, "load never goes negative");
}

// ---------------------------------------------------------------------------
// User constraints
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn duplicate_user_email_violates_unique_constraint(pool: PgPool) {
    let user = CreateUser {
        name: "First".to_string(),
        email: "dup@campus.example".to_string(),
        registration_number: Some("REG-001".to_string()),
        role: "student".to_string(),
        department: String::new(),
        password_hash: "$argon2id$fake".to_string(),
    };
    UserRepo::create(&pool, &user).await.unwrap();

    let err = UserRepo::create(&pool, &user).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert!(db_err.constraint().unwrap_or("").starts_with("uq_"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test]
async fn users_are_found_by_email_or_registration_number(pool: PgPool) {
    let user = CreateUser {
        name: "Student".to_string(),
        email: "lookup@campus.example".to_string(),
        registration_number: Some("REG-777".to_string()),
        role: "student".to_string(),
        department: String::new(),
        password_hash: "$argon2id$fake".to_string(),
    };
    let created = UserRepo::create(&pool, &user).await.unwrap();

    let by_email = UserRepo::find_by_identifier(&pool, "lookup@campus.example")
        .await
        .unwrap()
        .unwrap();
    let by_reg = UserRepo::find_by_identifier(&pool, "REG-777").await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);
    assert_eq!(by_reg.id, created.id);

    assert!(UserRepo::find_by_identifier(&pool, "nobody@campus.example")
        .await
        .unwrap()
        .is_none());
}
