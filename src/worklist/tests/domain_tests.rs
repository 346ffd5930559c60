//! Domain-focused tests for client task materialization behaviour.

use crate::assignment::domain::ClientLoanTypeId;
use crate::catalog::domain::{TaskPriority, TemplateId};
use crate::worklist::domain::{ClientTask, ClientTaskStatus, TaskSnapshot};
use crate::workspace::domain::{Role, UserId, WorkspaceId};
use chrono::{Duration, Utc};
use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn snapshot(due_in_days: u32, order: i32) -> TaskSnapshot {
    TaskSnapshot {
        template_id: TemplateId::new(),
        title: "Credit check".to_owned(),
        instructions: "Pull the credit report.".to_owned(),
        assignee_role: Role::Advisor,
        is_required: true,
        due_in_days,
        document_proof_required: false,
        priority: TaskPriority::Normal,
        order,
    }
}

fn materialize(due_in_days: u32, clock: &DefaultClock) -> ClientTask {
    ClientTask::materialize(
        WorkspaceId::new(),
        ClientLoanTypeId::new(),
        snapshot(due_in_days, 1),
        clock.utc(),
        clock,
    )
}

#[rstest]
fn materialize_computes_due_date_from_assignment_instant(clock: DefaultClock) {
    let assigned_at = clock.utc();
    let task = ClientTask::materialize(
        WorkspaceId::new(),
        ClientLoanTypeId::new(),
        snapshot(5, 1),
        assigned_at,
        &clock,
    );

    assert_eq!(task.due_date(), assigned_at + Duration::days(5));
    assert_eq!(task.status(), ClientTaskStatus::Pending);
    assert_eq!(task.completed_at(), None);
    assert_eq!(task.assigned_to(), None);
}

#[rstest]
fn materialize_copies_template_fields_verbatim(clock: DefaultClock) {
    let source = snapshot(5, 3);
    let task = ClientTask::materialize(
        WorkspaceId::new(),
        ClientLoanTypeId::new(),
        source.clone(),
        clock.utc(),
        &clock,
    );

    assert_eq!(task.snapshot(), &source);
}

#[rstest]
fn zero_day_offset_is_due_at_the_assignment_instant(clock: DefaultClock) {
    let assigned_at = clock.utc();
    let task = ClientTask::materialize(
        WorkspaceId::new(),
        ClientLoanTypeId::new(),
        snapshot(0, 1),
        assigned_at,
        &clock,
    );

    assert_eq!(task.due_date(), assigned_at);
}

#[rstest]
fn assign_to_sets_the_assignee_without_touching_status(clock: DefaultClock) {
    let mut task = materialize(5, &clock);
    let user_id = UserId::new();

    task.assign_to(user_id, &clock);

    assert_eq!(task.assigned_to(), Some(user_id));
    assert_eq!(task.status(), ClientTaskStatus::Pending);
}

#[rstest]
fn record_client_notes_stores_the_text(clock: DefaultClock) {
    let mut task = materialize(5, &clock);

    task.record_client_notes("Uploaded the wrong statement, re-sending.", &clock);

    assert_eq!(
        task.client_notes(),
        Some("Uploaded the wrong statement, re-sending.")
    );
}

#[rstest]
fn pending_task_past_due_is_overdue(clock: DefaultClock) {
    let assigned_at = clock.utc() - Duration::days(10);
    let task = ClientTask::materialize(
        WorkspaceId::new(),
        ClientLoanTypeId::new(),
        snapshot(5, 1),
        assigned_at,
        &clock,
    );

    assert!(task.is_overdue(Utc::now()));
}

#[rstest]
fn future_due_date_is_not_overdue(clock: DefaultClock) {
    let task = materialize(5, &clock);
    assert!(!task.is_overdue(Utc::now()));
}

#[rstest]
fn completed_task_past_due_is_not_overdue(clock: DefaultClock) {
    let assigned_at = clock.utc() - Duration::days(10);
    let mut task = ClientTask::materialize(
        WorkspaceId::new(),
        ClientLoanTypeId::new(),
        snapshot(5, 1),
        assigned_at,
        &clock,
    );
    task.transition_to(ClientTaskStatus::Completed, &clock)
        .expect("pending completes directly");

    assert!(!task.is_overdue(Utc::now()));
}
