//! Domain-focused tests for assignment aggregates and the default sequence.

use crate::assignment::domain::{
    AssignmentDomainError, ClientLoanType, NewClientLoanType, default_origination_sequence,
};
use crate::catalog::domain::LoanTypeId;
use crate::workspace::domain::{ClientId, Role, UserId, WorkspaceId};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use std::collections::HashSet;

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn new_assignment(clock: &DefaultClock) -> ClientLoanType {
    ClientLoanType::new(
        NewClientLoanType {
            workspace_id: WorkspaceId::new(),
            client_id: ClientId::new(),
            loan_type_id: LoanTypeId::new(),
            assigned_by: UserId::new(),
            custom_order: None,
            notes: None,
        },
        clock,
    )
}

#[rstest]
fn new_assignment_starts_active(clock: DefaultClock) {
    let assignment = new_assignment(&clock);

    assert!(assignment.is_active());
    assert_eq!(assignment.assigned_at(), assignment.updated_at());
}

#[rstest]
fn deactivate_clears_the_active_flag(clock: DefaultClock) {
    let mut assignment = new_assignment(&clock);

    assignment.deactivate(&clock).expect("active deactivates");

    assert!(!assignment.is_active());
}

#[rstest]
fn deactivate_twice_is_rejected(clock: DefaultClock) {
    let mut assignment = new_assignment(&clock);
    assignment.deactivate(&clock).expect("active deactivates");

    assert_eq!(
        assignment.deactivate(&clock),
        Err(AssignmentDomainError::AlreadyInactive(assignment.id()))
    );
}

#[rstest]
fn default_sequence_has_eight_ordered_steps() {
    let sequence = default_origination_sequence();

    assert_eq!(sequence.len(), 8);
    let orders: Vec<i32> = sequence.iter().map(|snapshot| snapshot.order).collect();
    assert_eq!(orders, [1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(sequence.iter().all(|snapshot| snapshot.is_required));
}

#[rstest]
fn default_sequence_identifiers_are_stable_and_distinct() {
    let first = default_origination_sequence();
    let second = default_origination_sequence();

    let first_ids: Vec<_> = first.iter().map(|snapshot| snapshot.template_id).collect();
    let second_ids: Vec<_> = second.iter().map(|snapshot| snapshot.template_id).collect();
    assert_eq!(first_ids, second_ids);

    let distinct: HashSet<_> = first_ids.iter().copied().collect();
    assert_eq!(distinct.len(), 8);
}

#[rstest]
fn default_sequence_routes_document_collection_to_the_client() {
    let sequence = default_origination_sequence();

    let document_collection = sequence
        .iter()
        .find(|snapshot| snapshot.title == "Document collection")
        .expect("document collection step present");

    assert_eq!(document_collection.assignee_role, Role::Client);
    assert!(document_collection.document_proof_required);
}

#[rstest]
fn default_sequence_due_offsets_are_non_decreasing() {
    let sequence = default_origination_sequence();

    let offsets: Vec<u32> = sequence.iter().map(|snapshot| snapshot.due_in_days).collect();
    assert!(offsets.windows(2).all(|pair| pair[0] <= pair[1]));
}
