//! In-memory integration tests for assignment and inline materialization.

use super::helpers::{Engine, engine};
use chrono::Duration;
use eyre::ensure;
use originate::assignment::services::AssignLoanTypeRequest;
use originate::catalog::services::UpdateTaskTemplateRequest;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assignment_materializes_due_dates_from_the_assignment_instant(
    engine: Engine,
) -> eyre::Result<()> {
    let loan_type = engine.loan_type("FHA Loan").await?;
    engine
        .associated_template(&loan_type, "Document collection", 2, 1)
        .await?;
    engine
        .associated_template(&loan_type, "Credit check", 5, 2)
        .await?;

    let outcome = engine
        .assignments
        .assign_loan_type_to_client(AssignLoanTypeRequest::new(
            engine.workspace_id,
            engine.client,
            loan_type.id(),
            engine.advisor,
        ))
        .await?;

    ensure!(outcome.newly_assigned, "first assignment should be fresh");
    assert_eq!(outcome.tasks.len(), 2);
    let assigned_at = outcome.assignment.assigned_at();
    let due_dates: Vec<_> = outcome.tasks.iter().map(|task| task.due_date()).collect();
    assert_eq!(
        due_dates,
        [
            assigned_at + Duration::days(2),
            assigned_at + Duration::days(5)
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn worklist_order_is_non_decreasing(engine: Engine) -> eyre::Result<()> {
    let loan_type = engine.loan_type("FHA Loan").await?;
    engine
        .associated_template(&loan_type, "Final review", 21, 4)
        .await?;
    engine
        .associated_template(&loan_type, "Consultation", 1, 1)
        .await?;
    engine
        .associated_template(&loan_type, "Credit check", 5, 2)
        .await?;

    let outcome = engine
        .assignments
        .assign_loan_type_to_client(AssignLoanTypeRequest::new(
            engine.workspace_id,
            engine.client,
            loan_type.id(),
            engine.advisor,
        ))
        .await?;

    let orders: Vec<i32> = outcome
        .tasks
        .iter()
        .map(|task| task.snapshot().order)
        .collect();
    let mut sorted = orders.clone();
    sorted.sort_unstable();
    assert_eq!(orders, sorted);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn double_assignment_creates_no_second_worklist(engine: Engine) -> eyre::Result<()> {
    let loan_type = engine.loan_type("FHA Loan").await?;
    engine
        .associated_template(&loan_type, "Credit check", 5, 1)
        .await?;
    let request = AssignLoanTypeRequest::new(
        engine.workspace_id,
        engine.client,
        loan_type.id(),
        engine.advisor,
    );

    let first = engine
        .assignments
        .assign_loan_type_to_client(request.clone())
        .await?;
    let second = engine.assignments.assign_loan_type_to_client(request).await?;

    ensure!(!second.newly_assigned, "repeat should reuse the assignment");
    assert_eq!(second.assignment.id(), first.assignment.id());

    let worklist = engine
        .worklist
        .list_by_client_loan_type(first.assignment.id())
        .await?;
    assert_eq!(worklist.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unconfigured_loan_type_materializes_the_default_sequence(
    engine: Engine,
) -> eyre::Result<()> {
    let loan_type = engine.loan_type("Bridge Loan").await?;

    let outcome = engine
        .assignments
        .assign_loan_type_to_client(AssignLoanTypeRequest::new(
            engine.workspace_id,
            engine.client,
            loan_type.id(),
            engine.advisor,
        ))
        .await?;

    assert_eq!(outcome.tasks.len(), 8);
    let titles: Vec<&str> = outcome
        .tasks
        .iter()
        .map(|task| task.snapshot().title.as_str())
        .collect();
    assert_eq!(titles.first(), Some(&"Initial consultation"));
    assert_eq!(titles.last(), Some(&"Final review"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn template_edits_never_propagate_to_materialized_tasks(
    engine: Engine,
) -> eyre::Result<()> {
    let loan_type = engine.loan_type("FHA Loan").await?;
    let template = engine
        .associated_template(&loan_type, "Credit check", 5, 1)
        .await?;

    let outcome = engine
        .assignments
        .assign_loan_type_to_client(AssignLoanTypeRequest::new(
            engine.workspace_id,
            engine.client,
            loan_type.id(),
            engine.advisor,
        ))
        .await?;

    engine
        .definitions
        .update_task_template(
            UpdateTaskTemplateRequest::new(engine.workspace_id, template.id())
                .with_title("Renamed step")
                .with_due_in_days(30),
        )
        .await?;
    engine
        .definitions
        .delete_task_template(engine.workspace_id, template.id())
        .await?;

    let worklist = engine
        .worklist
        .list_by_client_loan_type(outcome.assignment.id())
        .await?;
    let snapshot = worklist
        .first()
        .map(|task| task.snapshot())
        .ok_or_else(|| eyre::eyre!("expected a materialized task"))?;
    assert_eq!(snapshot.title, "Credit check");
    assert_eq!(snapshot.due_in_days, 5);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivate_and_reassign_builds_a_fresh_worklist(engine: Engine) -> eyre::Result<()> {
    let loan_type = engine.loan_type("FHA Loan").await?;
    engine
        .associated_template(&loan_type, "Credit check", 5, 1)
        .await?;
    let request = AssignLoanTypeRequest::new(
        engine.workspace_id,
        engine.client,
        loan_type.id(),
        engine.advisor,
    );

    let first = engine
        .assignments
        .assign_loan_type_to_client(request.clone())
        .await?;
    engine
        .assignments
        .deactivate_assignment(engine.workspace_id, first.assignment.id(), engine.advisor)
        .await?;
    let second = engine.assignments.assign_loan_type_to_client(request).await?;

    ensure!(second.newly_assigned, "reassignment should be fresh");
    assert_ne!(second.assignment.id(), first.assignment.id());
    let fresh_worklist = engine
        .worklist
        .list_by_client_loan_type(second.assignment.id())
        .await?;
    assert_eq!(fresh_worklist.len(), 1);
    Ok(())
}
