//! In-memory integration tests for worklist lifecycle and reporting.

use super::helpers::{Engine, engine};
use eyre::ensure;
use originate::assignment::services::AssignLoanTypeRequest;
use originate::worklist::domain::{ClientTask, ClientTaskStatus};
use originate::worklist::services::TaskLifecycleError;
use rstest::rstest;

async fn assigned_worklist(engine: &Engine, due_in_days: u32) -> eyre::Result<Vec<ClientTask>> {
    let loan_type = engine.loan_type("FHA Loan").await?;
    engine
        .associated_template(&loan_type, "Document collection", due_in_days, 1)
        .await?;
    engine
        .associated_template(&loan_type, "Credit check", due_in_days, 2)
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
    Ok(outcome.tasks)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_task_walks_the_full_lifecycle(engine: Engine) -> eyre::Result<()> {
    let tasks = assigned_worklist(&engine, 5).await?;
    let task = tasks
        .first()
        .ok_or_else(|| eyre::eyre!("expected a populated worklist"))?;

    let started = engine
        .worklist
        .update_status(engine.workspace_id, task.id(), ClientTaskStatus::InProgress)
        .await?;
    assert_eq!(started.status(), ClientTaskStatus::InProgress);

    let completed = engine
        .worklist
        .update_status(engine.workspace_id, task.id(), ClientTaskStatus::Completed)
        .await?;
    assert_eq!(completed.status(), ClientTaskStatus::Completed);
    ensure!(
        completed.completed_at().is_some(),
        "completion should be stamped"
    );

    let reopened = engine
        .worklist
        .update_status(engine.workspace_id, task.id(), ClientTaskStatus::Pending)
        .await;
    assert!(matches!(reopened, Err(TaskLifecycleError::Domain(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_leaves_the_rest_of_the_worklist_untouched(engine: Engine) -> eyre::Result<()> {
    let tasks = assigned_worklist(&engine, 5).await?;
    let first = tasks
        .first()
        .ok_or_else(|| eyre::eyre!("expected a populated worklist"))?;

    engine
        .worklist
        .update_status(engine.workspace_id, first.id(), ClientTaskStatus::Completed)
        .await?;

    let pending = engine
        .worklist
        .list_by_status(engine.workspace_id, ClientTaskStatus::Pending)
        .await?;
    assert_eq!(pending.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn immediately_due_tasks_show_up_in_the_overdue_report(engine: Engine) -> eyre::Result<()> {
    // A zero-day offset is due at the assignment instant, so any later read
    // sees it as overdue.
    let tasks = assigned_worklist(&engine, 0).await?;
    let skipped = tasks
        .first()
        .ok_or_else(|| eyre::eyre!("expected a populated worklist"))?;
    engine
        .worklist
        .update_status(engine.workspace_id, skipped.id(), ClientTaskStatus::Skipped)
        .await?;

    let overdue = engine.worklist.list_overdue(engine.workspace_id).await?;

    // The skipped task is terminal and excluded; the other remains overdue.
    assert_eq!(overdue.len(), 1);
    assert!(overdue.iter().all(|task| task.id() != skipped.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn future_due_tasks_are_absent_from_the_overdue_report(engine: Engine) -> eyre::Result<()> {
    assigned_worklist(&engine, 30).await?;

    let overdue = engine.worklist.list_overdue(engine.workspace_id).await?;
    assert!(overdue.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_notes_and_routing_persist_across_reads(engine: Engine) -> eyre::Result<()> {
    let tasks = assigned_worklist(&engine, 5).await?;
    let task = tasks
        .first()
        .ok_or_else(|| eyre::eyre!("expected a populated worklist"))?;

    engine
        .worklist
        .assign(engine.workspace_id, task.id(), engine.advisor)
        .await?;
    engine
        .worklist
        .record_client_notes(engine.workspace_id, task.id(), "Docs uploaded")
        .await?;

    let reloaded = engine
        .worklist
        .get_task(engine.workspace_id, task.id())
        .await?;
    assert_eq!(reloaded.assigned_to(), Some(engine.advisor));
    assert_eq!(reloaded.client_notes(), Some("Docs uploaded"));
    assert_eq!(reloaded.status(), ClientTaskStatus::Pending);
    Ok(())
}
