//! In-memory integration tests for catalog definitions and associations.

use super::helpers::{Engine, engine};
use eyre::ensure;
use originate::catalog::domain::{LoanTypeStatus, TaskTemplate};
use originate::catalog::services::UpdateLoanTypeRequest;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_definition_round_trip(engine: Engine) -> eyre::Result<()> {
    let loan_type = engine.loan_type("FHA Loan").await?;
    engine
        .associated_template(&loan_type, "Document collection", 2, 1)
        .await?;
    engine
        .associated_template(&loan_type, "Credit check", 5, 2)
        .await?;

    let templates = engine
        .resolver
        .templates_for_loan_type(engine.workspace_id, loan_type.id())
        .await?;

    let titles: Vec<&str> = templates
        .iter()
        .map(|template| template.title().as_str())
        .collect();
    assert_eq!(titles, ["Document collection", "Credit check"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivating_a_loan_type_keeps_its_associations(engine: Engine) -> eyre::Result<()> {
    let loan_type = engine.loan_type("FHA Loan").await?;
    engine
        .associated_template(&loan_type, "Credit check", 5, 1)
        .await?;

    let updated = engine
        .definitions
        .update_loan_type(
            UpdateLoanTypeRequest::new(engine.workspace_id, loan_type.id())
                .with_status(LoanTypeStatus::Inactive),
        )
        .await?;
    ensure!(
        updated.status() == LoanTypeStatus::Inactive,
        "loan type should be inactive"
    );

    let templates = engine
        .resolver
        .templates_for_loan_type(engine.workspace_id, loan_type.id())
        .await?;
    assert_eq!(templates.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_loan_type_cascades_its_association_rows(engine: Engine) -> eyre::Result<()> {
    let loan_type = engine.loan_type("FHA Loan").await?;
    let template = engine
        .associated_template(&loan_type, "Credit check", 5, 1)
        .await?;

    engine
        .definitions
        .delete_loan_type(engine.workspace_id, loan_type.id())
        .await?;

    let loan_types = engine
        .resolver
        .loan_types_for_template(engine.workspace_id, template.id())
        .await?;
    assert!(loan_types.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_template_can_serve_many_loan_types(engine: Engine) -> eyre::Result<()> {
    let fha = engine.loan_type("FHA Loan").await?;
    let va = engine.loan_type("VA Loan").await?;
    let template = engine
        .associated_template(&fha, "Credit check", 5, 1)
        .await?;

    engine
        .resolver
        .associate_with_loan_types(
            engine.workspace_id,
            template.id(),
            vec![fha.id(), va.id()],
        )
        .await?;

    for loan_type in [&fha, &va] {
        let templates = engine
            .resolver
            .templates_for_loan_type(engine.workspace_id, loan_type.id())
            .await?;
        assert_eq!(
            templates.first().map(TaskTemplate::id),
            Some(template.id())
        );
    }
    Ok(())
}
