//! Default origination task sequence.
//!
//! When a loan type has no associated task templates, materialization falls
//! back to this fixed eight-step sequence covering the standard origination
//! pipeline. Each step carries a stable, well-known template identifier so
//! that deduplication and traceability work the same way as for real
//! templates.

use crate::catalog::domain::{TaskPriority, TemplateId};
use crate::workspace::domain::Role;
use crate::worklist::domain::TaskSnapshot;
use uuid::Uuid;

struct DefaultStep {
    template_id: u128,
    title: &'static str,
    instructions: &'static str,
    assignee_role: Role,
    due_in_days: u32,
    document_proof_required: bool,
    priority: TaskPriority,
}

const DEFAULT_STEPS: [DefaultStep; 8] = [
    DefaultStep {
        template_id: 0x0000_0000_0000_0000_0000_0000_0000_0001,
        title: "Initial consultation",
        instructions: "Meet with the client to review goals, timeline, and loan options.",
        assignee_role: Role::Advisor,
        due_in_days: 1,
        document_proof_required: false,
        priority: TaskPriority::High,
    },
    DefaultStep {
        template_id: 0x0000_0000_0000_0000_0000_0000_0000_0002,
        title: "Document collection",
        instructions: "Upload identification, pay stubs, bank statements, and tax returns.",
        assignee_role: Role::Client,
        due_in_days: 3,
        document_proof_required: true,
        priority: TaskPriority::High,
    },
    DefaultStep {
        template_id: 0x0000_0000_0000_0000_0000_0000_0000_0003,
        title: "Credit check",
        instructions: "Pull the client's credit report and review the score and history.",
        assignee_role: Role::Advisor,
        due_in_days: 5,
        document_proof_required: false,
        priority: TaskPriority::Normal,
    },
    DefaultStep {
        template_id: 0x0000_0000_0000_0000_0000_0000_0000_0004,
        title: "Income verification",
        instructions: "Verify employment and income against the submitted documents.",
        assignee_role: Role::Staff,
        due_in_days: 7,
        document_proof_required: true,
        priority: TaskPriority::Normal,
    },
    DefaultStep {
        template_id: 0x0000_0000_0000_0000_0000_0000_0000_0005,
        title: "Property appraisal",
        instructions: "Order the appraisal and record the assessed property value.",
        assignee_role: Role::Advisor,
        due_in_days: 10,
        document_proof_required: true,
        priority: TaskPriority::Normal,
    },
    DefaultStep {
        template_id: 0x0000_0000_0000_0000_0000_0000_0000_0006,
        title: "Title search",
        instructions: "Confirm clear title and surface any liens or encumbrances.",
        assignee_role: Role::Staff,
        due_in_days: 14,
        document_proof_required: false,
        priority: TaskPriority::Normal,
    },
    DefaultStep {
        template_id: 0x0000_0000_0000_0000_0000_0000_0000_0007,
        title: "Insurance verification",
        instructions: "Verify hazard insurance coverage meets lender requirements.",
        assignee_role: Role::Staff,
        due_in_days: 14,
        document_proof_required: true,
        priority: TaskPriority::Normal,
    },
    DefaultStep {
        template_id: 0x0000_0000_0000_0000_0000_0000_0000_0008,
        title: "Final review",
        instructions: "Review the complete file and clear the loan for closing.",
        assignee_role: Role::Advisor,
        due_in_days: 21,
        document_proof_required: false,
        priority: TaskPriority::High,
    },
];

/// Returns the fixed default task sequence used when a loan type has no
/// template associations, in materialization order.
#[must_use]
pub fn default_origination_sequence() -> Vec<TaskSnapshot> {
    DEFAULT_STEPS
        .iter()
        .enumerate()
        .map(|(position, step)| TaskSnapshot {
            template_id: TemplateId::from_uuid(Uuid::from_u128(step.template_id)),
            title: step.title.to_owned(),
            instructions: step.instructions.to_owned(),
            assignee_role: step.assignee_role,
            is_required: true,
            due_in_days: step.due_in_days,
            document_proof_required: step.document_proof_required,
            priority: step.priority,
            order: i32::try_from(position).unwrap_or(i32::MAX).saturating_add(1),
        })
        .collect()
}
