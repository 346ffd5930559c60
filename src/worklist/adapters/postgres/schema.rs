//! Diesel schema for client task persistence.

diesel::table! {
    /// Materialized client tasks with the template snapshot flattened into
    /// columns; snapshot columns are written once and never updated.
    client_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning workspace.
        workspace_id -> Uuid,
        /// Owning assignment.
        client_loan_type_id -> Uuid,
        /// Originating template.
        template_id -> Uuid,
        /// Copied display title.
        #[max_length = 255]
        title -> Varchar,
        /// Copied instructions.
        instructions -> Text,
        /// Copied assignee role.
        #[max_length = 50]
        assignee_role -> Varchar,
        /// Copied required flag.
        is_required -> Bool,
        /// Copied due offset in calendar days.
        due_in_days -> Integer,
        /// Copied document proof flag.
        document_proof_required -> Bool,
        /// Copied urgency.
        #[max_length = 50]
        priority -> Varchar,
        /// Copied materialization sequence position.
        task_order -> Integer,
        /// Absolute due date.
        due_date -> Timestamptz,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Routed assignee.
        assigned_to -> Nullable<Uuid>,
        /// Free-text client notes.
        client_notes -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
