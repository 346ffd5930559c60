//! Diesel schema for catalog persistence.

diesel::table! {
    /// Loan type definitions, indexed by workspace.
    loan_types (id) {
        /// Loan type identifier.
        id -> Uuid,
        /// Owning workspace.
        workspace_id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Optional product category label.
        #[max_length = 255]
        category -> Nullable<Varchar>,
        /// Ordered workflow stage labels.
        stages -> Jsonb,
        /// Availability status.
        #[max_length = 50]
        status -> Varchar,
        /// Optional loan amount bounds payload.
        amount_range -> Nullable<Jsonb>,
        /// Optional interest rate bounds payload.
        rate_range -> Nullable<Jsonb>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task template definitions, indexed by workspace and unique per
    /// workspace on the case-folded title.
    task_templates (id) {
        /// Template identifier.
        id -> Uuid,
        /// Owning workspace.
        workspace_id -> Uuid,
        /// Display title.
        #[max_length = 255]
        title -> Varchar,
        /// Case-folded title uniqueness key.
        #[max_length = 255]
        title_key -> Varchar,
        /// Role the materialized task is routed to.
        #[max_length = 50]
        assignee_role -> Varchar,
        /// Free-text instructions.
        instructions -> Text,
        /// Whether the step may be skipped.
        is_required -> Bool,
        /// Due offset in calendar days.
        due_in_days -> Integer,
        /// Whether proof-of-document upload is expected.
        document_proof_required -> Bool,
        /// Task urgency.
        #[max_length = 50]
        priority -> Varchar,
        /// Materialization sequence position.
        task_order -> Integer,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Many-to-many join between templates and loan types.
    template_associations (template_id, loan_type_id) {
        /// Associated template.
        template_id -> Uuid,
        /// Associated loan type.
        loan_type_id -> Uuid,
    }
}

diesel::allow_tables_to_appear_in_same_query!(loan_types, task_templates, template_associations);
