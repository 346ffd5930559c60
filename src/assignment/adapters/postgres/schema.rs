//! Diesel schema for assignment persistence.

diesel::table! {
    /// Client loan type assignments, partially unique on the active
    /// (client, loan type) pair.
    client_loan_types (id) {
        /// Assignment identifier.
        id -> Uuid,
        /// Owning workspace.
        workspace_id -> Uuid,
        /// The assigned client.
        client_id -> Uuid,
        /// The assigned loan type.
        loan_type_id -> Uuid,
        /// Who performed the assignment.
        assigned_by -> Uuid,
        /// When the assignment was made.
        assigned_at -> Timestamptz,
        /// Whether the assignment is still active.
        is_active -> Bool,
        /// Optional client-facing display position.
        custom_order -> Nullable<Integer>,
        /// Optional free-text notes.
        notes -> Nullable<Text>,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
