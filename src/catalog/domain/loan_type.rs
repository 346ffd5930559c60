//! Loan type aggregate root and its value objects.

use super::{CatalogDomainError, LoanTypeId, ParseLoanTypeStatusError};
use crate::workspace::domain::WorkspaceId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Loan type availability status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanTypeStatus {
    /// Loan type is available for new client assignments.
    Active,
    /// Loan type has been retired; existing assignments remain intact.
    Inactive,
}

impl LoanTypeStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl TryFrom<&str> for LoanTypeStatus {
    type Error = ParseLoanTypeStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseLoanTypeStatusError(value.to_owned())),
        }
    }
}

/// Inclusive loan amount bounds in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountRange {
    min_minor: i64,
    max_minor: i64,
}

impl AmountRange {
    /// Creates validated amount bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidAmountRange`] when a bound is
    /// negative or the minimum exceeds the maximum.
    pub const fn new(min_minor: i64, max_minor: i64) -> Result<Self, CatalogDomainError> {
        if min_minor < 0 || min_minor > max_minor {
            return Err(CatalogDomainError::InvalidAmountRange {
                min_minor,
                max_minor,
            });
        }
        Ok(Self {
            min_minor,
            max_minor,
        })
    }

    /// Returns the lower bound in minor currency units.
    #[must_use]
    pub const fn min_minor(self) -> i64 {
        self.min_minor
    }

    /// Returns the upper bound in minor currency units.
    #[must_use]
    pub const fn max_minor(self) -> i64 {
        self.max_minor
    }
}

/// Inclusive interest rate bounds in basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRange {
    min_bps: u32,
    max_bps: u32,
}

impl RateRange {
    /// Creates validated rate bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::InvalidRateRange`] when the minimum
    /// exceeds the maximum.
    pub const fn new(min_bps: u32, max_bps: u32) -> Result<Self, CatalogDomainError> {
        if min_bps > max_bps {
            return Err(CatalogDomainError::InvalidRateRange { min_bps, max_bps });
        }
        Ok(Self { min_bps, max_bps })
    }

    /// Returns the lower bound in basis points.
    #[must_use]
    pub const fn min_bps(self) -> u32 {
        self.min_bps
    }

    /// Returns the upper bound in basis points.
    #[must_use]
    pub const fn max_bps(self) -> u32 {
        self.max_bps
    }
}

/// Loan type aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanType {
    id: LoanTypeId,
    workspace_id: WorkspaceId,
    name: String,
    description: Option<String>,
    category: Option<String>,
    stages: Vec<String>,
    status: LoanTypeStatus,
    amount_range: Option<AmountRange>,
    rate_range: Option<RateRange>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for creating a loan type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLoanType {
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Display name; must be non-empty after trimming.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional product category label.
    pub category: Option<String>,
    /// Ordered display-only workflow stage labels; must be non-empty.
    pub stages: Vec<String>,
    /// Optional loan amount bounds.
    pub amount_range: Option<AmountRange>,
    /// Optional interest rate bounds.
    pub rate_range: Option<RateRange>,
}

/// Field-level patch applied to an existing loan type.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanTypeUpdate {
    /// Replacement display name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement category label.
    pub category: Option<String>,
    /// Replacement stage list; must be non-empty.
    pub stages: Option<Vec<String>>,
    /// Replacement availability status.
    pub status: Option<LoanTypeStatus>,
    /// Replacement amount bounds.
    pub amount_range: Option<AmountRange>,
    /// Replacement rate bounds.
    pub rate_range: Option<RateRange>,
}

/// Parameter object for reconstructing a persisted loan type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLoanTypeData {
    /// Persisted identifier.
    pub id: LoanTypeId,
    /// Owning workspace.
    pub workspace_id: WorkspaceId,
    /// Persisted display name.
    pub name: String,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted category label.
    pub category: Option<String>,
    /// Persisted stage labels.
    pub stages: Vec<String>,
    /// Persisted availability status.
    pub status: LoanTypeStatus,
    /// Persisted amount bounds.
    pub amount_range: Option<AmountRange>,
    /// Persisted rate bounds.
    pub rate_range: Option<RateRange>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl LoanType {
    /// Creates a new active loan type after validating its fields.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when the name is empty, the stage list
    /// is empty, or a stage label is blank.
    pub fn create(data: NewLoanType, clock: &impl Clock) -> Result<Self, CatalogDomainError> {
        let name = validate_name(data.name)?;
        let stages = validate_stages(data.stages)?;
        let timestamp = clock.utc();

        Ok(Self {
            id: LoanTypeId::new(),
            workspace_id: data.workspace_id,
            name,
            description: data.description,
            category: data.category,
            stages,
            status: LoanTypeStatus::Active,
            amount_range: data.amount_range,
            rate_range: data.rate_range,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a loan type from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedLoanTypeData) -> Self {
        Self {
            id: data.id,
            workspace_id: data.workspace_id,
            name: data.name,
            description: data.description,
            category: data.category,
            stages: data.stages,
            status: data.status,
            amount_range: data.amount_range,
            rate_range: data.rate_range,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the loan type identifier.
    #[must_use]
    pub const fn id(&self) -> LoanTypeId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the category label, if any.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Returns the ordered workflow stage labels.
    #[must_use]
    pub fn stages(&self) -> &[String] {
        &self.stages
    }

    /// Returns the availability status.
    #[must_use]
    pub const fn status(&self) -> LoanTypeStatus {
        self.status
    }

    /// Returns the loan amount bounds, if any.
    #[must_use]
    pub const fn amount_range(&self) -> Option<AmountRange> {
        self.amount_range
    }

    /// Returns the interest rate bounds, if any.
    #[must_use]
    pub const fn rate_range(&self) -> Option<RateRange> {
        self.rate_range
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a field-level patch, revalidating changed fields.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError`] when a replacement name or stage list
    /// fails validation; the aggregate is left unchanged on error.
    pub fn apply_update(
        &mut self,
        update: LoanTypeUpdate,
        clock: &impl Clock,
    ) -> Result<(), CatalogDomainError> {
        let validated_name = update.name.map(validate_name).transpose()?;
        let validated_stages = update.stages.map(validate_stages).transpose()?;

        if let Some(name) = validated_name {
            self.name = name;
        }
        if let Some(stages) = validated_stages {
            self.stages = stages;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(category) = update.category {
            self.category = Some(category);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(amount_range) = update.amount_range {
            self.amount_range = Some(amount_range);
        }
        if let Some(rate_range) = update.rate_range {
            self.rate_range = Some(rate_range);
        }
        self.updated_at = clock.utc();
        Ok(())
    }
}

fn validate_name(raw: String) -> Result<String, CatalogDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CatalogDomainError::EmptyLoanTypeName);
    }
    Ok(trimmed.to_owned())
}

fn validate_stages(raw: Vec<String>) -> Result<Vec<String>, CatalogDomainError> {
    if raw.is_empty() {
        return Err(CatalogDomainError::EmptyStageList);
    }
    raw.into_iter()
        .map(|stage| {
            let trimmed = stage.trim();
            if trimmed.is_empty() {
                return Err(CatalogDomainError::EmptyStageLabel);
            }
            Ok(trimmed.to_owned())
        })
        .collect()
}
