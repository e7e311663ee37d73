use crate::models::SummaryRecord;
use crate::transform::Transformed;

use super::ServiceError;

/// Result of one dual-write submission.
#[derive(Debug)]
pub enum DualWriteOutcome {
    /// Both stores accepted their record.
    Complete {
        record: SummaryRecord,
        transformed: Transformed,
    },
    /// The content document was stored but the summary record was not.
    Partial {
        content_id: i64,
        transformed: Transformed,
        error: ServiceError,
    },
    /// Nothing reached the record store.
    Failed(ServiceError),
}

impl DualWriteOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    pub fn transformed(&self) -> Option<&Transformed> {
        match self {
            Self::Complete { transformed, .. } | Self::Partial { transformed, .. } => {
                Some(transformed)
            }
            Self::Failed(_) => None,
        }
    }

    pub fn record(&self) -> Option<&SummaryRecord> {
        match self {
            Self::Complete { record, .. } => Some(record),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ServiceError> {
        match self {
            Self::Complete { .. } => None,
            Self::Partial { error, .. } | Self::Failed(error) => Some(error),
        }
    }

    /// One-line message for the user.
    pub fn notification(&self) -> String {
        match self {
            Self::Complete { .. } => "Blog summarized and saved successfully!".to_string(),
            Self::Partial { error, .. } | Self::Failed(error) => error.to_string(),
        }
    }
}
