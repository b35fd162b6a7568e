//! Oracle access errors.

use crate::error::{CoreError, ErrorSeverity};
use crate::state::UnitId;

/// Errors that occur when accessing collaborator data.
///
/// Missing oracles are fatal: the engine cannot resolve a turn without its
/// damage computation or catalog collaborators.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// DamageOracle is not available in the environment.
    #[error("DamageOracle not available")]
    DamageNotAvailable,

    /// VfxOracle is not available in the environment.
    #[error("VfxOracle not available")]
    VfxNotAvailable,

    /// CatalogOracle is not available in the environment.
    #[error("CatalogOracle not available")]
    CatalogNotAvailable,

    /// Unit template was not found by id.
    #[error("unit template {0} not found")]
    TemplateNotFound(UnitId),
}

impl CoreError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        use OracleError::*;
        match self {
            DamageNotAvailable | VfxNotAvailable | CatalogNotAvailable => ErrorSeverity::Fatal,
            TemplateNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use OracleError::*;
        match self {
            DamageNotAvailable => "ORACLE_DAMAGE_NOT_AVAILABLE",
            VfxNotAvailable => "ORACLE_VFX_NOT_AVAILABLE",
            CatalogNotAvailable => "ORACLE_CATALOG_NOT_AVAILABLE",
            TemplateNotFound(_) => "ORACLE_TEMPLATE_NOT_FOUND",
        }
    }
}
