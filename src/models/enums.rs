//! Shared domain enums and the status/location rule tables
//!
//! Every closed set in the data model lives here, together with the two pure
//! lookups that govern asset placement: `resting_status` (which status an
//! asset must have while it sits at a location of a given kind) and
//! `status_for_destination` (which status a moved asset takes on). Both the
//! intake path and the transfer path consult the same tables so the rules
//! cannot drift apart.

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, Postgres};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// LocationKind
// ---------------------------------------------------------------------------

/// Physical location categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum LocationKind {
    Lab,
    MainStore,
    Stock,
    Room,
    Scrap,
}

impl LocationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationKind::Lab => "lab",
            LocationKind::MainStore => "mainStore",
            LocationKind::Stock => "stock",
            LocationKind::Room => "room",
            LocationKind::Scrap => "scrap",
        }
    }

    /// Stock-keeping locations are the only ones watched for low stock.
    pub fn is_store(&self) -> bool {
        matches!(self, LocationKind::Stock | LocationKind::MainStore)
    }
}

impl std::fmt::Display for LocationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LocationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lab" => Ok(LocationKind::Lab),
            "mainStore" => Ok(LocationKind::MainStore),
            "stock" => Ok(LocationKind::Stock),
            "room" => Ok(LocationKind::Room),
            "scrap" => Ok(LocationKind::Scrap),
            _ => Err(format!("Invalid location kind: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// AssetStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of an individual asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AssetStatus {
    InUse,
    InStock,
    Discarded,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::InUse => "inUse",
            AssetStatus::InStock => "inStock",
            AssetStatus::Discarded => "discarded",
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inUse" => Ok(AssetStatus::InUse),
            "inStock" => Ok(AssetStatus::InStock),
            "discarded" => Ok(AssetStatus::Discarded),
            _ => Err(format!("Invalid asset status: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// Movement action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    Transfer,
    Discard,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Transfer => "transfer",
            ActionType::Discard => "discard",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transfer" => Ok(ActionType::Transfer),
            "discard" => Ok(ActionType::Discard),
            _ => Err(format!("Invalid action type: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// IssueStatus
// ---------------------------------------------------------------------------

/// Issue lifecycle states (created -> inProgress -> solved, solved terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum IssueStatus {
    Created,
    InProgress,
    Solved,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::Created => "created",
            IssueStatus::InProgress => "inProgress",
            IssueStatus::Solved => "solved",
        }
    }

    /// The issue transition table. Total over all state pairs; everything
    /// not listed is rejected, including self transitions.
    pub fn can_transition_to(self, next: IssueStatus) -> bool {
        matches!(
            (self, next),
            (IssueStatus::Created, IssueStatus::InProgress)
                | (IssueStatus::InProgress, IssueStatus::Solved)
        )
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created" => Ok(IssueStatus::Created),
            "inProgress" => Ok(IssueStatus::InProgress),
            "solved" => Ok(IssueStatus::Solved),
            _ => Err(format!("Invalid issue status: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Placement rules
// ---------------------------------------------------------------------------

/// The status every asset must hold while resting at a location of `kind`.
///
/// Invariant: `discarded <=> scrap`, `inStock <=> stock | mainStore`,
/// `inUse` everywhere else.
pub fn resting_status(kind: LocationKind) -> AssetStatus {
    match kind {
        LocationKind::Scrap => AssetStatus::Discarded,
        LocationKind::Stock | LocationKind::MainStore => AssetStatus::InStock,
        LocationKind::Lab | LocationKind::Room => AssetStatus::InUse,
    }
}

/// Status assigned to every asset in a movement batch, as a pure function of
/// the action and the destination kind.
pub fn status_for_destination(action: ActionType, destination: LocationKind) -> AssetStatus {
    match (action, destination) {
        (ActionType::Discard, _) | (_, LocationKind::Scrap) => AssetStatus::Discarded,
        (_, kind) => resting_status(kind),
    }
}

// ---------------------------------------------------------------------------
// SQLx conversions (all enums are stored as their camelCase text slug)
// ---------------------------------------------------------------------------

macro_rules! impl_slug_sqlx {
    ($ty:ty) => {
        impl sqlx::Type<Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<Postgres>>::type_info()
            }
        }

        impl<'r> Decode<'r, Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = Decode::<Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl Encode<'_, Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
            }
        }
    };
}

impl_slug_sqlx!(LocationKind);
impl_slug_sqlx!(AssetStatus);
impl_slug_sqlx!(ActionType);
impl_slug_sqlx!(IssueStatus);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_status_matches_location_kind() {
        assert_eq!(resting_status(LocationKind::Scrap), AssetStatus::Discarded);
        assert_eq!(resting_status(LocationKind::Stock), AssetStatus::InStock);
        assert_eq!(resting_status(LocationKind::MainStore), AssetStatus::InStock);
        assert_eq!(resting_status(LocationKind::Lab), AssetStatus::InUse);
        assert_eq!(resting_status(LocationKind::Room), AssetStatus::InUse);
    }

    #[test]
    fn discard_always_yields_discarded() {
        for kind in [
            LocationKind::Lab,
            LocationKind::MainStore,
            LocationKind::Stock,
            LocationKind::Room,
            LocationKind::Scrap,
        ] {
            assert_eq!(
                status_for_destination(ActionType::Discard, kind),
                AssetStatus::Discarded
            );
        }
    }

    #[test]
    fn transfer_status_follows_destination_kind() {
        assert_eq!(
            status_for_destination(ActionType::Transfer, LocationKind::Stock),
            AssetStatus::InStock
        );
        assert_eq!(
            status_for_destination(ActionType::Transfer, LocationKind::MainStore),
            AssetStatus::InStock
        );
        assert_eq!(
            status_for_destination(ActionType::Transfer, LocationKind::Lab),
            AssetStatus::InUse
        );
        assert_eq!(
            status_for_destination(ActionType::Transfer, LocationKind::Room),
            AssetStatus::InUse
        );
        // A transfer into scrap is rejected upstream, but the table still
        // maps it to discarded so the invariant cannot be broken.
        assert_eq!(
            status_for_destination(ActionType::Transfer, LocationKind::Scrap),
            AssetStatus::Discarded
        );
    }

    #[test]
    fn issue_transitions_follow_the_table() {
        assert!(IssueStatus::Created.can_transition_to(IssueStatus::InProgress));
        assert!(IssueStatus::InProgress.can_transition_to(IssueStatus::Solved));

        assert!(!IssueStatus::Created.can_transition_to(IssueStatus::Solved));
        assert!(!IssueStatus::Solved.can_transition_to(IssueStatus::Created));
        assert!(!IssueStatus::Solved.can_transition_to(IssueStatus::InProgress));
        assert!(!IssueStatus::InProgress.can_transition_to(IssueStatus::Created));
    }

    #[test]
    fn no_self_transitions() {
        for status in [IssueStatus::Created, IssueStatus::InProgress, IssueStatus::Solved] {
            assert!(!status.can_transition_to(status));
        }
    }

    #[test]
    fn slugs_round_trip() {
        assert_eq!("mainStore".parse::<LocationKind>().unwrap(), LocationKind::MainStore);
        assert_eq!(LocationKind::MainStore.as_str(), "mainStore");
        assert_eq!("inStock".parse::<AssetStatus>().unwrap(), AssetStatus::InStock);
        assert_eq!("inProgress".parse::<IssueStatus>().unwrap(), IssueStatus::InProgress);
        assert!("mainstore".parse::<LocationKind>().is_err());
    }
}
