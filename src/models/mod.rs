//! Data models for LabTrack

pub mod asset;
pub mod asset_type;
pub mod enums;
pub mod issue;
pub mod location;
pub mod movement;
pub mod user;

// Re-export commonly used types
pub use asset::{AssetShort, IndividualAsset};
pub use asset_type::{AssetType, AssetTypeShort};
pub use enums::{ActionType, AssetStatus, IssueStatus, LocationKind};
pub use issue::{Issue, IssueShort};
pub use location::{Location, LocationShort};
pub use movement::{Movement, MovementDetails};
pub use user::{Role, User, UserShort};
