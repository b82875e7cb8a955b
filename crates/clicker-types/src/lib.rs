//! Shared type definitions for the clicker game backend.
//!
//! This crate is the single source of truth for all types used across the
//! workspace. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for the game client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Booster kind enumerations
//! - [`records`] -- Storage-shaped records (profile, catalogs, grants)
//! - [`dto`] -- Wire DTOs for the game API (camelCase JSON)

pub mod dto;
pub mod enums;
pub mod ids;
pub mod records;

// Re-export all public types at crate root for convenience.
pub use dto::{
    BoosterWithContext, DailyBoosterWithContext, GameContext, SyncRequest, UpgradeRequest,
};
pub use enums::{BoosterType, DailyBoosterType};
pub use ids::{AccountId, BoosterId, DailyBoosterId, ProfileId, UserBoosterId};
pub use records::{
    BoosterDefinition, DailyBoosterDefinition, DailyBoosterGrant, DailyBoosterStatus, GameProfile,
    OwnedBoosterLevel, UserBoosterLevel,
};

#[cfg(test)]
mod tests {
    //! Integration tests for type exports and `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. Importing them here triggers generation.
        // The actual files are written to the `bindings/` directory
        // relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::AccountId::export_all();
        let _ = crate::ids::ProfileId::export_all();
        let _ = crate::ids::BoosterId::export_all();
        let _ = crate::ids::DailyBoosterId::export_all();
        let _ = crate::ids::UserBoosterId::export_all();

        // Enums
        let _ = crate::enums::BoosterType::export_all();
        let _ = crate::enums::DailyBoosterType::export_all();

        // Records
        let _ = crate::records::GameProfile::export_all();
        let _ = crate::records::BoosterDefinition::export_all();
        let _ = crate::records::UserBoosterLevel::export_all();
        let _ = crate::records::DailyBoosterDefinition::export_all();
        let _ = crate::records::DailyBoosterGrant::export_all();

        // DTOs
        let _ = crate::dto::GameContext::export_all();
        let _ = crate::dto::BoosterWithContext::export_all();
        let _ = crate::dto::DailyBoosterWithContext::export_all();
        let _ = crate::dto::SyncRequest::export_all();
        let _ = crate::dto::UpgradeRequest::export_all();
    }
}
