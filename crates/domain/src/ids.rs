use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Universe-scoped identifiers
define_id!(UniverseId);
define_id!(PlayerId);
define_id!(FactionId);

/// Entities carry a human-chosen, stable string id rather than a `Uuid`
/// newtype: the spec fixes the id format (`"npc_{realm_id}_{entity_id}"`,
/// a `type` prefix like `"npc_"`/`"district_"`) and requires providers to
/// mint ids deterministically from the seed, which a random `Uuid` can't do.
pub type EntityId = String;

/// Realms are identified the same way (`"overworld"`, `"tavern"`, ...).
pub type RealmId = String;
