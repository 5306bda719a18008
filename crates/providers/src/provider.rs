//! The `ContentProvider` capability contract (spec §4.3, §9 duck-typed
//! providers → capability set).

use multiverse_domain::RealmData;

use crate::error::ProviderError;
use crate::realm_spec::RealmSpec;

/// Any type exposing these two methods can be registered with `BigBang`.
/// Selection is by priority and `can_generate_realm`, never by identity, so
/// this is a plain trait rather than a closed enum of provider kinds.
pub trait ContentProvider: Send + Sync {
    fn can_generate_realm(&self, spec: &RealmSpec) -> bool;

    fn generate_realm_content(&self, spec: &RealmSpec) -> Result<RealmData, ProviderError>;
}
