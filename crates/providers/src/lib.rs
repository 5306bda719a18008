//! Pluggable content providers that turn a `RealmSpec` into a populated
//! `RealmData` (spec C3). Providers never register themselves or carry
//! priority — that's `BigBang`'s job in `multiverse-engine`.

pub mod arcade2d;
pub mod custom;
pub mod error;
pub mod procedural3d;
pub mod provider;
pub mod realm_spec;

pub use arcade2d::Arcade2DProvider;
pub use custom::CustomProvider;
pub use error::ProviderError;
pub use procedural3d::Procedural3DProvider;
pub use provider::ContentProvider;
pub use realm_spec::RealmSpec;
