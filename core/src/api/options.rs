//! Configuration options for boundary planning.
//!
//! A [`RuntimeProfile`] describes the carriers one runtime uses for the
//! shapes whose representation differs between the two runtimes. The
//! planner compares the host and native profiles to decide which shapes
//! need a conversion.

use serde::Serialize;

/// Carrier used for records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordCarrier {
    /// Object keyed by field name: `{x: 1, y: 2}`.
    Keyed,
    /// Array in declared field order: `[1, 2]`.
    Positional,
}

/// Carrier used for variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VariantCarrier {
    /// Nullary constructors as their name, payload constructors as
    /// `{tag: name, value: payload}`.
    Tagged,
    /// Nullary constructors as their index among nullary constructors,
    /// payload constructors as a block tagged with their index among
    /// payload constructors.
    Indexed,
}

/// Carriers of one runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RuntimeProfile {
    pub records: RecordCarrier,
    pub variants: VariantCarrier,
}

impl RuntimeProfile {
    /// The host runtime (plain JS objects and string tags).
    pub const HOST: RuntimeProfile = RuntimeProfile {
        records: RecordCarrier::Keyed,
        variants: VariantCarrier::Tagged,
    };

    /// The native functional runtime (arrays and integer tags).
    pub const NATIVE: RuntimeProfile = RuntimeProfile {
        records: RecordCarrier::Positional,
        variants: VariantCarrier::Indexed,
    };
}

/// What to do with a `ref` whose contents need conversion.
///
/// Converting the contents of a box means building a new box, which the
/// other side can observe as a different box. Either way the break is never
/// silent: it is planned with a warning or refused outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum RefIdentityPolicy {
    /// Plan `RebuildBox` and attach a warning to the declaration.
    #[default]
    AllowRebuild,
    /// Refuse to plan such refs (`UnsupportedTypeError`). Declare the
    /// contents opaque to keep one box on both sides.
    Preserve,
}

/// Configuration options for the conversion planner.
///
/// # Example
///
/// ```
/// use boundary_core::api::{PlannerOptions, RecordCarrier, RefIdentityPolicy, RuntimeProfile};
///
/// let options = PlannerOptions {
///     native: RuntimeProfile {
///         records: RecordCarrier::Keyed,
///         ..RuntimeProfile::NATIVE
///     },
///     ref_identity: RefIdentityPolicy::Preserve,
///     ..PlannerOptions::default()
/// };
/// assert_eq!(options.host, RuntimeProfile::HOST);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PlannerOptions {
    /// Carriers of the host runtime.
    ///
    /// Default: `RuntimeProfile::HOST`
    pub host: RuntimeProfile,

    /// Carriers of the native runtime.
    ///
    /// Default: `RuntimeProfile::NATIVE`
    pub native: RuntimeProfile,

    /// Default: `RefIdentityPolicy::AllowRebuild`
    pub ref_identity: RefIdentityPolicy,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            host: RuntimeProfile::HOST,
            native: RuntimeProfile::NATIVE,
            ref_identity: RefIdentityPolicy::default(),
        }
    }
}

/// Configuration options for analyzing a batch of modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BatchOptions {
    pub planner: PlannerOptions,

    /// Analyze modules on the rayon thread pool.
    ///
    /// Default: true
    pub parallel: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            planner: PlannerOptions::default(),
            parallel: true,
        }
    }
}
