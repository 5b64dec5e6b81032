//! Error taxonomy for model declaration, slot resolution, and merging.
//!
//! Every failure in this crate is local, synchronous, and non-retriable.
//! The variants fall into four categories (see [`ErrorKind`]):
//! declaration-time conflicts that mean the declaring code is wrong,
//! bad-argument query failures, ambiguous resolutions that need an explicit
//! hint, and the merge engine's explicit "cannot safely merge" refusal.

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// All failures produced by the model registry, slot tables, resolver,
/// and merge engine.
// `Display` and `std::error::Error` are implemented by hand below:
// `UnsupportedMerge.source` names a merge-source task, not an error cause,
// which a derived impl would misinterpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A slot path was re-declared on the same transitive slot table.
    /// Only `driver_for` may legally override an existing path.
    DuplicateSlot {
        /// Name of the task model carrying the conflicting declaration.
        task: String,
        /// The full dotted path that was re-declared.
        path: String,
    },

    /// A task model name was declared twice.
    DuplicateTask(String),

    /// A capability name is already registered with a lineage that does not
    /// fulfill the newly requested parent (or provided source).
    IncompatibleModel {
        /// The conflicting capability name.
        name: String,
        /// The parent or provided model the redeclaration asked for.
        parent: String,
    },

    /// A `slave_of` reference named a path that is not declared in the same
    /// or an ancestor slot table.
    UnknownSlaveTarget(String),

    /// A data-source name was claimed after a device reserved it by
    /// declaring `provides: none`.
    ReservedSourceName(String),

    /// No capability model is registered under the given name.
    UnknownModel(String),

    /// No device model is registered under the given name.
    UnknownDevice(String),

    /// No task model is declared under the given name.
    UnknownTask(String),

    /// A query referenced a slot path the task model does not declare.
    UnknownSlot(String),

    /// A resolution hint matched none of the fulfilling slots.
    NoMatchingSlot {
        /// The capability model that was queried.
        model: String,
        /// The hint that failed to narrow the candidates.
        hint: String,
    },

    /// An instance argument needed by a query is not bound.
    UnboundArgument(String),

    /// Both merge sides bind the same argument to different values.
    ConflictingArguments {
        /// The argument name bound on both sides.
        argument: String,
        /// The target instance's value.
        left: String,
        /// The source instance's value.
        right: String,
    },

    /// Resolution found several equally valid slots; the caller must supply
    /// an explicit hint.
    AmbiguousSlot {
        /// The capability model that was queried.
        model: String,
        /// Every candidate path, so the caller can pick one.
        candidates: Vec<String>,
    },

    /// Merging would require reconciling differing data-flow topologies,
    /// which is deliberately unsupported. A policy refusal, not a fault:
    /// callers must treat it as "not mergeable" and keep both instances.
    UnsupportedMerge {
        /// Task model name of the merge target.
        target: String,
        /// Task model name of the merge source.
        source: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateSlot { task, path } => {
                write!(f, "slot path `{path}` is already declared on task model `{task}`")
            }
            Error::DuplicateTask(name) => {
                write!(f, "task model `{name}` is already declared")
            }
            Error::IncompatibleModel { name, parent } => write!(
                f,
                "capability model `{name}` is already registered and does not fulfill `{parent}`"
            ),
            Error::UnknownSlaveTarget(path) => {
                write!(f, "slave_of target `{path}` does not name a declared slot")
            }
            Error::ReservedSourceName(name) => write!(
                f,
                "data-source name `{name}` is reserved by a device declared without a provided source"
            ),
            Error::UnknownModel(name) => {
                write!(f, "no capability model named `{name}` is registered")
            }
            Error::UnknownDevice(name) => {
                write!(f, "no device model named `{name}` is registered")
            }
            Error::UnknownTask(name) => {
                write!(f, "no task model named `{name}` is declared")
            }
            Error::UnknownSlot(path) => {
                write!(f, "task model has no slot at path `{path}`")
            }
            Error::NoMatchingSlot { model, hint } => {
                write!(f, "no slot of capability `{model}` matches hint `{hint}`")
            }
            Error::UnboundArgument(name) => {
                write!(f, "argument `{name}` is not bound on this instance")
            }
            Error::ConflictingArguments { argument, left, right } => write!(
                f,
                "argument `{argument}` is bound to `{left}` on the target and `{right}` on the source"
            ),
            Error::AmbiguousSlot { model, candidates } => write!(
                f,
                "capability `{model}` matches several slots: {}",
                candidates.join(", ")
            ),
            Error::UnsupportedMerge { target, source } => write!(
                f,
                "refusing to merge `{source}` into `{target}`: reconciling differing data-flow connections is not supported"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Coarse category of an [`Error`], used by reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Declaration-time conflict; the declaring code must be fixed.
    Declaration,
    /// Bad reference or unsatisfiable query argument.
    Argument,
    /// Multiple equally valid candidates; an explicit hint is required.
    Ambiguous,
    /// Explicit merge refusal; proceed without merging.
    Unsupported,
}

impl ErrorKind {
    /// Short lowercase label used in reports.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Declaration => "declaration",
            ErrorKind::Argument => "argument",
            ErrorKind::Ambiguous => "ambiguous",
            ErrorKind::Unsupported => "unsupported",
        }
    }
}

impl Error {
    /// The category this error belongs to.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::DuplicateSlot { .. }
            | Error::DuplicateTask(_)
            | Error::IncompatibleModel { .. }
            | Error::UnknownSlaveTarget(_)
            | Error::ReservedSourceName(_) => ErrorKind::Declaration,
            Error::UnknownModel(_)
            | Error::UnknownDevice(_)
            | Error::UnknownTask(_)
            | Error::UnknownSlot(_)
            | Error::NoMatchingSlot { .. }
            | Error::UnboundArgument(_)
            | Error::ConflictingArguments { .. } => ErrorKind::Argument,
            Error::AmbiguousSlot { .. } => ErrorKind::Ambiguous,
            Error::UnsupportedMerge { .. } => ErrorKind::Unsupported,
        }
    }
}
