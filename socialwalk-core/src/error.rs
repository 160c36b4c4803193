//! Error types for the socialwalk core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{borrow::Cow, fmt};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A structural defect found in an adjacency list.
///
/// Generated graphs never exhibit these; they surface when a caller hands a
/// malformed adjacency list to [`crate::SocialGraph::from_adjacency`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphInvariantViolation {
    /// An edge exists in one direction only.
    #[error("edge {from}->{to} has no reverse edge {to}->{from}")]
    OneWayEdge {
        /// Node whose list contains the edge.
        from: usize,
        /// Node missing the reverse entry.
        to: usize,
    },
    /// A node lists itself as a neighbour.
    #[error("node {node} lists itself as a neighbour")]
    SelfLoop {
        /// The offending node.
        node: usize,
    },
    /// A neighbour appears more than once in the same list.
    #[error("node {node} lists neighbour {neighbor} more than once")]
    DuplicateNeighbor {
        /// Node whose list contains the duplicate.
        node: usize,
        /// The repeated neighbour.
        neighbor: usize,
    },
    /// A neighbour id does not name a node of the graph.
    #[error("node {node} references neighbour {neighbor} outside 0..{node_count}")]
    NeighborOutOfRange {
        /// Node whose list contains the bad id.
        node: usize,
        /// The out-of-range id.
        neighbor: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphInvariantViolation`] variants.
    enum GraphInvariantCode for GraphInvariantViolation {
        /// An edge exists in one direction only.
        OneWayEdge => OneWayEdge { .. } => "GRAPH_ONE_WAY_EDGE",
        /// A node lists itself as a neighbour.
        SelfLoop => SelfLoop { .. } => "GRAPH_SELF_LOOP",
        /// A neighbour appears more than once in the same list.
        DuplicateNeighbor => DuplicateNeighbor { .. } => "GRAPH_DUPLICATE_NEIGHBOR",
        /// A neighbour id does not name a node of the graph.
        NeighborOutOfRange => NeighborOutOfRange { .. } => "GRAPH_NEIGHBOR_OUT_OF_RANGE",
    }
}

/// Error type produced when configuring, generating, or sampling a network.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum NetworkError {
    /// A configuration value was rejected before any work started.
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration {
        /// Human-readable description of the rejected value.
        reason: Cow<'static, str>,
    },
    /// The caller-supplied start node does not exist.
    #[error("start node {node} is not in the graph (node count {node_count})")]
    InvalidStartNode {
        /// The requested start node.
        node: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },
    /// The walk reached a node without neighbours and could not continue.
    #[error("walk stalled at isolated node {node} after {steps_taken} steps")]
    DegenerateWalk {
        /// Node at which the walk stalled.
        node: usize,
        /// Steps completed before the walk stalled.
        steps_taken: usize,
    },
    /// A walk was requested before the graph was generated.
    #[error("the network has not been generated yet")]
    NetworkNotGenerated,
    /// A transition rule returned a value outside `[0, 1]`.
    #[error("transition rule returned {value} for {current}->{candidate}; expected a value in [0, 1]")]
    InvalidTransitionProbability {
        /// Node the walk was leaving.
        current: usize,
        /// Proposed neighbour.
        candidate: usize,
        /// The rejected value.
        value: f64,
    },
    /// A supplied adjacency list violated a structural invariant.
    #[error(transparent)]
    GraphInvariant(#[from] GraphInvariantViolation),
}

define_error_codes! {
    /// Stable codes describing [`NetworkError`] variants.
    enum NetworkErrorCode for NetworkError {
        /// A configuration value was rejected before any work started.
        InvalidConfiguration => InvalidConfiguration { .. } => "NETWORK_INVALID_CONFIGURATION",
        /// The caller-supplied start node does not exist.
        InvalidStartNode => InvalidStartNode { .. } => "NETWORK_INVALID_START_NODE",
        /// The walk reached a node without neighbours and could not continue.
        DegenerateWalk => DegenerateWalk { .. } => "NETWORK_DEGENERATE_WALK",
        /// A walk was requested before the graph was generated.
        NotGenerated => NetworkNotGenerated => "NETWORK_NOT_GENERATED",
        /// A transition rule returned a value outside `[0, 1]`.
        InvalidTransitionProbability => InvalidTransitionProbability { .. } => "NETWORK_INVALID_TRANSITION_PROBABILITY",
        /// A supplied adjacency list violated a structural invariant.
        GraphInvariantFailure => GraphInvariant(..) => "NETWORK_GRAPH_INVARIANT",
    }
}

impl NetworkError {
    /// Retrieve the inner [`GraphInvariantCode`] when the error originated in
    /// graph validation.
    #[must_use]
    pub const fn graph_invariant_code(&self) -> Option<GraphInvariantCode> {
        match self {
            Self::GraphInvariant(violation) => Some(violation.code()),
            _ => None,
        }
    }

    pub(crate) fn invalid_configuration(reason: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, NetworkError>;
