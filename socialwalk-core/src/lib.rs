//! Socialwalk core library.
//!
//! Builds synthetic two-category social graphs from per-pair Gaussian degree
//! targets and estimates category proportions with random-walk samplers.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod attributes;
mod category;
mod degree;
mod ensemble;
mod error;
mod generate;
mod graph;
mod network;
mod walk;

pub use crate::{
    attributes::{Node, assign_categories, census, male_count},
    category::{Category, CategoryCounts},
    degree::{ConnectionProfile, DegreeDistribution},
    ensemble::{
        Estimate, MetropolisHastingsEnsemble, RandomWalkEnsemble, metropolis_hastings_ensemble,
        mix_walk_seed, random_walk_ensemble,
    },
    error::{
        GraphInvariantCode, GraphInvariantViolation, NetworkError, NetworkErrorCode, Result,
    },
    generate::generate_graph,
    graph::{GraphBuilder, SocialGraph},
    network::{NetworkBuilder, SocialMediaNetwork},
    walk::{
        DeadEndPolicy, WalkConfig,
        metropolis::{
            MetropolisHastings, MetropolisHastingsReport, TransitionRule, TransitionTable,
            metropolis_hastings_walk, transition_table,
        },
        simple::{RandomWalkReport, random_walk},
    },
};
