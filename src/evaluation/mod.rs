mod harness;
mod recommenders;

pub use harness::{CandidateReport, EvaluationHarness};
pub use recommenders::{
    CandidateRecommender, CosineRecommender, PopularityRecommender, RandomRecommender,
};
