//! Model training: per-label tree ensembles, cross-validated grid search,
//! evaluation, and the persisted artifact.
//!
//! The training path: `train_test_split`, then `TfidfVectorizer::fit` on
//! the training split, a [`trainer::GridSearch`] over a small
//! hyperparameter grid, a refit of the winning
//! [`multioutput::MultiOutputForest`] on the full training split,
//! [`evaluate`] on the held-out split, and an [`artifact::ModelArtifact`]
//! save.

pub mod artifact;
pub mod evaluate;
pub mod forest;
pub mod multioutput;
pub mod selection;
pub mod trainer;
pub mod tree;

pub use artifact::ModelArtifact;
pub use evaluate::{LabelReport, evaluate, format_report};
pub use forest::RandomForestClassifier;
pub use multioutput::{LabelMatrix, MultiOutputForest};
pub use selection::{KFold, train_test_split};
pub use trainer::{GridSearch, GridSearchOutcome, HyperParams, ParamGrid};
pub use tree::DecisionTreeClassifier;
