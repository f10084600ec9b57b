//! Training-side interface (spec §6): a thin wrapper over CRFsuite's
//! trainer, fixed to the hyperparameters this crate standardizes on.
//! Gated behind the `train` feature so the default build never links
//! training-only CRFsuite entry points.

use super::build_attributes;
use crate::error::Error;
use crate::features::LineFeatures;
use crate::model::Label;
use std::path::Path;

/// Supported CRFsuite training algorithms (spec §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Lbfgs,
    L2sgd,
    AveragedPerceptron,
    PassiveAggressive,
    Arow,
}

impl Algorithm {
    fn as_str(self) -> &'static str {
        match self {
            Algorithm::Lbfgs => "lbfgs",
            Algorithm::L2sgd => "l2sgd",
            Algorithm::AveragedPerceptron => "ap",
            Algorithm::PassiveAggressive => "pa",
            Algorithm::Arow => "arow",
        }
    }
}

/// One labeled training sequence: the feature vectors and gold labels for
/// every content line of an email, in document order.
#[derive(Debug, Clone)]
pub struct TrainingSequence {
    pub features: Vec<LineFeatures>,
    pub labels: Vec<Label>,
}

/// Accumulates training sequences and drives CRFsuite's trainer with the
/// fixed hyperparameters from spec §6: `c1=0.1`, `c2=0.1`,
/// `max_iterations=100`, `all_possible_transitions=true`.
pub struct CrfTrainer {
    trainer: crfsuite::Trainer,
    sequence_count: usize,
}

impl CrfTrainer {
    pub fn new(algorithm: Algorithm) -> Result<Self, Error> {
        let mut trainer = crfsuite::Trainer::new(false);
        trainer
            .select(algorithm.as_str(), "crf1d")
            .map_err(|e| Error::ModelTrain(format!("algorithm selection failed: {e}")))?;
        trainer
            .set("c1", "0.1")
            .map_err(|e| Error::ModelTrain(format!("setting c1 failed: {e}")))?;
        trainer
            .set("c2", "0.1")
            .map_err(|e| Error::ModelTrain(format!("setting c2 failed: {e}")))?;
        trainer
            .set("max_iterations", "100")
            .map_err(|e| Error::ModelTrain(format!("setting max_iterations failed: {e}")))?;
        trainer
            .set("feature.possible_transitions", "1")
            .map_err(|e| Error::ModelTrain(format!("setting possible_transitions failed: {e}")))?;

        Ok(Self {
            trainer,
            sequence_count: 0,
        })
    }

    /// Appends one gold-labeled sequence to the training set.
    pub fn add_sequence(&mut self, sequence: &TrainingSequence) -> Result<(), Error> {
        debug_assert_eq!(sequence.features.len(), sequence.labels.len());
        let total = sequence.features.len();
        let xseq: Vec<Vec<crfsuite::Attribute>> = sequence
            .features
            .iter()
            .enumerate()
            .map(|(i, f)| build_attributes(f, i, total))
            .collect();
        let yseq: Vec<String> = sequence.labels.iter().map(|l| l.as_str().to_string()).collect();

        self.trainer
            .append(&xseq, &yseq, 0)
            .map_err(|e| Error::ModelTrain(format!("appending sequence failed: {e}")))?;
        self.sequence_count += 1;
        Ok(())
    }

    pub fn sequence_count(&self) -> usize {
        self.sequence_count
    }

    /// Runs L-BFGS (or the selected algorithm) and writes the trained
    /// model to `output_path`.
    pub fn train(&mut self, output_path: impl AsRef<Path>) -> Result<(), Error> {
        let path = output_path.as_ref();
        let path_str = path
            .to_str()
            .ok_or_else(|| Error::ModelTrain(format!("non-UTF-8 output path: {}", path.display())))?;

        log::info!(
            "crf_trainer: training on {} sequences, writing to {}",
            self.sequence_count,
            path_str
        );

        self.trainer
            .train(path_str, -1)
            .map_err(|e| Error::ModelTrain(format!("training failed: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_match_crfsuite_identifiers() {
        assert_eq!(Algorithm::Lbfgs.as_str(), "lbfgs");
        assert_eq!(Algorithm::L2sgd.as_str(), "l2sgd");
        assert_eq!(Algorithm::AveragedPerceptron.as_str(), "ap");
        assert_eq!(Algorithm::PassiveAggressive.as_str(), "pa");
        assert_eq!(Algorithm::Arow.as_str(), "arow");
    }
}
