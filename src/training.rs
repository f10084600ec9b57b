//! Training-data ingestion (spec §4.13): reads newline-delimited JSON
//! records, each a gold-labeled email, and turns them into
//! [`TrainingSequence`](crate::crf::train::TrainingSequence) values ready
//! for [`CrfTrainer::add_sequence`](crate::crf::train::CrfTrainer::add_sequence).
//!
//! Gated behind the `train` feature: ordinary extraction never touches
//! training data.

use crate::content_filter::filter_content;
use crate::crf::train::TrainingSequence;
use crate::error::Error;
use crate::features::extract_features;
use crate::model::Label;
use crate::normalize;
use crate::structural::analyze_structure;
use serde::Deserialize;
use std::io::BufRead;
use std::path::Path;

/// A single gold-labeled content line within a [`TrainingRecord`].
#[derive(Debug, Clone, Deserialize)]
struct TrainingLine {
    #[allow(dead_code)]
    text: String,
    label: String,
}

/// One line of a training JSONL file: the raw email text plus a gold label
/// for every content line derived from it (blank lines are excluded from
/// `lines`, matching the content lines the pipeline itself produces), plus
/// caller-defined metadata that this loader does not interpret.
#[derive(Debug, Clone, Deserialize)]
struct TrainingRecord {
    email_text: String,
    lines: Vec<TrainingLine>,
    #[serde(default)]
    #[allow(dead_code)]
    metadata: serde_json::Value,
}

/// Loads a training JSONL file (one [`TrainingRecord`] per line) and runs
/// each record's `email_text` through the normalizer, content filter,
/// structural analyzer, and feature extractor, pairing the resulting
/// feature vectors with the record's gold `lines` labels.
///
/// # Errors
/// Returns an error for malformed JSON, a `lines` array whose length
/// doesn't match the record's content line count, or an unrecognized label
/// tag.
pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Vec<TrainingSequence>, Error> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(Error::Io)?;
    let reader = std::io::BufReader::new(file);

    let mut sequences = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(Error::Io)?;
        if line.trim().is_empty() {
            continue;
        }

        let record: TrainingRecord = serde_json::from_str(&line).map_err(|e| {
            Error::TrainingData(format!("{}:{}: invalid JSON: {e}", path.display(), line_no + 1))
        })?;

        sequences.push(record_to_sequence(&record, path, line_no + 1)?);
    }

    log::info!("training: loaded {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

fn record_to_sequence(
    record: &TrainingRecord,
    path: &Path,
    line_no: usize,
) -> Result<TrainingSequence, Error> {
    let email = normalize::normalize(&record.email_text)
        .map_err(|e| Error::TrainingData(format!("{}:{line_no}: {e}", path.display())))?;
    let filtered = filter_content(&email);
    let analysis = analyze_structure(&filtered.content_lines);
    let features = extract_features(&analysis.lines);

    if analysis.lines.len() != record.lines.len() {
        return Err(Error::TrainingData(format!(
            "{}:{line_no}: {} content lines but {} gold lines",
            path.display(),
            analysis.lines.len(),
            record.lines.len()
        )));
    }

    let labels: Result<Vec<Label>, Error> = record
        .lines
        .iter()
        .map(|gold| {
            Label::from_str(&gold.label).ok_or_else(|| {
                Error::TrainingData(format!(
                    "{}:{line_no}: unknown label tag '{}'",
                    path.display(),
                    gold.label
                ))
            })
        })
        .collect();

    Ok(TrainingSequence {
        features,
        labels: labels?,
    })
}
