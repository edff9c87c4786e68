use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::couples::CoupleIndex;
use crate::model::error::AffinityError;
use crate::model::matrix::IdentityMatrix;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate user id: {0}")]
    DuplicateUser(String),
    #[error("couple {couple} references unknown user {user}")]
    UnknownUser { couple: String, user: String },
    #[error(transparent)]
    Affinity(#[from] AffinityError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScores {
    pub id: String,
    pub scores: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupleEntry {
    pub id: String,
    pub users: (String, String),
}

/// Completed score samples per user plus the couple pairing, in file order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub users: Vec<UserScores>,
    pub couples: Vec<CoupleEntry>,
}

#[derive(Debug, Clone)]
pub struct PreparedInput {
    pub user_ids: Vec<String>,
    pub identity: IdentityMatrix,
    pub couples: Vec<CoupleIndex>,
    pub labels: Vec<String>,
}

pub fn load_dataset(path: &Path) -> Result<Dataset, InputError> {
    let raw = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset: Dataset = serde_json::from_str(&raw).map_err(|source| InputError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        users = dataset.users.len(),
        couples = dataset.couples.len(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Maps user ids to matrix rows and couple ids to index pairs.
pub fn prepare_input(dataset: &Dataset) -> Result<PreparedInput, InputError> {
    let mut row_by_id = HashMap::with_capacity(dataset.users.len());
    for (row, user) in dataset.users.iter().enumerate() {
        if row_by_id.insert(user.id.as_str(), row).is_some() {
            return Err(InputError::DuplicateUser(user.id.clone()));
        }
    }

    let rows = dataset
        .users
        .iter()
        .map(|u| u.scores.clone())
        .collect::<Vec<_>>();
    let identity = IdentityMatrix::from_rows(&rows)?;

    let mut couples = Vec::with_capacity(dataset.couples.len());
    let mut labels = Vec::with_capacity(dataset.couples.len());
    for entry in &dataset.couples {
        let lookup = |user: &str| {
            row_by_id
                .get(user)
                .copied()
                .ok_or_else(|| InputError::UnknownUser {
                    couple: entry.id.clone(),
                    user: user.to_string(),
                })
        };
        let first = lookup(&entry.users.0)?;
        let second = lookup(&entry.users.1)?;
        couples.push(CoupleIndex::new(first, second));
        labels.push(entry.id.clone());
    }

    Ok(PreparedInput {
        user_ids: dataset.users.iter().map(|u| u.id.clone()).collect(),
        identity,
        couples,
        labels,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
