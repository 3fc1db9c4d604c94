use crate::error::DatasetError;
use crate::model::{Case, CaseFinancials, CaseFlag, DateRange, PeriodData};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Case, financial and flag records as exported for one period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub cases: Vec<Case>,
    #[serde(default)]
    pub financials: Vec<CaseFinancials>,
    #[serde(default)]
    pub flags: Vec<CaseFlag>,
}

impl Dataset {
    /// Pair the records with the window they are scored over
    pub fn into_period(self, range: DateRange) -> PeriodData {
        PeriodData {
            range,
            cases: self.cases,
            financials: self.financials,
            flags: self.flags,
        }
    }
}

/// Read a dataset from a JSON file
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset: Dataset = serde_json::from_str(&content).map_err(|source| DatasetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        "Loaded {:?}: {} cases, {} financials, {} flags",
        path,
        dataset.cases.len(),
        dataset.financials.len(),
        dataset.flags.len()
    );
    Ok(dataset)
}
