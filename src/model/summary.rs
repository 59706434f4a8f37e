use super::round3;
use serde::{Deserialize, Serialize};

/// How the mean U-value of a summary row is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeanKind {
    Simple,
    AreaWeighted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Group key values, aligned with [`Summary::key_columns`].
    pub key: Vec<String>,
    pub count: usize,
    pub total_area: f64,
    pub mean_u: Option<f64>,
}

/// One aggregation level of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub title: String,
    pub key_columns: Vec<String>,
    pub mean: MeanKind,
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Copy with areas and mean U-values rounded to 3 decimals, for export.
    #[must_use]
    pub fn rounded(&self) -> Self {
        let mut out = self.clone();
        for row in &mut out.rows {
            row.total_area = round3(row.total_area);
            row.mean_u = row.mean_u.map(round3);
        }
        out
    }
}
