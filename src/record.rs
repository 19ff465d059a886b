use serde::{Deserialize, Serialize};

/// Columns the aggregation requires. The source CSV may carry more
/// (fnlwgt, capital-gain, ...); those are ignored on deserialization.
pub const REQUIRED_COLUMNS: &'static [&'static str] = &[
    "age",
    "sex",
    "education",
    "race",
    "hours-per-week",
    "salary",
    "native-country",
    "occupation",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Salary {
    #[serde(rename = ">50K")]
    Over50K,
    #[serde(rename = "<=50K")]
    AtMost50K,
}

impl Salary {
    pub fn is_rich(self) -> bool {
        matches!(self, Salary::Over50K)
    }
}

/// One row of the survey: a single individual's demographic and income
/// attributes. Occupation may be blank in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub age: u32,
    pub sex: Sex,
    pub education: String,
    pub race: String,
    #[serde(rename = "hours-per-week")]
    pub hours_per_week: u32,
    pub salary: Salary,
    #[serde(rename = "native-country")]
    pub native_country: String,
    pub occupation: Option<String>,
}

/// An immutable, ordered table of records together with the column names
/// that were present in the source. The aggregator checks the column list
/// before computing anything, so a Table built from a file missing a
/// required column (or built programmatically with a partial column set)
/// is rejected up front rather than producing nonsense.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Self {
        Table { columns, rows }
    }

    /// Build a table whose column set is exactly the required columns.
    pub fn from_rows(rows: Vec<Record>) -> Self {
        let columns = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        Table { columns, rows }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
