//! Semester records: a budget period with its own capital figures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, SemesterId};

/// A budget period as stored by the backend.
///
/// Numeric fields missing from a response take their documented defaults:
/// capital and insurance figures default to zero and `current_capital`
/// falls back to `starting_capital` (see [`Semester::current_capital`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Semester {
    pub id: SemesterId,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub starting_capital: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_capital: Option<f64>,
    #[serde(default)]
    pub active_house_size: u32,
    #[serde(default)]
    pub insurance_cost: f64,
}

impl Semester {
    pub fn new(id: impl Into<SemesterId>, name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            date,
            starting_capital: 0.0,
            current_capital: None,
            active_house_size: 0,
            insurance_cost: 0.0,
        }
    }

    pub fn with_capital(mut self, starting: f64, current: Option<f64>) -> Self {
        self.starting_capital = starting;
        self.current_capital = current;
        self
    }

    /// Current capital, or the starting capital when the backend never reported one.
    pub fn current_capital(&self) -> f64 {
        self.current_capital.unwrap_or(self.starting_capital)
    }

    pub fn surplus(&self) -> f64 {
        self.current_capital() - self.starting_capital
    }
}

impl Displayable for Semester {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.date)
    }
}

/// Fields sent when asking the backend to create a semester.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SemesterDraft {
    pub name: String,
    pub date: NaiveDate,
    pub starting_capital: f64,
    pub active_house_size: u32,
    pub insurance_cost: f64,
}

impl SemesterDraft {
    /// A draft with every figure zeroed, the way new semesters start out.
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            starting_capital: 0.0,
            active_house_size: 0,
            insurance_cost: 0.0,
        }
    }
}

/// Partial changes to a semester summary. Only populated fields are sent.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SemesterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_capital: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_capital: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_house_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_cost: Option<f64>,
}

impl SemesterUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.starting_capital.is_none()
            && self.current_capital.is_none()
            && self.active_house_size.is_none()
            && self.insurance_cost.is_none()
    }
}
