use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Salary assumptions used to price the time spent waiting on CI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CostEstimator {
    /// Yearly salary in whole currency units
    #[serde(default = "default_yearly_salary")]
    pub yearly_salary: f64,

    /// Multiplier for benefits, taxes and overhead
    #[serde(default = "default_load_factor")]
    pub load_factor: f64,

    #[serde(default = "default_working_days")]
    pub working_days: f64,

    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self {
            yearly_salary: default_yearly_salary(),
            load_factor: default_load_factor(),
            working_days: default_working_days(),
            hours_per_day: default_hours_per_day(),
        }
    }
}

fn default_yearly_salary() -> f64 {
    110_554.0
}

fn default_load_factor() -> f64 {
    1.4
}

fn default_working_days() -> f64 {
    245.0
}

fn default_hours_per_day() -> f64 {
    8.0
}

impl CostEstimator {
    /// Cost in cents of an engineer idling for `waited`.
    pub fn cost_cents(&self, waited: Duration) -> i64 {
        let yearly_cents = self.yearly_salary * 100.0 * self.load_factor;
        let hourly_cents = yearly_cents / (self.working_days * self.hours_per_day);
        let hours = waited.as_secs_f64() / 3600.0;
        // f64::round already rounds half away from zero.
        #[allow(clippy::cast_possible_truncation)]
        let cents = (hourly_cents * hours).round() as i64;
        cents
    }

    /// Cost of `waited` formatted as dollars, e.g. `$78.97`.
    pub fn format_cost(&self, waited: Duration) -> String {
        let cents = self.cost_cents(waited);
        format!("${}.{:02}", cents / 100, cents % 100)
    }
}
