use crate::common::constants::{EVALUATION_TEMP_RELATIVE_TOLERANCE, relative_error_equal};
use crate::domain::{DatabaseResult, XsdirError};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::warn;

/// Placeholder of the error raised when a bucket already holds data at a
/// temperature.
pub const DUPLICATE_TEMPERATURE: &str = "DB.DUPLICATE_TEMPERATURE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GridPoint<T> {
    evaluation_temp_in_mev: f64,
    value: T,
}

/// Values kept in ascending evaluation temperature order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureGrid<T> {
    points: Vec<GridPoint<T>>,
}

impl<T> Default for TemperatureGrid<T> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<T> TemperatureGrid<T> {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn temperatures_in_mev(&self) -> Vec<f64> {
        self.points
            .iter()
            .map(|point| point.evaluation_temp_in_mev)
            .collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.points.iter().map(|point| &point.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, &T)> {
        self.points
            .iter()
            .map(|point| (point.evaluation_temp_in_mev, &point.value))
    }

    /// Inserts a value; a temperature already on the grid (within the
    /// relative tolerance) is rejected.
    pub fn insert(
        &mut self,
        evaluation_temp_in_mev: f64,
        value: T,
        description: impl Display,
    ) -> DatabaseResult<()> {
        if self.contains(evaluation_temp_in_mev) {
            return Err(XsdirError::consistency(
                DUPLICATE_TEMPERATURE,
                format!(
                    "{} already has data at evaluation temperature {:e} MeV",
                    description, evaluation_temp_in_mev
                ),
            ));
        }
        let index = self
            .points
            .partition_point(|point| point.evaluation_temp_in_mev < evaluation_temp_in_mev);
        self.points.insert(
            index,
            GridPoint {
                evaluation_temp_in_mev,
                value,
            },
        );
        Ok(())
    }

    pub fn contains(&self, evaluation_temp_in_mev: f64) -> bool {
        self.points.iter().any(|point| {
            relative_error_equal(
                point.evaluation_temp_in_mev,
                evaluation_temp_in_mev,
                EVALUATION_TEMP_RELATIVE_TOLERANCE,
            )
        })
    }

    /// Value at `evaluation_temp_in_mev`. Without `find_exact`, the closest
    /// grid temperature is used and a warning is logged.
    pub fn find(
        &self,
        evaluation_temp_in_mev: f64,
        find_exact: bool,
        description: impl Display,
    ) -> DatabaseResult<&T> {
        let (Some(front), Some(back)) = (self.points.first(), self.points.last()) else {
            return Err(XsdirError::invalid_request(
                "DB.MISSING_TEMPERATURE",
                format!("{} has no evaluation temperatures", description),
            ));
        };

        let mut index = if evaluation_temp_in_mev < front.evaluation_temp_in_mev {
            0
        } else if evaluation_temp_in_mev >= back.evaluation_temp_in_mev {
            self.points.len() - 1
        } else {
            let lower = self
                .points
                .partition_point(|point| point.evaluation_temp_in_mev <= evaluation_temp_in_mev)
                - 1;
            if relative_error_equal(
                self.points[lower + 1].evaluation_temp_in_mev,
                evaluation_temp_in_mev,
                EVALUATION_TEMP_RELATIVE_TOLERANCE,
            ) {
                lower + 1
            } else {
                lower
            }
        };

        if !relative_error_equal(
            self.points[index].evaluation_temp_in_mev,
            evaluation_temp_in_mev,
            EVALUATION_TEMP_RELATIVE_TOLERANCE,
        ) {
            if find_exact {
                return Err(XsdirError::invalid_request(
                    "DB.MISSING_TEMPERATURE",
                    format!(
                        "{} has no data at evaluation temperature {:e} MeV",
                        description, evaluation_temp_in_mev
                    ),
                ));
            }

            if index + 1 < self.points.len() {
                let midpoint = (self.points[index].evaluation_temp_in_mev
                    + self.points[index + 1].evaluation_temp_in_mev)
                    / 2.0;
                if evaluation_temp_in_mev >= midpoint {
                    index += 1;
                }
            }

            warn!(
                requested_mev = evaluation_temp_in_mev,
                returned_mev = self.points[index].evaluation_temp_in_mev,
                "{} has no data at the requested evaluation temperature; using the closest",
                description
            );
        }

        Ok(&self.points[index].value)
    }
}
