//! Year resolution and slice selection.

use gwl_common::{GeoPoint, Scenario, SelectResult, SelectionError, SCENARIO_WINDOW_YEARS};

use crate::dataset::{variables, ClimateDataset};
use crate::percentile::{percentile_linear, HUMIDEX_PERCENTILE};
use crate::result::SelectionResult;

/// Map a calendar year onto the scenario's time index.
///
/// `time_index = requested_year - base_year`, valid in `0..=19`.
pub fn resolve_year_index(scenario: Scenario, requested_year: i32) -> SelectResult<usize> {
    let offset = i64::from(requested_year) - i64::from(scenario.base_year());

    if !(0..i64::from(SCENARIO_WINDOW_YEARS)).contains(&offset) {
        return Err(SelectionError::OutOfRange {
            scenario,
            year: requested_year,
            first_year: scenario.base_year(),
            last_year: scenario.last_year(),
        });
    }

    Ok(offset as usize)
}

/// Inverse of [`resolve_year_index`]: the calendar year of a time index.
pub fn year_for_index(scenario: Scenario, time_index: usize) -> Option<i32> {
    let index = i32::try_from(time_index).ok()?;
    (index < SCENARIO_WINDOW_YEARS).then(|| scenario.base_year() + index)
}

/// Extract the humidex slice and its summary values for `(scenario, year)`.
///
/// The year is validated before the dataset is consulted. Location scalars
/// are read as stored; only the percentile *value* is computed here.
pub fn select<D>(dataset: &D, scenario: Scenario, requested_year: i32) -> SelectResult<SelectionResult>
where
    D: ClimateDataset + ?Sized,
{
    let time_index = resolve_year_index(scenario, requested_year)?;

    let missing = |variable: &str| SelectionError::MissingSlice {
        scenario,
        time_index,
        variable: variable.to_string(),
    };

    let field = dataset
        .slice(scenario, time_index, variables::HUMIDEX_MAX)
        .ok_or_else(|| missing(variables::HUMIDEX_MAX))?;

    let absolute_max_value = field
        .max_valid()
        .map(f64::from)
        .ok_or(SelectionError::EmptySlice {
            scenario,
            time_index,
        })?;

    let scalar = |variable: &str| {
        dataset
            .scalar(scenario, time_index, variable)
            .ok_or_else(|| missing(variable))
    };

    let percentile_location = GeoPoint::new(
        scalar(variables::LAT_PERCENTILE)?,
        scalar(variables::LON_PERCENTILE)?,
    );
    let absolute_max_location = GeoPoint::new(
        scalar(variables::LAT_ABS_MAX)?,
        scalar(variables::LON_ABS_MAX)?,
    );

    let percentile_value = percentile_linear(
        field.valid_values().map(f64::from).collect(),
        HUMIDEX_PERCENTILE,
    )
    .ok_or(SelectionError::EmptySlice {
        scenario,
        time_index,
    })?;

    let date_of_max = dataset.date(scenario, time_index, variables::DATE_OF_MAX);

    Ok(SelectionResult {
        scenario,
        year: requested_year,
        time_index,
        field,
        percentile_location,
        absolute_max_location,
        percentile_value,
        absolute_max_value,
        date_of_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_base_year_is_zero() {
        assert_eq!(resolve_year_index(Scenario::Gwl1_5, 1995).unwrap(), 0);
        assert_eq!(resolve_year_index(Scenario::Gwl4_0, 2052).unwrap(), 0);
    }

    #[test]
    fn test_resolve_last_year_is_nineteen() {
        assert_eq!(resolve_year_index(Scenario::Gwl3_0, 2014).unwrap(), 19);
        assert_eq!(resolve_year_index(Scenario::Gwl4_0, 2071).unwrap(), 19);
    }

    #[test]
    fn test_resolve_rejects_neighbours() {
        for scenario in Scenario::ALL {
            for year in [scenario.base_year() - 1, scenario.base_year() + 20] {
                let err = resolve_year_index(scenario, year).unwrap_err();
                assert_eq!(
                    err,
                    SelectionError::OutOfRange {
                        scenario,
                        year,
                        first_year: scenario.base_year(),
                        last_year: scenario.base_year() + 19,
                    }
                );
            }
        }
    }

    #[test]
    fn test_resolve_extreme_years() {
        assert!(resolve_year_index(Scenario::Gwl2_0, i32::MIN).is_err());
        assert!(resolve_year_index(Scenario::Gwl2_0, i32::MAX).is_err());
    }

    #[test]
    fn test_year_for_index_is_inverse() {
        for scenario in Scenario::ALL {
            for year in scenario.years() {
                let index = resolve_year_index(scenario, year).unwrap();
                assert_eq!(year_for_index(scenario, index), Some(year));
            }
            assert_eq!(year_for_index(scenario, 20), None);
        }
    }
}
