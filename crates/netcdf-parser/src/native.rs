//! Native NetCDF loading using the netcdf library.
//!
//! The whole file is read once into a [`HumidexDataset`]; selections then
//! run against memory without touching the file again.
//!
//! # Expected Layout
//!
//! ```text
//! humidex_max[gwl, year, y, x]         required
//! lat_percentile[gwl, year]            required
//! lon_percentile[gwl, year]            required
//! lat_abs_max[gwl, year]               required
//! lon_abs_max[gwl, year]               required
//! date_of_max_percentile[gwl, year]    optional (CF time with calendar, or text)
//! gwl[gwl]                             scenario labels (numbers or strings)
//! longitude, latitude                  1-D axes or 2-D grids
//! ```

use std::path::Path;
use std::sync::Once;

use chrono::NaiveDate;
use gwl_common::{
    parse_date_label, CfCalendar, CfTimeUnits, Scenario, TimeParseError, SCENARIO_WINDOW_YEARS,
};
use scenario_selector::{variables, CoordinateArrays, HumidexDataset};
use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::error::{NetCdfError, NetCdfResult};

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., when checking for optional
/// attributes that don't exist). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #003: ../../../src/H5Adense.c line 397 in H5A__dense_open(): can't locate attribute in name index
/// ```
///
/// This function disables that output by calling H5Eset_auto2 with null handlers.
/// It only needs to be called once per process, but is safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Load a humidex dataset file into memory.
///
/// Scenario labels outside the known GWL set are skipped with a warning.
/// Years beyond the 20-year window are ignored; years missing from the file
/// surface later as missing slices.
pub fn load_humidex_dataset<P: AsRef<Path>>(
    path: P,
    config: &LoaderConfig,
) -> NetCdfResult<HumidexDataset> {
    // Silence HDF5's verbose stderr output for missing attributes
    silence_hdf5_errors();

    let path = path.as_ref();
    if !path.exists() {
        return Err(NetCdfError::FileNotFound(path.display().to_string()));
    }

    let file = netcdf::open(path)?;

    let humidex = file
        .variable(&config.humidex_var)
        .ok_or_else(|| missing_variable(&config.humidex_var))?;
    let shape = HumidexShape::from_variable(&humidex, config)?;

    let scenarios = read_scenario_labels(&file, config, shape.n_scenarios)?;
    let coordinates = read_coordinates(&file, config)?;
    let mut dataset = HumidexDataset::new(shape.width, shape.height, coordinates)?;

    let n_years = shape.n_years.min(SCENARIO_WINDOW_YEARS as usize);
    if shape.n_years > n_years {
        warn!(
            years = shape.n_years,
            kept = n_years,
            "File has more years than the scenario window, ignoring the rest"
        );
    }

    // Gridded humidex, one scenario at a time
    let packing = Packing::from_variable(&humidex);
    let cells = shape.width * shape.height;
    for (g, scenario) in scenarios.iter().enumerate() {
        let Some(scenario) = *scenario else { continue };

        let raw: Vec<f32> =
            humidex.get_values([g..g + 1, 0..n_years, 0..shape.height, 0..shape.width])?;

        if cells == 0 {
            continue;
        }
        for (t, chunk) in raw.chunks_exact(cells).enumerate() {
            let values = chunk.iter().map(|&v| packing.unpack_f32(v)).collect();
            dataset.insert_grid(variables::HUMIDEX_MAX, scenario, t, values)?;
        }
    }

    // Precomputed marker locations
    for (file_var, canonical) in config.scalar_mappings() {
        let var = file
            .variable(file_var)
            .ok_or_else(|| missing_variable(file_var))?;
        let values = read_scalar_table(&var, shape.n_scenarios, n_years)?;

        for (g, t, value) in indexed(&scenarios, n_years, values) {
            dataset.insert_scalar(canonical, g, t, value);
        }
    }

    // Optional date of maximum
    match file.variable(&config.date_of_max_var) {
        Some(var) => {
            let dates = read_dates(&var, shape.n_scenarios, n_years)?;
            for (g, t, date) in indexed(&scenarios, n_years, dates) {
                if let Some(date) = date {
                    dataset.insert_date(variables::DATE_OF_MAX, g, t, date);
                }
            }
        }
        None => debug!(
            variable = %config.date_of_max_var,
            "No date variable in file, dates of max will be absent"
        ),
    }

    info!(
        path = %path.display(),
        scenarios = ?dataset.scenarios(),
        years = n_years,
        width = shape.width,
        height = shape.height,
        "Loaded humidex dataset"
    );

    Ok(dataset)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Dimension lengths of the gridded humidex variable.
#[derive(Debug, Clone, Copy)]
struct HumidexShape {
    n_scenarios: usize,
    n_years: usize,
    height: usize,
    width: usize,
}

impl HumidexShape {
    fn from_variable(var: &netcdf::Variable, config: &LoaderConfig) -> NetCdfResult<Self> {
        let dims = var.dimensions();
        if dims.len() != 4 {
            return Err(NetCdfError::InvalidFormat(format!(
                "'{}' must have 4 dimensions [{}, {}, y, x], found {}",
                config.humidex_var,
                config.scenario_dim,
                config.year_dim,
                dims.len()
            )));
        }

        let (scenario_dim, year_dim) = (dims[0].name(), dims[1].name());
        if scenario_dim != config.scenario_dim || year_dim != config.year_dim {
            return Err(NetCdfError::InvalidFormat(format!(
                "'{}' dimensions start with [{}, {}], expected [{}, {}]",
                config.humidex_var, scenario_dim, year_dim, config.scenario_dim, config.year_dim
            )));
        }

        Ok(Self {
            n_scenarios: dims[0].len(),
            n_years: dims[1].len(),
            height: dims[2].len(),
            width: dims[3].len(),
        })
    }
}

/// CF packing and missing-value attributes of a variable.
#[derive(Debug, Clone, Copy)]
struct Packing {
    scale_factor: f64,
    add_offset: f64,
    fill_value: Option<f64>,
    missing_value: Option<f64>,
}

impl Packing {
    fn from_variable(var: &netcdf::Variable) -> Self {
        Self {
            scale_factor: get_f64_attr(var, "scale_factor").unwrap_or(1.0),
            add_offset: get_f64_attr(var, "add_offset").unwrap_or(0.0),
            fill_value: get_f64_attr(var, "_FillValue"),
            missing_value: get_f64_attr(var, "missing_value"),
        }
    }

    fn is_missing(&self, raw: f64) -> bool {
        raw.is_nan() || Some(raw) == self.fill_value || Some(raw) == self.missing_value
    }

    fn unpack(&self, raw: f64) -> f64 {
        if self.is_missing(raw) {
            f64::NAN
        } else {
            raw * self.scale_factor + self.add_offset
        }
    }

    fn unpack_f32(&self, raw: f32) -> f32 {
        self.unpack(f64::from(raw)) as f32
    }
}

/// Pair row-major `[scenario, year]` values with their known scenario.
fn indexed<'a, T: 'a>(
    scenarios: &'a [Option<Scenario>],
    n_years: usize,
    values: Vec<T>,
) -> impl Iterator<Item = (Scenario, usize, T)> + 'a {
    values.into_iter().enumerate().filter_map(move |(i, value)| {
        let scenario = (*scenarios.get(i / n_years)?)?;
        Some((scenario, i % n_years, value))
    })
}

fn missing_variable(name: &str) -> NetCdfError {
    NetCdfError::MissingData(format!("'{}' variable", name))
}

/// Resolve the label of each index along the scenario dimension.
fn read_scenario_labels(
    file: &netcdf::File,
    config: &LoaderConfig,
    n_scenarios: usize,
) -> NetCdfResult<Vec<Option<Scenario>>> {
    let Some(var) = file.variable(&config.scenario_dim) else {
        if n_scenarios == Scenario::ALL.len() {
            warn!(
                dimension = %config.scenario_dim,
                "No scenario coordinate, assuming the standard GWL order"
            );
            return Ok(Scenario::ALL.into_iter().map(Some).collect());
        }
        return Err(NetCdfError::MissingData(format!(
            "'{}' coordinate variable",
            config.scenario_dim
        )));
    };

    let scenarios: Vec<Option<Scenario>> = match var.get_values::<f64, _>(..) {
        Ok(values) => values
            .into_iter()
            .map(|v| {
                let scenario = Scenario::from_warming_degrees(v);
                if scenario.is_none() {
                    warn!(label = v, "Skipping unknown GWL scenario");
                }
                scenario
            })
            .collect(),
        // Labels stored as strings
        Err(_) => (0..n_scenarios)
            .map(|i| -> NetCdfResult<Option<Scenario>> {
                let label = var.get_string([i])?;
                let scenario = label.parse::<Scenario>().ok();
                if scenario.is_none() {
                    warn!(label = %label, "Skipping unknown GWL scenario");
                }
                Ok(scenario)
            })
            .collect::<NetCdfResult<_>>()?,
    };

    if scenarios.len() != n_scenarios {
        return Err(NetCdfError::InvalidFormat(format!(
            "'{}' has {} labels for {} scenarios",
            config.scenario_dim,
            scenarios.len(),
            n_scenarios
        )));
    }

    Ok(scenarios)
}

fn read_coordinates(file: &netcdf::File, config: &LoaderConfig) -> NetCdfResult<CoordinateArrays> {
    let lon = find_variable(file, &config.longitude_vars)?;
    let lat = find_variable(file, &config.latitude_vars)?;

    let lon_values: Vec<f64> = lon.get_values(..)?;
    let lat_values: Vec<f64> = lat.get_values(..)?;

    match (lon.dimensions().len(), lat.dimensions().len()) {
        (1, 1) => Ok(CoordinateArrays::axes(lon_values, lat_values)),
        (2, 2) => Ok(CoordinateArrays::grids(lon_values, lat_values)),
        (lon_dims, lat_dims) => Err(NetCdfError::InvalidFormat(format!(
            "coordinates '{}' ({}-D) and '{}' ({}-D) must both be 1-D or 2-D",
            lon.name(),
            lon_dims,
            lat.name(),
            lat_dims
        ))),
    }
}

fn find_variable<'f>(
    file: &'f netcdf::File,
    candidates: &[String],
) -> NetCdfResult<netcdf::Variable<'f>> {
    candidates
        .iter()
        .find_map(|name| file.variable(name))
        .ok_or_else(|| {
            NetCdfError::MissingData(format!(
                "coordinate variable (tried {})",
                candidates.join(", ")
            ))
        })
}

/// Read a `[scenario, year]` table as unpacked f64, row-major.
fn read_scalar_table(
    var: &netcdf::Variable,
    n_scenarios: usize,
    n_years: usize,
) -> NetCdfResult<Vec<f64>> {
    let dims = var.dimensions().len();
    if dims != 2 {
        return Err(NetCdfError::InvalidFormat(format!(
            "'{}' must have 2 dimensions, found {}",
            var.name(),
            dims
        )));
    }

    let packing = Packing::from_variable(var);
    let raw: Vec<f64> = var.get_values([0..n_scenarios, 0..n_years])?;
    Ok(raw.into_iter().map(|v| packing.unpack(v)).collect())
}

/// Read a `[scenario, year]` date table, either CF numeric time or text.
///
/// Numeric offsets are counted in the variable's `calendar` (Gregorian when
/// absent); a calendar that cannot be decoded is rejected.
fn read_dates(
    var: &netcdf::Variable,
    n_scenarios: usize,
    n_years: usize,
) -> NetCdfResult<Vec<Option<NaiveDate>>> {
    if let Some(units) = get_string_attr(var, "units") {
        let invalid = |e: TimeParseError| NetCdfError::InvalidFormat(format!("'{}': {}", var.name(), e));

        let calendar = match get_string_attr(var, "calendar") {
            Some(name) => CfCalendar::parse(&name).map_err(invalid)?,
            None => CfCalendar::default(),
        };
        let units = CfTimeUnits::parse(&units)
            .map_err(invalid)?
            .with_calendar(calendar);
        debug!(variable = %var.name(), calendar = ?calendar, "Decoding CF dates");

        let values = read_scalar_table(var, n_scenarios, n_years)?;
        return Ok(values.into_iter().map(|v| units.decode_date(v)).collect());
    }

    let mut dates = Vec::with_capacity(n_scenarios * n_years);
    for g in 0..n_scenarios {
        for t in 0..n_years {
            let label = var.get_string([g, t])?;
            dates.push(parse_date_label(&label));
        }
    }
    Ok(dates)
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f64 attribute.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Helper to get string attribute.
fn get_string_attr(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attr(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}
