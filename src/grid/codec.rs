// Text codec for stored grids
//
// Rows of comma-separated numbers, no header, no labels. Missing cells are
// written as the sentinel with a fixed number of decimals.

use crate::error::{ReproError, Result};
use crate::grid::{Grid, GridCleaner};

/// Decode grid text into a grid, mapping sentinel values to missing cells
///
/// Blank lines are skipped. Empty fields and `nan` read as missing, `inf`
/// is `Malformed`. Rows of unequal length fail with `RaggedRow`.
///
/// # Example
/// ```
/// use repro_sigma::grid::{decode_grid, GridCleaner};
///
/// let grid = decode_grid("1.5,-999.99\n2.0,3.0\n", &GridCleaner::default()).unwrap();
/// assert_eq!(grid.get(0, 0), Some(1.5));
/// assert_eq!(grid.get(0, 1), None);
/// ```
pub fn decode_grid(text: &str, cleaner: &GridCleaner) -> Result<Grid> {
    let mut raw: Vec<Vec<f64>> = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split(',')
            .enumerate()
            .map(|(column, field)| parse_field(field, line_index + 1, column + 1))
            .collect::<Result<Vec<f64>>>()?;
        raw.push(row);
    }

    cleaner.clean(&raw)
}

fn parse_field(field: &str, line: usize, column: usize) -> Result<f64> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(f64::NAN);
    }

    let value = field.parse::<f64>().map_err(|e| ReproError::Malformed {
        line,
        column,
        reason: format!("'{}': {}", field, e),
    })?;

    // An infinite depth would turn every downstream spread into NaN
    if value.is_infinite() {
        return Err(ReproError::Malformed {
            line,
            column,
            reason: format!("'{}': not a finite value", field),
        });
    }
    Ok(value)
}

/// Encode a grid as text with `precision` decimals per value
pub fn encode_grid(grid: &Grid, cleaner: &GridCleaner, precision: usize) -> String {
    let mut output = String::new();

    for row in grid.iter_rows() {
        let fields: Vec<String> = row
            .iter()
            .map(|&cell| format!("{:.*}", precision, cleaner.encode(cell)))
            .collect();
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    output
}
