//! CSV reports of balance series
//!
//! One row per sampled step: the step index followed by one column per
//! series, values with three decimals. A series shorter than the others
//! leaves its cell empty.

use anyhow::{Context, Result};
use std::io;
use std::path::Path;

/// A named series written as one CSV column
#[derive(Clone, Copy, Debug)]
pub struct Column<'a> {
    pub name: &'a str,
    pub values: &'a [f64],
}

impl<'a> Column<'a> {
    pub const fn new(name: &'a str, values: &'a [f64]) -> Self {
        Self { name, values }
    }
}

/// Write every `stride`-th step of `columns`, starting at step 0
pub fn write_columns<W: io::Write>(writer: W, columns: &[Column<'_>], stride: usize) -> Result<()> {
    anyhow::ensure!(stride > 0, "report stride must be > 0");

    let mut csv = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(columns.len() + 1);
    header.push("step");
    header.extend(columns.iter().map(|c| c.name));
    csv.write_record(&header)?;

    let steps = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
    for step in (0..steps).step_by(stride) {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(step.to_string());
        for column in columns {
            record.push(
                column
                    .values
                    .get(step)
                    .map(|v| format!("{v:.3}"))
                    .unwrap_or_default(),
            );
        }
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Write `columns` to a CSV file at `path`
pub fn write_file(path: &Path, columns: &[Column<'_>], stride: usize) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    write_columns(io::BufWriter::new(file), columns, stride)
        .with_context(|| format!("Failed to write report {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(columns: &[Column<'_>], stride: usize) -> String {
        let mut out = Vec::new();
        write_columns(&mut out, columns, stride).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_sampled_rows() {
        let random: Vec<f64> = (0..25).map(f64::from).collect();
        let greedy: Vec<f64> = (0..25).map(|i| f64::from(i) / 4.0).collect();

        let text = render(
            &[Column::new("random", &random), Column::new("greedy", &greedy)],
            10,
        );
        assert_eq!(
            text,
            "step,random,greedy\n\
             0,0.000,0.000\n\
             10,10.000,2.500\n\
             20,20.000,5.000\n"
        );
    }

    #[test]
    fn test_short_series_leaves_cells_empty() {
        let long = [1.0, 2.0, 3.0];
        let short = [0.5];
        let text = render(&[Column::new("a", &long), Column::new("b", &short)], 1);
        assert_eq!(text, "step,a,b\n0,1.000,0.500\n1,2.000,\n2,3.000,\n");
    }

    #[test]
    fn test_zero_stride_rejected() {
        let mut out = Vec::new();
        assert!(write_columns(&mut out, &[], 0).is_err());
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("load_spread.csv");
        write_file(&path, &[Column::new("greedy", &[0.25, 0.125])], 10).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "step,greedy\n0,0.250\n");
    }
}
