use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::discretization::field::Field2d;
use crate::discretization::grid::Grid2d;

/// Write columns of data to a CSV file with headers.
pub fn write_csv<P: AsRef<Path>>(path: P, headers: &[&str], data: &[Vec<f64>]) -> io::Result<()> {
    if !headers.is_empty() && !data.is_empty() && headers.len() != data.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "Headers count ({}) doesn't match data columns ({})",
                headers.len(),
                data.len()
            ),
        ));
    }

    let mut file = File::create(path)?;
    writeln!(file, "{}", headers.join(","))?;

    let n_rows = data.iter().map(|col| col.len()).max().unwrap_or(0);
    for i in 0..n_rows {
        let row: Vec<String> = data
            .iter()
            .map(|col| {
                if i < col.len() {
                    format!("{:.15e}", col[i])
                } else {
                    String::new()
                }
            })
            .collect();
        writeln!(file, "{}", row.join(","))?;
    }

    Ok(())
}

/// Write a grid field as x,y,u rows in natural point order.
pub fn write_field<P: AsRef<Path>>(path: P, grid: &Grid2d, field: &Field2d) -> io::Result<()> {
    let n = grid.num_points();
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    let mut us = Vec::with_capacity(n);
    for j in 0..grid.my() {
        for i in 0..grid.mx() {
            let (x, y) = grid.coords(i, j);
            xs.push(x);
            ys.push(y);
            us.push(field.get(i, j));
        }
    }
    write_csv(path, &["x", "y", "u"], &[xs, ys, us])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_headers_and_rows() {
        let path = std::env::temp_dir().join("pbratu_csv_writer_test.csv");
        write_csv(&path, &["a", "b"], &[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("a,b"));
        assert_eq!(lines.count(), 2);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_mismatched_columns() {
        let path = std::env::temp_dir().join("pbratu_csv_writer_mismatch.csv");
        assert!(write_csv(&path, &["a", "b"], &[vec![1.0]]).is_err());
    }
}
