// Dataset builders for integration tests
//
// Lays out the folder convention on disk:
// <root>/batch_<id>/dsi/dsi_<rr>/scan_<a>.csv

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const SENTINEL: &str = "-999.99";

/// Write one scan file from rows of already formatted cells
pub fn write_scan(dir: &Path, name: &str, rows: &[Vec<String>]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    let text: String = rows.iter().map(|row| format!("{}\n", row.join(","))).collect();
    fs::write(&path, text).unwrap();
    path
}

/// Constant grid rows with an optional missing cell at (0, 0)
pub fn constant_rows(rows: usize, cols: usize, value: f64, hole: bool) -> Vec<Vec<String>> {
    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| {
                    if hole && r == 0 && c == 0 {
                        SENTINEL.to_string()
                    } else {
                        format!("{:.4}", value)
                    }
                })
                .collect()
        })
        .collect()
}

/// Subject folder whose repetition `i` has two angle scans with minimum
/// `levels[i]` everywhere
pub fn write_subject(root: &Path, label: &str, shape: (usize, usize), levels: &[f64]) -> PathBuf {
    let dsi_root = root.join(label).join("dsi");
    for (i, &level) in levels.iter().enumerate() {
        let dir = dsi_root.join(format!("dsi_{:02}", i + 1));
        write_scan(&dir, "scan_1.csv", &constant_rows(shape.0, shape.1, level, false));
        write_scan(&dir, "scan_2.csv", &constant_rows(shape.0, shape.1, level + 0.5, true));
    }
    dsi_root
}

/// Three subjects with Sigma_k of 10, 12 and 14 µm / sqrt(2)
pub fn write_population(root: &Path) {
    write_subject(root, "batch_001", (3, 4), &[1.000, 1.010]);
    write_subject(root, "batch_002", (3, 4), &[1.000, 1.012]);
    write_subject(root, "batch_003", (3, 4), &[1.000, 1.014]);
}
