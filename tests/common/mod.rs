//! Common test utilities for scenario tests

#![allow(dead_code)]

use chartflow::render::TextMode;
use std::fs;
use std::path::Path;

/// Renders in tests never depend on installed fonts
pub const TEXT: Option<TextMode> = Some(TextMode::Suppressed);

pub const DEPARTMENTS: [&str; 5] = ["Marketing", "IT", "Sales", "HR", "Finance"];
pub const REGIONS: [&str; 4] = ["Asia", "Europe", "Africa", "North America"];

/// 100-employee roster in which every fifth employee is in Marketing
pub fn roster_csv() -> String {
    let mut csv = String::from(
        "employee_id,department,region,performance_score,years_experience,satisfaction_rating\n",
    );
    for i in 0..100 {
        csv.push_str(&format!(
            "EMP{:03},{},{},{:.2},{},{:.1}\n",
            i + 1,
            DEPARTMENTS[i % 5],
            REGIONS[i % 4],
            70.0 + (i % 17) as f64,
            1 + i % 15,
            3.0 + (i % 20) as f64 / 10.0,
        ));
    }
    csv
}

/// Width and height of a PNG on disk
pub fn png_dimensions(path: &Path) -> (u32, u32) {
    let decoded = image::open(path).unwrap();
    (decoded.width(), decoded.height())
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
