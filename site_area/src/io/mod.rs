//! File input and output helpers for shapes and settings.

pub mod geojson;
pub mod shape_data;

use std::fs::File;
use std::io::{self, Read, Write};

/// Reads a file to string.
pub fn read_to_string(path: &str) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Writes a string to a file, replacing its contents.
pub fn write_string(path: &str, contents: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())
}

/// Reads a shape from a file holding stored shape JSON.
pub fn read_shape_json(path: &str) -> io::Result<crate::geometry::Shape> {
    let contents = read_to_string(path)?;
    shape_data::from_json(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Writes a shape as stored shape JSON.
pub fn write_shape_json(path: &str, shape: &crate::geometry::Shape) -> io::Result<()> {
    let json =
        shape_data::to_json(shape).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    write_string(path, &json)
}

/// Reads `lat,lng` pairs, one per line, skipping blank lines.
pub fn read_latlng_csv(path: &str) -> io::Result<Vec<crate::geometry::LatLng>> {
    let contents = read_to_string(path)?;
    let mut pts = Vec::new();
    for (idx, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() != 2 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("line {}: expected lat,lng", idx + 1),
            ));
        }
        let mut values = [0.0; 2];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.trim().parse::<f64>().map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("line {}: {}", idx + 1, e))
            })?;
        }
        pts.push(crate::geometry::LatLng::new(values[0], values[1]));
    }
    Ok(pts)
}
