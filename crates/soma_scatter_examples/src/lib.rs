#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use soma_scatter::pattern::SpherePattern;

/// Write a placed pattern as `x,y,z,radius` CSV rows for external plotting.
pub fn write_pattern_csv(path: impl AsRef<Path>, pattern: &SpherePattern) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "x,y,z,radius")?;
    for sphere in pattern.iter() {
        writeln!(
            out,
            "{},{},{},{}",
            sphere.position.x, sphere.position.y, sphere.position.z, sphere.radius
        )?;
    }
    out.flush()?;
    Ok(())
}
