// src/export.rs
//! CSV reports: UTF-8 with BOM, one header row, CRLF line endings.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::model::{Job, CSV_HEADERS};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write one CSV row to any writer.
pub fn write_row<W: Write>(w: &mut W, row: &[&str]) -> io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            w.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            w.write_all(cell.as_bytes())?;
        }
    }
    w.write_all(b"\r\n")
}

/// BOM + header + one row per job.
pub fn write_jobs<W: Write>(w: &mut W, jobs: &[Job]) -> io::Result<()> {
    w.write_all(UTF8_BOM)?;
    write_row(w, &CSV_HEADERS)?;
    for job in jobs {
        write_row(w, &job.to_csv_row())?;
    }
    Ok(())
}

pub fn write_jobs_csv(path: &Path, jobs: &[Job]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output dir {}", dir.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_jobs(&mut w, jobs).with_context(|| format!("writing {}", path.display()))?;
    w.flush().with_context(|| format!("flushing {}", path.display()))
}
