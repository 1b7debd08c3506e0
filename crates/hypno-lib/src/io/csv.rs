use crate::signal::{Sample, Series};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Write `time,value` rows with a header.
pub fn write_series_csv<W: Write>(writer: W, series: &Series) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(["time", "value"])?;
    for sample in series.samples() {
        writer.write_record(&[sample.time.to_string(), sample.value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_series_csv<R: Read>(reader: R) -> Result<Series> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(reader);
    let mut samples = Vec::new();
    for (idx, row) in reader.deserialize::<Sample>().enumerate() {
        let sample = row.with_context(|| format!("parsing series row {}", idx + 1))?;
        samples.push(sample);
    }
    Ok(Series::try_from_samples(samples)?)
}

pub fn save_series_csv(path: &Path, series: &Series) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_series_csv(file, series)
}

pub fn load_series_csv(path: &Path) -> Result<Series> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_series_csv(file).with_context(|| format!("reading series {}", path.display()))
}
