//! Parquet file operations
//!
//! Reading trip tables into Arrow record batches and writing prediction
//! tables back out, for local files and remote objects alike.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::error::util::{ensure_parent_dir, safe_open_file};
use crate::error::{RideDurationError, Result};
use crate::storage::{Location, Resolved, StorageOptions};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Helper function to get batch size from environment
#[must_use]
pub fn get_batch_size() -> Option<usize> {
    std::env::var("PARQUET_BATCH_SIZE")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
}

/// Read a Parquet table from any supported location
pub fn read_parquet(location: &Location, options: &StorageOptions) -> Result<Vec<RecordBatch>> {
    let start = std::time::Instant::now();
    log_operation_start("Reading parquet file", location);

    let batches = match location.resolve(options) {
        Resolved::File(path) => decode_parquet(safe_open_file(path, "trip data")?)?,
        Resolved::Url(url) => decode_parquet(download(&url)?)?,
    };

    let rows = batches.iter().map(RecordBatch::num_rows).sum::<usize>();
    if rows == 0 {
        log_warning("Parquet file contains no rows", Some(location));
    }
    log_operation_complete("read", location, rows, Some(start.elapsed()));

    Ok(batches)
}

/// Write batches as one uncompressed Parquet table to any supported location
///
/// The table is written with `schema` even when `batches` is empty.
pub fn write_parquet(
    location: &Location,
    schema: SchemaRef,
    batches: &[RecordBatch],
    options: &StorageOptions,
) -> Result<()> {
    let start = std::time::Instant::now();
    log_operation_start("Writing parquet file", location);
    let rows = batches.iter().map(RecordBatch::num_rows).sum::<usize>();

    match location.resolve(options) {
        Resolved::File(path) => write_local(path, schema, batches)?,
        Resolved::Url(url) => {
            let bytes = encode_parquet(Vec::new(), schema, batches)?;
            upload(&url, &bytes)?;
        }
    }

    log_operation_complete("wrote", location, rows, Some(start.elapsed()));
    Ok(())
}

/// Decode every record batch from an open Parquet source
fn decode_parquet(file: File) -> Result<Vec<RecordBatch>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
        .with_batch_size(get_batch_size().unwrap_or(DEFAULT_BATCH_SIZE))
        .build()?;

    Ok(reader.collect::<std::result::Result<Vec<_>, _>>()?)
}

fn write_local(path: &Path, schema: SchemaRef, batches: &[RecordBatch]) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("Failed to create output file {}: {e}", path.display()),
        )
    })?;
    encode_parquet(file, schema, batches)?;
    Ok(())
}

/// Encode batches into `sink` without compression, returning the sink
fn encode_parquet<W: io::Write + Send>(
    sink: W,
    schema: SchemaRef,
    batches: &[RecordBatch],
) -> Result<W> {
    let properties = WriterProperties::builder()
        .set_compression(Compression::UNCOMPRESSED)
        .build();

    let mut writer = ArrowWriter::try_new(sink, schema, Some(properties))?;
    for batch in batches {
        writer.write(batch)?;
    }
    Ok(writer.into_inner()?)
}

/// Fetch a remote object into an anonymous temporary file
fn download(url: &str) -> Result<File> {
    let response = ureq::get(url)
        .call()
        .map_err(|e| RideDurationError::http(url, e))?;

    let mut file = tempfile::tempfile()?;
    io::copy(&mut response.into_reader(), &mut file)?;
    file.seek(SeekFrom::Start(0))?;

    Ok(file)
}

fn upload(url: &str, bytes: &[u8]) -> Result<()> {
    ureq::put(url)
        .set("Content-Type", "application/octet-stream")
        .send_bytes(bytes)
        .map_err(|e| RideDurationError::http(url, e))?;
    Ok(())
}
