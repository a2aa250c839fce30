//! Ingestion of extracted instances into the co-occurrence matrix.
//!
//! Input lines are tab-delimited:
//! `weight \t location \t pattern \t argc \t arg1 ... argN`,
//! e.g. `1.0\tclueweb.txt:30:10-11\tARG1 acquired ARG2\t2\tGoogle\tYouTube`.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use espresso_core::errors::StorageError;
use espresso_core::types::{ArgumentTuple, CooccurrenceRecord, Pattern};

use crate::engine::StorageEngine;

/// Lines buffered before each matrix write.
const BATCH_SIZE: usize = 10_000;

/// One parsed instance line.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceLine {
    pub weight: f64,
    pub location: String,
    pub pattern: Pattern,
    pub instance: ArgumentTuple,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub lines: usize,
    pub records: usize,
    pub skipped: usize,
}

/// Parses one line. Blank lines yield `None`.
pub fn parse_instance_line(line: &str, location: &str) -> Result<Option<InstanceLine>, StorageError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(None);
    }
    let malformed = |message: String| StorageError::MalformedRecord {
        location: location.to_string(),
        message,
    };

    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 4 {
        return Err(malformed(format!(
            "expected at least 4 tab-separated fields, found {}",
            fields.len()
        )));
    }
    let weight: f64 = fields[0]
        .trim()
        .parse()
        .map_err(|_| malformed(format!("invalid weight '{}'", fields[0])))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(malformed(format!("weight must be finite and non-negative, got {weight}")));
    }
    let argc: usize = fields[3]
        .trim()
        .parse()
        .map_err(|_| malformed(format!("invalid argument count '{}'", fields[3])))?;
    let args = &fields[4..];
    if args.len() != argc {
        return Err(malformed(format!(
            "argument count {argc} does not match {} arguments",
            args.len()
        )));
    }
    if argc == 0 {
        return Err(malformed("instance has no arguments".to_string()));
    }
    if fields[2].is_empty() {
        return Err(malformed("empty pattern".to_string()));
    }

    Ok(Some(InstanceLine {
        weight,
        location: fields[1].to_string(),
        pattern: Pattern::from(fields[2]),
        instance: ArgumentTuple::new(args.iter().copied()),
    }))
}

/// Ingests every line of `reader`. `origin` names the input in errors.
/// A malformed line aborts the current batch; earlier batches stay written.
pub fn ingest_reader<R: BufRead>(
    engine: &StorageEngine,
    reader: R,
    origin: &str,
) -> Result<IngestReport, StorageError> {
    let mut report = IngestReport::default();
    let mut batch: Vec<CooccurrenceRecord> = Vec::with_capacity(BATCH_SIZE);

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| StorageError::Io {
            path: origin.to_string(),
            message: e.to_string(),
        })?;
        report.lines += 1;
        let location = format!("{origin}:{}", idx + 1);
        match parse_instance_line(&line, &location)? {
            Some(parsed) => batch.push(CooccurrenceRecord {
                pattern: parsed.pattern,
                instance: parsed.instance,
                weight: parsed.weight,
            }),
            None => report.skipped += 1,
        }
        if batch.len() >= BATCH_SIZE {
            report.records += engine.insert_cooccurrences(&batch)?;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        report.records += engine.insert_cooccurrences(&batch)?;
    }

    tracing::info!(
        origin,
        matrix = engine.matrix(),
        lines = report.lines,
        records = report.records,
        "ingested instances"
    );
    Ok(report)
}

pub fn ingest_file(engine: &StorageEngine, path: &Path) -> Result<IngestReport, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    ingest_reader(engine, BufReader::new(file), &path.display().to_string())
}
