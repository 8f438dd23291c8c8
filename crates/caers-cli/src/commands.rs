use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{Level, info, info_span, trace};

use caers_ingest::{RawBatch, load_schema, read_csv_records};
use caers_model::{RawRecord, RecordId, RejectionReport, Schema};
use caers_report::{Exploration, ExploreOptions};
use caers_transform::{Normalized, Normalizer};

use crate::cli::{ExploreArgs, NormalizeArgs, SchemaArgs};
use crate::logging::redact_value;
use crate::summary::print_schema;
use crate::types::{ExploreResult, NormalizeResult};

pub fn run_schema(args: &SchemaArgs) -> Result<()> {
    let schema = Schema::caers();
    if args.json {
        let text =
            serde_json::to_string_pretty(&schema.to_config()).context("serialize schema")?;
        println!("{text}");
    } else {
        print_schema(&schema);
    }
    Ok(())
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<NormalizeResult> {
    let span = info_span!("normalize", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 1: Load schema and ingest
    // =========================================================================
    let schema = resolve_schema(args.schema.as_deref())?
        .with_require_declared_fields(args.require_declared_fields);
    let batch = ingest(&args.input)?;

    // =========================================================================
    // Stage 2: Normalize
    // =========================================================================
    let normalized = Normalizer::new(schema)
        .normalize(&batch.records)
        .with_context(|| format!("normalize {}", args.input.display()))?;
    log_rejections(&normalized.rejections, &batch);

    // =========================================================================
    // Stage 3: Write output
    // =========================================================================
    if let Some(path) = &args.output {
        write_json(path, &normalized)?;
        info!(path = %path.display(), records = normalized.kept(), "Wrote normalized records");
    }

    info!(
        kept = normalized.kept(),
        rejected = normalized.rejected(),
        duration_ms = start.elapsed().as_millis(),
        "normalize complete"
    );
    Ok(NormalizeResult {
        input: args.input.clone(),
        columns: batch.headers.len(),
        normalized,
        output: args.output.clone(),
    })
}

pub fn run_explore(args: &ExploreArgs) -> Result<ExploreResult> {
    let span = info_span!("explore", input = %args.input.display());
    let _guard = span.enter();
    let start = Instant::now();

    // =========================================================================
    // Stage 1: Load schema and ingest
    // =========================================================================
    let schema = resolve_schema(args.schema.as_deref())?;
    let batch = ingest(&args.input)?;

    // =========================================================================
    // Stage 2: Normalize
    // =========================================================================
    let normalized = Normalizer::new(schema)
        .normalize(&batch.records)
        .with_context(|| format!("normalize {}", args.input.display()))?;
    log_rejections(&normalized.rejections, &batch);

    // =========================================================================
    // Stage 3: Aggregate
    // =========================================================================
    let options = ExploreOptions::default().with_top(args.top);
    let exploration = Exploration::build(&normalized.records, &options);

    info!(
        records = exploration.records,
        duration_ms = start.elapsed().as_millis(),
        "explore complete"
    );
    Ok(ExploreResult {
        input: args.input.clone(),
        input_count: normalized.input_count,
        rejected: normalized.rejected(),
        exploration,
    })
}

fn resolve_schema(path: Option<&Path>) -> Result<Schema> {
    match path {
        Some(path) => {
            load_schema(path).with_context(|| format!("load schema {}", path.display()))
        }
        None => Ok(Schema::caers()),
    }
}

fn ingest(path: &Path) -> Result<RawBatch> {
    let start = Instant::now();
    let batch = read_csv_records(path).with_context(|| format!("read {}", path.display()))?;
    info!(
        records = batch.len(),
        columns = batch.headers.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok(batch)
}

/// Logs each rejection with the offending field value, redacted unless
/// `--log-data` is set.
fn log_rejections(rejections: &RejectionReport, batch: &RawBatch) {
    if rejections.is_empty() || !tracing::enabled!(Level::TRACE) {
        return;
    }
    let by_id: HashMap<RecordId, &RawRecord> = batch
        .records
        .iter()
        .map(|record| (record.id, record))
        .collect();
    for rejection in rejections {
        let field = rejection.reason.field();
        let value = field
            .and_then(|field| by_id.get(&rejection.record)?.get(field))
            .map(ToString::to_string)
            .unwrap_or_default();
        trace!(
            record = %rejection.record,
            reason = %rejection.reason,
            field = field.unwrap_or("-"),
            value = redact_value(&value),
            "record rejected"
        );
    }
}

fn write_json(path: &Path, normalized: &Normalized) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, normalized)
        .with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}
