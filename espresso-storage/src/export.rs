//! Tab-separated export of a relation's promotions.

use std::io::Write;

use espresso_core::errors::StorageError;
use espresso_core::traits::PromotionStore;
use espresso_core::types::{PromotedValue, Role};

/// Writes `iteration \t score \t value...` rows, ordered by iteration, then
/// score descending. Instances spread their arguments over columns.
/// Returns the number of rows written.
pub fn export_promotions<S, W>(
    store: &S,
    relation: &str,
    role: Role,
    out: &mut W,
) -> Result<usize, StorageError>
where
    S: PromotionStore + ?Sized,
    W: Write + ?Sized,
{
    let io_err = |e: std::io::Error| StorageError::Io {
        path: "<export>".to_string(),
        message: e.to_string(),
    };

    let records = store.records(relation, role)?;
    writeln!(out, "iteration\tscore\t{}", role.as_str()).map_err(io_err)?;
    for record in &records {
        let value = match &record.value {
            PromotedValue::Instance(args) => args.to_tab_separated(),
            PromotedValue::Pattern(pattern) => pattern.to_string(),
        };
        writeln!(out, "{}\t{}\t{}", record.iteration, record.score, value).map_err(io_err)?;
    }
    out.flush().map_err(io_err)?;
    Ok(records.len())
}
