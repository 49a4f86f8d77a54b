use crate::args::ImportArgs;
use crate::commands::Out;
use crate::{import as csv_import, Config, Result};
use serde::Serialize;

/// Counts of what an import wrote.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct ImportReport {
    pub customers: usize,
    pub transactions: usize,
}

/// Reads the CSV files named in `args` and writes them to the SQLite store. Nothing is written
/// unless both files parse completely.
pub async fn import(config: Config, args: &ImportArgs) -> Result<Out<ImportReport>> {
    let directory = config.sqlite_directory().await?;
    let records = csv_import::read_files(args.customers(), args.transactions())?;
    let transactions = directory.insert(&records).await?;
    let report = ImportReport {
        customers: records.len(),
        transactions,
    };
    Ok(Out::new(
        format!(
            "Imported {} customers and {} transactions",
            report.customers, report.transactions
        ),
        report,
    ))
}
