/// Wallet balance aggregation and CSV export
///
/// - `aggregator` - `BalanceAggregator` and the `BalanceSource` seam
/// - `filter` - dust and unknown-token rules
/// - `export` - one CSV report per address
/// - `batch` - sequential processing of an address list
pub mod aggregator;
pub mod batch;
pub mod export;
pub mod filter;

pub use aggregator::{lamports_to_sol, BalanceAggregator, BalanceSource};
pub use batch::{parse_addresses, read_addresses, run_batch, BatchSummary};
pub use export::{report_file_name, write_report, CSV_HEADER};
pub use filter::BalanceFilter;
