/// CSV report writer: one file per wallet address
use crate::errors::ExportError;
use crate::logger::{self, LogTag};
use crate::tokens::types::{OutputRow, UNKNOWN};
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_HEADER: [&str; 7] = [
    "mint",
    "tokenAmount",
    "tokenName",
    "tokenSymbol",
    "type",
    "coinGeckoId",
    "tokenPrice",
];

/// `<first 4 chars of address>-balances.csv`
pub fn report_file_name(address: &str) -> String {
    let prefix: String = address.chars().take(4).collect();
    format!("{}-balances.csv", prefix)
}

fn row_record(row: &OutputRow) -> [String; 7] {
    [
        row.balance.mint.clone(),
        row.balance.amount.to_string(),
        row.balance.name.clone(),
        row.balance.symbol.clone(),
        row.balance.kind.to_string(),
        row.coingecko_id
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        row.price.to_string(),
    ]
}

fn write_rows(path: &Path, rows: &[OutputRow]) -> Result<(), ExportError> {
    let csv_error = |source: csv::Error| ExportError::Csv {
        path: path.display().to_string(),
        source,
    };

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;

    writer.write_record(CSV_HEADER).map_err(csv_error)?;
    for row in rows {
        writer.write_record(row_record(row)).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Write the report for `address` into `output_dir`
///
/// Rows go to a temporary file in the same directory which is then renamed
/// over the final name, so readers never see a partial report. The temporary
/// file is removed on any failure.
pub fn write_report(
    output_dir: &Path,
    address: &str,
    rows: &[OutputRow],
) -> Result<PathBuf, ExportError> {
    let final_path = output_dir.join(report_file_name(address));
    let temp_path = output_dir.join(format!(".{}.tmp", report_file_name(address)));

    let written = write_rows(&temp_path, rows).and_then(|()| {
        fs::rename(&temp_path, &final_path).map_err(|source| ExportError::Io {
            path: final_path.display().to_string(),
            source,
        })
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    logger::info(
        LogTag::Export,
        &format!(
            "Data successfully written to {} ({} rows)",
            final_path.display(),
            rows.len()
        ),
    );

    Ok(final_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::types::{Price, TokenBalance, TokenDetails, TokenKind};
    use tempfile::TempDir;

    fn rows() -> Vec<OutputRow> {
        vec![
            OutputRow {
                balance: TokenBalance::token(
                    "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                    250.5,
                    TokenDetails::new("USD Coin", "USDC"),
                ),
                coingecko_id: Some("usd-coin".to_string()),
                price: Price::Usd(0.9998),
            },
            OutputRow {
                balance: TokenBalance::token("MintX", 3.0, TokenDetails::new("Token, with comma", "TWC")),
                coingecko_id: None,
                price: Price::Unknown,
            },
            OutputRow {
                balance: TokenBalance {
                    mint: "SOL".to_string(),
                    amount: 2.5,
                    name: "Solana".to_string(),
                    symbol: "SOL".to_string(),
                    kind: TokenKind::Native,
                },
                coingecko_id: Some("solana".to_string()),
                price: Price::Usd(101.52),
            },
        ]
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            report_file_name("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM"),
            "9WzD-balances.csv"
        );
        assert_eq!(report_file_name("ab"), "ab-balances.csv");
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let path = write_report(
            dir.path(),
            "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
            &rows(),
        )
        .unwrap();

        assert_eq!(path, dir.path().join("9WzD-balances.csv"));
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "mint,tokenAmount,tokenName,tokenSymbol,type,coinGeckoId,tokenPrice",
                "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v,250.5,USD Coin,USDC,Token,usd-coin,0.9998",
                "MintX,3,\"Token, with comma\",TWC,Token,Unknown,Unknown",
                "SOL,2.5,Solana,SOL,Native,solana,101.52",
            ]
        );

        // No temp file left behind
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["9WzD-balances.csv".to_string()]);
    }

    #[test]
    fn test_rewrite_replaces_previous_report() {
        let dir = TempDir::new().unwrap();
        let address = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
        write_report(dir.path(), address, &rows()).unwrap();
        let path = write_report(dir.path(), address, &rows()[2..]).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory at the final path makes the rename fail
        let blocker = dir.path().join("abcd-balances.csv");
        fs::create_dir(&blocker).unwrap();
        fs::write(blocker.join("keep"), "x").unwrap();

        let err = write_report(dir.path(), "abcd", &rows()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert!(!dir.path().join(".abcd-balances.csv.tmp").exists());
    }

    #[test]
    fn test_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let err = write_report(&dir.path().join("nope"), "abcd", &rows()).unwrap_err();
        assert!(matches!(err, ExportError::Csv { .. }));
    }
}
