use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Respondent, SurveyDataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a survey table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the Findex column names, one respondent per row
/// * `.parquet` – same columns as flat Parquet fields
/// * `.json`    – records orientation, `[{ "economy": ..., "age": ... }, ...]`
pub fn load_file(path: &Path) -> Result<SurveyDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming at least the columns of [`Respondent`];
/// extra columns are ignored. Row decoding goes through serde.
fn load_csv(path: &Path) -> Result<SurveyDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    let mut respondents = Vec::new();
    for (row_no, result) in reader.deserialize::<Respondent>().enumerate() {
        let respondent = result.with_context(|| format!("CSV row {row_no}"))?;
        respondents.push(respondent);
    }

    Ok(SurveyDataset::from_respondents(respondents))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "economy": "Philippines", "economycode": "PHL", "regionwb": "East Asia & Pacific",
///     "wpid_random": 101, "female": 2, "age": 31.0, "educ": 2, "inc_q": 3,
///     "account_fin": 1, "fin17a": 2, "fin24": 1, "fin2": 2 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<SurveyDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let respondents: Vec<Respondent> =
        serde_json::from_str(&text).context("parsing JSON records")?;
    Ok(SurveyDataset::from_respondents(respondents))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the survey columns as flat fields.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); integer columns may arrive as Int32 or
/// Int64 and `age` as Float32, Float64, or an integer type.
fn load_parquet(path: &Path) -> Result<SurveyDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut respondents = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        for row in 0..batch.num_rows() {
            let respondent = Respondent {
                economy: string_at(&batch, "economy", row)?,
                economy_code: string_at(&batch, "economycode", row)?,
                region: string_at(&batch, "regionwb", row)?,
                respondent_id: int_at(&batch, "wpid_random", row)?,
                female: int_at(&batch, "female", row)?,
                age: float_at(&batch, "age", row)?,
                educ: int_at(&batch, "educ", row)?,
                inc_q: int_at(&batch, "inc_q", row)?,
                account_fin: int_at(&batch, "account_fin", row)?,
                fin17a: int_at(&batch, "fin17a", row)?,
                fin24: int_at(&batch, "fin24", row)?,
                fin2: int_at(&batch, "fin2", row)?,
            };
            respondents.push(respondent);
        }
    }

    Ok(SurveyDataset::from_respondents(respondents))
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str, row: usize) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    let col = batch.column(idx);
    if col.is_null(row) {
        bail!("Row {row}: null value in '{name}'");
    }
    Ok(col)
}

fn string_at(batch: &RecordBatch, name: &str, row: usize) -> Result<String> {
    let col = column(batch, name, row)?;
    let arr = col
        .as_any()
        .downcast_ref::<StringArray>()
        .with_context(|| format!("Column '{name}' is not Utf8"))?;
    Ok(arr.value(row).to_string())
}

fn int_at(batch: &RecordBatch, name: &str, row: usize) -> Result<i64> {
    let col = column(batch, name, row)?;
    match col.data_type() {
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(arr.value(row) as i64)
        }
        other => bail!("Column '{name}' has type {other:?}, expected an integer"),
    }
}

fn float_at(batch: &RecordBatch, name: &str, row: usize) -> Result<f64> {
    let col = column(batch, name, row)?;
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Ok(arr.value(row) as f64)
        }
        DataType::Int64 | DataType::Int32 => int_at(batch, name, row).map(|v| v as f64),
        other => bail!("Column '{name}' has type {other:?}, expected a number"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "economy,economycode,regionwb,wpid_random,female,age,educ,inc_q,account_fin,fin17a,fin24,fin2";

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn csv_rows_decode_into_respondents() {
        let csv = format!(
            "{HEADER}\n\
             Philippines,PHL,East Asia & Pacific,101,2,31,2,3,1,2,1,2\n\
             Malaysia,MYS,East Asia & Pacific,102,1,48.5,3,5,1,1,1,1\n"
        );
        let path = write_temp("findex_loader_ok.csv", &csv);
        let ds = load_file(&path).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.economies, vec!["Malaysia", "Philippines"]);
        let first = &ds.respondents[0];
        assert_eq!(first.economy_code, "PHL");
        assert_eq!(first.respondent_id, 101);
        assert!((first.age - 31.0).abs() < f64::EPSILON);
        assert_eq!(first.fin2, 2);
    }

    #[test]
    fn malformed_csv_cell_is_an_error() {
        let csv = format!(
            "{HEADER}\n\
             Philippines,PHL,East Asia & Pacific,101,2,not_a_number,2,3,1,2,1,2\n"
        );
        let path = write_temp("findex_loader_bad.csv", &csv);
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn json_records_decode_into_respondents() {
        let json = r#"[
            { "economy": "Philippines", "economycode": "PHL",
              "regionwb": "East Asia & Pacific", "wpid_random": 7,
              "female": 1, "age": 22.0, "educ": 1, "inc_q": 2,
              "account_fin": 2, "fin17a": 2, "fin24": 2, "fin2": 2 }
        ]"#;
        let path = write_temp("findex_loader_ok.json", json);
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.respondents[0].economy, "Philippines");
        assert_eq!(ds.respondents[0].account_fin, 2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let path = write_temp("findex_loader.xlsx", "not really a spreadsheet");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
