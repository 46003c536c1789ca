#[cfg(test)]
mod tests {
    use crate::core::columns::{f64_values, str_values, LIGHT_CURVE_COLUMNS};
    use crate::error::PipelineError;
    use crate::io::loaders::{source_id_from_path, CatalogLoader, HistoricalLoader};
    use crate::io::writers::{write_json_report, write_light_curve};
    use crate::parsing::table_parser::TableFormat;
    use polars::prelude::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::{tempdir, Builder};

    const CATALOG_TAB: &str = "MJD_OBS\tBAND\tFLUX_AUTO\tFLUXERR_AUTO\tMAG_ZERO\tFLAGS\n\
56530.1\tg\t1000.0\t10.0\t30.0\t0\n\
56530.2\tr\t2000.0\t20.0\t30.0\t3\n\
56531.1\ti\t-5.0\t1.0\t30.0\t0\n";

    /// Helper to create a temp file with the given suffix and content
    fn create_temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new()
            .prefix("DESY6_")
            .suffix(suffix)
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write temp file");
        file
    }

    #[test]
    fn test_source_id_from_path() {
        assert_eq!(
            source_id_from_path(Path::new("query/DESY6_2925344776.tab")),
            "DESY6_2925344776"
        );
        assert_eq!(source_id_from_path(Path::new("2925344776_lc.txt")), "2925344776_lc");
    }

    #[test]
    fn test_load_catalog_tab_file() {
        let file = create_temp_file(".tab", CATALOG_TAB);
        let result = CatalogLoader::load_from_file(file.path()).expect("Failed to load");

        assert_eq!(result.num_rows, 3);
        assert_eq!(result.format, TableFormat::Tab);
        assert!(result.source_id.starts_with("DESY6_"));

        let flux = f64_values(&result.dataframe, "FLUX_AUTO").unwrap();
        assert_eq!(flux, vec![Some(1000.0), Some(2000.0), Some(-5.0)]);
        let bands = str_values(&result.dataframe, "BAND").unwrap();
        assert_eq!(bands[2].as_deref(), Some("i"));
    }

    #[test]
    fn test_load_catalog_csv_file() {
        let content = CATALOG_TAB.replace('\t', ",");
        let file = create_temp_file(".csv", &content);
        let result = CatalogLoader::load_from_file(file.path()).expect("Failed to load");

        assert_eq!(result.format, TableFormat::Csv);
        assert_eq!(result.num_rows, 3);
        assert_eq!(result.dataframe.width(), 6);
    }

    #[test]
    fn test_load_catalog_from_str() {
        let result = CatalogLoader::load_from_str(CATALOG_TAB, "2925344776", TableFormat::Tab)
            .expect("Failed to load");
        assert_eq!(result.source_id, "2925344776");
        assert_eq!(result.num_rows, 3);
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let err = CatalogLoader::load_from_file(Path::new("/nonexistent/DESY6_1.tab")).unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }

    #[test]
    fn test_historical_missing_file_is_unavailable() {
        let err = HistoricalLoader::load_from_file(Path::new("/nonexistent/old_lc.txt")).unwrap_err();
        match err {
            PipelineError::ExternalSourceUnavailable { origin, .. } => {
                assert!(origin.contains("old_lc.txt"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_historical_wrong_layout_is_unavailable() {
        let file = create_temp_file(".txt", "MJD MAGNITUDE BAND\n56300.1 19.2 g\n");
        let err = HistoricalLoader::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::ExternalSourceUnavailable { .. }));
        assert!(err.to_string().contains("MAG_ERR"));
    }

    #[test]
    fn test_historical_non_numeric_date_is_unavailable() {
        let content = "MJD_OBS MAG MAG_ERR BAND\n\
56300.10 19.20 0.02 g\n\
bogus 19.00 0.03 r\n";
        let file = create_temp_file(".txt", content);
        let err = HistoricalLoader::load_from_file(file.path()).unwrap_err();
        match err {
            PipelineError::ExternalSourceUnavailable { reason, .. } => {
                assert_eq!(reason, "column MJD_OBS has 1 non-numeric value(s)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_historical_non_numeric_magnitude_is_unavailable() {
        let content = "MJD_OBS MAG MAG_ERR BAND\n\
56300.10 oops 0.02 g\n\
56300.12 19.00 0.03 r\n\
56301.12 oops 0.03 r\n";
        let file = create_temp_file(".txt", content);
        let err = HistoricalLoader::load_from_file(file.path()).unwrap_err();
        match err {
            PipelineError::ExternalSourceUnavailable { reason, .. } => {
                assert_eq!(reason, "column MAG has 2 non-numeric value(s)");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_historical_whitespace_file() {
        let content = "# earlier reduction\n\
MJD_OBS   MAG     MAG_ERR  BAND\n\
56300.10  19.20   0.02     g\n\
56300.12  19.00   0.03     r\n";
        let file = create_temp_file(".txt", content);
        let df = HistoricalLoader::load_from_file(file.path()).expect("Failed to load");

        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, LIGHT_CURVE_COLUMNS.to_vec());
        assert_eq!(f64_values(&df, "MAG").unwrap(), vec![Some(19.2), Some(19.0)]);
    }

    #[test]
    fn test_written_light_curve_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("2925344776_lc.txt");
        let df = df!(
            "MJD_OBS" => &[56530.15, 56531.1],
            "MAG" => &[22.5, 21.75],
            "MAG_ERR" => &[0.01, 0.02],
            "BAND" => &["g", "r"]
        )
        .unwrap();

        write_light_curve(&df, &path).expect("Failed to write");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("MJD_OBS MAG MAG_ERR BAND"));

        let loaded = HistoricalLoader::load_from_file(&path).expect("Failed to reload");
        assert_eq!(loaded.height(), 2);
        assert_eq!(str_values(&loaded, "BAND").unwrap()[1].as_deref(), Some("r"));
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json_report(&serde_json::json!({"source_id": "1", "rows": 3}), &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["rows"], 3);
    }
}
