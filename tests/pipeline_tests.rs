//! Integration tests for the dataset preprocessing pipeline.
//!
//! These tests verify end-to-end behavior over synthetic tables shaped like
//! the two built-in dataset schemas.

use dataprep::{DatasetSchema, Pipeline, PipelineConfig, write_csv};
use polars::prelude::*;
use pretty_assertions::assert_eq;

// ============================================================================
// Helper Functions
// ============================================================================

/// A WineQT-shaped table: 11 numeric features, `quality` target, `Id` column.
///
/// The last five rows duplicate the first five exactly. Nulls are injected
/// into `pH` and `chlorides`, and `residual sugar` carries one extreme
/// outlier.
fn wine_like_frame() -> DataFrame {
    let n = 105;
    // Duplicate rows reuse the source row's index so every cell matches
    let idx: Vec<usize> = (0..n).map(|i| if i < 100 { i } else { i - 100 }).collect();

    let fixed_acidity: Vec<f64> = idx.iter().map(|i| 6.0 + (i % 50) as f64 * 0.1).collect();
    let volatile_acidity: Vec<f64> = idx.iter().map(|i| 0.3 + (i % 40) as f64 * 0.01).collect();
    let citric_acid: Vec<f64> = idx.iter().map(|i| (i % 30) as f64 * 0.02).collect();
    let residual_sugar: Vec<f64> = idx
        .iter()
        .map(|i| if *i == 10 { 90.0 } else { 1.5 + (i % 20) as f64 * 0.2 })
        .collect();
    let chlorides: Vec<Option<f64>> = idx
        .iter()
        .map(|i| {
            if i % 23 == 0 {
                None
            } else {
                Some(0.05 + (i % 25) as f64 * 0.002)
            }
        })
        .collect();
    let free_so2: Vec<f64> = idx.iter().map(|i| 10.0 + (i % 35) as f64).collect();
    let total_so2: Vec<f64> = idx.iter().map(|i| 30.0 + (i % 60) as f64).collect();
    let density: Vec<f64> = idx.iter().map(|i| 0.995 + (i % 10) as f64 * 0.0005).collect();
    let ph: Vec<Option<f64>> = idx
        .iter()
        .map(|i| {
            if i % 19 == 0 {
                None
            } else {
                Some(3.0 + (i % 15) as f64 * 0.02)
            }
        })
        .collect();
    let sulphates: Vec<f64> = idx.iter().map(|i| 0.5 + (i % 12) as f64 * 0.03).collect();
    let alcohol: Vec<f64> = idx.iter().map(|i| 8.5 + (i % 6) as f64).collect();
    let quality: Vec<i64> = idx.iter().map(|i| 5 + (i % 3) as i64).collect();
    let id: Vec<i64> = idx.iter().map(|i| *i as i64).collect();

    df![
        "fixed acidity" => fixed_acidity,
        "volatile acidity" => volatile_acidity,
        "citric acid" => citric_acid,
        "residual sugar" => residual_sugar,
        "chlorides" => chlorides,
        "free sulfur dioxide" => free_so2,
        "total sulfur dioxide" => total_so2,
        "density" => density,
        "pH" => ph,
        "sulphates" => sulphates,
        "alcohol" => alcohol,
        "quality" => quality,
        "Id" => id,
    ]
    .unwrap()
}

/// A climate-agriculture-shaped table with categorical nulls.
fn climate_like_frame() -> DataFrame {
    let n = 60;
    let countries = ["India", "USA", "Brazil"];
    let crops = ["Wheat", "Rice", "Corn", "Soybean"];
    let strategies = ["Drip Irrigation", "Crop Rotation", "No Adaptation"];

    let country: Vec<Option<&str>> = (0..n)
        .map(|i| if i == 7 { None } else { Some(countries[i % 3]) })
        .collect();
    let crop_type: Vec<Option<&str>> = (0..n).map(|i| Some(crops[i % 4])).collect();
    let adaptation: Vec<Option<&str>> = (0..n)
        .map(|i| if i % 29 == 0 { None } else { Some(strategies[i % 3]) })
        .collect();

    let temperature: Vec<f64> = (0..n).map(|i| 5.0 + (i % 36) as f64).collect();
    let precipitation: Vec<f64> = (0..n).map(|i| 200.0 + (i % 50) as f64 * 40.0).collect();
    let co2: Vec<f64> = (0..n).map(|i| 1.0 + (i % 20) as f64 * 0.5).collect();
    let events: Vec<i64> = (0..n).map(|i| (i % 10) as i64).collect();
    let irrigation: Vec<f64> = (0..n).map(|i| (i * 7 % 100) as f64).collect();
    let pesticide: Vec<f64> = (0..n).map(|i| 5.0 + (i % 30) as f64 * 0.7).collect();
    let fertilizer: Vec<f64> = (0..n).map(|i| 50.0 + (i % 40) as f64 * 2.0).collect();
    let soil: Vec<f64> = (0..n).map(|i| 40.0 + (i % 55) as f64).collect();
    let crop_yield: Vec<f64> = (0..n).map(|i| 1.0 + (i % 8) as f64 * 0.5).collect();

    df![
        "Country" => country,
        "Crop_Type" => crop_type,
        "Adaptation_Strategies" => adaptation,
        "Average_Temperature_C" => temperature,
        "Total_Precipitation_mm" => precipitation,
        "CO2_Emissions_MT" => co2,
        "Extreme_Weather_Events" => events,
        "Irrigation_Access_Pct" => irrigation,
        "Pesticide_Use_KG_per_HA" => pesticide,
        "Fertilizer_Use_KG_per_HA" => fertilizer,
        "Soil_Health_Index" => soil,
        "Crop_Yield_MT_per_HA" => crop_yield,
    ]
    .unwrap()
}

fn total_nulls(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}

// ============================================================================
// Wine Quality Pipeline
// ============================================================================

#[test]
fn test_full_pipeline_wine_like() {
    let df = wine_like_frame();

    let pipeline = Pipeline::builder()
        .schema(DatasetSchema::wine_quality())
        .build()
        .unwrap();

    let result = pipeline.process(df).unwrap();

    // Five duplicate rows dropped, capping keeps the rest
    assert_eq!(result.summary.rows_before, 105);
    assert_eq!(result.summary.duplicates_removed, 5);
    assert_eq!(result.summary.rows_after, 100);

    // Nulls in pH and chlorides were imputed
    assert!(result.summary.cells_imputed > 0);
    assert_eq!(total_nulls(&result.data), 0);

    // The residual sugar spike was clamped
    assert!(result.summary.outliers_capped > 0);
    let sugar = result.data.column("residual sugar").unwrap();
    assert!(sugar.f64().unwrap().into_iter().flatten().all(f64::is_finite));

    // Identifier gone, derived band present, target last
    let names: Vec<String> = result
        .data
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert!(!names.contains(&"Id".to_string()));
    assert!(names.contains(&"alcohol band".to_string()));
    assert_eq!(names.last().unwrap(), "quality");

    // Features are standardized
    let alcohol = result.data.column("alcohol").unwrap().as_materialized_series();
    assert!(alcohol.mean().unwrap().abs() < 1e-9);

    // The target keeps its original scale
    let quality = result.data.column("quality").unwrap().as_materialized_series();
    assert_eq!(quality.min::<i64>().unwrap(), Some(5));
    assert_eq!(quality.max::<i64>().unwrap(), Some(7));

    // Default wine split is stratified 80/20
    let train = result.train.as_ref().unwrap();
    let test = result.test.as_ref().unwrap();
    assert_eq!(train.height() + test.height(), 100);
    assert!((18..=22).contains(&test.height()));
}

#[test]
fn test_pipeline_is_deterministic() {
    let pipeline = Pipeline::builder()
        .schema(DatasetSchema::wine_quality())
        .build()
        .unwrap();

    let a = pipeline.process(wine_like_frame()).unwrap();
    let b = pipeline.process(wine_like_frame()).unwrap();

    assert!(a.data.equals(&b.data));
    assert!(a.train.unwrap().equals(&b.train.unwrap()));
    assert!(a.test.unwrap().equals(&b.test.unwrap()));
}

#[test]
fn test_run_writes_output_and_partitions() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wine.csv");
    let output = dir.path().join("out/wine_preprocessing.csv");

    write_csv(&mut wine_like_frame(), &input).unwrap();

    let pipeline = Pipeline::builder()
        .schema(DatasetSchema::wine_quality())
        .build()
        .unwrap();
    pipeline.run(&input, &output).unwrap();

    assert!(output.exists());
    assert!(dir.path().join("out/wine_preprocessing_train.csv").exists());
    assert!(dir.path().join("out/wine_preprocessing_test.csv").exists());

    let written = dataprep::load_csv(&output).unwrap();
    assert_eq!(written.height(), 100);
    assert!(written.column("Id").is_err());
}

#[test]
fn test_run_without_split_writes_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wine.csv");
    let output = dir.path().join("wine_preprocessing.csv");

    write_csv(&mut wine_like_frame(), &input).unwrap();

    let pipeline = Pipeline::builder()
        .schema(DatasetSchema::wine_quality())
        .config(PipelineConfig::builder().split(None).build().unwrap())
        .build()
        .unwrap();
    let result = pipeline.run(&input, &output).unwrap();

    assert!(result.train.is_none());
    assert!(result.test.is_none());
    assert!(output.exists());
    assert!(!dir.path().join("wine_preprocessing_train.csv").exists());
    assert!(!dir.path().join("wine_preprocessing_test.csv").exists());
}

// ============================================================================
// Climate Agriculture Pipeline
// ============================================================================

#[test]
fn test_full_pipeline_climate_like() {
    let pipeline = Pipeline::builder()
        .schema(DatasetSchema::climate_agriculture())
        .build()
        .unwrap();

    let result = pipeline.process(climate_like_frame()).unwrap();

    assert_eq!(total_nulls(&result.data), 0);

    let names: Vec<String> = result
        .data
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    assert!(names.contains(&"Temperature_Band".to_string()));
    assert!(names.contains(&"Climate_Stress_Index".to_string()));
    assert!(names.contains(&"Water_Availability_Index".to_string()));
    assert_eq!(names.last().unwrap(), "Crop_Yield_MT_per_HA");

    // Three declared categoricals plus the derived band get encoding maps
    let encoded: Vec<&str> = result.encodings.iter().map(|e| e.column.as_str()).collect();
    assert_eq!(
        encoded,
        vec![
            "Country",
            "Crop_Type",
            "Adaptation_Strategies",
            "Temperature_Band"
        ]
    );

    // Every feature column ends up standardized Float64
    for name in names.iter().filter(|n| *n != "Crop_Yield_MT_per_HA") {
        let col = result.data.column(name).unwrap().as_materialized_series();
        assert_eq!(col.dtype(), &DataType::Float64, "column {name}");
        assert!(col.mean().unwrap().abs() < 1e-9, "column {name}");
    }

    // Climate splits are seeded but not stratified by default
    let train = result.train.as_ref().unwrap();
    let test = result.test.as_ref().unwrap();
    assert_eq!(train.height() + test.height(), 60);
    assert_eq!(test.height(), 12);
}

#[test]
fn test_climate_encoding_is_sorted_and_stable() {
    let pipeline = Pipeline::builder()
        .schema(DatasetSchema::climate_agriculture())
        .build()
        .unwrap();

    let result = pipeline.process(climate_like_frame()).unwrap();

    let country = result
        .encodings
        .iter()
        .find(|e| e.column == "Country")
        .unwrap();
    assert_eq!(country.categories, vec!["Brazil", "India", "USA"]);
    assert_eq!(country.code_of("Brazil"), Some(0));
    assert_eq!(country.code_of("USA"), Some(2));
}

// ============================================================================
// Error Paths
// ============================================================================

#[test]
fn test_missing_declared_column_is_a_schema_error() {
    let df = wine_like_frame().drop("alcohol").unwrap();

    let pipeline = Pipeline::builder()
        .schema(DatasetSchema::wine_quality())
        .build()
        .unwrap();

    let err = pipeline.process(df).unwrap_err();
    assert_eq!(err.error_code(), "SCHEMA_ERROR");
    assert!(err.to_string().contains("alcohol"));
}

#[test]
fn test_undeclared_extra_column_is_rejected() {
    let mut df = wine_like_frame();
    df.with_column(Series::new("extra".into(), vec![1.0; df.height()]))
        .unwrap();

    let pipeline = Pipeline::builder()
        .schema(DatasetSchema::wine_quality())
        .build()
        .unwrap();

    let err = pipeline.process(df).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_CONFIG");
}

#[test]
fn test_missing_input_file_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();

    let pipeline = Pipeline::builder()
        .schema(DatasetSchema::wine_quality())
        .build()
        .unwrap();

    let err = pipeline
        .run(
            &dir.path().join("does_not_exist.csv"),
            &dir.path().join("out.csv"),
        )
        .unwrap_err();
    assert_eq!(err.error_code(), "LOAD_ERROR");
}
