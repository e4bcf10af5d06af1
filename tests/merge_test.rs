use ffa_scraper::{ScraperError, store::merge_partials};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_missing_partial_aborts_with_exact_names() {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    let inputs: Vec<PathBuf> = (1..=3)
        .map(|i| data.join(format!("raw_master_ffa_results_part{}.csv", i)))
        .collect();
    fs::write(&inputs[1], "rank,time,athlete_name,athlete_page\n1,31'02'',A,p\n").unwrap();

    let output = data.join("raw_master_ffa_results.csv");
    let backup = data.join("raw_master_ffa_results_backup.csv");
    let err = merge_partials(&inputs, &output, &backup).unwrap_err();

    match &err {
        ScraperError::MergeInputMissing { missing } => {
            assert_eq!(missing, &vec![inputs[0].clone(), inputs[2].clone()]);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("part1"));
    assert_eq!(err.exit_code(), 8);
    assert!(!output.exists());
    assert!(!backup.exists());
}

#[test]
fn test_merge_of_three_parts() {
    let temp = TempDir::new().unwrap();
    let header = "rank,time,athlete_name,athlete_page\n";
    let parts = [
        format!("{}1,30'00'',A,pa\n2,31'00'',B,pb\n", header),
        format!("{}2,31'00'',B,pb\n", header),
        format!("{}3,32'00'',C,pc\n", header),
    ];
    let inputs: Vec<PathBuf> = parts
        .iter()
        .enumerate()
        .map(|(i, content)| {
            let path = temp.path().join(format!("part{}.csv", i + 1));
            fs::write(&path, content).unwrap();
            path
        })
        .collect();

    let output = temp.path().join("merged.csv");
    let backup = temp.path().join("merged_backup.csv");
    let report = merge_partials(&inputs, &output, &backup).unwrap();

    assert_eq!(report.rows_read, 4);
    assert_eq!(report.rows_written, 3);
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        format!("{}1,30'00'',A,pa\n2,31'00'',B,pb\n3,32'00'',C,pc\n", header)
    );
    assert_eq!(fs::read(&output).unwrap(), fs::read(&backup).unwrap());
}
