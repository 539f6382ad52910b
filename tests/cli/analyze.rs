use anyhow::Result;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use crate::{CliTest, run};

const TWO_RECORDS: &str = r#"
@article{doe2020,
  title = {Resolving names},
  author = {Doe, J. and
            Roe, A.},
  year = {2020}
}

@inproceedings{smith2021,
  author = {Smith, K.},
  title = {A single author}
}
"#;

const OUTPUTS: [&str; 4] = ["missed.tsv", "resolved.tsv", "gender.tsv", "stats.tsv"];

#[test]
fn test_two_records_without_api_key() -> Result<()> {
    let test = CliTest::with_file("refs.bib", TWO_RECORDS)?;
    test.write_cache(r#"{"doe": "M", "roe": "F"}"#)?;

    let mut cmd = test.analyze_command();
    cmd.arg("refs.bib").args(OUTPUTS);
    let result = run(cmd)?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    insta::assert_snapshot!(result.stdout, @r"
    Category  Count  Ratio
    MM            0  0.0
    MF            1  0.5
    MNone         0  0.0
    FM            0  0.0
    FF            0  0.0
    FNone         0  0.0
    NoneM         0  0.0
    NoneF         0  0.0
    NoneNone      1  0.5
    ✓ Analyzed 2 records, 1 unresolved name
    ");
    assert!(
        result
            .stderr
            .contains("No Gender API key - 1 names could not be mapped."),
        "stderr: {}",
        result.stderr
    );

    assert_eq!(test.read_file("missed.tsv")?, "name\nsmith\n");
    assert_eq!(
        test.read_file("resolved.tsv")?,
        "BIB_KEY\tFA_NAME\tFA_GENDER\tLA_NAME\tLA_GENDER\n\
         doe2020\tdoe\tM\troe\tF\n\
         smith2021\tsmith\tNA\tsmith\tNA\n"
    );
    assert_eq!(
        test.read_file("gender.tsv")?,
        "MM\tMF\tMNone\tFM\tFF\tFNone\tNoneM\tNoneF\tNoneNone\n\
         0\t1\t0\t0\t0\t0\t0\t0\t1\n"
    );
    let stats = test.read_file("stats.tsv")?;
    assert!(stats.starts_with("Category\tRatio\nMM\t0.0\nMF\t0.5\n"));
    assert!(stats.ends_with("NoneNone\t0.5\n"));

    // Without a key nothing is learned, so the cache is untouched.
    assert_eq!(test.read_cache()?, json!({"doe": "M", "roe": "F"}));

    Ok(())
}

#[test]
fn test_single_author_record() -> Result<()> {
    let test = CliTest::with_file("refs.bib", "@article{lee2019,\n  author = {Lee, C.}\n}\n")?;
    test.write_cache(r#"{"lee": "F"}"#)?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "missed.tsv", "resolved.tsv", "gender.tsv"]);
    let result = run(cmd)?;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stdout.contains("FF            1  1.0"));
    assert!(
        result
            .stdout
            .contains("Analyzed 1 record, all authors resolved")
    );
    assert_eq!(test.read_file("missed.tsv")?, "name\n");
    assert_eq!(
        test.read_file("resolved.tsv")?,
        "BIB_KEY\tFA_NAME\tFA_GENDER\tLA_NAME\tLA_GENDER\nlee2019\tlee\tF\tlee\tF\n"
    );
    assert_eq!(
        test.read_file("gender.tsv")?,
        "MM\tMF\tMNone\tFM\tFF\tFNone\tNoneM\tNoneF\tNoneNone\n\
         0\t0\t0\t0\t1\t0\t0\t0\t0\n"
    );

    Ok(())
}

#[test]
fn test_stdout_only_without_output_files() -> Result<()> {
    let test = CliTest::with_file("refs.bib", TWO_RECORDS)?;

    let mut cmd = test.analyze_command();
    cmd.arg("refs.bib");
    let result = run(cmd)?;

    assert_eq!(result.code, Some(0));
    assert!(result.stdout.contains("NoneNone      2  1.0"));
    assert!(
        result
            .stdout
            .contains("Analyzed 2 records, 3 unresolved names")
    );

    Ok(())
}

#[test]
fn test_verbose_lists_records_and_missed_names() -> Result<()> {
    let test = CliTest::with_file("refs.bib", TWO_RECORDS)?;
    test.write_cache(r#"{"doe": "M", "roe": "F"}"#)?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "--verbose"]);
    let result = run(cmd)?;

    assert_eq!(result.code, Some(0));
    assert!(result.stdout.contains("doe2020    doe    M     roe  F"));
    assert!(
        result
            .stdout
            .contains("smith2021  smith  None  smith  None")
    );
    assert!(result.stdout.contains("Unresolved names:\n  smith\n"));

    Ok(())
}

#[test]
fn test_empty_bibliography_reports_no_data() -> Result<()> {
    let test = CliTest::with_file("refs.bib", "% nothing here\n")?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "missed.tsv", "resolved.tsv", "gender.tsv", "stats.tsv"]);
    let result = run(cmd)?;

    assert_eq!(result.code, Some(0));
    assert!(result.stderr.contains("warning: no records found"));
    assert!(result.stdout.contains("NoneNone      0  NA"));

    let stats = test.read_file("stats.tsv")?;
    assert_eq!(stats.lines().count(), 10);
    assert!(stats.lines().skip(1).all(|line| line.ends_with("\tNA")));

    Ok(())
}

#[test]
fn test_count_mismatch_warns_and_pairs_by_position() -> Result<()> {
    let test = CliTest::with_file(
        "refs.bib",
        "@misc{untitled,\n  title = {No authors}\n}\n@article{doe2020,\n  author = {Doe, J.}\n}\n",
    )?;
    test.write_cache(r#"{"doe": "M"}"#)?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "missed.tsv", "resolved.tsv"]);
    let result = run(cmd)?;

    assert_eq!(result.code, Some(0));
    assert!(
        result.stderr.contains("author field counts differ"),
        "stderr: {}",
        result.stderr
    );
    // The first header takes the first author field.
    assert_eq!(
        test.read_file("resolved.tsv")?,
        "BIB_KEY\tFA_NAME\tFA_GENDER\tLA_NAME\tLA_GENDER\nuntitled\tdoe\tM\tdoe\tM\n"
    );

    Ok(())
}

#[test]
fn test_strict_rejects_count_mismatch() -> Result<()> {
    let test = CliTest::with_file(
        "refs.bib",
        "@misc{untitled,\n  title = {No authors}\n}\n@article{doe2020,\n  author = {Doe, J.}\n}\n",
    )?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "missed.tsv", "--strict"]);
    let result = run(cmd)?;

    assert_eq!(result.code, Some(1));
    assert!(
        result
            .stderr
            .contains("error: found 2 record header(s) but 1 author field(s)")
    );
    assert!(!test.root().join("missed.tsv").exists());

    Ok(())
}

#[test]
fn test_malformed_cache_is_fatal() -> Result<()> {
    let test = CliTest::with_file("refs.bib", TWO_RECORDS)?;
    test.write_cache("{ this is not json")?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "missed.tsv"]);
    let result = run(cmd)?;

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("Failed to parse name cache"));
    assert!(!test.root().join("missed.tsv").exists());

    Ok(())
}

#[test]
fn test_missing_bibliography_is_fatal() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.analyze_command();
    cmd.arg("missing.bib");
    let result = run(cmd)?;

    assert_eq!(result.code, Some(2));
    assert!(
        result
            .stderr
            .contains("Failed to read bibliography: missing.bib")
    );

    Ok(())
}

#[test]
fn test_config_file_threshold_is_validated() -> Result<()> {
    let test = CliTest::with_file("refs.bib", TWO_RECORDS)?;
    test.write_file(".bibbiasrc.json", r#"{ "confidenceThreshold": 120 }"#)?;

    let mut cmd = test.analyze_command();
    cmd.arg("refs.bib");
    let result = run(cmd)?;

    assert_eq!(result.code, Some(2));
    assert!(result.stderr.contains("confidenceThreshold"));

    Ok(())
}

async fn gender_api() -> MockServer {
    let server = MockServer::start().await;
    let answers = [
        ("roe", json!({ "gender": "female", "accuracy": 97 })),
        ("smith", json!({ "gender": "male", "accuracy": 88 })),
        ("doe", json!({ "gender": "male", "accuracy": 45 })),
    ];
    for (name, body) in answers {
        Mock::given(method("GET"))
            .and(path("/get"))
            .and(query_param("name", name))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }
    server
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_lookup_enriches_cache() -> Result<()> {
    let server = gender_api().await;
    let test = CliTest::with_file("refs.bib", TWO_RECORDS)?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "missed.tsv", "resolved.tsv"])
        .env("GENDER_API_KEY", "test-key")
        .env("BIBBIAS_API_URL", format!("{}/get", server.uri()));
    let result = tokio::task::spawn_blocking(move || run(cmd)).await??;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stderr.contains(
        "Looked up 3 name(s): 2 accepted, 1 below confidence threshold, 0 failed"
    ));
    // "doe" came back below the confidence threshold and stays unresolved.
    assert_eq!(test.read_file("missed.tsv")?, "name\ndoe\n");
    assert_eq!(
        test.read_file("resolved.tsv")?,
        "BIB_KEY\tFA_NAME\tFA_GENDER\tLA_NAME\tLA_GENDER\n\
         doe2020\tdoe\tNA\troe\tF\n\
         smith2021\tsmith\tM\tsmith\tM\n"
    );
    assert_eq!(test.read_cache()?, json!({"roe": "F", "smith": "M"}));

    // The next run resolves learned names from the cache alone.
    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "--offline"]);
    let result = tokio::task::spawn_blocking(move || run(cmd)).await??;

    assert_eq!(result.code, Some(0));
    assert!(result.stdout.contains("NoneF         1  0.5"));
    assert!(result.stdout.contains("MM            1  0.5"));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_lookup_does_not_abort_batch() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("name", "doe"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("name", "roe"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "gender": "female", "accuracy": 60 })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("name", "smith"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let test = CliTest::with_file("refs.bib", TWO_RECORDS)?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "missed.tsv"])
        .env("GENDER_API_KEY", "test-key")
        .env("BIBBIAS_API_URL", format!("{}/get", server.uri()));
    let result = tokio::task::spawn_blocking(move || run(cmd)).await??;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert!(result.stderr.contains("lookup failed"));
    assert!(result.stderr.contains(
        "Looked up 3 name(s): 1 accepted, 0 below confidence threshold, 2 failed"
    ));
    assert_eq!(test.read_file("missed.tsv")?, "name\ndoe\nsmith\n");
    assert_eq!(test.read_cache()?, json!({"roe": "F"}));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_offline_skips_remote_lookup() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "gender": "male", "accuracy": 99 })))
        .expect(0)
        .mount(&server)
        .await;

    let test = CliTest::with_file("refs.bib", TWO_RECORDS)?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "--offline"])
        .env("GENDER_API_KEY", "test-key")
        .env("BIBBIAS_API_URL", format!("{}/get", server.uri()));
    let result = tokio::task::spawn_blocking(move || run(cmd)).await??;

    assert_eq!(result.code, Some(0));
    assert!(!result.stderr.contains("Looked up"));
    assert!(!test.root().join("cache/names.cache").exists());

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_threshold_flag_overrides_default() -> Result<()> {
    let server = gender_api().await;
    let test = CliTest::with_file("refs.bib", TWO_RECORDS)?;

    let mut cmd = test.analyze_command();
    cmd.args(["refs.bib", "--threshold", "40"])
        .env("GENDER_API_KEY", "test-key")
        .env("BIBBIAS_API_URL", format!("{}/get", server.uri()));
    let result = tokio::task::spawn_blocking(move || run(cmd)).await??;

    assert_eq!(result.code, Some(0), "stderr: {}", result.stderr);
    assert_eq!(
        test.read_cache()?,
        json!({"doe": "M", "roe": "F", "smith": "M"})
    );

    Ok(())
}
