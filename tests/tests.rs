use assert_cmd::prelude::*;
use lazy_static::lazy_static;
use predicates::str::{contains, starts_with};
use regex::Regex;
use std::process::Command;

lazy_static! {
    static ref TRIPLET_REGEX: Regex = Regex::new(r"^(\d+)\t(\d+)\t([0-9.]+)$").unwrap();
    static ref LEAF_REGEX: Regex = Regex::new(r"^>([A-Z]+)((\t\d+:\d+)+)$").unwrap();
}

const GAPPY_MERGED: &str = "0\t1\t2\t1\t1\t0\t2\t1\t1\t2\t0\t2\t0\t2\t2\t0\n\
                            1\t1\t1\t1\t1\t0\t1\t0\t1\t2\t0\t2\t1\t1\t2\t0\n\
                            1\t1\t1\t1\t1\t0\t1\t0\t1\t2\t0\t2\t1\t1\t2\t0\n";

fn strkernel() -> Command {
    Command::cargo_bin("strkernel").unwrap()
}

#[test]
fn cli_no_args() {
    strkernel().assert().failure();
}

#[test]
fn cli_no_such_file() {
    strkernel()
        .args(&["gappy", "-k", "1", "tests/no_such_file.fa"])
        .assert()
        .failure()
        .stderr(contains("FastaError"));
}

#[test]
fn cli_empty_fasta_gives_empty_matrix() {
    strkernel()
        .args(&["spectrum", "-k", "2", "--sparse", "tests/input/empty.fa"])
        .assert()
        .success()
        .stdout("#shape\t0\t16\n");
    strkernel()
        .args(&["motif", "-m", "A[CG]T", "tests/input/empty.fa"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn cli_empty_fasta_mismatch() {
    strkernel()
        .args(&["mismatch", "-k", "2", "-m", "1", "tests/input/empty.fa"])
        .assert()
        .failure()
        .stderr(contains("EmptyInput"));
}

#[test]
fn cli_fasta_shorter_than_compression_header() {
    strkernel()
        .args(&["spectrum", "-k", "1", "tests/input/tiny.fa"])
        .assert()
        .success()
        .stdout("1\t0\t0\t0\n");
}

#[test]
fn cli_motif_regression() {
    strkernel()
        .args(&[
            "motif",
            "-m",
            "A[CG]T",
            "-m",
            "C.G",
            "-m",
            "C..G.T",
            "-m",
            "G[A][AT]",
            "-m",
            "GT.A[CA].[CT]G",
            "tests/input/single.fa",
        ])
        .assert()
        .success()
        .stdout("1\t1\t1\t0\t0\n");
}

#[test]
fn cli_motif_file_sparse() {
    strkernel()
        .args(&[
            "motif",
            "--motif-file",
            "tests/input/motifs.txt",
            "--sparse",
            "tests/input/motif.fa",
        ])
        .assert()
        .success()
        .stdout("#shape\t5\t4\n3\t1\t1\n4\t0\t1\n4\t2\t1\n");
}

#[test]
fn cli_motif_without_motifs() {
    strkernel()
        .args(&["motif", "tests/input/motif.fa"])
        .assert()
        .failure()
        .stderr(contains("NoMotifs"));
}

#[test]
fn cli_gappy_merged() {
    strkernel()
        .args(&["gappy", "-k", "1", "-g", "1", "--merge-gaps", "tests/input/gappy.fa"])
        .assert()
        .success()
        .stdout(GAPPY_MERGED);
}

#[test]
fn cli_gappy_without_gap_points_to_spectrum() {
    strkernel()
        .args(&["gappy", "-k", "1", "tests/input/gappy.fa"])
        .assert()
        .success()
        .stderr(contains("spectrum -k 1"))
        .stdout(starts_with("0\t1\t0\t1\t"));
}

#[test]
fn cli_gappy_trie_and_compressed_input() {
    strkernel()
        .args(&[
            "gappy",
            "-k",
            "1",
            "-g",
            "1",
            "--merge-gaps",
            "--trie",
            "tests/input/gappy.fa.gz",
        ])
        .assert()
        .success()
        .stdout(GAPPY_MERGED);
}

#[test]
fn cli_gappy_sparse_triplets() {
    let output = strkernel()
        .args(&["gappy", "-k", "2", "-g", "2", "--sparse", "tests/input/gappy.fa"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("#shape\t3\t768"));
    let mut entries = 0;
    for line in lines {
        let caps = TRIPLET_REGEX.captures(line).unwrap();
        assert!(caps[1].parse::<usize>().unwrap() < 3);
        assert!(caps[2].parse::<usize>().unwrap() < 768);
        assert!(caps[3].parse::<f64>().unwrap() > 0.0);
        entries += 1;
    }
    assert!(entries > 0);
}

#[test]
fn cli_gappy_reverse_needs_nucleotides() {
    strkernel()
        .args(&["gappy", "-k", "1", "-a", "aa", "--reverse", "tests/input/gappy.fa"])
        .assert()
        .failure()
        .stderr(contains("ReverseComplementUnsupported"));
}

#[test]
fn cli_spectrum() {
    strkernel()
        .args(&["spectrum", "-k", "1", "tests/input/gappy.fa"])
        .assert()
        .success()
        .stdout("2\t3\t3\t2\n2\t2\t3\t2\n2\t2\t3\t2\n");
}

#[test]
fn cli_spectrum_with_flanking() {
    strkernel()
        .args(&["spectrum", "-k", "1", "--include-flanking", "tests/input/gappy.fa"])
        .assert()
        .success()
        .stdout(contains("5\t2\t4\t2\n"));
}

#[test]
fn cli_spectrum_kernel() {
    strkernel()
        .args(&["spectrum", "-k", "1", "--kernel", "tests/input/gappy.fa"])
        .assert()
        .success()
        .stdout(starts_with("26\t23\t23\n"));
}

#[test]
fn cli_mismatch_raw_kernel_and_leaves() {
    let output = strkernel()
        .args(&[
            "mismatch",
            "-k",
            "2",
            "-m",
            "0",
            "--no-normalize",
            "--leaves",
            "tests/input/mismatch.fa",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(&lines[..2], &["5\t3", "3\t3"]);

    let leaves: Vec<(String, String)> = lines[2..]
        .iter()
        .map(|line| {
            let caps = LEAF_REGEX.captures(line).unwrap();
            (caps[1].to_string(), caps[2].to_string())
        })
        .collect();
    assert_eq!(
        leaves,
        vec![
            ("AC".to_string(), "\t0:2\t1:1".to_string()),
            ("CA".to_string(), "\t0:1\t1:1".to_string()),
            ("CC".to_string(), "\t1:1".to_string()),
        ]
    );
}

#[test]
fn cli_mismatch_normalized_diagonal() {
    strkernel()
        .args(&["mismatch", "-k", "2", "-m", "1", "tests/input/mismatch.fa"])
        .assert()
        .success()
        .stdout(starts_with("1\t"));
}

#[test]
fn cli_mismatch_too_many_mismatches() {
    strkernel()
        .args(&["mismatch", "-k", "3", "-m", "2", "tests/input/mismatch.fa"])
        .assert()
        .failure()
        .stderr(contains("MismatchTooLarge"));
}
