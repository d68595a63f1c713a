//! Tests for the get subcommand.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_get_single() {
    match parse(&["hlsdm", "get", "https://cdn.example.com/show/index.m3u8"]) {
        CliCommand::Get {
            urls,
            download_dir,
            jobs,
            retries,
            json,
        } => {
            assert_eq!(urls, vec!["https://cdn.example.com/show/index.m3u8"]);
            assert!(download_dir.is_none());
            assert!(jobs.is_none());
            assert!(retries.is_none());
            assert!(!json);
        }
        _ => panic!("expected Get"),
    }
}

#[test]
fn cli_parse_get_options() {
    match parse(&[
        "hlsdm",
        "get",
        "https://a.example/1.m3u8",
        "https://b.example/2.m3u8",
        "--download-dir",
        "/tmp/hls",
        "--jobs",
        "2",
        "--retries",
        "3",
        "--json",
    ]) {
        CliCommand::Get {
            urls,
            download_dir,
            jobs,
            retries,
            json,
        } => {
            assert_eq!(urls.len(), 2);
            assert_eq!(download_dir.as_deref(), Some(std::path::Path::new("/tmp/hls")));
            assert_eq!(jobs, Some(2));
            assert_eq!(retries, Some(3));
            assert!(json);
        }
        _ => panic!("expected Get with options"),
    }
}

#[test]
fn cli_parse_get_requires_url() {
    assert!(Cli::try_parse_from(["hlsdm", "get"]).is_err());
}

#[test]
fn cli_parse_get_rejects_bad_jobs() {
    assert!(Cli::try_parse_from(["hlsdm", "get", "https://a/x.m3u8", "--jobs", "many"]).is_err());
}
