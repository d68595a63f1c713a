//! Tests for inspect, config and unknown subcommands.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;

#[test]
fn cli_parse_inspect() {
    match parse(&["hlsdm", "inspect", "https://cdn.example.com/index.m3u8"]) {
        CliCommand::Inspect { url } => assert_eq!(url, "https://cdn.example.com/index.m3u8"),
        _ => panic!("expected Inspect"),
    }
}

#[test]
fn cli_parse_config() {
    assert!(matches!(parse(&["hlsdm", "config"]), CliCommand::Config));
}

#[test]
fn cli_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["hlsdm", "status"]).is_err());
}
