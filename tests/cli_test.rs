use clap::Parser;
use layercake::cli::Args;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("layercake")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let parsed = Args::try_parse_from(make_args(&["./my-dapp"])).unwrap();

    assert_eq!(parsed.project, Some(PathBuf::from("./my-dapp")));
    assert_eq!(parsed.templates, PathBuf::from("templates"));
    assert!(parsed.extensions.is_empty());
    assert!(!parsed.dev);
    assert!(!parsed.force);
    assert!(!parsed.verbose);
    assert!(!parsed.skip_git);
    assert!(parsed.should_install());
}

#[test]
fn test_extensions_repeat_and_comma_separated() {
    let parsed =
        Args::try_parse_from(make_args(&["-e", "hardhat,erc20", "--extension", "subgraph", "./out"]))
            .unwrap();

    assert_eq!(parsed.extensions, vec!["hardhat", "erc20", "subgraph"]);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--templates",
        "./tpl",
        "--dev",
        "--skip-install",
        "--skip-git",
        "--force",
        "--verbose",
        "./out",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.templates, PathBuf::from("./tpl"));
    assert!(parsed.dev);
    assert!(parsed.skip_git);
    assert!(parsed.force);
    assert!(parsed.verbose);
    assert!(!parsed.should_install());
}

#[test]
fn test_short_flags() {
    let parsed = Args::try_parse_from(make_args(&["-f", "-v", "-i", "-t", "tpl", "./out"])).unwrap();

    assert!(parsed.force);
    assert!(parsed.verbose);
    assert!(parsed.install);
    assert!(parsed.should_install());
    assert_eq!(parsed.templates, PathBuf::from("tpl"));
}

#[test]
fn test_install_conflicts_with_skip_install() {
    assert!(Args::try_parse_from(make_args(&["-i", "-s", "./out"])).is_err());
}

#[test]
fn test_missing_project() {
    assert!(Args::try_parse_from(make_args(&[])).is_err());
}

#[test]
fn test_list_extensions_without_project() {
    let parsed = Args::try_parse_from(make_args(&["--list-extensions"])).unwrap();

    assert!(parsed.list_extensions);
    assert_eq!(parsed.project, None);
}
