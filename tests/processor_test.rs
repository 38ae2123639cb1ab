mod common;

use common::{read, write, Fixture};
use layercake::arguments::CombinedArgs;
use layercake::composer::compose_base;
use layercake::config::LayercakeConfig;
use layercake::error::Error;
use layercake::options::ScaffoldOptions;
use layercake::processor::{collect_templates, render_templates, resolve_args_files};
use layercake::registry::ExtensionRegistry;
use layercake::renderer::{MiniJinjaLoader, RegisteredTemplates};
use layercake::template::Provenance;
use std::path::PathBuf;

fn options(dev: bool) -> ScaffoldOptions {
    ScaffoldOptions::new(dev, &LayercakeConfig::default())
}

const DEPS_TEMPLATE: &str = "{% for dep in deps %}{{ dep }}\n{% endfor %}extra={{ extra | length }}";

fn two_extensions() -> (Fixture, ExtensionRegistry) {
    let fixture = Fixture::new();
    write(&fixture.base(), "deps.txt.template.j2", DEPS_TEMPLATE);
    let a = fixture.add_extension("a", Some(r#"{"name": "Alpha"}"#));
    let b = fixture.add_extension("b", None);
    write(&a, "deps.txt.args.j2", r#"{"deps": "first", "extra": []}"#);
    write(&b, "deps.txt.args.j2", "deps: second\nextra: [1]\nignored: true\n");
    let registry = ExtensionRegistry::scan(fixture.root()).unwrap();
    (fixture, registry)
}

#[test]
fn test_base_only_render_with_empty_arguments() {
    let fixture = Fixture::new();
    write(&fixture.base(), "config.json.template.j2", r#"{"count": {{ deps | default([]) | length }}}"#);
    write(&fixture.base(), "nested/.env.template.j2", "KEYS={{ x | default('none') }}");
    let registry = ExtensionRegistry::scan(fixture.root()).unwrap();
    let target = fixture.target();

    let written = render_templates::<&str>(&options(false), &registry, &[], &fixture.base(), &target, &MiniJinjaLoader::new()).unwrap();

    assert_eq!(written, 2);
    assert_eq!(read(&target, "config.json"), r#"{"count": 0}"#);
    assert_eq!(read(&target, "nested/.env"), "KEYS=none");
    assert!(!target.join("config.json.dev").exists());
}

#[test]
fn test_arguments_accumulate_in_selection_order() {
    let (fixture, registry) = two_extensions();
    let target = fixture.target();

    render_templates(&options(false), &registry, &["a", "b"], &fixture.base(), &target, &MiniJinjaLoader::new()).unwrap();
    assert_eq!(read(&target, "deps.txt"), "first\nsecond\nextra=2");

    let reversed = fixture.temp.path().join("reversed");
    std::fs::create_dir_all(&reversed).unwrap();
    render_templates(&options(false), &registry, &["b", "a"], &fixture.base(), &reversed, &MiniJinjaLoader::new()).unwrap();
    assert_eq!(read(&reversed, "deps.txt"), "second\nfirst\nextra=2");
}

#[test]
fn test_keys_missing_from_first_args_file_are_dropped() {
    let fixture = Fixture::new();
    write(&fixture.base(), "out.txt.template.j2", "x={{ x | join(',') }};y={{ y is defined }}");
    let a = fixture.add_extension("a", None);
    let b = fixture.add_extension("b", None);
    write(&a, "out.txt.args.json", r#"{"x": 1}"#);
    write(&b, "out.txt.args.json", r#"{"x": 2, "y": 3}"#);
    let registry = ExtensionRegistry::scan(fixture.root()).unwrap();
    let target = fixture.target();

    render_templates(&options(false), &registry, &["a", "b"], &fixture.base(), &target, &MiniJinjaLoader::new()).unwrap();

    assert_eq!(read(&target, "out.txt"), "x=1,2;y=false");
}

#[test]
fn test_extension_templates_and_args_paths() {
    let (fixture, _) = two_extensions();
    write(&fixture.extension("a"), "packages/app/README.md.template.j2", "# app");
    write(&fixture.extension("a"), "extensions/nested/skip.md.template.j2", "nested");
    let registry = ExtensionRegistry::scan(fixture.root()).unwrap();

    let templates = collect_templates(&registry, &["a", "b"], &fixture.base()).unwrap();
    let summary: Vec<(PathBuf, Provenance)> = templates
        .iter()
        .map(|t| (t.output_relative_path(), t.provenance.clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (PathBuf::from("deps.txt"), Provenance::Base),
            (PathBuf::from("packages/app/README.md"), Provenance::Extension("Alpha".to_string())),
        ]
    );

    let args = resolve_args_files(&templates[0], &registry, &["b", "a"]).unwrap();
    assert_eq!(
        args,
        vec![
            fixture.extension("b").canonicalize().unwrap().join("deps.txt.args.j2"),
            fixture.extension("a").canonicalize().unwrap().join("deps.txt.args.j2"),
        ]
    );
}

#[test_log::test]
fn test_dev_mode_writes_diagnostics() {
    let (fixture, registry) = two_extensions();
    write(&fixture.base(), "plain.txt.template.j2", "plain");
    let target = fixture.target();

    render_templates(&options(true), &registry, &["a", "b"], &fixture.base(), &target, &MiniJinjaLoader::new()).unwrap();

    let report = read(&target, "deps.txt.dev");
    assert!(report.starts_with("--- TEMPLATE FILE\n"));
    assert!(report.contains("deps.txt.template.j2 (base)"));
    assert!(report.contains("--- ARGS FILES\n\t- "));
    assert!(report.contains("\t- deps:\t[first,second]"));
    assert!(report.contains("\t- extra:\t[[],[1]]"));
    assert!(!report.contains("ignored"));

    let plain = read(&target, "plain.txt.dev");
    assert!(plain.contains("(no args files writing to the template)"));
    assert!(plain.contains("(no args sent for the template)"));
}

#[test]
fn test_invalid_template_is_contract_violation() {
    let fixture = Fixture::new();
    let ext = fixture.add_extension("broken", Some(r#"{"name": "Broken"}"#));
    write(&ext, "page.tsx.template.j2", "{% for %}");
    let registry = ExtensionRegistry::scan(fixture.root()).unwrap();
    let target = fixture.target();

    let err = render_templates(&options(false), &registry, &["broken"], &fixture.base(), &target, &MiniJinjaLoader::new()).unwrap_err();

    match err {
        Error::TemplateContractError { template, source_label, .. } => {
            assert_eq!(template, "page.tsx");
            assert_eq!(source_label, "extension Broken");
        }
        other => panic!("Expected TemplateContractError, got {other:?}"),
    }
    assert!(!target.join("page.tsx").exists());
}

#[test]
fn test_failing_render_aborts_without_writing() {
    let fixture = Fixture::new();
    write(&fixture.base(), "ok.txt.template.j2", "ok");
    write(&fixture.base(), "bad.txt.template.j2", "{{ missing.field }}");
    let registry = ExtensionRegistry::scan(fixture.root()).unwrap();
    let target = fixture.target();

    let err = render_templates::<&str>(&options(false), &registry, &[], &fixture.base(), &target, &MiniJinjaLoader::new()).unwrap_err();

    assert!(matches!(err, Error::RenderError { ref template, .. } if template == "bad.txt"));
    assert!(!target.join("ok.txt").exists());
}

#[test]
fn test_registered_templates_loader() {
    let (fixture, registry) = two_extensions();
    let target = fixture.target();
    let mut loader = RegisteredTemplates::new();
    loader.register("deps.txt", |args: &CombinedArgs| {
        Ok(args["deps"].iter().map(|v| v.as_str().unwrap_or_default()).collect::<Vec<_>>().join("+"))
    });

    render_templates(&options(false), &registry, &["a", "b"], &fixture.base(), &target, &loader).unwrap();

    assert_eq!(read(&target, "deps.txt"), "first+second");
}

#[test]
fn test_rendering_is_deterministic() {
    let (fixture, registry) = two_extensions();
    for i in 0..8 {
        write(&fixture.extension("b"), format!("gen/file{i}.txt.template.j2"), "{{ deps | default([]) | length }}");
    }
    let first = fixture.temp.path().join("first");
    let second = fixture.temp.path().join("second");
    std::fs::create_dir_all(&first).unwrap();
    std::fs::create_dir_all(&second).unwrap();

    for target in [&first, &second] {
        render_templates(&options(false), &registry, &["a", "b"], &fixture.base(), target, &MiniJinjaLoader::new()).unwrap();
    }

    assert!(!dir_diff::is_different(&first, &second).unwrap());
}

#[test_log::test]
fn test_first_rendered_output_wins() {
    let fixture = Fixture::new();
    write(&fixture.base(), "README.md.template.j2", "base");
    let ext = fixture.add_extension("a", None);
    write(&ext, "README.md.template.j2", "extension");
    let registry = ExtensionRegistry::scan(fixture.root()).unwrap();
    let target = fixture.target();

    let written = render_templates(&options(false), &registry, &["a"], &fixture.base(), &target, &MiniJinjaLoader::new()).unwrap();

    assert_eq!(written, 1);
    assert_eq!(read(&target, "README.md"), "base");
}

#[test]
fn test_dev_render_does_not_write_through_linked_file() {
    let fixture = Fixture::new();
    let source = write(&fixture.base(), "README.md", "orig");
    write(&fixture.base(), "README.md.template.j2", "rendered");
    let registry = ExtensionRegistry::scan(fixture.root()).unwrap();
    let target = fixture.target();

    compose_base(&options(true), &fixture.base(), &target).unwrap();
    render_templates::<&str>(&options(true), &registry, &[], &fixture.base(), &target, &MiniJinjaLoader::new()).unwrap();

    assert_eq!(read(&target, "README.md"), "rendered");
    assert_eq!(std::fs::read_to_string(source).unwrap(), "orig");
}
