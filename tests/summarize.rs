use std::fs;
use std::path::Path;

use gosummarize::builder::{summarize_file, Summarizer};
use gosummarize::codemap::{read_codemap, Declaration, TypeBody};
use tempfile::tempdir;

const FIXTURE: &str = "tests/fixtures/sample.go";

fn summarize(path: &Path) -> String {
    let mut out = Vec::new();
    summarize_file(path, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn fixture_summary_matches_expected_blocks() {
    let out = summarize(Path::new(FIXTURE));

    let expected = "\
<<<FILE_START>>> tests/fixtures/sample.go

type Store struct {
\t// Name identifies the store in logs.
\tName\tstring
\tLimit\tint
}
    Store is an in-memory key/value store.

type Reader interface {
\tGet(key string) ([]byte, bool)
\tkeys() []string
}
    Reader reads entries by key.

type Option func(*Store)
    Option configures a Store.

const DefaultLimit = 128
    DefaultLimit is the default entry limit.

const Quiet = iota
    Levels of verbosity.

const Verbose
    Levels of verbosity.

var ErrNotFound = errors.New(\"not found\")
    ErrNotFound is returned for missing keys.

func NewStore(name string, opts ...Option) *Store
    NewStore creates a store with the given options.

func (s *Store) Get(key string) ([]byte, bool)
    Get returns the value stored under key.

func (s *Store) Keys() []string
    Keys lists all keys, upper-cased.
The order is unspecified.

<<<FILE_END>>> tests/fixtures/sample.go

";
    assert_eq!(out, expected);
}

#[test]
fn fixture_has_no_unexported_names() {
    let out = summarize(Path::new(FIXTURE));
    for private in [
        "entries",
        "hidden",
        "debugLevel",
        "internalCounter",
        "helper",
        "func (s *Store) keys",
    ] {
        assert!(!out.contains(private), "output leaked {private:?}");
    }
}

#[test]
fn fixture_codemap_structure() {
    let codemap = read_codemap(Path::new(FIXTURE)).unwrap();
    assert_eq!(codemap.package, "sample");

    let store = codemap
        .declarations
        .iter()
        .find_map(|d| match d {
            Declaration::Type(t) if t.name == "Store" => Some(t),
            _ => None,
        })
        .unwrap();
    let TypeBody::Struct(fields) = &store.body else {
        panic!("Store should be a struct");
    };
    assert_eq!(fields.len(), 2);

    let methods: Vec<_> = codemap
        .declarations
        .iter()
        .filter(|d| d.kind() == "method")
        .map(|d| d.name())
        .collect();
    assert_eq!(methods, ["Get", "Keys"]);
}

#[test]
fn method_lines_start_with_func_receiver() {
    let out = summarize(Path::new(FIXTURE));
    for name in ["Get", "Keys"] {
        let line = out
            .lines()
            .find(|l| l.contains(&format!(") {name}(")))
            .unwrap();
        assert!(line.starts_with("func ("));
    }
}

#[test]
fn summary_is_idempotent() {
    assert_eq!(summarize(Path::new(FIXTURE)), summarize(Path::new(FIXTURE)));
}

#[test]
fn struct_and_const_scenarios() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("t.go");
    fs::write(
        &path,
        "package t\n\ntype T struct {\n\tA string\n\tb int\n}\n\nconst (\n\tX = 1\n\ty = 2\n)\n",
    )
    .unwrap();

    let out = summarize(&path);
    assert!(out.contains("type T struct {\n\tA\tstring\n}\n"));
    assert!(!out.contains("b\tint"));
    assert!(out.contains("const X = 1\n"));
    assert!(!out.contains("const y"));
}

#[test]
fn broken_file_skipped_siblings_summarized() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a_good.go"), "package p\n\nfunc Good() {}\n").unwrap();
    fs::write(dir.path().join("b_bad.go"), "package p\n\nfunc Bad() {\n\tif x {\n").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/c.go"), "package sub\n\nvar V = 1\n").unwrap();

    let mut out = Vec::new();
    let mut errors = Vec::new();
    let report = Summarizer::new(dir.path())
        .run(&mut out, |err| errors.push(err.to_string()))
        .unwrap();
    let out = String::from_utf8(out).unwrap();

    assert_eq!(report.summarized, 2);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("b_bad.go"));
    assert!(!out.contains("b_bad.go"));

    let good = dir.path().join("a_good.go");
    let nested = dir.path().join("sub").join("c.go");
    let good_block = format!(
        "<<<FILE_START>>> {0}\n\nfunc Good()\n\n<<<FILE_END>>> {0}\n\n",
        good.display()
    );
    let nested_block = format!(
        "<<<FILE_START>>> {0}\n\nvar V = 1\n\n<<<FILE_END>>> {0}\n\n",
        nested.display()
    );
    assert!(out.contains(&good_block));
    assert!(out.contains(&nested_block));
}
