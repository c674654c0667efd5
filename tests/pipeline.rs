//! End-to-end runs of the pipeline with stand-in renderer and merger.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use flashsheet::{
    CategoryStyle, Error, Merger, ParseOptions, Pipeline, Renderer, Result, SheetLayout, Template,
};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const FRONT: &str = r#"<svg><text>@Category1l@ | @Category1r@</text><text>@FrontTop1@</text><text>@FrontBottom1@</text><text>@FrontTop2@</text></svg>"#;
const BACK: &str = r#"<svg><text>@BackTop1@</text><text>@BackBottom1@</text><text>@BackTop2@</text></svg>"#;

/// Copies the SVG to the PDF path and remembers what it saw.
#[derive(Default)]
struct CopyRenderer {
    rendered: RefCell<Vec<(String, String)>>,
}

impl Renderer for CopyRenderer {
    fn render(&self, source: &Path, target: &Path) -> Result<()> {
        let svg = fs::read_to_string(source).unwrap();
        fs::write(target, &svg).unwrap();
        let name = source.file_name().unwrap().to_string_lossy().into_owned();
        self.rendered.borrow_mut().push((name, svg));
        Ok(())
    }
}

/// Fails on the n-th call, after writing a partial output.
struct FailingRenderer {
    fail_on: usize,
    calls: RefCell<usize>,
}

impl Renderer for FailingRenderer {
    fn render(&self, _source: &Path, target: &Path) -> Result<()> {
        let mut calls = self.calls.borrow_mut();
        *calls += 1;
        fs::write(target, "partial").unwrap();
        if *calls == self.fail_on {
            return Err(Error::ExternalTool {
                tool: "inkscape".into(),
                detail: "exited with exit status: 1".into(),
            });
        }
        Ok(())
    }
}

/// Concatenates the inputs into the output, recording their names.
#[derive(Default)]
struct ConcatMerger {
    inputs: RefCell<Vec<String>>,
}

impl Merger for ConcatMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<()> {
        let mut joined = String::new();
        for input in inputs {
            assert!(input.exists(), "{} should exist while merging", input.display());
            joined.push_str(&fs::read_to_string(input).unwrap());
            self.inputs
                .borrow_mut()
                .push(input.file_name().unwrap().to_string_lossy().into_owned());
        }
        fs::write(output, joined).unwrap();
        Ok(())
    }
}

fn pipeline(work_dir: &Path) -> Pipeline {
    let mut pipeline = Pipeline::new(Template::new("front", FRONT), Template::new("back", BACK));
    pipeline.work_dir = work_dir.to_path_buf();
    pipeline
}

fn words(n: usize) -> String {
    let mut text = String::from("# Words\n");
    for i in 0..n {
        text.push_str(&format!("word{i}\n--\nWort{i}\n==\n"));
    }
    text
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn renders_front_and_back_per_sheet_in_order() {
    let dir = tempdir().unwrap();
    let work = dir.path().join("work");
    fs::create_dir(&work).unwrap();
    let output = dir.path().join("cards.pdf");
    let renderer = CopyRenderer::default();
    let merger = ConcatMerger::default();

    let summary = pipeline(&work)
        .run(&words(20), ParseOptions::default(), &output, &renderer, &merger)
        .unwrap();

    assert_eq!(summary.cards, 20);
    assert_eq!(summary.sheets, 3);
    assert_eq!(
        *merger.inputs.borrow(),
        vec![
            "Sheet00-front.pdf",
            "Sheet00-back.pdf",
            "Sheet01-front.pdf",
            "Sheet01-back.pdf",
            "Sheet02-front.pdf",
            "Sheet02-back.pdf",
        ]
    );
    assert!(output.exists());
    assert_eq!(files_in(&work), Vec::<String>::new());
}

#[test]
fn fields_land_in_their_slots() {
    let dir = tempdir().unwrap();
    let renderer = CopyRenderer::default();
    let merger = ConcatMerger::default();
    let text = "# Animals\n## Pets\ncat & mouse\n--\nKatz <und> Maus\n--\nTom & Jerry\n==\n";

    pipeline(dir.path())
        .run(
            text,
            ParseOptions::default(),
            &dir.path().join("out.pdf"),
            &renderer,
            &merger,
        )
        .unwrap();

    let rendered = renderer.rendered.borrow();
    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered[0].0, "Sheet00-front.svg");
    assert_eq!(
        rendered[0].1,
        "<svg><text>Animals | Pets</text><text>Katz &lt;und&gt; Maus</text><text></text><text>@FrontTop2@</text></svg>"
    );
    assert_eq!(rendered[1].0, "Sheet00-back.svg");
    assert_eq!(
        rendered[1].1,
        "<svg><text>cat &amp; mouse</text><text>Tom &amp; Jerry</text><text>@BackTop2@</text></svg>"
    );
}

#[test]
fn joined_categories_and_blank_slots() {
    let dir = tempdir().unwrap();
    let renderer = CopyRenderer::default();
    let merger = ConcatMerger::default();
    let mut pipeline = Pipeline::new(
        Template::new("front", "@Category1@;@FrontTop1@;@FrontTop2@"),
        Template::new("back", "@BackTop1@;@BackTop2@"),
    );
    pipeline.work_dir = dir.path().to_path_buf();
    pipeline.layout = SheetLayout {
        sheet_size: 2,
        category_style: CategoryStyle::Joined {
            separator: ": ".into(),
        },
        blank_unused: true,
    };

    pipeline
        .run(
            "# Verbs\n## Motion\nrun\n--\nlaufen\n",
            ParseOptions::default(),
            &dir.path().join("out.pdf"),
            &renderer,
            &merger,
        )
        .unwrap();

    let rendered = renderer.rendered.borrow();
    assert_eq!(rendered[0].1, "Verbs: Motion;laufen;");
    assert_eq!(rendered[1].1, "run;");
}

#[test]
fn renderer_failure_cleans_up_and_skips_merge() {
    let dir = tempdir().unwrap();
    let work = dir.path().join("work");
    fs::create_dir(&work).unwrap();
    let output = dir.path().join("cards.pdf");
    let renderer = FailingRenderer {
        fail_on: 3,
        calls: RefCell::new(0),
    };
    let merger = ConcatMerger::default();

    let err = pipeline(&work)
        .run(&words(12), ParseOptions::default(), &output, &renderer, &merger)
        .unwrap_err();

    assert!(matches!(err, Error::ExternalTool { .. }));
    assert!(merger.inputs.borrow().is_empty());
    assert!(!output.exists());
    assert_eq!(files_in(&work), Vec::<String>::new());
}

#[test]
fn parse_error_happens_before_any_rendering() {
    let dir = tempdir().unwrap();
    let renderer = CopyRenderer::default();
    let merger = ConcatMerger::default();

    let err = pipeline(dir.path())
        .run(
            "a\n--\nb\n--\nc\n--\nd\n==\n",
            ParseOptions::default(),
            &dir.path().join("out.pdf"),
            &renderer,
            &merger,
        )
        .unwrap_err();

    assert!(matches!(err, Error::TooManyFields { .. }));
    assert!(renderer.rendered.borrow().is_empty());
}

#[test]
fn intermediates_can_be_kept() {
    let dir = tempdir().unwrap();
    let work = dir.path().join("work");
    fs::create_dir(&work).unwrap();
    let renderer = CopyRenderer::default();
    let merger = ConcatMerger::default();
    let mut pipeline = pipeline(&work);
    pipeline.keep_intermediates = true;

    pipeline
        .run(
            &words(3),
            ParseOptions::default(),
            &dir.path().join("out.pdf"),
            &renderer,
            &merger,
        )
        .unwrap();

    assert_eq!(
        files_in(&work),
        vec![
            "Sheet00-back.pdf",
            "Sheet00-back.svg",
            "Sheet00-front.pdf",
            "Sheet00-front.svg",
        ]
    );
}

#[test]
fn missing_template_is_a_file_error() {
    let dir = tempdir().unwrap();
    let err = Template::load(&dir.path().join("Karten-Front.svg")).unwrap_err();
    assert!(matches!(err, Error::FileIo { .. }));
}
