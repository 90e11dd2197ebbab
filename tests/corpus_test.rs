// Runs every tree-sitter style corpus file shipped with the crate

use std::path::Path;
use integerbasic::{corpus,LANGUAGE};
use tree_sitter::Language;

type STDRESULT = Result<(),Box<dyn std::error::Error>>;

fn run_file(path: &Path) -> STDRESULT {
    let text = std::fs::read_to_string(path)?;
    let cases = corpus::parse(&text)?;
    assert!(cases.len() > 0,"no cases in {}",path.display());
    let lang: Language = LANGUAGE.into();
    for outcome in corpus::run(&lang,&cases)? {
        assert!(outcome.passed,"{} case `{}`\nexpected: {}\nactual:   {}",
            path.display(),outcome.name,outcome.expected,outcome.actual);
    }
    Ok(())
}

#[test]
fn all_corpus_files() -> STDRESULT {
    let mut count = 0;
    for entry in std::fs::read_dir(Path::new("test").join("corpus"))? {
        let path = entry?.path();
        if path.extension().and_then(|x| x.to_str())==Some("txt") {
            run_file(&path)?;
            count += 1;
        }
    }
    assert_eq!(count,5);
    Ok(())
}

#[test]
fn statements() -> STDRESULT {
    run_file(&Path::new("test").join("corpus").join("statements.txt"))
}

#[test]
fn expressions() -> STDRESULT {
    run_file(&Path::new("test").join("corpus").join("expressions.txt"))
}

#[test]
fn errors() -> STDRESULT {
    run_file(&Path::new("test").join("corpus").join("errors.txt"))
}
