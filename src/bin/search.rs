// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `search` CLI: evaluate one boolean query per line against a dictionary +
//! postings store.
//!
//! ```bash
//! search -d dictionary.txt -p postings.bin -q queries.txt -o results.txt
//! ```

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use boolsearch::error::IrError;
use boolsearch::evaluator::evaluate;
use boolsearch::parse_tree::build_from_postfix;
use boolsearch::preprocess::preprocess;
use boolsearch::query::compile;
use boolsearch::skiplist::SkipList;
use boolsearch::store::IndexReader;

#[derive(Parser)]
#[command(name = "search", about = "Evaluate boolean queries against a prebuilt index")]
struct Args {
    /// Dictionary sidecar produced by the indexer.
    #[arg(short = 'd', long = "dictionary")]
    dictionary: PathBuf,

    /// Postings file produced by the indexer.
    #[arg(short = 'p', long = "postings")]
    postings: PathBuf,

    /// File with one boolean query per line.
    #[arg(short = 'q', long = "queries")]
    queries: PathBuf,

    /// File to write one result line per query into.
    #[arg(short = 'o', long = "output")]
    output: PathBuf,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("search: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: &Args) -> Result<(), IrError> {
    let mut reader = IndexReader::open(&args.dictionary, &args.postings)?;
    let universe = reader.load_universe()?;

    let queries_text = fs::read_to_string(&args.queries).map_err(|e| IrError::BadArguments {
        message: format!("cannot read queries file {}: {}", args.queries.display(), e),
    })?;

    // Opened before the query loop, not after: a query later in the file
    // failing fatally (mismatched parens, a malformed postfix) must still
    // leave every result computed so far on disk, matching the original's
    // `with open(...) as o` block writing one line per query as it goes.
    let mut output = fs::File::create(&args.output).map_err(|e| IrError::BadArguments {
        message: format!("cannot create results file {}: {}", args.output.display(), e),
    })?;

    for line in queries_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            write_output_line(&mut output, &args.output, "")?;
            continue;
        }

        let postfix = compile(line)?;
        let mut tree = build_from_postfix(&postfix, line, |raw_term| {
            // A query term is itself preprocessed the same way documents
            // are, so `Cat` and `cats` resolve to the same stem. Multi-word
            // terms cannot occur here: tokenize() has already split on
            // whitespace, so a term is a single already-lower-cased word.
            // A term the preprocessor discards entirely (a stop word, a
            // non-alphabetic token) can never appear in the dictionary, so
            // it resolves to an empty list without risking a collision with
            // the reserved universal-stem key.
            match preprocess(raw_term).into_iter().next() {
                Some(stem) => reader.load_stem(&stem),
                None => Ok(SkipList::default()),
            }
        })?;
        let result = evaluate(&mut tree, &universe, line)?;

        let line_out = result
            .to_list()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write_output_line(&mut output, &args.output, &line_out)?;
    }

    Ok(())
}

fn write_output_line(output: &mut fs::File, output_path: &PathBuf, line: &str) -> Result<(), IrError> {
    output
        .write_all(line.as_bytes())
        .and_then(|()| output.write_all(b"\n"))
        .map_err(|e| IrError::BadArguments {
            message: format!("cannot write results file {}: {}", output_path.display(), e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use boolsearch::indexer::build_index;
    use boolsearch::store::write_store;
    use std::collections::BTreeSet;

    fn whitespace_preprocess(text: &str) -> BTreeSet<String> {
        text.split_whitespace().map(|w| w.to_lowercase()).collect()
    }

    /// A fatal query partway through the file must not discard the results
    /// already computed for the queries before it: the output file is
    /// opened before the loop and written to incrementally, not built up in
    /// memory and flushed only on a clean finish.
    #[test]
    fn fatal_query_midway_preserves_earlier_results() {
        let workdir = tempfile::tempdir().unwrap();
        let doc_dir = workdir.path().join("docs");
        fs::create_dir(&doc_dir).unwrap();
        fs::write(doc_dir.join("1"), "cat dog").unwrap();
        fs::write(doc_dir.join("2"), "cat").unwrap();

        let dictionary = workdir.path().join("dictionary.txt");
        let postings = workdir.path().join("postings.bin");
        let entries = build_index(&doc_dir, &whitespace_preprocess).unwrap();
        write_store(&dictionary, &postings, &entries).unwrap();

        let queries = workdir.path().join("queries.txt");
        fs::write(&queries, "cat\ncat and dog\n(cat and dog\n").unwrap();
        let output = workdir.path().join("results.txt");

        let args = Args {
            dictionary,
            postings,
            queries,
            output: output.clone(),
        };
        let err = run(&args).unwrap_err();
        assert!(matches!(err, IrError::MismatchedParens { .. }));

        let written = fs::read_to_string(&output).unwrap();
        let mut lines = written.lines();
        assert_eq!(lines.next(), Some("1 2"));
        assert_eq!(lines.next(), Some("1"));
        assert_eq!(lines.next(), None);
    }
}
