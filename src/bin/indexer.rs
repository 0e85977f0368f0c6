// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! `indexer` CLI: walk a document directory and write a dictionary +
//! postings store.
//!
//! ```bash
//! indexer -i ./docs -d dictionary.txt -p postings.bin
//! ```

use std::path::PathBuf;

use clap::Parser;

use boolsearch::error::IrError;
use boolsearch::indexer::build_index;
use boolsearch::preprocess::preprocess;
use boolsearch::store::write_store;

#[derive(Parser)]
#[command(name = "indexer", about = "Build a boolean-retrieval index from a directory of documents")]
struct Args {
    /// Directory of documents to index; each file's basename is its posting ID.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Path to write the dictionary sidecar.
    #[arg(short = 'd', long = "dictionary")]
    dictionary: PathBuf,

    /// Path to write the postings file.
    #[arg(short = 'p', long = "postings")]
    postings: PathBuf,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("indexer: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(args: &Args) -> Result<(), IrError> {
    let entries = build_index(&args.input, &preprocess)?;
    write_store(&args.dictionary, &args.postings, &entries).map_err(|e| IrError::BadArguments {
        message: format!("failed writing index: {}", e),
    })
}
