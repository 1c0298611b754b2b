//! Simple CLI that reads HTML from stdin and prints the extracted records as
//! JSON on stdout.
//!
//! Usage: `extract_stdin [articles|list|comments] < page.html`

use rs_fragments::{articles, comments, list_posts, Options, Record};
use std::io::{self, Read};

fn main() {
    let variant = std::env::args().nth(1).unwrap_or_else(|| "articles".to_string());

    // Read HTML from stdin
    let mut html = String::new();
    if io::stdin().read_to_string(&mut html).is_err() {
        eprintln!("Failed to read from stdin");
        std::process::exit(1);
    }

    let options = Options::default();
    let records: Vec<Record> = match variant.as_str() {
        "articles" => articles(&html, &options).into_iter().map(Record::from).collect(),
        "list" => list_posts(&html, &options).into_iter().map(Record::from).collect(),
        "comments" => comments(&html, &options).into_iter().map(Record::from).collect(),
        other => {
            eprintln!("Unknown variant `{other}`. Expected articles, list or comments");
            std::process::exit(2);
        }
    };

    println!("{}", serde_json::to_string(&records).unwrap_or_default());
}
