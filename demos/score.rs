extern crate housing_ols;

use std::io::{self, Read};

use housing_ols::{Config, Scorer};

fn main() {
    simple_logger::init_with_level(log::Level::Info).unwrap();

    let config = Config::load().unwrap();

    // Load the model written by the `train` example
    let mut scorer = Scorer::new();
    scorer.init(&config).unwrap();

    let schema = scorer.schema().unwrap();
    println!("{}", serde_json::to_string_pretty(&schema).unwrap());

    // Score a request from stdin, or the schema's sample request if stdin is empty
    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw).unwrap();
    let request = if raw.trim().is_empty() {
        schema.sample_input()
    } else {
        serde_json::from_str(&raw).unwrap()
    };

    let response = scorer.run_json(&request);
    println!("{}", serde_json::to_string_pretty(&response).unwrap());
}
