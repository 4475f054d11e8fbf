use std::{
    env, fs,
    io::{self, Read},
    process::ExitCode,
};

use partition_core::{parse_html, PartitionConfig, Partitioner};

fn main() -> ExitCode {
    env_logger::init();

    // Accept an optional HTML path; `-` or no argument reads stdin
    let args: Vec<String> = env::args().collect();
    let input_path = args.get(1).cloned().unwrap_or_else(|| "-".to_string());

    let html = match read_input(&input_path) {
        Ok(html) => html,
        Err(e) => {
            eprintln!("Failed to read {}: {}", input_path, e);
            return ExitCode::FAILURE;
        }
    };

    let config = PartitionConfig::load().with_env_overrides();
    log::debug!("max nesting depth {}", config.max_depth);

    let tree = parse_html(&html);
    let result = match Partitioner::new(config).partition(&tree) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Failed to partition {}: {}", input_path, e);
            return ExitCode::FAILURE;
        }
    };
    if result.is_truncated() {
        eprintln!(
            "Nesting limit applied: {} subtree(s) past depth {} emitted as text (set PARTITION_MAX_DEPTH to raise it)",
            result.truncated_subtrees, config.max_depth
        );
    }

    match serde_json::to_string_pretty(&result.elements) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize elements: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut html = String::new();
        io::stdin().read_to_string(&mut html)?;
        return Ok(html);
    }
    fs::read_to_string(path)
}
