//! `thoughtloop chat`: interactive mode, one independent run per line.

use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::Overrides;

pub async fn run(overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(overrides)?;
    let service = super::build_service(&config)?;

    eprintln!("Type a question and press Enter. Type 'exit' or 'quit' to leave.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit(question) {
            break;
        }

        match service.agent().run(question).await.answer {
            Some(answer) => println!("{answer}"),
            None => eprintln!("[Error] The agent could not produce an answer."),
        }
    }

    Ok(())
}

fn is_exit(line: &str) -> bool {
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}
