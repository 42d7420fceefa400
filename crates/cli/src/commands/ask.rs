//! `thoughtloop ask`: answer a single question.

use super::Overrides;

pub async fn run(question: &str, overrides: &Overrides) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(overrides)?;
    let service = super::build_service(&config)?;

    let outcome = service.agent().run(question).await;
    match outcome.answer {
        Some(answer) => {
            println!("{answer}");
            Ok(())
        }
        None => Err("The agent could not produce an answer. Run with --verbose for details.".into()),
    }
}
